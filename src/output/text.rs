//! Human-readable text dump, one block per entity

use crate::error::Result;
use crate::types::Entity;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

const RULE_WIDTH: usize = 40;

/// Render tag values as a bracketed, quoted list: `['a', 'b']`
pub fn format_values(values: &[String]) -> String {
    let inner = values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", inner)
}

/// Write one block per entity, each followed by a rule line
pub fn write_entities_txt<W: Write>(mut writer: W, entities: &[Entity]) -> Result<()> {
    let rule = "-".repeat(RULE_WIDTH);
    for entity in entities {
        writeln!(writer, "GUID: {}", entity.guid)?;
        writeln!(writer, "Name: {}", entity.name)?;
        writeln!(writer, "Type: {}", entity.entity_type)?;
        writeln!(writer, "Domain: {}", entity.domain)?;
        writeln!(writer, "Tags:")?;
        for tag in &entity.tags {
            writeln!(writer, "  {}: {}", tag.key, format_values(&tag.values))?;
        }
        writeln!(writer, "{}", rule)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the text dump to `path`, replacing any existing file
pub fn write_entities_txt_file(path: &Path, entities: &[Entity]) -> Result<()> {
    let file = File::create(path)?;
    write_entities_txt(BufWriter::new(file), entities)?;
    debug!(path = %path.display(), entities = entities.len(), "wrote text dump");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tag;

    fn sample() -> Entity {
        Entity {
            guid: "MXxBUE18QVBQTElDQVRJT058MQ".into(),
            name: "checkout-api".into(),
            entity_type: "APM_APPLICATION_ENTITY".into(),
            domain: "APM".into(),
            tags: vec![
                Tag::new("env", ["prod"]),
                Tag::new("team", ["payments", "sre"]),
            ],
            account_id: None,
        }
    }

    #[test]
    fn block_layout() {
        let mut out = Vec::new();
        write_entities_txt(&mut out, &[sample()]).expect("write failed");
        let text = String::from_utf8(out).expect("utf8");

        let expected = "\
GUID: MXxBUE18QVBQTElDQVRJT058MQ
Name: checkout-api
Type: APM_APPLICATION_ENTITY
Domain: APM
Tags:
  env: ['prod']
  team: ['payments', 'sre']
----------------------------------------
";
        assert_eq!(text, expected);
    }

    #[test]
    fn one_rule_per_entity() {
        let mut out = Vec::new();
        write_entities_txt(&mut out, &[sample(), sample(), sample()]).expect("write failed");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().filter(|l| *l == "-".repeat(40)).count(), 3);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut out = Vec::new();
        write_entities_txt(&mut out, &[]).expect("write failed");
        assert!(out.is_empty());
    }

    #[test]
    fn empty_values_render_as_empty_list() {
        assert_eq!(format_values(&[]), "[]");
    }

    #[test]
    fn file_form_creates_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("entities_1.txt");
        write_entities_txt_file(&path, &[sample()]).expect("write failed");
        let text = std::fs::read_to_string(&path).expect("read back");
        assert!(text.starts_with("GUID: "));
    }
}
