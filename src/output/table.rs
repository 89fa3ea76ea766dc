//! CSV writers: one row per entity, and distinct domain/type pairs

use crate::error::Result;
use crate::types::{DomainTypePairs, Entity};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Identifying columns that precede the tag columns
pub const ENTITY_COLUMNS: [&str; 5] = ["accountId", "guid", "name", "entityType", "domain"];

/// Sorted union of tag keys across all entities
///
/// Keys that clash with an identifying column are left out; their values
/// land in that column instead.
pub fn tag_columns(entities: &[Entity]) -> Vec<String> {
    entities
        .iter()
        .flat_map(|e| e.tags.iter().map(|t| t.key.as_str()))
        .filter(|key| !ENTITY_COLUMNS.contains(key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Write all entities as CSV
///
/// Header is [`ENTITY_COLUMNS`] followed by [`tag_columns`]. Tag values are
/// joined with `", "`; a key repeated within one entity keeps its last
/// occurrence; missing tags are blank. A tag keyed like an identifying
/// column overwrites that cell.
pub fn write_entities_csv<W: Write>(writer: W, entities: &[Entity]) -> Result<()> {
    let tag_keys = tag_columns(entities);
    let mut csv = ::csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = ENTITY_COLUMNS.to_vec();
    header.extend(tag_keys.iter().map(String::as_str));
    csv.write_record(&header)?;

    for entity in entities {
        let mut tags: HashMap<&str, String> = HashMap::new();
        for tag in &entity.tags {
            tags.insert(tag.key.as_str(), tag.values.join(", "));
        }

        let account_id = entity
            .account_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        let mut row: Vec<&str> = vec![
            account_id.as_str(),
            entity.guid.as_str(),
            entity.name.as_str(),
            entity.entity_type.as_str(),
            entity.domain.as_str(),
        ];
        for (cell, column) in row.iter_mut().zip(ENTITY_COLUMNS) {
            if let Some(value) = tags.get(column) {
                *cell = value.as_str();
            }
        }
        row.extend(
            tag_keys
                .iter()
                .map(|key| tags.get(key.as_str()).map(String::as_str).unwrap_or("")),
        );
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write all entities as CSV to `path`, replacing any existing file
pub fn write_entities_csv_file(path: &Path, entities: &[Entity]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_entities_csv(std::io::BufWriter::new(file), entities)?;
    debug!(path = %path.display(), entities = entities.len(), "wrote entity CSV");
    Ok(())
}

/// Write one row per distinct `(domain, entityType)` pair, no counts
pub fn write_domain_types_csv<W: Write>(writer: W, pairs: &DomainTypePairs) -> Result<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(["domain", "entityType"])?;
    for (domain, entity_type) in pairs {
        csv.write_record([domain, entity_type])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the domain/type pairs to `path`, replacing any existing file
pub fn write_domain_types_csv_file(path: &Path, pairs: &DomainTypePairs) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_domain_types_csv(std::io::BufWriter::new(file), pairs)?;
    debug!(path = %path.display(), pairs = pairs.len(), "wrote domain/type CSV");
    Ok(())
}
