//! Flat-file writers for exported entities
//!
//! Every writer has a generic form over [`std::io::Write`] and a
//! path-based form that creates (or truncates) the target file.

mod table;
mod text;

pub use table::{
    ENTITY_COLUMNS, tag_columns, write_domain_types_csv, write_domain_types_csv_file,
    write_entities_csv, write_entities_csv_file,
};
pub use text::{format_values, write_entities_txt, write_entities_txt_file};

use crate::types::AccountId;
use std::path::{Path, PathBuf};

/// Consolidated CSV of all entities
pub const ENTITIES_CSV: &str = "entities.csv";
/// Consolidated text dump of all entities
pub const ENTITIES_TXT: &str = "entities.txt";
/// Distinct domain/type pairs
pub const ENTITY_TYPES_CSV: &str = "entity_types.csv";

/// Path of the per-account text dump, `entities_<accountId>.txt`
pub fn account_txt_path(output_dir: &Path, account_id: AccountId) -> PathBuf {
    output_dir.join(format!("entities_{}.txt", account_id))
}
