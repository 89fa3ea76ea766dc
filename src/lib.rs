//! # entity-export
//!
//! Exports monitoring entities (hosts, services, applications) from a
//! GraphQL entity search API into flat files for offline analysis.
//!
//! ## Design
//!
//! - **Cursor pagination** - each account is fetched page by page until the
//!   API stops returning a `nextCursor`
//! - **Bounded fan-out** - accounts are fetched concurrently, at most
//!   `max_workers` at a time
//! - **Fail per account** - a transport or API error ends that account's
//!   fetch; other accounts and the records already gathered are kept
//!
//! ## Quick Start
//!
//! ```no_run
//! use entity_export::{AccountConfig, Config, Exporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         max_workers: 2,
//!         accounts: vec![
//!             AccountConfig::new("NRAK-XXXX", 1234567),
//!             AccountConfig::new("NRAK-YYYY", 7654321).with_domains(["APM", "INFRA"]),
//!         ],
//!         ..Default::default()
//!     };
//!
//!     let summary = Exporter::new(config)?.run().await?;
//!     for (entity_type, count) in summary.global_counts.iter() {
//!         println!("{entity_type}: {count}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Run-wide aggregation
pub mod aggregate;
/// GraphQL client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Multi-account export run
pub mod exporter;
/// Paginated fetch for one account
pub mod fetch;
/// CSV and text writers
pub mod output;
/// Query construction
pub mod query;
/// Core types
pub mod types;

// Re-export commonly used types
pub use aggregate::{AccountReport, Aggregator, RunSummary};
pub use client::{EntityClient, ResultsPage};
pub use config::{AccountConfig, Config};
pub use error::{Error, Result};
pub use exporter::Exporter;
pub use fetch::{AccountNameDiscovery, FetchOutcome, fetch_all_entities};
pub use query::{build_filter, build_query};
pub use types::{AccountId, Entity, Tag, TypeCounts};
