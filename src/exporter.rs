//! Multi-account export run.
//!
//! One fetch task per configured account runs on a pool of at most
//! `max_workers` tokio tasks. Results are folded in completion order; the
//! per-account text dump is written as soon as that account finishes and
//! the consolidated files once every account is done.

use crate::aggregate::{AccountReport, Aggregator, RunSummary};
use crate::client::EntityClient;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{FetchOutcome, fetch_all_entities};
use crate::output::{
    ENTITIES_CSV, ENTITIES_TXT, ENTITY_TYPES_CSV, account_txt_path, write_domain_types_csv_file,
    write_entities_csv_file, write_entities_txt_file,
};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tracing::{error, info};

/// Runs an export over every configured account
#[derive(Debug)]
pub struct Exporter {
    config: Config,
    client: EntityClient,
}

impl Exporter {
    /// Create an exporter, validating the configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = EntityClient::from_config(&config)?;
        Ok(Self { config, client })
    }

    /// Fetch every account and write all output files.
    ///
    /// Account fetch failures do not fail the run; they show up in the
    /// returned [`RunSummary`]. Output I/O errors and panicked workers do.
    pub async fn run(&self) -> Result<RunSummary> {
        let output_dir = self.config.output_dir.as_path();
        std::fs::create_dir_all(output_dir)?;

        info!(
            accounts = self.config.accounts.len(),
            max_workers = self.config.max_workers,
            endpoint = self.client.endpoint(),
            "starting export"
        );

        let page_delay = self.config.page_delay;
        let mut completed = stream::iter(self.config.accounts.clone())
            .map(|account| {
                let client = self.client.clone();
                tokio::spawn(async move { fetch_all_entities(&client, &account, page_delay).await })
            })
            .buffer_unordered(self.config.max_workers);

        let mut aggregator = Aggregator::new();
        while let Some(joined) = completed.next().await {
            let outcome: FetchOutcome = joined?;
            let (entities, report) = aggregator.record(outcome);
            log_account_report(report);
            write_entities_txt_file(&account_txt_path(output_dir, report.account_id), entities)?;
        }

        write_consolidated(output_dir, &aggregator)?;
        let summary = aggregator.finish();
        info!(
            total = summary.total_entities,
            failed_accounts = summary.failed_accounts().count(),
            "export finished"
        );
        Ok(summary)
    }
}

fn write_consolidated(output_dir: &Path, aggregator: &Aggregator) -> Result<()> {
    let entities = aggregator.entities();

    write_entities_csv_file(&output_dir.join(ENTITIES_CSV), entities)?;
    info!(path = ENTITIES_CSV, "all entities written");

    write_domain_types_csv_file(&output_dir.join(ENTITY_TYPES_CSV), aggregator.domain_types())?;
    info!(path = ENTITY_TYPES_CSV, "domain and entity type pairs written");

    write_entities_txt_file(&output_dir.join(ENTITIES_TXT), entities)?;
    info!(path = ENTITIES_TXT, "all entities written");
    Ok(())
}

fn log_account_report(report: &AccountReport) {
    let account_id = report.account_id.get();
    let account_name = report.account_name.as_deref().unwrap_or("Unknown Name");

    if let Some(failure) = &report.failure {
        error!(
            account_id,
            account_name,
            fetched = report.total,
            "fetch stopped early: {}",
            failure
        );
    }
    for (entity_type, count) in report.type_counts.iter() {
        info!(account_id, account_name, entity_type, count, "entity count by type");
    }
    info!(
        account_id,
        account_name,
        pages = report.pages,
        total = report.total,
        "account complete"
    );
}
