//! Run-wide aggregation of per-account fetch results.
//!
//! Accounts are folded in as they complete. Counting and concatenation are
//! order-independent, so consolidated outputs depend only on which records
//! were fetched.

use crate::fetch::FetchOutcome;
use crate::types::{AccountId, DomainTypePairs, Entity, TypeCounts};

/// Summary of one account, produced when its fetch completes
#[derive(Debug)]
pub struct AccountReport {
    /// Account the report covers
    pub account_id: AccountId,
    /// Display name, if one was discovered
    pub account_name: Option<String>,
    /// Entity counts by type for this account
    pub type_counts: TypeCounts,
    /// Number of entities fetched
    pub total: usize,
    /// Number of pages received
    pub pages: usize,
    /// Rendered fetch failure, if the account stopped early
    pub failure: Option<String>,
}

/// Accumulates records and tallies across all accounts of a run
#[derive(Debug, Default)]
pub struct Aggregator {
    entities: Vec<Entity>,
    domain_types: DomainTypePairs,
    global_counts: TypeCounts,
    reports: Vec<AccountReport>,
}

impl Aggregator {
    /// Start an empty aggregation
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed account into the run.
    ///
    /// Stamps every record with the account id and returns the stamped
    /// records of this account alongside its report.
    pub fn record(&mut self, outcome: FetchOutcome) -> (&[Entity], &AccountReport) {
        let FetchOutcome {
            account_id,
            account_name,
            mut entities,
            pages,
            failure,
        } = outcome;

        for entity in &mut entities {
            entity.account_id = Some(account_id);
            self.domain_types
                .insert((entity.domain.clone(), entity.entity_type.clone()));
        }

        let type_counts = TypeCounts::from_entities(&entities);
        self.global_counts.merge(&type_counts);

        let start = self.entities.len();
        let total = entities.len();
        self.entities.extend(entities);

        self.reports.push(AccountReport {
            account_id,
            account_name,
            type_counts,
            total,
            pages,
            failure: failure.map(|e| e.to_string()),
        });

        let report = &self.reports[self.reports.len() - 1];
        (&self.entities[start..], report)
    }

    /// All records so far, in account completion order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Distinct domain/type pairs so far
    pub fn domain_types(&self) -> &DomainTypePairs {
        &self.domain_types
    }

    /// Global counts by type so far
    pub fn global_counts(&self) -> &TypeCounts {
        &self.global_counts
    }

    /// Finish the run
    pub fn finish(self) -> RunSummary {
        RunSummary {
            total_entities: self.entities.len(),
            global_counts: self.global_counts,
            domain_types: self.domain_types,
            reports: self.reports,
        }
    }
}

/// Result of a whole export run
#[derive(Debug)]
pub struct RunSummary {
    /// Number of entities written to the consolidated files
    pub total_entities: usize,
    /// Entity counts by type across all accounts
    pub global_counts: TypeCounts,
    /// Distinct domain/type pairs across all accounts
    pub domain_types: DomainTypePairs,
    /// Per-account reports, in completion order
    pub reports: Vec<AccountReport>,
}

impl RunSummary {
    /// Accounts whose fetch stopped on a failure
    pub fn failed_accounts(&self) -> impl Iterator<Item = &AccountReport> {
        self.reports.iter().filter(|r| r.failure.is_some())
    }
}
