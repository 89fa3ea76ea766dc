//! Paginated entity fetch for one account.
//!
//! The loop follows `nextCursor` until the API reports no further pages.
//! Any failure ends the loop for that account; the records gathered up to
//! that point are still returned.

use crate::client::EntityClient;
use crate::config::AccountConfig;
use crate::error::Error;
use crate::query::build_query;
use crate::types::{AccountId, Entity};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Tag key whose first value names the account
pub const ACCOUNT_NAME_TAG: &str = "account";

/// Learns an account's display name from the entities streamed in.
///
/// The first entity carrying an `account` tag with a value wins; once a
/// name is known no further entities are inspected. One instance lives for
/// exactly one account's fetch.
#[derive(Debug, Default)]
pub struct AccountNameDiscovery {
    name: Option<String>,
    scanned: usize,
}

impl AccountNameDiscovery {
    /// Start with no name known
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect a newly received batch of entities
    ///
    /// Returns the name if it is known after this batch.
    pub fn observe(&mut self, entities: &[Entity]) -> Option<&str> {
        if self.name.is_none() {
            for entity in entities {
                self.scanned += 1;
                if let Some(value) = entity.tag_value(ACCOUNT_NAME_TAG) {
                    self.name = Some(value.to_string());
                    break;
                }
            }
        }
        self.name.as_deref()
    }

    /// The discovered name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of entities inspected so far
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// Consume the tracker, returning the discovered name
    pub fn into_name(self) -> Option<String> {
        self.name
    }
}

/// Everything one account's fetch produced
#[derive(Debug)]
pub struct FetchOutcome {
    /// Account that was fetched
    pub account_id: AccountId,
    /// Display name learned from the `account` tag
    pub account_name: Option<String>,
    /// Entities in page order
    pub entities: Vec<Entity>,
    /// Number of pages successfully received
    pub pages: usize,
    /// The failure that stopped the loop early, if any
    pub failure: Option<Error>,
}

impl FetchOutcome {
    /// True if every page was fetched
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Display name, or a placeholder for logs
    pub fn display_name(&self) -> &str {
        self.account_name.as_deref().unwrap_or("Unknown Name")
    }
}

/// Fetch every entity of one account, following pagination cursors.
///
/// Sleeps `page_delay` between pages. Never fails as a whole: a transport
/// or API failure is recorded in [`FetchOutcome::failure`] and the records
/// from earlier pages are kept.
pub async fn fetch_all_entities(
    client: &EntityClient,
    account: &AccountConfig,
    page_delay: Duration,
) -> FetchOutcome {
    let account_id = account.account_id;
    let domains = account.entity_domains.as_deref();

    let mut discovery = AccountNameDiscovery::new();
    let mut entities: Vec<Entity> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;
    let mut failure = None;

    info!(account_id = account_id.get(), "fetching entities");

    loop {
        let query = build_query(account_id, domains, cursor.as_deref());
        let page = match client.fetch_page(&account.api_key, &query).await {
            Ok(page) => page,
            Err(e) => {
                match &e {
                    Error::Api { messages } => {
                        for message in messages {
                            warn!(account_id = account_id.get(), "API error: {}", message);
                        }
                    }
                    Error::HttpStatus { status, body } => {
                        warn!(
                            account_id = account_id.get(),
                            status,
                            body = %body,
                            "failed to retrieve entities"
                        );
                    }
                    other if other.is_fetch_failure() => {
                        warn!(
                            account_id = account_id.get(),
                            error = %other,
                            error_code = other.error_code(),
                            "failed to retrieve entities"
                        );
                    }
                    other => {
                        error!(
                            account_id = account_id.get(),
                            error = %other,
                            error_code = other.error_code(),
                            "unexpected error while fetching entities"
                        );
                    }
                }
                failure = Some(e);
                break;
            }
        };

        pages += 1;
        let first_new = entities.len();
        let next_cursor = page.next().map(str::to_string);
        entities.extend(page.entities);

        let known_before = discovery.name().is_some();
        if let Some(name) = discovery.observe(&entities[first_new..]) {
            if !known_before {
                info!(account_id = account_id.get(), account_name = name, "discovered account name");
            }
        }

        debug!(
            account_id = account_id.get(),
            account_name = discovery.name().unwrap_or("Unknown Name"),
            page = pages,
            total = entities.len(),
            "fetched page"
        );

        match next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }

        tokio::time::sleep(page_delay).await;
    }

    FetchOutcome {
        account_id,
        account_name: discovery.into_name(),
        entities,
        pages,
        failure,
    }
}
