//! GraphQL client for the entity search endpoint

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::Entity;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// One page of entity search results
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPage {
    /// Cursor for the next page; absent or null on the last page
    #[serde(default)]
    pub next_cursor: Option<String>,

    /// Entities on this page
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl ResultsPage {
    /// Cursor to request next, treating an empty string as "no more pages"
    pub fn next(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    actor: Option<Actor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Actor {
    entity_search: Option<EntitySearch>,
}

#[derive(Debug, Deserialize)]
struct EntitySearch {
    results: Option<ResultsPage>,
}

impl GraphQLResponse {
    fn into_page(self) -> Result<ResultsPage> {
        if let Some(errors) = self.errors {
            return Err(Error::Api {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }
        self.data
            .and_then(|d| d.actor)
            .and_then(|a| a.entity_search)
            .and_then(|s| s.results)
            .ok_or_else(|| {
                Error::MalformedResponse("missing data.actor.entitySearch.results".to_string())
            })
    }
}

/// HTTP client for the GraphQL entity search
///
/// One client is shared by all accounts; the credential travels per request.
#[derive(Clone, Debug)]
pub struct EntityClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl EntityClient {
    /// Create a client for `endpoint` with the given request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("entity-export/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a client from the run configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.request_timeout)
    }

    /// The endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one entity search query
    ///
    /// # Errors
    /// - `Error::Network` if the request cannot be sent or the body read
    /// - `Error::HttpStatus` on a non-success status, carrying the body
    /// - `Error::Api` if the payload has an `errors` array
    /// - `Error::MalformedResponse` / `Error::Serialization` if the payload
    ///   has no results page
    pub async fn fetch_page(&self, api_key: &str, query: &str) -> Result<ResultsPage> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("API-Key", api_key)
            .json(&GraphQLRequest { query })
            .send()
            .await?;

        // Check HTTP status before trying to parse the response body
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: GraphQLResponse = serde_json::from_slice(&bytes)?;
        let page = parsed.into_page()?;
        debug!(
            entities = page.entities.len(),
            has_next = page.next().is_some(),
            "received entity page"
        );
        Ok(page)
    }
}
