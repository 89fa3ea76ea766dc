//! Mock GraphQL endpoint fixtures

use entity_export::{AccountConfig, Config};
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API key used for a test account
pub fn api_key(account_id: u64) -> String {
    format!("NRAK-test-{account_id}")
}

/// One entity in API shape, tagged with `env` and `account`
pub fn entity_json(account_id: u64, index: usize, entity_type: &str, domain: &str) -> Value {
    json!({
        "guid": format!("guid-{account_id}-{index}"),
        "name": format!("entity-{account_id}-{index}"),
        "entityType": entity_type,
        "domain": domain,
        "tags": [
            {"key": "env", "values": ["prod"]},
            {"key": "account", "values": [format!("Account {account_id}")]},
            {"key": format!("team-{}", index % 2), "values": ["core", "sre"]}
        ]
    })
}

/// Successful results page
pub fn results_page(entities: Vec<Value>, next_cursor: Option<&str>) -> ResponseTemplate {
    let mut results = json!({ "entities": entities });
    if let Some(cursor) = next_cursor {
        results["nextCursor"] = json!(cursor);
    }
    ResponseTemplate::new(200)
        .set_body_json(json!({ "data": { "actor": { "entitySearch": { "results": results } } } }))
}

/// Mount two pages for one account: three entities, then two.
///
/// Responses are delayed by `delay` so that concurrent runs interleave.
pub async fn mount_account(server: &MockServer, account_id: u64, delay: Duration) {
    let cursor = format!("cursor-{account_id}-1");

    let first: Vec<Value> = (0..3)
        .map(|i| entity_json(account_id, i, "HOST", "INFRA"))
        .collect();
    Mock::given(method("POST"))
        .and(header("API-Key", api_key(account_id).as_str()))
        .and(body_string_contains("cursor: null"))
        .respond_with(results_page(first, Some(cursor.as_str())).set_delay(delay))
        .expect(1)
        .mount(server)
        .await;

    let second: Vec<Value> = (3..5)
        .map(|i| entity_json(account_id, i, "APPLICATION", "APM"))
        .collect();
    Mock::given(method("POST"))
        .and(header("API-Key", api_key(account_id).as_str()))
        .and(body_string_contains(cursor.as_str()))
        .respond_with(results_page(second, None).set_delay(delay))
        .expect(1)
        .mount(server)
        .await;
}

/// Config pointing at the mock server, no inter-page delay
pub fn test_config(server: &MockServer, output_dir: &Path, account_ids: &[u64], workers: usize) -> Config {
    Config {
        endpoint: server.uri(),
        max_workers: workers,
        page_delay: Duration::ZERO,
        request_timeout: Duration::from_secs(10),
        output_dir: output_dir.to_path_buf(),
        accounts: account_ids
            .iter()
            .map(|id| AccountConfig::new(api_key(*id), *id))
            .collect(),
    }
}
