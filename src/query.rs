//! Entity search query construction
//!
//! Domain strings are embedded verbatim; they come from operator-supplied
//! configuration and are not escaped.

use crate::types::AccountId;

/// Build the entity search filter for an account
///
/// With a non-empty domain list the filter is
/// `domain IN ('A', 'B') AND accountId = N`, otherwise `accountId = N`.
pub fn build_filter(account_id: AccountId, entity_domains: Option<&[String]>) -> String {
    match entity_domains {
        Some(domains) if !domains.is_empty() => {
            let quoted = domains
                .iter()
                .map(|d| format!("'{}'", d))
                .collect::<Vec<_>>()
                .join(", ");
            format!("domain IN ({}) AND accountId = {}", quoted, account_id)
        }
        _ => format!("accountId = {}", account_id),
    }
}

/// Build the GraphQL document for one page of results
///
/// `cursor` is `None` for the first page.
pub fn build_query(
    account_id: AccountId,
    entity_domains: Option<&[String]>,
    cursor: Option<&str>,
) -> String {
    let filter = build_filter(account_id, entity_domains);
    let cursor = match cursor {
        Some(c) => format!("\"{}\"", c),
        None => "null".to_string(),
    };

    format!(
        r#"{{
  actor {{
    entitySearch(query: "{filter}") {{
      results(cursor: {cursor}) {{
        nextCursor
        entities {{
          guid
          name
          entityType
          domain
          tags {{
            key
            values
          }}
        }}
      }}
    }}
  }}
}}"#
    )
}
