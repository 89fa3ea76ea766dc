//! Core types for entity-export

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Numeric identifier of a monitoring account
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl AccountId {
    /// Create a new AccountId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A key with one or more string values attached to an entity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key; not unique within one entity
    pub key: String,
    /// Tag values, in API order
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

impl Tag {
    /// Create a tag from a key and its values
    pub fn new(key: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A monitored resource as returned by the entity search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Globally unique entity identifier
    pub guid: String,
    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Entity type (e.g. `HOST`, `APPLICATION`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    /// Coarse category (e.g. `INFRA`, `APM`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    /// Ordered tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    /// Owning account, stamped after the fetch completes
    #[serde(default, skip_deserializing)]
    pub account_id: Option<AccountId>,
}

impl Entity {
    /// First value of the first tag with the given key that has any value
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .filter(|t| t.key == key)
            .find_map(|t| t.values.first())
            .map(String::as_str)
    }
}

// The API may send `null` where a value is simply absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Entity counts keyed by entity type, ordered by type name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeCounts(BTreeMap<String, usize>);

impl TypeCounts {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally the types of a slice of entities
    pub fn from_entities(entities: &[Entity]) -> Self {
        let mut counts = Self::new();
        for entity in entities {
            counts.increment(&entity.entity_type, 1);
        }
        counts
    }

    /// Add `by` to the count for `entity_type`
    pub fn increment(&mut self, entity_type: &str, by: usize) {
        *self.0.entry(entity_type.to_string()).or_insert(0) += by;
    }

    /// Fold another tally into this one
    pub fn merge(&mut self, other: &TypeCounts) {
        for (entity_type, count) in &other.0 {
            self.increment(entity_type, *count);
        }
    }

    /// Count for one type (zero if never seen)
    pub fn get(&self, entity_type: &str) -> usize {
        self.0.get(entity_type).copied().unwrap_or(0)
    }

    /// Sum over all types
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// True if nothing has been counted
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(type, count)` pairs in type-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Distinct `(domain, entityType)` pairs, ordered
pub type DomainTypePairs = BTreeSet<(String, String)>;

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(entity_type: &str) -> Entity {
        Entity {
            guid: format!("guid-{entity_type}"),
            name: "n".into(),
            entity_type: entity_type.into(),
            domain: "INFRA".into(),
            tags: vec![],
            account_id: None,
        }
    }

    #[test]
    fn entity_deserializes_from_api_shape() {
        let json = r#"{
            "guid": "MTIzfElORlJBfE5BfDE",
            "name": "web-01",
            "entityType": "INFRASTRUCTURE_HOST_ENTITY",
            "domain": "INFRA",
            "tags": [{"key": "env", "values": ["prod"]}]
        }"#;
        let e: Entity = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(e.entity_type, "INFRASTRUCTURE_HOST_ENTITY");
        assert_eq!(e.tags, vec![Tag::new("env", ["prod"])]);
        assert_eq!(e.account_id, None);
    }

    #[test]
    fn account_id_in_payload_is_ignored() {
        let json = r#"{"guid": "g", "accountId": 42}"#;
        let e: Entity = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(e.account_id, None, "accountId is stamped locally, never read");
        assert!(e.tags.is_empty());
    }

    #[test]
    fn null_fields_deserialize_as_empty() {
        let json = r#"{"guid": "g", "name": null, "entityType": null,
                       "domain": null, "tags": null}"#;
        let e: Entity = serde_json::from_str(json).expect("null fields must be accepted");
        assert_eq!(e.name, "");
        assert_eq!(e.entity_type, "");
        assert_eq!(e.domain, "");
        assert!(e.tags.is_empty());
    }

    #[test]
    fn null_tag_values_deserialize_as_empty() {
        let json = r#"{"guid": "g", "name": "web", "tags": [{"key": "env", "values": null}]}"#;
        let e: Entity = serde_json::from_str(json).expect("null values must be accepted");
        assert_eq!(e.tags, vec![Tag::new("env", Vec::<String>::new())]);
    }

    #[test]
    fn tag_value_skips_empty_value_lists() {
        let mut e = entity("HOST");
        e.tags = vec![
            Tag::new("account", Vec::<String>::new()),
            Tag::new("account", ["Prod Account", "ignored"]),
        ];
        assert_eq!(e.tag_value("account"), Some("Prod Account"));
        assert_eq!(e.tag_value("team"), None);
    }

    #[test]
    fn type_counts_merge_and_total() {
        let mut global = TypeCounts::from_entities(&[entity("HOST"), entity("HOST")]);
        let other = TypeCounts::from_entities(&[entity("HOST"), entity("APPLICATION")]);
        global.merge(&other);

        assert_eq!(global.get("HOST"), 3);
        assert_eq!(global.get("APPLICATION"), 1);
        assert_eq!(global.get("MISSING"), 0);
        assert_eq!(global.total(), 4);
        let order: Vec<_> = global.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["APPLICATION", "HOST"]);
    }
}
