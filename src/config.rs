//! Configuration types for entity-export

use crate::error::{Error, Result};
use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default GraphQL endpoint (New Relic NerdGraph)
pub const DEFAULT_ENDPOINT: &str = "https://api.newrelic.com/graphql";

/// One account to export
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// User API key sent in the `API-Key` header
    pub api_key: String,

    /// Account to search
    pub account_id: AccountId,

    /// Restrict the search to these entity domains (None = all domains)
    #[serde(default)]
    pub entity_domains: Option<Vec<String>>,
}

impl AccountConfig {
    /// Create an account config without domain filters
    pub fn new(api_key: impl Into<String>, account_id: u64) -> Self {
        Self {
            api_key: api_key.into(),
            account_id: AccountId(account_id),
            entity_domains: None,
        }
    }

    /// Restrict the search to the given domains
    pub fn with_domains(mut self, domains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.entity_domains = Some(domains.into_iter().map(Into::into).collect());
        self
    }
}

// Keep the key out of logs.
impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("api_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("entity_domains", &self.entity_domains)
            .finish()
    }
}

/// Main configuration for an export run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// GraphQL endpoint (default: NerdGraph)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Number of accounts fetched concurrently (default: 1)
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Pause between pages of one account, in seconds (default: 1)
    #[serde(default = "default_page_delay", with = "duration_serde")]
    pub page_delay: Duration,

    /// Per-request timeout, in seconds (default: 30)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Directory the output files are written to (default: ".")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Accounts to export
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_workers: default_max_workers(),
            page_delay: default_page_delay(),
            request_timeout: default_request_timeout(),
            output_dir: default_output_dir(),
            accounts: Vec::new(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    ///
    /// Missing settings take their defaults; the result is validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| Error::Config {
            message: format!("cannot parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the exporter cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.accounts.is_empty() {
            return Err(Error::config("accounts", "no accounts configured"));
        }
        if self.max_workers == 0 {
            return Err(Error::config("max_workers", "must be at least 1"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(Error::config("endpoint", "must not be empty"));
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if account.api_key.trim().is_empty() {
                return Err(Error::config(
                    "api_key",
                    format!("account {} has an empty API key", account.account_id),
                ));
            }
            // Two entries for one account would write the same per-account file.
            if !seen.insert(account.account_id) {
                return Err(Error::config(
                    "account_id",
                    format!("account {} is configured twice", account.account_id),
                ));
            }
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_max_workers() -> usize {
    1
}

fn default_page_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> Config {
        Config {
            accounts: vec![
                AccountConfig::new("NRAK-one", 101),
                AccountConfig::new("NRAK-two", 202).with_domains(["APM", "INFRA"]),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_workers, 1, "sequential by default");
        assert_eq!(config.page_delay, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let json = r#"{"accounts": [{"api_key": "NRAK-x", "account_id": 7}]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(config.max_workers, 1);
        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].account_id, AccountId(7));
        assert!(config.accounts[0].entity_domains.is_none());
        config.validate().expect("minimal config should validate");
    }

    #[test]
    fn fractional_page_delay_is_accepted() {
        let json = r#"{"page_delay": 0.25, "accounts": []}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(config.page_delay, Duration::from_millis(250));
    }

    #[test]
    fn negative_page_delay_is_rejected() {
        let json = r#"{"page_delay": -1, "accounts": []}"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn validate_rejects_empty_account_list() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == "accounts"));
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let mut config = valid_config();
        config.max_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == "max_workers"));
    }

    #[test]
    fn validate_rejects_blank_api_key() {
        let mut config = valid_config();
        config.accounts[1].api_key = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("202"), "error should name the account: {err}");
    }

    #[test]
    fn validate_rejects_duplicate_accounts() {
        let mut config = valid_config();
        config.accounts.push(AccountConfig::new("NRAK-three", 101));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config { key: Some(ref k), .. } if k == "account_id"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let account = AccountConfig::new("NRAK-secret", 5);
        let rendered = format!("{account:?}");
        assert!(!rendered.contains("NRAK-secret"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn from_file_loads_and_validates() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"max_workers": 3, "accounts": [{{"api_key": "k", "account_id": 1, "entity_domains": ["APM"]}}]}}"#
        )
        .expect("write");

        let config = Config::from_file(file.path()).expect("load failed");
        assert_eq!(config.max_workers, 3);
        assert_eq!(
            config.accounts[0].entity_domains.as_deref(),
            Some(&["APM".to_string()][..])
        );
    }

    #[test]
    fn from_file_reports_missing_file_as_config_error() {
        let err = Config::from_file(Path::new("/nonexistent/accounts.json")).unwrap_err();
        assert!(matches!(err, Error::Config { key: None, .. }));
    }
}
