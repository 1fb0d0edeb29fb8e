use std::env;
use std::time::Duration;

/// Default cap on the summed serialized length of one procedure call.
pub const DEFAULT_MAX_SCRIPT_SIZE: usize = 50_000;

/// Default cap on the number of documents per procedure call.
pub const DEFAULT_MAX_SCRIPT_DOCS: usize = 50;

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_duration_millis(key: &str, default_millis: u64) -> Duration {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(default_millis))
}

/// Comma-separated list, empty entries dropped.
fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .ok()
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Connection settings for the remote document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub database: String,
    pub auth_token: String,
    pub request_timeout: Duration,
    /// Appended to the client user agent so operators can tell workers apart.
    pub user_agent_suffix: String,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env_string("DOCSTORE_URL", "http://localhost:8081"),
            database: env_string("DOCSTORE_DATABASE", "default"),
            auth_token: env_string("DOCSTORE_AUTH_TOKEN", ""),
            request_timeout: env_duration_millis("DOCSTORE_TIMEOUT_MS", 30_000),
            user_agent_suffix: env_string("DOCSTORE_USER_AGENT_SUFFIX", ""),
        }
    }
}

/// Backoff tuning shared by every retryable remote call site. Each call site
/// spins up a fresh policy instance from this config.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub backoff_factor: u32,
    /// Cap on any single backoff sleep.
    pub max_backoff: Duration,
    /// Cap on the cumulative wait across one operation's attempts.
    pub max_total_wait: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            backoff_factor: 2,
            max_backoff: Duration::from_secs(10),
            max_total_wait: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: env_u32("DOCBULK_RETRY_MAX_ATTEMPTS", defaults.max_attempts),
            initial_backoff: env_duration_millis("DOCBULK_RETRY_INITIAL_BACKOFF_MS", 100),
            backoff_factor: env_u32("DOCBULK_RETRY_BACKOFF_FACTOR", defaults.backoff_factor),
            max_backoff: env_duration_millis("DOCBULK_RETRY_MAX_BACKOFF_MS", 10_000),
            max_total_wait: env_duration_millis("DOCBULK_RETRY_MAX_TOTAL_WAIT_MS", 60_000),
        }
    }
}

/// Settings for one import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Target collection name.
    pub collection: String,
    /// Field paths to range-index when the collection is first created.
    pub range_index_paths: Vec<String>,
    /// Service tier requested on collection creation.
    pub offer_type: String,
    /// Replace documents with matching ids instead of failing the insert.
    pub upsert: bool,
    pub max_script_size: usize,
    pub max_script_docs: usize,
    pub retry: RetryConfig,
}

impl ImportConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            range_index_paths: Vec::new(),
            offer_type: "S1".to_string(),
            upsert: true,
            max_script_size: DEFAULT_MAX_SCRIPT_SIZE,
            max_script_docs: DEFAULT_MAX_SCRIPT_DOCS,
            retry: RetryConfig::default(),
        }
    }

    pub fn from_env() -> Self {
        Self {
            collection: env_string("DOCBULK_COLLECTION", "documents"),
            range_index_paths: env_list("DOCBULK_RANGE_INDEX_PATHS"),
            offer_type: env_string("DOCBULK_OFFER_TYPE", "S1"),
            upsert: env_bool("DOCBULK_UPSERT", true),
            max_script_size: env_usize("DOCBULK_MAX_SCRIPT_SIZE", DEFAULT_MAX_SCRIPT_SIZE),
            max_script_docs: env_usize("DOCBULK_MAX_SCRIPT_DOCS", DEFAULT_MAX_SCRIPT_DOCS),
            retry: RetryConfig::from_env(),
        }
    }
}
