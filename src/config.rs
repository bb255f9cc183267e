//! Remote endpoint and runtime configuration.

/// Environment variable overriding [`RemoteConfig::base_url`].
pub const BASE_URL_ENV: &str = "TODOSYNC_BASE_URL";

/// Host serving the `/tasks` collection when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the collection resource lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Scheme, host and optional port, without the `/tasks` path.
    pub base_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl RemoteConfig {
    /// Reads [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`] when unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(BASE_URL_ENV) {
            Some(url) if !url.trim().is_empty() => Self {
                base_url: url.trim().to_string(),
            },
            _ => Self::default(),
        }
    }
}

/// Sizing and startup behavior of the task list runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command_queue_bound: usize,
    pub event_capacity: usize,
    /// Run an initial `load` before accepting commands.
    pub load_on_start: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 64,
            event_capacity: 256,
            load_on_start: true,
        }
    }
}
