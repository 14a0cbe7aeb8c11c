/// Environment variable holding the storage key namespace.
pub const NAMESPACE_ENV: &str = "EXPENSA_SESSION_NAMESPACE";

const DEFAULT_NAMESPACE: &str = "expensa";

/// Session adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Prefix for every storage key, so several apps can share one storage.
    pub namespace: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        match std::env::var(NAMESPACE_ENV) {
            Ok(ns) if !ns.trim().is_empty() => Self::new(ns.trim()),
            _ => {
                tracing::debug!("{NAMESPACE_ENV} not set; using default namespace");
                Self::default()
            }
        }
    }

    pub(crate) fn key(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }
}
