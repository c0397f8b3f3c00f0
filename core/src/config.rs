use std::time::Duration;

use crate::error::ConfigError;

pub const SEARCH_DEBOUNCE_ENV: &str = "CONTACTBOOK_SEARCH_DEBOUNCE_MS";
pub const SEARCH_LATENCY_ENV: &str = "CONTACTBOOK_SEARCH_LATENCY_MS";

/// Tunables for the application graphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Quiet period before a search term is sent
    pub search_debounce: Duration,
    /// Extra delay applied after every search completes
    pub search_latency: Duration,
}

impl Default for Config {
    fn default() -> Self { Self { search_debounce: Duration::from_millis(300), search_latency: Duration::from_secs(1) } }
}

impl Config {
    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    pub fn with_search_latency(mut self, latency: Duration) -> Self {
        self.search_latency = latency;
        self
    }

    /// Defaults, overridden by `CONTACTBOOK_SEARCH_DEBOUNCE_MS` and `CONTACTBOOK_SEARCH_LATENCY_MS` when set
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|var| std::env::var(var).ok()) }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(debounce) = millis(SEARCH_DEBOUNCE_ENV, lookup(SEARCH_DEBOUNCE_ENV))? {
            config.search_debounce = debounce;
        }
        if let Some(latency) = millis(SEARCH_LATENCY_ENV, lookup(SEARCH_LATENCY_ENV))? {
            config.search_latency = latency;
        }
        Ok(config)
    }
}

fn millis(var: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(ms) => Ok(Some(Duration::from_millis(ms))),
            Err(_) => Err(ConfigError::InvalidDuration { var, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.search_latency, Duration::from_secs(1));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = Config::from_lookup(|var| (var == SEARCH_LATENCY_ENV).then(|| "25".to_string())).unwrap();
        assert_eq!(config.search_latency, Duration::from_millis(25));
        assert_eq!(config.search_debounce, Duration::from_millis(300));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Config::from_lookup(|_| Some("soon".to_string())).unwrap_err();
        assert_eq!(err, ConfigError::InvalidDuration { var: SEARCH_DEBOUNCE_ENV, value: "soon".to_string() });
    }
}
