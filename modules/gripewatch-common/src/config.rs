use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::error::GripewatchError;
use crate::types::DEFAULT_MAX_RESULTS;

/// How the aggregator consults its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// One source at a time, in priority order.
    #[default]
    Sequential,
    /// All sources at once; results merged in priority order.
    Concurrent,
}

impl FromStr for FanOut {
    type Err = GripewatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(FanOut::Sequential),
            "concurrent" => Ok(FanOut::Concurrent),
            other => Err(GripewatchError::Config(format!(
                "fan-out must be 'sequential' or 'concurrent', got '{other}'"
            ))),
        }
    }
}

/// Identifies one built-in source adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Reddit,
    StackExchange,
    Trustpilot,
    Sitejabber,
    Web,
}

impl SourceId {
    /// Every built-in source, highest priority first.
    pub const PRIORITY: [SourceId; 5] = [
        SourceId::Reddit,
        SourceId::StackExchange,
        SourceId::Trustpilot,
        SourceId::Sitejabber,
        SourceId::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Reddit => "reddit",
            SourceId::StackExchange => "stackexchange",
            SourceId::Trustpilot => "trustpilot",
            SourceId::Sitejabber => "sitejabber",
            SourceId::Web => "web",
        }
    }
}

impl FromStr for SourceId {
    type Err = GripewatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SourceId::PRIORITY
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| GripewatchError::UnknownSource(s.trim().to_string()))
    }
}

/// Scout configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub max_results: usize,
    /// Timeout applied to every outbound HTTP request.
    pub request_timeout: Duration,
    /// Outer timeout for one adapter's whole fetch.
    pub adapter_timeout: Duration,
    pub user_agent: String,
    pub fan_out: FanOut,
    pub stackexchange_site: String,
    /// Enabled sources, always in priority order.
    pub sources: Vec<SourceId>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            request_timeout: Duration::from_secs(10),
            adapter_timeout: Duration::from_secs(30),
            user_agent: "complaint-search-app".to_string(),
            fan_out: FanOut::Sequential,
            stackexchange_site: "stackoverflow".to_string(),
            sources: SourceId::PRIORITY.to_vec(),
        }
    }
}

impl ScoutConfig {
    /// Load configuration from `GRIPEWATCH_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, GripewatchError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GripewatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_results = match lookup("GRIPEWATCH_MAX_RESULTS") {
            Some(v) => parse_number::<usize>("GRIPEWATCH_MAX_RESULTS", &v)?,
            None => defaults.max_results,
        };
        if max_results == 0 {
            return Err(GripewatchError::Config(
                "GRIPEWATCH_MAX_RESULTS must be >= 1".to_string(),
            ));
        }

        let request_timeout = match lookup("GRIPEWATCH_REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number("GRIPEWATCH_REQUEST_TIMEOUT_SECS", &v)?),
            None => defaults.request_timeout,
        };
        let adapter_timeout = match lookup("GRIPEWATCH_ADAPTER_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number("GRIPEWATCH_ADAPTER_TIMEOUT_SECS", &v)?),
            None => defaults.adapter_timeout,
        };

        let fan_out = match lookup("GRIPEWATCH_FAN_OUT") {
            Some(v) => v.parse()?,
            None => defaults.fan_out,
        };

        let sources = match lookup("GRIPEWATCH_SOURCES") {
            Some(v) => parse_sources(&v)?,
            None => defaults.sources,
        };

        Ok(Self {
            max_results,
            request_timeout,
            adapter_timeout,
            user_agent: lookup("GRIPEWATCH_USER_AGENT").unwrap_or(defaults.user_agent),
            fan_out,
            stackexchange_site: lookup("GRIPEWATCH_STACKEXCHANGE_SITE")
                .unwrap_or(defaults.stackexchange_site),
            sources,
        })
    }

    pub fn log_summary(&self) {
        let sources: Vec<&str> = self.sources.iter().map(|s| s.as_str()).collect();
        info!(
            max_results = self.max_results,
            request_timeout_secs = self.request_timeout.as_secs(),
            adapter_timeout_secs = self.adapter_timeout.as_secs(),
            user_agent = self.user_agent.as_str(),
            fan_out = ?self.fan_out,
            stackexchange_site = self.stackexchange_site.as_str(),
            ?sources,
            "Scout config loaded"
        );
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, GripewatchError> {
    value
        .trim()
        .parse()
        .map_err(|_| GripewatchError::Config(format!("{key} must be a number, got '{value}'")))
}

/// Parse a comma list of source names, returned in priority order.
fn parse_sources(value: &str) -> Result<Vec<SourceId>, GripewatchError> {
    let wanted = value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(SourceId::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SourceId::PRIORITY
        .into_iter()
        .filter(|id| wanted.contains(id))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = ScoutConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.max_results, 25);
        assert_eq!(config.fan_out, FanOut::Sequential);
        assert_eq!(config.sources, SourceId::PRIORITY.to_vec());
        assert_eq!(config.user_agent, "complaint-search-app");
    }

    #[test]
    fn reads_overrides() {
        let config = ScoutConfig::from_lookup(lookup(&[
            ("GRIPEWATCH_MAX_RESULTS", "40"),
            ("GRIPEWATCH_REQUEST_TIMEOUT_SECS", "5"),
            ("GRIPEWATCH_FAN_OUT", "Concurrent"),
            ("GRIPEWATCH_USER_AGENT", "gripewatch-test"),
        ]))
        .unwrap();
        assert_eq!(config.max_results, 40);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.fan_out, FanOut::Concurrent);
        assert_eq!(config.user_agent, "gripewatch-test");
    }

    #[test]
    fn source_list_is_reordered_by_priority() {
        let config =
            ScoutConfig::from_lookup(lookup(&[("GRIPEWATCH_SOURCES", "web, reddit")])).unwrap();
        assert_eq!(config.sources, vec![SourceId::Reddit, SourceId::Web]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ScoutConfig::from_lookup(lookup(&[("GRIPEWATCH_MAX_RESULTS", "lots")])).is_err());
        assert!(ScoutConfig::from_lookup(lookup(&[("GRIPEWATCH_MAX_RESULTS", "0")])).is_err());
        assert!(ScoutConfig::from_lookup(lookup(&[("GRIPEWATCH_FAN_OUT", "random")])).is_err());
        assert!(matches!(
            ScoutConfig::from_lookup(lookup(&[("GRIPEWATCH_SOURCES", "reddit,myspace")])),
            Err(GripewatchError::UnknownSource(name)) if name == "myspace"
        ));
    }
}
