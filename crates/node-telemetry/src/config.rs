//! Telemetry configuration from environment variables.

use std::env;

/// HTTP client internals capped at `warn` regardless of the base level.
pub const QUIET_DEPENDENCIES: &[&str] = &["reqwest", "hyper", "hyper_util", "h2", "rustls"];

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Base filter directive (`info`, `debug`, `oc_04_topic_worker=trace`, ...)
    pub log_level: String,

    /// Whether to emit JSON lines
    pub json_logs: bool,

    /// Whether to colorize pretty output
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables and the config
    /// document's `debug` flag.
    pub fn from_env(debug: bool) -> Self {
        Self::from_lookup(debug, |key| env::var(key).ok())
    }

    /// Same as [`TelemetryConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(debug: bool, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        let log_level = lookup("OC_LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string());

        let json_logs = lookup("OC_JSON_LOGS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(is_container);

        Self {
            log_level,
            json_logs,
            ansi: !json_logs && !is_container,
        }
    }

    /// Full filter directive: base level plus the quiet-dependency caps.
    ///
    /// Caps are skipped for crates the base directive already mentions.
    pub fn filter_directive(&self) -> String {
        let mut directive = self.log_level.trim().to_string();
        for dep in QUIET_DEPENDENCIES {
            let mentioned = directive
                .split(',')
                .any(|part| part.trim().split('=').next() == Some(*dep));
            if !mentioned {
                directive.push_str(&format!(",{dep}=warn"));
            }
        }
        directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_debug_flag_without_env() {
        assert_eq!(TelemetryConfig::from_lookup(true, lookup(&[])).log_level, "debug");
        assert_eq!(TelemetryConfig::from_lookup(false, lookup(&[])).log_level, "info");
    }

    #[test]
    fn test_env_precedence() {
        let config = TelemetryConfig::from_lookup(
            true,
            lookup(&[("OC_LOG_LEVEL", "warn"), ("RUST_LOG", "trace")]),
        );
        assert_eq!(config.log_level, "warn");

        let config = TelemetryConfig::from_lookup(false, lookup(&[("RUST_LOG", "trace")]));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_json_in_containers() {
        let config =
            TelemetryConfig::from_lookup(false, lookup(&[("KUBERNETES_SERVICE_HOST", "10.0.0.1")]));
        assert!(config.json_logs);
        assert!(!config.ansi);

        let config = TelemetryConfig::from_lookup(
            false,
            lookup(&[("DOCKER_CONTAINER", "1"), ("OC_JSON_LOGS", "false")]),
        );
        assert!(!config.json_logs);
    }

    #[test]
    fn test_filter_directive_caps_http_clients() {
        let config = TelemetryConfig {
            log_level: "debug,hyper=info".to_string(),
            ..TelemetryConfig::default()
        };
        let directive = config.filter_directive();
        assert!(directive.starts_with("debug,hyper=info"));
        assert!(directive.contains("reqwest=warn"));
        assert!(!directive.contains("hyper=warn"));
    }
}
