//! # Node Configuration
//!
//! The JSON document is read into [`RawConfig`], where every field is
//! optional, then resolved once into [`GlobalConfig`]. Resolution applies
//! defaults (logging each one) and rejects anything the node cannot run
//! with.
//!
//! ## Fatal Errors
//!
//! - unreadable file or invalid JSON
//! - missing/empty `api_params.api_url`, or a non-http(s) URL
//! - no credential (`private_key` and `seed_phrase` absent, `OC_PRIVATE_KEY`
//!   unset), or one that does not decode
//! - empty `topics`, a topic without `topic_id`/`inference_url`
//! - duplicate `topic_id`

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use shared_crypto::{CryptoError, Secp256k1KeyPair};
use shared_types::{
    TopicConfig, TopicId, TxCheckConfig, DEFAULT_INFERENCE_FETCH_RETRIES,
    DEFAULT_INFERENCE_FETCH_RETRY_FREQ_SECS, DEFAULT_NONCE_FETCH_FREQ_SECS,
    DEFAULT_TX_CHECK_FREQ_SECS, DEFAULT_TX_CHECK_RETRIES,
};
use thiserror::Error;
use tracing::warn;

/// Environment variable overriding `private_key`.
pub const PRIVATE_KEY_ENV: &str = "OC_PRIVATE_KEY";

/// Default config document location.
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

const DEFAULT_ADDRESS_PREFIX: &str = "allo";
const DEFAULT_RESTART_DELAY_SECS: u64 = 5;

/// Configuration errors. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read.
    #[error("failed to read `{path}`: {source}")]
    Read {
        /// Path tried.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid JSON for this shape.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        /// Path parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A required global field is absent or empty.
    #[error("`{0}` is missing or empty")]
    MissingField(&'static str),

    /// No credential is configured.
    #[error("no wallet credential: set `seed_phrase`, `private_key` or OC_PRIVATE_KEY")]
    MissingCredential,

    /// The private key or mnemonic does not decode.
    #[error("invalid wallet credential: {0}")]
    InvalidCredential(#[from] CryptoError),

    /// `topics` is absent or empty.
    #[error("there are no topics to run workers for")]
    NoTopics,

    /// A topic entry lacks a required field.
    #[error("topic entry #{index}: `{field}` is missing or empty")]
    TopicField {
        /// Position in `topics`.
        index: usize,
        /// Missing field.
        field: &'static str,
    },

    /// Two entries share a topic id.
    #[error("topic {topic_id} is configured more than once")]
    DuplicateTopic {
        /// Repeated id.
        topic_id: TopicId,
    },

    /// A URL is not absolute http(s).
    #[error("`{field}` is not an http(s) URL: {url}")]
    InvalidUrl {
        /// Field holding the URL.
        field: &'static str,
        /// Offending value.
        url: String,
    },
}

/// Config document as written by the operator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// Debug logging.
    #[serde(default)]
    pub debug: Option<bool>,
    /// Hex secp256k1 key.
    #[serde(default)]
    pub private_key: Option<String>,
    /// BIP-39 mnemonic, derived at `m/44'/118'/0'/0/0`.
    #[serde(default)]
    pub seed_phrase: Option<String>,
    /// Bech32 prefix.
    #[serde(default)]
    pub address_prefix: Option<String>,
    /// Simulated gas multiplier.
    #[serde(default)]
    pub gas_adjustment: Option<f64>,
    /// Fee denomination.
    #[serde(default)]
    pub fee_denom: Option<String>,
    /// Chain endpoint settings.
    #[serde(default)]
    pub api_params: Option<RawApiParams>,
    /// Topic entries.
    #[serde(default)]
    pub topics: Option<Vec<RawTopic>>,
    /// Restart policy.
    #[serde(default)]
    pub supervisor: Option<RawSupervisor>,
}

/// `api_params` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawApiParams {
    /// LCD base URL.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Status checks per transaction.
    #[serde(default)]
    pub tx_check_retries: Option<i64>,
    /// Seconds between status checks.
    #[serde(default)]
    pub tx_check_freq: Option<f64>,
}

/// One `topics` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTopic {
    /// Topic id.
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    /// Inference endpoint.
    #[serde(default)]
    pub inference_url: Option<String>,
    /// Seconds between nonce polls.
    #[serde(default)]
    pub nonce_fetch_freq: Option<f64>,
    /// Inference fetch attempts.
    #[serde(default)]
    pub inference_fetch_retries: Option<i64>,
    /// Seconds between inference fetch attempts.
    #[serde(default)]
    pub inference_fetch_retry_freq: Option<f64>,
}

/// `supervisor` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSupervisor {
    /// Restart crashed workers.
    #[serde(default)]
    pub restart_on_failure: Option<bool>,
    /// Seconds before a restart.
    #[serde(default)]
    pub restart_delay: Option<f64>,
}

/// Chain endpoint and fee settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainParams {
    /// LCD base URL.
    pub api_url: String,
    /// Confirmation budget.
    pub tx_check: TxCheckConfig,
    /// Bech32 prefix.
    pub address_prefix: String,
    /// Simulated gas multiplier.
    pub gas_adjustment: f64,
    /// Fee denomination.
    pub fee_denom: String,
}

/// Worker restart policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Restart a worker whose task ended abnormally.
    pub restart_on_failure: bool,
    /// Delay before a restart.
    pub restart_delay: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            restart_on_failure: true,
            restart_delay: Duration::from_secs(DEFAULT_RESTART_DELAY_SECS),
        }
    }
}

/// Fully resolved node configuration.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    /// Debug logging requested by the document.
    pub debug: bool,
    /// Wallet key.
    pub keypair: Arc<Secp256k1KeyPair>,
    /// Chain settings.
    pub chain: ChainParams,
    /// Topics in document order.
    pub topics: Vec<TopicConfig>,
    /// Restart policy.
    pub supervisor: SupervisorConfig,
}

impl GlobalConfig {
    /// Read and resolve `path`, honouring [`PRIVATE_KEY_ENV`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        RawConfig::load(path)?.resolve(std::env::var(PRIVATE_KEY_ENV).ok())
    }
}

impl RawConfig {
    /// Read and parse `path` without resolving it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Debug flag, `false` when absent.
    pub fn debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Apply defaults and validate.
    ///
    /// Credential precedence: `env_key`, then `private_key`, then
    /// `seed_phrase`.
    pub fn resolve(self, env_key: Option<String>) -> Result<GlobalConfig, ConfigError> {
        let api = self.api_params.unwrap_or_default();
        let api_url = non_empty(api.api_url).ok_or(ConfigError::MissingField("api_params.api_url"))?;
        check_url("api_params.api_url", &api_url)?;

        let key_hex = non_empty(env_key).or_else(|| non_empty(self.private_key));
        let keypair = match (key_hex, non_empty(self.seed_phrase)) {
            (Some(key_hex), _) => Secp256k1KeyPair::from_hex(&key_hex)?,
            (None, Some(phrase)) => Secp256k1KeyPair::from_mnemonic(&phrase)?,
            (None, None) => return Err(ConfigError::MissingCredential),
        };
        let keypair = Arc::new(keypair);

        let tx_check = TxCheckConfig {
            retries: positive_count(api.tx_check_retries, DEFAULT_TX_CHECK_RETRIES, "tx_check_retries", None),
            freq: positive_secs(api.tx_check_freq, DEFAULT_TX_CHECK_FREQ_SECS, "tx_check_freq", None),
        };

        let gas_adjustment = match self.gas_adjustment {
            Some(value) if value > 0.0 => value,
            _ => {
                warn!(
                    field = "gas_adjustment",
                    default = oc_03_tx_builder::DEFAULT_GAS_ADJUSTMENT,
                    "field missing or <= 0, using default"
                );
                oc_03_tx_builder::DEFAULT_GAS_ADJUSTMENT
            }
        };

        let chain = ChainParams {
            api_url,
            tx_check,
            address_prefix: non_empty(self.address_prefix)
                .unwrap_or_else(|| DEFAULT_ADDRESS_PREFIX.to_string()),
            gas_adjustment,
            fee_denom: non_empty(self.fee_denom)
                .unwrap_or_else(|| oc_03_tx_builder::DEFAULT_FEE_DENOM.to_string()),
        };

        let raw_topics = self.topics.unwrap_or_default();
        if raw_topics.is_empty() {
            return Err(ConfigError::NoTopics);
        }
        let mut seen = HashSet::new();
        let mut topics = Vec::with_capacity(raw_topics.len());
        for (index, raw) in raw_topics.into_iter().enumerate() {
            let topic = resolve_topic(index, raw)?;
            if !seen.insert(topic.topic_id) {
                return Err(ConfigError::DuplicateTopic {
                    topic_id: topic.topic_id,
                });
            }
            topics.push(topic);
        }

        let supervisor = self.supervisor.unwrap_or_default();
        let supervisor = SupervisorConfig {
            restart_on_failure: supervisor.restart_on_failure.unwrap_or(true),
            restart_delay: match supervisor.restart_delay {
                Some(secs) if secs > 0.0 => Duration::from_secs_f64(secs),
                _ => Duration::from_secs(DEFAULT_RESTART_DELAY_SECS),
            },
        };

        Ok(GlobalConfig {
            debug: self.debug.unwrap_or(false),
            keypair,
            chain,
            topics,
            supervisor,
        })
    }
}

fn resolve_topic(index: usize, raw: RawTopic) -> Result<TopicConfig, ConfigError> {
    let topic_id = raw.topic_id.ok_or(ConfigError::TopicField {
        index,
        field: "topic_id",
    })?;
    let inference_url = non_empty(raw.inference_url).ok_or(ConfigError::TopicField {
        index,
        field: "inference_url",
    })?;
    check_url("inference_url", &inference_url)?;

    let topic = Some(topic_id);
    Ok(TopicConfig {
        topic_id,
        inference_url,
        nonce_fetch_freq: positive_secs(
            raw.nonce_fetch_freq,
            DEFAULT_NONCE_FETCH_FREQ_SECS,
            "nonce_fetch_freq",
            topic,
        ),
        inference_fetch_retries: positive_count(
            raw.inference_fetch_retries,
            DEFAULT_INFERENCE_FETCH_RETRIES,
            "inference_fetch_retries",
            topic,
        ),
        inference_fetch_retry_freq: positive_secs(
            raw.inference_fetch_retry_freq,
            DEFAULT_INFERENCE_FETCH_RETRY_FREQ_SECS,
            "inference_fetch_retry_freq",
            topic,
        ),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field,
            url: url.to_string(),
        }),
    }
}

fn positive_count(
    value: Option<i64>,
    default: u32,
    field: &'static str,
    topic_id: Option<TopicId>,
) -> u32 {
    match value.and_then(|v| u32::try_from(v).ok()) {
        Some(v) if v > 0 => v,
        _ => {
            warn!(field, topic_id, default, "field missing or <= 0, using default");
            default
        }
    }
}

fn positive_secs(
    value: Option<f64>,
    default_secs: u64,
    field: &'static str,
    topic_id: Option<TopicId>,
) -> Duration {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Duration::from_secs_f64(v),
        _ => {
            warn!(field, topic_id, default_secs, "field missing or <= 0, using default");
            Duration::from_secs(default_secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KEY: &str = "1111111111111111111111111111111111111111111111111111111111111111";

    fn parse(json: &str) -> RawConfig {
        serde_json::from_str(json).unwrap()
    }

    fn minimal() -> RawConfig {
        parse(&format!(
            r#"{{
                "private_key": "{KEY}",
                "api_params": {{ "api_url": "https://lcd.example.org" }},
                "topics": [{{ "topic_id": 1, "inference_url": "http://localhost:8000/inference/1" }}]
            }}"#
        ))
    }

    #[test]
    fn test_defaults_applied() {
        let config = minimal().resolve(None).unwrap();

        assert!(!config.debug);
        assert_eq!(config.chain.tx_check, TxCheckConfig::default());
        assert_eq!(config.chain.address_prefix, "allo");
        assert_eq!(config.chain.fee_denom, "uallo");
        assert_eq!(config.chain.gas_adjustment, 1.5);
        assert_eq!(config.topics, vec![TopicConfig::new(1, "http://localhost:8000/inference/1")]);
        assert_eq!(config.supervisor, SupervisorConfig::default());
    }

    #[test]
    fn test_non_positive_values_fall_back() {
        let config = parse(&format!(
            r#"{{
                "private_key": "{KEY}",
                "gas_adjustment": -2,
                "api_params": {{ "api_url": "https://lcd", "tx_check_retries": 0, "tx_check_freq": 1.5 }},
                "topics": [{{
                    "topic_id": 3,
                    "inference_url": "http://inference",
                    "nonce_fetch_freq": -1,
                    "inference_fetch_retries": 7,
                    "inference_fetch_retry_freq": 0
                }}]
            }}"#
        ))
        .resolve(None)
        .unwrap();

        assert_eq!(config.chain.gas_adjustment, 1.5);
        assert_eq!(config.chain.tx_check.retries, 10);
        assert_eq!(config.chain.tx_check.freq, Duration::from_millis(1500));
        let topic = &config.topics[0];
        assert_eq!(topic.nonce_fetch_freq, Duration::from_secs(5));
        assert_eq!(topic.inference_fetch_retries, 7);
        assert_eq!(topic.inference_fetch_retry_freq, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_topic_fields_are_fatal() {
        let mut raw = minimal();
        raw.topics = Some(vec![RawTopic {
            topic_id: Some(2),
            ..Default::default()
        }]);
        assert!(matches!(
            raw.resolve(None),
            Err(ConfigError::TopicField {
                index: 0,
                field: "inference_url"
            })
        ));

        let mut raw = minimal();
        raw.topics = Some(vec![RawTopic {
            inference_url: Some("http://x".into()),
            ..Default::default()
        }]);
        assert!(matches!(
            raw.resolve(None),
            Err(ConfigError::TopicField {
                field: "topic_id",
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_topics_rejected() {
        let mut raw = minimal();
        let topic = RawTopic {
            topic_id: Some(4),
            inference_url: Some("http://x".into()),
            ..Default::default()
        };
        raw.topics = Some(vec![topic.clone(), topic]);

        assert!(matches!(
            raw.resolve(None),
            Err(ConfigError::DuplicateTopic { topic_id: 4 })
        ));
    }

    #[test]
    fn test_global_requirements() {
        let mut raw = minimal();
        raw.topics = Some(Vec::new());
        assert!(matches!(raw.resolve(None), Err(ConfigError::NoTopics)));

        let mut raw = minimal();
        raw.private_key = None;
        assert!(matches!(raw.resolve(None), Err(ConfigError::MissingCredential)));

        let mut raw = minimal();
        raw.api_params = Some(RawApiParams {
            api_url: Some("lcd.example.org".into()),
            ..Default::default()
        });
        assert!(matches!(
            raw.resolve(None),
            Err(ConfigError::InvalidUrl {
                field: "api_params.api_url",
                ..
            })
        ));
    }

    #[test]
    fn test_env_key_overrides_document() {
        let mut raw = minimal();
        raw.private_key = Some("not hex".into());
        let env_key = "2222222222222222222222222222222222222222222222222222222222222222";

        let config = raw.resolve(Some(env_key.to_string())).unwrap();

        let expected = Secp256k1KeyPair::from_hex(env_key).unwrap();
        assert_eq!(config.keypair.public_key(), expected.public_key());
    }

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
                            abandon abandon abandon abandon abandon about";

    #[test]
    fn test_seed_phrase_credential() {
        let mut raw = minimal();
        raw.private_key = None;
        raw.seed_phrase = Some(MNEMONIC.into());

        let config = raw.resolve(None).unwrap();

        let expected = Secp256k1KeyPair::from_mnemonic(MNEMONIC).unwrap();
        assert_eq!(config.keypair.public_key(), expected.public_key());
    }

    #[test]
    fn test_private_key_wins_over_seed_phrase() {
        let mut raw = minimal();
        raw.seed_phrase = Some(MNEMONIC.into());

        let config = raw.resolve(None).unwrap();

        let expected = Secp256k1KeyPair::from_hex(KEY).unwrap();
        assert_eq!(config.keypair.public_key(), expected.public_key());
    }

    #[test]
    fn test_bad_seed_phrase_is_fatal() {
        let mut raw = minimal();
        raw.private_key = None;
        raw.seed_phrase = Some("abandon about".into());

        assert!(matches!(
            raw.resolve(None),
            Err(ConfigError::InvalidCredential(CryptoError::InvalidMnemonic(_)))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"debug": true, "private_key": "{KEY}",
                 "api_params": {{"api_url": "http://localhost:1317"}},
                 "topics": [{{"topic_id": 9, "inference_url": "http://localhost:8000"}}],
                 "supervisor": {{"restart_on_failure": false, "restart_delay": 2}}}}"#
        )
        .unwrap();

        let config = RawConfig::load(file.path()).unwrap().resolve(None).unwrap();

        assert!(config.debug);
        assert_eq!(config.topics[0].topic_id, 9);
        assert!(!config.supervisor.restart_on_failure);
        assert_eq!(config.supervisor.restart_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = RawConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
