//! Revalidation settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::warn;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{CipherAlgorithm, PathCodec, PathCodecError, RevalidationWorkerConfig};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 200;
const DEFAULT_MAX_BACKOFF_MS: u64 = 5_000;
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Environment-driven settings for the path codec, client and worker.
///
/// Every field reads from a `REVALIDATION_*` variable; unset fields fall back
/// to the defaults exposed by the accessor methods.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REVALIDATION")]
pub struct RevalidationSettings {
    /// Pre-shared secret; its raw bytes are the cipher key.
    pub key: Option<String>,
    /// Cipher name such as `aes-256-cbc`.
    pub algorithm: Option<String>,
    /// Origin that serves `/api/revalidate` and the pages.
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub queue_capacity: Option<usize>,
}

/// Invalid revalidation configuration.
#[derive(Debug, thiserror::Error)]
pub enum RevalidationConfigError {
    #[error("REVALIDATION_KEY must be set in release builds")]
    MissingKey,
    #[error("invalid REVALIDATION_BASE_URL '{value}': {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Codec(#[from] PathCodecError),
}

impl RevalidationSettings {
    /// Configured cipher, defaulting to AES-256-CBC.
    ///
    /// # Errors
    ///
    /// Returns [`PathCodecError::UnsupportedAlgorithm`] for unknown names.
    pub fn algorithm(&self) -> Result<CipherAlgorithm, PathCodecError> {
        self.algorithm
            .as_deref()
            .map_or(Ok(CipherAlgorithm::default()), str::parse)
    }

    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`RevalidationConfigError::BaseUrl`] when the value is not a URL.
    pub fn base_url(&self) -> Result<Url, RevalidationConfigError> {
        let value = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(value).map_err(|source| RevalidationConfigError::BaseUrl {
            value: value.to_owned(),
            source,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY).max(1)
    }

    /// Retry policy for the background worker.
    #[must_use]
    pub fn worker_config(&self) -> RevalidationWorkerConfig {
        RevalidationWorkerConfig {
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            initial_backoff: Duration::from_millis(
                self.initial_backoff_ms.unwrap_or(DEFAULT_INITIAL_BACKOFF_MS),
            ),
            max_backoff: Duration::from_millis(
                self.max_backoff_ms.unwrap_or(DEFAULT_MAX_BACKOFF_MS),
            ),
        }
    }

    /// Build the shared path codec.
    ///
    /// Without a key, `allow_ephemeral` generates a random one (dev only):
    /// encrypted paths then only round-trip within this process.
    ///
    /// # Errors
    ///
    /// Returns [`RevalidationConfigError`] for a missing key when ephemeral
    /// keys are not allowed, an unknown algorithm or a key of the wrong length.
    pub fn path_codec(&self, allow_ephemeral: bool) -> Result<PathCodec, RevalidationConfigError> {
        let algorithm = self.algorithm()?;
        match self.key.as_deref() {
            Some(key) => Ok(PathCodec::new(algorithm, key.as_bytes())?),
            None if allow_ephemeral => {
                warn!(%algorithm, "REVALIDATION_KEY not set; using temporary key (dev only)");
                let mut key = Zeroizing::new(vec![0_u8; algorithm.key_len()]);
                OsRng.fill_bytes(&mut key);
                Ok(PathCodec::new(algorithm, &key)?)
            }
            None => Err(RevalidationConfigError::MissingKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "REVALIDATION_KEY",
        "REVALIDATION_ALGORITHM",
        "REVALIDATION_BASE_URL",
        "REVALIDATION_TIMEOUT_MS",
        "REVALIDATION_MAX_ATTEMPTS",
        "REVALIDATION_INITIAL_BACKOFF_MS",
        "REVALIDATION_MAX_BACKOFF_MS",
        "REVALIDATION_QUEUE_CAPACITY",
    ];

    fn load() -> RevalidationSettings {
        RevalidationSettings::load_from_iter([OsString::from("folio")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();
        assert_eq!(settings.algorithm().expect("algorithm"), CipherAlgorithm::Aes256Cbc);
        assert_eq!(
            settings.base_url().expect("url").as_str(),
            "http://localhost:8080/"
        );
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert_eq!(settings.queue_capacity(), 256);
        let worker = settings.worker_config();
        assert_eq!(worker.max_attempts, 3);
        assert_eq!(worker.initial_backoff, Duration::from_millis(200));
        assert_eq!(worker.max_backoff, Duration::from_secs(5));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("REVALIDATION_KEY", Some("0123456789abcdef".to_owned())),
            ("REVALIDATION_ALGORITHM", Some("aes-128-cbc".to_owned())),
            ("REVALIDATION_BASE_URL", Some("http://pages.internal:3000".to_owned())),
            ("REVALIDATION_TIMEOUT_MS", Some("1500".to_owned())),
            ("REVALIDATION_MAX_ATTEMPTS", Some("5".to_owned())),
            ("REVALIDATION_INITIAL_BACKOFF_MS", None),
            ("REVALIDATION_MAX_BACKOFF_MS", None),
            ("REVALIDATION_QUEUE_CAPACITY", Some("8".to_owned())),
        ]);

        let settings = load();
        let codec = settings.path_codec(false).expect("codec");
        assert_eq!(codec.algorithm(), CipherAlgorithm::Aes128Cbc);
        assert_eq!(settings.base_url().expect("url").port(), Some(3000));
        assert_eq!(settings.timeout(), Duration::from_millis(1500));
        assert_eq!(settings.worker_config().max_attempts, 5);
        assert_eq!(settings.queue_capacity(), 8);
    }

    #[rstest]
    fn missing_key_is_fatal_without_ephemeral_fallback() {
        let settings = RevalidationSettings::default();
        assert!(matches!(
            settings.path_codec(false),
            Err(RevalidationConfigError::MissingKey)
        ));
    }

    #[rstest]
    fn ephemeral_key_round_trips_in_process() {
        let codec = RevalidationSettings::default()
            .path_codec(true)
            .expect("ephemeral codec");
        let payload = codec.encrypt("/article/").expect("encrypt");
        assert_eq!(codec.decrypt(&payload).expect("decrypt"), "/article/");
    }

    #[rstest]
    #[case::short_key(Some("short"), None)]
    #[case::unknown_algorithm(Some("0123456789abcdef0123456789abcdef"), Some("des-cbc"))]
    fn invalid_codec_settings_are_rejected(
        #[case] key: Option<&str>,
        #[case] algorithm: Option<&str>,
    ) {
        let settings = RevalidationSettings {
            key: key.map(str::to_owned),
            algorithm: algorithm.map(str::to_owned),
            ..RevalidationSettings::default()
        };
        assert!(matches!(
            settings.path_codec(false),
            Err(RevalidationConfigError::Codec(_))
        ));
    }

    #[rstest]
    fn malformed_base_url_is_reported() {
        let settings = RevalidationSettings {
            base_url: Some("not a url".into()),
            ..RevalidationSettings::default()
        };
        assert!(matches!(
            settings.base_url(),
            Err(RevalidationConfigError::BaseUrl { .. })
        ));
    }
}
