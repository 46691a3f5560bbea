//! Client settings read from the environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://localhost:9876";
pub const DEFAULT_CERT: &str = "./certificate/cert.pem";
pub const DEFAULT_FILE: &str = "./file.txt";
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub url: String,
    /// PEM bundle of trusted roots.
    pub cert: PathBuf,
    /// File attached by the "send file" command.
    pub file: PathBuf,
    /// How long to wait for the server at startup.
    pub wait: Duration,
    /// Bound on each individual request.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.key, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl ClientSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seconds = |key: &'static str, default: Duration| match lookup(key) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError { key, value }),
        };

        let settings = Self {
            url: lookup("COURIER_URL").unwrap_or_else(|| DEFAULT_URL.to_string()),
            cert: lookup("COURIER_CERT")
                .unwrap_or_else(|| DEFAULT_CERT.to_string())
                .into(),
            file: lookup("COURIER_FILE")
                .unwrap_or_else(|| DEFAULT_FILE.to_string())
                .into(),
            wait: seconds("COURIER_WAIT_SECS", DEFAULT_WAIT)?,
            timeout: seconds("COURIER_TIMEOUT_SECS", DEFAULT_TIMEOUT)?,
        };
        // A zero socket timeout is rejected by the OS; it is never "no limit".
        if settings.timeout.is_zero() {
            return Err(ConfigError {
                key: "COURIER_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_tls_server() {
        let s = ClientSettings::from_lookup(|_| None).unwrap();
        assert_eq!(s.url, "https://localhost:9876");
        assert_eq!(s.cert, PathBuf::from("./certificate/cert.pem"));
        assert_eq!(s.file, PathBuf::from("./file.txt"));
        assert_eq!(s.wait, Duration::from_secs(5));
        assert_eq!(s.timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_are_applied() {
        let s = ClientSettings::from_lookup(|key| match key {
            "COURIER_URL" => Some("http://127.0.0.1:80".to_string()),
            "COURIER_WAIT_SECS" => Some(" 1 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(s.url, "http://127.0.0.1:80");
        assert_eq!(s.wait, Duration::from_secs(1));
    }

    #[test]
    fn bad_duration_names_the_key() {
        let err = ClientSettings::from_lookup(|key| {
            (key == "COURIER_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert_eq!(err.key, "COURIER_TIMEOUT_SECS");
        assert_eq!(err.value, "soon");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientSettings::from_lookup(|key| {
            (key == "COURIER_TIMEOUT_SECS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert_eq!(err.key, "COURIER_TIMEOUT_SECS");
    }

    #[test]
    fn zero_and_huge_waits_are_accepted() {
        let s = ClientSettings::from_lookup(|key| {
            (key == "COURIER_WAIT_SECS").then(|| "0".to_string())
        })
        .unwrap();
        assert_eq!(s.wait, Duration::ZERO);

        let max = u64::MAX.to_string();
        let s = ClientSettings::from_lookup(|key| (key == "COURIER_WAIT_SECS").then(|| max.clone())).unwrap();
        assert_eq!(s.wait, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn default_log_filter_is_info() {
        assert_eq!(DEFAULT_LOG_FILTER, "info");
    }
}
