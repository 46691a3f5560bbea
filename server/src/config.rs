//! Server settings read from the environment.

use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:9876";
pub const DEFAULT_CERT: &str = "./certificate/server.pem";
pub const DEFAULT_KEY: &str = "./certificate/server.key";
pub const DEFAULT_MAX_UPLOAD: usize = 16 * 1024 * 1024;

/// Certificate chain and private key served during the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub addr: String,
    /// `None` serves plain HTTP.
    pub tls: Option<TlsPaths>,
    pub max_upload: usize,
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

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("COURIER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());

        let plaintext = match lookup("COURIER_PLAINTEXT") {
            None => false,
            Some(value) => parse_flag(&value).ok_or(ConfigError {
                key: "COURIER_PLAINTEXT",
                value,
            })?,
        };
        let tls = (!plaintext).then(|| TlsPaths {
            cert: lookup("COURIER_TLS_CERT")
                .unwrap_or_else(|| DEFAULT_CERT.to_string())
                .into(),
            key: lookup("COURIER_TLS_KEY")
                .unwrap_or_else(|| DEFAULT_KEY.to_string())
                .into(),
        });

        let max_upload = match lookup("COURIER_MAX_UPLOAD") {
            None => DEFAULT_MAX_UPLOAD,
            Some(value) => value.parse::<usize>().map_err(|_| ConfigError {
                key: "COURIER_MAX_UPLOAD",
                value,
            })?,
        };

        Ok(Self {
            addr,
            tls,
            max_upload,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
