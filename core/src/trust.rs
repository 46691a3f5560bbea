//! Trusted-root loading for the TLS client.
//!
//! The pool is read once at startup from a PEM bundle and stays immutable
//! afterwards; both the request transport and the handshake probe build their
//! root stores from the same pool.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use rustls::pki_types::CertificateDer;
use rustls::RootCertStore;

use crate::error::ApiError;

/// Set of certificates the client accepts as trust anchors.
#[derive(Debug, Clone)]
pub struct TrustPool {
    certificates: Vec<CertificateDer<'static>>,
}

impl TrustPool {
    /// Read and parse a PEM bundle from disk.
    ///
    /// Fails with `ApiError::Io` when the file cannot be read and with
    /// `ApiError::Certificate` when it holds no parsable certificate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let pool = Self::from_reader(&mut BufReader::new(file))?;
        tracing::debug!(path = %path.display(), count = pool.len(), "loaded trust pool");
        Ok(pool)
    }

    /// Parse a PEM bundle that is already in memory.
    pub fn from_pem(pem: &[u8]) -> Result<Self, ApiError> {
        Self::from_reader(&mut Cursor::new(pem))
    }

    fn from_reader(reader: &mut dyn std::io::BufRead) -> Result<Self, ApiError> {
        let certificates = rustls_pemfile::certs(reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::Certificate(format!("malformed PEM: {e}")))?;
        if certificates.is_empty() {
            return Err(ApiError::Certificate(
                "no certificate found in PEM data".to_string(),
            ));
        }
        Ok(Self { certificates })
    }

    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certificates
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Root store for a rustls client config.
    pub fn root_store(&self) -> Result<RootCertStore, ApiError> {
        let mut store = RootCertStore::empty();
        for cert in &self.certificates {
            store
                .add(cert.clone())
                .map_err(|e| ApiError::Certificate(e.to_string()))?;
        }
        Ok(store)
    }
}
