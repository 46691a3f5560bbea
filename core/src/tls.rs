//! Human-readable view of a negotiated TLS session.
//!
//! The lookup tables are closed: they cover the protocol versions and cipher
//! suites a modern TLS stack negotiates, and everything else reads "Unknown".

use std::fmt;

use rustls::pki_types::CertificateDer;
use x509_parser::prelude::*;

const UNKNOWN: &str = "Unknown";

const PROTOCOL_VERSIONS: &[(u16, &str)] = &[
    (0x0304, "TLS 1.3"),
    (0x0303, "TLS 1.2"),
    (0x0302, "TLS 1.1"),
    (0x0301, "TLS 1.0"),
];

const CIPHER_SUITES: &[(u16, &str)] = &[
    (0x1301, "TLS_AES_128_GCM_SHA256"),
    (0x1302, "TLS_AES_256_GCM_SHA384"),
    (0x1303, "TLS_CHACHA20_POLY1305_SHA256"),
    (0xc02b, "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256"),
    (0xc02c, "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384"),
    (0xc02f, "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256"),
    (0xc030, "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"),
    (0x009c, "TLS_RSA_WITH_AES_128_GCM_SHA256"),
    (0x009d, "TLS_RSA_WITH_AES_256_GCM_SHA384"),
];

fn lookup(table: &[(u16, &'static str)], id: u16) -> &'static str {
    table
        .iter()
        .find(|(code, _)| *code == id)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN)
}

pub fn protocol_version_name(version: u16) -> &'static str {
    lookup(PROTOCOL_VERSIONS, version)
}

pub fn cipher_suite_name(suite: u16) -> &'static str {
    lookup(CIPHER_SUITES, suite)
}

/// Snapshot of a completed handshake, captured right after a request.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    pub protocol_version: Option<u16>,
    pub cipher_suite: Option<u16>,
    pub peer_certificates: Vec<CertificateDer<'static>>,
}

/// Organization names from the issuer of a DER certificate.
///
/// Returns `None` when the certificate cannot be parsed.
pub fn issuer_organization(der: &[u8]) -> Option<Vec<String>> {
    let (_, cert) = parse_x509_certificate(der).ok()?;
    let names = cert
        .issuer()
        .iter_organization()
        .filter_map(|attr| attr.as_str().ok())
        .map(str::to_string)
        .collect();
    Some(names)
}

/// What gets printed for the "TLS details" menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsReport {
    /// The exchange was not secured (or never happened).
    Missing,
    Negotiated {
        version: &'static str,
        cipher_suite: &'static str,
        /// Issuer organization of the leaf certificate, if the peer sent one.
        issuer_organization: Option<String>,
    },
}

impl TlsReport {
    pub fn from_state(state: Option<&ConnectionState>) -> Self {
        let Some(state) = state else {
            return TlsReport::Missing;
        };
        let issuer_organization = state.peer_certificates.first().map(|leaf| {
            match issuer_organization(leaf.as_ref()) {
                Some(names) => names.join(", "),
                None => UNKNOWN.to_string(),
            }
        });
        TlsReport::Negotiated {
            version: state.protocol_version.map_or(UNKNOWN, protocol_version_name),
            cipher_suite: state.cipher_suite.map_or(UNKNOWN, cipher_suite_name),
            issuer_organization,
        }
    }
}

impl fmt::Display for TlsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsReport::Missing => write!(f, "No TLS connection state found"),
            TlsReport::Negotiated {
                version,
                cipher_suite,
                issuer_organization,
            } => {
                writeln!(f, "TLS Version: {version}")?;
                write!(f, "CipherSuite: {cipher_suite}")?;
                if let Some(org) = issuer_organization {
                    write!(f, "\nIssuer Organization: {org}")?;
                }
                Ok(())
            }
        }
    }
}
