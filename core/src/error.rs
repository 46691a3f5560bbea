//! Error types for the courier client core.
//!
//! # Design
//! `MethodNotAllowed` gets a dedicated variant because it is the one
//! protocol error the server signals on purpose. All other unexpected
//! statuses land in `HttpError` with the raw status code and body for
//! debugging. Local failures (file I/O, PEM parsing, transport) keep their
//! own variants so callers can tell a broken setup from a broken server.

use std::fmt;
use std::io;

/// Errors returned by the courier core and its transports.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 405 for the route.
    MethodNotAllowed,

    /// The server returned a status other than the one the operation expects.
    HttpError { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// A local file could not be opened or read.
    Io(io::Error),

    /// The trust file held no usable certificate.
    Certificate(String),

    /// The request never produced a response (connect, TLS, timeout).
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MethodNotAllowed => write!(f, "method not allowed"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::Io(err) => write!(f, "i/o error: {err}"),
            ApiError::Certificate(msg) => write!(f, "certificate error: {msg}"),
            ApiError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ApiError {
    fn from(err: io::Error) -> Self {
        ApiError::Io(err)
    }
}
