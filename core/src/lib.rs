//! Synchronous client core for the courier demo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `CourierClient` is stateless: it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Trust loading, TLS name tables and the availability poller live here
//!   too; none of them own a socket.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod multipart;
pub mod tls;
pub mod trust;
pub mod types;
pub mod wait;

pub use client::CourierClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::MultipartForm;
pub use tls::{ConnectionState, TlsReport};
pub use trust::TrustPool;
pub use types::{Person, User};
pub use wait::{wait_until_available, Availability, Backoff};
