//! Domain DTOs exchanged with the courier server.
//!
//! # Design
//! These types mirror the server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// The record attached to a file upload as the `Person` form field.
///
/// Serialized with capitalized keys (`{"Name":..,"Age":..}`), which is the
/// wire shape the upload route expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    pub name: String,
    pub age: i64,
}

/// Payload for `POST /user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub first: String,
    pub last: String,
}
