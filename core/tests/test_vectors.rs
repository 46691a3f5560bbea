//! Verify the TLS name tables against JSON test vectors stored in `test-vectors/`.
//!
//! Each case pairs a numeric identifier as it appears on the wire with the
//! label the client prints for it.

use courier_core::tls::{cipher_suite_name, protocol_version_name};

fn cases<'a>(vectors: &'a serde_json::Value, key: &str) -> Vec<(u16, &'a str)> {
    vectors[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|case| {
            (
                case["id"].as_u64().unwrap() as u16,
                case["name"].as_str().unwrap(),
            )
        })
        .collect()
}

fn vectors() -> serde_json::Value {
    let raw = include_str!("../../test-vectors/tls_names.json");
    serde_json::from_str(raw).unwrap()
}

#[test]
fn protocol_version_vectors() {
    let vectors = vectors();
    for (id, name) in cases(&vectors, "protocol_versions") {
        assert_eq!(protocol_version_name(id), name, "version {id:#06x}");
    }
}

#[test]
fn cipher_suite_vectors() {
    let vectors = vectors();
    for (id, name) in cases(&vectors, "cipher_suites") {
        assert_eq!(cipher_suite_name(id), name, "suite {id:#06x}");
    }
}
