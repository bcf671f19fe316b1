//! Deterministic JSON encoding used everywhere a hash or a signature is
//! computed over a struct. `serde_json::Map` is backed by a `BTreeMap`
//! unless the `preserve_order` feature is enabled (it isn't here), so
//! object keys always serialize in sorted order - this is what gives us
//! "canonical" bytes without hand-rolling a key-sorting pass.

use serde::Serialize;

pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    let as_value = serde_json::to_value(value).expect("canonical struct is always serializable");
    serde_json::to_vec(&as_value).expect("serde_json::Value always serializes")
}
