use serde::{Deserialize, Serialize};

use crate::crypto::{hash::sha256, Hash, Hashable};

/// Identity of a peer node: its transport protocol and address
/// (e.g. `{protocol: "http", addr: "http://127.0.0.1:5001"}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub protocol: String,
    pub addr: String,
}

impl Peer {
    pub fn new(protocol: impl Into<String>, addr: impl Into<String>) -> Self {
        Peer {
            protocol: protocol.into(),
            addr: addr.into(),
        }
    }
}

impl Hashable for Peer {
    // Plain byte concatenation, not a canonical JSON hash like
    // transactions/blocks - peers aren't signed, so there's no need for a
    // structured encoding here.
    fn hash(&self) -> Hash {
        let mut bytes = Vec::with_capacity(self.protocol.len() + self.addr.len());
        bytes.extend_from_slice(self.protocol.as_bytes());
        bytes.extend_from_slice(self.addr.as_bytes());
        sha256(&bytes)
    }
}
