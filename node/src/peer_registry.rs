//! Set of known peers keyed by identity hash. The node's own entry is
//! inserted at construction and tracked by `self_peer_hash` so gossip
//! iteration can skip it without a linear scan.

use std::collections::HashMap;
use std::sync::Mutex;

use ledger_common::crypto::{Hash, Hashable};
use ledger_common::peer::Peer;

pub struct PeerRegistry {
    peers: Mutex<HashMap<Hash, Peer>>,
    self_peer_hash: Hash,
}

impl PeerRegistry {
    /// `self_peer` is inserted immediately so the registry always contains
    /// at least the node's own entry.
    pub fn new(self_peer: Peer) -> Self {
        let self_peer_hash = self_peer.hash();
        let mut peers = HashMap::new();
        peers.insert(self_peer_hash, self_peer);
        PeerRegistry {
            peers: Mutex::new(peers),
            self_peer_hash,
        }
    }

    pub fn self_peer_hash(&self) -> Hash {
        self.self_peer_hash
    }

    /// Insert `peer` if its hash is not already present. Returns `true` if
    /// this was a new entry.
    pub fn insert(&self, peer: Peer) -> bool {
        let hash = peer.hash();
        let mut peers = self.peers.lock().unwrap();
        if peers.contains_key(&hash) {
            return false;
        }
        peers.insert(hash, peer);
        true
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.peers.lock().unwrap().contains_key(hash)
    }

    /// Snapshot of the full registry, self included, for `/join` responses.
    pub fn snapshot(&self) -> Vec<Peer> {
        self.peers.lock().unwrap().values().cloned().collect()
    }

    /// Snapshot of every peer except self, for outbound gossip iteration.
    pub fn others(&self) -> Vec<Peer> {
        self.peers
            .lock()
            .unwrap()
            .iter()
            .filter(|(hash, _)| **hash != self.self_peer_hash)
            .map(|(_, peer)| peer.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.peers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
