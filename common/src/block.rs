use serde::{Deserialize, Serialize};

use crate::canonical::to_canonical_bytes;
use crate::crypto::{hash::sha256, Hash, Hashable};
use crate::transaction::Transaction;
use crate::time::TimestampSeconds;

/// Fields that participate in a block's hash: transactions are reduced to
/// their own hashes rather than embedded whole.
#[derive(Serialize)]
struct HashPayload<'a> {
    index: u64,
    timestamp: TimestampSeconds,
    transactions: Vec<Hash>,
    nonce: u64,
    prev_hash: &'a Option<Hash>,
    difficulty: u32,
}

/// A single block in the chain. `hash` is computed once at construction and
/// never recomputed automatically - callers that need to check it against
/// the current fields call [`Block::compute_hash`] explicitly (this is what
/// `BlockChain::valid_new_block` does for an incoming block).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: TimestampSeconds,
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub prev_hash: Option<Hash>,
    pub difficulty: u32,
    pub hash: Hash,

    /// Set when this block arrived over the network rather than being
    /// locally mined.
    #[serde(skip, default)]
    pub is_from_peer: bool,
    /// Set on the bootstrap genesis block only.
    #[serde(skip, default)]
    pub is_genesis: bool,
}

impl Block {
    /// Construct a block and compute its hash once from the given fields.
    /// Used by the miner collaborator (mining loop varies `nonce` until the
    /// hash satisfies PoW) and by genesis bootstrap.
    pub fn new(
        index: u64,
        timestamp: TimestampSeconds,
        transactions: Vec<Transaction>,
        nonce: u64,
        prev_hash: Option<Hash>,
        difficulty: u32,
    ) -> Self {
        let mut block = Block {
            index,
            timestamp,
            transactions,
            nonce,
            prev_hash,
            difficulty,
            hash: Hash::zero(),
            is_from_peer: false,
            is_genesis: false,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the hash from the current field values. Used to verify
    /// that `self.hash` hasn't been tampered with in transit.
    pub fn compute_hash(&self) -> Hash {
        let payload = HashPayload {
            index: self.index,
            timestamp: self.timestamp,
            transactions: self.transactions.iter().map(|tx| tx.hash()).collect(),
            nonce: self.nonce,
            prev_hash: &self.prev_hash,
            difficulty: self.difficulty,
        };
        sha256(&to_canonical_bytes(&payload))
    }

    pub fn reward_transaction(&self) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.is_reward())
    }

    pub fn to_summary_entry(&self) -> BlockSummaryEntry {
        BlockSummaryEntry {
            hash: self.hash,
            prev_hash: self.prev_hash,
        }
    }
}

impl Hashable for Block {
    fn hash(&self) -> Hash {
        self.hash
    }
}

/// Compact per-block entry used in a [`BlockChainSummary`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockSummaryEntry {
    pub hash: Hash,
    pub prev_hash: Option<Hash>,
}

/// Compact chain metadata exchanged between peers to decide whether it's
/// worth fetching a peer's full chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockChainSummary {
    pub total_length: usize,
    pub total_difficulty: u64,
    pub blocks: Vec<BlockSummaryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;

    fn reward_tx() -> Transaction {
        let key = PrivateKey::generate();
        Transaction::new_reward(key.public_key(), 1, 0)
    }

    #[test]
    fn hash_is_stable_after_construction() {
        let block = Block::new(1, 0, vec![reward_tx()], 0, None, 4);
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn mutating_a_hashed_field_changes_the_hash() {
        let mut block = Block::new(1, 0, vec![reward_tx()], 0, None, 4);
        let original = block.hash;
        block.nonce += 1;
        assert_ne!(block.compute_hash(), original);
    }

    #[test]
    fn transient_flags_do_not_affect_hash() {
        let block = Block::new(1, 0, vec![reward_tx()], 0, None, 4);
        let mut with_flags = block.clone();
        with_flags.is_from_peer = true;
        with_flags.is_genesis = true;
        assert_eq!(block.compute_hash(), with_flags.compute_hash());
    }
}
