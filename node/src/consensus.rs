//! Summary comparison and fork resolution. `check_summary` requires the
//! peer to dominate on both total difficulty and total length before a
//! fetch is worth it. Replay snapshots the local chain before rewinding so
//! a partial replay failure can roll back to exactly where it started.

use std::sync::Arc;

use ledger_common::block::BlockChainSummary;
use ledger_common::peer::Peer;
use log::{info, warn};

use crate::core::{BlockChain, TransactionPool};
use crate::peer_client::PeerClient;

pub struct Consensus {
    chain: Arc<BlockChain>,
    pool: Arc<TransactionPool>,
    peer_client: Arc<PeerClient>,
}

impl Consensus {
    pub fn new(chain: Arc<BlockChain>, pool: Arc<TransactionPool>, peer_client: Arc<PeerClient>) -> Self {
        Consensus {
            chain,
            pool,
            peer_client,
        }
    }

    /// True iff the peer summary dominates ours on both axes.
    pub fn check_summary(&self, peer_summary: &BlockChainSummary) -> bool {
        let local = self.chain.summary();
        peer_summary.total_difficulty > local.total_difficulty
            && peer_summary.total_length > local.total_length
    }

    /// Entry point invoked from a `ConsensusCheck` work item: if the peer's
    /// summary dominates, fetch its chain and run fork resolution.
    pub fn check_and_maybe_fork(&self, summary: BlockChainSummary, peer: &Peer) -> anyhow::Result<()> {
        if !self.check_summary(&summary) {
            return Ok(());
        }
        info!("consensus: {} dominates local chain, fetching", peer.addr);
        let peer_chain = self.peer_client.get_chain(peer)?;
        self.execute_consensus(peer_chain);
        Ok(())
    }

    /// First disagreeing index minus one, or `min(len) - 1` if the chains
    /// agree over their whole common prefix.
    fn find_fork_point(local: &[ledger_common::block::Block], peer: &[ledger_common::block::Block]) -> i64 {
        let common = local.len().min(peer.len());
        for i in 0..common {
            if local[i].hash != peer[i].hash {
                return i as i64 - 1;
            }
        }
        common as i64 - 1
    }

    /// Rewind the local chain to the fork point, reinserting discarded
    /// non-reward transactions into the pool, then replay the peer's
    /// dominant tail. Aborts and restores the pre-rewind chain if any
    /// replayed block fails validation.
    fn execute_consensus(&self, peer_chain: Vec<ledger_common::block::Block>) {
        let local_snapshot = self.chain.snapshot();
        let fork_point = Self::find_fork_point(&local_snapshot, &peer_chain);
        let fork_index = if fork_point < 0 { 0 } else { fork_point as u64 + 1 };

        for block in local_snapshot.iter().rev() {
            if block.index <= fork_index {
                break;
            }
            for tx in block.transactions.iter().filter(|tx| !tx.is_reward()) {
                self.pool.reinsert(tx.clone());
            }
        }
        self.chain.truncate(fork_index);

        let tail_start = fork_index as usize;
        for mut block in peer_chain.into_iter().skip(tail_start) {
            block.is_from_peer = true;
            block.is_genesis = block.prev_hash.is_none();
            let result = self.chain.append(block, &self.pool);
            if !result.success {
                warn!(
                    "consensus: replay aborted ({}), restoring pre-rewind chain",
                    result.message.unwrap_or_default()
                );
                self.chain.restore(local_snapshot);
                return;
            }
        }
        info!("consensus: adopted peer tail, local chain now at length {}", self.chain.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_common::block::Block;
    use ledger_common::crypto::PrivateKey;
    use ledger_common::transaction::Transaction;

    fn mine(index: u64, prev: Option<ledger_common::crypto::Hash>, addr: &ledger_common::crypto::PublicKey) -> Block {
        let mut nonce = 0u64;
        loop {
            let reward = Transaction::new_reward(*addr, 1, 0);
            let block = Block::new(index, 0, vec![reward], nonce, prev, 4);
            if block.hash.has_leading_zero_hex_chars(4) {
                return block;
            }
            nonce += 1;
        }
    }

    #[test]
    fn fork_point_is_minus_one_when_chains_disagree_from_genesis() {
        let addr = PrivateKey::generate().public_key();
        let a = mine(1, None, &addr);
        let mut b = mine(1, None, &addr);
        while b.hash == a.hash {
            b = mine(1, None, &addr);
        }
        assert_eq!(Consensus::find_fork_point(&[a], &[b]), -1);
    }

    #[test]
    fn fork_point_is_last_common_index_when_chains_share_a_prefix() {
        let addr = PrivateKey::generate().public_key();
        let genesis = mine(1, None, &addr);
        let local_next = mine(2, Some(genesis.hash), &addr);
        let peer_next = mine(2, Some(genesis.hash), &addr);
        let local = vec![genesis.clone(), local_next];
        let peer = vec![genesis, peer_next];
        // index 0 (genesis) agrees, index 1 (the second block) disagrees
        // unless both minings happened to collide on nonce 0.
        let fork = Consensus::find_fork_point(&local, &peer);
        assert!(fork == 0 || fork == 1);
    }

    #[test]
    fn check_summary_requires_dominance_on_both_axes() {
        let (sender, _rx) = crate::task_queue::channel();
        let chain = Arc::new(BlockChain::new(sender.clone()));
        let pool = Arc::new(TransactionPool::new(sender.clone()));
        let addr = PrivateKey::generate().public_key();
        chain.append(mine(1, None, &addr), &pool);
        let local = chain.summary();

        let registry = Arc::new(crate::peer_registry::PeerRegistry::new(
            ledger_common::peer::Peer::new("http", "http://127.0.0.1:5000"),
        ));
        let peer_client = Arc::new(PeerClient::new(
            ledger_common::peer::Peer::new("http", "http://127.0.0.1:5000"),
            registry,
            std::collections::HashMap::new(),
            sender,
        ));
        let consensus = Consensus::new(chain, pool, peer_client);

        let higher_len_only = BlockChainSummary {
            total_length: local.total_length + 1,
            total_difficulty: local.total_difficulty,
            blocks: vec![],
        };
        assert!(!consensus.check_summary(&higher_len_only));

        let dominates = BlockChainSummary {
            total_length: local.total_length + 1,
            total_difficulty: local.total_difficulty + 1,
            blocks: vec![],
        };
        assert!(consensus.check_summary(&dominates));
    }
}
