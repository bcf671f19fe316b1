//! The append-only, in-memory block sequence. [`BlockChain::valid_new_block`]
//! checks hash recomputation, then proof of work, then transaction
//! well-formedness, then chain linkage (prev_hash and index), first
//! failure wins.

use std::sync::Mutex;

use ledger_common::block::{Block, BlockChainSummary};
use ledger_common::crypto::{Hashable, PublicKey};
use ledger_common::error::{BlockError, ExecuteResult};
use log::info;

use crate::core::pool::TransactionPool;
use crate::task_queue::{TaskSender, WorkItem};

/// The replicated ledger. Holds its own lock; `append` is the only mutating
/// entry point and is expected to be called exclusively from the worker
/// thread, though the lock makes it safe from anywhere.
pub struct BlockChain {
    blocks: Mutex<Vec<Block>>,
    task_sender: TaskSender,
}

impl BlockChain {
    pub fn new(task_sender: TaskSender) -> Self {
        BlockChain {
            blocks: Mutex::new(Vec::new()),
            task_sender,
        }
    }

    /// Validate and append `block`. On success, marks any pool transactions
    /// it contains as confirmed (lock order `chain_lock -> pool_lock`) and,
    /// unless `block.is_from_peer`, enqueues a broadcast.
    pub fn append(&self, block: Block, pool: &TransactionPool) -> ExecuteResult {
        let mut blocks = self.blocks.lock().unwrap();
        if let Err(e) = Self::valid_new_block(&blocks, &block) {
            return ExecuteResult::err(e, e.to_string());
        }
        let from_peer = block.is_from_peer;
        blocks.push(block.clone());
        drop(blocks);

        pool.mark_confirmed(&block);
        info!("chain: appended block {} (hash {})", block.index, block.hash);

        if !from_peer {
            let _ = self.task_sender.send(WorkItem::BroadcastBlock(block));
        }
        ExecuteResult::ok("block appended")
    }

    pub fn last(&self) -> Option<Block> {
        self.blocks.lock().unwrap().last().cloned()
    }

    /// `+amount` on every credit to `addr`, `-amount` on every debit from it.
    /// A signed accumulator: admission control keeps this non-negative in
    /// practice, but the type itself does not forbid it.
    pub fn balance(&self, addr: &PublicKey) -> i64 {
        let blocks = self.blocks.lock().unwrap();
        let mut total: i64 = 0;
        for block in blocks.iter() {
            for tx in &block.transactions {
                if &tx.raddr == addr {
                    total += tx.amount as i64;
                }
                if tx.saddr.as_ref() == Some(addr) {
                    total -= tx.amount as i64;
                }
            }
        }
        total
    }

    pub fn summary(&self) -> BlockChainSummary {
        let blocks = self.blocks.lock().unwrap();
        BlockChainSummary {
            total_length: blocks.len(),
            total_difficulty: blocks.iter().map(|b| b.difficulty as u64).sum(),
            blocks: blocks.iter().map(Block::to_summary_entry).collect(),
        }
    }

    /// Full chain contents, e.g. for the `/blockchain` read endpoint and for
    /// a peer fetching a dominant summary's tail.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every block with `index > from_index`, keeping the prefix.
    /// Used by consensus to rewind to a fork point before replaying a
    /// peer's dominant tail.
    pub fn truncate(&self, from_index: u64) {
        let mut blocks = self.blocks.lock().unwrap();
        blocks.retain(|b| b.index <= from_index);
    }

    /// Replace the entire block sequence wholesale. Used only by consensus
    /// to roll back to a pre-rewind snapshot when replay fails partway
    /// through.
    pub fn restore(&self, blocks: Vec<Block>) {
        *self.blocks.lock().unwrap() = blocks;
    }

    /// First-failure-wins validation, in order: hash recomputation, PoW,
    /// transaction well-formedness, chain linkage.
    fn valid_new_block(blocks: &[Block], block: &Block) -> Result<(), BlockError> {
        if block.compute_hash() != block.hash {
            return Err(BlockError::InvalidHash);
        }
        if block.difficulty != ledger_common::config::POW_DIFFICULTY {
            return Err(BlockError::InvalidPow);
        }
        if !block.hash.has_leading_zero_hex_chars(ledger_common::config::POW_DIFFICULTY) {
            return Err(BlockError::InvalidPow);
        }

        let is_genesis = block.index == 1;
        if block.transactions.is_empty() {
            return Err(BlockError::InvalidTx);
        }
        let reward_count = block.transactions.iter().filter(|tx| tx.is_reward()).count();
        if !is_genesis && reward_count != 1 {
            return Err(BlockError::InvalidTx);
        }
        for tx in block.transactions.iter().filter(|tx| !tx.is_reward()) {
            if !tx.verify_sign() {
                return Err(BlockError::InvalidTx);
            }
        }

        // Chain linkage: prev_hash against the current tail, plus an
        // explicit index check so a block can't skip ahead and leave a gap.
        match blocks.last() {
            Some(last) => {
                if block.prev_hash != Some(last.hash()) {
                    return Err(BlockError::InvalidPrevHash);
                }
                if block.index != last.index + 1 {
                    return Err(BlockError::InvalidPrevHash);
                }
            }
            None => {
                if block.prev_hash.is_some() || block.index != 1 {
                    return Err(BlockError::InvalidPrevHash);
                }
            }
        }

        Ok(())
    }
}
