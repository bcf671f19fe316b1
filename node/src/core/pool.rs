//! The mempool. [`TransactionPool::add`] runs a five-step admission
//! sequence (repeat, forged reward, insufficient balance, bad signature,
//! then admit); `snapshot_for_mining` sweeps confirmed transactions and
//! appends a freshly minted reward for the assembling miner.

use std::sync::Mutex;

use ledger_common::crypto::{Hashable, PublicKey};
use ledger_common::error::{ExecuteResult, TxError};
use ledger_common::time::current_timestamp;
use ledger_common::transaction::Transaction;
use log::info;

use crate::core::blockchain::BlockChain;
use crate::task_queue::{TaskSender, WorkItem};

pub struct TransactionPool {
    pending: Mutex<Vec<Transaction>>,
    task_sender: TaskSender,
}

impl TransactionPool {
    pub fn new(task_sender: TaskSender) -> Self {
        TransactionPool {
            pending: Mutex::new(Vec::new()),
            task_sender,
        }
    }

    /// Admission sequence, first-failure-wins:
    /// repeat -> forged reward -> insufficient balance -> bad signature.
    ///
    /// The balance check needs `chain`'s lock; the mandatory lock order is
    /// `chain_lock -> pool_lock`, so the pool lock is only ever held for
    /// the short duplicate-checks and the final push, never across the
    /// `chain.balance` call. The duplicate check runs again right before
    /// the push to close the window the two separate pool-lock sections
    /// open up.
    pub fn add(&self, tx: Transaction, chain: &BlockChain) -> ExecuteResult {
        {
            let pending = self.pending.lock().unwrap();
            if pending.iter().any(|existing| existing.hash() == tx.hash()) {
                return ExecuteResult::err(TxError::Repeat, "transaction already in pool");
            }
        }
        if tx.saddr.is_none() && !tx.is_from_peer {
            return ExecuteResult::err(TxError::SaddrNone, "forged system reward");
        }
        if let Some(saddr) = &tx.saddr {
            if chain.balance(saddr) < tx.amount as i64 {
                return ExecuteResult::err(TxError::InsufficientBalance, "sender balance too low");
            }
        }
        if !tx.verify_sign() {
            return ExecuteResult::err(TxError::InvalidSignature, "signature does not verify");
        }

        let from_peer = tx.is_from_peer;
        {
            let mut pending = self.pending.lock().unwrap();
            if pending.iter().any(|existing| existing.hash() == tx.hash()) {
                return ExecuteResult::err(TxError::Repeat, "transaction already in pool");
            }
            pending.push(tx.clone());
        }

        info!("pool: admitted tx {}", tx.hash());
        if !from_peer {
            let _ = self.task_sender.send(WorkItem::BroadcastTx(tx));
        }
        ExecuteResult::ok("transaction admitted")
    }

    /// For every transaction in `block`, mark the matching pool entry (by
    /// hash) confirmed. A transaction can be confirmed without having ever
    /// passed through this pool (e.g. replayed from a peer) - that's fine,
    /// there's simply nothing to mark.
    pub fn mark_confirmed(&self, block: &ledger_common::block::Block) {
        let mut pending = self.pending.lock().unwrap();
        for block_tx in &block.transactions {
            if let Some(pool_tx) = pending.iter_mut().find(|t| t.hash() == block_tx.hash()) {
                pool_tx.is_confirmed = true;
            }
        }
    }

    /// Drop every confirmed transaction, keeping only what's still pending.
    pub fn sweep(&self) {
        self.pending.lock().unwrap().retain(|tx| !tx.is_confirmed);
    }

    /// Sweep, then - if anything remains pending - append a freshly minted
    /// reward to `miner_addr` and return the whole snapshot. The reward is
    /// never added to the pool itself; it lives only in the returned
    /// snapshot and whatever block the miner assembles from it.
    pub fn snapshot_for_mining(&self, miner_addr: PublicKey, reward: u64) -> Vec<Transaction> {
        self.sweep();
        let pending = self.pending.lock().unwrap();
        if pending.is_empty() {
            return Vec::new();
        }
        let mut snapshot = pending.clone();
        drop(pending);
        snapshot.push(Transaction::new_reward(miner_addr, reward, current_timestamp()));
        snapshot
    }

    /// The only path by which a `saddr = None` transaction legitimately
    /// enters a local pool without having arrived from a peer.
    pub fn airdrop(&self, raddr: PublicKey, amount: u64) {
        let tx = Transaction::new_reward(raddr, amount, current_timestamp());
        self.pending.lock().unwrap().push(tx.clone());
        let _ = self.task_sender.send(WorkItem::BroadcastTx(tx));
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.pending.lock().unwrap().clone()
    }

    /// Reinsert transactions discarded from a rewound chain tail; used by
    /// consensus replay. Non-reward only - rewards never re-enter the pool.
    pub fn reinsert(&self, tx: Transaction) {
        if tx.is_reward() {
            return;
        }
        let mut pending = self.pending.lock().unwrap();
        if !pending.iter().any(|existing| existing.hash() == tx.hash()) {
            pending.push(tx);
        }
    }
}
