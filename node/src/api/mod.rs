//! Transport-agnostic endpoint logic. Every handler here takes a
//! `&NodeContext` and plain data; `api::http` is the only place that knows
//! about `actix-web` request/response types.

pub mod http;

use ledger_common::block::{Block, BlockChainSummary};
use ledger_common::crypto::PublicKey;
use ledger_common::error::ExecuteResult;
use ledger_common::peer::Peer;
use ledger_common::transaction::Transaction;
use serde::{Deserialize, Serialize};

use crate::node::NodeContext;
use crate::task_queue::WorkItem;

pub fn alive() -> &'static str {
    "ok"
}

pub fn peer_info(ctx: &NodeContext) -> Peer {
    ctx.self_peer.clone()
}

/// Add `peer` to the registry, enqueue a broadcast of it to the rest of
/// the mesh, and return the current registry snapshot (including self).
pub fn join(ctx: &NodeContext, peer: Peer) -> Vec<Peer> {
    if ctx.peer_registry.insert(peer.clone()) {
        let _ = ctx.task_sender.send(WorkItem::BroadcastPeer(peer));
    }
    ctx.peer_registry.snapshot()
}

/// Peer-originated announcement: add to the registry, no re-broadcast
/// (the originating node already fanned this out).
pub fn broadcast_peer(ctx: &NodeContext, peer: Peer) {
    ctx.peer_registry.insert(peer);
}

pub fn broadcast_tx(ctx: &NodeContext, mut tx: Transaction) -> ExecuteResult {
    tx.is_from_peer = true;
    let _ = ctx.task_sender.send(WorkItem::AddTransaction(tx));
    ExecuteResult::ok("queued")
}

pub fn broadcast_block(ctx: &NodeContext, mut block: Block) -> ExecuteResult {
    block.is_from_peer = true;
    let _ = ctx.task_sender.send(WorkItem::AppendBlock(block));
    ExecuteResult::ok("queued")
}

/// Locally-originated submission: `is_from_peer` stays false (its default).
pub fn submit_tx(ctx: &NodeContext, tx: Transaction) -> ExecuteResult {
    let _ = ctx.task_sender.send(WorkItem::AddTransaction(tx));
    ExecuteResult::ok("queued")
}

pub fn submit_block(ctx: &NodeContext, block: Block) -> ExecuteResult {
    let _ = ctx.task_sender.send(WorkItem::AppendBlock(block));
    ExecuteResult::ok("queued")
}

pub fn last_block(ctx: &NodeContext) -> Option<Block> {
    ctx.chain.last()
}

pub fn pow_difficulty() -> u32 {
    ledger_common::config::POW_DIFFICULTY
}

pub fn balance(ctx: &NodeContext, addr: &PublicKey) -> i64 {
    ctx.chain.balance(addr)
}

pub fn blockchain(ctx: &NodeContext) -> Vec<Block> {
    ctx.chain.snapshot()
}

pub fn blockchain_summary(ctx: &NodeContext) -> BlockChainSummary {
    ctx.chain.summary()
}

/// Everything the external miner collaborator needs to assemble and mine a
/// candidate block: a swept mempool snapshot (reward included), the tail it
/// should chain from, and the difficulty to satisfy.
#[derive(Debug, Serialize, Deserialize)]
pub struct MiningData {
    pub transactions: Vec<Transaction>,
    pub index: u64,
    pub prev_hash: Option<ledger_common::crypto::Hash>,
    pub difficulty: u32,
}

pub fn mining_data(ctx: &NodeContext, miner_addr: PublicKey) -> MiningData {
    let last = ctx.chain.last();
    let index = last.as_ref().map_or(1, |b| b.index + 1);
    let prev_hash = last.map(|b| b.hash);
    let transactions = ctx
        .pool
        .snapshot_for_mining(miner_addr, ledger_common::config::POW_REWARD);
    MiningData {
        transactions,
        index,
        prev_hash,
        difficulty: ledger_common::config::POW_DIFFICULTY,
    }
}
