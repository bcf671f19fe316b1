//! Transport-agnostic outbound capability set, selected by `peer.protocol`
//! via a registry map so a new wire format only needs a new adapter.

pub mod http;

use ledger_common::block::{Block, BlockChainSummary};
use ledger_common::peer::Peer;
use ledger_common::transaction::Transaction;

/// One adapter per wire protocol. Implementations perform blocking I/O -
/// callers run on the worker thread, where blocking is acceptable by
/// design.
pub trait Transport: Send + Sync {
    fn join(&self, addr: &str, self_peer: &Peer) -> anyhow::Result<Vec<Peer>>;
    fn send_tx(&self, addr: &str, tx: &Transaction) -> anyhow::Result<()>;
    fn send_block(&self, addr: &str, block: &Block) -> anyhow::Result<()>;
    fn send_peer(&self, addr: &str, peer: &Peer) -> anyhow::Result<()>;
    fn get_summary(&self, addr: &str) -> anyhow::Result<BlockChainSummary>;
    fn get_chain(&self, addr: &str) -> anyhow::Result<Vec<Block>>;
}
