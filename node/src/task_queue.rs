//! The single-consumer task queue that serializes every mutation. A typed
//! `WorkItem` enum rather than bound closures keeps queued work inspectable
//! and loggable at the point it's dequeued.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use ledger_common::block::{Block, BlockChainSummary};
use ledger_common::peer::Peer;
use ledger_common::transaction::Transaction;
use log::{error, info};

use crate::node::NodeContext;

/// A unit of work queued off the request-handling path. Every inbound
/// mutation and every outbound gossip call funnels through here so that
/// the worker thread gives them a total order.
#[derive(Debug)]
pub enum WorkItem {
    AddTransaction(Transaction),
    AppendBlock(Block),
    BroadcastTx(Transaction),
    BroadcastBlock(Block),
    BroadcastPeer(Peer),
    ConsensusCheck {
        summary: BlockChainSummary,
        peer: Peer,
    },
}

pub type TaskSender = Sender<WorkItem>;

/// Creates the queue and returns the sending half; callers hand the
/// receiving half to [`spawn_worker`].
pub fn channel() -> (TaskSender, Receiver<WorkItem>) {
    mpsc::channel()
}

/// Spawns the single worker thread that drains the queue in FIFO order,
/// executing each item against `ctx`. Errors from an individual item are
/// logged and do not stop the loop - the next queued item still runs.
pub fn spawn_worker(ctx: NodeContext, receiver: Receiver<WorkItem>) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("ledger-worker".into())
        .spawn(move || {
            for item in receiver {
                info!("worker: dequeued {:?}", item);
                if let Err(e) = run(&ctx, item) {
                    error!("worker: task failed: {e}");
                }
            }
            info!("worker: task queue closed, exiting");
        })
        .expect("failed to spawn worker thread")
}

fn run(ctx: &NodeContext, item: WorkItem) -> anyhow::Result<()> {
    match item {
        WorkItem::AddTransaction(tx) => {
            let result = ctx.pool.add(tx, &ctx.chain);
            info!("worker: add_transaction -> {:?}", result);
        }
        WorkItem::AppendBlock(block) => {
            let result = ctx.chain.append(block, &ctx.pool);
            info!("worker: append_block -> {:?}", result);
        }
        WorkItem::BroadcastTx(tx) => ctx.peer_client.broadcast_tx(&tx),
        WorkItem::BroadcastBlock(block) => ctx.peer_client.broadcast_block(&block),
        WorkItem::BroadcastPeer(peer) => ctx.peer_client.broadcast_peer(&peer),
        WorkItem::ConsensusCheck { summary, peer } => {
            ctx.consensus.check_and_maybe_fork(summary, &peer)?;
        }
    }
    Ok(())
}
