//! Outbound gossip, summary polling, and chain fetch. Dispatches by
//! `peer.protocol`, skips self on broadcast, and feeds `poll_summaries`
//! results back onto the task queue as consensus checks.

use std::collections::HashMap;
use std::sync::Arc;

use ledger_common::block::Block;
use ledger_common::peer::Peer;
use ledger_common::transaction::Transaction;
use log::warn;

use crate::peer_registry::PeerRegistry;
use crate::task_queue::{TaskSender, WorkItem};
use crate::transport::Transport;

pub struct PeerClient {
    self_peer: Peer,
    registry: Arc<PeerRegistry>,
    transports: HashMap<String, Box<dyn Transport>>,
    task_sender: TaskSender,
}

impl PeerClient {
    pub fn new(
        self_peer: Peer,
        registry: Arc<PeerRegistry>,
        transports: HashMap<String, Box<dyn Transport>>,
        task_sender: TaskSender,
    ) -> Self {
        PeerClient {
            self_peer,
            registry,
            transports,
            task_sender,
        }
    }

    /// Looking up an adapter for a protocol this client wasn't configured
    /// with is a programming error: every peer that can make it into the
    /// registry must have arrived there with a protocol this client
    /// already has an adapter for.
    fn adapter(&self, protocol: &str) -> &dyn Transport {
        self.transports
            .get(protocol)
            .unwrap_or_else(|| unreachable!("no transport adapter registered for protocol {protocol:?}"))
            .as_ref()
    }

    /// Announce self to `protocol://addr`, register every peer it returns,
    /// and return the peers seen for the first time.
    pub fn join(&self, protocol: &str, addr: &str) -> anyhow::Result<Vec<Peer>> {
        let peers = self.adapter(protocol).join(addr, &self.self_peer)?;
        let mut newly_seen = Vec::new();
        for peer in peers {
            if self.registry.insert(peer.clone()) {
                newly_seen.push(peer);
            }
        }
        Ok(newly_seen)
    }

    pub fn broadcast_tx(&self, tx: &Transaction) {
        for peer in self.registry.others() {
            if let Err(e) = self.adapter(&peer.protocol).send_tx(&peer.addr, tx) {
                warn!("broadcast_tx to {} failed: {e}", peer.addr);
            }
        }
    }

    pub fn broadcast_block(&self, block: &Block) {
        for peer in self.registry.others() {
            if let Err(e) = self.adapter(&peer.protocol).send_block(&peer.addr, block) {
                warn!("broadcast_block to {} failed: {e}", peer.addr);
            }
        }
    }

    pub fn broadcast_peer(&self, peer: &Peer) {
        for target in self.registry.others() {
            if target == *peer {
                continue;
            }
            if let Err(e) = self.adapter(&target.protocol).send_peer(&target.addr, peer) {
                warn!("broadcast_peer to {} failed: {e}", target.addr);
            }
        }
    }

    pub fn get_chain(&self, peer: &Peer) -> anyhow::Result<Vec<Block>> {
        self.adapter(&peer.protocol).get_chain(&peer.addr)
    }

    /// Fetch every non-self peer's summary and enqueue a consensus check
    /// for each. Failures are logged and skipped - one unreachable peer
    /// does not stall the poll.
    pub fn poll_summaries(&self) {
        for peer in self.registry.others() {
            match self.adapter(&peer.protocol).get_summary(&peer.addr) {
                Ok(summary) => {
                    let _ = self
                        .task_sender
                        .send(WorkItem::ConsensusCheck { summary, peer });
                }
                Err(e) => warn!("poll_summaries: {} unreachable: {e}", peer.addr),
            }
        }
    }
}
