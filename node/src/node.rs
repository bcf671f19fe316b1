//! Wires every component together. `BlockChain` and `TransactionPool` never
//! hold a `NodeContext` back-reference - only the cheap `TaskSender` channel
//! handle they need to enqueue gossip. Everything that genuinely needs the
//! other components (`Consensus`, `PeerClient`) takes `Arc` clones of just
//! those, not the whole context. `NodeContext` itself is the one place all
//! of it is assembled, owned by `main`.

use std::collections::HashMap;
use std::sync::Arc;

use ledger_common::peer::Peer;

use crate::config::Args;
use crate::consensus::Consensus;
use crate::core::{BlockChain, TransactionPool};
use crate::peer_client::PeerClient;
use crate::peer_registry::PeerRegistry;
use crate::task_queue::{self, TaskSender};
use crate::transport::http::HttpTransport;
use crate::transport::Transport;

#[derive(Clone)]
pub struct NodeContext {
    pub chain: Arc<BlockChain>,
    pub pool: Arc<TransactionPool>,
    pub peer_registry: Arc<PeerRegistry>,
    pub peer_client: Arc<PeerClient>,
    pub consensus: Arc<Consensus>,
    pub task_sender: TaskSender,
    pub self_peer: Peer,
}

impl NodeContext {
    pub fn bootstrap(args: &Args) -> (NodeContext, std::sync::mpsc::Receiver<task_queue::WorkItem>) {
        let self_peer = Peer::new("http", args.self_addr());
        let (task_sender, receiver) = task_queue::channel();

        let chain = Arc::new(BlockChain::new(task_sender.clone()));
        let pool = Arc::new(TransactionPool::new(task_sender.clone()));
        let peer_registry = Arc::new(PeerRegistry::new(self_peer.clone()));

        let mut transports: HashMap<String, Box<dyn Transport>> = HashMap::new();
        transports.insert("http".to_string(), Box::new(HttpTransport::new()));

        let peer_client = Arc::new(PeerClient::new(
            self_peer.clone(),
            peer_registry.clone(),
            transports,
            task_sender.clone(),
        ));
        let consensus = Arc::new(Consensus::new(chain.clone(), pool.clone(), peer_client.clone()));

        let ctx = NodeContext {
            chain,
            pool,
            peer_registry,
            peer_client,
            consensus,
            task_sender,
            self_peer,
        };
        (ctx, receiver)
    }
}
