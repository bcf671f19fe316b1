//! End-to-end scenarios covering genesis bootstrap + mining, fork
//! resolution, and multi-node join gossip. Instead of binding real HTTP
//! servers, peers are wired together through an in-process `Transport`
//! that dispatches straight into another test node's `NodeContext` - this
//! exercises the exact same `PeerClient`/`Consensus` code paths the real
//! `HttpTransport` would, without sockets or timing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ledger_common::block::{Block, BlockChainSummary};
use ledger_common::crypto::{Hashable, PrivateKey};
use ledger_common::peer::Peer;
use ledger_common::transaction::Transaction;
use ledger_node::consensus::Consensus;
use ledger_node::core::{BlockChain, TransactionPool};
use ledger_node::node::NodeContext;
use ledger_node::peer_client::PeerClient;
use ledger_node::peer_registry::PeerRegistry;
use ledger_node::transport::Transport;

const DIFFICULTY: u32 = 4;

struct InProcessTransport {
    nodes: Arc<Mutex<HashMap<String, NodeContext>>>,
}

impl Transport for InProcessTransport {
    fn join(&self, addr: &str, self_peer: &Peer) -> anyhow::Result<Vec<Peer>> {
        let nodes = self.nodes.lock().unwrap();
        let target = nodes.get(addr).expect("peer registered in test topology");
        if target.peer_registry.insert(self_peer.clone()) {
            target.peer_client.broadcast_peer(self_peer);
        }
        Ok(target.peer_registry.snapshot())
    }

    fn send_tx(&self, addr: &str, tx: &Transaction) -> anyhow::Result<()> {
        let nodes = self.nodes.lock().unwrap();
        let target = nodes.get(addr).expect("peer registered in test topology");
        let mut tx = tx.clone();
        tx.is_from_peer = true;
        target.pool.add(tx, &target.chain);
        Ok(())
    }

    fn send_block(&self, addr: &str, block: &Block) -> anyhow::Result<()> {
        let nodes = self.nodes.lock().unwrap();
        let target = nodes.get(addr).expect("peer registered in test topology");
        let mut block = block.clone();
        block.is_from_peer = true;
        target.chain.append(block, &target.pool);
        Ok(())
    }

    fn send_peer(&self, addr: &str, peer: &Peer) -> anyhow::Result<()> {
        let nodes = self.nodes.lock().unwrap();
        let target = nodes.get(addr).expect("peer registered in test topology");
        target.peer_registry.insert(peer.clone());
        Ok(())
    }

    fn get_summary(&self, addr: &str) -> anyhow::Result<BlockChainSummary> {
        let nodes = self.nodes.lock().unwrap();
        Ok(nodes
            .get(addr)
            .expect("peer registered in test topology")
            .chain
            .summary())
    }

    fn get_chain(&self, addr: &str) -> anyhow::Result<Vec<Block>> {
        let nodes = self.nodes.lock().unwrap();
        Ok(nodes
            .get(addr)
            .expect("peer registered in test topology")
            .chain
            .snapshot())
    }
}

type Topology = Arc<Mutex<HashMap<String, NodeContext>>>;

fn new_topology() -> Topology {
    Arc::new(Mutex::new(HashMap::new()))
}

fn make_node(addr: &str, topology: &Topology) -> NodeContext {
    let self_peer = Peer::new("inproc", addr);
    let (task_sender, _receiver) = ledger_node::task_queue::channel();

    let chain = Arc::new(BlockChain::new(task_sender.clone()));
    let pool = Arc::new(TransactionPool::new(task_sender.clone()));
    let peer_registry = Arc::new(PeerRegistry::new(self_peer.clone()));

    let mut transports: HashMap<String, Box<dyn Transport>> = HashMap::new();
    transports.insert(
        "inproc".to_string(),
        Box::new(InProcessTransport {
            nodes: topology.clone(),
        }),
    );

    let peer_client = Arc::new(PeerClient::new(
        self_peer.clone(),
        peer_registry.clone(),
        transports,
        task_sender.clone(),
    ));
    let consensus = Arc::new(Consensus::new(chain.clone(), pool.clone(), peer_client.clone()));

    let node = NodeContext {
        chain,
        pool,
        peer_registry,
        peer_client,
        consensus,
        task_sender,
        self_peer,
    };
    topology.lock().unwrap().insert(addr.to_string(), node.clone());
    node
}

fn mine_block(index: u64, prev_hash: Option<ledger_common::crypto::Hash>, txs: Vec<Transaction>) -> Block {
    let mut nonce = 0u64;
    loop {
        let block = Block::new(index, index, txs.clone(), nonce, prev_hash, DIFFICULTY);
        if block.hash.has_leading_zero_hex_chars(DIFFICULTY) {
            return block;
        }
        nonce += 1;
    }
}

#[test]
fn e1_genesis_plus_single_tx() {
    let topology = new_topology();
    let node = make_node("node-e1", &topology);

    let genesis_key = PrivateKey::generate();
    let genesis_addr = genesis_key.public_key();
    let genesis_reward = Transaction::new_reward(genesis_addr, 10000, 0);
    let genesis = mine_block(1, None, vec![genesis_reward]);
    assert!(node.chain.append(genesis, &node.pool).success);

    let h_addr = PrivateKey::generate().public_key();
    let mut tx = Transaction::new_unsigned(Some(genesis_addr), h_addr, 7, 1);
    tx.sign(&genesis_key);
    assert!(node.pool.add(tx, &node.chain).success);

    let miner_addr = PrivateKey::generate().public_key();
    let snapshot = node.pool.snapshot_for_mining(miner_addr, 1);
    let tail = node.chain.last().unwrap();
    let next = mine_block(2, Some(tail.hash), snapshot);
    assert!(node.chain.append(next, &node.pool).success);

    assert_eq!(node.chain.len(), 2);
    assert_eq!(node.chain.balance(&genesis_addr), 10000 - 7);
    assert_eq!(node.chain.balance(&h_addr), 7);
    assert_eq!(node.chain.balance(&miner_addr), 1);
}

#[test]
fn e5_fork_resolution_adopts_the_dominant_peer_tail() {
    let topology = new_topology();
    let node_a = make_node("node-a", &topology);
    let node_b = make_node("node-b", &topology);

    let miner_key = PrivateKey::generate();
    let miner_addr = miner_key.public_key();
    let genesis = mine_block(1, None, vec![Transaction::new_reward(miner_addr, 10000, 0)]);
    assert!(node_a.chain.append(genesis.clone(), &node_a.pool).success);
    assert!(node_b.chain.append(genesis.clone(), &node_b.pool).success);

    // node_a grows a short fork carrying one non-reward transaction.
    let outsider = PrivateKey::generate().public_key();
    let mut spend = Transaction::new_unsigned(Some(miner_addr), outsider, 4, 1);
    spend.sign(&miner_key);
    let a_block_2 = mine_block(
        2,
        Some(genesis.hash),
        vec![spend.clone(), Transaction::new_reward(miner_addr, 1, 1)],
    );
    assert!(node_a.chain.append(a_block_2.clone(), &node_a.pool).success);
    let a_block_3 = mine_block(3, Some(a_block_2.hash), vec![Transaction::new_reward(miner_addr, 1, 2)]);
    assert!(node_a.chain.append(a_block_3, &node_a.pool).success);
    assert_eq!(node_a.chain.len(), 3);

    // node_b grows a longer, more-difficult fork independently.
    let mut prev = genesis.hash;
    for i in 2..=5u64 {
        let block = mine_block(i, Some(prev), vec![Transaction::new_reward(miner_addr, 1, i)]);
        prev = block.hash;
        assert!(node_b.chain.append(block, &node_b.pool).success);
    }
    assert_eq!(node_b.chain.len(), 5);

    let peer_b = Peer::new("inproc", "node-b");
    let summary_b = node_b.chain.summary();
    assert!(node_a.consensus.check_summary(&summary_b));
    node_a.consensus.check_and_maybe_fork(summary_b, &peer_b).unwrap();

    assert_eq!(node_a.chain.len(), 5);
    let adopted: Vec<_> = node_a.chain.snapshot().iter().map(|b| b.hash).collect();
    let authoritative: Vec<_> = node_b.chain.snapshot().iter().map(|b| b.hash).collect();
    assert_eq!(adopted, authoritative);

    // the discarded non-reward transaction from node_a's rewound tail is
    // back in its pool, a candidate for a future block.
    assert!(node_a.pool.snapshot().iter().any(|tx| tx.hash() == spend.hash()));
}

#[test]
fn e6_join_gossip_propagates_across_three_nodes() {
    let topology = new_topology();
    let n1 = make_node("n1", &topology);
    let n2 = make_node("n2", &topology);
    let n3 = make_node("n3", &topology);

    // N2 joins via N1 first so N1's registry is {N1, N2} before N3 arrives.
    n2.peer_client.join("inproc", "n1").unwrap();
    assert_eq!(n1.peer_registry.len(), 2);

    // N3 joins via N1: N1 replies with its current registry {N1, N2}, and
    // (since N3 is new to N1) N1 broadcasts N3's arrival to N2.
    n3.peer_client.join("inproc", "n1").unwrap();
    assert_eq!(n3.peer_registry.len(), 3, "n3 should now know n1, n2, and itself");
    assert_eq!(n1.peer_registry.len(), 3, "n1 registers n3 on join");
    assert_eq!(n2.peer_registry.len(), 3, "n1 gossips n3's arrival to n2");
}
