//! HTTP+JSON transport, the only adapter this crate ships: four POST
//! endpoints for gossip plus two GET reads for summary/chain fetch,
//! against this crate's own route table (see `api::http`).

use ledger_common::block::{Block, BlockChainSummary};
use ledger_common::peer::Peer;
use ledger_common::transaction::Transaction;
use reqwest::blocking::Client;
use std::time::Duration;

use super::Transport;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client builds with static config");
        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn join(&self, addr: &str, self_peer: &Peer) -> anyhow::Result<Vec<Peer>> {
        let peers = self
            .client
            .post(format!("{addr}/join"))
            .json(self_peer)
            .send()?
            .error_for_status()?
            .json::<Vec<Peer>>()?;
        Ok(peers)
    }

    fn send_tx(&self, addr: &str, tx: &Transaction) -> anyhow::Result<()> {
        self.client
            .post(format!("{addr}/broadcast/tx"))
            .json(tx)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn send_block(&self, addr: &str, block: &Block) -> anyhow::Result<()> {
        self.client
            .post(format!("{addr}/broadcast/block"))
            .json(block)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn send_peer(&self, addr: &str, peer: &Peer) -> anyhow::Result<()> {
        self.client
            .post(format!("{addr}/broadcast/peer"))
            .json(peer)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn get_summary(&self, addr: &str) -> anyhow::Result<BlockChainSummary> {
        let summary = self
            .client
            .get(format!("{addr}/blockchain/summary"))
            .send()?
            .error_for_status()?
            .json::<BlockChainSummary>()?;
        Ok(summary)
    }

    fn get_chain(&self, addr: &str) -> anyhow::Result<Vec<Block>> {
        let blocks = self
            .client
            .get(format!("{addr}/blockchain"))
            .send()?
            .error_for_status()?
            .json::<Vec<Block>>()?;
        Ok(blocks)
    }
}
