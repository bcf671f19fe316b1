use clap::Parser;
use ledger_node::config::{Args, Role};
use ledger_node::genesis;
use ledger_node::node::NodeContext;
use ledger_node::scheduler::Scheduler;
use ledger_node::{api, task_queue};
use log::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.role {
        Role::Wallet | Role::Miner => {
            anyhow::bail!(
                "role {:?} is an external collaborator and is not implemented by this binary",
                args.role
            );
        }
        Role::Node => {}
    }

    let (ctx, receiver) = NodeContext::bootstrap(&args);

    if args.with_genesis_block {
        let block = genesis::mine_genesis_block(ledger_common::config::POW_DIFFICULTY);
        let result = ctx.chain.append(block, &ctx.pool);
        info!("genesis bootstrap: {:?}", result);
    }

    if let (Some(protocol), Some(addr)) = (&args.join_peer_protocol, &args.join_peer_addr) {
        match ctx.peer_client.join(protocol, addr) {
            Ok(new_peers) => info!("joined via {addr}, discovered {} new peers", new_peers.len()),
            Err(e) => log::warn!("join against {addr} failed: {e}"),
        }
    }

    task_queue::spawn_worker(ctx.clone(), receiver);
    let _scheduler = Scheduler::start(ctx.clone());

    api::http::run(ctx, &args.host, args.port).await?;
    Ok(())
}
