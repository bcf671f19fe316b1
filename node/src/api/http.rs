//! `actix-web` wiring for the node's HTTP route table. Handlers here are
//! thin - all real logic lives in `api` proper.

use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use ledger_common::block::Block;
use ledger_common::crypto::PublicKey;
use ledger_common::peer::Peer;
use ledger_common::transaction::Transaction;

use crate::api;
use crate::node::NodeContext;

type Ctx = web::Data<NodeContext>;

#[get("/alive")]
async fn alive() -> impl Responder {
    HttpResponse::Ok().json(api::alive())
}

#[get("/peer_info")]
async fn peer_info(ctx: Ctx) -> impl Responder {
    HttpResponse::Ok().json(api::peer_info(&ctx))
}

#[post("/join")]
async fn join(ctx: Ctx, peer: web::Json<Peer>) -> impl Responder {
    HttpResponse::Ok().json(api::join(&ctx, peer.into_inner()))
}

#[post("/broadcast/peer")]
async fn broadcast_peer(ctx: Ctx, peer: web::Json<Peer>) -> impl Responder {
    api::broadcast_peer(&ctx, peer.into_inner());
    HttpResponse::Ok().finish()
}

#[post("/broadcast/tx")]
async fn broadcast_tx(ctx: Ctx, tx: web::Json<Transaction>) -> impl Responder {
    HttpResponse::Ok().json(api::broadcast_tx(&ctx, tx.into_inner()))
}

#[post("/broadcast/block")]
async fn broadcast_block(ctx: Ctx, block: web::Json<Block>) -> impl Responder {
    HttpResponse::Ok().json(api::broadcast_block(&ctx, block.into_inner()))
}

#[post("/transaction")]
async fn submit_tx(ctx: Ctx, tx: web::Json<Transaction>) -> impl Responder {
    HttpResponse::Ok().json(api::submit_tx(&ctx, tx.into_inner()))
}

#[post("/block")]
async fn submit_block(ctx: Ctx, block: web::Json<Block>) -> impl Responder {
    HttpResponse::Ok().json(api::submit_block(&ctx, block.into_inner()))
}

#[get("/last_block")]
async fn last_block(ctx: Ctx) -> impl Responder {
    HttpResponse::Ok().json(api::last_block(&ctx))
}

#[get("/mining_data/{addr}")]
async fn mining_data(ctx: Ctx, addr: web::Path<String>) -> impl Responder {
    match addr.into_inner().parse::<PublicKey>() {
        Ok(addr) => HttpResponse::Ok().json(api::mining_data(&ctx, addr)),
        Err(_) => HttpResponse::BadRequest().json("invalid address"),
    }
}

#[get("/pow_difficulty")]
async fn pow_difficulty() -> impl Responder {
    HttpResponse::Ok().json(api::pow_difficulty())
}

#[get("/balance/{addr}")]
async fn balance(ctx: Ctx, addr: web::Path<String>) -> impl Responder {
    match addr.into_inner().parse::<PublicKey>() {
        Ok(addr) => HttpResponse::Ok().json(api::balance(&ctx, &addr)),
        Err(_) => HttpResponse::BadRequest().json("invalid address"),
    }
}

#[get("/blockchain")]
async fn blockchain(ctx: Ctx) -> impl Responder {
    HttpResponse::Ok().json(api::blockchain(&ctx))
}

#[get("/blockchain/summary")]
async fn blockchain_summary(ctx: Ctx) -> impl Responder {
    HttpResponse::Ok().json(api::blockchain_summary(&ctx))
}

/// Binds and runs the API server on `ctx.self_peer.addr`'s host:port until
/// the process is killed - there is no graceful-shutdown story and no
/// persisted state, so a restart loses the chain.
pub async fn run(ctx: NodeContext, host: &str, port: u16) -> std::io::Result<()> {
    let data = web::Data::new(ctx);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(alive)
            .service(peer_info)
            .service(join)
            .service(broadcast_peer)
            .service(broadcast_tx)
            .service(broadcast_block)
            .service(submit_tx)
            .service(submit_block)
            .service(last_block)
            .service(mining_data)
            .service(pow_difficulty)
            .service(balance)
            .service(blockchain)
            .service(blockchain_summary)
    })
    .bind((host, port))?
    .run()
    .await
}
