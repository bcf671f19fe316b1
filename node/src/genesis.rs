//! Bootstrap of the fixed-seed genesis block, enabled by `--with-genesis-block`:
//! a hardcoded recipient key, a fixed reward amount, and the ordinary PoW
//! mining loop used for index 1.

use ledger_common::block::Block;
use ledger_common::crypto::{Hash, PrivateKey, PublicKey};
use ledger_common::time::current_timestamp;
use ledger_common::transaction::Transaction;

use crate::config::GENESIS_AMOUNT;

/// Fixed seed for the genesis recipient key, carried over from the
/// reference implementation's hardcoded genesis private key.
const GENESIS_SEED: [u8; 32] = [
    0x08, 0x24, 0x84, 0x32, 0x0c, 0xf4, 0x53, 0x58, 0x5e, 0x76, 0x8e, 0x16, 0xe8, 0x78, 0x37, 0xed,
    0xeb, 0x2a, 0xb8, 0xaa, 0x50, 0x2a, 0x95, 0x13, 0x54, 0xb5, 0x27, 0xc5, 0x7f, 0x5b, 0x81, 0xa4,
];

pub fn genesis_recipient() -> PublicKey {
    PrivateKey::from_bytes(&GENESIS_SEED)
        .expect("fixed genesis seed is a valid secp256k1 scalar")
        .public_key()
}

/// Mine block index 1: no `prev_hash`, a single reward transaction crediting
/// [`genesis_recipient`] with [`GENESIS_AMOUNT`].
pub fn mine_genesis_block(difficulty: u32) -> Block {
    let timestamp = current_timestamp();
    let reward = Transaction::new_reward(genesis_recipient(), GENESIS_AMOUNT, timestamp);

    let mut nonce = 0u64;
    loop {
        let block = Block::new(1, timestamp, vec![reward.clone()], nonce, None, difficulty);
        if block.hash.has_leading_zero_hex_chars(difficulty) {
            let mut block = block;
            block.is_genesis = true;
            return block;
        }
        nonce += 1;
    }
}

/// Convenience used by tests and the genesis hash check in `Block::new`.
#[allow(dead_code)]
pub fn is_genesis_hash(hash: &Hash, difficulty: u32) -> bool {
    hash.has_leading_zero_hex_chars(difficulty)
}
