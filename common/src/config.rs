// Protocol-wide constants. Kept separate from per-deployment CLI options
// (those live in `node::config`) so every crate that needs e.g. the PoW
// difficulty can depend on `ledger_common` alone.

/// Number of leading hex zeroes a block hash must have to satisfy proof of work.
pub const POW_DIFFICULTY: u32 = 4;

/// Coins minted to the miner of a block via the reward transaction.
pub const POW_REWARD: u64 = 1;

/// Convenience: the literal prefix a valid block hash must start with.
pub fn pow_prefix() -> String {
    "0".repeat(POW_DIFFICULTY as usize)
}
