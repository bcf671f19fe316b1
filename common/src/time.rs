// A simple module to define the time types used in the project.
//
// IMPORTANT: the functions here use SystemTime::now(), which is
// non-deterministic. They must never be used inside block/transaction
// validation - only for stamping freshly created transactions and blocks
// (which then carry their timestamp immutably from that point on).

use std::time::{SystemTime, UNIX_EPOCH};

// Seconds timestamp, matching the `timestamp` field on Transaction and Block.
pub type TimestampSeconds = u64;

#[inline]
pub fn current_timestamp() -> TimestampSeconds {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the unix epoch")
        .as_secs()
}
