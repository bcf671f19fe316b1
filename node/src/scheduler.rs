//! Periodic jobs: each gets its own sleep-then-run thread. Because a job's
//! loop body runs to completion before it sleeps again, at most one
//! instance of a given job is ever running at a time.

use std::thread::JoinHandle;
use std::time::Duration;

use log::{info, warn};

use crate::config::{CONSENSUS_CHECK_INTERVAL_SECS, LIVENESS_CHECK_INTERVAL_SECS};
use crate::node::NodeContext;

pub struct Scheduler {
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn start(ctx: NodeContext) -> Self {
        let consensus_ctx = ctx.clone();
        let consensus_handle = std::thread::Builder::new()
            .name("consensus-check".into())
            .spawn(move || loop {
                std::thread::sleep(Duration::from_secs(CONSENSUS_CHECK_INTERVAL_SECS));
                info!("scheduler: running consensus_check");
                consensus_ctx.peer_client.poll_summaries();
            })
            .expect("failed to spawn consensus_check thread");

        let liveness_handle = std::thread::Builder::new()
            .name("liveness-check".into())
            .spawn(move || loop {
                std::thread::sleep(Duration::from_secs(LIVENESS_CHECK_INTERVAL_SECS));
                // Placeholder: should iterate peers and prune unreachable
                // ones. Left as open behavior, matching the source.
                warn!("scheduler: liveness_check is not implemented, skipping");
            })
            .expect("failed to spawn liveness_check thread");

        Scheduler {
            handles: vec![consensus_handle, liveness_handle],
        }
    }

    /// Kept for symmetry with a clean-shutdown story; the scheduler threads
    /// never return on their own, so this only matters at process exit.
    #[allow(dead_code)]
    pub fn join(self) {
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}
