//! A plain, allocation-free-after-construction cancellation flag shared
//! between a request's async wrapper and the synchronous enumerator it
//! wraps.
//!
//! Lets the enumerator be cancelled at a safe point (between DFS step
//! iterations) without making it async itself: the seam a
//! `tokio::time::timeout` on the server side reaches through into a
//! blocking `spawn_blocking` task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
