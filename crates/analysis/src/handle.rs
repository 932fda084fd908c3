//! Per-request cancellation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct HandleState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared handle to one analysis request
///
/// Clones refer to the same request. Cancelling wakes a running
/// [`analyze_or_message`](crate::analyze_or_message) for that request.
#[derive(Debug, Clone, Default)]
pub struct AnalysisHandle {
    state: Arc<HandleState>,
}

impl AnalysisHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abandon the request; idempotent
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone
    pub async fn cancelled(&self) {
        loop {
            // Registered before the flag check so a concurrent cancel is not missed
            let notified = self.state.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Whether both handles belong to the same request
    pub fn same_request(&self, other: &AnalysisHandle) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
