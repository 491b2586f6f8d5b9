//! Cooperative cancellation shared by the PhaseRunner and every `AgentClient`.

use std::sync::{atomic::{AtomicBool, Ordering}, Arc};

/// A single cancellation token threaded from the orchestrator through the
/// PhaseRunner into each agent invocation. Cancellation is signalled, never
/// enforced by interrupting in-flight work - agents must observe it at their
/// next suspension point, and a task that ignores it simply has its result
/// discarded.
///
/// ```
/// use disruption_agent_core::CooperativeCancellationToken;
///
/// let token = CooperativeCancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CooperativeCancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<tokio::sync::Notify>,
}

impl CooperativeCancellationToken {
    /// Creates a new, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token as cancelled and wakes pending waiters.
    pub fn cancel(&self) {
        let already_cancelled = self.cancelled.swap(true, Ordering::SeqCst);
        if !already_cancelled {
            self.notify.notify_waiters();
        }
    }

    /// Returns true when cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once cancellation has been requested. Resolves immediately
    /// if cancellation already happened before this was awaited.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}
