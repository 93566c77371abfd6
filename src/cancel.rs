//! Cancellation scopes for in-flight store work.
//!
//! A dashboard page owns a [`CancelScope`]; facade calls hold clones
//! of the matching [`CancelToken`]. Cancelling or dropping the scope
//! wakes every waiter, so fetches abandoned by a closed page resolve
//! to `StoreError::Cancelled` instead of completing into state nobody
//! owns.

use tokio::sync::watch;

/// Owning side of a cancellation pair.
#[derive(Debug)]
pub struct CancelScope {
    tx: watch::Sender<bool>,
}

/// Cheap-to-clone cancellation flag checked by facade calls.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelScope {
    /// Creates a scope and its first token. Further tokens come from
    /// cloning the token.
    pub fn new() -> (CancelScope, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelScope { tx }, CancelToken { rx })
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl CancelToken {
    /// True once the owning scope cancelled or dropped.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when the scope cancels or goes away; pending until
    /// then. A closed channel counts as cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if *rx.borrow_and_update() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow_and_update() {
                return;
            }
        }
    }
}
