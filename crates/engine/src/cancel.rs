// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative cancellation: a flag checked at suspension points, not a
//! preemptive abort. Layered the way `WithTimeout`/`WithCancel` need —
//! a derived token is cancelled either by its own trigger or by its
//! parent's, without the parent needing to know its children exist.

use tokio::sync::watch;

#[derive(Clone)]
pub struct CancelToken {
    tx: std::sync::Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
    parent: Option<Box<CancelToken>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
            parent: None,
        }
    }

    /// A derived token cancelled by either this token or `self`.
    pub fn child(&self) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
            parent: Some(Box::new(self.clone())),
        }
    }

    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }

    /// Resolves once this token or any ancestor is cancelled.
    pub async fn cancelled(&self) {
        let mut own = self.rx.clone();
        let own_wait = async {
            while !*own.borrow() {
                if own.changed().await.is_err() {
                    break;
                }
            }
        };
        match &self.parent {
            Some(parent) => {
                tokio::select! {
                    _ = own_wait => {},
                    _ = parent.cancelled() => {},
                }
            }
            None => own_wait.await,
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
