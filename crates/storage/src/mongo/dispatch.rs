//! Fan-out of collection change events to registered listeners

use crate::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The kind of mutation a change event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };

        write!(f, "{label}")
    }
}

/// A mutation notice for one collection.
///
/// Events are ephemeral and delivered at least once within the process. There
/// is no replay and no cross-process delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: String,
    pub operation: Operation,
    pub ids: Vec<String>,
}

/// Receives change events from mutating collection operations.
#[async_trait]
pub trait ChangeListener: Send + Sync {
    async fn handle(&self, event: &ChangeEvent) -> Result<()>;
}

/// Shared registry of change listeners.
///
/// Listeners run in registration order. A listener error propagates to the
/// mutating caller; later listeners are not invoked for that event.
#[derive(Default)]
pub struct ChangeDispatcher {
    listeners: RwLock<Vec<Arc<dyn ChangeListener>>>,
}

impl ChangeDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Adds a listener to the end of the invocation order.
    pub fn register(&self, listener: Arc<dyn ChangeListener>) {
        self.listeners.write().push(listener);
    }

    /// Delivers `event` to every registered listener.
    pub async fn dispatch(&self, event: &ChangeEvent) -> Result<()> {
        // Snapshot under the lock; listener futures must not hold the guard.
        let listeners: Vec<Arc<dyn ChangeListener>> = self.listeners.read().clone();

        for listener in listeners {
            listener.handle(event).await?;
        }

        Ok(())
    }
}
