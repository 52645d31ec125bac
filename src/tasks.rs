//! Deferred background tasks
//!
//! Reconciliation hands work that must not block the weekly closing path
//! (auto-naming orphaned entries) to an in-process queue drained by a tokio
//! worker. Delivery is at-least-once: a failed task is retried a bounded
//! number of times, and every handler is written to be safely re-executable.

use crate::cli::types::{EntryId, UserId, Week};
use crate::error::{PoolError, Result};
use crate::lifecycle::reconcile::name_unnamed_entries;
use crate::storage::{PoolDatabase, UserDirectory};
use tokio::sync::mpsc;
use tracing::{error, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A unit of deferred work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Auto-name one user's orphaned entries for a week and give each a
    /// violation pick.
    NameUnnamedEntries {
        user_id: UserId,
        entry_ids: Vec<EntryId>,
        week: Week,
    },
}

/// Sending half of the deferred-task queue.
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<Task>,
}

impl TaskQueue {
    /// Schedule a task for background execution.
    pub fn enqueue(&self, task: Task) -> Result<()> {
        self.tx.send(task).map_err(|_| PoolError::QueueClosed)
    }
}

/// Create a queue and the receiver its worker drains.
pub fn channel() -> (TaskQueue, mpsc::UnboundedReceiver<Task>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TaskQueue { tx }, rx)
}

/// Drain the queue until every sender is dropped.
///
/// The worker owns its own database connection; a task that still fails
/// after `max_attempts` is logged and dropped rather than wedging the
/// queue.
pub async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Task>,
    mut db: PoolDatabase,
    max_attempts: u32,
) {
    while let Some(task) = rx.recv().await {
        let mut done = false;
        for attempt in 1..=max_attempts {
            match handle_task(&mut db, &task) {
                Ok(()) => {
                    done = true;
                    break;
                }
                Err(e) => {
                    warn!(?task, attempt, error = %e, "deferred task failed");
                }
            }
        }
        if !done {
            error!(?task, max_attempts, "dropping deferred task");
        }
    }
}

/// Execute one task. Idempotent; also called directly by tests.
pub fn handle_task(db: &mut PoolDatabase, task: &Task) -> Result<()> {
    match task {
        Task::NameUnnamedEntries {
            user_id,
            entry_ids,
            week,
        } => {
            let display_name = db.display_name(*user_id)?;
            name_unnamed_entries(db, &display_name, entry_ids, *week)
        }
    }
}
