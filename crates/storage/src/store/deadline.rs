#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Number of SQLite VM steps between deadline checks.
pub(crate) const PROGRESS_STEPS: i32 = 1_000;

const DISARMED: u64 = 0;

/// Per-connection operation deadline shared with the SQLite progress handler.
///
/// The deadline is stored as milliseconds since `origin` (offset by one so that zero
/// always means "disarmed"). The progress handler returns `true` once it is exceeded,
/// which makes SQLite abort the running statement with `SQLITE_INTERRUPT`.
#[derive(Clone, Debug)]
pub(crate) struct OperationClock {
    origin: Instant,
    deadline_ms: Arc<AtomicU64>,
}

impl OperationClock {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
            deadline_ms: Arc::new(AtomicU64::new(DISARMED)),
        }
    }

    pub(crate) fn arm(&self, budget: Duration) -> DeadlineGuard {
        let deadline = self
            .elapsed_ms()
            .saturating_add(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX))
            .saturating_add(1);
        self.deadline_ms.store(deadline, Ordering::Release);
        DeadlineGuard {
            deadline_ms: Arc::clone(&self.deadline_ms),
        }
    }

    pub(crate) fn expired(&self) -> bool {
        let deadline = self.deadline_ms.load(Ordering::Acquire);
        deadline != DISARMED && self.elapsed_ms().saturating_add(1) > deadline
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[must_use]
pub(crate) struct DeadlineGuard {
    deadline_ms: Arc<AtomicU64>,
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        self.deadline_ms.store(DISARMED, Ordering::Release);
    }
}
