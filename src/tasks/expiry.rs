//! Expiry Timer Task
//!
//! One background task per cached key, sleeping until the key's deadline.

use std::panic;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Whether the runtime behind `handle` has its time driver enabled.
///
/// Creating a sleep on a runtime built without `enable_time` panics, so the
/// check is done once up front instead of inside every expiry task.
pub fn timers_enabled(handle: &Handle) -> bool {
    let _guard = handle.enter();
    panic::catch_unwind(|| drop(tokio::time::sleep(Duration::ZERO))).is_ok()
}

/// Spawns a task that sleeps until `deadline` and then runs `on_fire`.
///
/// The deadline is fixed when the task is spawned, not when it is first
/// polled, so a busy runtime delays the callback but never shifts it later
/// than one scheduling round.
///
/// # Arguments
/// * `handle` - Runtime the task is spawned on
/// * `deadline` - Instant at which `on_fire` runs
/// * `on_fire` - Callback run once, on the runtime, after the deadline
///
/// # Returns
/// A JoinHandle that aborts the timer when `abort()` is called.
pub fn spawn_expiry_task<F>(handle: &Handle, deadline: Instant, on_fire: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    handle.spawn(async move {
        tokio::time::sleep_until(deadline).await;
        on_fire();
    })
}

// == Expiry Timer ==
/// Owned handle to a pending expiry task.
///
/// Dropping the handle cancels the task. `id` is unique per cache and lets a
/// firing task check that it is still the current timer for its key.
#[derive(Debug)]
pub struct ExpiryTimer {
    id: u64,
    deadline: Instant,
    task: Option<JoinHandle<()>>,
}

impl ExpiryTimer {
    pub fn new(id: u64, deadline: Instant, task: JoinHandle<()>) -> Self {
        Self {
            id,
            deadline,
            task: Some(task),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    // == Disarm ==
    /// Releases the handle without aborting the task.
    ///
    /// Used from inside the firing task itself, which is already finishing.
    pub fn disarm(mut self) {
        self.task.take();
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
