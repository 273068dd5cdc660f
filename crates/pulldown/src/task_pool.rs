//! Local task execution for panel construction.
//!
//! Panels are built by futures that are not `Send` and live on the card's
//! thread. The pool owns a [`LocalExecutor`] and is driven cooperatively by
//! the card instead of by worker threads.

use std::future::Future;
use std::rc::Rc;

use async_executor::{LocalExecutor, Task};
use futures_lite::future;
use pulldown_core::LOG_TARGET;

/// Single-threaded task pool.
///
/// # Example
///
/// ```
/// use pulldown::LocalTaskPool;
///
/// let pool = LocalTaskPool::new();
/// let mut task = pool.spawn(async { 42 });
///
/// pool.run_until_stalled();
/// assert_eq!(LocalTaskPool::try_take(&mut task), Some(42));
/// ```
pub struct LocalTaskPool {
    executor: Rc<LocalExecutor<'static>>,
}

impl LocalTaskPool {
    pub fn new() -> Self {
        Self {
            executor: Rc::new(LocalExecutor::new()),
        }
    }

    /// Spawn a task on the pool.
    ///
    /// Nothing runs until the pool is ticked. Dropping the returned `Task`
    /// cancels it.
    pub fn spawn<T>(&self, future: impl Future<Output = T> + 'static) -> Task<T>
    where
        T: 'static,
    {
        self.executor.spawn(future)
    }

    /// Run scheduled tasks until none can make progress.
    ///
    /// Returns the number of task polls performed.
    pub fn run_until_stalled(&self) -> usize {
        let mut polls = 0;
        while self.executor.try_tick() {
            polls += 1;
        }
        if polls > 0 {
            tracing::trace!(target: LOG_TARGET, "task pool ran {} polls", polls);
        }
        polls
    }

    /// Whether no spawned task is alive.
    pub fn is_idle(&self) -> bool {
        self.executor.is_empty()
    }

    /// Drive the pool until `future` completes.
    pub fn block_on<T>(&self, future: impl Future<Output = T>) -> T {
        future::block_on(self.executor.run(future))
    }

    /// Take the output of a finished task without blocking.
    pub fn try_take<T>(task: &mut Task<T>) -> Option<T> {
        if !task.is_finished() {
            return None;
        }
        future::block_on(future::poll_once(task))
    }
}

impl Default for LocalTaskPool {
    fn default() -> Self {
        Self::new()
    }
}
