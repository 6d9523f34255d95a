//! Deferred task queue.
//!
//! Effects posted here run after the current synchronous batch has
//! finished, never interleaved with it. The owner of the queue decides when
//! a batch boundary has been reached and drains the queue against itself:
//!
//! ```
//! use rowline_core::TaskQueue;
//!
//! struct Counter {
//!     value: u32,
//!     tasks: TaskQueue<Counter>,
//! }
//!
//! impl Counter {
//!     fn process_deferred(&mut self) -> usize {
//!         let mut processed = 0;
//!         loop {
//!             let batch = self.tasks.take_all();
//!             if batch.is_empty() {
//!                 return processed;
//!             }
//!             for task in batch {
//!                 task.run(self);
//!                 processed += 1;
//!             }
//!         }
//!     }
//! }
//!
//! let mut counter = Counter { value: 0, tasks: TaskQueue::new() };
//! counter.tasks.post(|c: &mut Counter| c.value += 1);
//! assert_eq!(counter.value, 0);
//! assert_eq!(counter.process_deferred(), 1);
//! assert_eq!(counter.value, 1);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

type BoxedTask<C> = Box<dyn FnOnce(&mut C) + Send + 'static>;

/// A task taken out of the queue, ready to run against its owner.
pub struct DeferredTask<C> {
    id: TaskId,
    task: BoxedTask<C>,
}

impl<C> DeferredTask<C> {
    /// The ID the task was posted under.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Run the task.
    pub fn run(self, context: &mut C) {
        tracing::trace!(target: targets::TASK, id = self.id.as_u64(), "running deferred task");
        (self.task)(context);
    }
}

impl<C> std::fmt::Debug for DeferredTask<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredTask").field("id", &self.id).finish()
    }
}

/// FIFO of effects deferred until the current batch completes.
pub struct TaskQueue<C> {
    tasks: VecDeque<DeferredTask<C>>,
}

impl<C> TaskQueue<C> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Post a task to run after the current batch.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(DeferredTask {
            id,
            task: Box::new(task),
        });
        tracing::trace!(target: targets::TASK, id = id.as_u64(), pending = self.tasks.len(), "task posted");
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was still pending and has been removed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check whether a task is still waiting to run.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Take every pending task, in posting order.
    ///
    /// Tasks posted while the returned batch runs land in the (now empty)
    /// queue and belong to the next batch.
    pub fn take_all(&mut self) -> Vec<DeferredTask<C>> {
        self.tasks.drain(..).collect()
    }
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for TaskQueue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.tasks.len())
            .finish()
    }
}
