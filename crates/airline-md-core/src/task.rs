//! Deferred task queue.
//!
//! Tasks are run to completion in the order they were posted. This is the
//! event loop the data layer uses to hand back responses asynchronously.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

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

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// Manages the deferred task queue.
pub struct TaskQueue {
    /// Pending tasks to execute.
    tasks: VecDeque<TaskData>,
    /// Maximum number of tasks to process per batch.
    batch_size: usize,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self::with_batch_size(10)
    }

    /// Create a new task queue with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: batch_size.max(1),
        }
    }

    /// Post a task to be executed later.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            task: Box::new(task),
        });
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Get the batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Set the batch size for [`SharedTaskQueue::process_batch`].
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size.max(1);
    }

    fn pop(&mut self) -> Option<BoxedTask> {
        self.tasks.pop_front().map(|data| data.task)
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable, thread-safe handle to a [`TaskQueue`].
///
/// The lock is released while each task runs, so tasks may post further
/// tasks to the same queue.
#[derive(Clone, Default)]
pub struct SharedTaskQueue {
    inner: Arc<Mutex<TaskQueue>>,
}

impl SharedTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TaskQueue::with_batch_size(batch_size))),
        }
    }

    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.lock().post(task)
    }

    pub fn cancel(&self, id: TaskId) -> bool {
        self.inner.lock().cancel(id)
    }

    pub fn has_pending(&self) -> bool {
        self.inner.lock().has_pending()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending_count()
    }

    pub fn batch_size(&self) -> usize {
        self.inner.lock().batch_size()
    }

    pub fn set_batch_size(&self, size: usize) {
        self.inner.lock().set_batch_size(size);
    }

    /// Run the next pending task, if any. Returns `true` if a task ran.
    pub fn process_one(&self) -> bool {
        let task = self.inner.lock().pop();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Process up to `batch_size` tasks.
    ///
    /// Returns the number of tasks processed.
    pub fn process_batch(&self) -> usize {
        let batch_size = self.inner.lock().batch_size();
        let mut processed = 0;
        while processed < batch_size && self.process_one() {
            processed += 1;
        }
        processed
    }

    /// Process tasks until the queue is empty, including tasks posted by
    /// the tasks being processed.
    ///
    /// Returns the number of tasks processed.
    pub fn process_all(&self) -> usize {
        let mut processed = 0;
        while self.process_one() {
            processed += 1;
        }
        tracing::trace!(target: targets::TASK, processed, "task queue drained");
        processed
    }
}
