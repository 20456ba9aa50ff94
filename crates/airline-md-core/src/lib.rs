//! Core systems for the airline master-detail app.
//!
//! This crate provides the event-driven building blocks the app is wired
//! from:
//!
//! - **Signal/Slot System**: [`Signal`], multi-shot change notification
//! - **One-shot Signals**: [`OnceSignal`], resolved exactly once, with
//!   continuations queued until then
//! - **Task Queue**: [`SharedTaskQueue`], run-to-completion deferred tasks
//! - **Logging**: `tracing` targets and [`PerfSpan`]
//!
//! # Example
//!
//! ```
//! use airline_md_core::{OnceSignal, SharedTaskQueue};
//! use std::sync::Arc;
//!
//! let queue = SharedTaskQueue::new();
//! let loaded = Arc::new(OnceSignal::<usize>::new());
//!
//! // Deliver the "response" later, from the queue.
//! let resolver = loaded.clone();
//! queue.post(move || {
//!     let _ = resolver.resolve(3);
//! });
//!
//! loaded.then(|count| println!("{count} rows loaded"));
//! queue.process_all();
//! assert_eq!(loaded.get(), Some(3));
//! ```

mod error;
pub mod logging;
mod once;
pub mod signal;
mod task;

pub use error::{Result, SignalError};
pub use logging::PerfSpan;
pub use once::OnceSignal;
pub use signal::{ConnectionId, Signal};
pub use task::{SharedTaskQueue, TaskId, TaskQueue};
