//! One-shot signals.
//!
//! A [`OnceSignal<T>`] is resolved exactly once with a value. Continuations
//! attached with [`OnceSignal::then`] before resolution are queued and run,
//! in the order they were attached, when the signal resolves. Continuations
//! attached afterwards run immediately with the stored value.
//!
//! Unlike [`crate::Signal`], a `OnceSignal` never delivers twice: each
//! continuation is an `FnOnce` and is drained exactly once.
//!
//! # Example
//!
//! ```
//! use airline_md_core::OnceSignal;
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//!
//! let ready = OnceSignal::<u32>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let seen_clone = seen.clone();
//! ready.then(move |value| seen_clone.lock().push(*value));
//! assert!(seen.lock().is_empty());
//!
//! ready.resolve(7).unwrap();
//! assert_eq!(*seen.lock(), vec![7]);
//! ```

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::{Result, SignalError};
use crate::logging::targets;

type Continuation<T> = Box<dyn FnOnce(&T) + Send + 'static>;

struct OnceState<T> {
    value: Option<T>,
    pending: VecDeque<Continuation<T>>,
    /// True while `resolve` is draining `pending`. Continuations attached in
    /// that window are queued behind the ones already waiting.
    draining: bool,
}

/// A single-assignment signal with queued continuations.
pub struct OnceSignal<T> {
    state: Mutex<OnceState<T>>,
}

impl<T: Clone + Send + 'static> Default for OnceSignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> OnceSignal<T> {
    /// Create an unresolved signal.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(OnceState {
                value: None,
                pending: VecDeque::new(),
                draining: false,
            }),
        }
    }

    /// Resolve the signal and run every queued continuation in FIFO order.
    ///
    /// Returns [`SignalError::AlreadyResolved`] if the signal already holds a
    /// value; the stored value and continuations are left untouched.
    pub fn resolve(&self, value: T) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.value.is_some() {
                return Err(SignalError::AlreadyResolved);
            }
            state.value = Some(value.clone());
            state.draining = true;
            tracing::trace!(
                target: targets::SIGNAL,
                pending = state.pending.len(),
                "resolving one-shot signal"
            );
        }

        loop {
            let next = {
                let mut state = self.state.lock();
                match state.pending.pop_front() {
                    Some(continuation) => continuation,
                    None => {
                        state.draining = false;
                        break;
                    }
                }
            };
            next(&value);
        }

        Ok(())
    }

    /// Attach a continuation.
    ///
    /// Runs `continuation` immediately if the signal is resolved and no
    /// earlier continuation is still waiting to run; otherwise queues it.
    pub fn then<F>(&self, continuation: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        let mut state = self.state.lock();
        let ready = if state.draining { None } else { state.value.clone() };
        match ready {
            Some(value) => {
                drop(state);
                continuation(&value);
            }
            None => state.pending.push_back(Box::new(continuation)),
        }
    }

    /// Returns the resolved value, if any.
    pub fn get(&self) -> Option<T> {
        self.state.lock().value.clone()
    }

    /// Returns true once [`resolve`](Self::resolve) has succeeded.
    pub fn is_resolved(&self) -> bool {
        self.state.lock().value.is_some()
    }

    /// Number of continuations still waiting to run.
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Wait asynchronously for the signal to resolve.
    ///
    /// Fails with [`SignalError::SignalDropped`] if the signal is dropped
    /// while still unresolved.
    #[cfg(feature = "tokio")]
    pub async fn wait(&self) -> Result<T> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.then(move |value| {
            let _ = tx.send(value.clone());
        });
        rx.await.map_err(|_| SignalError::SignalDropped)
    }
}

static_assertions::assert_impl_all!(OnceSignal<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_then_before_resolve_is_deferred() {
        let signal = OnceSignal::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        signal.then(move |v| seen_clone.lock().push(*v));

        assert!(!signal.is_resolved());
        assert_eq!(signal.pending_count(), 1);
        assert!(seen.lock().is_empty());

        signal.resolve(5).unwrap();
        assert_eq!(*seen.lock(), vec![5]);
        assert_eq!(signal.pending_count(), 0);
    }

    #[test]
    fn test_then_after_resolve_runs_immediately() {
        let signal = OnceSignal::<&'static str>::new();
        signal.resolve("ready").unwrap();

        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        signal.then(move |v| *seen_clone.lock() = Some(*v));

        assert_eq!(*seen.lock(), Some("ready"));
        assert_eq!(signal.get(), Some("ready"));
    }

    #[test]
    fn test_second_resolve_is_rejected() {
        let signal = OnceSignal::<u32>::new();
        signal.resolve(1).unwrap();
        assert_eq!(signal.resolve(2), Err(SignalError::AlreadyResolved));
        assert_eq!(signal.get(), Some(1));
    }

    #[test]
    fn test_continuations_drain_in_fifo_order() {
        let signal = OnceSignal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..4 {
            let order = order.clone();
            signal.then(move |_| order.lock().push(i));
        }
        signal.resolve(()).unwrap();

        assert_eq!(*order.lock(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_continuation_attached_while_draining_runs_last() {
        let signal = Arc::new(OnceSignal::<()>::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let inner_signal = signal.clone();
        let order_a = order.clone();
        signal.then(move |_| {
            order_a.lock().push("a");
            let order_c = order_a.clone();
            inner_signal.then(move |_| order_c.lock().push("c"));
        });
        let order_b = order.clone();
        signal.then(move |_| order_b.lock().push("b"));

        signal.resolve(()).unwrap();
        assert_eq!(*order.lock(), vec!["a", "b", "c"]);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn test_wait_resolves() {
        let signal = Arc::new(OnceSignal::<u32>::new());
        let resolver = signal.clone();
        tokio::spawn(async move {
            resolver.resolve(11).unwrap();
        });
        assert_eq!(signal.wait().await, Ok(11));
    }
}
