//! Signal/slot system.
//!
//! Signals are emitted by objects when their state changes, and connected
//! slots (callbacks) are invoked in response. Everything here runs on the
//! emitting thread; deferred execution goes through [`crate::TaskQueue`].
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The multi-shot signal type
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! # Example
//!
//! ```
//! use airline_md_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the
/// provided arguments, in connection order.
///
/// The connection list is snapshotted before slots run, so a slot may
/// connect or disconnect (including itself) without deadlocking. Slots
/// connected during an emission are first called on the next emission.
pub struct Signal<Args> {
    /// All active connections, tagged with their connection sequence number.
    connections: Mutex<SlotMap<ConnectionId, (u64, Slot<Args>)>>,
    /// Source of connection sequence numbers.
    next_seq: AtomicU64,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            next_seq: AtomicU64::new(0),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.connections.lock().insert((seq, Arc::new(slot)))
    }

    /// Connect a slot that runs on the next emission only.
    ///
    /// The connection removes itself before the slot is invoked, so a slot
    /// that emits the same signal again is not called twice.
    ///
    /// ```
    /// use airline_md_core::Signal;
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// let signal = Arc::new(Signal::<u32>::new());
    /// let calls = Arc::new(AtomicUsize::new(0));
    /// let calls_clone = calls.clone();
    /// signal.connect_once(move |_| {
    ///     calls_clone.fetch_add(1, Ordering::SeqCst);
    /// });
    ///
    /// signal.emit(1);
    /// signal.emit(2);
    /// assert_eq!(calls.load(Ordering::SeqCst), 1);
    /// ```
    pub fn connect_once<F>(self: &Arc<Self>, slot: F) -> ConnectionId
    where
        F: FnOnce(&Args) + Send + 'static,
    {
        let pending = Arc::new(Mutex::new(Some(Box::new(slot) as Box<dyn FnOnce(&Args) + Send>)));
        let id_cell: Arc<Mutex<Option<ConnectionId>>> = Arc::new(Mutex::new(None));
        let signal = Arc::downgrade(self);

        let id_for_slot = id_cell.clone();
        let id = self.connect(move |args| {
            if let (Some(signal), Some(id)) = (signal.upgrade(), *id_for_slot.lock()) {
                signal.disconnect(id);
            }
            let slot = pending.lock().take();
            if let Some(slot) = slot {
                slot(args);
            }
        });
        *id_cell.lock() = Some(id);
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// If the signal is blocked, this does nothing.
    #[tracing::instrument(skip_all, target = "airline_md_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let mut slots: Vec<(u64, Slot<Args>)> = self.connections.lock().values().cloned().collect();
        slots.sort_unstable_by_key(|(seq, _)| *seq);
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for (_, slot) in slots {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<u32>: Send, Sync);
