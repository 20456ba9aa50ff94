//! Deferred selection on a list that is bound and loaded later.
//!
//! A [`ListSelector`] accepts selection requests at any time, including
//! before a list exists. Requests wait on one of two one-shot signals:
//!
//! - **list set**: resolved by [`ListSelector::bind`]
//! - **load done**: resolved by the first data-received notification of the
//!   bound list
//!
//! [`ListSelector::select_by_path`] waits for "load done";
//! [`ListSelector::clear_selection`] only waits for "list set". Requests
//! waiting on the same signal run in the order they were issued, each
//! exactly once.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use airline_md::model::{EntityPath, ListHandle, ListItem, ListView};
//! use airline_md::ListSelector;
//!
//! let selector = ListSelector::new();
//! selector.select_by_path("/AirlineSet('LH')");
//!
//! let list = Arc::new(ListView::new());
//! selector.bind(&list);
//! list.receive_data(
//!     vec![ListItem::new("Lufthansa", Some(EntityPath::from("/AirlineSet('LH')")))],
//!     true,
//! );
//!
//! assert_eq!(list.selected_item().unwrap().title(), "Lufthansa");
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use airline_md_core::OnceSignal;
use airline_md_core::logging::targets;

use crate::error::{Error, Result};
use crate::model::{DataReceived, EntityPath, ListHandle};

/// Outcome of the first load of the bound list.
#[derive(Clone)]
enum Readiness {
    WithItems(Weak<dyn ListHandle>),
    Empty,
}

/// Observable lifecycle of a [`ListSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    /// No list bound yet.
    Unbound,
    /// A list is bound; its first load has not been reported.
    BoundPendingData,
    /// The first load delivered items.
    ReadyWithItems,
    /// The first load delivered nothing, or failed.
    ReadyEmpty,
}

/// Coordinates selection requests against a list that becomes available
/// and loaded asynchronously.
///
/// The selector holds the list weakly. Requests that run after the list
/// was dropped do nothing.
pub struct ListSelector {
    list_set: Arc<OnceSignal<Weak<dyn ListHandle>>>,
    load_done: Arc<OnceSignal<Readiness>>,
}

impl Default for ListSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSelector {
    pub fn new() -> Self {
        let list_set = Arc::new(OnceSignal::<Weak<dyn ListHandle>>::new());
        let load_done = Arc::new(OnceSignal::new());

        // Queued first, so the data subscription exists before any request
        // that waits on the bind runs.
        let resolver = load_done.clone();
        list_set.then(move |weak: &Weak<dyn ListHandle>| {
            let Some(list) = weak.upgrade() else {
                tracing::debug!(target: targets::SELECTOR, "list dropped before it could be observed");
                return;
            };
            let weak = weak.clone();
            list.on_data_received_once(Box::new(move |event: &DataReceived| {
                let has_items = event.success
                    && weak.upgrade().is_some_and(|list| !list.items().is_empty());
                let readiness = if has_items {
                    Readiness::WithItems(weak)
                } else {
                    Readiness::Empty
                };
                tracing::debug!(
                    target: targets::SELECTOR,
                    success = event.success,
                    has_items,
                    "first list load reported"
                );
                if resolver.resolve(readiness).is_err() {
                    tracing::debug!(target: targets::SELECTOR, "load already reported");
                }
            }));
        });

        Self {
            list_set,
            load_done,
        }
    }

    /// Binds the list this selector drives.
    ///
    /// # Panics
    ///
    /// Panics if a list is already bound. Use [`try_bind`](Self::try_bind)
    /// to get an error instead.
    pub fn bind<L: ListHandle + 'static>(&self, list: &Arc<L>) {
        if let Err(err) = self.try_bind(list) {
            panic!("{err}");
        }
    }

    /// Binds the list this selector drives, failing with
    /// [`Error::AlreadyBound`] if one is bound already.
    ///
    /// Requests waiting for the bind run before this returns.
    pub fn try_bind<L: ListHandle + 'static>(&self, list: &Arc<L>) -> Result<()> {
        let weak = Arc::downgrade(list) as Weak<dyn ListHandle>;
        self.list_set.resolve(weak).map_err(|_| Error::AlreadyBound)?;
        tracing::debug!(target: targets::SELECTOR, "list bound");
        Ok(())
    }

    /// Selects the first item, in display order, bound to `path`.
    ///
    /// Waits until the bound list reported its first load. Does nothing if
    /// that load was empty, if the list does not allow selection, if the
    /// item at `path` is already selected, or if no item matches.
    pub fn select_by_path(&self, path: impl Into<EntityPath>) {
        let path = path.into();
        tracing::trace!(target: targets::SELECTOR, %path, "selection requested");

        self.load_done.then(move |readiness| match readiness {
            Readiness::Empty => {
                tracing::warn!(target: targets::SELECTOR, %path, "list has no items; nothing to select");
            }
            Readiness::WithItems(weak) => match weak.upgrade() {
                Some(list) => select_in(list.as_ref(), &path),
                None => {
                    tracing::debug!(target: targets::SELECTOR, %path, "list dropped; selection skipped");
                }
            },
        });
    }

    /// Removes every selection of the bound list without announcing it.
    ///
    /// Waits only until a list is bound, not until it has loaded.
    pub fn clear_selection(&self) {
        tracing::trace!(target: targets::SELECTOR, "clear requested");

        self.list_set.then(|weak| match weak.upgrade() {
            Some(list) => list.remove_selections(true),
            None => {
                tracing::debug!(target: targets::SELECTOR, "list dropped; clear skipped");
            }
        });
    }

    pub fn state(&self) -> SelectorState {
        match self.load_done.get() {
            Some(Readiness::WithItems(_)) => SelectorState::ReadyWithItems,
            Some(Readiness::Empty) => SelectorState::ReadyEmpty,
            None if self.list_set.is_resolved() => SelectorState::BoundPendingData,
            None => SelectorState::Unbound,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.list_set.is_resolved()
    }

    /// Waits for the first load of the bound list and returns the state it
    /// settled in.
    #[cfg(feature = "tokio")]
    pub async fn ready(&self) -> SelectorState {
        // The selector owns the signal, so it cannot be dropped while waiting.
        if let Err(err) = self.load_done.wait().await {
            tracing::debug!(target: targets::SELECTOR, error = %err, "stopped waiting for first load");
        }
        self.state()
    }
}

impl fmt::Debug for ListSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSelector")
            .field("state", &self.state())
            .field("pending_selects", &self.load_done.pending_count())
            .finish()
    }
}

fn select_in(list: &dyn ListHandle, path: &EntityPath) {
    if !list.selection_mode().allows_selection() {
        tracing::debug!(target: targets::SELECTOR, %path, "list does not allow selection");
        return;
    }

    let already_selected = list
        .selected_item()
        .is_some_and(|item| item.bound_path() == Some(path));
    if already_selected {
        return;
    }

    match list
        .items()
        .into_iter()
        .find(|item| item.bound_path() == Some(path))
    {
        Some(item) => {
            tracing::debug!(target: targets::SELECTOR, %path, row = item.row(), "selecting item");
            list.set_selected_item(&item);
        }
        None => {
            tracing::debug!(target: targets::SELECTOR, %path, "no item bound to path");
        }
    }
}

static_assertions::assert_impl_all!(ListSelector: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListItem, ListView, SelectionMode};
    use parking_lot::Mutex;

    fn item(id: &str) -> ListItem {
        ListItem::new(id, Some(EntityPath::from(format!("/Set('{id}')"))))
    }

    fn items(ids: &[&str]) -> Vec<ListItem> {
        ids.iter().map(|id| item(id)).collect()
    }

    #[test]
    fn test_state_transitions() {
        let selector = ListSelector::new();
        assert_eq!(selector.state(), SelectorState::Unbound);

        let list = Arc::new(ListView::new());
        selector.bind(&list);
        assert_eq!(selector.state(), SelectorState::BoundPendingData);

        list.receive_data(items(&["a"]), true);
        assert_eq!(selector.state(), SelectorState::ReadyWithItems);
    }

    #[test]
    fn test_failed_load_counts_as_empty() {
        let selector = ListSelector::new();
        let list = Arc::new(ListView::new());
        selector.bind(&list);

        list.receive_data(items(&["a"]), false);
        assert_eq!(selector.state(), SelectorState::ReadyEmpty);

        // Later loads do not change readiness.
        list.receive_data(items(&["a"]), true);
        selector.select_by_path("/Set('a')");
        assert_eq!(selector.state(), SelectorState::ReadyEmpty);
        assert!(list.selected_item().is_none());
    }

    #[test]
    fn test_try_bind_twice() {
        let selector = ListSelector::new();
        let first = Arc::new(ListView::new());
        let second = Arc::new(ListView::new());

        assert!(selector.try_bind(&first).is_ok());
        assert!(matches!(selector.try_bind(&second), Err(Error::AlreadyBound)));

        // The first list stays bound.
        first.receive_data(items(&["a"]), true);
        assert_eq!(selector.state(), SelectorState::ReadyWithItems);
    }

    #[test]
    #[should_panic(expected = "already been bound")]
    fn test_bind_twice_panics() {
        let selector = ListSelector::new();
        let list = Arc::new(ListView::new());
        selector.bind(&list);
        selector.bind(&list);
    }

    #[test]
    fn test_no_selection_mode_is_noop() {
        let selector = ListSelector::new();
        let list = Arc::new(ListView::with_mode(SelectionMode::NoSelection));
        selector.bind(&list);
        list.receive_data(items(&["a"]), true);

        selector.select_by_path("/Set('a')");
        assert!(list.selected_item().is_none());
    }

    #[test]
    fn test_unknown_path_is_noop() {
        let selector = ListSelector::new();
        let list = Arc::new(ListView::new());
        selector.bind(&list);
        list.receive_data(items(&["a", "b"]), true);
        selector.select_by_path("/Set('b')");

        selector.select_by_path("/Set('zz')");
        assert_eq!(list.selected_item().unwrap().title(), "b");
    }

    #[test]
    fn test_dropped_list_skips_requests() {
        let selector = ListSelector::new();
        let list = Arc::new(ListView::new());
        selector.bind(&list);
        list.receive_data(items(&["a"]), true);
        drop(list);

        selector.select_by_path("/Set('a')");
        selector.clear_selection();
        assert_eq!(selector.state(), SelectorState::ReadyWithItems);
    }

    #[test]
    fn test_clear_before_bind_runs_at_bind() {
        let selector = ListSelector::new();
        let list = Arc::new(ListView::new());
        list.receive_data(items(&["a"]), true);
        list.set_selected_item(&list.items()[0]);

        let announced = Arc::new(Mutex::new(0usize));
        let announced_clone = announced.clone();
        list.selection_changed.connect(move |_| *announced_clone.lock() += 1);

        selector.clear_selection();
        assert!(list.selected_item().is_some());

        selector.bind(&list);
        assert!(list.selected_item().is_none());
        assert_eq!(*announced.lock(), 0);
    }

    #[test]
    fn test_first_matching_item_wins() {
        let selector = ListSelector::new();
        let list = Arc::new(ListView::new());
        selector.bind(&list);
        list.receive_data(
            vec![
                ListItem::new("first", Some(EntityPath::from("/Set('dup')"))),
                ListItem::new("second", Some(EntityPath::from("/Set('dup')"))),
            ],
            true,
        );

        selector.select_by_path("/Set('dup')");
        assert_eq!(list.selected_item().unwrap().row(), 0);
    }

    #[test]
    fn test_debug_shows_state() {
        let selector = ListSelector::new();
        selector.select_by_path("/Set('a')");
        let text = format!("{selector:?}");
        assert!(text.contains("Unbound"));
        assert!(text.contains("pending_selects: 1"));
    }
}
