//! Headless list view.
//!
//! [`ListHandle`] is the interface the selection machinery uses to talk to a
//! renderable list. [`ListView`] is the implementation used by the screens:
//! it holds the items currently displayed (in display order), a
//! [`SelectionModel`], and the signals a list control exposes.

use std::sync::Arc;

use airline_md_core::{PerfSpan, Signal};
use airline_md_core::logging::targets;
use parking_lot::{Mutex, RwLock};

use super::path::EntityPath;
use super::selection::{SelectionDelta, SelectionFlags, SelectionMode, SelectionModel};

/// One displayed row of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    row: usize,
    title: String,
    bound_path: Option<EntityPath>,
}

impl ListItem {
    /// Creates an item. The row is assigned when the item is placed in a list.
    pub fn new(title: impl Into<String>, bound_path: Option<EntityPath>) -> Self {
        Self {
            row: 0,
            title: title.into(),
            bound_path,
        }
    }

    /// Position of the item in display order.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Path of the entity this item displays, if it is bound.
    pub fn bound_path(&self) -> Option<&EntityPath> {
        self.bound_path.as_ref()
    }
}

/// Payload of the data-received notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataReceived {
    /// False if the data layer reported a failure.
    pub success: bool,
    /// Number of items displayed after the load.
    pub count: usize,
}

/// Payload of the user-facing selection-changed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    /// Items whose state changed.
    pub items: Vec<ListItem>,
    /// True if `items` became selected, false if they were deselected.
    pub selected: bool,
}

/// Callback for [`ListHandle::on_data_received_once`].
pub type DataReceivedCallback = Box<dyn FnOnce(&DataReceived) + Send + 'static>;

/// A renderable, ordered collection the selection machinery can drive.
pub trait ListHandle: Send + Sync {
    /// Items in display order.
    fn items(&self) -> Vec<ListItem>;

    /// The (first) selected item.
    fn selected_item(&self) -> Option<ListItem>;

    /// Selects `item`, replacing the selection in single-selection mode.
    fn set_selected_item(&self, item: &ListItem);

    /// Removes all selections. With `suppress_event` no selection-changed
    /// notification is emitted.
    fn remove_selections(&self, suppress_event: bool);

    fn selection_mode(&self) -> SelectionMode;

    /// Runs `callback` on the next data-received notification only.
    fn on_data_received_once(&self, callback: DataReceivedCallback);
}

/// Headless list control.
///
/// # Signals
///
/// - `data_received`: Emitted after every load, successful or not
/// - `update_finished`: Emitted after every load with the displayed count
/// - `selection_changed`: Emitted for user selection and for non-silent
///   selection removal; programmatic selection is silent
pub struct ListView {
    items: RwLock<Vec<ListItem>>,
    selection: Mutex<SelectionModel>,

    pub data_received: Arc<Signal<DataReceived>>,
    pub update_finished: Signal<usize>,
    pub selection_changed: Signal<SelectionChange>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    /// Creates an empty single-selection list.
    pub fn new() -> Self {
        Self::with_mode(SelectionMode::default())
    }

    pub fn with_mode(mode: SelectionMode) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            selection: Mutex::new(SelectionModel::with_mode(mode)),
            data_received: Arc::new(Signal::new()),
            update_finished: Signal::new(),
            selection_changed: Signal::new(),
        }
    }

    pub fn set_selection_mode(&self, mode: SelectionMode) {
        self.selection.lock().set_selection_mode(mode);
    }

    pub fn item_count(&self) -> usize {
        self.items.read().len()
    }

    /// All selected items in selection order.
    pub fn selected_items(&self) -> Vec<ListItem> {
        let items = self.items.read();
        let selection = self.selection.lock();
        selection
            .selected_rows()
            .iter()
            .filter_map(|&row| items.get(row).cloned())
            .collect()
    }

    /// The first displayed item bound to `path`.
    pub fn find_by_path(&self, path: &EntityPath) -> Option<ListItem> {
        self.items
            .read()
            .iter()
            .find(|item| item.bound_path() == Some(path))
            .cloned()
    }

    /// Replaces the displayed items.
    ///
    /// Rows are renumbered in the given order. Items whose bound path was
    /// selected before stay selected; nothing is announced.
    pub fn set_items(&self, new_items: Vec<ListItem>) {
        let mut items = self.items.write();
        let mut selection = self.selection.lock();

        let remembered: Vec<EntityPath> = selection
            .selected_rows()
            .iter()
            .filter_map(|&row| items.get(row).and_then(|i| i.bound_path().cloned()))
            .collect();

        *items = new_items
            .into_iter()
            .enumerate()
            .map(|(row, mut item)| {
                item.row = row;
                item
            })
            .collect();

        selection.clear_selection();
        for item in items.iter() {
            if item.bound_path().is_some_and(|path| remembered.contains(path)) {
                selection.select(item.row, SelectionFlags::SELECT);
            }
        }
    }

    /// Delivers the result of a load.
    ///
    /// A failed load displays no items. Emits `data_received` and then
    /// `update_finished`.
    pub fn receive_data(&self, items: Vec<ListItem>, success: bool) {
        let _span = PerfSpan::new("list_receive_data");
        self.set_items(if success { items } else { Vec::new() });
        let count = self.item_count();
        tracing::debug!(target: targets::LIST, success, count, "list data received");

        self.data_received.emit(DataReceived { success, count });
        self.update_finished.emit(count);
    }

    /// Selects `row` the way a user press does and announces the change.
    ///
    /// Single selection replaces the current selection and announces only
    /// the newly selected item; multi selection toggles the row.
    pub fn press_item(&self, row: usize) {
        let (mut delta, items, single) = {
            let items = self.items.read();
            if row >= items.len() {
                return;
            }
            let mut selection = self.selection.lock();
            let single = selection.selection_mode() == SelectionMode::SingleSelection;
            let flags = if single {
                SelectionFlags::CLEAR_AND_SELECT
            } else {
                SelectionFlags::TOGGLE
            };
            (selection.select(row, flags), items.clone(), single)
        };
        if single && !delta.selected.is_empty() {
            delta.deselected.clear();
        }
        self.announce(delta, &items);
    }

    fn announce(&self, delta: SelectionDelta, items: &[ListItem]) {
        let pick = |rows: &[usize]| -> Vec<ListItem> {
            rows.iter().filter_map(|&row| items.get(row).cloned()).collect()
        };
        if !delta.deselected.is_empty() {
            self.selection_changed.emit(SelectionChange {
                items: pick(&delta.deselected),
                selected: false,
            });
        }
        if !delta.selected.is_empty() {
            self.selection_changed.emit(SelectionChange {
                items: pick(&delta.selected),
                selected: true,
            });
        }
    }
}

impl ListHandle for ListView {
    fn items(&self) -> Vec<ListItem> {
        self.items.read().clone()
    }

    fn selected_item(&self) -> Option<ListItem> {
        let items = self.items.read();
        let row = self.selection.lock().first_selected()?;
        items.get(row).cloned()
    }

    fn set_selected_item(&self, item: &ListItem) {
        let items = self.items.read();
        let row = match items.get(item.row()) {
            Some(current) if current == item => item.row(),
            _ => match items.iter().position(|i| i.bound_path() == item.bound_path()) {
                Some(row) if item.bound_path().is_some() => row,
                _ => {
                    tracing::debug!(target: targets::LIST, title = item.title(), "item is not displayed");
                    return;
                }
            },
        };

        let mut selection = self.selection.lock();
        let flags = match selection.selection_mode() {
            SelectionMode::SingleSelection => SelectionFlags::CLEAR_AND_SELECT,
            _ => SelectionFlags::SELECT,
        };
        selection.select(row, flags);
    }

    fn remove_selections(&self, suppress_event: bool) {
        let (delta, items) = {
            let items = self.items.read();
            let delta = self.selection.lock().clear_selection();
            (delta, items.clone())
        };
        if !suppress_event {
            self.announce(delta, &items);
        }
    }

    fn selection_mode(&self) -> SelectionMode {
        self.selection.lock().selection_mode()
    }

    fn on_data_received_once(&self, callback: DataReceivedCallback) {
        self.data_received.connect_once(move |event| callback(event));
    }
}

static_assertions::assert_impl_all!(ListView: Send, Sync);
