//! Deferred selection tests.
//!
//! The list is loaded through a task queue so that bind, load and requests
//! interleave the way they do with a remote service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use airline_md::model::{
    DataReceived, DataReceivedCallback, EntityPath, ListHandle, ListItem, ListView, SelectionMode,
};
use airline_md::{Error, ListSelector, SelectorState, SharedTaskQueue, Signal};
use parking_lot::Mutex;

fn item(key: &str) -> ListItem {
    ListItem::new(key, Some(EntityPath::from(format!("/Set({key})"))))
}

/// Posts a load of `keys` into `list`, delivered when the queue runs.
fn post_load(queue: &SharedTaskQueue, list: &Arc<ListView>, keys: &[&str]) {
    let list = list.clone();
    let items: Vec<ListItem> = keys.iter().map(|key| item(key)).collect();
    queue.post(move || list.receive_data(items, true));
}

fn count_selection_events(list: &ListView) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = count.clone();
    list.selection_changed.connect(move |_| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });
    count
}

/// A list handle that records how it is driven.
struct RecordingList {
    items: Vec<ListItem>,
    selected: Mutex<Option<ListItem>>,
    mode: SelectionMode,
    set_calls: AtomicUsize,
    remove_calls: Mutex<Vec<bool>>,
    data_received: Arc<Signal<DataReceived>>,
}

impl RecordingList {
    fn new(keys: &[&str]) -> Arc<Self> {
        let view = ListView::new();
        view.receive_data(keys.iter().map(|key| item(key)).collect(), true);
        Arc::new(Self {
            items: view.items(),
            selected: Mutex::new(None),
            mode: SelectionMode::SingleSelection,
            set_calls: AtomicUsize::new(0),
            remove_calls: Mutex::new(Vec::new()),
            data_received: Arc::new(Signal::new()),
        })
    }

    fn load(&self) {
        self.data_received.emit(DataReceived {
            success: true,
            count: self.items.len(),
        });
    }
}

impl ListHandle for RecordingList {
    fn items(&self) -> Vec<ListItem> {
        self.items.clone()
    }

    fn selected_item(&self) -> Option<ListItem> {
        self.selected.lock().clone()
    }

    fn set_selected_item(&self, item: &ListItem) {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        *self.selected.lock() = Some(item.clone());
    }

    fn remove_selections(&self, suppress_event: bool) {
        self.remove_calls.lock().push(suppress_event);
        *self.selected.lock() = None;
    }

    fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    fn on_data_received_once(&self, callback: DataReceivedCallback) {
        self.data_received.connect_once(move |event| callback(event));
    }
}

#[test]
fn test_select_before_bind_waits_for_bind_and_load() {
    let queue = SharedTaskQueue::new();
    let selector = ListSelector::new();
    let list = Arc::new(ListView::new());

    selector.select_by_path("/Set(1)");
    assert_eq!(selector.state(), SelectorState::Unbound);

    selector.bind(&list);
    assert!(list.selected_item().is_none());

    post_load(&queue, &list, &["0", "1", "2"]);
    assert!(list.selected_item().is_none());

    queue.process_all();
    assert_eq!(selector.state(), SelectorState::ReadyWithItems);
    assert_eq!(list.selected_item().unwrap().title(), "1");
}

#[test]
fn test_requests_run_in_issue_order() {
    let queue = SharedTaskQueue::new();
    let selector = ListSelector::new();
    let list = Arc::new(ListView::new());

    selector.select_by_path("/Set(a)");
    selector.bind(&list);
    selector.select_by_path("/Set(b)");
    post_load(&queue, &list, &["a", "b", "c"]);
    queue.process_all();

    assert_eq!(list.selected_item().unwrap().title(), "b");
    assert_eq!(list.selected_items().len(), 1);
}

#[test]
fn test_later_requests_run_immediately() {
    let selector = ListSelector::new();
    let list = Arc::new(ListView::new());
    selector.bind(&list);
    list.receive_data(vec![item("a"), item("b")], true);

    selector.select_by_path("/Set(a)");
    assert_eq!(list.selected_item().unwrap().title(), "a");
    selector.select_by_path("/Set(b)");
    assert_eq!(list.selected_item().unwrap().title(), "b");
}

#[test]
fn test_empty_load_never_selects() {
    let queue = SharedTaskQueue::new();
    let selector = ListSelector::new();
    let list = Arc::new(ListView::new());
    let events = count_selection_events(&list);

    selector.select_by_path("/Set(a)");
    selector.bind(&list);
    post_load(&queue, &list, &[]);
    queue.process_all();
    assert_eq!(selector.state(), SelectorState::ReadyEmpty);

    // Items that arrive with a later load do not make the list ready again.
    post_load(&queue, &list, &["a"]);
    queue.process_all();
    selector.select_by_path("/Set(a)");

    assert!(list.selected_item().is_none());
    assert_eq!(events.load(Ordering::SeqCst), 0);
}

#[test]
fn test_selecting_selected_item_is_noop() {
    let selector = ListSelector::new();
    let list = RecordingList::new(&["a", "b"]);
    selector.bind(&list);
    list.load();

    selector.select_by_path("/Set(a)");
    selector.select_by_path("/Set(a)");
    selector.select_by_path("/Set(a)");

    assert_eq!(list.set_calls.load(Ordering::SeqCst), 1);
    assert_eq!(list.selected_item().unwrap().title(), "a");
}

#[test]
fn test_selecting_selected_item_keeps_multi_selection() {
    let selector = ListSelector::new();
    let list = Arc::new(ListView::with_mode(SelectionMode::MultiSelection));
    selector.bind(&list);
    list.receive_data(vec![item("a"), item("b")], true);

    list.press_item(0);
    list.press_item(1);
    let before = list.selected_items();

    selector.select_by_path("/Set(a)");
    assert_eq!(list.selected_items(), before);
}

#[test]
fn test_clear_runs_at_bind_without_load() {
    let selector = ListSelector::new();
    let list = RecordingList::new(&["a"]);
    *list.selected.lock() = Some(list.items[0].clone());

    selector.clear_selection();
    assert!(list.remove_calls.lock().is_empty());

    selector.bind(&list);
    assert_eq!(selector.state(), SelectorState::BoundPendingData);
    assert_eq!(*list.remove_calls.lock(), vec![true]);
    assert!(list.selected_item().is_none());
}

#[test]
fn test_clear_is_silent() {
    let selector = ListSelector::new();
    let list = Arc::new(ListView::new());
    let events = count_selection_events(&list);
    selector.bind(&list);
    list.receive_data(vec![item("a")], true);

    list.press_item(0);
    assert_eq!(events.load(Ordering::SeqCst), 1);

    selector.clear_selection();
    assert!(list.selected_item().is_none());
    assert_eq!(events.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_queued_before_bind_precedes_earlier_select() {
    let selector = ListSelector::new();
    let list = Arc::new(ListView::new());

    selector.select_by_path("/Set(a)");
    selector.clear_selection();
    selector.bind(&list);
    list.receive_data(vec![item("a")], true);

    // The clear ran at bind; the select ran after the load.
    assert_eq!(list.selected_item().unwrap().title(), "a");
}

#[test]
fn test_second_bind_is_rejected() {
    let selector = ListSelector::new();
    let first = Arc::new(ListView::new());
    let second = Arc::new(ListView::new());
    selector.bind(&first);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        selector.bind(&second);
    }));
    assert!(result.is_err());
    assert!(matches!(selector.try_bind(&second), Err(Error::AlreadyBound)));

    // Loading the rejected list does not make the selector ready.
    second.receive_data(vec![item("a")], true);
    assert_eq!(selector.state(), SelectorState::BoundPendingData);
}

#[test]
fn test_select_on_no_selection_list_is_noop() {
    let selector = ListSelector::new();
    let list = Arc::new(ListView::with_mode(SelectionMode::NoSelection));
    selector.bind(&list);
    list.receive_data(vec![item("a")], true);

    selector.select_by_path("/Set(a)");
    assert!(list.selected_item().is_none());
}

#[cfg(feature = "tokio")]
#[tokio::test]
async fn test_ready_waits_for_first_load() {
    let selector = Arc::new(ListSelector::new());
    let list = Arc::new(ListView::new());
    selector.bind(&list);

    let waiter = {
        let selector = selector.clone();
        tokio::spawn(async move { selector.ready().await })
    };
    tokio::task::yield_now().await;
    list.receive_data(vec![item("a")], true);

    assert_eq!(waiter.await.unwrap(), SelectorState::ReadyWithItems);
}
