//! Master screen: the airline list.

use std::sync::{Arc, Weak};

use airline_md_core::logging::targets;
use parking_lot::Mutex;

use super::component::AppComponent;
use super::message::Message;
use super::router::{Layout, Route};
use crate::model::{
    Airline, Filter, GroupHeader, ListBinding, ListHandle, ListView, NoDataText, SelectionChange,
    SelectionMode, SortKey, Sorter,
};

/// The open "new airline" dialog.
struct CreateDialog {
    draft: Airline,
    busy: bool,
}

struct ListScreenState {
    title: String,
    no_data_text: NoDataText,
    shown: bool,
    create: Option<CreateDialog>,
    message: Option<Message>,
}

/// Controller of the airline list.
///
/// Wires the list view to the service through a [`ListBinding`] and turns
/// user selection into navigation to the detail route.
pub struct ListScreen {
    component: Arc<AppComponent>,
    binding: ListBinding,
    state: Mutex<ListScreenState>,
    this: Weak<ListScreen>,
}

impl ListScreen {
    pub(crate) fn new(component: Arc<AppComponent>) -> Arc<Self> {
        let config = component.config();
        let list = Arc::new(ListView::with_mode(config.list.selection_mode));
        let binding = ListBinding::new(
            component.service().clone(),
            list.clone(),
            config.service.airline_key(),
            config.service.search_property.as_str(),
            config.list.sorter(),
        )
        .with_group_by(config.list.group_by);

        let screen = Arc::new_cyclic(|this| Self {
            component,
            binding,
            state: Mutex::new(ListScreenState {
                title: list_title(0),
                no_data_text: NoDataText::Default,
                shown: false,
                create: None,
                message: None,
            }),
            this: this.clone(),
        });

        let weak: Weak<Self> = Arc::downgrade(&screen);
        list.update_finished.connect(move |total| {
            if let Some(screen) = weak.upgrade() {
                screen.on_update_finished(*total);
            }
        });
        let weak: Weak<Self> = Arc::downgrade(&screen);
        list.selection_changed.connect(move |change| {
            if let Some(screen) = weak.upgrade() {
                screen.on_selection_change(change);
            }
        });

        screen
    }

    pub fn list(&self) -> &Arc<ListView> {
        self.binding.list()
    }

    pub fn binding(&self) -> &ListBinding {
        &self.binding
    }

    /// Binds the list to the selector and triggers the initial read. Only
    /// the first call has an effect.
    pub fn on_before_first_show(&self) {
        {
            let mut state = self.state.lock();
            if state.shown {
                return;
            }
            state.shown = true;
        }
        self.component.selector().bind(self.binding.list());
        self.binding.refresh();
    }

    pub fn on_list_matched(&self) {
        self.component.set_layout(Layout::OneColumn);
    }

    /// Applies a search query. With `refresh_pressed`, the list is only
    /// re-read with the current state.
    pub fn on_search(&self, query: &str, refresh_pressed: bool) {
        if refresh_pressed {
            self.on_refresh();
            return;
        }
        self.binding.search(query);
        self.update_no_data_text();
    }

    /// Re-reads the list, keeping search, filter and sort state.
    pub fn on_refresh(&self) {
        self.binding.refresh();
    }

    pub fn on_filter(&self, filters: Vec<Filter>) {
        self.binding.filter(filters);
        self.update_no_data_text();
    }

    pub fn on_sort(&self, sorter: Sorter) {
        self.binding.sort(sorter);
    }

    /// Applies the sort order and grouping chosen in the view settings.
    pub fn on_sort_group(&self, sorter: Sorter, group_by: Option<SortKey>) {
        self.binding.sort_group(sorter, group_by);
    }

    /// Navigates to the detail of the affected item, except when an item
    /// is deselected in multi selection mode.
    pub fn on_selection_change(&self, change: &SelectionChange) {
        let list = self.binding.list();
        if list.selection_mode() == SelectionMode::MultiSelection && !change.selected {
            return;
        }
        let Some(item) = change.items.first() else {
            return;
        };
        let Some(airline) = self.binding.context(item) else {
            tracing::debug!(target: targets::SCREEN, title = item.title(), "selected item has no airline");
            return;
        };

        let airline_id = self.binding.key().value_of(&airline).to_string();
        self.component.set_layout(Layout::TwoColumnsMidExpanded);
        self.component
            .navigator()
            .nav_to(Route::Object { airline_id });
    }

    /// Opens the "new airline" dialog with an empty draft.
    pub fn on_create(&self) {
        self.state.lock().create = Some(CreateDialog {
            draft: Airline::new("", "", ""),
            busy: false,
        });
    }

    /// Creates `airline` from the open dialog. On success the dialog closes
    /// and the list is re-read; on failure it stays open with an alert.
    pub fn on_save_new(&self, airline: Airline) {
        {
            let mut state = self.state.lock();
            let Some(dialog) = state.create.as_mut() else {
                tracing::debug!(target: targets::SCREEN, "no new airline to save");
                return;
            };
            dialog.draft = airline.clone();
            dialog.busy = true;
        }

        let this = self.this.clone();
        self.component.service().create_airline(
            airline,
            Box::new(move |result| {
                let Some(screen) = this.upgrade() else {
                    return;
                };
                match result {
                    Ok(airline) => {
                        tracing::debug!(target: targets::SCREEN, airline_id = %airline.airline_id, "airline created");
                        {
                            let mut state = screen.state.lock();
                            state.create = None;
                            state.message = Some(Message::toast("Saved successfully!"));
                        }
                        screen.binding.refresh();
                    }
                    Err(err) => {
                        let mut state = screen.state.lock();
                        if let Some(dialog) = state.create.as_mut() {
                            dialog.busy = false;
                        }
                        state.message = Some(Message::alert(format!("Error when saving. ERROR: {err}")));
                    }
                }
            }),
        );
    }

    /// Discards the draft and closes the dialog.
    pub fn on_cancel_new(&self) {
        self.state.lock().create = None;
    }

    /// No route matched: drop the selection without announcing it.
    pub fn on_bypassed(&self) {
        self.binding.list().remove_selections(true);
    }

    pub fn on_update_finished(&self, total: usize) {
        self.state.lock().title = list_title(total);
    }

    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    pub fn no_data_text(&self) -> NoDataText {
        self.state.lock().no_data_text
    }

    pub fn groups(&self) -> Vec<GroupHeader> {
        self.binding.groups()
    }

    pub fn is_create_open(&self) -> bool {
        self.state.lock().create.is_some()
    }

    pub fn is_create_busy(&self) -> bool {
        self.state.lock().create.as_ref().is_some_and(|dialog| dialog.busy)
    }

    /// The airline being entered in the open dialog.
    pub fn create_draft(&self) -> Option<Airline> {
        self.state.lock().create.as_ref().map(|dialog| dialog.draft.clone())
    }

    pub fn take_message(&self) -> Option<Message> {
        self.state.lock().message.take()
    }

    fn update_no_data_text(&self) {
        self.state.lock().no_data_text = self.binding.no_data_text();
    }
}

fn list_title(total: usize) -> String {
    format!("Airlines ({total})")
}
