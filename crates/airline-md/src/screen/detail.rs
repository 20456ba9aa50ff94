//! Detail screen: one airline and its flight connections.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use airline_md_core::logging::targets;
use parking_lot::Mutex;

use super::component::AppComponent;
use super::message::Message;
use super::router::{Layout, NEW_CONNECTION_ID, Route, Target};
use crate::error::ServiceError;
use crate::model::{Airline, EntityPath, FlightPlan};

#[derive(Default)]
struct DetailState {
    path: Option<EntityPath>,
    airline: Option<Airline>,
    line_items: Vec<FlightPlan>,
    busy: bool,
    full_screen: bool,
    previous_layout: Layout,
    message: Option<Message>,
}

/// Controller of the airline detail.
pub struct DetailScreen {
    component: Arc<AppComponent>,
    state: Mutex<DetailState>,
    /// Generation of the latest bind; older responses are dropped.
    generation: AtomicU64,
    this: Weak<DetailScreen>,
}

impl DetailScreen {
    pub(crate) fn new(component: Arc<AppComponent>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            component,
            state: Mutex::new(DetailState::default()),
            generation: AtomicU64::new(0),
            this: this.clone(),
        })
    }

    /// The `object` route matched: show the airline with `airline_id`.
    pub fn on_object_matched(&self, airline_id: &str) {
        self.component.set_layout(Layout::TwoColumnsMidExpanded);
        let path = self.component.config().service.airline_key().path_for(airline_id);
        self.bind_view(path);
    }

    /// Binds the view to `path` and reads the airline behind it.
    pub fn bind_view(&self, path: EntityPath) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock();
            state.path = Some(path.clone());
            state.airline = None;
            state.line_items.clear();
            state.busy = true;
        }
        tracing::debug!(target: targets::SCREEN, %path, generation, "binding detail view");

        let this = self.this.clone();
        let bound = path.clone();
        self.component.service().read_airline(
            &path,
            Box::new(move |result| {
                let Some(screen) = this.upgrade() else {
                    return;
                };
                if screen.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                let airline = match result {
                    Ok(airline) => Some(airline),
                    Err(ServiceError::NotFound(_)) => None,
                    Err(err) => {
                        tracing::warn!(target: targets::SCREEN, path = %bound, error = %err, "airline could not be read");
                        None
                    }
                };
                screen.on_binding_change(&bound, airline);
            }),
        );
    }

    /// The bound airline arrived, or turned out not to exist.
    ///
    /// A missing airline shows the not-found target and clears the list
    /// selection; an existing one is selected in the list.
    pub fn on_binding_change(&self, path: &EntityPath, airline: Option<Airline>) {
        let selector = self.component.selector();
        let Some(airline) = airline else {
            self.state.lock().busy = false;
            self.component
                .navigator()
                .display(Target::DetailObjectNotFound);
            selector.clear_selection();
            return;
        };

        selector.select_by_path(path.clone());
        let airline_id = airline.airline_id.clone();
        {
            let mut state = self.state.lock();
            state.airline = Some(airline);
            state.busy = false;
        }
        self.load_line_items(&airline_id);
    }

    fn load_line_items(&self, airline_id: &str) {
        let generation = self.generation.load(Ordering::SeqCst);
        let this = self.this.clone();
        self.component.service().read_flight_plans(
            airline_id,
            Box::new(move |result| {
                let Some(screen) = this.upgrade() else {
                    return;
                };
                if screen.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                match result {
                    Ok(plans) => screen.state.lock().line_items = plans,
                    Err(err) => {
                        tracing::warn!(target: targets::SCREEN, error = %err, "flight connections could not be read");
                        screen.state.lock().line_items.clear();
                    }
                }
            }),
        );
    }

    /// Closes the detail: no list item stays selected.
    pub fn on_close(&self) {
        self.state.lock().full_screen = false;
        self.component.selector().clear_selection();
        self.component.set_layout(Layout::OneColumn);
        self.component.navigator().nav_to(Route::List);
    }

    /// Switches between full screen and the previous layout.
    pub fn toggle_full_screen(&self) {
        let mut state = self.state.lock();
        if state.full_screen {
            self.component.set_layout(state.previous_layout);
        } else {
            state.previous_layout = self.component.layout();
            self.component.set_layout(Layout::MidColumnFullScreen);
        }
        state.full_screen = !state.full_screen;
    }

    /// Navigates to the connection at `index` of the line items.
    pub fn on_line_item_pressed(&self, index: usize) {
        let Some(plan) = self.state.lock().line_items.get(index).cloned() else {
            tracing::debug!(target: targets::SCREEN, index, "no line item at index");
            return;
        };
        self.component.navigator().nav_to(Route::FlightDetail {
            airline_id: plan.airline_id,
            connection_id: plan.connection_id,
        });
    }

    /// Navigates to an empty connection of the displayed airline.
    pub fn on_create_flight(&self) {
        let Some(airline_id) = self.state.lock().airline.as_ref().map(|a| a.airline_id.clone())
        else {
            tracing::debug!(target: targets::SCREEN, "no airline displayed; cannot add a connection");
            return;
        };
        self.component.navigator().nav_to(Route::FlightDetail {
            airline_id,
            connection_id: NEW_CONNECTION_ID.to_string(),
        });
    }

    /// Saves changes to the displayed airline.
    pub fn on_save(&self, airline: Airline) {
        let this = self.this.clone();
        self.component.service().update_airline(
            airline,
            Box::new(move |result| {
                let Some(screen) = this.upgrade() else {
                    return;
                };
                let mut state = screen.state.lock();
                let message = match result {
                    Ok(airline) => {
                        state.airline = Some(airline);
                        Message::toast("Saved successfully!")
                    }
                    Err(err) => Message::alert(format!("Error when saving. ERROR: {err}")),
                };
                state.message = Some(message);
            }),
        );
    }

    /// Deletes the displayed airline and returns to the list.
    pub fn on_delete(&self) {
        let path = self.state.lock().path.clone();
        let Some(path) = path else {
            self.state.lock().message = Some(Message::alert("No context available for deleting"));
            return;
        };
        let this = self.this.clone();
        self.component.service().delete_airline(
            &path,
            Box::new(move |result| {
                let Some(screen) = this.upgrade() else {
                    return;
                };
                match result {
                    Ok(()) => {
                        {
                            let mut state = screen.state.lock();
                            state.airline = None;
                            state.line_items.clear();
                            state.message = Some(Message::toast("Deleted successfully!"));
                        }
                        screen.on_close();
                    }
                    Err(err) => {
                        screen.state.lock().message =
                            Some(Message::alert(format!("Error when deleting. ERROR: {err}")));
                    }
                }
            }),
        );
    }

    pub fn airline(&self) -> Option<Airline> {
        self.state.lock().airline.clone()
    }

    pub fn bound_path(&self) -> Option<EntityPath> {
        self.state.lock().path.clone()
    }

    pub fn line_items(&self) -> Vec<FlightPlan> {
        self.state.lock().line_items.clone()
    }

    /// Heading of the line item table; the count is omitted when empty.
    pub fn line_item_title(&self) -> String {
        match self.state.lock().line_items.len() {
            0 => "Line Items".to_string(),
            count => format!("Line Items ({count})"),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().busy
    }

    pub fn take_message(&self) -> Option<Message> {
        self.state.lock().message.take()
    }
}

static_assertions::assert_impl_all!(DetailScreen: Send, Sync);
