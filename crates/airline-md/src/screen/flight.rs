//! Flight detail screen: one connection of an airline, or a new one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use airline_md_core::logging::targets;
use parking_lot::Mutex;

use super::component::AppComponent;
use super::message::Message;
use super::router::{NEW_CONNECTION_ID, Target};
use crate::error::ServiceError;
use crate::model::{EntityPath, FlightPlan};

#[derive(Default)]
struct FlightState {
    path: Option<EntityPath>,
    flight: Option<FlightPlan>,
    is_new: bool,
    busy: bool,
    message: Option<Message>,
}

/// Controller of the flight connection form.
///
/// An existing connection is read by its key and saved as an update. The
/// connection ID [`NEW_CONNECTION_ID`] opens an empty draft instead, which
/// is saved as a create.
pub struct FlightDetailScreen {
    component: Arc<AppComponent>,
    state: Mutex<FlightState>,
    /// Generation of the latest route match; older reads are dropped.
    generation: AtomicU64,
    this: Weak<FlightDetailScreen>,
}

impl FlightDetailScreen {
    pub(crate) fn new(component: Arc<AppComponent>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            component,
            state: Mutex::new(FlightState::default()),
            generation: AtomicU64::new(0),
            this: this.clone(),
        })
    }

    /// The flight detail route matched.
    pub fn on_route_matched(&self, airline_id: &str, connection_id: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if connection_id == NEW_CONNECTION_ID {
            self.init_new_flight(airline_id);
            return;
        }

        let path = FlightPlan::key_path(airline_id, connection_id);
        *self.state.lock() = FlightState {
            path: Some(path.clone()),
            busy: true,
            ..FlightState::default()
        };
        tracing::debug!(target: targets::SCREEN, %path, generation, "binding flight view");

        let this = self.this.clone();
        let bound = path.clone();
        self.component.service().read_flight_plan(
            &path,
            Box::new(move |result| {
                let Some(screen) = this.upgrade() else {
                    return;
                };
                if screen.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                let flight = match result {
                    Ok(flight) => Some(flight),
                    Err(ServiceError::NotFound(_)) => None,
                    Err(err) => {
                        tracing::warn!(target: targets::SCREEN, path = %bound, error = %err, "flight connection could not be read");
                        None
                    }
                };
                let found = flight.is_some();
                {
                    let mut state = screen.state.lock();
                    state.flight = flight;
                    state.busy = false;
                }
                if !found {
                    screen.component.navigator().display(Target::NotFound);
                }
            }),
        );
    }

    fn init_new_flight(&self, airline_id: &str) {
        tracing::debug!(target: targets::SCREEN, airline_id, "new flight connection");
        *self.state.lock() = FlightState {
            flight: Some(FlightPlan::draft(airline_id)),
            is_new: true,
            ..FlightState::default()
        };
    }

    /// Creates the draft or updates the bound connection, then returns to
    /// the previous route. A failed save keeps the form as it is.
    pub fn on_save(&self, flight: FlightPlan) {
        let is_new = self.state.lock().is_new;
        let this = self.this.clone();
        let done = Box::new(move |result: Result<FlightPlan, ServiceError>| {
            let Some(screen) = this.upgrade() else {
                return;
            };
            match result {
                Ok(flight) => {
                    {
                        let mut state = screen.state.lock();
                        state.path = Some(flight.path());
                        state.flight = Some(flight);
                        state.is_new = false;
                        state.message = Some(Message::toast("Saved successfully!"));
                    }
                    screen.component.navigator().nav_back();
                }
                Err(err) => {
                    screen.state.lock().message =
                        Some(Message::alert(format!("Error when saving. ERROR: {err}")));
                }
            }
        });

        let service = self.component.service();
        if is_new {
            service.create_flight_plan(flight, done);
        } else {
            service.update_flight_plan(flight, done);
        }
    }

    /// Deletes the bound connection and returns to the previous route.
    pub fn on_delete(&self) {
        let path = self.state.lock().path.clone();
        let Some(path) = path else {
            self.state.lock().message = Some(Message::alert("No context available for deleting"));
            return;
        };
        let this = self.this.clone();
        self.component.service().delete_flight_plan(
            &path,
            Box::new(move |result| {
                let Some(screen) = this.upgrade() else {
                    return;
                };
                match result {
                    Ok(()) => {
                        {
                            let mut state = screen.state.lock();
                            state.path = None;
                            state.flight = None;
                            state.message = Some(Message::toast("Connection was deleted"));
                        }
                        screen.component.navigator().nav_back();
                    }
                    Err(err) => {
                        screen.state.lock().message =
                            Some(Message::alert(format!("Error when deleting. ERROR: {err}")));
                    }
                }
            }),
        );
    }

    pub fn flight(&self) -> Option<FlightPlan> {
        self.state.lock().flight.clone()
    }

    pub fn bound_path(&self) -> Option<EntityPath> {
        self.state.lock().path.clone()
    }

    /// Returns true while the form holds an unsaved new connection.
    pub fn is_new(&self) -> bool {
        self.state.lock().is_new
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().busy
    }

    pub fn take_message(&self) -> Option<Message> {
        self.state.lock().message.take()
    }
}

static_assertions::assert_impl_all!(FlightDetailScreen: Send, Sync);
