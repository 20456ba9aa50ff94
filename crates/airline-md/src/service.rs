//! Entity service interface and an in-memory implementation.
//!
//! The remote entity service is an external collaborator; the app only talks
//! to it through [`EntityService`]. Every call is asynchronous: the result is
//! handed to a completion callback later, never from inside the call.
//!
//! [`InMemoryService`] answers from memory but delivers every completion
//! through a [`SharedTaskQueue`], so callers observe the same
//! "request now, response later" ordering as with a remote round trip.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use airline_md_core::SharedTaskQueue;
use airline_md_core::logging::targets;
use parking_lot::RwLock;

use crate::error::ServiceError;
use crate::model::{Airline, AirlineKey, AirlineQuery, EntityPath, FlightPlan};

/// Completion callback of a service request.
pub type Completion<T> = Box<dyn FnOnce(Result<T, ServiceError>) + Send + 'static>;

/// Operations the app needs from the remote entity service.
pub trait EntityService: Send + Sync {
    /// Reads the airline list, filtered and sorted by `query`.
    fn read_airlines(&self, query: &AirlineQuery, done: Completion<Vec<Airline>>);

    /// Reads the airline at `path`.
    fn read_airline(&self, path: &EntityPath, done: Completion<Airline>);

    /// Reads the flight connections of an airline, ordered by connection ID.
    fn read_flight_plans(&self, airline_id: &str, done: Completion<Vec<FlightPlan>>);

    /// Reads the flight connection at `path`.
    fn read_flight_plan(&self, path: &EntityPath, done: Completion<FlightPlan>);

    /// Creates an airline. Fails with [`ServiceError::Conflict`] if the key
    /// is taken.
    fn create_airline(&self, airline: Airline, done: Completion<Airline>);

    /// Replaces an existing airline.
    fn update_airline(&self, airline: Airline, done: Completion<Airline>);

    /// Deletes the airline at `path` together with its connections.
    fn delete_airline(&self, path: &EntityPath, done: Completion<()>);

    /// Creates a connection of an existing airline. Fails with
    /// [`ServiceError::Conflict`] if the connection ID is taken.
    fn create_flight_plan(&self, plan: FlightPlan, done: Completion<FlightPlan>);

    /// Replaces an existing connection.
    fn update_flight_plan(&self, plan: FlightPlan, done: Completion<FlightPlan>);

    /// Deletes the connection at `path`.
    fn delete_flight_plan(&self, path: &EntityPath, done: Completion<()>);
}

#[derive(Default)]
struct Store {
    airlines: Vec<Airline>,
    flight_plans: Vec<FlightPlan>,
}

/// In-memory [`EntityService`] answering through a task queue.
///
/// Airlines are addressed through an [`AirlineKey`]; it must match the key
/// the app is configured with.
pub struct InMemoryService {
    store: RwLock<Store>,
    key: AirlineKey,
    queue: SharedTaskQueue,
    available: AtomicBool,
}

impl InMemoryService {
    pub fn new(queue: SharedTaskQueue) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            key: AirlineKey::default(),
            queue,
            available: AtomicBool::new(true),
        }
    }

    /// Creates a service preloaded with airlines and connections.
    pub fn with_data(
        queue: SharedTaskQueue,
        airlines: Vec<Airline>,
        flight_plans: Vec<FlightPlan>,
    ) -> Self {
        let service = Self::new(queue);
        *service.store.write() = Store {
            airlines,
            flight_plans,
        };
        service
    }

    /// Addresses airlines through `key` instead of the default key.
    pub fn with_key(mut self, key: AirlineKey) -> Self {
        self.key = key;
        self
    }

    /// While unavailable, every request fails with
    /// [`ServiceError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn airline_count(&self) -> usize {
        self.store.read().airlines.len()
    }

    pub fn flight_plan_count(&self) -> usize {
        self.store.read().flight_plans.len()
    }

    /// Runs `op` against the store and posts its result to the queue.
    fn run<T, F>(&self, done: Completion<T>, op: F)
    where
        T: Send + 'static,
        F: FnOnce(&Self) -> Result<T, ServiceError>,
    {
        let result = if self.available.load(Ordering::SeqCst) {
            op(self)
        } else {
            Err(ServiceError::Unavailable("service offline".into()))
        };
        if let Err(err) = &result {
            tracing::debug!(target: targets::SERVICE, error = %err, "request failed");
        }
        self.queue.post(move || done(result));
    }

    fn find_airline(&self, path: &EntityPath) -> Result<Airline, ServiceError> {
        self.store
            .read()
            .airlines
            .iter()
            .find(|airline| self.key.path_of(airline) == *path)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(path.clone()))
    }
}

fn check_flight_plan_keys(plan: &FlightPlan) -> Result<(), ServiceError> {
    if plan.airline_id.is_empty() || plan.connection_id.is_empty() {
        return Err(ServiceError::Invalid(
            "AirlineID and ConnectionID must be set".into(),
        ));
    }
    Ok(())
}

impl EntityService for InMemoryService {
    fn read_airlines(&self, query: &AirlineQuery, done: Completion<Vec<Airline>>) {
        self.run(done, |service| {
            let mut airlines = service.store.read().airlines.clone();
            query.apply(&mut airlines);
            tracing::trace!(target: targets::SERVICE, count = airlines.len(), "read airlines");
            Ok(airlines)
        });
    }

    fn read_airline(&self, path: &EntityPath, done: Completion<Airline>) {
        self.run(done, |service| service.find_airline(path));
    }

    fn read_flight_plans(&self, airline_id: &str, done: Completion<Vec<FlightPlan>>) {
        self.run(done, |service| {
            let mut plans: Vec<FlightPlan> = service
                .store
                .read()
                .flight_plans
                .iter()
                .filter(|plan| plan.airline_id == airline_id)
                .cloned()
                .collect();
            plans.sort_by(|a, b| a.connection_id.cmp(&b.connection_id));
            Ok(plans)
        });
    }

    fn read_flight_plan(&self, path: &EntityPath, done: Completion<FlightPlan>) {
        self.run(done, |service| {
            service
                .store
                .read()
                .flight_plans
                .iter()
                .find(|plan| plan.path() == *path)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound(path.clone()))
        });
    }

    fn create_airline(&self, airline: Airline, done: Completion<Airline>) {
        self.run(done, |service| {
            if airline.airline_id.is_empty() || service.key.value_of(&airline).is_empty() {
                return Err(ServiceError::Invalid("airline key must be set".into()));
            }
            let path = service.key.path_of(&airline);
            let mut store = service.store.write();
            let taken = store.airlines.iter().any(|a| {
                a.airline_id == airline.airline_id || service.key.path_of(a) == path
            });
            if taken {
                return Err(ServiceError::Conflict(path));
            }
            store.airlines.push(airline.clone());
            Ok(airline)
        });
    }

    fn update_airline(&self, airline: Airline, done: Completion<Airline>) {
        self.run(done, |service| {
            let mut store = service.store.write();
            let existing = store
                .airlines
                .iter_mut()
                .find(|a| a.airline_id == airline.airline_id)
                .ok_or_else(|| ServiceError::NotFound(service.key.path_of(&airline)))?;
            *existing = airline.clone();
            Ok(airline)
        });
    }

    fn delete_airline(&self, path: &EntityPath, done: Completion<()>) {
        self.run(done, |service| {
            let mut store = service.store.write();
            let pos = store
                .airlines
                .iter()
                .position(|a| service.key.path_of(a) == *path)
                .ok_or_else(|| ServiceError::NotFound(path.clone()))?;
            let removed = store.airlines.remove(pos);
            store
                .flight_plans
                .retain(|plan| plan.airline_id != removed.airline_id);
            Ok(())
        });
    }

    fn create_flight_plan(&self, plan: FlightPlan, done: Completion<FlightPlan>) {
        self.run(done, |service| {
            check_flight_plan_keys(&plan)?;
            let mut store = service.store.write();
            if !store.airlines.iter().any(|a| a.airline_id == plan.airline_id) {
                return Err(ServiceError::NotFound(service.key.path_for(&plan.airline_id)));
            }
            if store.flight_plans.iter().any(|p| p.path() == plan.path()) {
                return Err(ServiceError::Conflict(plan.path()));
            }
            store.flight_plans.push(plan.clone());
            tracing::trace!(target: targets::SERVICE, path = %plan.path(), "created flight connection");
            Ok(plan)
        });
    }

    fn update_flight_plan(&self, plan: FlightPlan, done: Completion<FlightPlan>) {
        self.run(done, |service| {
            let path = plan.path();
            let mut store = service.store.write();
            let existing = store
                .flight_plans
                .iter_mut()
                .find(|p| p.path() == path)
                .ok_or_else(|| ServiceError::NotFound(path.clone()))?;
            *existing = plan.clone();
            Ok(plan)
        });
    }

    fn delete_flight_plan(&self, path: &EntityPath, done: Completion<()>) {
        self.run(done, |service| {
            let mut store = service.store.write();
            let pos = store
                .flight_plans
                .iter()
                .position(|p| p.path() == *path)
                .ok_or_else(|| ServiceError::NotFound(path.clone()))?;
            store.flight_plans.remove(pos);
            Ok(())
        });
    }
}

static_assertions::assert_impl_all!(InMemoryService: Send, Sync);

/// Shared handle to a service, as held by the app component.
pub type SharedService = Arc<dyn EntityService>;
