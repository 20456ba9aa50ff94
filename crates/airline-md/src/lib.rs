//! Headless master-detail core for browsing airlines.
//!
//! The app shows an airline list next to the detail of one airline. The
//! detail can be opened directly by route, before the list has been shown
//! or has loaded, so list selection is coordinated by a [`ListSelector`]
//! that defers each request until the list is ready for it.
//!
//! # Modules
//!
//! - [`model`]: Entities, entity paths, selection model, list view and
//!   list binding
//! - [`selector`]: Deferred selection coordination
//! - [`service`]: Entity service interface and in-memory implementation
//! - [`screen`]: List, detail and flight detail screen controllers, routing
//! - [`config`]: TOML configuration
//!
//! # Logging
//!
//! Everything logs through `tracing` under the targets in
//! [`airline_md_core::logging::targets`].

pub mod config;
mod error;
pub mod model;
pub mod screen;
pub mod selector;
pub mod service;

pub use config::AppConfig;
pub use error::{Error, Result, ServiceError};
pub use selector::{ListSelector, SelectorState};
pub use service::{EntityService, InMemoryService, SharedService};

pub use airline_md_core::{OnceSignal, SharedTaskQueue, Signal};
