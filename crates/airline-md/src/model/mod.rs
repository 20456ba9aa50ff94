//! Model layer of the master-detail app.
//!
//! # Core Types
//!
//! - [`EntityPath`]: Opaque path identifying a bound entity
//! - [`Airline`], [`FlightPlan`]: Entities served by the airline service
//! - [`SelectionModel`]: Selection state of a flat list
//! - [`ListHandle`], [`ListView`]: The list control the selector drives
//! - [`ListBinding`]: Search, filter and sort state feeding a list view

mod binding;
mod entity;
mod list_view;
mod path;
pub mod selection;

pub use binding::{
    AirlineQuery, Filter, FilterOperator, GroupHeader, ListBinding, ListFilterState, NoDataText,
    SortKey, Sorter, group_headers,
};
pub use entity::{
    AIRLINE_KEY_PROPERTY, AIRLINE_SET, Airline, AirlineKey, FLIGHT_PLAN_SET, FlightPlan,
};
pub use list_view::{
    DataReceived, DataReceivedCallback, ListHandle, ListItem, ListView, SelectionChange,
};
pub use path::EntityPath;
pub use selection::{SelectionDelta, SelectionFlags, SelectionMode, SelectionModel};
