//! Screen controllers of the master-detail app.
//!
//! - [`AppComponent`]: Shared state, including the single [`ListSelector`]
//! - [`ListScreen`]: The airline list (master)
//! - [`DetailScreen`]: One airline and its connections (detail)
//! - [`FlightDetailScreen`]: One connection, or a new one
//!
//! Screens never reference each other. The list screen binds its list to
//! the selector; the detail screen asks the selector to select or clear,
//! whether or not the list has been shown or loaded yet.
//!
//! [`ListSelector`]: crate::ListSelector

mod component;
mod detail;
mod flight;
mod list;
mod message;
mod router;

pub use component::AppComponent;
pub use detail::DetailScreen;
pub use flight::FlightDetailScreen;
pub use list::ListScreen;
pub use message::{Message, MessageKind};
pub use router::{
    Layout, NEW_CONNECTION_ID, Navigation, Navigator, RecordingNavigator, Route, Target,
};
