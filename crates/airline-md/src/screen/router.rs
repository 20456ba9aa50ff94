//! Routes, display targets and the navigator interface.

use std::fmt;

use airline_md_core::logging::targets;
use parking_lot::Mutex;

/// Connection ID of the flight detail route that opens an empty connection.
pub const NEW_CONNECTION_ID: &str = "New";

/// A navigable location of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The airline list alone.
    List,
    /// List plus the detail of one airline.
    Object { airline_id: String },
    /// One flight connection of an airline, or a new one when the
    /// connection ID is [`NEW_CONNECTION_ID`].
    FlightDetail {
        airline_id: String,
        connection_id: String,
    },
}

impl Route {
    /// Parses a location hash.
    ///
    /// Recognised patterns are `""`, `AirlineSet/{id}` and
    /// `AirlineSet/{id}/FlightPlanSet/{connection}`. Anything else is
    /// unmatched and returns `None`.
    pub fn parse(hash: &str) -> Option<Self> {
        let hash = hash.trim_start_matches('#').trim_matches('/');
        let segments: Vec<&str> = if hash.is_empty() {
            Vec::new()
        } else {
            hash.split('/').collect()
        };
        match segments.as_slice() {
            [] => Some(Self::List),
            ["AirlineSet", id] if !id.is_empty() => Some(Self::Object {
                airline_id: (*id).to_string(),
            }),
            ["AirlineSet", id, "FlightPlanSet", connection]
                if !id.is_empty() && !connection.is_empty() =>
            {
                Some(Self::FlightDetail {
                    airline_id: (*id).to_string(),
                    connection_id: (*connection).to_string(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => Ok(()),
            Self::Object { airline_id } => write!(f, "AirlineSet/{airline_id}"),
            Self::FlightDetail {
                airline_id,
                connection_id,
            } => write!(f, "AirlineSet/{airline_id}/FlightPlanSet/{connection_id}"),
        }
    }
}

/// A view displayed without changing the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The requested airline does not exist.
    DetailObjectNotFound,
    /// No route matched.
    NotFound,
}

/// Column layout of the master-detail shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    OneColumn,
    TwoColumnsMidExpanded,
    MidColumnFullScreen,
}

/// Performs navigation on behalf of the screens.
pub trait Navigator: Send + Sync {
    fn nav_to(&self, route: Route);

    fn display(&self, target: Target);

    /// Returns to the previous route, or to [`Route::List`] without one.
    fn nav_back(&self);
}

/// One navigation performed through a [`RecordingNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Route(Route),
    Target(Target),
}

/// Navigator that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> Option<Navigation> {
        self.history.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.history.lock().clear();
    }
}

impl Navigator for RecordingNavigator {
    fn nav_to(&self, route: Route) {
        tracing::debug!(target: targets::SCREEN, route = %route, "navigate");
        self.history.lock().push(Navigation::Route(route));
    }

    fn display(&self, target: Target) {
        tracing::debug!(target: targets::SCREEN, ?target, "display target");
        self.history.lock().push(Navigation::Target(target));
    }

    fn nav_back(&self) {
        let mut history = self.history.lock();
        let mut routes = history.iter().rev().filter_map(|navigation| match navigation {
            Navigation::Route(route) => Some(route),
            Navigation::Target(_) => None,
        });
        routes.next();
        let previous = routes.next().cloned().unwrap_or(Route::List);
        tracing::debug!(target: targets::SCREEN, route = %previous, "navigate back");
        history.push(Navigation::Route(previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse(""), Some(Route::List));
        assert_eq!(Route::parse("#/"), Some(Route::List));
        assert_eq!(
            Route::parse("AirlineSet/LH"),
            Some(Route::Object {
                airline_id: "LH".into()
            })
        );
        assert_eq!(
            Route::parse("AirlineSet/LH/FlightPlanSet/0400"),
            Some(Route::FlightDetail {
                airline_id: "LH".into(),
                connection_id: "0400".into()
            })
        );
        assert_eq!(Route::parse("Nowhere/1"), None);
        assert_eq!(Route::parse("AirlineSet"), None);
    }

    #[test]
    fn test_parse_new_connection() {
        assert_eq!(
            Route::parse("AirlineSet/LH/FlightPlanSet/New"),
            Some(Route::FlightDetail {
                airline_id: "LH".into(),
                connection_id: NEW_CONNECTION_ID.into()
            })
        );
    }

    #[test]
    fn test_display_round_trips() {
        let route = Route::Object {
            airline_id: "AA".into(),
        };
        assert_eq!(Route::parse(&route.to_string()), Some(route));
    }

    #[test]
    fn test_recording_navigator() {
        let navigator = RecordingNavigator::new();
        navigator.nav_to(Route::List);
        navigator.display(Target::NotFound);

        assert_eq!(
            navigator.history(),
            vec![
                Navigation::Route(Route::List),
                Navigation::Target(Target::NotFound)
            ]
        );
        navigator.clear();
        assert_eq!(navigator.last(), None);
    }

    #[test]
    fn test_nav_back_returns_to_previous_route() {
        let navigator = RecordingNavigator::new();
        navigator.nav_back();
        assert_eq!(navigator.last(), Some(Navigation::Route(Route::List)));

        let object = Route::Object {
            airline_id: "LH".into(),
        };
        navigator.nav_to(object.clone());
        navigator.nav_to(Route::FlightDetail {
            airline_id: "LH".into(),
            connection_id: "0400".into(),
        });
        navigator.display(Target::NotFound);
        navigator.nav_back();
        assert_eq!(navigator.last(), Some(Navigation::Route(object)));
    }
}
