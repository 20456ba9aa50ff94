//! Entity types served by the airline service.

use serde::{Deserialize, Serialize};

use super::path::EntityPath;

/// Entity set holding airlines.
pub const AIRLINE_SET: &str = "AirlineSet";
/// Key property of an airline.
pub const AIRLINE_KEY_PROPERTY: &str = "AirlineID";
/// Entity set holding flight connections.
pub const FLIGHT_PLAN_SET: &str = "FlightPlanSet";

/// An airline (carrier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Airline {
    #[serde(rename = "AirlineID")]
    pub airline_id: String,
    pub airline_name: String,
    pub currency: String,
    #[serde(default)]
    pub url: String,
}

impl Airline {
    pub fn new(
        airline_id: impl Into<String>,
        airline_name: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            airline_id: airline_id.into(),
            airline_name: airline_name.into(),
            currency: currency.into(),
            url: String::new(),
        }
    }

    /// Looks up a property by its service name.
    pub fn property(&self, name: &str) -> Option<&str> {
        match name {
            "AirlineID" => Some(&self.airline_id),
            "AirlineName" => Some(&self.airline_name),
            "Currency" => Some(&self.currency),
            "Url" => Some(&self.url),
            _ => None,
        }
    }

    /// Returns true if `name` is the service name of an airline property.
    pub fn has_property(name: &str) -> bool {
        matches!(name, "AirlineID" | "AirlineName" | "Currency" | "Url")
    }
}

/// How airlines are addressed: the entity set and the property whose value
/// keys one airline.
///
/// List items, service lookups and the detail route all build airline paths
/// through one `AirlineKey`, so they agree on what an airline's path is.
///
/// ```
/// use airline_md::model::{Airline, AirlineKey};
///
/// let key = AirlineKey::new("CarrierSet", "AirlineID");
/// let airline = Airline::new("LH", "Lufthansa", "EUR");
/// assert_eq!(key.path_of(&airline).as_str(), "/CarrierSet('LH')");
/// assert_eq!(key.path_for("LH"), key.path_of(&airline));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirlineKey {
    entity_set: String,
    key_property: String,
}

impl Default for AirlineKey {
    fn default() -> Self {
        Self::new(AIRLINE_SET, AIRLINE_KEY_PROPERTY)
    }
}

impl AirlineKey {
    pub fn new(entity_set: impl Into<String>, key_property: impl Into<String>) -> Self {
        Self {
            entity_set: entity_set.into(),
            key_property: key_property.into(),
        }
    }

    pub fn entity_set(&self) -> &str {
        &self.entity_set
    }

    pub fn key_property(&self) -> &str {
        &self.key_property
    }

    /// The key value of `airline`. Empty if the key property is unknown.
    pub fn value_of<'a>(&self, airline: &'a Airline) -> &'a str {
        airline.property(&self.key_property).unwrap_or_default()
    }

    /// The path of the airline whose key property holds `value`.
    pub fn path_for(&self, value: &str) -> EntityPath {
        EntityPath::for_key(&self.entity_set, &[(self.key_property.as_str(), value)])
    }

    /// The canonical path of `airline`.
    pub fn path_of(&self, airline: &Airline) -> EntityPath {
        self.path_for(self.value_of(airline))
    }
}

/// A scheduled flight connection of an airline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlightPlan {
    #[serde(rename = "AirlineID")]
    pub airline_id: String,
    #[serde(rename = "ConnectionID")]
    pub connection_id: String,
    pub city_from: String,
    pub city_to: String,
    #[serde(default)]
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: String,
}

impl FlightPlan {
    /// An empty connection of `airline_id`, to be filled in before it is
    /// created.
    pub fn draft(airline_id: impl Into<String>) -> Self {
        Self {
            airline_id: airline_id.into(),
            connection_id: String::new(),
            city_from: String::new(),
            city_to: String::new(),
            departure_time: String::new(),
            arrival_time: String::new(),
        }
    }

    /// The canonical entity path of this connection.
    pub fn path(&self) -> EntityPath {
        Self::key_path(&self.airline_id, &self.connection_id)
    }

    /// The path of connection `connection_id` of airline `airline_id`.
    pub fn key_path(airline_id: &str, connection_id: &str) -> EntityPath {
        EntityPath::for_key(
            FLIGHT_PLAN_SET,
            &[("AirlineID", airline_id), ("ConnectionID", connection_id)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airline_path() {
        let airline = Airline::new("LH", "Lufthansa", "EUR");
        assert_eq!(AirlineKey::default().path_of(&airline), "/AirlineSet('LH')");
    }

    #[test]
    fn test_airline_path_follows_key_property() {
        let key = AirlineKey::new("CarrierSet", "AirlineName");
        let airline = Airline::new("LH", "Lufthansa", "EUR");

        assert_eq!(key.value_of(&airline), "Lufthansa");
        assert_eq!(key.path_of(&airline), "/CarrierSet('Lufthansa')");
        assert_eq!(key.path_for("Lufthansa"), key.path_of(&airline));
        assert!(Airline::has_property("Currency"));
        assert!(!Airline::has_property("Carrier"));
    }

    #[test]
    fn test_flight_plan_path() {
        let plan = FlightPlan {
            airline_id: "LH".into(),
            connection_id: "0400".into(),
            city_from: "FRANKFURT".into(),
            city_to: "NEW YORK".into(),
            departure_time: String::new(),
            arrival_time: String::new(),
        };
        assert_eq!(plan.path(), "/FlightPlanSet(AirlineID='LH',ConnectionID='0400')");
    }

    #[test]
    fn test_airline_wire_names() {
        let airline: Airline = toml::from_str(
            r#"
            AirlineID = "AA"
            AirlineName = "American Airlines"
            Currency = "USD"
            "#,
        )
        .unwrap();
        assert_eq!(airline, Airline::new("AA", "American Airlines", "USD"));
    }
}
