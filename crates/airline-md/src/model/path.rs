//! Entity paths.
//!
//! An [`EntityPath`] identifies the backing entity a list item or detail
//! view is bound to, e.g. `/AirlineSet('LH')`. Paths are opaque to the
//! selection machinery: they are only ever compared for equality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque path identifying a bound entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityPath(String);

impl EntityPath {
    /// Wraps an existing path string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Builds the canonical path for an entity from its key properties.
    ///
    /// A single key renders as `/Set('value')`; composite keys render as
    /// `/Set(Name='value',Other='value')`. Key values have single quotes
    /// doubled and URL-reserved characters percent-encoded.
    ///
    /// ```
    /// use airline_md::model::EntityPath;
    ///
    /// assert_eq!(
    ///     EntityPath::for_key("AirlineSet", &[("AirlineID", "LH")]).as_str(),
    ///     "/AirlineSet('LH')"
    /// );
    /// assert_eq!(
    ///     EntityPath::for_key("FlightPlanSet", &[("AirlineID", "LH"), ("ConnectionID", "0400")])
    ///         .as_str(),
    ///     "/FlightPlanSet(AirlineID='LH',ConnectionID='0400')"
    /// );
    /// ```
    pub fn for_key(entity_set: &str, keys: &[(&str, &str)]) -> Self {
        let key = match keys {
            [(_, value)] => format!("'{}'", encode_key_value(value)),
            _ => keys
                .iter()
                .map(|(name, value)| format!("{name}='{}'", encode_key_value(value)))
                .collect::<Vec<_>>()
                .join(","),
        };
        Self(format!("/{entity_set}({key})"))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the entity set segment, e.g. `AirlineSet`.
    pub fn entity_set(&self) -> Option<&str> {
        let trimmed = self.0.strip_prefix('/').unwrap_or(&self.0);
        let end = trimmed.find('(')?;
        Some(&trimmed[..end])
    }
}

fn encode_key_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\'' => encoded.push_str("''"),
            '%' => encoded.push_str("%25"),
            '/' => encoded.push_str("%2F"),
            '?' => encoded.push_str("%3F"),
            '#' => encoded.push_str("%23"),
            '&' => encoded.push_str("%26"),
            ' ' => encoded.push_str("%20"),
            _ => encoded.push(ch),
        }
    }
    encoded
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for EntityPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl PartialEq<str> for EntityPath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityPath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
