use crate::error::InputAccessError;
use crate::spec::Location;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Checked and coerced request values, keyed by location.
///
/// Contains exactly the locations the route declares (an optional body only when
/// the request carried one). Typed accessors deserialize a location into any
/// `DeserializeOwned` type; since the value already passed schema validation,
/// failures there mean the Rust type and the schema disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedInput {
    values: BTreeMap<Location, Value>,
    body_content_type: Option<String>,
}

impl ValidatedInput {
    pub(crate) fn insert(&mut self, location: Location, value: Value) {
        self.values.insert(location, value);
    }

    pub(crate) fn set_body_content_type(&mut self, content_type: String) {
        self.body_content_type = Some(content_type);
    }

    /// Raw validated value of a location
    #[must_use]
    pub fn value(&self, location: Location) -> Option<&Value> {
        self.values.get(&location)
    }

    /// One member of an object-valued location, e.g. `field(Location::PathParams, "slug")`
    #[must_use]
    pub fn field(&self, location: Location, name: &str) -> Option<&Value> {
        self.values.get(&location)?.get(name)
    }

    #[must_use]
    pub fn contains(&self, location: Location) -> bool {
        self.values.contains_key(&location)
    }

    /// Present locations in validation order
    #[must_use]
    pub fn locations(&self) -> Vec<Location> {
        self.values.keys().copied().collect()
    }

    /// Normalized content type of the accepted body, if any
    #[must_use]
    pub fn body_content_type(&self) -> Option<&str> {
        self.body_content_type.as_deref()
    }

    /// Deserialize a location into `T`
    pub fn get<T: DeserializeOwned>(&self, location: Location) -> Result<T, InputAccessError> {
        let value = self
            .values
            .get(&location)
            .ok_or(InputAccessError::Absent(location))?;
        T::deserialize(value).map_err(|source| InputAccessError::Deserialize { location, source })
    }

    pub fn path_params<T: DeserializeOwned>(&self) -> Result<T, InputAccessError> {
        self.get(Location::PathParams)
    }

    pub fn query<T: DeserializeOwned>(&self) -> Result<T, InputAccessError> {
        self.get(Location::Query)
    }

    pub fn headers<T: DeserializeOwned>(&self) -> Result<T, InputAccessError> {
        self.get(Location::Headers)
    }

    pub fn cookies<T: DeserializeOwned>(&self) -> Result<T, InputAccessError> {
        self.get(Location::Cookies)
    }

    pub fn body<T: DeserializeOwned>(&self) -> Result<T, InputAccessError> {
        self.get(Location::Body)
    }

    /// Render as one JSON object keyed by location name, e.g. `{"pathParams": {"slug": "x"}}`
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(
            self.values
                .into_iter()
                .map(|(loc, v)| (loc.as_str().to_string(), v))
                .collect::<Map<String, Value>>(),
        )
    }
}
