//! Country boundary dataset consumed read-only by the polygon layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CountriesError {
    #[error("country dataset is not valid GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("country dataset has no features")]
    Empty,
}

/// One boundary polygon. Geometry stays opaque; only the overlay reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryFeature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    #[serde(default)]
    pub properties: Value,
    pub geometry: Value,
}

fn feature_kind() -> String {
    "Feature".to_string()
}

impl CountryFeature {
    pub fn name(&self) -> Option<&str> {
        ["ADMIN", "NAME", "name"]
            .iter()
            .find_map(|key| self.properties.get(*key).and_then(Value::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCollection {
    pub features: Vec<CountryFeature>,
}

impl CountryCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Parses a GeoJSON `FeatureCollection`. Top-level members other than
/// `features` are ignored.
pub fn parse_countries(json: &str) -> Result<CountryCollection, CountriesError> {
    let collection: CountryCollection = serde_json::from_str(json)?;
    if collection.is_empty() {
        return Err(CountriesError::Empty);
    }
    tracing::debug!(features = collection.len(), "parsed country dataset");
    Ok(collection)
}
