mod loader;

pub use loader::{parse_records, DatasetLoader, PendingLoad, SENTINEL_COORDINATE};

use std::sync::Arc;

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::filter::{self, FilterSelection};

/// A single JSON value from the dataset, kept loosely typed so that one
/// odd cell never rejects the whole file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Text(String),
    Number(f64),
    Other(IgnoredAny),
}

impl Field {
    /// Text content, if this field holds a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content. Numeric text is coerced the same way the
    /// upstream spreadsheet export expects ("20.5" reads as 20.5).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(n) => Some(*n),
            Field::Text(s) => s.trim().parse().ok(),
            Field::Other(_) => None,
        }
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Field::Text(a), Field::Text(b)) => a == b,
            (Field::Number(a), Field::Number(b)) => a == b,
            (Field::Other(_), Field::Other(_)) => true,
            _ => false,
        }
    }
}

/// One casualty event as it appears in the dataset
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(rename = "StoryType")]
    pub story_type: Option<Field>,
    #[serde(rename = "AnimalDeath")]
    pub animal_death: Option<Field>,
    #[serde(rename = "AnimalTypeSpecific")]
    pub animal_type_specific: Option<Field>,
    #[serde(rename = "AnimalTypeGeneral")]
    pub animal_type_general: Option<Field>,
    #[serde(rename = "LinearInfrastructureType")]
    pub linear_infrastructure_type: Option<Field>,
    #[serde(rename = "ShortHeading")]
    pub short_heading: Option<Field>,
    #[serde(rename = "Source")]
    pub source: Option<Field>,
    #[serde(rename = "NearestPlace")]
    pub nearest_place: Option<Field>,
    #[serde(rename = "NearestCity")]
    pub nearest_city: Option<Field>,
    #[serde(rename = "State")]
    pub state: Option<Field>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<Field>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<Field>,
}

fn text(field: &Option<Field>) -> Option<&str> {
    field.as_ref().and_then(Field::as_text)
}

impl RawRecord {
    pub fn animal_type_general(&self) -> Option<&str> {
        text(&self.animal_type_general)
    }

    pub fn linear_infrastructure_type(&self) -> Option<&str> {
        text(&self.linear_infrastructure_type)
    }

    pub fn short_heading(&self) -> Option<&str> {
        text(&self.short_heading)
    }

    pub fn source(&self) -> Option<&str> {
        text(&self.source)
    }

    pub fn state(&self) -> Option<&str> {
        text(&self.state)
    }

    pub fn nearest_place(&self) -> Option<&str> {
        text(&self.nearest_place)
    }
}

/// A validated record paired with its point position
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub properties: RawRecord,
    /// (longitude, latitude) in degrees
    pub coordinates: (f64, f64),
}

impl Feature {
    /// Build a feature from a record, or `None` when the record fails validation.
    ///
    /// A record qualifies when both coordinates are present, numeric, not the
    /// `9999` "unknown" sentinel, and `State` is text.
    pub fn from_record(record: RawRecord) -> Option<Self> {
        let lat = loader::valid_coordinate(record.latitude.as_ref())?;
        let lon = loader::valid_coordinate(record.longitude.as_ref())?;
        record.state()?;
        Some(Self {
            properties: record,
            coordinates: (lon, lat),
        })
    }

    pub fn lon(&self) -> f64 {
        self.coordinates.0
    }

    pub fn lat(&self) -> f64 {
        self.coordinates.1
    }
}

/// Ordered collection of features. Cloning shares the features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Arc<Feature>>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Arc<Feature>> {
        self.features.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Feature>> + '_ {
        self.features.iter()
    }
}

impl FromIterator<Arc<Feature>> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Arc<Feature>>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().map(Arc::new).collect()
    }
}

/// Holds the loaded collection and the filtered view derived from it
#[derive(Debug, Default)]
pub struct FeatureStore {
    original: FeatureCollection,
    current: FeatureCollection,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the loaded collection wholesale and rederive the view
    pub fn replace_original(&mut self, original: FeatureCollection, selection: &FilterSelection) {
        self.original = original;
        self.refilter(selection);
    }

    /// Recompute `current` from `original`
    pub fn refilter(&mut self, selection: &FilterSelection) -> &FeatureCollection {
        self.current = filter::apply(&self.original, selection);
        &self.current
    }

    pub fn original(&self) -> &FeatureCollection {
        &self.original
    }

    pub fn current(&self) -> &FeatureCollection {
        &self.current
    }
}
