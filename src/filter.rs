//! Category filters over the loaded casualty features.
//!
//! Each dimension either passes everything (`All`) or requires the
//! feature's property to contain the selected value as a substring, so a
//! multi-valued property such as `"Elephant,Tiger"` matches both the
//! Elephant and the Tiger filter. Dimensions are combined with AND.

use std::fmt;

use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

use crate::casualty::{FeatureCollection, RawRecord};
use crate::error::FilterError;

/// The property a filter looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Dimension {
    Animal,
    Infrastructure,
    State,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
    VariantArray,
)]
pub enum AnimalFilter {
    #[default]
    All,
    Elephant,
    Leopard,
    Lion,
    Tiger,
    Other,
    #[strum(serialize = "n.a")]
    NotAvailable,
}

impl AnimalFilter {
    /// Text shown in the control for this option
    pub fn label(self) -> &'static str {
        match self {
            AnimalFilter::Other => "Others",
            AnimalFilter::NotAvailable => "NA",
            other => other.into(),
        }
    }

    fn needle(&self) -> Option<&str> {
        match self {
            AnimalFilter::All => None,
            other => Some(other.as_ref()),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, VariantArray,
)]
pub enum InfrastructureFilter {
    #[default]
    All,
    Railway,
    Electric,
    Road,
    Canal,
}

impl InfrastructureFilter {
    pub fn label(self) -> &'static str {
        match self {
            InfrastructureFilter::All => "All",
            InfrastructureFilter::Railway => "Railway",
            InfrastructureFilter::Electric => "Electric",
            InfrastructureFilter::Road => "Road",
            InfrastructureFilter::Canal => "Canal",
        }
    }

    fn needle(&self) -> Option<&str> {
        match self {
            InfrastructureFilter::All => None,
            other => Some(other.as_ref()),
        }
    }
}

/// State names are open-ended, so this dimension takes free text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StateFilter {
    #[default]
    All,
    Named(String),
}

impl StateFilter {
    pub fn parse(value: &str) -> Self {
        if value == "All" {
            StateFilter::All
        } else {
            StateFilter::Named(value.to_string())
        }
    }

    fn needle(&self) -> Option<&str> {
        match self {
            StateFilter::All => None,
            StateFilter::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateFilter::All => f.write_str("All"),
            StateFilter::Named(name) => f.write_str(name),
        }
    }
}

/// A control's request to change one dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChange {
    pub dimension: Dimension,
    pub value: String,
}

impl FilterChange {
    pub fn new(dimension: Dimension, value: impl Into<String>) -> Self {
        Self {
            dimension,
            value: value.into(),
        }
    }
}

/// The active filters. Defaults to `All` everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub animal: AnimalFilter,
    pub infrastructure: InfrastructureFilter,
    pub state: StateFilter,
}

impl FilterSelection {
    /// Copy of this selection with one dimension replaced
    pub fn updated(&self, change: &FilterChange) -> Result<Self, FilterError> {
        let unknown = || FilterError::UnknownOption {
            dimension: change.dimension,
            value: change.value.clone(),
        };

        let mut next = self.clone();
        match change.dimension {
            Dimension::Animal => next.animal = change.value.parse().map_err(|_| unknown())?,
            Dimension::Infrastructure => {
                next.infrastructure = change.value.parse().map_err(|_| unknown())?
            }
            Dimension::State => next.state = StateFilter::parse(&change.value),
        }
        Ok(next)
    }

    /// Whether a record passes all three dimensions
    pub fn matches(&self, record: &RawRecord) -> bool {
        contains(record.animal_type_general(), self.animal.needle())
            && contains(
                record.linear_infrastructure_type(),
                self.infrastructure.needle(),
            )
            && contains(record.state(), self.state.needle())
    }
}

#[inline]
fn contains(property: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => property.is_some_and(|p| p.contains(needle)),
    }
}

/// Features of `original` that pass `selection`, in source order
pub fn apply(original: &FeatureCollection, selection: &FilterSelection) -> FeatureCollection {
    original
        .iter()
        .filter(|feature| selection.matches(&feature.properties))
        .cloned()
        .collect()
}
