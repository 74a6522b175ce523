// 🌲 Record Types
// Rows of the species table, the observation table and their join

use serde::{Deserialize, Serialize};

/// One row of `species_info.csv`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SpeciesRecord {
    /// Taxonomic group (Mammal, Bird, Vascular Plant, ...)
    pub category: String,

    pub scientific_name: String,

    #[serde(alias = "common_name")]
    pub common_names: String,

    /// Empty cell = not evaluated
    #[serde(default)]
    pub conservation_status: Option<String>,
}

/// One row of `observations.csv`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ObservationRecord {
    pub scientific_name: String,
    pub park_name: String,
    pub observations: u64,
}

/// Observation left-joined with its species row
///
/// Species-side fields are `None` when no species row matched.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    pub scientific_name: String,
    pub park_name: String,
    pub observations: u64,
    pub category: Option<String>,
    pub common_names: Option<String>,
    pub conservation_status: Option<String>,
}

impl MergedRecord {
    /// Build a merged row from an observation and an optional species match
    pub fn from_parts(observation: &ObservationRecord, species: Option<&SpeciesRecord>) -> Self {
        MergedRecord {
            scientific_name: observation.scientific_name.clone(),
            park_name: observation.park_name.clone(),
            observations: observation.observations,
            category: species.map(|s| s.category.clone()),
            common_names: species.map(|s| s.common_names.clone()),
            conservation_status: species.and_then(|s| s.conservation_status.clone()),
        }
    }

    /// True when the join found a species row
    pub fn is_matched(&self) -> bool {
        self.category.is_some()
    }

    /// Status label, if any
    pub fn status(&self) -> Option<&str> {
        self.conservation_status.as_deref()
    }
}

/// Record types that carry a nullable conservation status
pub trait StatusCarrier: Clone {
    fn conservation_status(&self) -> Option<&str>;
    fn with_conservation_status(self, status: String) -> Self;
}

impl StatusCarrier for SpeciesRecord {
    fn conservation_status(&self) -> Option<&str> {
        self.conservation_status.as_deref()
    }

    fn with_conservation_status(mut self, status: String) -> Self {
        self.conservation_status = Some(status);
        self
    }
}

impl StatusCarrier for MergedRecord {
    fn conservation_status(&self) -> Option<&str> {
        self.conservation_status.as_deref()
    }

    fn with_conservation_status(mut self, status: String) -> Self {
        self.conservation_status = Some(status);
        self
    }
}

/// Both input tables, as loaded
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub species: Vec<SpeciesRecord>,
    pub observations: Vec<ObservationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(status: Option<&str>) -> SpeciesRecord {
        SpeciesRecord {
            category: "Mammal".to_string(),
            scientific_name: "Canis lupus".to_string(),
            common_names: "Gray Wolf".to_string(),
            conservation_status: status.map(str::to_string),
        }
    }

    fn observation() -> ObservationRecord {
        ObservationRecord {
            scientific_name: "Canis lupus".to_string(),
            park_name: "Yellowstone National Park".to_string(),
            observations: 42,
        }
    }

    #[test]
    fn test_from_parts_matched() {
        let sp = species(Some("Endangered"));
        let merged = MergedRecord::from_parts(&observation(), Some(&sp));

        assert!(merged.is_matched());
        assert_eq!(merged.category.as_deref(), Some("Mammal"));
        assert_eq!(merged.status(), Some("Endangered"));
        assert_eq!(merged.observations, 42);
    }

    #[test]
    fn test_from_parts_unmatched() {
        let merged = MergedRecord::from_parts(&observation(), None);

        assert!(!merged.is_matched());
        assert_eq!(merged.common_names, None);
        assert_eq!(merged.status(), None);
        assert_eq!(merged.park_name, "Yellowstone National Park");
    }

    #[test]
    fn test_with_conservation_status() {
        let sp = species(None).with_conservation_status("Least Concern".to_string());
        assert_eq!(StatusCarrier::conservation_status(&sp), Some("Least Concern"));
    }
}
