// 🧹 Cleaner/Joiner - fill missing statuses, left join on scientific name
// Pure functions: every call returns a new table

use crate::model::{MergedRecord, ObservationRecord, SpeciesRecord, StatusCarrier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Replace absent or blank conservation statuses with `label`
pub fn fill_missing_status<R: StatusCarrier>(rows: &[R], label: &str) -> Vec<R> {
    rows.iter()
        .map(|row| match row.conservation_status() {
            Some(status) if !status.trim().is_empty() => row.clone(),
            _ => row.clone().with_conservation_status(label.to_string()),
        })
        .collect()
}

/// Left outer join of observations with species on `scientific_name`
///
/// Observation order is kept. A key that appears several times in `species`
/// produces one merged row per species row, in species order.
pub fn left_join(observations: &[ObservationRecord], species: &[SpeciesRecord]) -> Vec<MergedRecord> {
    let index = index_species(species);
    let mut merged = Vec::with_capacity(observations.len());

    for obs in observations {
        match index.get(obs.scientific_name.as_str()) {
            Some(matches) => {
                for sp in matches {
                    merged.push(MergedRecord::from_parts(obs, Some(sp)));
                }
            }
            None => merged.push(MergedRecord::from_parts(obs, None)),
        }
    }

    merged
}

fn index_species(species: &[SpeciesRecord]) -> HashMap<&str, Vec<&SpeciesRecord>> {
    let mut index: HashMap<&str, Vec<&SpeciesRecord>> = HashMap::new();
    for sp in species {
        index.entry(sp.scientific_name.as_str()).or_default().push(sp);
    }
    index
}

// ============================================================================
// JOIN DIAGNOSTICS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSummary {
    pub observation_rows: usize,
    pub merged_rows: usize,

    /// Observations with no species row
    pub unmatched_observations: usize,

    /// Scientific names listed more than once in the species table
    pub duplicate_species_keys: usize,
}

impl JoinSummary {
    /// Extra rows produced by duplicate species keys
    pub fn fan_out_rows(&self) -> usize {
        self.merged_rows.saturating_sub(self.observation_rows)
    }
}

pub fn summarize_join(
    observations: &[ObservationRecord],
    species: &[SpeciesRecord],
    merged: &[MergedRecord],
) -> JoinSummary {
    let index = index_species(species);

    let summary = JoinSummary {
        observation_rows: observations.len(),
        merged_rows: merged.len(),
        unmatched_observations: merged.iter().filter(|m| !m.is_matched()).count(),
        duplicate_species_keys: index.values().filter(|rows| rows.len() > 1).count(),
    };

    info!(
        observations = summary.observation_rows,
        merged = summary.merged_rows,
        fan_out = summary.fan_out_rows(),
        "joined observations with species"
    );
    if summary.unmatched_observations > 0 {
        warn!(
            unmatched = summary.unmatched_observations,
            "observations without a species row"
        );
    }

    summary
}
