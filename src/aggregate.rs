// 📊 Aggregator - value counts, group sums, unique counts
// Each aggregate reads the merged table and returns a new table

use crate::error::{AnalysisError, Result};
use crate::model::MergedRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

// ============================================================================
// FREQUENCY TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub label: String,
    pub count: u64,
}

/// Counts per distinct label, descending by count (ties by label)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub entries: Vec<CountEntry>,
}

impl FrequencyTable {
    fn from_counts(counts: HashMap<String, u64>) -> Self {
        let mut entries: Vec<CountEntry> = counts
            .into_iter()
            .map(|(label, count)| CountEntry { label, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        FrequencyTable { entries }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountEntry> {
        self.entries.iter()
    }
}

fn value_counts<F>(
    rows: &[MergedRecord],
    aggregate: &'static str,
    fallback: &str,
    key: F,
) -> Result<FrequencyTable>
where
    F: Fn(&MergedRecord) -> Option<&str>,
{
    if rows.is_empty() {
        return Err(AnalysisError::EmptyTable { aggregate });
    }

    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in rows {
        let label = key(row).unwrap_or(fallback);
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }

    let table = FrequencyTable::from_counts(counts);
    debug!(aggregate, buckets = table.len(), "computed value counts");
    Ok(table)
}

/// Rows per category; unmatched rows land in `unmatched_label`
pub fn category_counts(rows: &[MergedRecord], unmatched_label: &str) -> Result<FrequencyTable> {
    value_counts(rows, "category_counts", unmatched_label, |r| r.category.as_deref())
}

/// Rows per conservation status; absent statuses land in `missing_label`
pub fn status_counts(rows: &[MergedRecord], missing_label: &str) -> Result<FrequencyTable> {
    value_counts(rows, "status_counts", missing_label, |r| r.status())
}

// ============================================================================
// PARK TOTALS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkTotal {
    pub park_name: String,
    pub observations: u64,
}

/// Observation sums per park, descending by total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkTotals {
    pub parks: Vec<ParkTotal>,
}

impl ParkTotals {
    pub fn get(&self, park: &str) -> Option<u64> {
        self.parks
            .iter()
            .find(|p| p.park_name == park)
            .map(|p| p.observations)
    }

    pub fn total(&self) -> u64 {
        self.parks.iter().map(|p| p.observations).sum()
    }
}

pub fn park_totals(rows: &[MergedRecord]) -> Result<ParkTotals> {
    if rows.is_empty() {
        return Err(AnalysisError::EmptyTable {
            aggregate: "park_totals",
        });
    }

    let mut sums: HashMap<&str, u64> = HashMap::new();
    for row in rows {
        *sums.entry(row.park_name.as_str()).or_insert(0) += row.observations;
    }

    let mut parks: Vec<ParkTotal> = sums
        .into_iter()
        .map(|(park, total)| ParkTotal {
            park_name: park.to_string(),
            observations: total,
        })
        .collect();
    parks.sort_by(|a, b| {
        b.observations
            .cmp(&a.observations)
            .then_with(|| a.park_name.cmp(&b.park_name))
    });

    debug!(parks = parks.len(), "computed park totals");
    Ok(ParkTotals { parks })
}

// ============================================================================
// ENDANGERED SUBSET & PARK BIODIVERSITY
// ============================================================================

/// Rows whose conservation status is in `statuses`
pub fn endangered_subset<S: AsRef<str>>(rows: &[MergedRecord], statuses: &[S]) -> Vec<MergedRecord> {
    rows.iter()
        .filter(|r| {
            r.status()
                .map(|s| statuses.iter().any(|e| e.as_ref() == s))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Category distribution of the endangered subset
pub fn endangered_category_counts(subset: &[MergedRecord], unmatched_label: &str) -> Result<FrequencyTable> {
    value_counts(subset, "endangered_category_counts", unmatched_label, |r| {
        r.category.as_deref()
    })
}

/// Distinct scientific names per park
pub fn unique_species_per_park(rows: &[MergedRecord]) -> BTreeMap<String, usize> {
    let mut names: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for row in rows {
        names
            .entry(row.park_name.as_str())
            .or_default()
            .insert(row.scientific_name.as_str());
    }
    names
        .into_iter()
        .map(|(park, set)| (park.to_string(), set.len()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkBiodiversity {
    pub park_name: String,
    pub total_species: usize,
    pub endangered_species: usize,
}

/// Total vs endangered unique species per park, descending by total
pub fn park_biodiversity(all: &[MergedRecord], subset: &[MergedRecord]) -> Result<Vec<ParkBiodiversity>> {
    if all.is_empty() {
        return Err(AnalysisError::EmptyTable {
            aggregate: "park_biodiversity",
        });
    }

    let totals = unique_species_per_park(all);
    let endangered = unique_species_per_park(subset);

    let mut parks: BTreeSet<&String> = totals.keys().collect();
    parks.extend(endangered.keys());

    let mut table: Vec<ParkBiodiversity> = parks
        .into_iter()
        .map(|park| ParkBiodiversity {
            park_name: park.clone(),
            total_species: totals.get(park).copied().unwrap_or(0),
            endangered_species: endangered.get(park).copied().unwrap_or(0),
        })
        .collect();
    table.sort_by(|a, b| {
        b.total_species
            .cmp(&a.total_species)
            .then_with(|| a.park_name.cmp(&b.park_name))
    });

    Ok(table)
}
