// 🔁 Pipeline - load → clean → join → aggregate
// One synchronous pass; every stage hands a new table to the next

use crate::aggregate::{
    category_counts, endangered_category_counts, endangered_subset, park_biodiversity, park_totals,
    status_counts, FrequencyTable, ParkBiodiversity, ParkTotals,
};
use crate::clean::{fill_missing_status, left_join, summarize_join, JoinSummary};
use crate::config::{AnalysisConfig, ConfigIssue};
use crate::correlation::{rank_correlation, CorrelationReport};
use crate::error::{AnalysisError, Result};
use crate::loader::load_datasets;
use crate::model::{Datasets, MergedRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Everything one run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub join: JoinSummary,
    pub category_counts: FrequencyTable,
    pub status_counts: FrequencyTable,
    pub park_totals: ParkTotals,
    pub correlation: CorrelationReport,
    pub endangered_rows: usize,
    pub endangered_category_counts: FrequencyTable,
    pub park_biodiversity: Vec<ParkBiodiversity>,
    pub config_issues: Vec<ConfigIssue>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(AnalysisError::Encode)
    }

    /// Write the report as pretty JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "saved report");
        Ok(())
    }
}

/// Cleaned, joined table
pub fn prepare(datasets: &Datasets, config: &AnalysisConfig) -> (Vec<MergedRecord>, JoinSummary) {
    let species = fill_missing_status(&datasets.species, &config.missing_status_label);
    let merged = left_join(&datasets.observations, &species);
    let join = summarize_join(&datasets.observations, &species, &merged);

    // unmatched observations have no species status either
    let merged = fill_missing_status(&merged, &config.missing_status_label);
    (merged, join)
}

/// Run every aggregate over already-loaded tables
pub fn analyze(datasets: &Datasets, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let config_issues = config.validate_strict()?;
    for issue in &config_issues {
        warn!(%issue, "configuration issue");
    }

    let (merged, join) = prepare(datasets, config);

    let category_counts = category_counts(&merged, &config.unmatched_category_label)?;
    let status_counts = status_counts(&merged, &config.missing_status_label)?;
    let park_totals = park_totals(&merged)?;
    let correlation = rank_correlation(
        &merged,
        &config.status_ranking,
        config.unmapped_status_policy,
    )?;

    let endangered = endangered_subset(&merged, config.endangered_statuses.as_slice());
    info!(rows = endangered.len(), "selected endangered subset");
    // an empty subset leaves one empty chart; the rest of the report stands
    let endangered_category_counts = if endangered.is_empty() {
        warn!(
            statuses = ?config.endangered_statuses,
            "no rows carry an endangered status"
        );
        FrequencyTable { entries: Vec::new() }
    } else {
        endangered_category_counts(&endangered, &config.unmatched_category_label)?
    };
    let park_biodiversity = park_biodiversity(&merged, &endangered)?;

    Ok(AnalysisReport {
        generated_at: Utc::now(),
        join,
        category_counts,
        status_counts,
        park_totals,
        correlation,
        endangered_rows: endangered.len(),
        endangered_category_counts,
        park_biodiversity,
        config_issues,
    })
}

/// Load the configured files and analyze them
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let datasets = load_datasets(config)?;
    analyze(&datasets, config)
}
