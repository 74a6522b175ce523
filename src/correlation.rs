// 🔗 Status/Observation Correlation
// Spearman rank correlation between observation counts and status severity

use crate::config::{StatusRanking, UnmappedStatusPolicy};
use crate::error::{AnalysisError, Result};
use crate::model::MergedRecord;
use crate::stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Rows left out of the correlation because their status has no rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedStatus {
    /// `None` for rows with no status at all
    pub status: Option<String>,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub coefficient: f64,
    pub p_value: f64,

    /// Pairs that entered the computation
    pub sample_size: usize,

    pub excluded: Vec<ExcludedStatus>,
}

impl CorrelationReport {
    pub fn excluded_rows(&self) -> usize {
        self.excluded.iter().map(|e| e.rows).sum()
    }
}

/// Correlate `observations` with the ordinal rank of each row's status
pub fn rank_correlation(
    rows: &[MergedRecord],
    ranking: &StatusRanking,
    policy: UnmappedStatusPolicy,
) -> Result<CorrelationReport> {
    let mut observations = Vec::with_capacity(rows.len());
    let mut ranks = Vec::with_capacity(rows.len());
    let mut unmapped: BTreeMap<Option<&str>, usize> = BTreeMap::new();

    for row in rows {
        match row.status().and_then(|s| ranking.rank_of(s)) {
            Some(rank) => {
                observations.push(row.observations as f64);
                ranks.push(rank as f64);
            }
            None => *unmapped.entry(row.status()).or_insert(0) += 1,
        }
    }

    if policy == UnmappedStatusPolicy::Reject {
        if let Some((status, count)) = unmapped.iter().next() {
            return Err(AnalysisError::UnmappedStatus {
                status: status.unwrap_or("<missing>").to_string(),
                rows: *count,
            });
        }
    }

    let excluded: Vec<ExcludedStatus> = unmapped
        .into_iter()
        .map(|(status, rows)| ExcludedStatus {
            status: status.map(str::to_string),
            rows,
        })
        .collect();

    for e in &excluded {
        warn!(
            status = e.status.as_deref().unwrap_or("<missing>"),
            rows = e.rows,
            "status has no ordinal rank, rows excluded from correlation"
        );
    }

    let result = stats::spearman(&observations, &ranks)?;
    info!(
        coefficient = result.coefficient,
        p_value = result.p_value,
        pairs = observations.len(),
        "computed rank correlation"
    );

    Ok(CorrelationReport {
        coefficient: result.coefficient,
        p_value: result.p_value,
        sample_size: observations.len(),
        excluded,
    })
}
