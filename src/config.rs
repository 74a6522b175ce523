// ⚙️ Analysis Configuration - Settings as Data
// Input paths, status vocabulary and policies passed explicitly into the pipeline

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPECIES_PATH: &str = "species_info.csv";
pub const DEFAULT_OBSERVATIONS_PATH: &str = "observations.csv";
pub const NOT_EVALUATED: &str = "Not Evaluated";

// ============================================================================
// STATUS RANKING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedStatus {
    pub status: String,
    pub rank: i64,
}

/// Ordinal severity lookup for conservation statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusRanking {
    entries: Vec<RankedStatus>,
}

impl StatusRanking {
    pub fn new(entries: Vec<RankedStatus>) -> Self {
        StatusRanking { entries }
    }

    /// Build a ranking where each label's rank is its position
    pub fn from_ordered<S: AsRef<str>>(labels: &[S]) -> Self {
        let entries = labels
            .iter()
            .enumerate()
            .map(|(i, label)| RankedStatus {
                status: label.as_ref().to_string(),
                rank: i as i64,
            })
            .collect();
        StatusRanking { entries }
    }

    pub fn rank_of(&self, status: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.status == status)
            .map(|e| e.rank)
    }

    pub fn contains(&self, status: &str) -> bool {
        self.rank_of(status).is_some()
    }

    pub fn entries(&self) -> &[RankedStatus] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StatusRanking {
    fn default() -> Self {
        StatusRanking::from_ordered(&[
            NOT_EVALUATED,
            "Least Concern",
            "Near Threatened",
            "Vulnerable",
            "Endangered",
            "Critically Endangered",
            "Extinct in the Wild",
            "Extinct",
            "In Recovery",
        ])
    }
}

// ============================================================================
// POLICIES
// ============================================================================

/// What the correlation does with statuses missing from the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedStatusPolicy {
    /// Drop the rows from the correlation input and report how many
    #[default]
    Exclude,
    /// Fail the correlation
    Reject,
}

// ============================================================================
// CONFIG ISSUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn new(severity: Severity, field: &str, message: String) -> Self {
        ConfigIssue {
            severity,
            field: field.to_string(),
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {}: {}", level, self.field, self.message)
    }
}

// ============================================================================
// ANALYSIS CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub species_path: PathBuf,
    pub observations_path: PathBuf,

    /// Label written into absent conservation statuses
    pub missing_status_label: String,

    /// Bucket for rows whose observation matched no species
    pub unmatched_category_label: String,

    pub status_ranking: StatusRanking,
    pub endangered_statuses: Vec<String>,
    pub unmapped_status_policy: UnmappedStatusPolicy,

    /// Width of text charts in columns
    pub chart_width: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            species_path: PathBuf::from(DEFAULT_SPECIES_PATH),
            observations_path: PathBuf::from(DEFAULT_OBSERVATIONS_PATH),
            missing_status_label: NOT_EVALUATED.to_string(),
            unmatched_category_label: "Unmatched".to_string(),
            status_ranking: StatusRanking::default(),
            endangered_statuses: vec![
                "Endangered".to_string(),
                "Threatened".to_string(),
                "Vulnerable".to_string(),
                "In Recovery".to_string(),
            ],
            unmapped_status_policy: UnmappedStatusPolicy::Exclude,
            chart_width: 60,
        }
    }
}

impl AnalysisConfig {
    /// Load config from a JSON file; missing keys take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                AnalysisError::InputNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                AnalysisError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|source| AnalysisError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like `from_file`, but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::from_file(path) {
            Err(AnalysisError::InputNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Check the config for inconsistencies
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.missing_status_label.trim().is_empty() {
            issues.push(ConfigIssue::new(
                Severity::Error,
                "missing_status_label",
                "label must not be blank".to_string(),
            ));
        }

        if self.unmatched_category_label.trim().is_empty() {
            issues.push(ConfigIssue::new(
                Severity::Error,
                "unmatched_category_label",
                "label must not be blank".to_string(),
            ));
        }

        if self.status_ranking.is_empty() {
            issues.push(ConfigIssue::new(
                Severity::Error,
                "status_ranking",
                "ranking has no entries".to_string(),
            ));
        }

        let mut seen_labels = HashSet::new();
        let mut seen_ranks = HashSet::new();
        for entry in self.status_ranking.entries() {
            if !seen_labels.insert(entry.status.as_str()) {
                issues.push(ConfigIssue::new(
                    Severity::Error,
                    "status_ranking",
                    format!("status {:?} is ranked more than once", entry.status),
                ));
            }
            if !seen_ranks.insert(entry.rank) {
                issues.push(ConfigIssue::new(
                    Severity::Warning,
                    "status_ranking",
                    format!("rank {} is shared by several statuses", entry.rank),
                ));
            }
        }

        if !self.status_ranking.is_empty()
            && !self.status_ranking.contains(&self.missing_status_label)
        {
            issues.push(ConfigIssue::new(
                self.gap_severity(),
                "missing_status_label",
                format!(
                    "fill label {:?} has no ordinal rank",
                    self.missing_status_label
                ),
            ));
        }

        if self.endangered_statuses.is_empty() {
            issues.push(ConfigIssue::new(
                Severity::Error,
                "endangered_statuses",
                "endangered list is empty".to_string(),
            ));
        }

        for status in &self.endangered_statuses {
            if !self.status_ranking.contains(status) {
                issues.push(ConfigIssue::new(
                    self.gap_severity(),
                    "endangered_statuses",
                    format!("endangered status {:?} has no ordinal rank", status),
                ));
            }
        }

        if self.chart_width < 10 {
            issues.push(ConfigIssue::new(
                Severity::Warning,
                "chart_width",
                format!("chart width {} is too narrow, charts will be clipped", self.chart_width),
            ));
        }

        issues
    }

    /// Validate and fail on any error-level issue; warnings are returned
    pub fn validate_strict(&self) -> Result<Vec<ConfigIssue>> {
        let issues = self.validate();
        if issues.iter().any(ConfigIssue::is_error) {
            return Err(AnalysisError::InvalidConfig(
                issues.into_iter().filter(ConfigIssue::is_error).collect(),
            ));
        }
        Ok(issues)
    }

    fn gap_severity(&self) -> Severity {
        match self.unmapped_status_policy {
            UnmappedStatusPolicy::Exclude => Severity::Warning,
            UnmappedStatusPolicy::Reject => Severity::Error,
        }
    }
}
