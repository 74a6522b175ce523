// ⚠️ Error Taxonomy
// Typed failures for every stage of the analysis run

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigIssue;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input file does not exist
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Input file exists but could not be read
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed row, missing column or non-numeric field
    #[error("failed to parse {}{}", path.display(), format_line(line))]
    Parse {
        path: PathBuf,
        line: Option<u64>,
        #[source]
        source: csv::Error,
    },

    /// Config file could not be parsed
    #[error("failed to parse config {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Report could not be encoded as JSON
    #[error("failed to encode report")]
    Encode(#[source] serde_json::Error),

    /// Config validation found blocking issues
    #[error("invalid configuration: {}", format_issues(.0))]
    InvalidConfig(Vec<ConfigIssue>),

    /// Aggregate computed over a table with no rows
    #[error("cannot compute {aggregate}: table is empty")]
    EmptyTable { aggregate: &'static str },

    /// Status with no ordinal rank under the Reject policy
    #[error("conservation status {status:?} has no ordinal rank ({rows} rows)")]
    UnmappedStatus { status: String, rows: usize },

    /// Not enough pairs for a rank correlation
    #[error("rank correlation needs at least 3 pairs, got {pairs}")]
    InsufficientData { pairs: usize },

    /// One side of the correlation has no variance
    #[error("rank correlation undefined: {column} is constant")]
    ConstantInput { column: &'static str },
}

fn format_line(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" at line {line}"),
        None => String::new(),
    }
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
