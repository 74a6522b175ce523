// Park Biodiversity - Core Library
// Exposes the analysis pipeline for the CLI, the chart viewer, and tests

pub mod error;
pub mod config;
pub mod model;
pub mod loader;
pub mod clean;       // fill + left join
pub mod aggregate;   // value counts, park sums, unique species
pub mod stats;       // ranks, Spearman, t-distribution tail
pub mod correlation;
pub mod pipeline;
pub mod chart;       // chart specs + text rendering

// Re-export commonly used types
pub use error::{AnalysisError, Result};
pub use config::{
    AnalysisConfig, ConfigIssue, RankedStatus, Severity, StatusRanking, UnmappedStatusPolicy,
    NOT_EVALUATED,
};
pub use model::{Datasets, MergedRecord, ObservationRecord, SpeciesRecord, StatusCarrier};
pub use loader::{load_datasets, load_observations, load_species};
pub use clean::{fill_missing_status, left_join, summarize_join, JoinSummary};
pub use aggregate::{
    category_counts, endangered_category_counts, endangered_subset, park_biodiversity,
    park_totals, status_counts, unique_species_per_park, CountEntry, FrequencyTable,
    ParkBiodiversity, ParkTotal, ParkTotals,
};
pub use correlation::{rank_correlation, CorrelationReport, ExcludedStatus};
pub use pipeline::{analyze, prepare, run, AnalysisReport};
pub use chart::{format_correlation, render_report, render_text, ChartSpec, Series};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
