// End-to-end run over CSV files on disk

use park_biodiversity::{
    render_report, run, AnalysisConfig, AnalysisError, UnmappedStatusPolicy,
};
use std::fs;
use tempfile::TempDir;

const SPECIES_CSV: &str = "\
category,scientific_name,common_names,conservation_status
Mammal,Canis lupus,Gray Wolf,Endangered
Mammal,Canis lupus,\"Gray Wolf, Wolf\",In Recovery
Mammal,Myotis lucifugus,Little Brown Bat,Species of Concern
Bird,Haliaeetus leucocephalus,Bald Eagle,In Recovery
Vascular Plant,Vicia benghalensis,\"Purple Vetch, Reddish Tufted Vetch\",
Fish,Oncorhynchus mykiss,Rainbow Trout,Threatened
";

const OBSERVATIONS_CSV: &str = "\
scientific_name,park_name,observations
Canis lupus,Yellowstone National Park,27
Myotis lucifugus,Yellowstone National Park,150
Haliaeetus leucocephalus,Yosemite National Park,93
Vicia benghalensis,Great Smoky Mountains National Park,68
Vicia benghalensis,Yosemite National Park,148
Oncorhynchus mykiss,Bryce National Park,40
Ursus arctos horribilis,Yellowstone National Park,210
";

fn write_inputs(dir: &TempDir) -> AnalysisConfig {
    let species_path = dir.path().join("species_info.csv");
    let observations_path = dir.path().join("observations.csv");
    fs::write(&species_path, SPECIES_CSV).unwrap();
    fs::write(&observations_path, OBSERVATIONS_CSV).unwrap();

    AnalysisConfig {
        species_path,
        observations_path,
        ..AnalysisConfig::default()
    }
}

#[test]
fn test_run_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(&dir);

    let report = run(&config).unwrap();

    // Canis lupus fans out to two rows
    assert_eq!(report.join.observation_rows, 7);
    assert_eq!(report.join.merged_rows, 8);
    assert_eq!(report.join.unmatched_observations, 1);
    assert_eq!(report.join.duplicate_species_keys, 1);

    assert_eq!(report.category_counts.total(), 8);
    assert_eq!(report.category_counts.get("Mammal"), Some(3));
    assert_eq!(report.category_counts.get("Unmatched"), Some(1));

    assert_eq!(report.status_counts.total(), 8);
    assert_eq!(report.status_counts.get("Not Evaluated"), Some(3));

    // 27 counted twice through the fan-out
    assert_eq!(report.park_totals.get("Yellowstone National Park"), Some(27 * 2 + 150 + 210));
    assert_eq!(report.park_totals.parks[0].park_name, "Yellowstone National Park");

    // Species of Concern and Threatened have no rank
    assert_eq!(report.correlation.excluded_rows(), 2);
    assert_eq!(report.correlation.sample_size, 6);
    assert!(report.correlation.coefficient.is_finite());
    assert!((0.0..=1.0).contains(&report.correlation.p_value));

    assert_eq!(report.endangered_rows, 4);
    assert_eq!(report.endangered_category_counts.get("Mammal"), Some(2));

    let yellowstone = report
        .park_biodiversity
        .iter()
        .find(|p| p.park_name == "Yellowstone National Park")
        .unwrap();
    assert_eq!(yellowstone.total_species, 3);
    assert_eq!(yellowstone.endangered_species, 1);
}

#[test]
fn test_text_report_contains_scalars_and_charts() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(&dir);

    let report = run(&config).unwrap();
    let text = render_report(&report, config.chart_width);

    assert!(text.contains("Distribution of Species Categories"));
    assert!(text.contains("Distribution of Conservation Statuses"));
    assert!(text.contains("Total Observations in Each National Park"));
    assert!(text.contains("Distribution of Endangered Species Across Categories"));
    assert!(text.contains("Park-Specific Biodiversity: Total vs Endangered Species"));
    assert!(text.contains(&format!("Correlation Coefficient: {}", report.correlation.coefficient)));
    assert!(text.contains(&format!("P-value: {}", report.correlation.p_value)));
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_inputs(&dir);
    config.observations_path = dir.path().join("missing.csv");

    assert!(matches!(run(&config), Err(AnalysisError::InputNotFound { .. })));
}

#[test]
fn test_reject_policy_fails_on_unranked_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_inputs(&dir);
    config.unmapped_status_policy = UnmappedStatusPolicy::Reject;
    config.endangered_statuses = vec!["Endangered".to_string(), "In Recovery".to_string()];

    // config is clean, but the data still carries unranked statuses
    match run(&config) {
        Err(AnalysisError::UnmappedStatus { status, rows }) => {
            assert_eq!(status, "Species of Concern");
            assert_eq!(rows, 1);
        }
        other => panic!("expected UnmappedStatus, got {:?}", other),
    }
}

#[test]
fn test_no_endangered_rows_still_renders_every_chart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_inputs(&dir);
    config.endangered_statuses = vec!["Extinct".to_string()];

    let report = run(&config).unwrap();
    assert_eq!(report.endangered_rows, 0);
    assert!(report.endangered_category_counts.is_empty());

    let text = render_report(&report, config.chart_width);
    assert!(text.contains("Distribution of Endangered Species Across Categories"));
    assert!(text.contains("Park-Specific Biodiversity: Total vs Endangered Species"));
    assert!(text.contains(&format!("P-value: {}", report.correlation.p_value)));
}
