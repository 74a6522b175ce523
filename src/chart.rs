// 📈 Presenter - bar chart specs and their text rendering
// Charts are plain data; the terminal renderer and the TUI viewer both draw from them

use crate::aggregate::{FrequencyTable, ParkBiodiversity, ParkTotals};
use crate::correlation::CorrelationReport;
use crate::pipeline::AnalysisReport;
use serde::{Deserialize, Serialize};

const BAR_GLYPHS: [char; 3] = ['█', '▒', '░'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<u64>,
}

/// One bar chart: a category axis and one or more value series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn from_frequencies(title: &str, x_label: &str, y_label: &str, table: &FrequencyTable) -> Self {
        ChartSpec {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            categories: table.iter().map(|e| e.label.clone()).collect(),
            series: vec![Series {
                name: y_label.to_string(),
                values: table.iter().map(|e| e.count).collect(),
            }],
        }
    }

    pub fn from_park_totals(totals: &ParkTotals) -> Self {
        ChartSpec {
            title: "Total Observations in Each National Park".to_string(),
            x_label: "National Park".to_string(),
            y_label: "Total Observations".to_string(),
            categories: totals.parks.iter().map(|p| p.park_name.clone()).collect(),
            series: vec![Series {
                name: "Total Observations".to_string(),
                values: totals.parks.iter().map(|p| p.observations).collect(),
            }],
        }
    }

    pub fn from_biodiversity(table: &[ParkBiodiversity]) -> Self {
        ChartSpec {
            title: "Park-Specific Biodiversity: Total vs Endangered Species".to_string(),
            x_label: "National Park".to_string(),
            y_label: "Number of Species".to_string(),
            categories: table.iter().map(|p| p.park_name.clone()).collect(),
            series: vec![
                Series {
                    name: "Total Unique Species".to_string(),
                    values: table.iter().map(|p| p.total_species as u64).collect(),
                },
                Series {
                    name: "Endangered Species".to_string(),
                    values: table.iter().map(|p| p.endangered_species as u64).collect(),
                },
            ],
        }
    }

    pub fn max_value(&self) -> u64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

impl AnalysisReport {
    /// The five charts, in presentation order
    pub fn charts(&self) -> Vec<ChartSpec> {
        vec![
            ChartSpec::from_frequencies(
                "Distribution of Species Categories",
                "Category",
                "Number of Records",
                &self.category_counts,
            ),
            ChartSpec::from_frequencies(
                "Distribution of Conservation Statuses",
                "Conservation Status",
                "Number of Records",
                &self.status_counts,
            ),
            ChartSpec::from_park_totals(&self.park_totals),
            ChartSpec::from_frequencies(
                "Distribution of Endangered Species Across Categories",
                "Category",
                "Number of Endangered Species",
                &self.endangered_category_counts,
            ),
            ChartSpec::from_biodiversity(&self.park_biodiversity),
        ]
    }
}

// ============================================================================
// TEXT RENDERING
// ============================================================================

fn bar_length(value: u64, max: u64, width: usize) -> usize {
    if max == 0 || value == 0 {
        return 0;
    }
    let scaled = (value as f64 / max as f64 * width as f64).round() as usize;
    scaled.max(1)
}

/// Horizontal bar chart; category labels sit beside their bars
pub fn render_text(chart: &ChartSpec, width: usize) -> String {
    let mut out = String::new();
    let max = chart.max_value();
    let label_width = chart
        .categories
        .iter()
        .map(|c| c.chars().count())
        .chain(std::iter::once(chart.x_label.chars().count()))
        .max()
        .unwrap_or(0);

    out.push_str(&format!("{}\n", chart.title));
    out.push_str(&format!("{}\n", "═".repeat(chart.title.chars().count())));
    out.push_str(&format!("{:<label_width$} │ {}\n", chart.x_label, chart.y_label));
    out.push_str(&format!("{}─┼─{}\n", "─".repeat(label_width), "─".repeat(width)));

    for (i, category) in chart.categories.iter().enumerate() {
        for (s, series) in chart.series.iter().enumerate() {
            let value = series.values.get(i).copied().unwrap_or(0);
            let glyph = BAR_GLYPHS[s % BAR_GLYPHS.len()];
            let label = if s == 0 { category.as_str() } else { "" };
            let bar: String = std::iter::repeat(glyph)
                .take(bar_length(value, max, width))
                .collect();
            out.push_str(&format!("{:<label_width$} │ {} {}\n", label, bar, value));
        }
    }

    if chart.series.len() > 1 {
        let legend: Vec<String> = chart
            .series
            .iter()
            .enumerate()
            .map(|(s, series)| format!("{} {}", BAR_GLYPHS[s % BAR_GLYPHS.len()], series.name))
            .collect();
        out.push_str(&legend.join("   "));
        out.push('\n');
    }

    out
}

/// The two scalar lines, plus a note when rows were left out
pub fn format_correlation(report: &CorrelationReport) -> String {
    let mut out = format!(
        "Correlation Coefficient: {}\nP-value: {}\n",
        report.coefficient, report.p_value
    );

    if report.excluded_rows() > 0 {
        let parts: Vec<String> = report
            .excluded
            .iter()
            .map(|e| format!("{} × {}", e.rows, e.status.as_deref().unwrap_or("<missing>")))
            .collect();
        out.push_str(&format!(
            "Excluded {} rows with unranked status ({})\n",
            report.excluded_rows(),
            parts.join(", ")
        ));
    }

    out
}

/// Full text report: three charts, the correlation, two more charts
pub fn render_report(report: &AnalysisReport, width: usize) -> String {
    let charts = report.charts();
    let mut out = String::new();

    for (i, chart) in charts.iter().enumerate() {
        if i == 3 {
            out.push_str(&format_correlation(&report.correlation));
            out.push('\n');
        }
        out.push_str(&render_text(chart, width));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{CountEntry, ParkTotal};
    use crate::correlation::ExcludedStatus;

    fn frequencies() -> FrequencyTable {
        FrequencyTable {
            entries: vec![
                CountEntry { label: "Vascular Plant".to_string(), count: 40 },
                CountEntry { label: "Bird".to_string(), count: 10 },
                CountEntry { label: "Fish".to_string(), count: 0 },
            ],
        }
    }

    #[test]
    fn test_bar_length_scaling() {
        assert_eq!(bar_length(40, 40, 20), 20);
        assert_eq!(bar_length(10, 40, 20), 5);
        assert_eq!(bar_length(1, 1000, 20), 1);
        assert_eq!(bar_length(0, 40, 20), 0);
        assert_eq!(bar_length(5, 0, 20), 0);
    }

    #[test]
    fn test_render_text_single_series() {
        let chart = ChartSpec::from_frequencies("Distribution", "Category", "Records", &frequencies());
        let text = render_text(&chart, 20);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Distribution");
        assert!(lines[2].starts_with("Category"));
        assert!(lines[4].starts_with("Vascular Plant │ "));
        assert!(lines[4].ends_with(&format!("{} 40", "█".repeat(20))));
        assert!(lines[5].ends_with(&format!("{} 10", "█".repeat(5))));
        assert!(lines[6].ends_with("│  0"));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_render_text_two_series_has_legend() {
        let chart = ChartSpec::from_biodiversity(&[
            ParkBiodiversity { park_name: "Yosemite".to_string(), total_species: 8, endangered_species: 2 },
            ParkBiodiversity { park_name: "Zion".to_string(), total_species: 4, endangered_species: 0 },
        ]);
        let text = render_text(&chart, 8);

        let yosemite = text.lines().find(|l| l.starts_with("Yosemite")).unwrap();
        assert!(yosemite.ends_with("│ ████████ 8"));
        assert!(text.contains("▒▒ 2"));
        assert!(text.lines().last().unwrap().contains("Endangered Species"));
    }

    #[test]
    fn test_render_text_empty_chart_keeps_header() {
        let chart = ChartSpec::from_frequencies(
            "Endangered",
            "Category",
            "Records",
            &FrequencyTable { entries: Vec::new() },
        );
        let text = render_text(&chart, 20);

        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with(&format!("{}\n", "─".repeat(20))));
    }

    #[test]
    fn test_legend_line_is_terminated() {
        let chart = ChartSpec::from_biodiversity(&[ParkBiodiversity {
            park_name: "Zion".to_string(),
            total_species: 4,
            endangered_species: 1,
        }]);
        let text = render_text(&chart, 8);

        assert!(text.ends_with("Endangered Species\n"));
    }

    #[test]
    fn test_park_totals_chart() {
        let chart = ChartSpec::from_park_totals(&ParkTotals {
            parks: vec![ParkTotal { park_name: "Bryce".to_string(), observations: 15 }],
        });

        assert_eq!(chart.categories, vec!["Bryce".to_string()]);
        assert_eq!(chart.max_value(), 15);
    }

    #[test]
    fn test_format_correlation() {
        let report = CorrelationReport {
            coefficient: 0.25,
            p_value: 0.5,
            sample_size: 10,
            excluded: vec![ExcludedStatus { status: Some("Threatened".to_string()), rows: 3 }],
        };

        let text = format_correlation(&report);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Correlation Coefficient: 0.25");
        assert_eq!(lines[1], "P-value: 0.5");
        assert!(lines[2].contains("3 × Threatened"));
    }
}
