// Only compile the chart viewer when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use park_biodiversity::{render_report, run, AnalysisConfig, AnalysisReport};

const DEFAULT_CONFIG_PATH: &str = "biodiversity.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("park_biodiversity=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("export") => {
            let out = args
                .get(2)
                .context("usage: park-biodiversity export <out.json> [config.json]")?;
            run_export(Path::new(out), args.get(3).map(String::as_str))?;
        }
        Some("view") => run_view(args.get(2).map(String::as_str))?,
        Some("report") => run_report(args.get(2).map(String::as_str))?,
        // a lone argument is a config path
        Some(other) => run_report(Some(other))?,
        None => run_report(None)?,
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path)),
        None => AnalysisConfig::load_or_default(PathBuf::from(DEFAULT_CONFIG_PATH))
            .context("Failed to load default config"),
    }
}

fn analyze(config_path: Option<&str>) -> Result<(AnalysisConfig, AnalysisReport)> {
    let config = load_config(config_path)?;
    let report = run(&config).context("Analysis failed")?;
    Ok((config, report))
}

fn run_report(config_path: Option<&str>) -> Result<()> {
    let (config, report) = analyze(config_path)?;
    print!("{}", render_report(&report, config.chart_width));
    Ok(())
}

fn run_export(out: &Path, config_path: Option<&str>) -> Result<()> {
    let (_, report) = analyze(config_path)?;
    report
        .save_json(out)
        .with_context(|| format!("Failed to export report to {}", out.display()))?;
    println!("✓ Report written to {}", out.display());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_view(config_path: Option<&str>) -> Result<()> {
    let (_, report) = analyze(config_path)?;
    let mut app = ui::App::new(&report);
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_view(_config_path: Option<&str>) -> Result<()> {
    eprintln!("❌ Chart viewer not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print text charts: park-biodiversity report");
    std::process::exit(1);
}
