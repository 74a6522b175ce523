// 📂 Loader - CSV → typed tables
// Reads species and observation files; any failure is fatal to the run

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::model::{Datasets, ObservationRecord, SpeciesRecord};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

pub fn load_species(path: &Path) -> Result<Vec<SpeciesRecord>> {
    read_table(path)
}

pub fn load_observations(path: &Path) -> Result<Vec<ObservationRecord>> {
    read_table(path)
}

/// Load both input tables named by the config
pub fn load_datasets(config: &AnalysisConfig) -> Result<Datasets> {
    let species = load_species(&config.species_path)?;
    info!(
        path = %config.species_path.display(),
        rows = species.len(),
        "loaded species table"
    );

    let observations = load_observations(&config.observations_path)?;
    info!(
        path = %config.observations_path.display(),
        rows = observations.len(),
        "loaded observations table"
    );

    Ok(Datasets {
        species,
        observations,
    })
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|source| {
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

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T = result.map_err(|source| AnalysisError::Parse {
            path: path.to_path_buf(),
            line: source.position().map(|p| p.line()),
            source,
        })?;
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "parsed csv");
    Ok(rows)
}
