use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use torsia::workflows::ensemble::DihedralOverrides;
use tracing::debug;

/// Override sequence for one conformer. Angles are given in degrees.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct ConformerOverride {
    index: usize,
    dihedrals: Vec<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct OverrideFile {
    #[serde(default)]
    conformer: Vec<ConformerOverride>,
}

/// Reads `[[conformer]]` entries and converts their dihedrals to radians.
pub fn load_overrides(path: &Path) -> Result<DihedralOverrides> {
    debug!("Loading dihedral overrides from file: {:?}", path);
    let content = std::fs::read_to_string(path)?;
    let file: OverrideFile = toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    let mut overrides = DihedralOverrides::with_capacity(file.conformer.len());
    for entry in file.conformer {
        let radians = entry.dihedrals.iter().map(|d| d.to_radians()).collect();
        if overrides.insert(entry.index, radians).is_some() {
            return Err(CliError::Config(format!(
                "Conformer {} has more than one override entry in {:?}",
                entry.index, path
            )));
        }
    }
    Ok(overrides)
}
