use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use torsia::engine::config as core_config;
use tracing::debug;

const DEFAULT_CONFORMER_COUNT: usize = 1;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialGenerationConfig {
    conformers: Option<usize>,
    #[serde(rename = "degeneracy-tolerance")]
    degeneracy_tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    generation: Option<PartialGenerationConfig>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts from an empty configuration.
    pub fn for_args(args: &BuildArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, args: &BuildArgs) -> Result<core_config::GenerationConfig> {
        self.apply_set_values(&args.set_values)?;
        let generation = self.generation.take().unwrap_or_default();

        let mut builder = core_config::GenerationConfigBuilder::new().conformer_count(
            args.conformers
                .or(generation.conformers)
                .unwrap_or(DEFAULT_CONFORMER_COUNT),
        );
        if let Some(tolerance) = args.tolerance.or(generation.degeneracy_tolerance) {
            builder = builder.degeneracy_tolerance(tolerance);
        }

        builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let generation = self.generation.get_or_insert_with(Default::default);

            match key {
                "generation.conformers" => {
                    generation.conformers = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid integer value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                "generation.degeneracy-tolerance" => {
                    generation.degeneracy_tolerance = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
