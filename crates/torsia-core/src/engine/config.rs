use crate::core::geometry::frame::DEFAULT_DEGENERACY_TOLERANCE;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Number of conformers (structure indices `0..conformer_count`) to populate.
    pub conformer_count: usize,
    /// Separation or bend sine below which a frame is rejected as degenerate.
    pub degeneracy_tolerance: f64,
}

#[derive(Default)]
pub struct GenerationConfigBuilder {
    conformer_count: Option<usize>,
    degeneracy_tolerance: Option<f64>,
}

impl GenerationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conformer_count(mut self, count: usize) -> Self {
        self.conformer_count = Some(count);
        self
    }

    pub fn degeneracy_tolerance(mut self, tolerance: f64) -> Self {
        self.degeneracy_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<GenerationConfig, ConfigError> {
        let conformer_count = self
            .conformer_count
            .ok_or(ConfigError::MissingParameter("conformer_count"))?;
        if conformer_count == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "conformer_count",
                reason: "at least one conformer must be generated".to_string(),
            });
        }

        let degeneracy_tolerance = self
            .degeneracy_tolerance
            .unwrap_or(DEFAULT_DEGENERACY_TOLERANCE);
        if !degeneracy_tolerance.is_finite() || degeneracy_tolerance <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "degeneracy_tolerance",
                reason: format!("expected a positive finite number, got {degeneracy_tolerance}"),
            });
        }

        Ok(GenerationConfig {
            conformer_count,
            degeneracy_tolerance,
        })
    }
}
