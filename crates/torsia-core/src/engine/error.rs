use thiserror::Error;

use super::config::ConfigError;
use super::generator::GenerationError;
use crate::core::topology::definition::DefinitionError;
use crate::core::topology::tree::TreeError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Molecule definition error: {source}")]
    Definition {
        #[from]
        source: DefinitionError,
    },

    #[error("Invalid placement tree: {source}")]
    Tree {
        #[from]
        source: TreeError,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Dihedral overrides given for conformer {index}, but only {conformers} conformers are generated")]
    OverrideOutOfRange { index: usize, conformers: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
