use super::tree::{PlacementTree, SourceBranch, TreeError};
use crate::core::models::builder::{BuildError, MoleculeBuilder};
use crate::core::models::molecule::Molecule;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Branch tokens that stand for "no real atom".
const EMPTY_ENTRY_TOKENS: [&str; 2] = ["", "*"];

/// One atom of a molecule definition. Angles are given in degrees.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct AtomDefinition {
    pub name: String,
    pub bond_length: f64,
    pub valence_angle: f64,
    #[serde(default)]
    pub dihedral: f64,
}

/// A molecule described by named atoms and branches of atom names.
///
/// ```toml
/// name = "backbone fragment"
/// branches = [["*", "*", "P", "O5'"], ["*", "P", "O5'", "C5'"]]
///
/// [[atoms]]
/// name = "P"
/// bond-length = 1.6
/// valence-angle = 109.5
/// dihedral = 180.0
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MoleculeDefinition {
    pub name: String,
    #[serde(default)]
    pub atoms: Vec<AtomDefinition>,
    #[serde(default)]
    pub branches: Vec<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Branch {branch} references unknown atom '{name}'")]
    UnknownAtomName { branch: usize, name: String },
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl MoleculeDefinition {
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path).map_err(|e| DefinitionError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| DefinitionError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Builds the molecule (angles converted to radians) and its placement tree.
    pub fn build(&self) -> Result<(Molecule, PlacementTree), DefinitionError> {
        let mut builder = MoleculeBuilder::new(&self.name);
        for atom in &self.atoms {
            builder.add_atom(
                &atom.name,
                atom.bond_length,
                atom.valence_angle.to_radians(),
                atom.dihedral.to_radians(),
            );
        }
        let molecule = builder.build()?;

        let source = self
            .branches
            .iter()
            .enumerate()
            .map(|(branch, names)| resolve_branch(&molecule, branch, names))
            .collect::<Result<Vec<_>, _>>()?;
        let tree = PlacementTree::build(&source, molecule.atom_count())?;

        Ok((molecule, tree))
    }
}

impl FromStr for MoleculeDefinition {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

fn resolve_branch(
    molecule: &Molecule,
    branch: usize,
    names: &[String],
) -> Result<SourceBranch, DefinitionError> {
    names
        .iter()
        .map(|name| {
            let name = name.trim();
            if EMPTY_ENTRY_TOKENS.contains(&name) {
                return Ok(None);
            }
            molecule
                .find_atom_by_name(name)
                .map(Some)
                .ok_or_else(|| DefinitionError::UnknownAtomName {
                    branch,
                    name: name.to_string(),
                })
        })
        .collect()
}
