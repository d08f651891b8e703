use crate::cli::CountArgs;
use crate::error::Result;
use std::path::Path;
use torsia::{core::topology::definition::MoleculeDefinition, engine::error::EngineError};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    pub name: String,
    pub atoms: usize,
    pub branches: usize,
    pub free_dihedrals: usize,
    pub unreachable_atoms: Vec<String>,
}

pub fn summarize(path: &Path) -> Result<TreeSummary> {
    let definition = MoleculeDefinition::load(path).map_err(EngineError::from)?;
    let (molecule, tree) = definition.build().map_err(EngineError::from)?;

    let unreachable_atoms = tree
        .unreachable_atoms()
        .into_iter()
        .filter_map(|i| molecule.atom(i).map(|a| a.name.clone()))
        .collect();

    Ok(TreeSummary {
        name: molecule.name.clone(),
        atoms: molecule.atom_count(),
        branches: tree.len(),
        free_dihedrals: tree.dihedral_target_count(),
        unreachable_atoms,
    })
}

pub fn run(args: CountArgs) -> Result<()> {
    info!("Loading molecule definition from {:?}", &args.input);
    let summary = summarize(&args.input)?;

    println!("{}", summary.free_dihedrals);
    info!(
        "'{}': {} atom(s), {} branch(es), {} free dihedral(s).",
        summary.name, summary.atoms, summary.branches, summary.free_dihedrals
    );
    if !summary.unreachable_atoms.is_empty() {
        eprintln!(
            "Warning: atoms not placed by any branch: {}",
            summary.unreachable_atoms.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::tempdir;
    use torsia::core::topology::definition::DefinitionError;

    #[test]
    fn counts_free_dihedrals_and_reports_unreachable_atoms() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mol.toml");
        fs::write(
            &path,
            r#"
name = "fragment"
branches = [["*", "*", "A", "B"], ["*", "A", "B", "C", "D"]]

[[atoms]]
name = "A"
bond-length = 1.0
valence-angle = 110.0

[[atoms]]
name = "B"
bond-length = 1.0
valence-angle = 110.0

[[atoms]]
name = "C"
bond-length = 1.0
valence-angle = 110.0

[[atoms]]
name = "D"
bond-length = 1.0
valence-angle = 110.0

[[atoms]]
name = "E"
bond-length = 1.0
valence-angle = 110.0
"#,
        )
        .unwrap();

        let summary = summarize(&path).unwrap();

        assert_eq!(summary.atoms, 5);
        assert_eq!(summary.branches, 2);
        assert_eq!(summary.free_dihedrals, 3);
        assert_eq!(summary.unreachable_atoms, vec!["E".to_string()]);
    }

    #[test]
    fn missing_definition_is_reported() {
        let dir = tempdir().unwrap();

        let result = summarize(&dir.path().join("absent.toml"));

        assert!(matches!(
            result,
            Err(CliError::Torsia(EngineError::Definition {
                source: DefinitionError::Io { .. }
            }))
        ));
    }
}
