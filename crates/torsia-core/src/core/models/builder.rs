use super::atom::Atom;
use super::molecule::Molecule;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Atom name '{name}' is used by atoms {first} and {second}")]
    DuplicateAtomName {
        name: String,
        first: usize,
        second: usize,
    },
}

pub struct MoleculeBuilder {
    name: String,
    atoms: Vec<Atom>,
}

impl MoleculeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            atoms: Vec::new(),
        }
    }

    /// Appends an atom; its index is the number of atoms added before it.
    ///
    /// Angles are in radians.
    pub fn add_atom(
        &mut self,
        name: &str,
        bond_length: f64,
        valence_angle: f64,
        dihedral_angle: f64,
    ) -> &mut Self {
        self.atoms
            .push(Atom::new(name, bond_length, valence_angle, dihedral_angle));
        self
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn build(self) -> Result<Molecule, BuildError> {
        let mut atom_name_map = HashMap::with_capacity(self.atoms.len());
        for (index, atom) in self.atoms.iter().enumerate() {
            if let Some(&first) = atom_name_map.get(&atom.name) {
                return Err(BuildError::DuplicateAtomName {
                    name: atom.name.clone(),
                    first,
                    second: index,
                });
            }
            atom_name_map.insert(atom.name.clone(), index);
        }
        Ok(Molecule::from_atoms(&self.name, self.atoms, atom_name_map))
    }
}
