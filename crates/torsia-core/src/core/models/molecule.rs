use super::atom::Atom;
use super::conformer::Conformer;
use crate::core::geometry::Point3;
use std::collections::HashMap;

/// A molecule: atoms with stable indices plus any number of independently stored conformers.
///
/// Atoms carry the intrinsic internal coordinates shared by every conformer; each
/// [`Conformer`] owns the coordinate slots for one structure index.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub name: String,
    pub(crate) atoms: Vec<Atom>,
    pub(crate) atom_name_map: HashMap<String, usize>,
    conformers: Vec<Conformer>,
}

impl Molecule {
    pub(crate) fn from_atoms(
        name: &str,
        atoms: Vec<Atom>,
        atom_name_map: HashMap<String, usize>,
    ) -> Self {
        Self {
            name: name.to_string(),
            atoms,
            atom_name_map,
            conformers: Vec::new(),
        }
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn find_atom_by_name(&self, name: &str) -> Option<usize> {
        self.atom_name_map.get(name).copied()
    }

    pub fn conformer(&self, index: usize) -> Option<&Conformer> {
        self.conformers.get(index)
    }

    pub fn conformer_mut(&mut self, index: usize) -> Option<&mut Conformer> {
        self.conformers.get_mut(index)
    }

    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    pub fn conformer_count(&self) -> usize {
        self.conformers.len()
    }

    /// Grows the conformer list so that indices `0..count` exist.
    ///
    /// Existing conformers are left untouched; new ones start with every slot invalid.
    pub fn ensure_conformers(&mut self, count: usize) {
        let atom_count = self.atoms.len();
        if self.conformers.len() < count {
            self.conformers.resize_with(count, || Conformer::new(atom_count));
        }
    }

    /// Clears every validity flag of one conformer. Unknown indices are ignored.
    pub fn reset_conformer(&mut self, index: usize) {
        if let Some(conformer) = self.conformers.get_mut(index) {
            conformer.invalidate_all();
        }
    }

    /// Position of `atom` in conformer `conformer`, if that slot is valid.
    pub fn position(&self, atom: usize, conformer: usize) -> Option<Point3> {
        self.conformers.get(conformer)?.position(atom)
    }

    /// Splits the molecule into shared atoms and exclusively borrowed conformers.
    ///
    /// Generation only writes to conformer slots, so this is the borrow it needs.
    pub fn split_mut(&mut self) -> (&[Atom], &mut [Conformer]) {
        (&self.atoms, &mut self.conformers)
    }
}
