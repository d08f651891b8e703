use std::f64::consts::PI;

/// Bond-frame displacements derived from an atom's bond length and valence angle.
///
/// `cos` is the component along the reference bond and `sin` the radial component that
/// the dihedral rotates about that bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOffsets {
    pub cos: f64,
    pub sin: f64,
}

impl PlacementOffsets {
    /// Computes `L * cos(pi - theta)` and `L * sin(pi - theta)`.
    ///
    /// No range validation is applied; non-physical angles yield whatever the formula gives.
    pub fn from_geometry(bond_length: f64, valence_angle: f64) -> Self {
        let (sin, cos) = (PI - valence_angle).sin_cos();
        Self {
            cos: bond_length * cos,
            sin: bond_length * sin,
        }
    }

    /// Length of the bond these offsets encode.
    #[inline]
    pub fn bond_length(&self) -> f64 {
        self.cos.hypot(self.sin)
    }
}

/// An atom described by its internal coordinates relative to its placement frame.
///
/// Offsets are derived data: they exist only after [`Atom::prepare_offsets`] has run and
/// are dropped again whenever the bond length or valence angle changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "P", "C4'", "N1").
    pub name: String,
    bond_length: f64,
    valence_angle: f64,
    dihedral_angle: f64,
    offsets: Option<PlacementOffsets>,
}

impl Atom {
    /// Creates an atom from its bond length, valence angle and intrinsic dihedral angle.
    ///
    /// Angles are in radians. Offsets start unprepared.
    pub fn new(name: &str, bond_length: f64, valence_angle: f64, dihedral_angle: f64) -> Self {
        Self {
            name: name.to_string(),
            bond_length,
            valence_angle,
            dihedral_angle,
            offsets: None,
        }
    }

    pub fn bond_length(&self) -> f64 {
        self.bond_length
    }

    pub fn valence_angle(&self) -> f64 {
        self.valence_angle
    }

    pub fn dihedral_angle(&self) -> f64 {
        self.dihedral_angle
    }

    /// Replaces the bond length and valence angle and discards any prepared offsets.
    pub fn set_geometry(&mut self, bond_length: f64, valence_angle: f64) {
        self.bond_length = bond_length;
        self.valence_angle = valence_angle;
        self.offsets = None;
    }

    /// Replaces the intrinsic dihedral angle. Offsets do not depend on it.
    pub fn set_dihedral(&mut self, dihedral_angle: f64) {
        self.dihedral_angle = dihedral_angle;
    }

    pub fn offsets(&self) -> Option<PlacementOffsets> {
        self.offsets
    }

    pub fn is_prepared(&self) -> bool {
        self.offsets.is_some()
    }

    /// Computes the placement offsets unless they are already present.
    ///
    /// Returns `true` if this call computed them.
    pub fn prepare_offsets(&mut self) -> bool {
        if self.offsets.is_some() {
            return false;
        }
        self.offsets = Some(PlacementOffsets::from_geometry(
            self.bond_length,
            self.valence_angle,
        ));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_is_unprepared() {
        let atom = Atom::new("C1'", 1.5, 1.9, 0.3);
        assert_eq!(atom.name, "C1'");
        assert_eq!(atom.bond_length(), 1.5);
        assert_eq!(atom.valence_angle(), 1.9);
        assert_eq!(atom.dihedral_angle(), 0.3);
        assert!(!atom.is_prepared());
        assert_eq!(atom.offsets(), None);
    }

    #[test]
    fn offsets_follow_supplement_of_valence_angle() {
        let offsets = PlacementOffsets::from_geometry(2.0, PI / 3.0);
        assert!((offsets.cos - 2.0 * (2.0 * PI / 3.0).cos()).abs() < 1e-12);
        assert!((offsets.sin - 2.0 * (2.0 * PI / 3.0).sin()).abs() < 1e-12);
        assert!((offsets.bond_length() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn prepare_offsets_is_idempotent() {
        let mut atom = Atom::new("P", 1.6, 1.8, 0.0);
        assert!(atom.prepare_offsets());
        let first = atom.offsets().unwrap();

        assert!(!atom.prepare_offsets());
        assert_eq!(atom.offsets().unwrap(), first);
    }

    #[test]
    fn set_geometry_discards_offsets() {
        let mut atom = Atom::new("P", 1.6, 1.8, 0.0);
        atom.prepare_offsets();

        atom.set_geometry(1.4, 2.0);

        assert!(!atom.is_prepared());
        assert!(atom.prepare_offsets());
        assert!((atom.offsets().unwrap().bond_length() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn set_dihedral_keeps_offsets() {
        let mut atom = Atom::new("P", 1.6, 1.8, 0.0);
        atom.prepare_offsets();

        atom.set_dihedral(1.2);

        assert!(atom.is_prepared());
        assert_eq!(atom.dihedral_angle(), 1.2);
    }

    #[test]
    fn non_physical_angles_are_accepted() {
        let offsets = PlacementOffsets::from_geometry(-1.0, 7.0);
        assert!(offsets.cos.is_finite());
        assert!(offsets.sin.is_finite());
    }
}
