use crate::core::geometry::Point3;

/// A coordinate for one atom in one conformer, meaningful only while `valid` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSlot {
    pub position: Point3,
    pub valid: bool,
}

impl Default for CoordinateSlot {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            valid: false,
        }
    }
}

/// One conformer: a coordinate slot for every atom of the molecule, indexed by atom index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conformer {
    slots: Vec<CoordinateSlot>,
}

impl Conformer {
    /// Creates a conformer with `atom_count` invalid slots.
    pub fn new(atom_count: usize) -> Self {
        Self {
            slots: vec![CoordinateSlot::default(); atom_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, atom: usize) -> Option<&CoordinateSlot> {
        self.slots.get(atom)
    }

    pub fn slots(&self) -> &[CoordinateSlot] {
        &self.slots
    }

    /// Returns the position of `atom` if its slot holds a computed point.
    pub fn position(&self, atom: usize) -> Option<Point3> {
        self.slots
            .get(atom)
            .filter(|slot| slot.valid)
            .map(|slot| slot.position)
    }

    pub fn is_valid(&self, atom: usize) -> bool {
        self.slots.get(atom).is_some_and(|slot| slot.valid)
    }

    /// Overwrites the slot of `atom` and marks it valid. Returns `false` for an unknown atom.
    pub fn set_position(&mut self, atom: usize, position: Point3) -> bool {
        match self.slots.get_mut(atom) {
            Some(slot) => {
                slot.position = position;
                slot.valid = true;
                true
            }
            None => false,
        }
    }

    /// Clears the validity flag of one slot, keeping the stale point in place.
    pub fn invalidate(&mut self, atom: usize) {
        if let Some(slot) = self.slots.get_mut(atom) {
            slot.valid = false;
        }
    }

    pub fn invalidate_all(&mut self) {
        self.slots.iter_mut().for_each(|slot| slot.valid = false);
    }

    pub fn valid_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.valid).count()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.valid)
    }

    /// Collects every position, or `None` if any slot is still invalid.
    pub fn positions(&self) -> Option<Vec<Point3>> {
        self.slots
            .iter()
            .map(|slot| slot.valid.then_some(slot.position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conformer_has_only_invalid_slots() {
        let conformer = Conformer::new(3);
        assert_eq!(conformer.len(), 3);
        assert_eq!(conformer.valid_count(), 0);
        assert!(!conformer.is_complete());
        assert_eq!(conformer.position(0), None);
        assert_eq!(conformer.positions(), None);
    }

    #[test]
    fn set_position_marks_slot_valid() {
        let mut conformer = Conformer::new(2);
        assert!(conformer.set_position(1, Point3::new(1.0, 2.0, 3.0)));

        assert!(conformer.is_valid(1));
        assert!(!conformer.is_valid(0));
        assert_eq!(conformer.position(1), Some(Point3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn set_position_on_unknown_atom_is_rejected() {
        let mut conformer = Conformer::new(1);
        assert!(!conformer.set_position(5, Point3::origin()));
        assert!(!conformer.is_valid(5));
    }

    #[test]
    fn invalidate_hides_position_but_keeps_stale_point() {
        let mut conformer = Conformer::new(1);
        conformer.set_position(0, Point3::new(4.0, 0.0, 0.0));

        conformer.invalidate(0);

        assert_eq!(conformer.position(0), None);
        assert_eq!(
            conformer.slot(0).unwrap().position,
            Point3::new(4.0, 0.0, 0.0)
        );
    }

    #[test]
    fn invalidate_all_clears_every_flag() {
        let mut conformer = Conformer::new(2);
        conformer.set_position(0, Point3::origin());
        conformer.set_position(1, Point3::origin());
        assert!(conformer.is_complete());

        conformer.invalidate_all();

        assert_eq!(conformer.valid_count(), 0);
    }

    #[test]
    fn positions_are_returned_once_complete() {
        let mut conformer = Conformer::new(2);
        conformer.set_position(0, Point3::new(0.0, 0.0, 1.0));
        conformer.set_position(1, Point3::new(0.0, 1.0, 0.0));

        assert_eq!(
            conformer.positions(),
            Some(vec![Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 1.0, 0.0)])
        );
    }
}
