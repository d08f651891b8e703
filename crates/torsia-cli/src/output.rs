use std::io::{self, Write};
use torsia::core::models::molecule::Molecule;

/// Writes conformers `0..count` as consecutive XYZ frames.
///
/// Each frame lists only the atoms with a valid slot in that conformer, so the per-frame
/// atom count can differ when some atoms are unreachable.
pub fn write_xyz<W: Write>(molecule: &Molecule, count: usize, writer: &mut W) -> io::Result<()> {
    for (index, conformer) in molecule.conformers().iter().take(count).enumerate() {
        let placed: Vec<_> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter_map(|(i, atom)| conformer.position(i).map(|p| (atom, p)))
            .collect();

        writeln!(writer, "{}", placed.len())?;
        writeln!(writer, "{} conformer={}", molecule.name, index)?;
        for (atom, p) in placed {
            writeln!(
                writer,
                "{:<4} {:>12.6} {:>12.6} {:>12.6}",
                atom.name, p.x, p.y, p.z
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use torsia::core::geometry::Point3;
    use torsia::core::models::builder::MoleculeBuilder;

    fn molecule() -> Molecule {
        let mut builder = MoleculeBuilder::new("pair");
        builder
            .add_atom("C1", 1.0, 1.9, 0.0)
            .add_atom("C2", 1.5, 1.9, 0.0);
        let mut molecule = builder.build().unwrap();
        molecule.ensure_conformers(2);
        molecule
    }

    #[test]
    fn writes_one_frame_per_conformer() {
        let mut molecule = molecule();
        for k in 0..2 {
            let conformer = molecule.conformer_mut(k).unwrap();
            conformer.set_position(0, Point3::origin());
            conformer.set_position(1, Point3::new(1.5, 0.0, 0.0));
        }
        let mut buffer = Vec::new();

        write_xyz(&molecule, 2, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "pair conformer=0");
        assert_eq!(lines[3], "C2       1.500000     0.000000     0.000000");
        assert_eq!(lines[5], "pair conformer=1");
    }

    #[test]
    fn invalid_slots_are_left_out() {
        let mut molecule = molecule();
        molecule
            .conformer_mut(0)
            .unwrap()
            .set_position(1, Point3::new(0.0, 2.0, 0.0));
        let mut buffer = Vec::new();

        write_xyz(&molecule, 1, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1");
        assert!(lines[2].starts_with("C2"));
    }
}
