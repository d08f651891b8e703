use super::Point3;

/// Internal coordinates of `p3` relative to the reference chain `p0 -> p1 -> p2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalCoordinates {
    /// Distance `p2 - p3`.
    pub bond_length: f64,
    /// Angle `p1 - p2 - p3` in radians.
    pub valence_angle: f64,
    /// Torsion `p0 - p1 - p2 - p3` in radians, in `(-pi, pi]`.
    pub dihedral_angle: f64,
}

impl InternalCoordinates {
    pub fn measure(p0: &Point3, p1: &Point3, p2: &Point3, p3: &Point3) -> Self {
        Self {
            bond_length: distance(p2, p3),
            valence_angle: bond_angle(p1, p2, p3),
            dihedral_angle: dihedral_angle(p0, p1, p2, p3),
        }
    }
}

#[inline]
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    (b - a).norm()
}

/// Angle at `vertex` between the bonds to `a` and `c`, in radians.
pub fn bond_angle(a: &Point3, vertex: &Point3, c: &Point3) -> f64 {
    let u = a - vertex;
    let v = c - vertex;
    u.cross(&v).norm().atan2(u.dot(&v))
}

/// Signed torsion angle about the `p1 - p2` bond, in radians.
pub fn dihedral_angle(p0: &Point3, p1: &Point3, p2: &Point3, p3: &Point3) -> f64 {
    let b1 = p1 - p0;
    let b2 = p2 - p1;
    let b3 = p3 - p2;

    let n2 = b2.cross(&b3);
    let y = b2.norm() * b1.dot(&n2);
    let x = b1.cross(&b2).dot(&n2);
    y.atan2(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn distance_of_unit_offset_is_one() {
        assert_eq!(
            distance(&Point3::new(1.0, 1.0, 1.0), &Point3::new(1.0, 2.0, 1.0)),
            1.0
        );
    }

    #[test]
    fn bond_angle_right_angle() {
        let angle = bond_angle(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::origin(),
            &Point3::new(0.0, 3.0, 0.0),
        );
        assert!((angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn dihedral_of_planar_cis_and_trans_chains() {
        let p0 = Point3::new(0.0, 1.0, 0.0);
        let p1 = Point3::new(0.0, 0.0, 0.0);
        let p2 = Point3::new(1.0, 0.0, 0.0);

        let cis = dihedral_angle(&p0, &p1, &p2, &Point3::new(1.0, 1.0, 0.0));
        let trans = dihedral_angle(&p0, &p1, &p2, &Point3::new(1.0, -1.0, 0.0));

        assert!(cis.abs() < 1e-12);
        assert!((trans.abs() - PI).abs() < 1e-12);
    }

    #[test]
    fn dihedral_sign_follows_right_hand_rule() {
        let p0 = Point3::new(0.0, 1.0, 0.0);
        let p1 = Point3::new(0.0, 0.0, 0.0);
        let p2 = Point3::new(1.0, 0.0, 0.0);

        let positive = dihedral_angle(&p0, &p1, &p2, &Point3::new(1.0, 0.0, 1.0));
        let negative = dihedral_angle(&p0, &p1, &p2, &Point3::new(1.0, 0.0, -1.0));

        assert!((positive - FRAC_PI_2).abs() < 1e-12);
        assert!((negative + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn measure_collects_all_three_coordinates() {
        let ic = InternalCoordinates::measure(
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 2.0, 0.0),
        );
        assert!((ic.bond_length - 2.0).abs() < 1e-12);
        assert!((ic.valence_angle - FRAC_PI_2).abs() < 1e-12);
        assert!(ic.dihedral_angle.abs() < 1e-12);
    }
}
