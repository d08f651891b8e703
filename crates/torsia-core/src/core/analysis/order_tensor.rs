use crate::core::models::conformer::Conformer;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use thiserror::Error;
use tracing::{debug, instrument};

/// Number of independent elements of a symmetric traceless 3x3 tensor.
pub const INDEPENDENT_ELEMENTS: usize = 5;

const RANK_TOLERANCE: f64 = 1e-9;
const ZERO_LENGTH_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("At least 5 bond vectors are required, got {found}")]
    Underdetermined { found: usize },

    #[error("Got {vectors} bond vectors but {couplings} couplings")]
    LengthMismatch { vectors: usize, couplings: usize },

    #[error("Bond vector {index} has zero length")]
    ZeroVector { index: usize },

    #[error("Atom {atom} has no valid position in this conformer")]
    UnplacedAtom { atom: usize },

    #[error("Bond vectors span only {rank} of 5 tensor directions")]
    RankDeficient { rank: usize },

    #[error("Least-squares solve failed: {0}")]
    Solve(&'static str),
}

/// Symmetric traceless order tensor, stored as `[Sxx, Syy, Sxy, Sxz, Syz]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTensor {
    elements: [f64; INDEPENDENT_ELEMENTS],
}

impl OrderTensor {
    pub fn new(elements: [f64; INDEPENDENT_ELEMENTS]) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[f64; INDEPENDENT_ELEMENTS] {
        &self.elements
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        let [sxx, syy, sxy, sxz, syz] = self.elements;
        Matrix3::new(
            sxx, sxy, sxz, //
            sxy, syy, syz, //
            sxz, syz, -sxx - syy,
        )
    }

    /// `v^T S v` for the unit vector along `vector`.
    pub fn predict(&self, vector: &Vector3<f64>) -> Option<f64> {
        let unit = vector.try_normalize(ZERO_LENGTH_TOLERANCE)?;
        Some(design_row(&unit).iter().zip(&self.elements).map(|(a, s)| a * s).sum())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTensorFit {
    pub tensor: OrderTensor,
    /// Root-mean-square difference between fitted and supplied couplings.
    pub rms_residual: f64,
}

/// One design-matrix row for a unit vector: `[x²-z², y²-z², 2xy, 2xz, 2yz]`.
pub fn design_row(unit: &Vector3<f64>) -> [f64; INDEPENDENT_ELEMENTS] {
    let (x, y, z) = (unit.x, unit.y, unit.z);
    [
        x * x - z * z,
        y * y - z * z,
        2.0 * x * y,
        2.0 * x * z,
        2.0 * y * z,
    ]
}

/// Normalizes each vector and stacks their design rows.
pub fn design_matrix(vectors: &[Vector3<f64>]) -> Result<DMatrix<f64>, FitError> {
    let rows = vectors
        .iter()
        .enumerate()
        .map(|(index, v)| {
            v.try_normalize(ZERO_LENGTH_TOLERANCE)
                .map(|unit| design_row(&unit))
                .ok_or(FitError::ZeroVector { index })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DMatrix::from_fn(rows.len(), INDEPENDENT_ELEMENTS, |i, j| {
        rows[i][j]
    }))
}

/// Unit vectors from the first to the second atom of each pair, read from `conformer`.
pub fn bond_vectors(
    conformer: &Conformer,
    pairs: &[(usize, usize)],
) -> Result<Vec<Vector3<f64>>, FitError> {
    pairs
        .iter()
        .enumerate()
        .map(|(index, &(from, to))| {
            let a = conformer
                .position(from)
                .ok_or(FitError::UnplacedAtom { atom: from })?;
            let b = conformer
                .position(to)
                .ok_or(FitError::UnplacedAtom { atom: to })?;
            (b - a)
                .try_normalize(ZERO_LENGTH_TOLERANCE)
                .ok_or(FitError::ZeroVector { index })
        })
        .collect()
}

/// Solves `A s = d` for the five tensor elements by SVD least squares.
#[instrument(skip_all, fields(vectors = vectors.len()))]
pub fn fit_order_tensor(
    vectors: &[Vector3<f64>],
    couplings: &[f64],
) -> Result<OrderTensorFit, FitError> {
    if vectors.len() != couplings.len() {
        return Err(FitError::LengthMismatch {
            vectors: vectors.len(),
            couplings: couplings.len(),
        });
    }
    if vectors.len() < INDEPENDENT_ELEMENTS {
        return Err(FitError::Underdetermined {
            found: vectors.len(),
        });
    }

    let design = design_matrix(vectors)?;
    let observed = DVector::from_column_slice(couplings);

    let svd = design.clone().svd(true, true);
    let rank = svd.rank(RANK_TOLERANCE);
    if rank < INDEPENDENT_ELEMENTS {
        return Err(FitError::RankDeficient { rank });
    }
    let solution = svd.solve(&observed, RANK_TOLERANCE).map_err(FitError::Solve)?;

    let residual = &design * &solution - &observed;
    let rms_residual = (residual.norm_squared() / couplings.len() as f64).sqrt();
    debug!(rms_residual, "Order tensor fitted.");

    let mut elements = [0.0; INDEPENDENT_ELEMENTS];
    elements.copy_from_slice(solution.as_slice());
    Ok(OrderTensorFit {
        tensor: OrderTensor::new(elements),
        rms_residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point3;

    fn directions() -> Vec<Vector3<f64>> {
        vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(1.0, -2.0, 0.5),
        ]
    }

    fn reference_tensor() -> OrderTensor {
        OrderTensor::new([4.0e-4, -1.5e-4, 2.0e-4, -3.0e-4, 1.0e-4])
    }

    #[test]
    fn matrix_is_symmetric_and_traceless() {
        let m = reference_tensor().matrix();

        assert!(m.trace().abs() < 1e-15);
        assert_eq!(m, m.transpose());
    }

    #[test]
    fn prediction_matches_quadratic_form() {
        let tensor = reference_tensor();
        let v = Vector3::new(1.0, -2.0, 0.5);
        let unit = v.normalize();

        let expected = (unit.transpose() * tensor.matrix() * unit)[(0, 0)];

        assert!((tensor.predict(&v).unwrap() - expected).abs() < 1e-15);
        assert_eq!(tensor.predict(&Vector3::zeros()), None);
    }

    #[test]
    fn design_row_uses_five_independent_terms() {
        let row = design_row(&Vector3::new(0.0, 0.6, 0.8));

        let expected = [-0.64, 0.36 - 0.64, 0.0, 0.0, 2.0 * 0.6 * 0.8];
        for (a, b) in row.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn fit_recovers_tensor_from_exact_couplings() {
        let tensor = reference_tensor();
        let vectors = directions();
        let couplings: Vec<f64> = vectors.iter().map(|v| tensor.predict(v).unwrap()).collect();

        let fit = fit_order_tensor(&vectors, &couplings).unwrap();

        for (a, b) in fit.tensor.elements().iter().zip(tensor.elements()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert!(fit.rms_residual < 1e-12);
    }

    #[test]
    fn fewer_than_five_vectors_is_underdetermined() {
        let vectors = &directions()[..4];

        let result = fit_order_tensor(vectors, &[0.0; 4]);

        assert_eq!(result.unwrap_err(), FitError::Underdetermined { found: 4 });
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = fit_order_tensor(&directions(), &[0.0; 3]);

        assert_eq!(
            result.unwrap_err(),
            FitError::LengthMismatch {
                vectors: 7,
                couplings: 3
            }
        );
    }

    #[test]
    fn parallel_vectors_are_rank_deficient() {
        let vectors = vec![Vector3::new(0.0, 0.0, 1.0); 6];

        let result = fit_order_tensor(&vectors, &[1.0; 6]);

        assert!(matches!(result, Err(FitError::RankDeficient { rank: 1 })));
    }

    #[test]
    fn zero_vector_is_reported_by_index() {
        let mut vectors = directions();
        vectors[2] = Vector3::zeros();

        let result = fit_order_tensor(&vectors, &[0.0; 7]);

        assert_eq!(result.unwrap_err(), FitError::ZeroVector { index: 2 });
    }

    #[test]
    fn bond_vectors_read_valid_slots_only() {
        let mut conformer = Conformer::new(3);
        conformer.set_position(0, Point3::new(0.0, 0.0, 0.0));
        conformer.set_position(1, Point3::new(0.0, 0.0, 2.0));

        let vectors = bond_vectors(&conformer, &[(0, 1)]).unwrap();
        assert!((vectors[0] - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-15);

        let missing = bond_vectors(&conformer, &[(0, 1), (1, 2)]);
        assert_eq!(missing.unwrap_err(), FitError::UnplacedAtom { atom: 2 });
    }
}
