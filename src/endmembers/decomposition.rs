use nalgebra::{DMatrix, DVector};

use crate::error::{CalcError, CalcResult};

/// Endmember proportions from a site-occupancy vector.
///
/// Each endmember is an integer combination of occupancy components
/// (`coefficients[endmember][component]`). Given an occupancy vector `s`, the
/// proportions `p` solve `Cᵀ p = s`. The coefficient matrix must be square and
/// invertible; both are checked when the decomposition is built.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDecomposition {
    components: Vec<String>,
    endmembers: Vec<String>,
    occupancy: DMatrix<f64>,
    solve: DMatrix<f64>,
}

impl LinearDecomposition {
    /// Build a decomposition, rejecting non-square or singular matrices
    pub fn new(
        components: &[&str],
        endmembers: &[&str],
        coefficients: &[&[f64]],
    ) -> CalcResult<Self> {
        if coefficients.len() != endmembers.len() {
            return Err(CalcError::configuration(format!(
                "{} endmembers but {} coefficient rows",
                endmembers.len(),
                coefficients.len()
            )));
        }
        if let Some((i, row)) = coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != components.len())
        {
            return Err(CalcError::configuration(format!(
                "coefficient row for '{}' has {} entries, expected {}",
                endmembers[i],
                row.len(),
                components.len()
            )));
        }
        if endmembers.len() != components.len() {
            return Err(CalcError::configuration(format!(
                "coefficient matrix is {}x{}; a decomposition needs as many endmembers as components",
                endmembers.len(),
                components.len()
            )));
        }

        let n = components.len();
        let flat: Vec<f64> = coefficients.iter().flat_map(|row| row.iter().copied()).collect();
        let occupancy = DMatrix::from_row_slice(n, n, &flat).transpose();
        let solve = occupancy.clone().try_inverse().ok_or_else(|| {
            CalcError::configuration("coefficient matrix is singular; endmembers are not independent")
        })?;

        Ok(Self {
            components: components.iter().map(|s| s.to_string()).collect(),
            endmembers: endmembers.iter().map(|s| s.to_string()).collect(),
            occupancy,
            solve,
        })
    }

    /// Occupancy component names, in vector order
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Endmember names, in output order
    pub fn endmembers(&self) -> &[String] {
        &self.endmembers
    }

    /// Proportions of every endmember for one occupancy vector
    pub fn decompose(&self, occupancy: &[f64]) -> CalcResult<Vec<f64>> {
        if occupancy.len() != self.components.len() {
            return Err(CalcError::input(format!(
                "occupancy vector has {} entries, expected {}",
                occupancy.len(),
                self.components.len()
            )));
        }
        let s = DVector::from_column_slice(occupancy);
        Ok((&self.solve * s).iter().copied().collect())
    }

    /// Occupancy vector implied by endmember proportions (`Cᵀ p`)
    pub fn recompose(&self, proportions: &[f64]) -> CalcResult<Vec<f64>> {
        if proportions.len() != self.endmembers.len() {
            return Err(CalcError::input(format!(
                "proportion vector has {} entries, expected {}",
                proportions.len(),
                self.endmembers.len()
            )));
        }
        let p = DVector::from_column_slice(proportions);
        Ok((&self.occupancy * p).iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solves_transposed_system() {
        // A = x, B = x + y
        let d = LinearDecomposition::new(&["x", "y"], &["A", "B"], &[&[1.0, 0.0], &[1.0, 1.0]])
            .unwrap();
        let p = d.decompose(&[3.0, 1.0]).unwrap();
        assert!((p[0] - 2.0).abs() < 1e-12);
        assert!((p[1] - 1.0).abs() < 1e-12);

        let s = d.recompose(&p).unwrap();
        assert!((s[0] - 3.0).abs() < 1e-12);
        assert!((s[1] - 1.0).abs() < 1e-12);
        assert!(matches!(d.recompose(&[1.0]), Err(CalcError::Input(_))));
    }

    #[test]
    fn test_rejects_non_square_and_singular() {
        let wide = LinearDecomposition::new(&["x", "y", "z"], &["A", "B"], &[&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]]);
        assert!(matches!(wide, Err(CalcError::Configuration(_))));

        let ragged = LinearDecomposition::new(&["x", "y"], &["A", "B"], &[&[1.0], &[0.0, 1.0]]);
        assert!(matches!(ragged, Err(CalcError::Configuration(_))));

        let singular = LinearDecomposition::new(&["x", "y"], &["A", "B"], &[&[1.0, 2.0], &[2.0, 4.0]]);
        assert!(matches!(singular, Err(CalcError::Configuration(_))));
    }

    #[test]
    fn test_wrong_vector_length() {
        let d = LinearDecomposition::new(&["x"], &["A"], &[&[2.0]]).unwrap();
        assert!(matches!(d.decompose(&[1.0, 2.0]), Err(CalcError::Input(_))));
        assert_eq!(d.decompose(&[1.0]).unwrap(), vec![0.5]);
    }
}
