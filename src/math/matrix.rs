use rand::Rng;

use crate::error::{NetError, Result};

/// Dense row-major matrix of `f64`.
///
/// Every arithmetic method allocates a fresh result and leaves its operands
/// untouched. Shape errors surface as `NetError::DimensionMismatch`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols]
        }
    }

    /// Builds a matrix from row-major values. `data.len()` must equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(NetError::InvalidDataSize {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// A `len × 1` column vector.
    pub fn column(data: Vec<f64>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: 1,
            data,
        }
    }

    /// Fills a matrix with values drawn uniformly from `[low, high)`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, low: f64, high: f64, rng: &mut R) -> Matrix {
        let span = high - low;
        let data = (0..rows * cols)
            .map(|_| low + rng.gen::<f64>() * span)
            .collect();

        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Row-major view of the entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// `result[i][j] = functor(i, j, self[i][j])`
    pub fn apply<F>(&self, functor: F) -> Matrix
    where
        F: Fn(usize, usize, f64) -> f64,
    {
        let cols = self.cols;
        let data = self.data.iter()
            .enumerate()
            .map(|(k, &v)| functor(k / cols, k % cols, v))
            .collect();

        Matrix { rows: self.rows, cols: self.cols, data }
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "hadamard", |a, b| a * b)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "add", |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "sub", |a, b| a - b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.apply(|_, _, v| v * factor)
    }

    /// Standard matrix product; requires `self.cols == rhs.rows`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NetError::DimensionMismatch {
                op: "matmul",
                left: self.dims(),
                right: rhs.dims(),
            });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.get(i, k) * rhs.get(k, j);
                }

                res.data[i * res.cols + j] = sum;
            }
        }

        Ok(res)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i * res.cols + j] = self.get(j, i);
            }
        }

        res
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.dims() != rhs.dims() {
            return Err(NetError::DimensionMismatch {
                op,
                left: self.dims(),
                right: rhs.dims(),
            });
        }

        let data = self.data.iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn m(rows: usize, cols: usize, data: &[f64]) -> Matrix {
        Matrix::from_vec(rows, cols, data.to_vec()).unwrap()
    }

    #[test]
    fn matmul_multiplies_rows_by_columns() {
        let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = m(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

        let c = a.matmul(&b).unwrap();

        assert_eq!(c.dims(), (2, 2));
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn matmul_rejects_incompatible_shapes() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);

        match a.matmul(&b) {
            Err(NetError::DimensionMismatch { op, left, right }) => {
                assert_eq!(op, "matmul");
                assert_eq!(left, (2, 3));
                assert_eq!(right, (2, 3));
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn elementwise_ops_require_identical_shapes() {
        let a = Matrix::zeros(2, 1);
        let b = Matrix::zeros(1, 2);

        assert!(matches!(a.add(&b), Err(NetError::DimensionMismatch { op: "add", .. })));
        assert!(matches!(a.sub(&b), Err(NetError::DimensionMismatch { op: "sub", .. })));
        assert!(matches!(a.hadamard(&b), Err(NetError::DimensionMismatch { op: "hadamard", .. })));
    }

    #[test]
    fn elementwise_ops() {
        let a = m(1, 3, &[1.0, 2.0, 3.0]);
        let b = m(1, 3, &[4.0, 5.0, 6.0]);

        assert_eq!(a.add(&b).unwrap().as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!(b.sub(&a).unwrap().as_slice(), &[3.0, 3.0, 3.0]);
        assert_eq!(a.hadamard(&b).unwrap().as_slice(), &[4.0, 10.0, 18.0]);
        assert_eq!(a.scale(-2.0).as_slice(), &[-2.0, -4.0, -6.0]);
    }

    #[test]
    fn apply_passes_indices() {
        let a = Matrix::zeros(2, 3);
        let idx = a.apply(|i, j, v| v + (i * 10 + j) as f64);
        assert_eq!(idx.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn transpose_swaps_axes() {
        let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = a.transpose();

        assert_eq!(t.dims(), (3, 2));
        assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn operations_do_not_mutate_operands() {
        let a = m(1, 2, &[1.0, 2.0]);
        let b = m(1, 2, &[3.0, 4.0]);
        let _ = a.add(&b).unwrap();
        let _ = a.scale(3.0);
        assert_eq!(a.as_slice(), &[1.0, 2.0]);
        assert_eq!(b.as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(matches!(
            Matrix::from_vec(2, 2, vec![1.0; 3]),
            Err(NetError::InvalidDataSize { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = Matrix::random(10, 10, -0.5, 0.5, &mut rng);
        assert!(r.as_slice().iter().all(|&v| (-0.5..0.5).contains(&v)));
    }
}
