use std::ops::Mul;

use crate::errors::*;

//////////////////////////////////////////////////////////////////////
// small dense matrix backed by nalgebra; transformations only ever
// build 3x3 instances but the loader-facing API keeps rows x cols

type DMatrixd = nalgebra::DMatrix<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: DMatrixd
}

impl Matrix {

    // zero matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Matrix { data: DMatrixd::zeros(rows, cols) }
    }

    // ones on the leading diagonal, even if not square
    pub fn identity(rows: usize, cols: usize) -> Self {
        Matrix { data: DMatrixd::identity(rows, cols) }
    }

    pub fn from_rows3(rows: [[f64; 3]; 3]) -> Self {
        Matrix {
            data: DMatrixd::from_fn(3, 3, |r, c| rows[r][c])
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[(r, c)]
    }

    pub fn set(&mut self, r: usize, c: usize, v: f64) {
        self.data[(r, c)] = v;
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    pub fn set_identity(&mut self) {
        self.data = DMatrixd::identity(self.rows(), self.cols());
    }

    // fresh zero matrix of the new size
    pub fn reinit(&mut self, rows: usize, cols: usize) {
        self.data = DMatrixd::zeros(rows, cols);
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {

        if self.rows() != other.rows() || self.cols() != other.cols() {
            return Err(validation(format!(
                "cannot add {:}x{:} matrix to {:}x{:} matrix",
                other.rows(), other.cols(), self.rows(), self.cols())));
        }

        Ok(Matrix { data: &self.data + &other.data })

    }

    pub fn checked_mul(&self, other: &Matrix) -> Result<Matrix> {

        if self.cols() != other.rows() {
            return Err(validation(format!(
                "cannot multiply {:}x{:} matrix by {:}x{:} matrix",
                self.rows(), self.cols(), other.rows(), other.cols())));
        }

        Ok(Matrix { data: &self.data * &other.data })

    }

    // largest absolute entry of self - other, for closure checks
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        (&self.data - &other.data).amax()
    }

    // (x, y, w) -> M (x, y, w)
    pub fn apply3(&self, v: [f64; 3]) -> [f64; 3] {

        let mut rval = [0.0; 3];

        for (r, out) in rval.iter_mut().enumerate() {
            *out = self.get(r, 0)*v[0] + self.get(r, 1)*v[1] + self.get(r, 2)*v[2];
        }

        rval

    }

    //////////////////////////////////////////////////
    // hyperbolic motions in Weierstrass coordinates

    // rotation about the origin by theta radians
    pub fn rotation(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Matrix::from_rows3([
            [c, -s, 0.0],
            [s, c, 0.0],
            [0.0, 0.0, 1.0]
        ])
    }

    // translation by hyperbolic distance d along the x axis
    pub fn x_translation(d: f64) -> Self {
        let (ch, sh) = (d.cosh(), d.sinh());
        Matrix::from_rows3([
            [ch, 0.0, sh],
            [0.0, 1.0, 0.0],
            [sh, 0.0, ch]
        ])
    }

    // reflection in the x axis
    pub fn x_reflection() -> Self {
        Matrix::from_rows3([
            [1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0]
        ])
    }

}

// unchecked product for the 3x3 motions
impl<'a> Mul<&'a Matrix> for &'a Matrix {

    type Output = Matrix;

    fn mul(self, other: &'a Matrix) -> Matrix {
        assert_eq!(self.cols(), other.rows(), "matrix dimension mismatch");
        Matrix { data: &self.data * &other.data }
    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_of_non_square_fills_leading_diagonal() {

        let m = Matrix::identity(2, 3);

        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.get(1, 2), 0.0);

    }

    #[test]
    fn reinit_discards_contents() {

        let mut m = Matrix::identity(3, 3);
        m.reinit(2, 4);

        assert_eq!((m.rows(), m.cols()), (2, 4));
        assert_eq!(m.max_abs_diff(&Matrix::new(2, 4)), 0.0);

    }

    #[test]
    fn checked_mul_rejects_bad_dimensions() {

        let a = Matrix::new(2, 3);
        let b = Matrix::new(2, 3);

        match a.checked_mul(&b) {
            Err(e) => match e.kind() {
                ErrorKind::Validation(_) => {},
                other => panic!("unexpected error {:?}", other)
            },
            Ok(_) => panic!("2x3 * 2x3 should fail")
        }

        assert!(a.add(&b).is_ok());

    }

    #[test]
    fn rotation_by_pi_twice_is_identity() {

        let r = Matrix::rotation(std::f64::consts::PI);
        let rr = &r * &r;

        assert!(rr.max_abs_diff(&Matrix::identity(3, 3)) < 1e-12);

    }

    #[test]
    fn translation_preserves_hyperboloid() {

        let t = Matrix::x_translation(0.7);
        let v = t.apply3([0.0, 0.0, 1.0]);

        // w^2 - x^2 - y^2 stays 1
        assert_abs_diff_eq!(v[2]*v[2] - v[0]*v[0] - v[1]*v[1], 1.0, epsilon = 1e-12);

        let back = &Matrix::x_translation(-0.7) * &t;
        assert!(back.max_abs_diff(&Matrix::identity(3, 3)) < 1e-12);

    }

}
