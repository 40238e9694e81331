use crate::errors::*;
use crate::matrix::Matrix;
use crate::permutation::Permutation;
use crate::point::Point;

//////////////////////////////////////////////////////////////////////
// how a tile is glued to its neighbor across an edge

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Orientation {
    Reflection,
    Rotation
}

impl Orientation {

    // reflections count backwards around the polygon
    pub fn sign(self) -> i64 {
        match self {
            Orientation::Reflection => -1,
            Orientation::Rotation => 1
        }
    }

    // orientation of a composite motion
    pub fn then(self, other: Orientation) -> Orientation {
        if self == other {
            Orientation::Rotation
        } else {
            Orientation::Reflection
        }
    }

}

//////////////////////////////////////////////////////////////////////
// rigid motion of the hyperbolic plane, plus the bookkeeping the
// tiling generators need: which polygon edge the tile was entered
// through (p_pos) and whether the tile is mirrored (orient)

#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub matrix: Matrix,
    pub perm: Permutation,
    pub p_pos: usize,
    pub orient: Orientation
}

impl Transformation {

    pub fn identity(num_colors: usize) -> Self {
        Transformation {
            matrix: Matrix::identity(3, 3),
            perm: Permutation::identity(num_colors),
            p_pos: 0,
            orient: Orientation::Rotation
        }
    }

    pub fn new(matrix: Matrix, perm: Permutation) -> Result<Self> {

        if matrix.rows() != 3 || !matrix.is_square() {
            return Err(validation(format!(
                "transformation needs a 3x3 matrix, got {:}x{:}",
                matrix.rows(), matrix.cols())));
        }

        perm.ensure_bijection()?;

        Ok(Transformation {
            matrix: matrix,
            perm: perm,
            p_pos: 0,
            orient: Orientation::Rotation
        })

    }

    // self followed (on the inside) by other: the matrix is
    // self.matrix * other.matrix and colors go through other's
    // permutation first. p_pos and orient are reset; callers
    // decide what edge the product refers to.
    pub fn compose(&self, other: &Transformation) -> Result<Transformation> {

        Ok(Transformation {
            matrix: self.matrix.checked_mul(&other.matrix)?,
            perm: self.perm.compose(&other.perm)?,
            p_pos: 0,
            orient: Orientation::Rotation
        })

    }

    pub fn apply_point(&self, p: &mut Point) -> Result<()> {
        p.transform(&self.matrix)
    }

    pub fn map_color(&self, cid: usize) -> Result<usize> {
        self.perm.map(cid)
    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_is_neutral() {

        let t = Transformation::new(Matrix::rotation(0.3),
                                    Permutation::from_vec(vec![1, 0]).unwrap()).unwrap();

        let id = Transformation::identity(2);

        assert_eq!(id.compose(&t).unwrap().perm, t.perm);
        assert!(t.compose(&id).unwrap().matrix.max_abs_diff(&t.matrix) < 1e-15);
        assert_eq!(id.orient, Orientation::Rotation);

    }

    #[test]
    fn compose_resets_edge_bookkeeping() {

        let mut a = Transformation::identity(3);
        a.p_pos = 2;
        a.orient = Orientation::Reflection;

        let c = a.compose(&a).unwrap();

        assert_eq!(c.p_pos, 0);
        assert_eq!(c.orient, Orientation::Rotation);

    }

    #[test]
    fn colors_flow_through_inner_permutation_first() {

        let outer = Transformation::new(Matrix::identity(3, 3),
                                        Permutation::from_vec(vec![1, 2, 0]).unwrap()).unwrap();
        let inner = Transformation::new(Matrix::identity(3, 3),
                                        Permutation::from_vec(vec![0, 2, 1]).unwrap()).unwrap();

        let t = outer.compose(&inner).unwrap();

        for c in 0..3 {
            assert_eq!(t.map_color(c).unwrap(), outer.perm[inner.perm[c]]);
        }

    }

    #[test]
    fn apply_moves_point_along_geodesic() {

        let t = Transformation::new(Matrix::x_translation(1.0),
                                    Permutation::identity(1)).unwrap();

        let mut p = Point::origin();
        t.apply_point(&mut p).unwrap();

        assert_abs_diff_eq!(Point::origin().distance(&p).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0);

    }

    #[test]
    fn orientation_products() {

        use Orientation::*;

        assert_eq!(Reflection.then(Reflection), Rotation);
        assert_eq!(Reflection.then(Rotation), Reflection);
        assert_eq!(Rotation.then(Rotation), Rotation);
        assert_eq!(Reflection.sign() * Reflection.sign(), 1);

    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(Transformation::new(Matrix::identity(2, 2), Permutation::identity(1)).is_err());
        assert!(Transformation::new(Matrix::identity(3, 4), Permutation::identity(1)).is_err());

        let mut bad = Permutation::identity(2);
        bad.set(1, 0).unwrap();
        assert!(Transformation::new(Matrix::identity(3, 3), bad).is_err());
    }

    #[test]
    fn compose_reports_mismatched_matrices() {

        let good = Transformation::identity(1);
        let mut bad = Transformation::identity(1);
        bad.matrix = Matrix::identity(2, 2);

        match good.compose(&bad) {
            Err(e) => match e.kind() {
                ErrorKind::Validation(_) => {},
                other => panic!("unexpected error {:?}", other)
            },
            Ok(_) => panic!("3x3 times 2x2 accepted")
        }

    }

}
