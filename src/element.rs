use crate::errors::*;
use crate::hyperline::HyperLine;
use crate::point::Point;
use crate::transformation::Transformation;

//////////////////////////////////////////////////////////////////////
// kinds of drawable primitives

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ElementKind {
    EuclidPolyline,
    EuclidPolygon,
    Circle,
    HyperbolicPolyline,
    HyperbolicPolygon
}

impl ElementKind {

    pub fn is_open(self) -> bool {
        match self {
            ElementKind::EuclidPolyline | ElementKind::HyperbolicPolyline => true,
            _ => false
        }
    }

    pub fn is_hyperbolic(self) -> bool {
        match self {
            ElementKind::HyperbolicPolyline | ElementKind::HyperbolicPolygon => true,
            _ => false
        }
    }

}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum LineStyle {
    Solid,
    Dots
}

//////////////////////////////////////////////////////////////////////
// element identity; scope 0 is the fundamental pattern, scope L+1
// holds the copies made for layer L

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct ElementId {
    pub scope: usize,
    pub serial: usize
}

#[derive(Debug, Clone)]
pub struct IdAllocator {
    scope: usize,
    next: usize
}

impl IdAllocator {

    pub fn scoped(scope: usize) -> Self {
        IdAllocator { scope: scope, next: 0 }
    }

    pub fn next_id(&mut self) -> ElementId {
        let id = ElementId { scope: self.scope, serial: self.next };
        self.next += 1;
        id
    }

    pub fn issued(&self) -> usize {
        self.next
    }

}

//////////////////////////////////////////////////////////////////////
// a primitive: ordered points plus styling. Points are kept in
// Weierstrass form so transformations apply directly; hyperbolic
// kinds cache one HyperLine per segment.

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    points: Vec<Point>,
    cid: usize,
    filled: bool,
    line_style: LineStyle,
    zorder: i32,
    id: ElementId,
    lines: Vec<HyperLine>
}

impl Element {

    pub fn new(kind: ElementKind, id: ElementId) -> Self {
        Element {
            kind: kind,
            points: Vec::new(),
            cid: 0,
            filled: false,
            line_style: LineStyle::Solid,
            zorder: 1,
            id: id,
            lines: Vec::new()
        }
    }

    pub fn kind(&self) -> ElementKind { self.kind }
    pub fn id(&self) -> ElementId { self.id }
    pub fn cid(&self) -> usize { self.cid }
    pub fn zorder(&self) -> i32 { self.zorder }
    pub fn line_style(&self) -> LineStyle { self.line_style }
    pub fn points(&self) -> &[Point] { &self.points }
    pub fn hyper_lines(&self) -> &[HyperLine] { &self.lines }

    // open figures never fill
    pub fn filled(&self) -> bool {
        !self.kind.is_open() && self.filled
    }

    pub fn set_cid(&mut self, cid: usize) { self.cid = cid; }
    pub fn set_filled(&mut self, filled: bool) { self.filled = filled; }
    pub fn set_line_style(&mut self, style: LineStyle) { self.line_style = style; }
    pub fn set_zorder(&mut self, z: i32) { self.zorder = z; }

    pub fn add_point(&mut self, p: Point) -> Result<()> {

        let p = p.to_weierstrass()?;

        self.points.push(p);

        if self.kind.is_hyperbolic() && self.points.len() >= 2 {
            self.rebuild_lines()?;
        }

        Ok(())

    }

    // copy with a new identity
    pub fn clone_with_id(&self, id: ElementId) -> Element {
        let mut e = self.clone();
        e.id = id;
        e
    }

    pub fn transform(&mut self, t: &Transformation) -> Result<()> {

        if self.kind.is_hyperbolic() && self.points.len() < 2 {
            bail!(ErrorKind::Config(format!(
                "cannot transform hyperbolic element {:?} with {:} point(s)",
                self.id, self.points.len())));
        }

        let cid = t.map_color(self.cid).chain_err(
            || format!("recoloring element {:?}", self.id))?;

        for p in self.points.iter_mut() {
            t.apply_point(p)?;
        }

        self.cid = cid;

        if self.kind.is_hyperbolic() {
            self.rebuild_lines()?;
        }

        Ok(())

    }

    pub fn poincare_points(&self) -> Result<Vec<(f64, f64)>> {
        self.points.iter()
            .map(|p| p.to_poincare().map(|q| (q.x, q.y)))
            .collect()
    }

    fn rebuild_lines(&mut self) -> Result<()> {

        let n = self.points.len();

        let mut lines = Vec::with_capacity(n);

        for i in 1..n {
            lines.push(HyperLine::new(&self.points[i-1], &self.points[i])?);
        }

        // closing edge for polygons
        if !self.kind.is_open() && n >= 3 {
            lines.push(HyperLine::new(&self.points[n-1], &self.points[0])?);
        }

        self.lines = lines;

        Ok(())

    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::matrix::Matrix;
    use crate::permutation::Permutation;
    use approx::assert_abs_diff_eq;

    fn triangle(kind: ElementKind) -> Element {

        let mut ids = IdAllocator::scoped(0);
        let mut e = Element::new(kind, ids.next_id());

        for &(x, y) in [(0.1, 0.0), (0.0, 0.3), (-0.2, -0.1)].iter() {
            e.add_point(Point::poincare(x, y)).unwrap();
        }

        e

    }

    #[test]
    fn allocator_hands_out_distinct_ids() {

        let mut ids = IdAllocator::scoped(4);

        let a = ids.next_id();
        let b = ids.next_id();

        assert_ne!(a, b);
        assert_eq!(a.scope, 4);
        assert_eq!(ids.issued(), 2);

    }

    #[test]
    fn polyline_is_never_filled() {

        let mut e = triangle(ElementKind::EuclidPolyline);
        e.set_filled(true);
        assert!(!e.filled());

        let mut g = triangle(ElementKind::EuclidPolygon);
        g.set_filled(true);
        assert!(g.filled());

    }

    #[test]
    fn hyperbolic_segments_follow_points() {

        let line = triangle(ElementKind::HyperbolicPolyline);
        assert_eq!(line.hyper_lines().len(), 2);

        let poly = triangle(ElementKind::HyperbolicPolygon);
        assert_eq!(poly.hyper_lines().len(), 3);

        let flat = triangle(ElementKind::EuclidPolygon);
        assert!(flat.hyper_lines().is_empty());

    }

    #[test]
    fn transform_moves_points_and_recolors() {

        let mut e = triangle(ElementKind::HyperbolicPolygon);
        e.set_cid(1);

        let before = e.poincare_points().unwrap();

        let t = Transformation::new(Matrix::rotation(std::f64::consts::PI),
                                    Permutation::from_vec(vec![2, 0, 1]).unwrap()).unwrap();

        e.transform(&t).unwrap();

        let after = e.poincare_points().unwrap();

        for (a, b) in before.iter().zip(after.iter()) {
            assert_abs_diff_eq!(a.0, -b.0, epsilon = 1e-12);
            assert_abs_diff_eq!(a.1, -b.1, epsilon = 1e-12);
        }

        assert_eq!(e.cid(), 0);
        assert_eq!(e.hyper_lines().len(), 3);
        assert_abs_diff_eq!(e.hyper_lines()[0].start.x, after[0].0, epsilon = 1e-12);

    }

    #[test]
    fn transform_rejects_out_of_range_color() {

        let mut e = triangle(ElementKind::Circle);
        e.set_cid(5);

        assert!(e.transform(&Transformation::identity(3)).is_err());

    }

    #[test]
    fn incomplete_hyperbolic_element_cannot_move() {

        let mut e = Element::new(ElementKind::HyperbolicPolyline, IdAllocator::scoped(0).next_id());
        e.add_point(Point::poincare(0.1, 0.1)).unwrap();

        match e.transform(&Transformation::identity(1)) {
            Err(err) => match err.kind() {
                ErrorKind::Config(_) => {},
                other => panic!("unexpected error {:?}", other)
            },
            Ok(()) => panic!("one-point hyperbolic line transformed")
        }

    }

    #[test]
    fn clone_with_id_keeps_geometry() {

        let e = triangle(ElementKind::EuclidPolygon);
        let id = ElementId { scope: 9, serial: 9 };
        let c = e.clone_with_id(id);

        assert_eq!(c.id(), id);
        assert_eq!(c.points(), e.points());

    }

}
