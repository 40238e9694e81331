//! Helpers shared by the tiling integration tests.

#![allow(dead_code)]

use hyperart::diagram::Tessellation;
use hyperart::element::{Element, ElementKind, IdAllocator};
use hyperart::point::Point;

/// Small filled hyperbolic square centered at (cx, cy).
pub fn square(cx: f64, cy: f64, half: f64, cid: usize) -> Element {

    let mut ids = IdAllocator::scoped(0);
    let mut e = Element::new(ElementKind::HyperbolicPolygon, ids.next_id());

    for &(dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].iter() {
        e.add_point(Point::poincare(cx + dx*half, cy + dy*half)).unwrap();
    }

    e.set_cid(cid);
    e.set_filled(true);

    e
}

pub fn layer_counts(t: &dyn Tessellation) -> Vec<usize> {
    t.layers().iter().map(|l| l.len()).collect()
}

/// Poincare position of the first point of every element, all layers.
pub fn anchors(t: &dyn Tessellation) -> Vec<(f64, f64)> {
    t.layers().iter()
        .flat_map(|l| l.elements())
        .map(|e| e.poincare_points().unwrap()[0])
        .collect()
}

pub fn all_distinct(pts: &[(f64, f64)], tol: f64) -> bool {
    for (i, a) in pts.iter().enumerate() {
        for b in pts[i+1..].iter() {
            if (a.0 - b.0).hypot(a.1 - b.1) < tol {
                return false;
            }
        }
    }
    true
}
