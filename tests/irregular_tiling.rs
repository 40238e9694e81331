//! Tilings by polygons with mixed vertex valences.

mod common;

use std::f64::consts::PI;

use approx::assert_relative_eq;

use hyperart::diagram::Tessellation;
use hyperart::errors::ErrorKind;
use hyperart::irregular::{solve_edge_ratio, IrregularPgon};
use hyperart::permutation::Permutation;
use hyperart::regular::regular_edge_ratio;
use hyperart::transformation::Orientation;

use common::{all_distinct, anchors, layer_counts, square};

// a point just inside the polygon along the bisector of vertex 0,
// which the generator puts at the origin
fn anchor(q: &[usize]) -> (f64, f64) {
    let x = solve_edge_ratio(q).map(|s| s.x).unwrap_or(0.5);
    let dir = PI - (x * (PI / q[0] as f64).cos()).asin();
    (0.08 * dir.cos(), 0.08 * dir.sin())
}

fn mixed(q: &[usize], layers: usize) -> IrregularPgon {

    let mut d = IrregularPgon::new();
    d.set_valences(q).unwrap();
    d.diagram_mut().set_num_layers(layers);

    let (cx, cy) = anchor(q);
    d.diagram_mut().add_fund_element(&square(cx, cy, 0.01, 0)).unwrap();

    d
}

#[test]
fn constant_valences_reproduce_regular_ratio() {

    for p in 3..9 {
        for q in 3..12 {

            if (p - 2) * (q - 2) <= 4 {
                assert!(solve_edge_ratio(&vec![q; p]).is_err());
                continue;
            }

            let sol = solve_edge_ratio(&vec![q; p]).unwrap();
            assert_relative_eq!(sol.x, regular_edge_ratio(p, q).unwrap(), epsilon = 1e-8);

        }
    }

}

#[test]
fn layers_of_a_scalene_triangle() {

    let mut d = mixed(&[6, 8, 10], 4);

    d.init().unwrap();
    d.make().unwrap();

    assert_eq!(layer_counts(&d), vec![1, 18, 68, 238]);
    assert!(all_distinct(&anchors(&d), 1e-9));

    // the triangle's angles sum to 2 pi (1/6 + 1/8 + 1/10)
    let sol = d.solution().unwrap();
    let total: f64 = [6.0, 8.0, 10.0].iter()
        .map(|q: &f64| (sol.x * (PI / q).cos()).asin())
        .sum();
    assert_relative_eq!(total, PI, epsilon = 1e-10);

}

#[test]
fn quadrilateral_and_pentagon_layers() {

    let cases: Vec<(Vec<usize>, usize, Vec<usize>)> = vec![
        (vec![4, 4, 6, 6], 4, vec![1, 12, 44, 152]),
        (vec![4, 6, 4, 6], 4, vec![1, 12, 48, 180]),
        (vec![4, 4, 6, 6, 4], 3, vec![1, 14, 84]),
    ];

    for (q, layers, want) in cases {

        let mut d = mixed(&q, layers);
        d.init().unwrap();
        d.make().unwrap();

        assert_eq!(layer_counts(&d), want, "{:?}", q);

    }

}

#[test]
fn rotated_pairs_swap_colors() {

    let mut d = IrregularPgon::new();
    d.diagram_mut().set_num_colors(2).unwrap();
    d.set_valences(&[8, 8, 8, 8]).unwrap();
    let (cx, cy) = anchor(&[8, 8, 8, 8]);
    d.diagram_mut().add_fund_element(&square(cx, cy, 0.01, 0)).unwrap();

    let swap = Permutation::from_vec(vec![1, 0]).unwrap();

    for &(i, j) in [(0, 2), (1, 3), (2, 0), (3, 1)].iter() {
        let e = d.diagram_mut().edge_mut(i).unwrap();
        e.adj = j;
        e.orient = Orientation::Rotation;
        e.perm = swap.clone();
    }

    d.init().unwrap();
    d.make().unwrap();

    assert_eq!(layer_counts(&d), vec![1, 24, 240]);
    assert!(all_distinct(&anchors(&d), 1e-9));

    let layer1 = &d.layers()[1];
    let ones = layer1.elements().filter(|e| e.cid() == 1).count();
    assert!(ones > 0 && ones < layer1.len());

}

#[test]
fn inconsistent_gluings_fail_init() {

    // mirrors around a vertex of odd valence flip the tile
    let mut odd = mixed(&[3, 4, 5, 6], 3);
    assert!(odd.init().is_err());

    // rotation onto an edge with the valences the wrong way round
    let mut d = mixed(&[4, 6, 4, 6], 3);
    for &(i, j) in [(0, 2), (2, 0)].iter() {
        let e = d.diagram_mut().edge_mut(i).unwrap();
        e.adj = j;
        e.orient = Orientation::Rotation;
    }

    match d.init() {
        Err(e) => match e.kind() {
            ErrorKind::Config(_) => {},
            other => panic!("unexpected error {:?}", other)
        },
        Ok(()) => panic!("accepted")
    }

}

#[test]
fn non_hyperbolic_valences_fail_init() {

    for q in [vec![4, 4, 4, 4], vec![3, 6, 6, 3], vec![3, 3, 3], vec![4, 6, 12]].iter() {

        let mut d = mixed(q, 2);

        assert!(d.init().is_err(), "{:?}", q);
        assert!(d.make().is_err());

    }

}

#[test]
fn failed_reinit_keeps_layers() {

    let mut d = mixed(&[6, 8, 10], 3);
    d.init().unwrap();
    d.make().unwrap();

    let before = d.layers().to_vec();

    d.set_valences(&[4, 4, 4, 4]).unwrap();
    assert!(d.init().is_err());

    assert_eq!(d.layers(), &before[..]);

    // the old edge table is still usable
    d.make().unwrap();
    assert_eq!(d.layers(), &before[..]);

}
