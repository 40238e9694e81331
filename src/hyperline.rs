use crate::errors::*;
use crate::point::{weierstrass_cross_product, Point};

//////////////////////////////////////////////////////////////////////
// arc parameters for drawing the geodesic between two points of the
// Poincare disk: a circle orthogonal to the unit circle, or a plain
// segment when the geodesic passes (nearly) through the center

const FLAT_W: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct HyperLine {

    // endpoints, Poincare form
    pub start: Point,
    pub end: Point,

    pub center: (f64, f64),
    pub radius: f64,

    // bounding box of the full circle
    pub top_left: (f64, f64),
    pub width: f64,
    pub height: f64,

    // degrees
    pub start_angle: f64,
    pub end_angle: f64,

    pub draw_arc: bool

}

impl HyperLine {

    pub fn new(p1: &Point, p2: &Point) -> Result<HyperLine> {

        let start = p1.to_poincare()?;
        let end = p2.to_poincare()?;

        let a = weierstrass_cross_product(&p1.to_weierstrass()?, &p2.to_weierstrass()?)?;

        let mut hline = HyperLine {
            start: start,
            end: end,
            center: (0.0, 0.0),
            radius: 0.0,
            top_left: (0.0, 0.0),
            width: 0.0,
            height: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            draw_arc: false
        };

        // too flat, draw it straight
        if a.w.abs() < FLAT_W {
            return Ok(hline);
        }

        let xc = a.x / a.w;
        let yc = a.y / a.w;

        let (u1, v1) = (start.x - xc, start.y - yc);
        let (u2, v2) = (end.x - xc, end.y - yc);

        let r = u1.hypot(v1);

        // signed sweep from start to end, counter-clockwise positive
        let theta = (v2*u1 - v1*u2).atan2(u1*u2 + v1*v2);

        hline.draw_arc = true;
        hline.center = (xc, yc);
        hline.radius = r;
        hline.top_left = (xc - r, yc + r);
        hline.width = 2.0 * r;
        hline.height = 2.0 * r;
        hline.start_angle = v1.atan2(u1).to_degrees();
        hline.end_angle = theta.to_degrees();

        Ok(hline)

    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn diameter_is_drawn_straight() {

        let pairs = [
            ((0.2, 0.2), (-0.3, -0.3)),
            ((0.0, 0.0), (0.5, 0.1)),
            ((0.0, -0.4), (0.0, 0.7)),
        ];

        for &(a, b) in pairs.iter() {
            let h = HyperLine::new(&Point::poincare(a.0, a.1), &Point::poincare(b.0, b.1)).unwrap();
            assert!(!h.draw_arc);
        }

    }

    #[test]
    fn tiny_cross_w_is_drawn_straight() {

        // just off a diameter
        let h = HyperLine::new(&Point::poincare(0.3, 0.3),
                               &Point::poincare(-0.3, -0.3 + 1e-8)).unwrap();

        assert!(!h.draw_arc);

    }

    #[test]
    fn arc_circle_is_orthogonal_to_boundary() {

        let p1 = Point::poincare(0.3, 0.1);
        let p2 = Point::poincare(-0.2, 0.5);

        let h = HyperLine::new(&p1, &p2).unwrap();

        assert!(h.draw_arc);

        let (xc, yc) = h.center;
        let r = h.radius;

        // both endpoints on the circle
        assert_abs_diff_eq!((p2.x - xc).hypot(p2.y - yc), r, epsilon = 1e-9);

        // |c|^2 = 1 + r^2
        assert_abs_diff_eq!(xc*xc + yc*yc, 1.0 + r*r, epsilon = 1e-9);

        assert_abs_diff_eq!(h.width, 2.0 * r);
        assert_abs_diff_eq!(h.top_left.0, xc - r);
        assert_abs_diff_eq!(h.top_left.1, yc + r);

    }

    #[test]
    fn sweep_reverses_with_endpoints() {

        let p1 = Point::poincare(0.3, 0.1);
        let p2 = Point::poincare(-0.2, 0.5);

        let fwd = HyperLine::new(&p1, &p2).unwrap();
        let back = HyperLine::new(&p2, &p1).unwrap();

        assert_abs_diff_eq!(fwd.end_angle, -back.end_angle, epsilon = 1e-9);
        assert!(fwd.end_angle.abs() < 180.0);

    }

    #[test]
    fn accepts_weierstrass_endpoints() {

        let p1 = Point::poincare(0.3, 0.1);
        let p2 = Point::poincare(-0.2, 0.5);

        let a = HyperLine::new(&p1, &p2).unwrap();
        let b = HyperLine::new(&p1.to_weierstrass().unwrap(), &p2.to_weierstrass().unwrap()).unwrap();

        assert_abs_diff_eq!(a.center.0, b.center.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b.start.x, 0.3, epsilon = 1e-12);

    }

}
