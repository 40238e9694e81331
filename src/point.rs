use crate::errors::*;
use crate::matrix::Matrix;

//////////////////////////////////////////////////////////////////////
// a point of the hyperbolic plane, either in the Poincare disk
// (x, y) or on the Weierstrass hyperboloid (x, y, w)

pub const EPSILON: f64 = 1e-12;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CoordSystem {
    Unset,
    Poincare,
    Weierstrass
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    sys: CoordSystem
}

impl Default for Point {
    fn default() -> Self {
        Point { x: 0.0, y: 0.0, w: 0.0, sys: CoordSystem::Unset }
    }
}

impl Point {

    pub fn poincare(x: f64, y: f64) -> Self {
        Point { x: x, y: y, w: 0.0, sys: CoordSystem::Poincare }
    }

    pub fn weierstrass(x: f64, y: f64, w: f64) -> Self {
        Point { x: x, y: y, w: w, sys: CoordSystem::Weierstrass }
    }

    // the hyperboloid point at the center of the disk
    pub fn origin() -> Self {
        Point::weierstrass(0.0, 0.0, 1.0)
    }

    pub fn sys(&self) -> CoordSystem {
        self.sys
    }

    pub fn poincare_to_weierstrass(&mut self) -> Result<()> {

        match self.sys {
            CoordSystem::Weierstrass => return Ok(()),
            CoordSystem::Unset => {
                return Err(validation("poincare_to_weierstrass: point is not in poincare form"));
            },
            CoordSystem::Poincare => {}
        }

        let s = self.x*self.x + self.y*self.y;

        // on (or past) the boundary circle there is no hyperboloid point
        if 1.0 - s < EPSILON {
            return Err(domain(format!(
                "poincare_to_weierstrass: ({:}, {:}) is not inside the unit disk",
                self.x, self.y)));
        }

        let denom = 1.0 - s;

        self.x = 2.0 * self.x / denom;
        self.y = 2.0 * self.y / denom;
        self.w = (1.0 + s) / denom;
        self.sys = CoordSystem::Weierstrass;

        Ok(())

    }

    pub fn weierstrass_to_poincare(&mut self) -> Result<()> {

        match self.sys {
            CoordSystem::Poincare => return Ok(()),
            CoordSystem::Unset => {
                return Err(validation("weierstrass_to_poincare: point is not in weierstrass form"));
            },
            CoordSystem::Weierstrass => {}
        }

        // w >= 1 on the upper sheet, so this only trips on garbage input
        let denom = 1.0 + self.w;

        if denom.abs() < EPSILON {
            return Err(domain(format!(
                "weierstrass_to_poincare: w = {:} has no disk image", self.w)));
        }

        self.x /= denom;
        self.y /= denom;
        self.w = 0.0;
        self.sys = CoordSystem::Poincare;

        Ok(())

    }

    // copies in each form, leaving self alone
    pub fn to_weierstrass(&self) -> Result<Point> {
        let mut p = *self;
        p.poincare_to_weierstrass()?;
        Ok(p)
    }

    pub fn to_poincare(&self) -> Result<Point> {
        let mut p = *self;
        p.weierstrass_to_poincare()?;
        Ok(p)
    }

    // apply a 3x3 motion; every coordinate is computed from the
    // pre-transform values
    pub fn transform(&mut self, m: &Matrix) -> Result<()> {

        if self.sys != CoordSystem::Weierstrass {
            return Err(validation("transform: point is not in weierstrass form"));
        }

        let [x, y, w] = m.apply3([self.x, self.y, self.w]);

        self.x = x;
        self.y = y;
        self.w = w;

        Ok(())

    }

    // hyperbolic distance between two weierstrass points
    pub fn distance(&self, other: &Point) -> Result<f64> {

        if self.sys != CoordSystem::Weierstrass || other.sys != CoordSystem::Weierstrass {
            return Err(validation("distance: both points should be weierstrass points"));
        }

        let b = self.w*other.w - self.x*other.x - self.y*other.y;

        Ok(b.max(1.0).acosh())

    }

}

//////////////////////////////////////////////////////////////////////
// Minkowski analogue of the cross product, normalized; the result is
// the pole of the geodesic through p1 and p2

pub fn weierstrass_cross_product(p1: &Point, p2: &Point) -> Result<Point> {

    if p1.sys != CoordSystem::Weierstrass || p2.sys != CoordSystem::Weierstrass {
        return Err(validation("weierstrass_cross_product: both points should be weierstrass points"));
    }

    let x = p1.y*p2.w - p1.w*p2.y;
    let y = p1.w*p2.x - p1.x*p2.w;
    let w = -p1.x*p2.y + p1.y*p2.x;

    let norm2 = x*x + y*y - w*w;

    if norm2 < EPSILON {
        return Err(domain("weierstrass_cross_product: points coincide"));
    }

    let norm = norm2.sqrt();

    Ok(Point::weierstrass(x / norm, y / norm, w / norm))

}
