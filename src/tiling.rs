use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::edge::{check_edges, PgonEdge};
use crate::element::{Element, ElementKind, IdAllocator};
use crate::errors::*;
use crate::matrix::Matrix;
use crate::pattern::Pattern;
use crate::point::Point;
use crate::transformation::{Orientation, Transformation};

//////////////////////////////////////////////////////////////////////
// geometry of the fundamental polygon: a tangential polygon whose
// incircle is centered at the origin, vertex k having interior
// angle 2 pi / q[k]. Edge k touches the incircle at angle phi[k]
// and runs from vertex k to vertex k+1, counter-clockwise.
//
// x is the edge ratio shared by both generators: sin(beta[k]) =
// x cos(pi / q[k]) where beta[k] is half the central angle between
// the tangent points of the edges meeting at vertex k, and
// cosh(inradius) = 1/x.

const CLOSURE_TOL: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct PolygonGeometry {
    pub q: Vec<usize>,
    pub x: f64,
    pub cosh_e: f64,
    pub sinh_e: f64,
    pub beta: Vec<f64>,
    pub phi: Vec<f64>,
    move_to: Matrix,
    move_inv: Matrix
}

impl PolygonGeometry {

    // vertex_at_center moves vertex 0 to the origin
    pub fn new(q: &[usize], x: f64, vertex_at_center: bool) -> Result<Self> {

        let p = q.len();

        if p < 3 {
            bail!(ErrorKind::Config(format!("polygon needs at least 3 edges, got {:}", p)));
        }

        if !(x > 0.0 && x < 1.0) {
            return Err(domain(format!("edge ratio {:} outside (0, 1)", x)));
        }

        let beta: Vec<f64> = q.iter()
            .map(|&qi| (x * (PI / qi as f64).cos()).asin())
            .collect();

        let mut phi = vec![0.0; p];
        for k in 1..p {
            phi[k] = phi[k-1] + 2.0*beta[k];
        }

        let cosh_half_e = 1.0 / x;
        let sinh_half_e = (cosh_half_e*cosh_half_e - 1.0).sqrt();

        let mut geom = PolygonGeometry {
            q: q.to_vec(),
            x: x,
            cosh_e: 2.0*cosh_half_e*cosh_half_e - 1.0,
            sinh_e: 2.0*cosh_half_e*sinh_half_e,
            beta: beta,
            phi: phi,
            move_to: Matrix::identity(3, 3),
            move_inv: Matrix::identity(3, 3)
        };

        if vertex_at_center {
            let d0 = geom.vertex_distance(0);
            let b0 = geom.beta[0];
            geom.move_to = &(&Matrix::rotation(-b0) * &Matrix::x_translation(-d0)) * &Matrix::rotation(b0);
            geom.move_inv = &(&Matrix::rotation(-b0) * &Matrix::x_translation(d0)) * &Matrix::rotation(b0);
        }

        Ok(geom)

    }

    pub fn p(&self) -> usize {
        self.q.len()
    }

    pub fn inradius(&self) -> f64 {
        (1.0 / self.x).acosh()
    }

    // distance from the incircle center to vertex k
    pub fn vertex_distance(&self, k: usize) -> f64 {
        let t = self.beta[k].tan() * (PI / self.q[k] as f64).tan();
        (1.0 / t).acosh()
    }

    // reflection across edge 0 (tangent point on the +x axis)
    pub fn reflect_edge(&self) -> Matrix {
        Matrix::from_rows3([
            [-self.cosh_e, 0.0, self.sinh_e],
            [0.0, 1.0, 0.0],
            [-self.sinh_e, 0.0, self.cosh_e]
        ])
    }

    // reflection across the x axis, which bisects edge 0
    pub fn reflect_edge_bisector(&self) -> Matrix {
        Matrix::x_reflection()
    }

    // half turn about the tangent point of edge 0
    pub fn rotate_edge(&self) -> Matrix {
        &self.reflect_edge() * &self.reflect_edge_bisector()
    }

    // where the motif frame puts the incircle center
    pub fn center(&self) -> Point {
        let [x, y, w] = self.move_to.apply3([0.0, 0.0, 1.0]);
        Point::weierstrass(x, y, w)
    }

    pub fn vertices(&self) -> Vec<Point> {

        (0..self.p()).map(|k| {
            let d = self.vertex_distance(k);
            let ang = self.phi[k] - self.beta[k];
            let v = (&Matrix::rotation(ang) * &Matrix::x_translation(d)).apply3([0.0, 0.0, 1.0]);
            let [x, y, w] = self.move_to.apply3(v);
            Point::weierstrass(x, y, w)
        }).collect()

    }

    // hyperbolic polygon through the vertices, for frame overlays
    pub fn outline(&self, ids: &mut IdAllocator) -> Result<Element> {

        let mut e = Element::new(ElementKind::HyperbolicPolygon, ids.next_id());

        for v in self.vertices() {
            e.add_point(v)?;
        }

        Ok(e)

    }

}

//////////////////////////////////////////////////////////////////////
// one transformation per polygon edge carrying the fundamental tile
// across that edge; tiles are addressed relative to the edge they
// were entered through (p_pos) and their handedness (orient)

#[derive(Debug, Clone)]
pub struct EdgeTable {
    geom: PolygonGeometry,
    tran: Vec<Transformation>,
    num_colors: usize
}

impl EdgeTable {

    pub fn build(geom: PolygonGeometry, edges: &[PgonEdge], num_colors: usize) -> Result<Self> {

        let p = geom.p();

        if edges.len() != p {
            bail!(ErrorKind::Config(format!(
                "{:} edge records for a {:}-gon", edges.len(), p)));
        }

        check_edges(edges, num_colors)?;

        // a glued edge must join vertices of equal valence
        for (i, e) in edges.iter().enumerate() {

            let j = e.adj;
            let (qi0, qi1) = (geom.q[i], geom.q[(i+1) % p]);
            let (qj0, qj1) = (geom.q[j], geom.q[(j+1) % p]);

            let ok = match e.orient {
                Orientation::Reflection => qi0 == qj0 && qi1 == qj1,
                Orientation::Rotation => qi0 == qj1 && qi1 == qj0
            };

            if !ok {
                bail!(ErrorKind::Config(format!(
                    "edge {:} (valences {:}, {:}) cannot be glued to edge {:} (valences {:}, {:}) by {:?}",
                    i, qi0, qi1, j, qj0, qj1, e.orient)));
            }

        }

        let reflect = geom.reflect_edge();
        let rotate = geom.rotate_edge();

        let mut tran = Vec::with_capacity(p);

        for (i, e) in edges.iter().enumerate() {

            let j = e.adj;

            let glue = match e.orient {
                Orientation::Reflection => &reflect,
                Orientation::Rotation => &rotate
            };

            // bring edge j to the +x axis, glue, then carry it to edge i
            let m = &geom.move_to * &Matrix::rotation(geom.phi[i]);
            let m = &m * glue;
            let m = &m * &Matrix::rotation(-geom.phi[j]);
            let m = &m * &geom.move_inv;

            let mut t = Transformation::new(m, e.perm.clone())?;
            t.p_pos = j;
            t.orient = edges[j].orient;

            tran.push(t);

        }

        Ok(EdgeTable { geom: geom, tran: tran, num_colors: num_colors })

    }

    pub fn p(&self) -> usize {
        self.geom.p()
    }

    pub fn geometry(&self) -> &PolygonGeometry {
        &self.geom
    }

    pub fn edge_tran(&self, i: usize) -> &Transformation {
        &self.tran[i]
    }

    pub fn identity(&self) -> Transformation {
        Transformation::identity(self.num_colors)
    }

    // the neighbor of tile t across its shift-th edge, counted from
    // the edge t was entered through in t's own sense of rotation
    pub fn shift_tran(&self, t: &Transformation, shift: i64) -> Result<Transformation> {

        let p = self.p() as i64;
        let k = (t.p_pos as i64 + t.orient.sign()*shift).rem_euclid(p) as usize;

        let e = &self.tran[k];

        let mut rval = t.compose(e)?;
        rval.p_pos = e.p_pos;
        rval.orient = t.orient.then(e.orient);

        Ok(rval)

    }

    // valence at tile t's k-th vertex, counted like shift_tran; the
    // k-th vertex starts the k-th edge
    pub fn valence_at(&self, t: &Transformation, k: i64) -> usize {

        let p = self.p() as i64;

        let offset = match t.orient {
            Orientation::Reflection => 1,
            Orientation::Rotation => 0
        };

        let idx = (t.p_pos as i64 + t.orient.sign()*k + offset).rem_euclid(p);

        self.geom.q[idx as usize]

    }

    // walking the tiles around each vertex must come back to the
    // fundamental tile: exactly (exact) or as a set of points
    pub fn check_vertex_cycles(&self, exact: bool) -> Result<()> {

        let t0 = self.identity();
        let ident = Matrix::identity(3, 3);
        let center = self.geom.center();

        for m in 0..self.p() {

            let q = self.valence_at(&t0, m as i64);

            let mut t = self.shift_tran(&t0, m as i64 - 1)?;
            for _ in 1..q {
                t = self.shift_tran(&t, -1)?;
            }

            if exact {

                let err = t.matrix.max_abs_diff(&ident);

                if err > CLOSURE_TOL {
                    bail!(ErrorKind::Config(format!(
                        "tiles around vertex {:} (valence {:}) do not close up (error {:e})",
                        m, q, err)));
                }

                if t.perm != t0.perm {
                    warn!("colors around vertex {:} do not close up: {:?}", m, t.perm.as_slice());
                }

            } else {

                let mut c = center;
                t.apply_point(&mut c)?;

                let err = c.distance(&center)?;

                if err > CLOSURE_TOL {
                    bail!(ErrorKind::Config(format!(
                        "tiles around vertex {:} (valence {:}) overlap (offset {:e})",
                        m, q, err)));
                }

            }

        }

        Ok(())

    }

}

//////////////////////////////////////////////////////////////////////
// recursive layer expansion
//
// layer 0 is the fundamental tile; layer L+1 holds every tile that
// touches layer L at a vertex and is not already placed. Each tile
// of layer L+1 is generated exactly once: a tile shares its first
// few vertices (counted from the edge it was entered through) with
// the inner region and owns the rest; around each owned vertex it
// spawns the new tiles, minus those its same-layer neighbors spawn.

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Exposure {
    // one vertex shared with the inner region
    Max,
    // a full edge shared with the inner region
    Min,
    // wedged between two inner tiles at a valence-3 vertex
    Wedged
}

impl Exposure {

    fn shared(self) -> i64 {
        match self {
            Exposure::Max => 1,
            Exposure::Min => 2,
            Exposure::Wedged => 3
        }
    }

}

struct Expansion<'a> {
    table: &'a EdgeTable,
    motif: &'a Pattern,
    num_layers: usize,
    limit: usize,
    generated: usize,
    tiles: Vec<usize>,
    layers: Vec<Pattern>,
    ids: Vec<IdAllocator>
}

pub fn expand(table: &EdgeTable,
              motif: &Pattern,
              num_layers: usize,
              limit: usize) -> Result<Vec<Pattern>> {

    if num_layers == 0 {
        bail!(ErrorKind::Config("layer count must be at least 1".to_string()));
    }

    let mut ex = Expansion {
        table: table,
        motif: motif,
        num_layers: num_layers,
        limit: limit,
        generated: 0,
        tiles: vec![0; num_layers],
        layers: vec![Pattern::new(); num_layers],
        ids: (0..num_layers).map(|l| IdAllocator::scoped(l + 1)).collect()
    };

    let t0 = table.identity();

    ex.place(&t0, 0)?;

    if num_layers > 1 {

        for m in 0..table.p() {
            let start = table.shift_tran(&t0, m as i64 - 1)?;
            let count = table.valence_at(&t0, m as i64) as i64 - 2;
            ex.walk(start, count, Exposure::Min, 1)?;
        }

    }

    debug!("tiles per layer: {:?}", ex.tiles);

    Ok(ex.layers)

}

impl<'a> Expansion<'a> {

    fn owns_nothing(&self, exposure: Exposure) -> bool {
        exposure.shared() + 1 > self.table.p() as i64 - 1
    }

    fn place(&mut self, t: &Transformation, layer: usize) -> Result<()> {

        self.generated += self.motif.len();

        if self.generated > self.limit {
            bail!(ErrorKind::ResourceExhausted(self.limit));
        }

        self.layers[layer].add_pattern(self.motif, Some(t), &mut self.ids[layer], false)?;
        self.tiles[layer] += 1;

        Ok(())

    }

    // count tiles around a vertex, starting at t and stepping
    // clockwise in t's frame
    fn walk(&mut self,
            mut t: Transformation,
            count: i64,
            first: Exposure,
            layer: usize) -> Result<()> {

        for j in 0..count {

            let exposure = if j == 0 { first } else { Exposure::Max };

            // three tiles of this layer meet at the leading vertex
            // when the first tile had nothing of its own
            let lead = if j == 1 && self.owns_nothing(first) { 3 } else { 2 };

            let trail = if j == count - 1 && self.owns_nothing(Exposure::Min) { 3 } else { 2 };

            self.grow(&t, exposure, lead, trail, layer)?;

            if j + 1 < count {
                t = self.table.shift_tran(&t, -1)?;
            }

        }

        Ok(())

    }

    fn grow(&mut self,
            t: &Transformation,
            exposure: Exposure,
            lead: i64,
            trail: i64,
            layer: usize) -> Result<()> {

        self.place(t, layer)?;

        if layer + 1 >= self.num_layers {
            return Ok(());
        }

        let p = self.table.p() as i64;
        let r = exposure.shared();
        let last = p - 1;

        for m in (r + 1)..=last {

            let q = self.table.valence_at(t, m) as i64;

            let count = if m == last { q - trail - 1 } else { q - 2 };

            let first = if m == r + 1 && self.table.valence_at(t, r) as i64 - lead == 1 {
                Exposure::Wedged
            } else {
                Exposure::Min
            };

            let start = self.table.shift_tran(t, m - 1)?;

            self.walk(start, count, first, layer + 1)?;

        }

        Ok(())

    }

}
