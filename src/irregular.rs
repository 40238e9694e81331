use std::f64::consts::PI;

use tracing::{debug, info};

use crate::diagram::{Diagram, DiagramType, Tessellation};
use crate::element::IdAllocator;
use crate::errors::*;
use crate::pattern::Pattern;
use crate::tiling::{expand, EdgeTable, PolygonGeometry};

//////////////////////////////////////////////////////////////////////
// Newton-Raphson solve for the edge ratio x of a polygon with
// per-vertex valences q: sum_i asin(x cos(pi/q_i)) = pi

const NEWTON_TOL: f64 = 1e-10;
const NEWTON_MAX_ITER: usize = 100;
const EXTRA_ITER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSolution {
    pub x: f64,
    pub iterations: usize,
    pub cosh_half_e: f64,
    pub sinh_half_e: f64,
    pub cosh_e: f64,
    pub sinh_e: f64
}

// angle defect in units of pi: positive iff the polygon is hyperbolic
pub fn angle_defect(q: &[usize]) -> f64 {
    q.iter().map(|&qi| 0.5 - 1.0 / qi as f64).sum::<f64>() - 1.0
}

pub fn solve_edge_ratio(q: &[usize]) -> Result<NewtonSolution> {

    let p = q.len();

    if p < 3 {
        bail!(ErrorKind::Config(format!("polygon needs at least 3 vertices, got {:}", p)));
    }

    if let Some(k) = q.iter().position(|&qi| qi < 3) {
        bail!(ErrorKind::Config(format!("vertex {:} has valence {:}, need at least 3", k, q[k])));
    }

    if angle_defect(q) <= 1e-12 {
        bail!(ErrorKind::Config(format!("valences {:?} do not tile the hyperbolic plane", q)));
    }

    let cos_p: Vec<f64> = q.iter().map(|&qi| (PI / qi as f64).cos()).collect();

    let f = |x: f64| cos_p.iter().map(|c| (x*c).asin()).sum::<f64>() - PI;
    let fprime = |x: f64| cos_p.iter().map(|c| c / (1.0 - (x*c)*(x*c)).sqrt()).sum::<f64>();

    // F is increasing with F(0) < 0 < F(1); keep a bracket so a wild
    // step (or a seed past 1) falls back to bisection
    let (mut lo, mut hi) = (0.0, 1.0);

    let avg_q = q.iter().sum::<usize>() as f64 / p as f64 + 1.0;
    let mut x = (PI / p as f64).sin() / (PI / avg_q).cos();

    if !(x > lo && x < hi) {
        x = 0.5 * (lo + hi);
    }

    let step = |x: f64, lo: &mut f64, hi: &mut f64| -> Result<f64> {

        let fx = f(x);
        let dfx = fprime(x);

        if !dfx.is_finite() || dfx.abs() < 1e-14 {
            return Err(domain(format!("Newton derivative vanished at x = {:}", x)));
        }

        if fx == 0.0 {
            return Ok(x);
        }

        if fx < 0.0 { *lo = x; } else { *hi = x; }

        let next = x - fx / dfx;

        // only a real overshoot bisects
        Ok(if next >= *lo && next <= *hi { next } else { 0.5 * (*lo + *hi) })

    };

    let mut iterations = 0;

    loop {

        if iterations >= NEWTON_MAX_ITER {
            return Err(domain(format!(
                "Newton solve for {:?} did not converge in {:} iterations", q, NEWTON_MAX_ITER)));
        }

        let next = step(x, &mut lo, &mut hi)?;
        iterations += 1;

        let done = (next - x).abs() <= NEWTON_TOL;
        x = next;

        if done {
            break;
        }

    }

    // two refinement passes past convergence
    for _ in 0..EXTRA_ITER {
        x = step(x, &mut lo, &mut hi)?;
        iterations += 1;
    }

    if !(x > 0.0 && x < 1.0) {
        return Err(domain(format!("edge ratio {:} outside (0, 1)", x)));
    }

    let cosh_half_e = 1.0 / x;
    let sinh_half_e = (cosh_half_e*cosh_half_e - 1.0).sqrt();

    Ok(NewtonSolution {
        x: x,
        iterations: iterations,
        cosh_half_e: cosh_half_e,
        sinh_half_e: sinh_half_e,
        cosh_e: 2.0*cosh_half_e*cosh_half_e - 1.0,
        sinh_e: 2.0*cosh_half_e*sinh_half_e
    })

}

//////////////////////////////////////////////////////////////////////
// tiling by a polygon whose vertices may have different valences;
// the motif is drawn with polygon vertex 0 at the disk center

#[derive(Debug, Clone, Default)]
pub struct IrregularPgon {
    diagram: Diagram,
    q: Vec<usize>,
    solution: Option<NewtonSolution>,
    table: Option<EdgeTable>,
    pgon_pat: Option<Pattern>
}

impl IrregularPgon {

    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_p(&mut self, p: usize) -> Result<()> {
        self.diagram.set_p(p)?;
        self.q.resize(p, 0);
        Ok(())
    }

    pub fn q(&self) -> &[usize] {
        &self.q
    }

    pub fn set_q(&mut self, vertex: usize, val: usize) -> Result<()> {

        let p = self.q.len();

        match self.q.get_mut(vertex) {
            Some(slot) => { *slot = val; Ok(()) },
            None => Err(config(format!("vertex {:} out of range for a {:}-gon", vertex, p)))
        }

    }

    // sets p from the list length
    pub fn set_valences(&mut self, q: &[usize]) -> Result<()> {
        self.set_p(q.len())?;
        self.q.copy_from_slice(q);
        Ok(())
    }

    pub fn solution(&self) -> Option<&NewtonSolution> {
        self.solution.as_ref()
    }

    pub fn edge_table(&self) -> Option<&EdgeTable> {
        self.table.as_ref()
    }

    // fundamental pattern plus the polygon outline as its frame
    pub fn pgon_pat(&self) -> Option<&Pattern> {
        self.pgon_pat.as_ref()
    }

    fn init_frame(&self, geom: &PolygonGeometry) -> Result<Pattern> {

        let mut ids = IdAllocator::scoped(usize::MAX);
        let mut pat = Pattern::new();

        pat.add_pattern(self.diagram.fund_pat(), None, &mut ids, false)?;

        let outline = geom.outline(&mut ids)?;
        pat.add_element(&outline, None, &mut ids, false, true)?;

        Ok(pat)

    }

}

impl Tessellation for IrregularPgon {

    fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    fn kind(&self) -> DiagramType {
        DiagramType::IrregularPgon
    }

    fn init(&mut self) -> Result<()> {

        self.diagram.validate()?;

        if self.q.len() != self.diagram.p() {
            bail!(ErrorKind::Config(format!(
                "{:} valences for a {:}-gon", self.q.len(), self.diagram.p())));
        }

        let solution = solve_edge_ratio(&self.q)?;

        debug!("edge ratio x = {:} after {:} iterations (cosh E = {:})",
               solution.x, solution.iterations, solution.cosh_e);

        let geom = PolygonGeometry::new(&self.q, solution.x, true)?;

        let table = EdgeTable::build(geom, self.diagram.edges(), self.diagram.num_colors())?;
        table.check_vertex_cycles(true)?;

        let pgon_pat = self.init_frame(table.geometry())?;

        self.solution = Some(solution);
        self.table = Some(table);
        self.pgon_pat = Some(pgon_pat);

        Ok(())

    }

    fn make(&mut self) -> Result<()> {

        let (table, pgon_pat) = match (&self.table, &self.pgon_pat) {
            (Some(t), Some(pat)) => (t, pat),
            _ => bail!(ErrorKind::Config("make called before init".to_string()))
        };

        let layers = expand(table, pgon_pat,
                            self.diagram.num_layers(),
                            self.diagram.max_elements())?;

        info!("irregular {:?}: {:} layers, {:} elements",
              self.q, layers.len(), layers.iter().map(|l| l.len()).sum::<usize>());

        self.diagram.commit_layers(layers);

        Ok(())

    }

    fn clear(&mut self) {
        self.solution = None;
        self.table = None;
        self.pgon_pat = None;
        self.diagram.clear_layers();
    }

}
