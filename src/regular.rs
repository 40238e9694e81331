use std::f64::consts::PI;

use tracing::{debug, info};

use crate::diagram::{Diagram, DiagramType, Tessellation};
use crate::element::IdAllocator;
use crate::errors::*;
use crate::matrix::Matrix;
use crate::pattern::Pattern;
use crate::permutation::Permutation;
use crate::tiling::{expand, EdgeTable, PolygonGeometry};
use crate::transformation::Transformation;

//////////////////////////////////////////////////////////////////////
// symmetry of the fundamental region inside the polygon

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReflSym {
    None,
    // mirror through the midpoint of edge 0
    EdgeBisector,
    // mirror through vertex 1
    PgonRadius
}

impl Default for ReflSym {
    fn default() -> Self {
        ReflSym::None
    }
}

// closed-form edge ratio of the {p, q} tiling
pub fn regular_edge_ratio(p: usize, q: usize) -> Result<f64> {

    if p < 3 || q < 3 {
        bail!(ErrorKind::Config(format!("{{{:}, {:}}} needs p, q >= 3", p, q)));
    }

    if (p - 2) * (q - 2) <= 4 {
        bail!(ErrorKind::Config(format!(
            "{{{:}, {:}}} does not tile the hyperbolic plane", p, q)));
    }

    Ok((PI / p as f64).sin() / (PI / q as f64).cos())

}

//////////////////////////////////////////////////////////////////////
// {p, q} tiling: every vertex has valence q and the fundamental
// region may cover a fraction of the polygon

#[derive(Debug, Clone)]
pub struct RegularPgon {
    diagram: Diagram,
    q: usize,
    refl_sym: ReflSym,
    rotn_perm: Permutation,
    refl_perm: Permutation,
    fund_reg_edges: Option<usize>,
    table: Option<EdgeTable>,
    pgon_pat: Option<Pattern>
}

impl Default for RegularPgon {
    fn default() -> Self {
        RegularPgon::new()
    }
}

impl RegularPgon {

    pub fn new() -> Self {
        RegularPgon {
            diagram: Diagram::new(),
            q: 0,
            refl_sym: ReflSym::None,
            rotn_perm: Permutation::identity(1),
            refl_perm: Permutation::identity(1),
            fund_reg_edges: None,
            table: None,
            pgon_pat: None
        }
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn set_q(&mut self, q: usize) {
        self.q = q;
    }

    pub fn set_p(&mut self, p: usize) -> Result<()> {
        self.diagram.set_p(p)
    }

    pub fn refl_sym(&self) -> ReflSym {
        self.refl_sym
    }

    pub fn set_refl_sym(&mut self, s: ReflSym) {
        self.refl_sym = s;
    }

    // defaults to p: the fundamental region is the whole polygon
    pub fn fund_reg_edges(&self) -> usize {
        self.fund_reg_edges.unwrap_or_else(|| self.diagram.p())
    }

    pub fn set_fund_reg_edges(&mut self, n: usize) {
        self.fund_reg_edges = Some(n);
    }

    pub fn rotn_perm(&self) -> &Permutation {
        &self.rotn_perm
    }

    pub fn rotn_perm_mut(&mut self) -> &mut Permutation {
        &mut self.rotn_perm
    }

    pub fn refl_perm(&self) -> &Permutation {
        &self.refl_perm
    }

    pub fn refl_perm_mut(&mut self) -> &mut Permutation {
        &mut self.refl_perm
    }

    // also resets the symmetry permutations
    pub fn set_num_colors(&mut self, n: usize) -> Result<()> {
        self.diagram.set_num_colors(n)?;
        self.rotn_perm = Permutation::identity(n);
        self.refl_perm = Permutation::identity(n);
        Ok(())
    }

    pub fn edge_table(&self) -> Option<&EdgeTable> {
        self.table.as_ref()
    }

    pub fn pgon_pat(&self) -> Option<&Pattern> {
        self.pgon_pat.as_ref()
    }

    fn check_perm(&self, name: &str, perm: &Permutation) -> Result<()> {

        let n = self.diagram.num_colors();

        if perm.size() != n {
            bail!(ErrorKind::Config(format!(
                "{:} permutation has size {:}, expected {:}", name, perm.size(), n)));
        }

        perm.ensure_bijection().chain_err(|| format!("{:} permutation", name))

    }

    fn reflection(&self) -> Option<Matrix> {

        let p = self.diagram.p() as f64;

        match self.refl_sym {
            ReflSym::None => None,
            ReflSym::EdgeBisector => Some(Matrix::x_reflection()),
            ReflSym::PgonRadius => {
                let m = &Matrix::rotation(PI / p) * &Matrix::x_reflection();
                Some(&m * &Matrix::rotation(-PI / p))
            }
        }

    }

    // replicate the fundamental region around the polygon
    pub fn make_pgon_pat(&self, ids: &mut IdAllocator) -> Result<Pattern> {

        let p = self.diagram.p();
        let fre = self.fund_reg_edges();
        let fund = self.diagram.fund_pat();

        let mut pat = Pattern::new();

        let refl = match self.reflection() {
            Some(m) => Some(Transformation::new(m, self.refl_perm.clone())?),
            None => None
        };

        for k in 0..(p / fre) {

            let theta = 2.0 * PI * (k * fre) as f64 / p as f64;
            let rot = Transformation::new(Matrix::rotation(theta), self.rotn_perm.power(k)?)?;

            pat.add_pattern(fund, Some(&rot), ids, false)?;

            if let Some(r) = &refl {
                pat.add_pattern(fund, Some(&rot.compose(r)?), ids, false)?;
            }

        }

        Ok(pat)

    }

}

impl Tessellation for RegularPgon {

    fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    fn kind(&self) -> DiagramType {
        DiagramType::RegularPgon
    }

    fn init(&mut self) -> Result<()> {

        self.diagram.validate()?;

        let p = self.diagram.p();
        let x = regular_edge_ratio(p, self.q)?;

        let fre = self.fund_reg_edges();
        if fre == 0 || p % fre != 0 {
            bail!(ErrorKind::Config(format!(
                "fundamental region spans {:} edges, which does not divide {:}", fre, p)));
        }

        self.check_perm("rotation", &self.rotn_perm)?;
        self.check_perm("reflection", &self.refl_perm)?;

        let geom = PolygonGeometry::new(&vec![self.q; p], x, false)?;

        let table = EdgeTable::build(geom, self.diagram.edges(), self.diagram.num_colors())?;
        table.check_vertex_cycles(false)?;

        let mut ids = IdAllocator::scoped(usize::MAX);
        let mut pgon_pat = self.make_pgon_pat(&mut ids)?;

        let outline = table.geometry().outline(&mut ids)?;
        pgon_pat.add_element(&outline, None, &mut ids, false, true)?;

        debug!("{{{:}, {:}}}: x = {:}, {:} motif elements", p, self.q, x, pgon_pat.len());

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

        for (i, l) in layers.iter().enumerate() {
            info!("layer {:}: {:} elements", i, l.len());
        }

        self.diagram.commit_layers(layers);

        Ok(())

    }

    fn clear(&mut self) {
        self.table = None;
        self.pgon_pat = None;
        self.diagram.clear_layers();
    }

}
