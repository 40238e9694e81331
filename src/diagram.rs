use std::collections::BTreeMap;

use crate::edge::PgonEdge;
use crate::element::{Element, ElementId, IdAllocator};
use crate::errors::*;
use crate::pattern::Pattern;

//////////////////////////////////////////////////////////////////////
// defaults

pub const DEFAULT_LAYERS: usize = 3;
pub const DEFAULT_MAX_ELEMENTS: usize = 1_000_000;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {

    // "RRGGBB", optional leading '#'
    pub fn from_hex(s: &str) -> Result<Rgb> {

        let s = s.trim_start_matches('#');

        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!(ErrorKind::Config(format!("bad color {:?}, expected RRGGBB", s)));
        }

        let v = u32::from_str_radix(s, 16)?;

        Ok(Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))

    }

}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DiagramType {
    RegularPgon,
    IrregularPgon
}

//////////////////////////////////////////////////////////////////////
// structural description shared by every kind of diagram, plus the
// generated layers

#[derive(Debug, Clone)]
pub struct Diagram {
    p: usize,
    num_colors: usize,
    edges: Vec<PgonEdge>,
    colors: BTreeMap<usize, Rgb>,
    fund_pat: Pattern,
    fund_ids: IdAllocator,
    num_layers: usize,
    max_elements: usize,
    layers: Vec<Pattern>
}

impl Default for Diagram {
    fn default() -> Self {
        Diagram::new()
    }
}

impl Diagram {

    pub fn new() -> Self {
        Diagram {
            p: 0,
            num_colors: 1,
            edges: Vec::new(),
            colors: BTreeMap::new(),
            fund_pat: Pattern::new(),
            fund_ids: IdAllocator::scoped(0),
            num_layers: DEFAULT_LAYERS,
            max_elements: DEFAULT_MAX_ELEMENTS,
            layers: Vec::new()
        }
    }

    pub fn p(&self) -> usize {
        self.p
    }

    // (re)allocates the edge records, each glued to itself by reflection
    pub fn set_p(&mut self, p: usize) -> Result<()> {

        if p < 3 {
            bail!(ErrorKind::Config(format!("polygon needs at least 3 edges, got {:}", p)));
        }

        self.p = p;
        self.edges = (0..p).map(|i| PgonEdge::new(i, self.num_colors)).collect();

        Ok(())

    }

    pub fn num_colors(&self) -> usize {
        self.num_colors
    }

    // resets every edge permutation to the identity
    pub fn set_num_colors(&mut self, n: usize) -> Result<()> {

        if n == 0 {
            bail!(ErrorKind::Config("need at least one color".to_string()));
        }

        self.num_colors = n;
        self.colors.retain(|&cid, _| cid < n);

        for (i, e) in self.edges.iter_mut().enumerate() {
            *e = PgonEdge { adj: e.adj, orient: e.orient, ..PgonEdge::new(i, n) };
        }

        Ok(())

    }

    pub fn edges(&self) -> &[PgonEdge] {
        &self.edges
    }

    pub fn edge_mut(&mut self, i: usize) -> Result<&mut PgonEdge> {
        let p = self.p;
        self.edges.get_mut(i).ok_or_else(
            || config(format!("edge {:} out of range for a {:}-gon", i, p)))
    }

    pub fn set_color(&mut self, cid: usize, c: Rgb) -> Result<()> {

        if cid >= self.num_colors {
            bail!(ErrorKind::Config(format!(
                "color id {:} out of range for {:} colors", cid, self.num_colors)));
        }

        self.colors.insert(cid, c);

        Ok(())

    }

    pub fn color(&self, cid: usize) -> Option<Rgb> {
        self.colors.get(&cid).cloned()
    }

    pub fn fund_pat(&self) -> &Pattern {
        &self.fund_pat
    }

    // stores a clone with a fresh scope-0 id
    pub fn add_fund_element(&mut self, elem: &Element) -> Result<ElementId> {

        if elem.cid() >= self.num_colors {
            bail!(ErrorKind::Config(format!(
                "element color id {:} out of range for {:} colors", elem.cid(), self.num_colors)));
        }

        self.fund_pat.add_element(elem, None, &mut self.fund_ids, true, false)

    }

    pub fn num_layers(&self) -> usize {
        self.num_layers
    }

    pub fn set_num_layers(&mut self, n: usize) {
        self.num_layers = n;
    }

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    pub fn set_max_elements(&mut self, n: usize) {
        self.max_elements = n;
    }

    pub fn layers(&self) -> &[Pattern] {
        &self.layers
    }

    pub fn layer(&self, i: usize) -> Option<&Pattern> {
        self.layers.get(i)
    }

    // what a renderer draws for layer i
    pub fn layer_elements_sorted(&self, i: usize) -> Vec<&Element> {
        match self.layers.get(i) {
            Some(l) => l.sorted_by_zorder(),
            None => Vec::new()
        }
    }

    pub fn total_elements(&self) -> usize {
        self.layers.iter().map(|l| l.len()).sum()
    }

    pub(crate) fn commit_layers(&mut self, layers: Vec<Pattern>) {
        self.layers = layers;
    }

    pub(crate) fn clear_layers(&mut self) {
        self.layers.clear();
    }

    // checks shared by every generator before init
    pub fn validate(&self) -> Result<()> {

        if self.p < 3 || self.edges.len() != self.p {
            bail!(ErrorKind::Config(format!("polygon degree not set (p = {:})", self.p)));
        }

        if self.fund_pat.is_empty() {
            tracing::warn!("fundamental pattern is empty");
        }

        for e in self.fund_pat.elements() {
            if e.cid() >= self.num_colors {
                bail!(ErrorKind::Config(format!(
                    "element {:?} has color id {:} but there are {:} colors",
                    e.id(), e.cid(), self.num_colors)));
            }
        }

        Ok(())

    }

}

//////////////////////////////////////////////////////////////////////
// the generator lifecycle: init derives the edge transformations,
// make expands the layers, clear drops everything derived

pub trait Tessellation {

    fn diagram(&self) -> &Diagram;

    fn diagram_mut(&mut self) -> &mut Diagram;

    fn kind(&self) -> DiagramType;

    fn init(&mut self) -> Result<()>;

    fn make(&mut self) -> Result<()>;

    fn clear(&mut self);

    fn layers(&self) -> &[Pattern] {
        self.diagram().layers()
    }

}
