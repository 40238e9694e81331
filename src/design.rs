use std::io::BufRead;

use phf::phf_map;
use tracing::debug;

use crate::diagram::{Diagram, DiagramType, Rgb, Tessellation};
use crate::element::{Element, ElementKind, IdAllocator, LineStyle};
use crate::errors::*;
use crate::irregular::IrregularPgon;
use crate::permutation::Permutation;
use crate::point::Point;
use crate::regular::{ReflSym, RegularPgon};
use crate::transformation::Orientation;

//////////////////////////////////////////////////////////////////////
// keyword lookup tables

static DIAGRAM_LOOKUP: phf::Map<&'static str, DiagramType> = phf_map! {
    "regular" => DiagramType::RegularPgon,
    "irregular" => DiagramType::IrregularPgon,
};

static ORIENT_LOOKUP: phf::Map<&'static str, Orientation> = phf_map! {
    "reflection" => Orientation::Reflection,
    "rotation" => Orientation::Rotation,
};

static REFL_SYM_LOOKUP: phf::Map<&'static str, ReflSym> = phf_map! {
    "none" => ReflSym::None,
    "edge_bisector" => ReflSym::EdgeBisector,
    "pgon_radius" => ReflSym::PgonRadius,
};

static ELEMENT_LOOKUP: phf::Map<&'static str, ElementKind> = phf_map! {
    "euclid_polyline" => ElementKind::EuclidPolyline,
    "euclid_polygon" => ElementKind::EuclidPolygon,
    "circle" => ElementKind::Circle,
    "hyper_polyline" => ElementKind::HyperbolicPolyline,
    "hyper_polygon" => ElementKind::HyperbolicPolygon,
};

static FILL_LOOKUP: phf::Map<&'static str, bool> = phf_map! {
    "filled" => true,
    "open" => false,
};

static STYLE_LOOKUP: phf::Map<&'static str, LineStyle> = phf_map! {
    "solid" => LineStyle::Solid,
    "dots" => LineStyle::Dots,
};

//////////////////////////////////////////////////////////////////////
// fixed-arity token parsing: each entry is either "name: type" or
// "name from LOOKUP"; the result is a tuple in declaration order

macro_rules! parse_tokens {

    // no more entries, complain about leftovers
    ($it:ident { } -> { $($tuple:ident,)* }) => (
        match $it.next() {
            Some(value) => Err(format!("found extra token(s) starting with \"{:}\"", value)),
            None => Ok(($($tuple),*))
        }
    );

    ($it:ident { $name:ident from $map:expr, $($ts:tt)* } -> { $($tuple:ident,)* }) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name))),
            Some(&value) => match $map.get(value) {
                Some(&$name) => parse_tokens!($it { $($ts)* } -> { $($tuple,)* $name, }),
                None => {
                    let expected: Vec<&str> = $map.keys().cloned().collect();
                    Err(format!("unexpected value \"{:}\" for {:}, expected one of: {{\"{:}\"}}",
                                value, stringify!($name), expected.join("\", \"")))
                }
            }
        }
    );

    ($it:ident { $name:ident : $type:ident, $($ts:tt)* } -> { $($tuple:ident,)* }) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name))),
            Some(value) => match value.parse::<$type>() {
                Ok($name) => parse_tokens!($it { $($ts)* } -> { $($tuple,)* $name, }),
                Err(_) => Err(format!("error parsing {:} as type {:}", value, stringify!($type)))
            }
        }
    );

    ($a:expr, { $($ts:tt)+ }) => (
        {
            let mut it = $a.iter();
            parse_tokens!(it { $($ts)* , } -> { })
        }
    );

}

macro_rules! copy_field {
    ($dst:ident, $src:ident, $field:ident) => (
        if $src.$field.is_some() {
            if $dst.$field.is_some() {
                bail!("{:} is already set", stringify!($field));
            }
            $dst.$field = $src.$field;
        }
    )
}

macro_rules! ensure_field {
    ($ds:ident, $fvec:ident, $field:ident) => (
        if $ds.$field.is_none() {
            $fvec.push(stringify!($field));
        }
    )
}

fn parse_indices<T: std::str::FromStr>(tokens: &[&str]) -> Result<Vec<T>> {

    let mut rval = Vec::new();

    for value in tokens {
        if let Ok(idx) = value.parse::<T>() {
            rval.push(idx);
        } else {
            bail!("invalid value: {:}", value);
        }
    }

    Ok(rval)

}

//////////////////////////////////////////////////////////////////////
// parsed design file

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub index: usize,
    pub orient: Orientation,
    pub adj: usize,
    pub perm: Option<Vec<usize>>
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElemSpec {
    pub kind: ElementKind,
    pub cid: usize,
    pub filled: bool,
    pub zorder: i32,
    pub style: LineStyle,
    pub coords: Vec<(f64, f64)>
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignSpec {
    pub kind: Option<DiagramType>,
    pub p: Option<usize>,
    pub q: Option<usize>,
    pub qlist: Option<Vec<usize>>,
    pub num_colors: Option<usize>,
    pub colors: Vec<(usize, Rgb)>,
    pub num_layers: Option<usize>,
    pub max_elements: Option<usize>,
    pub fund_reg_edges: Option<usize>,
    pub refl_sym: Option<ReflSym>,
    pub rotn_perm: Option<Vec<usize>>,
    pub refl_perm: Option<Vec<usize>>,
    pub edges: Vec<EdgeSpec>,
    pub elems: Vec<ElemSpec>
}

impl DesignSpec {

    pub fn new() -> Self {
        Default::default()
    }

    fn update(&mut self, other: DesignSpec) -> Result<()> {

        copy_field!(self, other, kind);
        copy_field!(self, other, p);
        copy_field!(self, other, q);
        copy_field!(self, other, qlist);
        copy_field!(self, other, num_colors);
        copy_field!(self, other, num_layers);
        copy_field!(self, other, max_elements);
        copy_field!(self, other, fund_reg_edges);
        copy_field!(self, other, refl_sym);
        copy_field!(self, other, rotn_perm);
        copy_field!(self, other, refl_perm);

        for (cid, c) in other.colors {
            if self.colors.iter().any(|&(k, _)| k == cid) {
                bail!("color {:} is already set", cid);
            }
            self.colors.push((cid, c));
        }

        for e in other.edges {
            if self.edges.iter().any(|f| f.index == e.index) {
                bail!("edge {:} is already set", e.index);
            }
            self.edges.push(e);
        }

        self.elems.extend(other.elems);

        Ok(())

    }

    fn parse_keyword(keyword: &str, rest: &[&str]) -> Result<DesignSpec> {

        let mut update = DesignSpec::new();

        match keyword {

            "type" => {
                let kind = parse_tokens!(rest, { kind from DIAGRAM_LOOKUP })?;
                update.kind = Some(kind);
            },

            "p" => {
                let p = parse_tokens!(rest, { p: usize })?;
                update.p = Some(p);
            },

            "q" => {
                let q = parse_tokens!(rest, { q: usize })?;
                update.q = Some(q);
            },

            "qlist" => {
                let qlist = parse_indices(rest)?;
                if qlist.is_empty() {
                    bail!("qlist needs at least one valence");
                }
                update.qlist = Some(qlist);
            },

            "colors" => {
                let n = parse_tokens!(rest, { num_colors: usize })?;
                update.num_colors = Some(n);
            },

            "color" => {
                let (cid, hex) = parse_tokens!(rest, { cid: usize, hex: String })?;
                update.colors.push((cid, Rgb::from_hex(&hex)?));
            },

            "layers" => {
                let n = parse_tokens!(rest, { layers: usize })?;
                update.num_layers = Some(n);
            },

            "max_elements" => {
                let n = parse_tokens!(rest, { max_elements: usize })?;
                update.max_elements = Some(n);
            },

            "fund_reg_edges" => {
                let n = parse_tokens!(rest, { edges: usize })?;
                update.fund_reg_edges = Some(n);
            },

            "refl_sym" => {
                let s = parse_tokens!(rest, { refl_sym from REFL_SYM_LOOKUP })?;
                update.refl_sym = Some(s);
            },

            "rotn_perm" | "refl_perm" => {
                let perm = parse_indices(rest)?;
                if keyword.starts_with("rotn") {
                    update.rotn_perm = Some(perm);
                } else {
                    update.refl_perm = Some(perm);
                }
            },

            "edge" => {

                let n = rest.len().min(3);

                let (index, orient, adj) = parse_tokens!(&rest[..n], {
                    index: usize,
                    orient from ORIENT_LOOKUP,
                    adj: usize
                })?;

                let perm = if rest.len() > 3 {
                    Some(parse_indices(&rest[3..])?)
                } else {
                    None
                };

                update.edges.push(EdgeSpec { index: index, orient: orient, adj: adj, perm: perm });

            },

            "elem" => {
                update.elems.push(Self::parse_elem(rest)?);
            },

            _ => { bail!("unrecognized keyword"); }

        }

        Ok(update)

    }

    // KIND CID filled|open [zorder Z] [style solid|dots] : x0 y0 ...
    fn parse_elem(rest: &[&str]) -> Result<ElemSpec> {

        let split = match rest.iter().position(|&t| t == ":") {
            Some(pos) => pos,
            None => bail!("missing \":\" before element coordinates")
        };

        let (head, coords) = (&rest[..split], &rest[split+1..]);

        let n = head.len().min(3);

        let (kind, cid, filled) = parse_tokens!(&head[..n], {
            kind from ELEMENT_LOOKUP,
            cid: usize,
            filled from FILL_LOOKUP
        })?;

        let mut zorder = 1;
        let mut style = LineStyle::Solid;

        for pair in head[n..].chunks(2) {
            match pair {
                ["zorder", _] => {
                    zorder = parse_tokens!(&pair[1..], { zorder: i32 })?;
                },
                ["style", _] => {
                    style = parse_tokens!(&pair[1..], { style from STYLE_LOOKUP })?;
                },
                _ => bail!("unexpected element option(s): {:}", pair.join(" "))
            }
        }

        let values: Vec<f64> = parse_indices(coords)?;

        if values.is_empty() || values.len() % 2 != 0 {
            bail!("element needs a non-empty list of x y pairs, got {:} value(s)", values.len());
        }

        Ok(ElemSpec {
            kind: kind,
            cid: cid,
            filled: filled,
            zorder: zorder,
            style: style,
            coords: values.chunks(2).map(|c| (c[0], c[1])).collect()
        })

    }

    fn update_from(&mut self, line: &str) -> Result<()> {

        let mut trimmed = line.trim();

        if let Some(pos) = trimmed.find('#') {
            trimmed = &trimmed[0..pos];
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        if tokens.is_empty() {
            return Ok(());
        }

        let keyword = tokens[0];
        let rest = &tokens[1..];

        let update = Self::parse_keyword(keyword, rest).chain_err(
            || format!("while parsing keyword {:}", keyword))?;

        self.update(update)

    }

    pub fn parse(filename: &str, istr: &mut impl BufRead) -> Result<DesignSpec> {

        let mut ds = DesignSpec::new();
        let mut lineno = 0;

        loop {

            let mut line = String::new();

            lineno += 1;

            let len = istr.read_line(&mut line).chain_err(|| format!("{:}:{:}: read error", filename, lineno))?;

            if len == 0 {
                break;
            }

            ds.update_from(line.as_str()).chain_err(|| format!("{:}:{:}: parse error", filename, lineno))?;

        }

        let mut unset_fields = Vec::new();

        ensure_field!(ds, unset_fields, kind);

        match ds.kind {
            Some(DiagramType::RegularPgon) => {
                ensure_field!(ds, unset_fields, p);
                ensure_field!(ds, unset_fields, q);
            },
            Some(DiagramType::IrregularPgon) => {
                ensure_field!(ds, unset_fields, qlist);
            },
            None => {}
        }

        if !unset_fields.is_empty() {
            bail!("{:}: the following field(s) were unset: {:}",
                  filename, unset_fields.as_slice().join(", "));
        }

        debug!("{:}: {:} edge(s), {:} element(s)", filename, ds.edges.len(), ds.elems.len());

        Ok(ds)

    }

    //////////////////////////////////////////////////////////////////////
    // turn the parsed description into a generator ready for init

    pub fn build(&self) -> Result<Box<dyn Tessellation>> {

        let mut rval: Box<dyn Tessellation> = match self.kind {

            Some(DiagramType::RegularPgon) => Box::new(self.build_regular()?),

            Some(DiagramType::IrregularPgon) => Box::new(self.build_irregular()?),

            None => bail!(ErrorKind::Config("diagram type not set".to_string()))

        };

        self.fill_diagram(rval.diagram_mut())?;

        Ok(rval)

    }

    fn build_regular(&self) -> Result<RegularPgon> {

        if self.qlist.is_some() {
            bail!(ErrorKind::Config("qlist given for a regular diagram".to_string()));
        }

        let mut d = RegularPgon::new();

        d.set_num_colors(self.num_colors.unwrap_or(1))?;
        d.set_p(self.p.unwrap_or(0))?;
        d.set_q(self.q.unwrap_or(0));

        if let Some(n) = self.fund_reg_edges {
            d.set_fund_reg_edges(n);
        }

        if let Some(s) = self.refl_sym {
            d.set_refl_sym(s);
        }

        if let Some(v) = &self.rotn_perm {
            *d.rotn_perm_mut() = Permutation::from_vec(v.clone()).chain_err(|| "rotn_perm")?;
        }

        if let Some(v) = &self.refl_perm {
            *d.refl_perm_mut() = Permutation::from_vec(v.clone()).chain_err(|| "refl_perm")?;
        }

        Ok(d)

    }

    fn build_irregular(&self) -> Result<IrregularPgon> {

        let regular_only = [
            ("q", self.q.is_some()),
            ("fund_reg_edges", self.fund_reg_edges.is_some()),
            ("refl_sym", self.refl_sym.is_some()),
            ("rotn_perm", self.rotn_perm.is_some()),
            ("refl_perm", self.refl_perm.is_some()),
        ];

        for &(name, set) in regular_only.iter() {
            if set {
                bail!(ErrorKind::Config(format!("{:} given for an irregular diagram", name)));
            }
        }

        let qlist = match &self.qlist {
            Some(q) => q,
            None => bail!(ErrorKind::Config("qlist not set".to_string()))
        };

        if let Some(p) = self.p {
            if p != qlist.len() {
                bail!(ErrorKind::Config(format!(
                    "p is {:} but qlist has {:} entries", p, qlist.len())));
            }
        }

        let mut d = IrregularPgon::new();

        d.diagram_mut().set_num_colors(self.num_colors.unwrap_or(1))?;
        d.set_valences(qlist)?;

        Ok(d)

    }

    // settings shared by both kinds
    fn fill_diagram(&self, d: &mut Diagram) -> Result<()> {

        if let Some(n) = self.num_layers {
            d.set_num_layers(n);
        }

        if let Some(n) = self.max_elements {
            d.set_max_elements(n);
        }

        for &(cid, c) in self.colors.iter() {
            d.set_color(cid, c)?;
        }

        for es in self.edges.iter() {

            let num_colors = d.num_colors();
            let e = d.edge_mut(es.index)?;

            e.orient = es.orient;
            e.adj = es.adj;

            if let Some(v) = &es.perm {
                if v.len() != num_colors {
                    bail!(ErrorKind::Config(format!(
                        "edge {:} permutation has {:} entries for {:} colors",
                        es.index, v.len(), num_colors)));
                }
                e.perm = Permutation::from_vec(v.clone())
                    .chain_err(|| format!("edge {:} permutation", es.index))?;
            }

        }

        let mut ids = IdAllocator::scoped(0);

        for (i, es) in self.elems.iter().enumerate() {

            let mut e = Element::new(es.kind, ids.next_id());

            e.set_cid(es.cid);
            e.set_filled(es.filled);
            e.set_zorder(es.zorder);
            e.set_line_style(es.style);

            for &(x, y) in es.coords.iter() {
                e.add_point(Point::poincare(x, y)).chain_err(|| format!("element {:}", i))?;
            }

            d.add_fund_element(&e).chain_err(|| format!("element {:}", i))?;

        }

        Ok(())

    }

}
