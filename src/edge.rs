use crate::errors::*;
use crate::permutation::Permutation;
use crate::transformation::Orientation;

//////////////////////////////////////////////////////////////////////
// per-edge gluing data for the fundamental polygon

#[derive(Debug, Clone, PartialEq)]
pub struct PgonEdge {
    pub orient: Orientation,
    pub adj: usize,
    pub perm: Permutation
}

impl PgonEdge {

    // glued to itself by reflection, colors unchanged
    pub fn new(index: usize, num_colors: usize) -> Self {
        PgonEdge {
            orient: Orientation::Reflection,
            adj: index,
            perm: Permutation::identity(num_colors)
        }
    }

}

// the pairing must be an involution on [0, p) with matching
// orientations, and every permutation a bijection on the palette
pub fn check_edges(edges: &[PgonEdge], num_colors: usize) -> Result<()> {

    let p = edges.len();

    for (i, e) in edges.iter().enumerate() {

        if e.adj >= p {
            bail!(ErrorKind::Config(format!(
                "edge {:} is glued to edge {:} but the polygon has {:} edges", i, e.adj, p)));
        }

        // only a mirror may fold an edge onto itself
        if e.adj == i && e.orient == Orientation::Rotation {
            bail!(ErrorKind::Config(format!(
                "edge {:} is glued to itself by rotation", i)));
        }

        let partner = &edges[e.adj];

        if partner.adj != i {
            bail!(ErrorKind::Config(format!(
                "edge {:} is glued to edge {:} which is glued to edge {:}",
                i, e.adj, partner.adj)));
        }

        if partner.orient != e.orient {
            bail!(ErrorKind::Config(format!(
                "edges {:} and {:} disagree on orientation ({:?} vs {:?})",
                i, e.adj, e.orient, partner.orient)));
        }

        if e.perm.size() != num_colors {
            bail!(ErrorKind::Config(format!(
                "edge {:} color permutation has size {:}, expected {:}",
                i, e.perm.size(), num_colors)));
        }

        e.perm.ensure_bijection().chain_err(|| format!("edge {:} color permutation", i))?;

    }

    Ok(())

}
