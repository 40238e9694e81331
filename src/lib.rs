//! Hyperbolic "circle limit" tilings.
//!
//! A [`diagram`] holds the symbolic description of a tiling (polygon
//! degree, vertex valences, edge pairings, palette and one fundamental
//! motif). [`regular::RegularPgon`] and [`irregular::IrregularPgon`]
//! derive the edge motions of the tiling and expand the motif outward
//! layer by layer, producing positioned and recolored elements ready
//! for a renderer.

#[macro_use]
extern crate error_chain;

pub mod errors;

pub mod point;
pub mod hyperline;
pub mod permutation;
pub mod matrix;
pub mod transformation;
pub mod element;
pub mod pattern;
pub mod edge;
pub mod tiling;
pub mod diagram;
pub mod regular;
pub mod irregular;
pub mod design;

pub use diagram::{Diagram, Tessellation};
pub use irregular::IrregularPgon;
pub use regular::RegularPgon;
