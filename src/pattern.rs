use std::collections::BTreeMap;

use crate::element::{Element, ElementId, IdAllocator};
use crate::errors::*;
use crate::transformation::Transformation;

//////////////////////////////////////////////////////////////////////
// a motif instance: the working elements plus a "frame" overlay
// (polygon outlines and the like), both keyed by element id. Every
// insertion stores a private clone.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    elems: BTreeMap<ElementId, Element>,
    frame: BTreeMap<ElementId, Element>
}

impl Pattern {

    pub fn new() -> Self {
        Default::default()
    }

    // clone elem, move the clone through tran if given, and store it
    // under either a fresh id (clone_id) or the original's id
    pub fn add_element(&mut self,
                       elem: &Element,
                       tran: Option<&Transformation>,
                       ids: &mut IdAllocator,
                       clone_id: bool,
                       frame: bool) -> Result<ElementId> {

        let id = if clone_id { ids.next_id() } else { elem.id() };

        let mut clone = elem.clone_with_id(id);

        if let Some(t) = tran {
            clone.transform(t)?;
        }

        if frame {
            self.frame.insert(id, clone);
        } else {
            self.elems.insert(id, clone);
        }

        Ok(id)

    }

    // copy every working element (and optionally the frame) of other
    pub fn add_pattern(&mut self,
                       other: &Pattern,
                       tran: Option<&Transformation>,
                       ids: &mut IdAllocator,
                       with_frame: bool) -> Result<()> {

        for e in other.elems.values() {
            self.add_element(e, tran, ids, true, false)?;
        }

        if with_frame {
            for e in other.frame.values() {
                self.add_element(e, tran, ids, true, true)?;
            }
        }

        Ok(())

    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn frame_len(&self) -> usize {
        self.frame.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elems.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elems.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elems.contains_key(&id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elems.values()
    }

    pub fn frame_elements(&self) -> impl Iterator<Item = &Element> {
        self.frame.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elems.keys().cloned()
    }

    // drawing order: ascending z, ties broken by id
    pub fn sorted_by_zorder(&self) -> Vec<&Element> {
        let mut rval: Vec<&Element> = self.elems.values().collect();
        rval.sort_by_key(|e| (e.zorder(), e.id()));
        rval
    }

    pub fn clear(&mut self) {
        self.elems.clear();
        self.frame.clear();
    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::element::ElementKind;
    use crate::matrix::Matrix;
    use crate::permutation::Permutation;
    use crate::point::Point;

    fn dot(ids: &mut IdAllocator, x: f64, z: i32) -> Element {
        let mut e = Element::new(ElementKind::Circle, ids.next_id());
        e.add_point(Point::poincare(x, 0.0)).unwrap();
        e.add_point(Point::poincare(x + 0.05, 0.0)).unwrap();
        e.set_zorder(z);
        e
    }

    #[test]
    fn stores_private_clones() {

        let mut src_ids = IdAllocator::scoped(0);
        let mut ids = IdAllocator::scoped(1);

        let mut e = dot(&mut src_ids, 0.1, 1);

        let mut pat = Pattern::new();
        let id = pat.add_element(&e, None, &mut ids, true, false).unwrap();

        assert_ne!(id, e.id());

        // mutating the caller's element leaves the pattern alone
        e.set_cid(7);
        assert_eq!(pat.get(id).unwrap().cid(), 0);

    }

    #[test]
    fn clone_id_flag_selects_identity() {

        let mut src_ids = IdAllocator::scoped(0);
        let mut ids = IdAllocator::scoped(1);

        let e = dot(&mut src_ids, 0.1, 1);

        let mut pat = Pattern::new();
        let kept = pat.add_element(&e, None, &mut ids, false, true).unwrap();

        assert_eq!(kept, e.id());
        assert_eq!(pat.frame_len(), 1);
        assert!(pat.is_empty());

    }

    #[test]
    fn transform_applies_to_clone_only() {

        let mut src_ids = IdAllocator::scoped(0);
        let mut ids = IdAllocator::scoped(1);

        let e = dot(&mut src_ids, 0.1, 1);

        let t = Transformation::new(Matrix::rotation(1.0),
                                    Permutation::from_vec(vec![1, 0]).unwrap()).unwrap();

        let mut pat = Pattern::new();
        let id = pat.add_element(&e, Some(&t), &mut ids, true, false).unwrap();

        assert_eq!(pat.get(id).unwrap().cid(), 1);
        assert_eq!(e.cid(), 0);
        assert!(pat.get(id).unwrap().points()[0] != e.points()[0]);

    }

    #[test]
    fn zorder_sorting_is_ascending() {

        let mut src_ids = IdAllocator::scoped(0);
        let mut ids = IdAllocator::scoped(1);

        let mut pat = Pattern::new();

        for &(x, z) in [(0.1, 3), (0.2, 1), (0.3, 2), (0.4, 1)].iter() {
            let e = dot(&mut src_ids, x, z);
            pat.add_element(&e, None, &mut ids, true, false).unwrap();
        }

        let z: Vec<i32> = pat.sorted_by_zorder().iter().map(|e| e.zorder()).collect();
        assert_eq!(z, vec![1, 1, 2, 3]);

    }

    #[test]
    fn add_pattern_copies_frame_on_request() {

        let mut src_ids = IdAllocator::scoped(0);
        let mut ids = IdAllocator::scoped(1);

        let mut motif = Pattern::new();
        motif.add_element(&dot(&mut src_ids, 0.1, 1), None, &mut ids, true, false).unwrap();
        motif.add_element(&dot(&mut src_ids, 0.2, 1), None, &mut ids, true, true).unwrap();

        let mut out = Pattern::new();
        out.add_pattern(&motif, None, &mut ids, false).unwrap();
        assert_eq!((out.len(), out.frame_len()), (1, 0));

        out.clear();
        out.add_pattern(&motif, None, &mut ids, true).unwrap();
        assert_eq!((out.len(), out.frame_len()), (1, 1));

    }

}
