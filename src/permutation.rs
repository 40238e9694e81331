use std::ops::Index;

use crate::errors::*;

//////////////////////////////////////////////////////////////////////
// bijection on color ids [0, n)

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    map: Vec<usize>
}

impl Permutation {

    pub fn identity(size: usize) -> Self {
        Permutation { map: (0..size).collect() }
    }

    pub fn from_vec(map: Vec<usize>) -> Result<Self> {

        let perm = Permutation { map: map };

        if !perm.is_bijection() {
            return Err(validation(format!("{:?} is not a permutation", perm.map)));
        }

        Ok(perm)

    }

    pub fn size(&self) -> usize {
        self.map.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }

    // loaders fill entries one at a time, so this may
    // temporarily break the bijection
    pub fn set(&mut self, from: usize, to: usize) -> Result<()> {

        if from >= self.size() || to >= self.size() {
            return Err(validation(format!(
                "permutation entry {:} -> {:} out of range for size {:}",
                from, to, self.size())));
        }

        self.map[from] = to;

        Ok(())

    }

    pub fn is_bijection(&self) -> bool {

        let n = self.size();
        let mut seen = vec![false; n];

        for &c in &self.map {
            if c >= n || seen[c] {
                return false;
            }
            seen[c] = true;
        }

        true

    }

    pub fn ensure_bijection(&self) -> Result<()> {
        if self.is_bijection() {
            Ok(())
        } else {
            Err(validation(format!("{:?} is not a bijection", self.map)))
        }
    }

    // image of a color id
    pub fn map(&self, c: usize) -> Result<usize> {
        match self.map.get(c) {
            Some(&d) => Ok(d),
            None => Err(validation(format!(
                "color id {:} out of range for {:} colors", c, self.size())))
        }
    }

    // (self . other)[c] = self[other[c]]
    pub fn compose(&self, other: &Permutation) -> Result<Permutation> {

        if self.size() != other.size() {
            return Err(validation(format!(
                "cannot compose permutations of sizes {:} and {:}",
                self.size(), other.size())));
        }

        self.ensure_bijection()?;
        other.ensure_bijection()?;

        let map = other.map.iter().map(|&c| self.map[c]).collect();

        Ok(Permutation { map: map })

    }

    // self applied k times
    pub fn power(&self, k: usize) -> Result<Permutation> {

        let mut rval = Permutation::identity(self.size());

        for _ in 0..k {
            rval = self.compose(&rval)?;
        }

        Ok(rval)

    }

}

impl Index<usize> for Permutation {

    type Output = usize;

    fn index(&self, c: usize) -> &usize {
        &self.map[c]
    }

}
