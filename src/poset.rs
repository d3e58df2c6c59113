//! Inclusion order over the codewords of a code.

use crate::codeword::Codeword;
use crate::member_set::MemberSet;

/// Codewords ordered by support inclusion: `c <= d` iff `d` contains `c`.
///
/// Element indices match the owning code's sorted codeword list. Because
/// that list puts larger codewords first, an element can only be below
/// elements with a smaller index (or itself).
#[derive(Clone, Debug)]
pub struct Poset {
    elements: Vec<Codeword>,
    /// `up[i]` holds every `j` with `elements[i] <= elements[j]`.
    up: Vec<MemberSet>,
}

impl Poset {
    pub fn new(elements: &[Codeword]) -> Self {
        let n = elements.len();
        let mut up = Vec::with_capacity(n);
        for c in elements {
            let mut above = MemberSet::new_empty(n);
            for (j, d) in elements.iter().enumerate() {
                if d.contains(c) {
                    above.insert(j);
                }
            }
            up.push(above);
        }
        Poset {
            elements: elements.to_vec(),
            up,
        }
    }

    pub fn cardinality(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[Codeword] {
        &self.elements
    }

    /// `elements[a] <= elements[b]`.
    pub fn le(&self, a: usize, b: usize) -> bool {
        self.up.get(a).map_or(false, |s| s.contains(b))
    }

    pub fn maximal_indices(&self) -> Vec<usize> {
        (0..self.elements.len())
            .filter(|&i| self.up[i].count() == 1)
            .collect()
    }

    pub fn maximal_elements(&self) -> Vec<Codeword> {
        self.maximal_indices()
            .into_iter()
            .map(|i| self.elements[i])
            .collect()
    }

    pub fn minimal_elements(&self) -> Vec<Codeword> {
        (0..self.elements.len())
            .filter(|&i| (0..self.elements.len()).all(|j| j == i || !self.le(j, i)))
            .map(|i| self.elements[i])
            .collect()
    }

    /// Hasse diagram edges `(lower, upper)`: `lower < upper` with nothing
    /// strictly between them.
    pub fn cover_relations(&self) -> Vec<(usize, usize)> {
        let mut covers = Vec::new();
        for i in 0..self.elements.len() {
            for j in self.up[i].iter().filter(|&j| j != i) {
                let between = self.up[i]
                    .iter()
                    .any(|k| k != i && k != j && self.le(k, j));
                if !between {
                    covers.push((i, j));
                }
            }
        }
        covers
    }
}
