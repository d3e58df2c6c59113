//! Isomorphism of codes up to relabelling of neurons.
//!
//! Both codes are first brought to their reduced forms; the reduced forms
//! are then compared by exhaustive search over every bijection between
//! their supports. The search is factorial in the reduced support size, so
//! callers are expected to keep codes small.

use crate::code::Code;
use std::collections::HashSet;

/// Iterative Heap's algorithm over `items`, calling `visit` on every
/// arrangement until it returns `true`.
fn any_permutation<F>(items: &mut [u32], mut visit: F) -> bool
where
    F: FnMut(&[u32]) -> bool,
{
    if visit(items) {
        return true;
    }
    let n = items.len();
    let mut counters = vec![0usize; n];
    let mut i = 1;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            if visit(items) {
                return true;
            }
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    false
}

fn size_profile(code: &Code) -> Vec<usize> {
    let mut sizes: Vec<usize> = code.codewords().iter().map(|c| c.len()).collect();
    sizes.sort_unstable();
    sizes
}

/// A relabelling carrying the reduced form of `a` onto the reduced form of
/// `b`, as `(neuron, image)` pairs over the reduced supports.
pub fn find_isomorphism(a: &Code, b: &Code) -> Option<Vec<(u32, u32)>> {
    if a.size() != b.size() {
        return None;
    }

    let left = a.reduced();
    let right = b.reduced();
    let domain = left.support().support();
    let mut targets = right.support().support();
    if domain.len() != targets.len() || size_profile(left) != size_profile(right) {
        return None;
    }

    let present: HashSet<u64> = right.codewords().iter().map(|c| c.bits()).collect();
    let width = left.support().max_neuron().unwrap_or(0) as usize;
    let mut images = vec![0u32; width];
    let mut tried = 0u64;

    let found = any_permutation(&mut targets, |arrangement| {
        tried += 1;
        for (&d, &t) in domain.iter().zip(arrangement) {
            images[d as usize - 1] = t;
        }
        left.codewords()
            .iter()
            .all(|c| present.contains(&c.relabel(&images).bits()))
    });

    tracing::debug!(
        support = domain.len(),
        permutations = tried,
        isomorphic = found,
        "permutation search finished"
    );

    found.then(|| {
        domain
            .iter()
            .map(|&d| (d, images[d as usize - 1]))
            .collect()
    })
}

impl Code {
    /// True iff the reduced forms of `self` and `other` agree up to a
    /// relabelling of neurons.
    ///
    /// # Examples
    ///
    /// ```
    /// use neurocode::Code;
    ///
    /// let a = Code::parse("{1 2, 2 3, 2, Empty}").unwrap();
    /// let b = Code::parse("{1 3, 1 2, 1, Empty}").unwrap();
    /// assert!(a.is_isomorphic_to(&b));
    /// ```
    pub fn is_isomorphic_to(&self, other: &Code) -> bool {
        if self.size() != other.size() {
            return false;
        }
        if self == other {
            return true;
        }
        find_isomorphism(self, other).is_some()
    }
}

/// Codes of `candidates` with no isomorphic counterpart in `reference`.
pub fn difference_up_to_isomorphism(reference: &[Code], candidates: &[Code]) -> Vec<Code> {
    candidates
        .iter()
        .filter(|m| !reference.iter().any(|l| l.is_isomorphic_to(m)))
        .cloned()
        .collect()
}

/// One representative per isomorphism class, in first-seen order.
pub fn dedup_up_to_isomorphism<I: IntoIterator<Item = Code>>(codes: I) -> Vec<Code> {
    let mut classes: Vec<Code> = Vec::new();
    for code in codes {
        if !classes.iter().any(|rep| rep.is_isomorphic_to(&code)) {
            classes.push(code);
        }
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(text: &str) -> Code {
        Code::parse(text).unwrap()
    }

    #[test]
    fn test_heap_visits_every_permutation() {
        let mut items = vec![1, 2, 3, 4];
        let mut seen = HashSet::new();
        let stopped = any_permutation(&mut items, |p| {
            seen.insert(p.to_vec());
            false
        });
        assert!(!stopped);
        assert_eq!(seen.len(), 24);

        let mut empty: Vec<u32> = Vec::new();
        let mut calls = 0;
        any_permutation(&mut empty, |_| {
            calls += 1;
            false
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_relabelled_codes_are_isomorphic() {
        let a = code("{1 2, 2 3, 2, Empty}");
        let b = code("{1 3, 1 2, 1, Empty}");
        assert!(a.is_isomorphic_to(&b));
        let map = find_isomorphism(&a, &b).unwrap();
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_non_isomorphic_same_size() {
        let a = code("{1 2, 2 3, 2, Empty}");
        let b = code("{1 2, 3, 2, Empty}");
        assert!(!a.is_isomorphic_to(&b));
        assert!(!b.is_isomorphic_to(&a));
    }

    #[test]
    fn test_size_mismatch_short_circuits() {
        assert!(!code("{1, Empty}").is_isomorphic_to(&code("{1, 2, Empty}")));
    }

    #[test]
    fn test_isomorphic_after_reduction() {
        // Neurons 1 and 2 always fire together on the left.
        let a = code("{1 2, 3, Empty}");
        let b = code("{1, 2, Empty}");
        assert!(a.is_isomorphic_to(&b));
    }

    #[test]
    fn test_difference_and_dedup() {
        let l = vec![code("{1, Empty}")];
        let m = vec![code("{2, Empty}"), code("{1 2, 1, Empty}"), code("{1, 2, Empty}")];
        let diff = difference_up_to_isomorphism(&l, &m);
        assert_eq!(diff.len(), 2);
        assert!(diff.iter().all(|c| c.size() == 3));

        let classes = dedup_up_to_isomorphism(vec![
            code("{1, Empty}"),
            code("{3, Empty}"),
            code("{1, 2, Empty}"),
            code("{2, 1, Empty}"),
        ]);
        assert_eq!(classes.len(), 2);
    }
}
