//! Local obstructions and the three-valued convexity heuristic.
//!
//! Every intersection of maximal codewords whose link is not
//! homologically a point is *mandatory*: a convex realization must contain
//! it as a codeword. A code missing a mandatory codeword has a local
//! obstruction and is certainly not convex. A code containing every
//! intersection of its maximal codewords is certainly convex. Everything in
//! between is inconclusive unless a neuron's link certifies non-convexity.

use crate::code::Code;
use crate::codeword::Codeword;
use crate::homology::{HomologyOracle, SimplicialComplex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict of [`Code::convexity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convexity {
    /// Max-intersection-complete, hence convex.
    Convex,
    /// A local obstruction was found, here or in a link.
    NonConvex,
    /// Neither sufficient condition applies. Not a claim of convexity.
    Inconclusive,
}

impl Convexity {
    /// Numeric form: `1` convex, `0` non-convex, `-1` inconclusive.
    pub fn value(self) -> i8 {
        match self {
            Convexity::Convex => 1,
            Convexity::NonConvex => 0,
            Convexity::Inconclusive => -1,
        }
    }
}

impl fmt::Display for Convexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Convexity::Convex => "convex",
            Convexity::NonConvex => "non-convex",
            Convexity::Inconclusive => "inconclusive",
        };
        write!(f, "{}", label)
    }
}

/// Intersections of maximal codewords split by the topology of their links.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MandatorySplit {
    pub mandatory: Vec<Codeword>,
    pub nonmandatory: Vec<Codeword>,
}

impl Code {
    /// Split the intersections of maximal codewords with a given oracle.
    /// Not cached; see [`Code::mandatory_split`] for the cached form.
    pub fn mandatory_split_with<O: HomologyOracle + ?Sized>(&self, oracle: &O) -> MandatorySplit {
        let mut split = MandatorySplit::default();
        for m in self.max_intersections() {
            let link = self.link(&m);
            let complex = SimplicialComplex::from_facets(link.codewords().iter().copied());
            if oracle.has_point_homology(&complex) {
                split.nonmandatory.push(m);
            } else {
                split.mandatory.push(m);
            }
        }
        tracing::debug!(
            mandatory = split.mandatory.len(),
            nonmandatory = split.nonmandatory.len(),
            "split max intersections"
        );
        split
    }

    /// Intersections that every convex realization must contain.
    pub fn mandatory_codewords(&self) -> &[Codeword] {
        &self.mandatory_split().mandatory
    }

    /// Intersections whose links are homologically points.
    pub fn nonmandatory_intersections(&self) -> &[Codeword] {
        &self.mandatory_split().nonmandatory
    }

    /// True iff some mandatory codeword is not a codeword.
    pub fn has_local_obstructions(&self) -> bool {
        self.mandatory_codewords()
            .iter()
            .any(|m| !self.contains_codeword(m))
    }

    pub fn has_local_obstructions_with<O: HomologyOracle + ?Sized>(&self, oracle: &O) -> bool {
        self.mandatory_split_with(oracle)
            .mandatory
            .iter()
            .any(|m| !self.contains_codeword(m))
    }

    /// Three-valued convexity test.
    ///
    /// `Convex` if max-intersection-complete; `NonConvex` if a mandatory
    /// codeword is missing here or, recursively, in the link of a neuron
    /// whose trunk is not the whole code; `Inconclusive` otherwise.
    pub fn convexity(&self) -> Convexity {
        self.convexity_by(&|code: &Code| code.has_local_obstructions())
    }

    pub fn convexity_with<O: HomologyOracle + ?Sized>(&self, oracle: &O) -> Convexity {
        self.convexity_by(&|code: &Code| code.has_local_obstructions_with(oracle))
    }

    fn convexity_by(&self, obstructed: &dyn Fn(&Code) -> bool) -> Convexity {
        if self.is_max_intersection_complete() {
            return Convexity::Convex;
        }
        if obstructed(self) {
            return Convexity::NonConvex;
        }
        for i in self.support().iter() {
            let neuron = Codeword::from_bits(1u64 << (i - 1));
            if self.trunk(&neuron).is_full() {
                continue;
            }
            if self.link(&neuron).convexity_by(obstructed) == Convexity::NonConvex {
                tracing::trace!(neuron = i, "link certifies non-convexity");
                return Convexity::NonConvex;
            }
        }
        Convexity::Inconclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homology::{IntegralHomology, ReducedHomology};

    fn code(literals: &[&str]) -> Code {
        Code::from_literals(literals).unwrap()
    }

    fn cw(neurons: &[u32]) -> Codeword {
        Codeword::from_indices(neurons).unwrap()
    }

    #[test]
    fn test_convexity_values() {
        assert_eq!(Convexity::Convex.value(), 1);
        assert_eq!(Convexity::NonConvex.value(), 0);
        assert_eq!(Convexity::Inconclusive.value(), -1);
        assert_eq!(Convexity::Inconclusive.to_string(), "inconclusive");
    }

    #[test]
    fn test_missing_empty_codeword_in_disconnected_code() {
        // Two disjoint maximal codewords: the link of the empty set is two
        // points, so the empty codeword is mandatory.
        let c = code(&["1 2", "3"]);
        assert_eq!(c.mandatory_codewords(), &[Codeword::EMPTY]);
        assert!(c.has_local_obstructions());
        assert_eq!(c.convexity(), Convexity::NonConvex);
    }

    #[test]
    fn test_nonmandatory_intersection() {
        // 2 = 12 ∩ 23; its link {1, 3} is two points, so 2 is mandatory.
        let c = code(&["1 2", "2 3", ""]);
        assert_eq!(c.mandatory_codewords(), &[cw(&[2])]);
        assert!(c.has_local_obstructions());

        // 23 = 123 ∩ 234 has link {1, 4}.
        let c = code(&["1 2 3", "2 3 4", "1 2", "2", ""]);
        assert!(c.mandatory_codewords().contains(&cw(&[2, 3])));
        assert!(c.has_local_obstructions());
    }

    #[test]
    fn test_contractible_link_is_nonmandatory() {
        // The only missing intersection, 1 = 123 ∩ 145, has the path
        // 23 - 34 - 45 as its link.
        let c = code(&[
            "2 3 4 5", "1 2 3", "1 3 4", "1 4 5", "1 3", "1 4", "2 3", "3 4", "4 5", "3",
            "4", "",
        ]);
        assert!(c.nonmandatory_intersections().contains(&cw(&[1])));
        assert!(!c.mandatory_codewords().contains(&cw(&[1])));
        assert!(!c.has_local_obstructions());
        assert_eq!(c.missing_max_intersections(), vec![cw(&[1])]);
        assert_eq!(c.convexity(), Convexity::Inconclusive);
        assert_eq!(c.convexity().value(), -1);
    }

    #[test]
    fn test_max_intersection_complete_is_convex() {
        let c = code(&["1 2", "2 3", "2", ""]);
        assert!(c.is_max_intersection_complete());
        assert_eq!(c.convexity(), Convexity::Convex);
        assert_eq!(code(&[""]).convexity(), Convexity::Convex);
    }

    #[test]
    fn test_obstruction_seen_in_neuron_link() {
        // 24 = 124 ∩ 234 is missing; in the link of 4 it shows up as the
        // missing intersection 2 of 12 and 23.
        let c = code(&["1 2 4", "2 3 4", "4", "1", "3", ""]);
        assert!(c.has_local_obstructions());
        assert!(c.has_local_obstructions_with(&IntegralHomology));
        let link = c.link(&cw(&[4]));
        assert_eq!(link, code(&["1 2", "2 3", ""]));
        assert!(link.has_local_obstructions());
        assert_eq!(c.convexity(), Convexity::NonConvex);
        assert_eq!(c.convexity_with(&IntegralHomology), Convexity::NonConvex);
    }

    struct AlwaysTrivial;

    impl HomologyOracle for AlwaysTrivial {
        fn reduced_homology(&self, _complex: &SimplicialComplex) -> ReducedHomology {
            ReducedHomology::default()
        }

        fn has_point_homology(&self, _complex: &SimplicialComplex) -> bool {
            true
        }
    }

    #[test]
    fn test_custom_oracle() {
        let c = code(&["1 2", "3"]);
        let split = c.mandatory_split_with(&AlwaysTrivial);
        assert!(split.mandatory.is_empty());
        assert_eq!(split.nonmandatory, vec![Codeword::EMPTY]);
        assert!(!c.has_local_obstructions_with(&AlwaysTrivial));
        assert_eq!(c.convexity_with(&AlwaysTrivial), Convexity::Inconclusive);
    }
}
