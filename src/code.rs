//! Neural codes and their cached derived structures.
//!
//! A [`Code`] is an immutable set of distinct [`Codeword`]s. Everything else
//! (inclusion poset, support, trunk table, irreducible trunks, reduced form,
//! mandatory split) is computed on first request and kept in a
//! single-assignment [`OnceLock`] cell for the lifetime of the value, so a
//! code can be shared freely once built.
//!
//! Morphisms, isomorphism and the convexity heuristic extend `Code` from
//! their own modules.

use crate::codeword::Codeword;
use crate::convexity::MandatorySplit;
use crate::error::CodeError;
use crate::homology::{HomologyOracle, IntegralHomology, SimplicialComplex};
use crate::member_set::MemberSet;
use crate::morphism;
use crate::poset::Poset;
use crate::trunk::{TrunkKey, TrunkTable};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Clone, Default)]
struct Cache {
    poset: OnceLock<Poset>,
    maximal: OnceLock<Vec<Codeword>>,
    support: OnceLock<Codeword>,
    trunks: OnceLock<Result<TrunkTable, CodeError>>,
    irreducible: OnceLock<Vec<TrunkKey>>,
    reduced: OnceLock<Box<Code>>,
    mandatory: OnceLock<MandatorySplit>,
}

/// A finite set of distinct codewords.
///
/// Codewords are kept sorted by the codeword order (larger first), which is
/// also the order used for display.
///
/// # Examples
///
/// ```
/// use neurocode::Code;
///
/// let code = Code::from_literals(&["", "1", "1 2", "2 3", "3"]).unwrap();
/// assert_eq!(code.size(), 5);
/// assert!(!code.is_simplicial_complex());
/// assert_eq!(code.to_string(), "{1 2, 2 3, 1, 3, Empty}");
/// ```
#[derive(Clone)]
pub struct Code {
    words: Vec<Codeword>,
    /// Set only on values produced by [`Code::reduced`].
    reduced: bool,
    cache: Cache,
}

impl Code {
    /// Build a code from codewords; duplicates collapse.
    pub fn new<I: IntoIterator<Item = Codeword>>(codewords: I) -> Self {
        Self::from_parts(codewords, false)
    }

    pub(crate) fn from_parts<I: IntoIterator<Item = Codeword>>(codewords: I, reduced: bool) -> Self {
        let mut words: Vec<Codeword> = codewords.into_iter().collect();
        words.sort();
        words.dedup();
        Code {
            words,
            reduced,
            cache: Cache::default(),
        }
    }

    /// Build from whitespace-separated literals such as `["1 2", "3", ""]`.
    pub fn from_literals<S: AsRef<str>>(literals: &[S]) -> Result<Self, CodeError> {
        let words = literals
            .iter()
            .map(|l| Codeword::from_literal(l.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(words))
    }

    /// Build from neuron lists such as `[[1, 2], [3], []]`.
    pub fn from_indices<V: AsRef<[u32]>>(lists: &[V]) -> Result<Self, CodeError> {
        let words = lists
            .iter()
            .map(|l| Codeword::from_indices(l.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(words))
    }

    pub fn from_sets(sets: &[BTreeSet<u32>]) -> Result<Self, CodeError> {
        let words = sets
            .iter()
            .map(Codeword::from_set)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(words))
    }

    /// Parse the display format, e.g. `"{1 2, 2 3, Empty}"`.
    ///
    /// Braces are optional; codewords are separated by commas and a blank
    /// entry is the empty codeword. `"{}"` is the code with no codewords.
    pub fn parse(input: &str) -> Result<Self, CodeError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CodeError::invalid_collection(
                "no codewords given; use {} for the empty code or Empty for the empty codeword",
            ));
        }
        let inner = match (trimmed.strip_prefix('{'), trimmed.ends_with('}')) {
            (Some(rest), true) => &rest[..rest.len() - 1],
            (None, false) => trimmed,
            _ => {
                return Err(CodeError::invalid_collection(format!(
                    "unbalanced braces in {:?}",
                    trimmed
                )))
            }
        };
        if inner.contains(['{', '}']) {
            return Err(CodeError::invalid_collection(format!(
                "nested braces in {:?}",
                trimmed
            )));
        }
        if inner.trim().is_empty() {
            return Ok(Self::new(std::iter::empty()));
        }
        let words = inner
            .split(',')
            .map(Codeword::from_literal)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(words))
    }

    pub fn codewords(&self) -> &[Codeword] {
        &self.words
    }

    /// Number of codewords.
    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains_codeword(&self, word: &Codeword) -> bool {
        self.words.binary_search(word).is_ok()
    }

    /// Inclusion order over the codewords.
    pub fn poset(&self) -> &Poset {
        self.cache.poset.get_or_init(|| Poset::new(&self.words))
    }

    /// Codewords not properly contained in another codeword.
    pub fn maximal_codewords(&self) -> &[Codeword] {
        self.cache
            .maximal
            .get_or_init(|| self.poset().maximal_elements())
    }

    /// Union of the maximal codewords.
    pub fn support(&self) -> Codeword {
        *self.cache.support.get_or_init(|| {
            self.maximal_codewords()
                .iter()
                .fold(Codeword::EMPTY, |acc, m| acc.union(m))
        })
    }

    /// Downward closure of the maximal codewords.
    pub fn simplicial_closure(&self) -> Code {
        let mut faces: HashSet<u64> = HashSet::new();
        for m in self.maximal_codewords() {
            let full = m.bits();
            let mut sub = full;
            loop {
                faces.insert(sub);
                if sub == 0 {
                    break;
                }
                sub = (sub - 1) & full;
            }
        }
        Code::new(faces.into_iter().map(Codeword::from_bits))
    }

    /// True iff the code equals its simplicial closure.
    ///
    /// Checked as closure under removing one neuron at a time, which for a
    /// non-empty code also forces the empty codeword to be present.
    pub fn is_simplicial_complex(&self) -> bool {
        self.words.iter().all(|c| {
            c.iter()
                .all(|n| self.contains_codeword(&c.remove(n)))
        })
    }

    /// True iff the intersection of any two codewords is a codeword.
    pub fn is_intersection_complete(&self) -> bool {
        let present: HashSet<u64> = self.words.iter().map(|c| c.bits()).collect();
        for (i, a) in self.words.iter().enumerate() {
            for b in &self.words[i + 1..] {
                if !present.contains(&a.intersection(b).bits()) {
                    return false;
                }
            }
        }
        true
    }

    /// Distinct intersections of two or more maximal codewords, sorted.
    ///
    /// Intersections of a single maximal codeword are the maximal codewords
    /// themselves and are always present, so they are left out.
    pub fn max_intersections(&self) -> Vec<Codeword> {
        let maximal = self.maximal_codewords();
        let mut found: BTreeSet<Codeword> = BTreeSet::new();
        let mut frontier: Vec<Codeword> = Vec::new();
        for (i, a) in maximal.iter().enumerate() {
            for b in &maximal[i + 1..] {
                let both = a.intersection(b);
                if found.insert(both) {
                    frontier.push(both);
                }
            }
        }
        while let Some(current) = frontier.pop() {
            for m in maximal {
                let next = current.intersection(m);
                if found.insert(next) {
                    frontier.push(next);
                }
            }
        }
        found.into_iter().collect()
    }

    /// Intersections of maximal codewords that are not codewords.
    pub fn missing_max_intersections(&self) -> Vec<Codeword> {
        self.max_intersections()
            .into_iter()
            .filter(|m| !self.contains_codeword(m))
            .collect()
    }

    pub fn is_max_intersection_complete(&self) -> bool {
        self.missing_max_intersections().is_empty()
    }

    /// Trunks of every subset of the support.
    ///
    /// Fails with [`CodeError::EnumerationTooLarge`] when the support has
    /// more than [`MAX_TRUNK_SUPPORT`](crate::trunk::MAX_TRUNK_SUPPORT)
    /// neurons.
    pub fn trunks(&self) -> Result<&TrunkTable, CodeError> {
        self.cache
            .trunks
            .get_or_init(|| TrunkTable::build(&self.words, &self.support()))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Indices of the codewords containing `s`; empty when `s` is not a
    /// subset of the support.
    pub fn trunk(&self, s: &Codeword) -> MemberSet {
        let mut members = MemberSet::new_empty(self.size());
        for (i, c) in self.words.iter().enumerate() {
            if c.contains(s) {
                members.insert(i);
            }
        }
        members
    }

    /// Codewords containing `s`.
    pub fn trunk_codewords(&self, s: &Codeword) -> Vec<Codeword> {
        self.words.iter().filter(|c| c.contains(s)).copied().collect()
    }

    /// The codewords of `trunk(s)` with `s` removed.
    pub fn link(&self, s: &Codeword) -> Code {
        Code::new(
            self.trunk_codewords(s)
                .into_iter()
                .map(|c| c.difference(s)),
        )
    }

    /// Complex whose facets are the maximal codewords.
    pub fn simplicial_complex(&self) -> SimplicialComplex {
        SimplicialComplex::from_facets(self.maximal_codewords().iter().copied())
    }

    /// True iff the complex of the maximal codewords is connected.
    pub fn connected(&self) -> bool {
        IntegralHomology.component_count(&self.simplicial_complex()) <= 1
    }

    /// True iff some neuron's trunk equals the trunk of a subset of the
    /// support that does not contain it.
    ///
    /// The empty subset catches neurons active in every codeword; singleton
    /// subsets catch neurons with identical trunks. Any such subset lies
    /// inside the neurons shared by the whole trunk, and that largest
    /// candidate has the smallest trunk, so it is the only one checked.
    pub fn has_redundancies(&self) -> bool {
        let support = self.support();
        support.iter().any(|i| {
            let own = self.trunk(&Codeword::from_bits(1u64 << (i - 1)));
            let shared = self.shared_by(&own, support).remove(i);
            self.trunk(&shared) == own
        })
    }

    /// Neurons common to every codeword of `members`, within `support`.
    fn shared_by(&self, members: &MemberSet, support: Codeword) -> Codeword {
        members
            .iter()
            .fold(support, |acc, idx| acc.intersection(&self.words[idx]))
    }

    /// Singleton trunks that cannot be obtained by intersecting strictly
    /// larger singleton trunks, one per distinct trunk value.
    ///
    /// For each neuron `i` with trunk `T`, let `s` be the neurons shared by
    /// every codeword of `T`, minus `i`. `T` is reducible when some
    /// `ss ⊆ s` and `j ∈ s \ ss` have `Tk(j) != T`, `Tk(ss) != T` and
    /// `Tk(ss ∪ {j}) == T`. Trunks equal to the whole code belong to
    /// neurons that carry no information and are dropped as well.
    pub fn irreducible_trunks(&self) -> &[TrunkKey] {
        self.cache.irreducible.get_or_init(|| {
            let support = self.support();
            let mut kept: Vec<(u32, MemberSet)> = Vec::new();

            for i in support.iter() {
                let own = self.trunk(&Codeword::from_bits(1u64 << (i - 1)));
                if own.is_full() || kept.iter().any(|(_, t)| *t == own) {
                    continue;
                }
                let shared = self.shared_by(&own, support).remove(i);
                if self.is_reducible(&own, &shared) {
                    continue;
                }
                kept.push((i, own));
            }

            tracing::debug!(
                support = support.len(),
                irreducible = kept.len(),
                "computed irreducible trunks"
            );

            kept.into_iter()
                .map(|(i, _)| TrunkKey::Subset(Codeword::from_bits(1u64 << (i - 1))))
                .collect()
        })
    }

    /// True iff the code is its own reduced form.
    ///
    /// A code without redundant neurons still fails this when its support is
    /// not already `1..=k`; `{2, Empty}` reduces to `{1, Empty}`.
    pub fn is_reduced(&self) -> bool {
        self.reduced || self.reduced() == self
    }

    /// Canonical reduced representative: the image under the irreducible
    /// trunks, relabelled `1..=k`.
    pub fn reduced(&self) -> &Code {
        if self.reduced {
            return self;
        }
        self.cache.reduced.get_or_init(|| {
            let keys = self.irreducible_trunks();
            let images = morphism::image_words(self, keys);
            Box::new(Code::from_parts(images, true))
        })
    }

    /// Witness search for [`Code::irreducible_trunks`].
    ///
    /// A witness `(ss, j)` never uses a neuron whose own trunk is `target`:
    /// as `j` it is excluded outright, and inside `ss` it would force
    /// `Tk(ss) == target`. The remaining shared neurons hold a witness
    /// exactly when their joint trunk is `target`: any minimal subset of
    /// them with that trunk splits into `ss` and `j`.
    fn is_reducible(&self, target: &MemberSet, shared: &Codeword) -> bool {
        let candidates = shared
            .iter()
            .filter(|&j| self.trunk(&Codeword::from_bits(1u64 << (j - 1))) != *target)
            .fold(Codeword::EMPTY, |acc, j| acc.union(&Codeword::from_bits(1u64 << (j - 1))));
        !candidates.is_empty() && self.trunk(&candidates) == *target
    }

    /// Mandatory / nonmandatory split under the built-in homology oracle.
    pub fn mandatory_split(&self) -> &MandatorySplit {
        self.cache
            .mandatory
            .get_or_init(|| self.mandatory_split_with(&IntegralHomology))
    }

    /// Rendering with each codeword written without spaces, e.g. `{12, 3}`.
    pub fn compact(&self) -> String {
        let parts: Vec<String> = self.words.iter().map(|c| c.compact()).collect();
        format!("{{{}}}", parts.join(", "))
    }
}

impl PartialEq for Code {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
    }
}

impl Eq for Code {}

impl Hash for Code {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.words.hash(state);
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.words.iter().map(|c| c.to_string()).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code{}", self)
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Code::parse(s)
    }
}
