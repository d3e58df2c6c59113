//! Trunk tables.
//!
//! The trunk of a neuron subset `s` is the set of codewords whose support
//! contains `s`. A code's [`TrunkTable`] stores the trunk of every subset of
//! its support, 2^|support| entries in all, built incrementally: the trunk of
//! a subset is the trunk of the subset without its lowest neuron intersected
//! with that neuron's singleton trunk.
//!
//! The table is only materialised for supports of at most
//! [`MAX_TRUNK_SUPPORT`] neurons. Single trunks never need it: see
//! [`Code::trunk`](crate::Code::trunk).

use crate::codeword::Codeword;
use crate::error::CodeError;
use crate::member_set::MemberSet;
use std::fmt;

/// Largest support a [`TrunkTable`] is built for: 2^20 entries.
pub const MAX_TRUNK_SUPPORT: usize = 20;

/// One entry of a morphism: either a trunk named by its neuron subset, or
/// the empty trunk, which contains no codeword and so never contributes a
/// neuron to any image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrunkKey {
    Subset(Codeword),
    Empty,
}

impl TrunkKey {
    pub fn neuron(neuron: u32) -> Result<Self, crate::CodeError> {
        Ok(TrunkKey::Subset(Codeword::singleton(neuron)?))
    }

    pub fn subset(&self) -> Option<&Codeword> {
        match self {
            TrunkKey::Subset(s) => Some(s),
            TrunkKey::Empty => None,
        }
    }
}

impl From<Codeword> for TrunkKey {
    fn from(s: Codeword) -> Self {
        TrunkKey::Subset(s)
    }
}

impl fmt::Display for TrunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrunkKey::Subset(s) => write!(f, "Tk({})", s),
            TrunkKey::Empty => write!(f, "Tk(none)"),
        }
    }
}

/// Trunks of every subset of a support set.
#[derive(Clone, Debug)]
pub struct TrunkTable {
    support: Vec<u32>,
    /// Indexed by subset masks local to `support` (bit `p` is `support[p]`).
    entries: Vec<MemberSet>,
}

impl TrunkTable {
    /// Build the table for `codewords` over `support`.
    ///
    /// Memory is 2^|support| member sets, so supports larger than
    /// [`MAX_TRUNK_SUPPORT`] fail with [`CodeError::EnumerationTooLarge`]
    /// before anything is allocated.
    pub fn build(codewords: &[Codeword], support: &Codeword) -> Result<Self, CodeError> {
        let support_neurons = support.support();
        let k = support_neurons.len();
        if k > MAX_TRUNK_SUPPORT {
            return Err(CodeError::EnumerationTooLarge {
                required: k,
                limit: MAX_TRUNK_SUPPORT,
            });
        }
        let n = codewords.len();

        let singletons: Vec<MemberSet> = support_neurons
            .iter()
            .map(|&neuron| {
                let mut members = MemberSet::new_empty(n);
                for (i, c) in codewords.iter().enumerate() {
                    if c.has_neuron(neuron) {
                        members.insert(i);
                    }
                }
                members
            })
            .collect();

        let size = 1usize << k;
        let mut entries = Vec::with_capacity(size);
        entries.push(MemberSet::new_full(n));
        for mask in 1..size {
            let low = mask.trailing_zeros() as usize;
            let rest = mask & (mask - 1);
            let trunk = entries[rest].intersection(&singletons[low]);
            entries.push(trunk);
        }

        tracing::trace!(support = k, entries = size, "built trunk table");

        Ok(TrunkTable {
            support: support_neurons,
            entries,
        })
    }

    /// Number of entries, always 2^|support|.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn support(&self) -> &[u32] {
        &self.support
    }

    fn local_mask(&self, key: &Codeword) -> Option<usize> {
        let mut local = 0usize;
        let mut seen = 0usize;
        for (p, &neuron) in self.support.iter().enumerate() {
            if key.has_neuron(neuron) {
                local |= 1usize << p;
                seen += 1;
            }
        }
        (seen == key.len()).then_some(local)
    }

    fn key_for(&self, local: usize) -> Codeword {
        let mut bits = 0u64;
        for (p, &neuron) in self.support.iter().enumerate() {
            if local & (1usize << p) != 0 {
                bits |= 1u64 << (neuron - 1);
            }
        }
        Codeword::from_bits(bits)
    }

    /// Trunk of `key`, or `None` when `key` is not a subset of the support.
    pub fn get(&self, key: &Codeword) -> Option<&MemberSet> {
        self.local_mask(key).map(|local| &self.entries[local])
    }

    /// Every `(subset, trunk)` pair, in increasing local-mask order.
    pub fn iter(&self) -> impl Iterator<Item = (Codeword, &MemberSet)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(move |(local, trunk)| (self.key_for(local), trunk))
    }

    /// One `(subset, trunk)` pair per distinct trunk value, keeping the
    /// first subset that produced it.
    pub fn distinct(&self) -> Vec<(Codeword, &MemberSet)> {
        let mut seen = std::collections::HashSet::new();
        self.iter().filter(|(_, trunk)| seen.insert(*trunk)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(literals: &[&str]) -> Vec<Codeword> {
        let mut out: Vec<Codeword> = literals
            .iter()
            .map(|l| Codeword::from_literal(l).unwrap())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_table_size_and_empty_subset() {
        let cws = words(&["1 2", "2 3", "3"]);
        let support = Codeword::from_indices(&[1, 2, 3]).unwrap();
        let table = TrunkTable::build(&cws, &support).unwrap();
        assert_eq!(table.len(), 8);
        assert!(table.get(&Codeword::EMPTY).unwrap().is_full());
    }

    #[test]
    fn test_trunk_values() {
        // sorted: [12, 23, 3]
        let cws = words(&["1 2", "2 3", "3"]);
        let support = Codeword::from_indices(&[1, 2, 3]).unwrap();
        let table = TrunkTable::build(&cws, &support).unwrap();
        let t2 = table.get(&Codeword::from_indices(&[2]).unwrap()).unwrap();
        assert_eq!(t2.iter().collect::<Vec<_>>(), vec![0, 1]);
        let t3 = table.get(&Codeword::from_indices(&[3]).unwrap()).unwrap();
        assert_eq!(t3.iter().collect::<Vec<_>>(), vec![1, 2]);
        let t13 = table.get(&Codeword::from_indices(&[1, 3]).unwrap()).unwrap();
        assert!(t13.is_empty());
    }

    #[test]
    fn test_keys_outside_support_are_absent() {
        let cws = words(&["1 2"]);
        let support = Codeword::from_indices(&[1, 2]).unwrap();
        let table = TrunkTable::build(&cws, &support).unwrap();
        assert!(table.get(&Codeword::from_indices(&[3]).unwrap()).is_none());
        assert!(table.get(&Codeword::from_indices(&[1, 3]).unwrap()).is_none());
    }

    #[test]
    fn test_iter_keys_round_trip() {
        let cws = words(&["1 4", "4"]);
        let support = Codeword::from_indices(&[1, 4]).unwrap();
        let table = TrunkTable::build(&cws, &support).unwrap();
        let keys: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["Empty", "1", "4", "1 4"]);
        for (key, trunk) in table.iter() {
            assert_eq!(table.get(&key), Some(trunk));
        }
        // Tk(1) == Tk(1 4), Tk(Empty) == Tk(4)
        assert_eq!(table.distinct().len(), 2);
    }

    #[test]
    fn test_empty_support() {
        let cws = words(&[""]);
        let table = TrunkTable::build(&cws, &Codeword::EMPTY).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.support(), &[] as &[u32]);
    }

    #[test]
    fn test_oversized_support_is_rejected() {
        let all: Vec<u32> = (1..=64).collect();
        let cws = vec![Codeword::from_indices(&all).unwrap(), Codeword::EMPTY];
        let support = cws[0];
        assert_eq!(
            TrunkTable::build(&cws, &support).err(),
            Some(CodeError::EnumerationTooLarge {
                required: 64,
                limit: MAX_TRUNK_SUPPORT
            })
        );
    }

    #[test]
    fn test_trunk_key_display() {
        assert_eq!(TrunkKey::neuron(3).unwrap().to_string(), "Tk(3)");
        assert_eq!(TrunkKey::Empty.to_string(), "Tk(none)");
        assert!(TrunkKey::Empty.subset().is_none());
    }
}
