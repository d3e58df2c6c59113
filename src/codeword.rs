//! Codewords: finite sets of active neurons.
//!
//! Representation: one `u64` word, bit `i - 1` set iff neuron `i` is active.
//! Neuron labels are therefore limited to `1..=MAX_NEURON`, which comfortably
//! covers every support size on which trunk tables (2^n entries) and the
//! permutation search (n! candidates) are still tractable.

use crate::error::CodeError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Largest neuron label a codeword can hold.
pub const MAX_NEURON: u32 = 64;

/// Literals accepted for the empty codeword besides the blank string.
const EMPTY_LITERALS: [&str; 2] = ["Empty", "∅"];

/// An immutable set of active neurons.
///
/// Equality and hashing are by value. Ordering places larger codewords first
/// and breaks ties by comparing the space-separated renderings of the sorted
/// neuron lists, so `"1 10"` sorts before `"1 2"`.
///
/// # Examples
///
/// ```
/// use neurocode::Codeword;
///
/// let a = Codeword::from_indices(&[1, 2, 2, 3]).unwrap();
/// let b = Codeword::from_literal("3 2 1").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1 2 3");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<u32>", try_from = "Vec<u32>")]
pub struct Codeword {
    bits: u64,
}

impl Codeword {
    /// The empty codeword.
    pub const EMPTY: Codeword = Codeword { bits: 0 };

    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// Build directly from a neuron mask (bit `i - 1` is neuron `i`).
    pub fn from_bits(bits: u64) -> Self {
        Codeword { bits }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    #[inline]
    fn neuron_bit(neuron: u32) -> Result<u64, CodeError> {
        if neuron == 0 || neuron > MAX_NEURON {
            return Err(CodeError::invalid_neuron(neuron));
        }
        Ok(1u64 << (neuron - 1))
    }

    /// A codeword holding a single neuron.
    pub fn singleton(neuron: u32) -> Result<Self, CodeError> {
        Ok(Codeword {
            bits: Self::neuron_bit(neuron)?,
        })
    }

    /// Build from a sequence of neuron labels. Duplicates collapse.
    pub fn from_indices(neurons: &[u32]) -> Result<Self, CodeError> {
        let mut bits = 0u64;
        for &n in neurons {
            bits |= Self::neuron_bit(n)?;
        }
        Ok(Codeword { bits })
    }

    /// Build from a set of neuron labels.
    pub fn from_set(neurons: &BTreeSet<u32>) -> Result<Self, CodeError> {
        let mut bits = 0u64;
        for &n in neurons {
            bits |= Self::neuron_bit(n)?;
        }
        Ok(Codeword { bits })
    }

    /// Build from signed input, rejecting zero and negative labels.
    pub fn try_from_signed(neurons: &[i64]) -> Result<Self, CodeError> {
        let mut bits = 0u64;
        for &n in neurons {
            let label = u32::try_from(n).map_err(|_| CodeError::invalid_neuron(n))?;
            bits |= Self::neuron_bit(label)?;
        }
        Ok(Codeword { bits })
    }

    /// Parse a whitespace-separated literal such as `"1 2 3"`.
    ///
    /// The blank string, `"Empty"` and `"∅"` denote the empty codeword.
    pub fn from_literal(literal: &str) -> Result<Self, CodeError> {
        let trimmed = literal.trim();
        if trimmed.is_empty() || EMPTY_LITERALS.contains(&trimmed) {
            return Ok(Self::EMPTY);
        }
        let mut bits = 0u64;
        for token in trimmed.split_whitespace() {
            let value: i64 = token
                .parse()
                .map_err(|_| CodeError::invalid_neuron(token))?;
            let label = u32::try_from(value).map_err(|_| CodeError::invalid_neuron(token))?;
            bits |= Self::neuron_bit(label).map_err(|_| CodeError::invalid_neuron(token))?;
        }
        Ok(Codeword { bits })
    }

    /// Number of active neurons.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate active neurons in ascending order.
    pub fn iter(&self) -> Neurons {
        Neurons { remaining: self.bits }
    }

    /// Sorted neuron labels.
    pub fn support(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Highest active neuron, if any.
    pub fn max_neuron(&self) -> Option<u32> {
        if self.bits == 0 {
            None
        } else {
            Some(64 - self.bits.leading_zeros())
        }
    }

    pub fn has_neuron(&self, neuron: u32) -> bool {
        neuron >= 1 && neuron <= MAX_NEURON && self.bits & (1u64 << (neuron - 1)) != 0
    }

    /// A copy with `neuron` activated.
    pub fn add(&self, neuron: u32) -> Result<Self, CodeError> {
        Ok(Codeword {
            bits: self.bits | Self::neuron_bit(neuron)?,
        })
    }

    /// A copy with `neuron` deactivated. Labels outside the valid range are
    /// never present, so removing them is a no-op.
    pub fn remove(&self, neuron: u32) -> Self {
        match Self::neuron_bit(neuron) {
            Ok(bit) => Codeword {
                bits: self.bits & !bit,
            },
            Err(_) => *self,
        }
    }

    /// True iff `other` is a subset of `self`.
    #[inline]
    pub fn contains(&self, other: &Codeword) -> bool {
        other.bits & !self.bits == 0
    }

    #[inline]
    pub fn intersection(&self, other: &Codeword) -> Codeword {
        Codeword {
            bits: self.bits & other.bits,
        }
    }

    #[inline]
    pub fn union(&self, other: &Codeword) -> Codeword {
        Codeword {
            bits: self.bits | other.bits,
        }
    }

    #[inline]
    pub fn difference(&self, other: &Codeword) -> Codeword {
        Codeword {
            bits: self.bits & !other.bits,
        }
    }

    /// Relabel neurons: neuron `i` becomes `images[i - 1]`.
    ///
    /// Neurons without an entry in `images` are dropped.
    pub(crate) fn relabel(&self, images: &[u32]) -> Codeword {
        let mut bits = 0u64;
        for n in self.iter() {
            if let Some(&target) = images.get(n as usize - 1) {
                bits |= 1u64 << (target - 1);
            }
        }
        Codeword { bits }
    }

    /// Rendering without separators, e.g. `"123"`.
    pub fn compact(&self) -> String {
        if self.is_empty() {
            return "Empty".to_string();
        }
        self.iter().map(|n| n.to_string()).collect()
    }

    fn spaced(&self) -> String {
        self.iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ascending iterator over a codeword's neurons.
#[derive(Clone, Debug)]
pub struct Neurons {
    remaining: u64,
}

impl Iterator for Neurons {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        let tz = self.remaining.trailing_zeros();
        self.remaining &= self.remaining - 1;
        Some(tz + 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Neurons {}

impl<'a> IntoIterator for &'a Codeword {
    type Item = u32;
    type IntoIter = Neurons;

    fn into_iter(self) -> Neurons {
        self.iter()
    }
}

impl Ord for Codeword {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.bits == other.bits {
            return Ordering::Equal;
        }
        other
            .len()
            .cmp(&self.len())
            .then_with(|| self.spaced().cmp(&other.spaced()))
    }
}

impl PartialOrd for Codeword {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Empty")
        } else {
            write!(f, "{}", self.spaced())
        }
    }
}

impl fmt::Debug for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Codeword({})", self)
    }
}

impl FromStr for Codeword {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codeword::from_literal(s)
    }
}

impl From<Codeword> for Vec<u32> {
    fn from(word: Codeword) -> Self {
        word.support()
    }
}

impl TryFrom<Vec<u32>> for Codeword {
    type Error = CodeError;

    fn try_from(neurons: Vec<u32>) -> Result<Self, Self::Error> {
        Codeword::from_indices(&neurons)
    }
}
