//! Morphisms induced by trunks, and the image engine.
//!
//! An ordered list of trunks `T[0..k]` defines a map from a code to codes on
//! neurons `1..=k`: a codeword `c` is sent to `{ j + 1 : c ∈ T[j] }`. The same
//! engine serves canonical reduction (with the irreducible trunks) and
//! exhaustive image enumeration (with arbitrary trunk subsets).

use crate::code::Code;
use crate::codeword::{Codeword, MAX_NEURON};
use crate::error::CodeError;
use crate::member_set::MemberSet;
use crate::trunk::TrunkKey;
use std::fmt;

/// Image of every codeword of `code` under `keys`, in codeword order.
///
/// Callers guarantee `keys.len() <= MAX_NEURON`.
pub(crate) fn image_words(code: &Code, keys: &[TrunkKey]) -> Vec<Codeword> {
    let trunks: Vec<MemberSet> = keys
        .iter()
        .map(|key| match key {
            TrunkKey::Subset(s) => code.trunk(s),
            TrunkKey::Empty => MemberSet::new_empty(code.size()),
        })
        .collect();

    (0..code.size())
        .map(|i| {
            let bits = trunks
                .iter()
                .enumerate()
                .filter(|(_, trunk)| trunk.contains(i))
                .fold(0u64, |acc, (j, _)| acc | (1u64 << j));
            Codeword::from_bits(bits)
        })
        .collect()
}

fn check_arity(keys: &[TrunkKey]) -> Result<(), CodeError> {
    if keys.len() > MAX_NEURON as usize {
        return Err(CodeError::invalid_neuron(keys.len()));
    }
    Ok(())
}

/// Explicit codeword-to-codeword map produced by a trunk list.
#[derive(Clone, Debug)]
pub struct Morphism {
    keys: Vec<TrunkKey>,
    pairs: Vec<(Codeword, Codeword)>,
}

impl Morphism {
    /// The trunks defining the map, in target-neuron order.
    pub fn keys(&self) -> &[TrunkKey] {
        &self.keys
    }

    /// Number of target neurons.
    pub fn arity(&self) -> usize {
        self.keys.len()
    }

    /// `(source, image)` pairs in source codeword order.
    pub fn pairs(&self) -> &[(Codeword, Codeword)] {
        &self.pairs
    }

    pub fn apply(&self, word: &Codeword) -> Option<Codeword> {
        self.pairs
            .binary_search_by(|(source, _)| source.cmp(word))
            .ok()
            .map(|i| self.pairs[i].1)
    }

    /// True iff no two codewords share an image.
    pub fn is_injective(&self) -> bool {
        let mut images: Vec<Codeword> = self.pairs.iter().map(|(_, img)| *img).collect();
        images.sort();
        images.windows(2).all(|w| w[0] != w[1])
    }

    /// The image code.
    pub fn image(&self) -> Code {
        Code::new(self.pairs.iter().map(|(_, img)| *img))
    }
}

impl fmt::Display for Morphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .pairs
            .iter()
            .map(|(source, image)| format!("{} -> {}", source, image))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

impl Code {
    /// The map sending each codeword to `{ j + 1 : c ∈ trunk(keys[j]) }`.
    ///
    /// Fails with `InvalidNeuronIndex` when `keys` names more target
    /// neurons than a codeword can hold.
    pub fn morphism(&self, keys: &[TrunkKey]) -> Result<Morphism, CodeError> {
        check_arity(keys)?;
        let images = image_words(self, keys);
        Ok(Morphism {
            keys: keys.to_vec(),
            pairs: self.codewords().iter().copied().zip(images).collect(),
        })
    }

    /// The image code under `keys`, on neurons `1..=keys.len()`.
    pub fn image_under_morphism(&self, keys: &[TrunkKey]) -> Result<Code, CodeError> {
        check_arity(keys)?;
        Ok(Code::new(image_words(self, keys)))
    }

    /// Keys naming each support neuron's own trunk, in ascending order.
    pub fn identity_keys(&self) -> Vec<TrunkKey> {
        self.support()
            .iter()
            .map(|n| TrunkKey::Subset(Codeword::from_bits(1u64 << (n - 1))))
            .collect()
    }
}
