//! Neurocode - Combinatorial Neural Codes
//!
//! Copyright (c) 2025 Neurocode Contributors
//! Licensed under MIT License
//!
//! A neural code is a finite set of codewords, each codeword being the set
//! of neurons active together. This crate classifies codes structurally:
//! simplicial complexes, intersection completeness, local obstructions to
//! convex realizability, canonical reduction through irreducible trunks,
//! and isomorphism up to relabelling of neurons.

pub mod code;
pub mod codeword;
pub mod convexity;
pub mod enumerate;
pub mod error;
pub mod homology;
pub mod isomorphism;
pub mod member_set;
pub mod morphism;
pub mod poset;
pub mod report;
pub mod trunk;
pub mod cli;

// Re-export main types for convenience
pub use code::Code;
pub use codeword::{Codeword, MAX_NEURON};
pub use convexity::{Convexity, MandatorySplit};
pub use enumerate::{codes_on, images, random_code, EnumerationConfig, MAX_IMAGE_TRUNKS};
pub use error::CodeError;
pub use homology::{
    HomologyGroup, HomologyOracle, IntegralHomology, ReducedHomology, SimplicialComplex,
};
pub use isomorphism::{dedup_up_to_isomorphism, difference_up_to_isomorphism, find_isomorphism};
pub use member_set::MemberSet;
pub use morphism::Morphism;
pub use poset::Poset;
pub use report::CodeReport;
pub use trunk::{TrunkKey, TrunkTable, MAX_TRUNK_SUPPORT};
