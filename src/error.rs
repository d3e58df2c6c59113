//! Error types for codeword and code construction and enumeration.

use std::fmt;

/// Errors raised while building codewords, codes, morphism images or
/// enumerations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// An element is not a neuron label in `1..=MAX_NEURON`.
    InvalidNeuronIndex {
        /// The offending element as it was supplied.
        value: String,
    },
    /// The input could not be read as a collection of codewords.
    InvalidCodewordCollection {
        /// What was wrong with the input.
        reason: String,
    },
    /// An enumeration would exceed its configured bound.
    EnumerationTooLarge {
        /// The size the request needs.
        required: usize,
        /// The largest size allowed.
        limit: usize,
    },
}

impl CodeError {
    pub(crate) fn invalid_neuron(value: impl fmt::Display) -> Self {
        CodeError::InvalidNeuronIndex {
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_collection(reason: impl Into<String>) -> Self {
        CodeError::InvalidCodewordCollection {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeError::InvalidNeuronIndex { value } => {
                write!(
                    f,
                    "invalid neuron index {:?}: expected an integer in 1..={}",
                    value,
                    crate::codeword::MAX_NEURON
                )
            }
            CodeError::InvalidCodewordCollection { reason } => {
                write!(f, "invalid codeword collection: {}", reason)
            }
            CodeError::EnumerationTooLarge { required, limit } => {
                write!(f, "enumeration too large: needs {} but the limit is {}", required, limit)
            }
        }
    }
}

impl std::error::Error for CodeError {}

impl From<CodeError> for std::io::Error {
    fn from(err: CodeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    }
}
