//! Enumeration driver: every code on a few neurons, every image of a code,
//! and seeded random codes.
//!
//! All three are exhaustive over a power set and therefore bounded; requests
//! past the bounds fail with [`CodeError::EnumerationTooLarge`] instead of
//! running for hours.

use crate::code::Code;
use crate::codeword::Codeword;
use crate::error::CodeError;
use crate::isomorphism::dedup_up_to_isomorphism;
use crate::trunk::TrunkKey;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Largest neuron count [`codes_on`] accepts: 2^(2^4) candidate codes.
pub const MAX_ENUMERATION_NEURONS: u32 = 4;

/// Largest neuron count [`random_code`] accepts.
pub const MAX_RANDOM_NEURONS: u32 = 16;

/// Most trunks [`images`] takes subsets of, whatever the config allows.
pub const MAX_IMAGE_TRUNKS: usize = 63;

/// Knobs for [`codes_on`] and [`images`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationConfig {
    /// Codes are built on neurons `1..=neurons`, each of which must occur.
    pub neurons: u32,
    /// Keep only codes whose maximal-codeword complex is connected.
    pub require_connected: bool,
    /// Drop codes with redundant neurons.
    pub skip_redundant: bool,
    /// Keep only codes containing the empty codeword.
    pub include_empty: bool,
    /// Stop after this many classes.
    pub max_images: Option<usize>,
    /// Most distinct trunks [`images`] will take subsets of; never more
    /// than [`MAX_IMAGE_TRUNKS`].
    pub max_trunks: usize,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        EnumerationConfig {
            neurons: 3,
            require_connected: false,
            skip_redundant: true,
            include_empty: true,
            max_images: None,
            max_trunks: 16,
        }
    }
}

impl EnumerationConfig {
    /// Two neurons, capped output; quick enough for interactive use.
    pub fn small() -> Self {
        EnumerationConfig {
            neurons: 2,
            max_images: Some(64),
            max_trunks: 10,
            ..Self::default()
        }
    }

    /// Four neurons, redundant codes kept, nothing capped.
    pub fn exhaustive() -> Self {
        EnumerationConfig {
            neurons: MAX_ENUMERATION_NEURONS,
            skip_redundant: false,
            max_images: None,
            max_trunks: 20,
            ..Self::default()
        }
    }

    fn accepts(&self, code: &Code) -> bool {
        if self.skip_redundant && code.has_redundancies() {
            return false;
        }
        if self.require_connected && !code.connected() {
            return false;
        }
        true
    }

    fn reached_cap(&self, found: usize) -> bool {
        self.max_images.map_or(false, |cap| found >= cap)
    }
}

/// One representative per isomorphism class of the codes on
/// `1..=config.neurons` that pass the config's filters.
pub fn codes_on(config: &EnumerationConfig) -> Result<Vec<Code>, CodeError> {
    if config.neurons > MAX_ENUMERATION_NEURONS {
        return Err(CodeError::EnumerationTooLarge {
            required: config.neurons as usize,
            limit: MAX_ENUMERATION_NEURONS as usize,
        });
    }

    let full = (1u64 << config.neurons) - 1;
    let words: Vec<Codeword> = (0..=full).map(Codeword::from_bits).collect();
    let choices = 1u64 << words.len();
    let mut classes: Vec<Code> = Vec::new();
    let mut examined = 0usize;

    for choice in 0..choices {
        // bit 0 picks the empty codeword
        if config.include_empty && choice & 1 == 0 {
            continue;
        }
        let code = Code::new(
            words
                .iter()
                .enumerate()
                .filter(|(w, _)| choice & (1u64 << w) != 0)
                .map(|(_, c)| *c),
        );
        if code.support().bits() != full || !config.accepts(&code) {
            continue;
        }
        examined += 1;
        if !classes.iter().any(|rep| rep.is_isomorphic_to(&code)) {
            classes.push(code);
            if config.reached_cap(classes.len()) {
                break;
            }
        }
    }

    tracing::debug!(
        neurons = config.neurons,
        examined,
        classes = classes.len(),
        "enumerated codes"
    );
    Ok(classes)
}

/// One representative per isomorphism class of the images of `code` under
/// every subset of its distinct non-empty trunks.
///
/// The empty subset contributes the code `{Empty}`.
pub fn images(code: &Code, config: &EnumerationConfig) -> Result<Vec<Code>, CodeError> {
    let keys: Vec<TrunkKey> = code
        .trunks()?
        .distinct()
        .into_iter()
        .filter(|(_, trunk)| !trunk.is_empty())
        .map(|(s, _)| TrunkKey::Subset(s))
        .collect();
    let limit = config.max_trunks.min(MAX_IMAGE_TRUNKS);
    if keys.len() > limit {
        return Err(CodeError::EnumerationTooLarge {
            required: keys.len(),
            limit,
        });
    }

    let mut classes: Vec<Code> = Vec::new();
    let mut chosen: Vec<TrunkKey> = Vec::with_capacity(keys.len());
    for subset in 0..(1u64 << keys.len()) {
        chosen.clear();
        chosen.extend(
            keys.iter()
                .enumerate()
                .filter(|(k, _)| subset & (1u64 << k) != 0)
                .map(|(_, key)| *key),
        );
        let image = code.image_under_morphism(&chosen)?;
        if !classes.iter().any(|rep| rep.is_isomorphic_to(&image)) {
            classes.push(image);
            if config.reached_cap(classes.len()) {
                break;
            }
        }
    }

    tracing::debug!(
        trunks = keys.len(),
        classes = classes.len(),
        "enumerated images"
    );
    Ok(classes)
}

/// Codes of `candidates` not isomorphic to one already kept, then those
/// of `reference` removed.
pub fn new_classes(reference: &[Code], candidates: Vec<Code>) -> Vec<Code> {
    let classes = dedup_up_to_isomorphism(candidates);
    crate::isomorphism::difference_up_to_isomorphism(reference, &classes)
}

/// A random code on `1..=neurons`: each subset is kept with probability
/// `density_percent / 100`, drawn from a generator seeded with `seed`.
pub fn random_code(neurons: u32, density_percent: u32, seed: u64) -> Result<Code, CodeError> {
    if neurons > MAX_RANDOM_NEURONS {
        return Err(CodeError::EnumerationTooLarge {
            required: neurons as usize,
            limit: MAX_RANDOM_NEURONS as usize,
        });
    }
    if density_percent > 100 {
        return Err(CodeError::invalid_collection(format!(
            "density {}% is above 100%",
            density_percent
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let full = (1u64 << neurons) - 1;
    let code = Code::new(
        (0..=full)
            .filter(|_| rng.gen_range(0..100) < density_percent)
            .map(Codeword::from_bits),
    );
    tracing::trace!(neurons, seed, size = code.size(), "sampled code");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(text: &str) -> Code {
        Code::parse(text).unwrap()
    }

    #[test]
    fn test_config_presets() {
        let config = EnumerationConfig::default();
        assert_eq!(config.neurons, 3);
        assert!(config.skip_redundant);
        assert!(config.include_empty);

        let small = EnumerationConfig::small();
        assert_eq!(small.neurons, 2);
        assert_eq!(small.max_images, Some(64));

        let exhaustive = EnumerationConfig::exhaustive();
        assert_eq!(exhaustive.neurons, MAX_ENUMERATION_NEURONS);
        assert!(!exhaustive.skip_redundant);
    }

    #[test]
    fn test_config_serde() {
        let config = EnumerationConfig::small();
        let json = serde_json::to_string(&config).unwrap();
        let back: EnumerationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_codes_on_one_neuron() {
        let config = EnumerationConfig {
            neurons: 1,
            ..Default::default()
        };
        assert_eq!(codes_on(&config).unwrap(), vec![code("{1, Empty}")]);

        let config = EnumerationConfig {
            neurons: 1,
            include_empty: false,
            skip_redundant: false,
            ..Default::default()
        };
        let codes = codes_on(&config).unwrap();
        assert_eq!(codes.len(), 2);
    }

    #[test]
    fn test_codes_on_two_neurons() {
        let config = EnumerationConfig::small();
        let codes = codes_on(&config).unwrap();
        // {1, 2, Empty}, {1 2, 1, Empty} and {1 2, 1, 2, Empty}
        assert_eq!(codes.len(), 3);
        assert!(codes.iter().all(|c| !c.has_redundancies()));

        let connected = EnumerationConfig {
            require_connected: true,
            ..EnumerationConfig::small()
        };
        let codes = codes_on(&connected).unwrap();
        assert_eq!(codes.len(), 2);
        assert!(!codes.contains(&code("{1, 2, Empty}")));
    }

    #[test]
    fn test_codes_on_cap() {
        let config = EnumerationConfig {
            neurons: 2,
            max_images: Some(1),
            ..Default::default()
        };
        assert_eq!(codes_on(&config).unwrap().len(), 1);
    }

    #[test]
    fn test_codes_on_rejects_large() {
        let config = EnumerationConfig {
            neurons: 5,
            ..Default::default()
        };
        assert_eq!(
            codes_on(&config),
            Err(CodeError::EnumerationTooLarge {
                required: 5,
                limit: 4
            })
        );
    }

    #[test]
    #[cfg(feature = "exhaustive")]
    fn test_codes_on_four_neurons_are_pairwise_distinct() {
        let codes = codes_on(&EnumerationConfig {
            neurons: 4,
            ..Default::default()
        })
        .unwrap();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert!(!a.is_isomorphic_to(b));
            }
        }
    }

    #[test]
    fn test_images_of_single_neuron_code() {
        let images = images(&code("{1, Empty}"), &EnumerationConfig::default()).unwrap();
        assert_eq!(images, vec![code("{Empty}"), code("{1, Empty}")]);

        let capped = EnumerationConfig {
            max_images: Some(1),
            ..Default::default()
        };
        assert_eq!(images_len(&code("{1, Empty}"), &capped), 1);
    }

    fn images_len(c: &Code, config: &EnumerationConfig) -> usize {
        images(c, config).unwrap().len()
    }

    #[test]
    fn test_images_include_reduced_form() {
        let c = code("{1 2, 2 3, 2, Empty}");
        let found = images(&c, &EnumerationConfig::default()).unwrap();
        assert!(found.iter().any(|img| img.is_isomorphic_to(&c)));
        assert!(found.iter().all(|img| img.size() <= c.size()));
    }

    #[test]
    fn test_images_trunk_limit() {
        let c = code("{1 2, 2 3, 2, Empty}");
        let config = EnumerationConfig {
            max_trunks: 1,
            ..Default::default()
        };
        assert!(matches!(
            images(&c, &config),
            Err(CodeError::EnumerationTooLarge { limit: 1, .. })
        ));
    }

    #[test]
    fn test_images_trunk_limit_is_capped() {
        // every subset of seven neurons: 128 distinct trunks
        let power_set = Code::new((0u64..128).map(Codeword::from_bits));
        let config = EnumerationConfig {
            max_trunks: usize::MAX,
            ..Default::default()
        };
        assert_eq!(
            images(&power_set, &config),
            Err(CodeError::EnumerationTooLarge {
                required: 128,
                limit: MAX_IMAGE_TRUNKS
            })
        );
        assert_eq!(images_len(&code("{1, Empty}"), &config), 2);
    }

    #[test]
    fn test_new_classes() {
        let reference = vec![code("{1, Empty}")];
        let fresh = new_classes(
            &reference,
            vec![code("{2, Empty}"), code("{1, 2, Empty}"), code("{2, 3, Empty}")],
        );
        assert_eq!(fresh, vec![code("{1, 2, Empty}")]);
    }

    #[test]
    fn test_random_code_is_seeded() {
        let a = random_code(4, 50, 7).unwrap();
        let b = random_code(4, 50, 7).unwrap();
        assert_eq!(a, b);
        assert!(a.codewords().iter().all(|c| c.max_neuron().unwrap_or(0) <= 4));
    }

    #[test]
    fn test_random_code_density_bounds() {
        assert!(random_code(3, 0, 1).unwrap().is_empty());
        assert_eq!(random_code(3, 100, 1).unwrap().size(), 8);
        assert!(matches!(
            random_code(3, 101, 1),
            Err(CodeError::InvalidCodewordCollection { .. })
        ));
        assert!(matches!(
            random_code(MAX_RANDOM_NEURONS + 1, 10, 1),
            Err(CodeError::EnumerationTooLarge { .. })
        ));
    }
}
