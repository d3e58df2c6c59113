//! Unit tests for codes, trunks, reduction, isomorphism and convexity

use neurocode::{
    codes_on, difference_up_to_isomorphism, images, Code, CodeError, Codeword, Convexity,
    EnumerationConfig, HomologyOracle, IntegralHomology, SimplicialComplex, TrunkKey,
};
use std::collections::BTreeSet;

fn code(literals: &[&str]) -> Code {
    Code::from_literals(literals).unwrap()
}

fn cw(neurons: &[u32]) -> Codeword {
    Codeword::from_indices(neurons).unwrap()
}

fn samples() -> Vec<Code> {
    vec![
        code(&["1 2", "2 3", "2", ""]),
        code(&["1 3", "1 2", "1", ""]),
        code(&["2 4", "3 4", "4", ""]),
        code(&["1 2", "3", ""]),
        code(&["1", "2", ""]),
        code(&["1 2 3", "1 2", "2 3", "2", ""]),
        code(&["3", "1 2", "2", ""]),
    ]
}

#[test]
fn test_codeword_duplicates_collapse() {
    assert_eq!(cw(&[1, 2, 2, 3]), cw(&[1, 2, 3]));
    let set: BTreeSet<u32> = [3, 2, 1].into_iter().collect();
    assert_eq!(Codeword::from_set(&set).unwrap(), cw(&[1, 2, 3]));
}

#[test]
fn test_codeword_add_remove() {
    let c = cw(&[1, 3]);
    assert_eq!(c.add(2).unwrap().remove(2), c);
    assert_eq!(c.add(2).unwrap().add(2).unwrap(), c.add(2).unwrap());
    assert!(matches!(c.add(0), Err(CodeError::InvalidNeuronIndex { .. })));
}

#[test]
fn test_codeword_rejects_invalid_neurons() {
    assert!(Codeword::try_from_signed(&[1, -2]).is_err());
    assert!(Codeword::from_indices(&[0]).is_err());
    assert!(Codeword::from_literal("1 x").is_err());
    assert!(Codeword::from_indices(&[neurocode::MAX_NEURON + 1]).is_err());
}

#[test]
fn test_reduction_is_idempotent() {
    for c in samples() {
        let once = c.reduced();
        assert_eq!(once.reduced(), once, "reducing {} twice", c);
        let rebuilt = Code::new(once.codewords().iter().copied());
        assert_eq!(rebuilt.reduced(), once, "re-reducing {} from scratch", c);
        assert!(once.is_reduced());
    }
}

#[test]
fn test_isomorphism_is_an_equivalence() {
    let family = samples();
    for a in &family {
        assert!(a.is_isomorphic_to(a));
        for b in &family {
            assert_eq!(a.is_isomorphic_to(b), b.is_isomorphic_to(a), "{} vs {}", a, b);
            for c in &family {
                if a.is_isomorphic_to(b) && b.is_isomorphic_to(c) {
                    assert!(a.is_isomorphic_to(c), "{} ~ {} ~ {}", a, b, c);
                }
            }
        }
    }
    // the first three are relabellings of one another
    assert!(family[0].is_isomorphic_to(&family[1]));
    assert!(family[1].is_isomorphic_to(&family[2]));
    assert!(!family[0].is_isomorphic_to(&family[3]));
}

#[test]
fn test_identity_morphism_image_is_isomorphic() {
    for c in samples() {
        let image = c.image_under_morphism(&c.identity_keys()).unwrap();
        assert!(image.is_isomorphic_to(&c), "identity image of {}", c);
    }
}

#[test]
fn test_max_intersection_complete_implies_convex() {
    for c in samples() {
        if c.is_max_intersection_complete() {
            assert_eq!(c.convexity(), Convexity::Convex, "{}", c);
            assert_eq!(c.convexity().value(), 1);
        }
    }
}

#[test]
fn test_nonconvex_without_local_obstructions() {
    let c = code(&[
        "2 3 4 5", "1 2 3", "1 3 4", "1 4 5", "1 3", "1 4", "2 3", "3 4", "4 5", "3", "4", "",
    ]);
    assert!(!c.has_local_obstructions());
    assert!(!c.is_max_intersection_complete());
    assert_eq!(c.convexity().value(), -1);
}

#[test]
fn test_simplicial_and_intersection_completeness() {
    let c = code(&["", "1", "1 2", "2 3", "3"]);
    assert!(!c.is_simplicial_complex());
    assert!(!c.is_intersection_complete());

    let c = code(&["", "1", "1 2", "3 4", "3"]);
    assert!(c.is_intersection_complete());
}

#[test]
fn test_power_set_trunks_and_poset() {
    let words = (0u64..32).map(Codeword::from_bits);
    let c = Code::new(words);
    assert_eq!(c.size(), 32);
    assert_eq!(c.support(), cw(&[1, 2, 3, 4, 5]));
    assert_eq!(c.trunks().unwrap().len(), 32);
    assert_eq!(c.poset().cardinality(), 32);
    assert!(c.is_simplicial_complex());
    assert_eq!(c.convexity(), Convexity::Convex);
}

#[test]
fn test_missing_max_intersection_is_empty_codeword() {
    let c = Code::from_indices(&[vec![2], vec![3], vec![1, 2], vec![2, 3], vec![3, 4]]).unwrap();
    assert_eq!(c.missing_max_intersections(), vec![Codeword::EMPTY]);
}

#[test]
fn test_irreducible_trunk_keys_name_support_neurons() {
    let c = code(&["1 2 3", "1 2", "2 3", "2", "4", ""]);
    for key in c.irreducible_trunks() {
        match key {
            TrunkKey::Subset(s) => {
                assert_eq!(s.len(), 1);
                assert!(c.support().contains(s));
            }
            TrunkKey::Empty => panic!("sentinel in irreducible trunks"),
        }
    }
    assert_eq!(c.reduced().size(), c.size());
}

#[test]
fn test_code_complex_homology() {
    // three edges of a triangle: a circle
    let c = code(&["1 2", "2 3", "1 3", "1", "2", "3", ""]);
    let complex = c.simplicial_complex();
    let homology = IntegralHomology.reduced_homology(&complex);
    assert_eq!(homology.betti(1), 1);
    assert!(!IntegralHomology.has_point_homology(&complex));
    assert!(IntegralHomology.has_point_homology(&SimplicialComplex::from_facets([cw(&[1, 2])])));
}

#[test]
fn test_enumeration_and_difference() {
    let two = codes_on(&EnumerationConfig::small()).unwrap();
    let one = codes_on(&EnumerationConfig {
        neurons: 1,
        ..EnumerationConfig::small()
    })
    .unwrap();
    // every code on two neurons has at least three codewords
    assert_eq!(difference_up_to_isomorphism(&one, &two).len(), two.len());

    let source = code(&["1 2", "2 3", "2", ""]);
    let found = images(&source, &EnumerationConfig::default()).unwrap();
    assert!(found.iter().any(|img| img.is_isomorphic_to(&source)));
    assert!(found.iter().any(|img| img == &code(&[""])));
}
