//! Classification summaries for display and JSON export.

use crate::code::Code;
use crate::convexity::Convexity;
use serde::Serialize;
use std::fmt;

/// Everything the classifier knows about one code.
///
/// Codes and codewords are stored in their display form so the JSON output
/// reads the same as the text output.
#[derive(Clone, Debug, Serialize)]
pub struct CodeReport {
    pub code: String,
    pub size: usize,
    pub support: String,
    pub maximal_codewords: Vec<String>,
    pub minimal_codewords: Vec<String>,
    /// Hasse diagram edges of the inclusion order, as `lower < upper`.
    pub cover_relations: Vec<String>,
    pub simplicial_complex: bool,
    pub intersection_complete: bool,
    pub max_intersection_complete: bool,
    pub missing_max_intersections: Vec<String>,
    pub mandatory_codewords: Vec<String>,
    pub local_obstructions: bool,
    pub connected: bool,
    pub redundant: bool,
    pub reduced: String,
    pub convexity: Convexity,
    pub convexity_value: i8,
}

fn rendered<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(|i| i.to_string()).collect()
}

impl CodeReport {
    pub fn from_code(code: &Code) -> Self {
        let convexity = code.convexity();
        let poset = code.poset();
        let words = poset.elements();
        let cover_relations = poset
            .cover_relations()
            .into_iter()
            .map(|(lower, upper)| format!("{} < {}", words[lower], words[upper]))
            .collect();
        CodeReport {
            code: code.to_string(),
            size: code.size(),
            support: code.support().to_string(),
            maximal_codewords: rendered(code.maximal_codewords()),
            minimal_codewords: rendered(&poset.minimal_elements()),
            cover_relations,
            simplicial_complex: code.is_simplicial_complex(),
            intersection_complete: code.is_intersection_complete(),
            max_intersection_complete: code.is_max_intersection_complete(),
            missing_max_intersections: rendered(&code.missing_max_intersections()),
            mandatory_codewords: rendered(code.mandatory_codewords()),
            local_obstructions: code.has_local_obstructions(),
            connected: code.connected(),
            redundant: code.has_redundancies(),
            reduced: code.reduced().to_string(),
            convexity,
            convexity_value: convexity.value(),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for CodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Code: {}", self.code)?;
        writeln!(f, "  Size: {}", self.size)?;
        writeln!(f, "  Support: {}", self.support)?;
        writeln!(f, "  Maximal codewords: {}", self.maximal_codewords.join(", "))?;
        writeln!(f, "  Minimal codewords: {}", self.minimal_codewords.join(", "))?;
        writeln!(f, "  Cover relations: {}", self.cover_relations.len())?;
        writeln!(f, "  Simplicial complex: {}", yes_no(self.simplicial_complex))?;
        writeln!(f, "  Intersection complete: {}", yes_no(self.intersection_complete))?;
        writeln!(
            f,
            "  Max-intersection complete: {}",
            yes_no(self.max_intersection_complete)
        )?;
        if !self.missing_max_intersections.is_empty() {
            writeln!(
                f,
                "  Missing max intersections: {}",
                self.missing_max_intersections.join(", ")
            )?;
        }
        if !self.mandatory_codewords.is_empty() {
            writeln!(f, "  Mandatory codewords: {}", self.mandatory_codewords.join(", "))?;
        }
        writeln!(f, "  Local obstructions: {}", yes_no(self.local_obstructions))?;
        writeln!(f, "  Connected: {}", yes_no(self.connected))?;
        writeln!(f, "  Redundant neurons: {}", yes_no(self.redundant))?;
        writeln!(f, "  Reduced form: {}", self.reduced)?;
        write!(f, "  Convexity: {} ({})", self.convexity, self.convexity_value)
    }
}
