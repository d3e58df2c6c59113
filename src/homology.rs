//! Simplicial homology oracle.
//!
//! Local obstructions are decided by asking whether the link of an
//! intersection of maximal codewords has the homology of a point. This
//! module answers that question from the complex's facets alone:
//!
//! - [`SimplicialComplex`] holds the inclusion-maximal facets and expands
//!   them into faces on demand.
//! - [`HomologyOracle`] is the narrow seam the code algorithms depend on.
//! - [`IntegralHomology`] computes reduced integral homology from the
//!   augmented boundary operators by Smith normal form. Working over ℤ
//!   rather than a field means torsion is seen as well as Betti numbers.

use crate::codeword::Codeword;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A finite abstract simplicial complex, stored by its facets.
///
/// The complex with no faces at all is the *void* complex; the complex
/// whose only face is the empty simplex is `{∅}`. They differ: `{∅}` has
/// reduced homology ℤ in dimension −1.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SimplicialComplex {
    facets: Vec<Codeword>,
}

impl SimplicialComplex {
    /// Build from any generating faces; non-maximal ones are dropped.
    pub fn from_facets<I: IntoIterator<Item = Codeword>>(faces: I) -> Self {
        let mut all: Vec<Codeword> = faces.into_iter().collect();
        all.sort();
        all.dedup();
        let facets = all
            .iter()
            .filter(|f| !all.iter().any(|g| g != *f && g.contains(f)))
            .copied()
            .collect();
        SimplicialComplex { facets }
    }

    /// The complex with no faces.
    pub fn void() -> Self {
        SimplicialComplex { facets: Vec::new() }
    }

    pub fn facets(&self) -> &[Codeword] {
        &self.facets
    }

    pub fn is_void(&self) -> bool {
        self.facets.is_empty()
    }

    /// Union of all facets.
    pub fn vertices(&self) -> Codeword {
        self.facets
            .iter()
            .fold(Codeword::EMPTY, |acc, f| acc.union(f))
    }

    /// Dimension of the largest facet; `None` for the void complex.
    pub fn dimension(&self) -> Option<i32> {
        self.facets.iter().map(|f| f.len() as i32 - 1).max()
    }

    /// True iff some vertex lies in every facet. Cones are contractible.
    pub fn is_cone(&self) -> bool {
        let mut facets = self.facets.iter();
        match facets.next() {
            None => false,
            Some(first) => !facets
                .fold(*first, |acc, f| acc.intersection(f))
                .is_empty(),
        }
    }

    /// All faces grouped by cardinality: entry `s` holds the faces with `s`
    /// vertices (entry 0 holds the empty face unless the complex is void).
    pub fn faces_by_size(&self) -> Vec<Vec<Codeword>> {
        let mut seen: HashSet<u64> = HashSet::new();
        for facet in &self.facets {
            let full = facet.bits();
            let mut sub = full;
            loop {
                seen.insert(sub);
                if sub == 0 {
                    break;
                }
                sub = (sub - 1) & full;
            }
        }

        let top = self.facets.iter().map(|f| f.len()).max().map_or(0, |m| m + 1);
        let mut by_size: Vec<Vec<Codeword>> = vec![Vec::new(); top];
        for bits in seen {
            let face = Codeword::from_bits(bits);
            by_size[face.len()].push(face);
        }
        for faces in &mut by_size {
            faces.sort();
        }
        by_size
    }

    /// Number of path components. The void complex and `{∅}` have none.
    pub fn component_count(&self) -> usize {
        let vertices = self.vertices().support();
        if vertices.is_empty() {
            return 0;
        }
        let index: HashMap<u32, usize> = vertices
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();
        let mut parent: Vec<usize> = (0..vertices.len()).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for facet in &self.facets {
            let mut members = facet.iter();
            if let Some(first) = members.next() {
                let root = find(&mut parent, index[&first]);
                for v in members {
                    let r = find(&mut parent, index[&v]);
                    if r != root {
                        parent[r] = root;
                    }
                }
            }
        }

        (0..vertices.len())
            .filter(|&i| find(&mut parent, i) == i)
            .count()
    }
}

/// One non-vanishing reduced homology group `ℤ^rank ⊕ ⊕ ℤ/t`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomologyGroup {
    pub dimension: i32,
    pub rank: usize,
    pub torsion: Vec<u64>,
}

impl fmt::Display for HomologyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        match self.rank {
            0 => {}
            1 => parts.push("Z".to_string()),
            r => parts.push(format!("Z^{}", r)),
        }
        for t in &self.torsion {
            parts.push(format!("Z/{}", t));
        }
        write!(f, "H~{} = {}", self.dimension, parts.join(" + "))
    }
}

/// Reduced homology of a complex: only the non-vanishing groups are kept.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ReducedHomology {
    pub groups: Vec<HomologyGroup>,
}

impl ReducedHomology {
    /// True iff every reduced group vanishes, i.e. the homology of a point.
    pub fn is_trivial(&self) -> bool {
        self.groups.is_empty()
    }

    /// Reduced Betti number in `dimension`.
    pub fn betti(&self, dimension: i32) -> usize {
        self.groups
            .iter()
            .find(|g| g.dimension == dimension)
            .map_or(0, |g| g.rank)
    }
}

impl fmt::Display for ReducedHomology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return write!(f, "trivial");
        }
        let parts: Vec<String> = self.groups.iter().map(|g| g.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Decision contract consumed by the code algorithms.
pub trait HomologyOracle {
    fn reduced_homology(&self, complex: &SimplicialComplex) -> ReducedHomology;

    /// Whether `complex` has the homology of a single point.
    ///
    /// The void complex is never a point; cones always are.
    fn has_point_homology(&self, complex: &SimplicialComplex) -> bool {
        if complex.is_void() {
            return false;
        }
        if complex.is_cone() {
            return true;
        }
        self.reduced_homology(complex).is_trivial()
    }

    fn component_count(&self, complex: &SimplicialComplex) -> usize {
        complex.component_count()
    }
}

/// Reduced integral homology via Smith normal form of boundary matrices.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegralHomology;

impl HomologyOracle for IntegralHomology {
    fn reduced_homology(&self, complex: &SimplicialComplex) -> ReducedHomology {
        let faces = complex.faces_by_size();
        if faces.is_empty() {
            return ReducedHomology::default();
        }

        // boundary[s] maps faces of size s to faces of size s - 1; s = 0 is
        // the zero map out of the augmentation group.
        let top = faces.len();
        let mut ranks = vec![0usize; top + 1];
        let mut factors: Vec<Vec<u64>> = vec![Vec::new(); top + 1];
        for s in 1..top {
            let matrix = boundary_matrix(&faces[s - 1], &faces[s]);
            let diagonal = smith_diagonal(matrix);
            ranks[s] = diagonal.len();
            factors[s] = invariant_factors(&diagonal);
        }

        let mut groups = Vec::new();
        for s in 0..top {
            let cycles = faces[s].len() - ranks[s];
            let rank = cycles - ranks[s + 1];
            let torsion = factors[s + 1].clone();
            if rank > 0 || !torsion.is_empty() {
                groups.push(HomologyGroup {
                    dimension: s as i32 - 1,
                    rank,
                    torsion,
                });
            }
        }

        tracing::trace!(
            facets = complex.facets().len(),
            trivial = groups.is_empty(),
            "computed reduced homology"
        );

        ReducedHomology { groups }
    }
}

/// Boundary matrix with rows indexed by `lower` and columns by `upper`.
fn boundary_matrix(lower: &[Codeword], upper: &[Codeword]) -> Vec<Vec<i64>> {
    let row_of: HashMap<u64, usize> = lower
        .iter()
        .enumerate()
        .map(|(i, f)| (f.bits(), i))
        .collect();
    let mut matrix = vec![vec![0i64; upper.len()]; lower.len()];
    for (col, face) in upper.iter().enumerate() {
        for (k, vertex) in face.iter().enumerate() {
            let sign = if k % 2 == 0 { 1 } else { -1 };
            let boundary_face = face.remove(vertex);
            if let Some(&row) = row_of.get(&boundary_face.bits()) {
                matrix[row][col] = sign;
            }
        }
    }
    matrix
}

/// Diagonalise an integer matrix by unimodular row and column operations and
/// return the absolute values of the non-zero diagonal entries.
fn smith_diagonal(mut m: Vec<Vec<i64>>) -> Vec<i64> {
    let rows = m.len();
    let cols = m.first().map_or(0, |r| r.len());
    let mut diagonal = Vec::new();

    for t in 0..rows.min(cols) {
        let Some((pi, pj)) = smallest_entry(&m, t..rows, t..cols) else {
            break;
        };
        m.swap(t, pi);
        for row in m.iter_mut() {
            row.swap(t, pj);
        }

        loop {
            let pivot = m[t][t];
            let mut clean = true;

            for i in t + 1..rows {
                if m[i][t] != 0 {
                    let q = m[i][t] / pivot;
                    for j in t..cols {
                        m[i][j] -= q * m[t][j];
                    }
                    clean &= m[i][t] == 0;
                }
            }
            for j in t + 1..cols {
                if m[t][j] != 0 {
                    let q = m[t][j] / pivot;
                    for i in t..rows {
                        m[i][j] -= q * m[i][t];
                    }
                    clean &= m[t][j] == 0;
                }
            }
            if clean {
                break;
            }

            // A remainder smaller than the pivot is left in row or column t;
            // promote the smallest one and repeat.
            let mut best = (t, t, pivot.abs());
            for i in t + 1..rows {
                let v = m[i][t].abs();
                if v != 0 && v < best.2 {
                    best = (i, t, v);
                }
            }
            for j in t + 1..cols {
                let v = m[t][j].abs();
                if v != 0 && v < best.2 {
                    best = (t, j, v);
                }
            }
            let (bi, bj, _) = best;
            m.swap(t, bi);
            for row in m.iter_mut() {
                row.swap(t, bj);
            }
        }

        diagonal.push(m[t][t].abs());
    }

    diagonal
}

fn smallest_entry(
    m: &[Vec<i64>],
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, i64)> = None;
    for i in rows {
        for j in cols.clone() {
            let v = m[i][j].abs();
            if v != 0 && best.map_or(true, |(_, _, b)| v < b) {
                best = Some((i, j, v));
                if v == 1 {
                    return Some((i, j));
                }
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Turn an arbitrary diagonal into invariant factors `d1 | d2 | ...` and
/// keep only those greater than one.
fn invariant_factors(diagonal: &[i64]) -> Vec<u64> {
    let mut d: Vec<u64> = diagonal
        .iter()
        .map(|&v| v.unsigned_abs())
        .filter(|&v| v > 1)
        .collect();
    for i in 0..d.len() {
        for j in i + 1..d.len() {
            let g = gcd(d[i], d[j]);
            let l = d[i] / g * d[j];
            d[i] = g;
            d[j] = l;
        }
    }
    d.retain(|&v| v > 1);
    d
}
