//! Packed membership sets over the codewords of one code.
//!
//! A [`MemberSet`] records which codewords (by their index in the code's
//! sorted codeword list) belong to a trunk. Trunk comparison is the hot
//! operation of reduction and redundancy detection, so values are packed
//! 64 members per `u64` word and compared word-wise.

use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MemberSet {
    len: usize,
    data: Vec<u64>,
}

impl MemberSet {
    #[inline]
    fn word_count_for_len(len: usize) -> usize {
        (len + 63) / 64
    }

    #[inline]
    fn last_word_mask(len: usize) -> u64 {
        let used = len % 64;
        if used == 0 {
            !0u64
        } else {
            (1u64 << used) - 1
        }
    }

    /// An empty set over a universe of `len` codewords.
    pub fn new_empty(len: usize) -> Self {
        Self {
            len,
            data: vec![0u64; Self::word_count_for_len(len)],
        }
    }

    /// The set holding every codeword of the universe.
    pub fn new_full(len: usize) -> Self {
        let mut data = vec![!0u64; Self::word_count_for_len(len)];
        if let Some(last) = data.last_mut() {
            *last &= Self::last_word_mask(len);
        }
        Self { len, data }
    }

    pub fn count(&self) -> usize {
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&w| w == 0)
    }

    pub fn is_full(&self) -> bool {
        self.count() == self.len
    }

    pub fn contains(&self, i: usize) -> bool {
        if i >= self.len {
            return false;
        }
        self.data[i / 64] & (1u64 << (i % 64)) != 0
    }

    pub fn insert(&mut self, i: usize) {
        if i < self.len {
            self.data[i / 64] |= 1u64 << (i % 64);
        }
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let n = self.len.min(other.len);
        let mut out = Self::new_empty(n);
        for (w, slot) in out.data.iter_mut().enumerate() {
            *slot = self.data[w] & other.data[w];
        }
        if let Some(last) = out.data.last_mut() {
            *last &= Self::last_word_mask(n);
        }
        out
    }

    /// Member indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.data.iter().enumerate().flat_map(|(word_idx, &word)| {
            let mut m = word;
            std::iter::from_fn(move || {
                if m == 0 {
                    return None;
                }
                let tz = m.trailing_zeros() as usize;
                m &= m - 1;
                Some(word_idx * 64 + tz)
            })
        })
    }
}

impl fmt::Debug for MemberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
