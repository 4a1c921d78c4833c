//! Packed-array bit utilities and a growable integer bitset.
//!
//! `unpack` pulls an arbitrary-width field out of a flat `u64` array; it is
//! the primitive the parametric Levenshtein tables (`levenshtein::tables`)
//! use to store their computed transition function compactly instead of as
//! one `i32` per `(state, vector)` pair. `oversize` is the amortized-growth
//! rule used whenever a buffer in this crate grows one element past its
//! current capacity (automaton transitions, bitset words, ...).

/// Extracts a `bits`-wide unsigned field starting at bit offset `index *
/// bits` from a packed array of 64-bit words, including fields that
/// straddle a word boundary.
///
/// `bits` must be in `1..=57` (the tables in this crate never need more than
/// a handful of bits per field; values are validated by the caller, not
/// here).
pub fn unpack(data: &[u64], index: usize, bits: u32) -> u64 {
    let bit_offset = index as u64 * bits as u64;
    let word = (bit_offset / 64) as usize;
    let shift = bit_offset % 64;
    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };

    if shift + bits as u64 <= 64 {
        (data[word] >> shift) & mask
    } else {
        let low = data[word] >> shift;
        let high_bits = (shift + bits as u64) - 64;
        let high = data.get(word + 1).copied().unwrap_or(0) << (bits as u64 - high_bits);
        (low | high) & mask
    }
}

/// Writes a `bits`-wide field into a packed array, growing it as needed.
/// Mirrors `unpack` for round-tripping in tests and table construction.
pub fn pack_into(data: &mut Vec<u64>, index: usize, bits: u32, value: u64) {
    let bit_offset = index as u64 * bits as u64;
    let word = (bit_offset / 64) as usize;
    let shift = bit_offset % 64;
    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let value = value & mask;

    while data.len() <= word + 1 {
        data.push(0);
    }

    data[word] |= value << shift;
    if shift + bits as u64 > 64 {
        let high_bits = (shift + bits as u64) - 64;
        data[word + 1] |= value >> (bits as u64 - high_bits);
    }
}

/// Amortized growth rule: request `min_target_size` elements of
/// `bytes_per_element` bytes each, and return a new capacity that is at
/// least that large but grows by `max(3, size >> 3)` extra elements,
/// rounded so the resulting byte size is 8-byte aligned.
///
/// The 32-bit-process variant of this rounding (present in the reference
/// implementation) is not reproduced here; see DESIGN.md.
pub fn oversize(min_target_size: usize, bytes_per_element: usize) -> usize {
    if min_target_size == 0 {
        return 0;
    }
    let extra = (min_target_size >> 3).max(3);
    let mut new_size = min_target_size + extra;

    if bytes_per_element > 1 {
        let bytes = new_size.saturating_mul(bytes_per_element);
        let rounded = (bytes + 7) & !7usize;
        new_size = rounded / bytes_per_element;
    }

    new_size.max(min_target_size)
}

/// A growable bitset over non-negative integer indices, backed by a `Vec<u64>`.
#[derive(Debug, Clone, Default)]
pub struct IntBitSet {
    words: Vec<u64>,
}

impl IntBitSet {
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity((bits + 63) / 64),
        }
    }

    #[inline]
    fn ensure_word(&mut self, word: usize) {
        if self.words.len() <= word {
            let target = oversize(word + 1, 8);
            self.words.resize(target.max(word + 1), 0);
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        let word = index / 64;
        match self.words.get(word) {
            Some(w) => (w >> (index % 64)) & 1 != 0,
            None => false,
        }
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        let word = index / 64;
        self.ensure_word(word);
        let bit = 1u64 << (index % 64);
        if value {
            self.words[word] |= bit;
        } else {
            self.words[word] &= !bit;
        }
    }

    pub fn clear_all(&mut self) {
        for w in &mut self.words {
            *w = 0;
        }
    }

    pub fn len_bits(&self) -> usize {
        self.words.len() * 64
    }

    /// Iterates set bit indices in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &w)| {
            (0..64).filter_map(move |b| {
                if (w >> b) & 1 != 0 {
                    Some(wi * 64 + b)
                } else {
                    None
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_straddles_word_boundary() {
        let mut data = vec![0u64; 2];
        pack_into(&mut data, 20, 5, 0b11010); // bit offset 100, straddles word 1/2
        assert_eq!(unpack(&data, 20, 5), 0b11010);
    }

    #[test]
    fn unpack_roundtrip_many_fields() {
        let mut data = Vec::new();
        let values: Vec<u64> = (0..50).map(|i| (i * 7) % 31).collect();
        for (i, &v) in values.iter().enumerate() {
            pack_into(&mut data, i, 5, v);
        }
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(unpack(&data, i, 5), v);
        }
    }

    #[test]
    fn oversize_grows_monotonically() {
        let mut prev = 0;
        for n in 1..2000 {
            let got = oversize(n, 4);
            assert!(got >= n);
            assert!(got >= prev);
            prev = got;
        }
    }

    #[test]
    fn bitset_basic() {
        let mut bs = IntBitSet::new();
        bs.set(3, true);
        bs.set(130, true);
        assert!(bs.get(3));
        assert!(bs.get(130));
        assert!(!bs.get(4));
        let ones: Vec<usize> = bs.iter_ones().collect();
        assert_eq!(ones, vec![3, 130]);
        bs.set(3, false);
        assert!(!bs.get(3));
    }
}
