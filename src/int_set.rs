//! `FrozenIntSet` and `SortedIntSet`: the subset-of-NFA-states bookkeeping
//! the determinizer (`determinize`) uses to name and deduplicate the new
//! DFA states it discovers.
//!
//! `SortedIntSet` is the mutable multiset swept across the alphabet during
//! one subset's processing; `freeze` snapshots it into the immutable,
//! pre-hashed `FrozenIntSet` used as a hash-map key so previously seen
//! subsets are recognized in O(1) rather than by re-sorting and comparing
//! element lists every time.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// `h = 683 * h + v`, folded over the ascending elements, seeded with the
/// element count. This exact constant is a protocol requirement: the
/// determinizer's state map depends on `SortedIntSet` and `FrozenIntSet`
/// hashing identically.
const HASH_MULTIPLIER: u64 = 683;

fn fold_hash<'a>(len: usize, elems: impl Iterator<Item = &'a i32>) -> u64 {
    let mut h = len as u64;
    for &v in elems {
        h = HASH_MULTIPLIER.wrapping_mul(h).wrapping_add(v as u64);
    }
    h
}

/// An immutable sorted set of NFA state numbers with a precomputed hash,
/// tagged with the DFA state number it has been (or will be) assigned.
#[derive(Debug, Clone)]
pub struct FrozenIntSet {
    pub elements: Vec<i32>,
    hash: u64,
    pub state: i32,
}

impl FrozenIntSet {
    pub fn new(mut elements: Vec<i32>, state: i32) -> Self {
        elements.sort_unstable();
        let hash = fold_hash(elements.len(), elements.iter());
        Self {
            elements,
            hash,
            state,
        }
    }
}

impl PartialEq for FrozenIntSet {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}
impl Eq for FrozenIntSet {}

impl Hash for FrozenIntSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // The precomputed fold is itself the hash; feeding it straight to
        // the Hasher avoids re-walking `elements` on every map probe.
        state.write_u64(self.hash);
    }
}

const SMALL_LARGE_CUTOVER: usize = 30;

#[derive(Debug, Clone)]
enum Repr {
    /// Sorted by value; `(value, count)` pairs, `count >= 1`.
    Small(Vec<(i32, u32)>),
    Large(BTreeMap<i32, u32>),
}

/// A mutable sorted multiset of NFA state numbers, incrementally built up
/// while sweeping one subset's transition endpoints.
#[derive(Debug, Clone)]
pub struct SortedIntSet {
    repr: Repr,
    distinct: usize,
}

impl Default for SortedIntSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SortedIntSet {
    pub fn new() -> Self {
        Self {
            repr: Repr::Small(Vec::new()),
            distinct: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    pub fn incr(&mut self, v: i32) {
        match &mut self.repr {
            Repr::Small(vec) => {
                match vec.binary_search_by_key(&v, |&(val, _)| val) {
                    Ok(i) => vec[i].1 += 1,
                    Err(i) => {
                        vec.insert(i, (v, 1));
                        self.distinct += 1;
                    }
                }
                if self.distinct >= SMALL_LARGE_CUTOVER {
                    self.upgrade();
                }
            }
            Repr::Large(map) => {
                let is_new = !map.contains_key(&v);
                *map.entry(v).or_insert(0) += 1;
                if is_new {
                    self.distinct += 1;
                }
            }
        }
    }

    pub fn decr(&mut self, v: i32) {
        match &mut self.repr {
            Repr::Small(vec) => {
                let i = vec
                    .binary_search_by_key(&v, |&(val, _)| val)
                    .expect("decr of value not present in SortedIntSet");
                vec[i].1 -= 1;
                if vec[i].1 == 0 {
                    vec.remove(i);
                    self.distinct -= 1;
                }
            }
            Repr::Large(map) => {
                let count = map
                    .get_mut(&v)
                    .expect("decr of value not present in SortedIntSet");
                *count -= 1;
                if *count == 0 {
                    map.remove(&v);
                    self.distinct -= 1;
                    if self.distinct < SMALL_LARGE_CUTOVER {
                        self.downgrade();
                    }
                }
            }
        }
    }

    fn upgrade(&mut self) {
        if let Repr::Small(vec) = &self.repr {
            let map: BTreeMap<i32, u32> = vec.iter().copied().collect();
            self.repr = Repr::Large(map);
        }
    }

    fn downgrade(&mut self) {
        if let Repr::Large(map) = &self.repr {
            let vec: Vec<(i32, u32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
            self.repr = Repr::Small(vec);
        }
    }

    fn elements(&self) -> Vec<i32> {
        match &self.repr {
            Repr::Small(vec) => vec.iter().map(|&(v, _)| v).collect(),
            Repr::Large(map) => map.keys().copied().collect(),
        }
    }

    pub fn compute_hash(&self) -> u64 {
        fold_hash(self.distinct, self.elements().iter())
    }

    pub fn freeze(&self, state: i32) -> FrozenIntSet {
        FrozenIntSet {
            elements: self.elements(),
            hash: self.compute_hash(),
            state,
        }
    }
}

impl PartialEq<FrozenIntSet> for SortedIntSet {
    fn eq(&self, other: &FrozenIntSet) -> bool {
        self.elements() == other.elements
    }
}
impl PartialEq<SortedIntSet> for FrozenIntSet {
    fn eq(&self, other: &SortedIntSet) -> bool {
        other == self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incr_decr_roundtrip_small() {
        let mut s = SortedIntSet::new();
        s.incr(5);
        s.incr(2);
        s.incr(5);
        assert_eq!(s.elements(), vec![2, 5]);
        s.decr(5);
        assert_eq!(s.elements(), vec![2, 5]);
        s.decr(5);
        assert_eq!(s.elements(), vec![2]);
        s.decr(2);
        assert!(s.is_empty());
    }

    #[test]
    fn upgrades_past_cutover_and_matches_small_result() {
        let mut s = SortedIntSet::new();
        for v in 0..40 {
            s.incr(v);
        }
        assert_eq!(s.elements(), (0..40).collect::<Vec<_>>());
        for v in 0..15 {
            s.decr(v);
        }
        assert_eq!(s.elements(), (15..40).collect::<Vec<_>>());
    }

    #[test]
    fn frozen_hash_matches_sorted_hash() {
        let mut s = SortedIntSet::new();
        for v in [7, 3, 9, 3, 1] {
            s.incr(v);
        }
        let frozen = s.freeze(42);
        assert_eq!(frozen.hash, s.compute_hash());
        assert_eq!(s, frozen);
        assert_eq!(frozen, s);
    }

    #[test]
    fn equality_symmetric_across_repr_sizes() {
        let mut small = SortedIntSet::new();
        for v in 0..10 {
            small.incr(v);
        }
        let mut large = SortedIntSet::new();
        for v in 0..35 {
            large.incr(v);
        }
        for v in 10..35 {
            large.decr(v);
        }
        assert_eq!(small.elements(), large.elements());
        let frozen_small = small.freeze(0);
        let frozen_large = large.freeze(1);
        assert_eq!(frozen_small.elements, frozen_large.elements);
        assert_eq!(frozen_small.hash, frozen_large.hash);
    }
}
