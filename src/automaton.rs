//! The automaton store: a mutable graph of states and labeled interval
//! transitions over integer symbols, built under a two-phase protocol:
//! add transitions one state at a time, then finish that state before
//! moving to the next.

use crate::bits::IntBitSet;
use crate::error::{AutomatonError, Result};

/// A symbol is a non-negative integer in `[0, alpha_max]`. The default
/// ceiling treats input as 16-bit code units; callers that need full
/// Unicode can widen `alpha_max` up to `0x10FFFF`.
pub type Symbol = u32;

pub const DEFAULT_ALPHA_MAX: Symbol = 0xFFFF;

/// One outgoing transition: accepts any symbol in `[min, max]` and leads to
/// `dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub dest: usize,
    pub min: Symbol,
    pub max: Symbol,
}

impl Transition {
    fn key_dest_min_max(&self) -> (usize, Symbol, Symbol) {
        (self.dest, self.min, self.max)
    }
    fn key_min_max_dest(&self) -> (Symbol, Symbol, usize) {
        (self.min, self.max, self.dest)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct StateRange {
    start: usize,
    count: usize,
}

/// A labeled directed graph over integer symbols: the core mutable
/// representation all of the automaton algebra and algorithms operate on.
#[derive(Debug, Clone)]
pub struct Automaton {
    ranges: Vec<StateRange>,
    transitions: Vec<Transition>,
    accept: IntBitSet,
    num_states: usize,
    deterministic: bool,
    alpha_max: Symbol,

    // Build-protocol state (§4.1). `current` is the state transitions are
    // currently being appended for; `current_start` is where its run begins
    // in `transitions` (always the tail, since a state's transitions must
    // be added contiguously).
    current: Option<usize>,
    current_start: usize,
    finished: Vec<bool>,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton {
    pub fn new() -> Self {
        Self::with_alpha_max(DEFAULT_ALPHA_MAX)
    }

    pub fn with_alpha_max(alpha_max: Symbol) -> Self {
        Self {
            ranges: Vec::new(),
            transitions: Vec::new(),
            accept: IntBitSet::new(),
            num_states: 0,
            deterministic: true,
            alpha_max,
            current: None,
            current_start: 0,
            finished: Vec::new(),
        }
    }

    pub fn alpha_max(&self) -> Symbol {
        self.alpha_max
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Clears the deterministic flag. Sticky: once false, never re-asserted
    /// by this crate's own algorithms (I3).
    pub(crate) fn mark_nondeterministic(&mut self) {
        self.deterministic = false;
    }

    pub fn is_accept(&self, s: usize) -> bool {
        self.accept.get(s)
    }

    pub fn set_accept(&mut self, s: usize, accept: bool) {
        self.accept.set(s, accept);
    }

    pub fn create_state(&mut self) -> usize {
        let id = self.num_states;
        self.ranges.push(StateRange::default());
        self.finished.push(false);
        self.num_states += 1;
        id
    }

    /// Adds `count` fresh states at once, returning the id of the first.
    pub fn create_states(&mut self, count: usize) -> usize {
        let first = self.num_states;
        for _ in 0..count {
            self.create_state();
        }
        first
    }

    fn check_state(&self, s: usize) -> Result<()> {
        if s >= self.num_states {
            return Err(AutomatonError::InvalidInput(format!(
                "state {s} out of range (have {} states)",
                self.num_states
            )));
        }
        Ok(())
    }

    /// Adds a transition `src --[min,max]--> dest`. Transitions for a given
    /// `src` must be added contiguously; switching to a different `src`
    /// implicitly finishes the previous one (§4.1).
    pub fn add_transition(&mut self, src: usize, dest: usize, min: Symbol, max: Symbol) -> Result<()> {
        self.check_state(src)?;
        self.check_state(dest)?;
        if min > max {
            return Err(AutomatonError::InvalidInput(format!(
                "empty interval [{min},{max}]"
            )));
        }

        if self.current != Some(src) {
            if self.finished[src] {
                return Err(AutomatonError::InvalidState(format!(
                    "state {src} already finished; transitions for a state must be contiguous"
                )));
            }
            self.finish_current_state();
            self.current = Some(src);
            self.current_start = self.transitions.len();
        }

        self.transitions.push(Transition { dest, min, max });
        Ok(())
    }

    /// Finishes whichever state is currently being built, if any. Must be
    /// called exactly once after the last transition of the last state
    /// (idempotent if there is nothing pending).
    pub fn finish_state(&mut self) {
        self.finish_current_state();
    }

    fn finish_current_state(&mut self) {
        let Some(s) = self.current.take() else {
            return;
        };
        let start = self.current_start;
        let (merged, overlap) = Self::sort_and_coalesce(&self.transitions[start..]);
        self.transitions.truncate(start);
        self.transitions.extend(merged);
        self.ranges[s] = StateRange {
            start,
            count: self.transitions.len() - start,
        };
        self.finished[s] = true;
        if overlap {
            self.deterministic = false;
        }
        crate::contracts::check_transitions_sorted(self, s);
    }

    /// Sorts a state's raw transition list by `(dest, min, max)`, coalesces
    /// contiguous/overlapping runs to the same destination, then re-sorts by
    /// `(min, max, dest)` (I1). Returns the result plus whether any two
    /// transitions to different destinations still overlap.
    fn sort_and_coalesce(raw: &[Transition]) -> (Vec<Transition>, bool) {
        let mut by_dest: Vec<Transition> = raw.to_vec();
        by_dest.sort_unstable_by_key(Transition::key_dest_min_max);
        let mut merged: Vec<Transition> = Vec::with_capacity(by_dest.len());
        for t in by_dest {
            if let Some(last) = merged.last_mut() {
                if last.dest == t.dest && t.min <= last.max.saturating_add(1) {
                    last.max = last.max.max(t.max);
                    continue;
                }
            }
            merged.push(t);
        }
        merged.sort_unstable_by_key(Transition::key_min_max_dest);
        let mut overlap = false;
        for w in merged.windows(2) {
            if w[0].max >= w[1].min {
                overlap = true;
                break;
            }
        }
        (merged, overlap)
    }

    /// Appends `extra` to `s`'s existing transition list and re-sorts/coalesces,
    /// regardless of whether `s` has already been finished. Used by the
    /// automaton algebra (e.g. splicing one automaton's initial-state
    /// transitions onto another's accept states), which operates on the
    /// packed representation directly rather than through the incremental
    /// build protocol.
    pub(crate) fn append_transitions_raw(&mut self, s: usize, extra: &[Transition]) {
        debug_assert_ne!(self.current, Some(s), "append_transitions_raw on a state still under construction");
        let mut raw = self.transitions_of(s).to_vec();
        raw.extend_from_slice(extra);
        let (merged, overlap) = Self::sort_and_coalesce(&raw);
        let start = self.transitions.len();
        self.transitions.extend(merged);
        self.ranges[s] = StateRange {
            start,
            count: self.transitions.len() - start,
        };
        self.finished[s] = true;
        if overlap {
            self.deterministic = false;
        }
        crate::contracts::check_transitions_sorted(self, s);
    }

    /// All outgoing transitions of `s`, in `(min,max,dest)` order once the
    /// state has been finished.
    pub fn transitions_of(&self, s: usize) -> &[Transition] {
        let r = &self.ranges[s];
        &self.transitions[r.start..r.start + r.count]
    }

    pub(crate) fn record_range(&mut self, s: usize, start: usize, count: usize) {
        self.ranges[s] = StateRange { start, count };
    }

    /// `step(state, label)`: the destination of the (unique, for a
    /// deterministic automaton) outgoing transition covering `label`, or
    /// `None` if there is none.
    pub fn step(&self, state: usize, label: Symbol) -> Option<usize> {
        for t in self.transitions_of(state) {
            if t.min <= label && label <= t.max {
                return Some(t.dest);
            }
        }
        None
    }

    /// The sorted ascending sequence of every transition `min`, every
    /// `max + 1` that does not overflow `alpha_max`, and the sentinel `0`.
    pub fn get_start_points(&self) -> Vec<Symbol> {
        let mut points: Vec<Symbol> = vec![0];
        for s in 0..self.num_states {
            for t in self.transitions_of(s) {
                points.push(t.min);
                if t.max < self.alpha_max {
                    points.push(t.max + 1);
                }
            }
        }
        points.sort_unstable();
        points.dedup();
        points
    }

    /// Appends every state of `other` into `self`, renumbering sequentially,
    /// and returns the id `other`'s state 0 was mapped to.
    pub fn copy_from(&mut self, other: &Automaton) -> usize {
        self.finish_current_state();
        let offset = self.num_states;
        let new_first = self.create_states(other.num_states);
        debug_assert_eq!(new_first, offset);

        for s in 0..other.num_states {
            self.set_accept(offset + s, other.is_accept(s));
            let start = self.transitions.len();
            for t in other.transitions_of(s) {
                self.transitions.push(Transition {
                    dest: t.dest + offset,
                    min: t.min,
                    max: t.max,
                });
            }
            let count = self.transitions.len() - start;
            self.finished[offset + s] = true;
            self.record_range(offset + s, start, count);
        }
        if !other.deterministic {
            self.mark_nondeterministic();
        }
        offset
    }

    /// Copies every outgoing transition of `dest` onto `src`, and marks
    /// `src` accepting if `dest` is. Used by algebra ops that splice
    /// automatons together at state boundaries (e.g. `concatenate`).
    pub fn add_epsilon(&mut self, src: usize, dest: usize) -> Result<()> {
        self.check_state(src)?;
        self.check_state(dest)?;
        let extra: Vec<Transition> = self.transitions_of(dest).to_vec();
        if !extra.is_empty() {
            self.append_transitions_raw(src, &extra);
        }
        if self.is_accept(dest) {
            self.set_accept(src, true);
        }
        Ok(())
    }
}

/// An auxiliary builder that accepts transitions in any order, buffering
/// `(src, dest, min, max)` quadruples and materializing them into a fresh,
/// properly-finished `Automaton` at `finish()` by sorting on `(src, min,
/// max, dest)` and replaying. Needed by algorithms (reverse, repeat, ...)
/// that discover a state's transitions out of source order.
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    num_states: usize,
    accept: Vec<bool>,
    pending: Vec<(usize, usize, Symbol, Symbol)>,
    alpha_max: Symbol,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::with_alpha_max(DEFAULT_ALPHA_MAX)
    }

    pub fn with_alpha_max(alpha_max: Symbol) -> Self {
        Self {
            num_states: 0,
            accept: Vec::new(),
            pending: Vec::new(),
            alpha_max,
        }
    }

    pub fn create_state(&mut self) -> usize {
        let id = self.num_states;
        self.num_states += 1;
        self.accept.push(false);
        id
    }

    pub fn set_accept(&mut self, s: usize, accept: bool) {
        self.accept[s] = accept;
    }

    pub fn add_transition(&mut self, src: usize, dest: usize, min: Symbol, max: Symbol) {
        self.pending.push((src, dest, min, max));
    }

    pub fn finish(mut self) -> Result<Automaton> {
        self.pending
            .sort_unstable_by_key(|&(src, dest, min, max)| (src, min, max, dest));

        let mut a = Automaton::with_alpha_max(self.alpha_max);
        a.create_states(self.num_states);
        for (s, &accept) in self.accept.iter().enumerate() {
            a.set_accept(s, accept);
        }
        for (src, dest, min, max) in self.pending {
            a.add_transition(src, dest, min, max)?;
        }
        a.finish_state();
        Ok(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_protocol_sorts_and_coalesces() {
        let mut a = Automaton::new();
        let s0 = a.create_state();
        let s1 = a.create_state();
        a.set_accept(s1, true);
        a.add_transition(s0, s1, b'b' as u32, b'c' as u32).unwrap();
        a.add_transition(s0, s1, b'a' as u32, b'a' as u32).unwrap();
        a.finish_state();

        let ts = a.transitions_of(s0);
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0], Transition { dest: s1, min: b'a' as u32, max: b'c' as u32 });
        assert!(a.is_deterministic());
    }

    #[test]
    fn reusing_a_finished_state_is_invalid_state() {
        let mut a = Automaton::new();
        let s0 = a.create_state();
        let s1 = a.create_state();
        let s2 = a.create_state();
        a.add_transition(s0, s1, 0, 1).unwrap();
        a.add_transition(s1, s2, 0, 1).unwrap(); // implicitly finishes s0
        let err = a.add_transition(s0, s2, 2, 3).unwrap_err();
        assert!(matches!(err, AutomatonError::InvalidState(_)));
    }

    #[test]
    fn overlapping_transitions_clear_deterministic_flag() {
        let mut a = Automaton::new();
        let s0 = a.create_state();
        let s1 = a.create_state();
        let s2 = a.create_state();
        a.add_transition(s0, s1, b'a' as u32, b'c' as u32).unwrap();
        a.add_transition(s0, s2, b'b' as u32, b'd' as u32).unwrap();
        a.finish_state();
        assert!(!a.is_deterministic());
    }

    #[test]
    fn out_of_range_state_is_invalid_input() {
        let mut a = Automaton::new();
        let s0 = a.create_state();
        let err = a.add_transition(s0, 5, 0, 1).unwrap_err();
        assert!(matches!(err, AutomatonError::InvalidInput(_)));
    }

    #[test]
    fn builder_variant_sorts_out_of_order_input() {
        let mut b = AutomatonBuilder::new();
        let s0 = b.create_state();
        let s1 = b.create_state();
        b.set_accept(s1, true);
        b.add_transition(s0, s1, b'z' as u32, b'z' as u32);
        b.add_transition(s0, s1, b'a' as u32, b'y' as u32);
        let a = b.finish().unwrap();
        assert_eq!(a.step(s0, b'm' as u32), Some(s1));
        assert_eq!(a.step(s0, b'z' as u32), Some(s1));
    }

    #[test]
    fn get_start_points_includes_zero_and_boundaries() {
        let mut a = Automaton::new();
        let s0 = a.create_state();
        let s1 = a.create_state();
        a.add_transition(s0, s1, 5, 10).unwrap();
        a.finish_state();
        assert_eq!(a.get_start_points(), vec![0, 5, 11]);
    }
}
