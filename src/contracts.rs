//! Runtime contracts for the automaton invariants (`I1`–`I5`).
//!
//! These are debug-mode assertions, not `Result`-returning validation: they
//! catch bugs in this crate's own algorithms (a determinizer subset left
//! with a non-empty live set, a minimizer producing overlapping
//! transitions), not bad caller input. Zero-cost in release builds.
//!
//! # Usage
//!
//! ```ignore
//! use crate::contracts::check_transitions_sorted_and_disjoint;
//!
//! check_transitions_sorted_and_disjoint(&automaton, state);
//! ```

use crate::automaton::Automaton;

/// I1: after `finish_state`, a state's transitions are sorted by
/// `(min, max, dest)` ascending with no two adjacent intervals going to the
/// same destination left uncoalesced.
#[inline]
pub fn check_transitions_sorted(a: &Automaton, s: usize) {
    let ts = a.transitions_of(s);
    for w in ts.windows(2) {
        debug_assert!(
            (w[0].min, w[0].max, w[0].dest) <= (w[1].min, w[1].max, w[1].dest),
            "Contract violation: I1 - state {s} transitions out of order: {:?} then {:?}",
            w[0],
            w[1]
        );
        debug_assert!(
            !(w[0].dest == w[1].dest && w[1].min <= w[0].max.saturating_add(1)),
            "Contract violation: I1 - state {s} has uncoalesced adjacent transitions to {} : {:?}, {:?}",
            w[0].dest,
            w[0],
            w[1]
        );
    }
}

/// I4: after determinization, no two transitions out of the same state have
/// overlapping intervals.
#[inline]
pub fn check_deterministic_disjoint(a: &Automaton) {
    debug_assert!(a.is_deterministic(), "Contract violation: I4 - automaton not marked deterministic");
    for s in 0..a.num_states() {
        let ts = a.transitions_of(s);
        for w in ts.windows(2) {
            debug_assert!(
                w[0].max < w[1].min,
                "Contract violation: I4 - state {s} has overlapping transitions {:?}, {:?}",
                w[0],
                w[1]
            );
        }
    }
}

/// I5: after `remove_dead_states`, every state is reachable from state 0
/// and can itself reach an accept state; an empty language collapses to
/// zero states.
///
/// Unlike `check_transitions_sorted`/`check_deterministic_disjoint`, the two
/// BFS passes here cost O(V+E) before the first `debug_assert!` even runs,
/// so the whole body is gated on `cfg!(debug_assertions)` rather than
/// relying on `debug_assert!` alone to keep release builds free of it.
#[inline]
pub fn check_no_dead_states(a: &Automaton) {
    if !cfg!(debug_assertions) || a.num_states() == 0 {
        return;
    }
    let mut reachable = vec![false; a.num_states()];
    let mut stack = vec![0usize];
    reachable[0] = true;
    while let Some(s) = stack.pop() {
        for t in a.transitions_of(s) {
            if !reachable[t.dest] {
                reachable[t.dest] = true;
                stack.push(t.dest);
            }
        }
    }
    debug_assert!(
        reachable.iter().all(|&r| r),
        "Contract violation: I5 - unreachable state survived remove_dead_states"
    );

    let mut reverse_adj: Vec<Vec<usize>> = vec![Vec::new(); a.num_states()];
    for s in 0..a.num_states() {
        for t in a.transitions_of(s) {
            reverse_adj[t.dest].push(s);
        }
    }
    let mut can_reach_accept = vec![false; a.num_states()];
    let mut stack: Vec<usize> = (0..a.num_states()).filter(|&s| a.is_accept(s)).collect();
    for &s in &stack {
        can_reach_accept[s] = true;
    }
    while let Some(s) = stack.pop() {
        for &pred in &reverse_adj[s] {
            if !can_reach_accept[pred] {
                can_reach_accept[pred] = true;
                stack.push(pred);
            }
        }
    }
    debug_assert!(
        can_reach_accept.iter().all(|&r| r),
        "Contract violation: I5 - a surviving state cannot reach any accept state"
    );
}
