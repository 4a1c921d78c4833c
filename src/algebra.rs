//! Automaton algebra: the operations that combine, transform, and inspect
//! `Automaton`s. Every operation here constructs a fresh automaton (or a
//! plain value); none mutate their inputs.

use crate::automaton::{Automaton, AutomatonBuilder, Symbol, Transition, DEFAULT_ALPHA_MAX};
use crate::error::{AutomatonError, Result};
use std::collections::{HashMap, VecDeque};

/// Concatenation of a sequence of automatons. An empty list yields the
/// automaton accepting only the empty string.
pub fn concatenate(list: &[Automaton]) -> Result<Automaton> {
    if list.is_empty() {
        let mut a = Automaton::new();
        let s0 = a.create_state();
        a.set_accept(s0, true);
        a.finish_state();
        return Ok(a);
    }

    let alpha_max = list.iter().map(Automaton::alpha_max).max().unwrap_or(DEFAULT_ALPHA_MAX);
    let mut result = Automaton::with_alpha_max(alpha_max);
    let mut offsets = Vec::with_capacity(list.len());
    for a in list {
        offsets.push(result.copy_from(a));
    }

    // Only the last automaton's own accept states carry into the result;
    // an earlier automaton's accept state just marks where to splice the
    // next automaton in. `add_epsilon` below re-marks a spliced-in state
    // accepting if the remainder of the chain can also end there.
    for i in 0..list.len() - 1 {
        for s_local in 0..list[i].num_states() {
            result.set_accept(offsets[i] + s_local, false);
        }
    }

    for i in 0..list.len() - 1 {
        for s_local in 0..list[i].num_states() {
            if !list[i].is_accept(s_local) {
                continue;
            }
            let global_s = offsets[i] + s_local;
            let mut j = i + 1;
            loop {
                result.add_epsilon(global_s, offsets[j])?;
                if j + 1 < list.len() && list[j].is_accept(0) {
                    j += 1;
                } else {
                    break;
                }
            }
        }
    }

    result.finish_state();
    Ok(result)
}

/// Union of a sequence of automatons, behind a fresh initial state. Dead
/// states are dropped from the result.
pub fn union(list: &[Automaton]) -> Result<Automaton> {
    let alpha_max = list.iter().map(Automaton::alpha_max).max().unwrap_or(DEFAULT_ALPHA_MAX);
    let mut result = Automaton::with_alpha_max(alpha_max);
    let new_initial = result.create_state();
    let mut initials = Vec::with_capacity(list.len());
    for a in list {
        initials.push(result.copy_from(a));
    }
    result.finish_state();
    for init in initials {
        result.add_epsilon(new_initial, init)?;
    }
    Ok(remove_dead_states(&result))
}

/// `a?`: a fresh accepting initial state epsilon-linked into a copy of `a`.
pub fn optional(a: &Automaton) -> Result<Automaton> {
    let mut result = Automaton::with_alpha_max(a.alpha_max());
    let new_initial = result.create_state();
    result.set_accept(new_initial, true);
    let old_initial = result.copy_from(a);
    result.finish_state();
    result.add_epsilon(new_initial, old_initial)?;
    Ok(result)
}

/// `a*`: Kleene star. A fresh accepting initial state replicates the
/// transitions out of `a`'s initial state, and every accept state of `a`
/// does the same (looping back through the new initial's targets).
pub fn repeat(a: &Automaton) -> Result<Automaton> {
    let mut result = Automaton::with_alpha_max(a.alpha_max());
    let new_initial = result.create_state();
    result.set_accept(new_initial, true);
    let old_initial = result.copy_from(a);
    result.finish_state();

    result.add_epsilon(new_initial, old_initial)?;
    for s_local in 0..a.num_states() {
        if a.is_accept(s_local) {
            result.add_epsilon(old_initial + s_local, old_initial)?;
        }
    }
    Ok(result)
}

/// `a{min,}`: `min` mandatory copies of `a` followed by `a*`. `min = 0`
/// reduces to [`repeat`].
pub fn repeat_min(a: &Automaton, min: usize) -> Result<Automaton> {
    if min == 0 {
        return repeat(a);
    }
    let star = repeat(a)?;
    let mandatory: Vec<Automaton> = std::iter::repeat(a.clone()).take(min).collect();
    let mut list = mandatory;
    list.push(star);
    concatenate(&list)
}

/// Intersection by product construction over `(s1, s2)` state pairs.
/// Dead states are dropped from the result.
pub fn intersection(a1: &Automaton, a2: &Automaton) -> Automaton {
    let alpha_max = a1.alpha_max().max(a2.alpha_max());
    let mut result = Automaton::with_alpha_max(alpha_max);
    let mut pair_to_state: HashMap<(usize, usize), usize> = HashMap::new();
    let mut builder = AutomatonBuilder::with_alpha_max(alpha_max);
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    let start = (0, 0);
    let start_state = builder.create_state();
    pair_to_state.insert(start, start_state);
    queue.push_back(start);

    while let Some((p1, p2)) = queue.pop_front() {
        let s = pair_to_state[&(p1, p2)];
        builder.set_accept(s, a1.is_accept(p1) && a2.is_accept(p2));

        for t1 in a1.transitions_of(p1) {
            for t2 in a2.transitions_of(p2) {
                let lo = t1.min.max(t2.min);
                let hi = t1.max.min(t2.max);
                if lo > hi {
                    continue;
                }
                let pair = (t1.dest, t2.dest);
                let dest = *pair_to_state.entry(pair).or_insert_with(|| {
                    let s = builder.create_state();
                    queue.push_back(pair);
                    s
                });
                builder.add_transition(s, dest, lo, hi);
            }
        }
    }

    result = builder.finish().unwrap_or(result);
    remove_dead_states(&result)
}

/// Reverses the language of `a`. The returned automaton's states are `a`'s
/// states renumbered `+1`, plus a fresh initial state 0 epsilon-linked into
/// every former accept state.
pub fn reverse(a: &Automaton) -> Result<Automaton> {
    Ok(reverse_with_new_initials(a)?.0)
}

/// As [`reverse`], additionally returning the set of new states that
/// correspond to `a`'s former accept states (the reversed automaton's new
/// "initial" set, before being folded into the single state 0).
pub fn reverse_with_new_initials(a: &Automaton) -> Result<(Automaton, Vec<usize>)> {
    let mut builder = AutomatonBuilder::with_alpha_max(a.alpha_max());
    let new_initial = builder.create_state();
    let renumbered: Vec<usize> = (0..a.num_states()).map(|_| builder.create_state()).collect();

    builder.set_accept(new_initial, false);
    builder.set_accept(renumbered[0], true); // old initial becomes accepting

    let mut new_initials = Vec::new();
    for s in 0..a.num_states() {
        if a.is_accept(s) {
            new_initials.push(renumbered[s]);
        }
        for t in a.transitions_of(s) {
            builder.add_transition(renumbered[t.dest], renumbered[s], t.min, t.max);
        }
    }

    let mut result = builder.finish()?;
    for &ni in &new_initials {
        result.add_epsilon(new_initial, ni)?;
    }
    Ok((result, new_initials))
}

/// Adds a sink state with a self-loop over the full symbol range, and
/// routes every otherwise-missing `(state, symbol)` pair into it.
pub fn totalize(a: &Automaton) -> Automaton {
    let alpha_max = a.alpha_max();
    let mut result = Automaton::with_alpha_max(alpha_max);
    let offset = result.copy_from(a);
    let sink = result.create_state();
    result.finish_state();

    for s in 0..a.num_states() {
        let global = offset + s;
        let mut next_free: Symbol = 0;
        for t in a.transitions_of(s) {
            if t.min > next_free {
                let extra = [Transition { dest: sink, min: next_free, max: t.min - 1 }];
                result.append_transitions_raw(global, &extra);
            }
            next_free = next_free.max(t.max + 1);
        }
        if next_free <= alpha_max {
            let extra = [Transition { dest: sink, min: next_free, max: alpha_max }];
            result.append_transitions_raw(global, &extra);
        }
    }
    result.append_transitions_raw(sink, &[Transition { dest: sink, min: 0, max: alpha_max }]);
    result
}

fn live_from_initial(a: &Automaton) -> Vec<bool> {
    let mut live = vec![false; a.num_states()];
    if a.num_states() == 0 {
        return live;
    }
    let mut stack = vec![0usize];
    live[0] = true;
    while let Some(s) = stack.pop() {
        for t in a.transitions_of(s) {
            if !live[t.dest] {
                live[t.dest] = true;
                stack.push(t.dest);
            }
        }
    }
    live
}

fn live_to_accept(a: &Automaton) -> Vec<bool> {
    let n = a.num_states();
    let mut reverse_adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for s in 0..n {
        for t in a.transitions_of(s) {
            reverse_adj[t.dest].push(s);
        }
    }
    let mut live = vec![false; n];
    let mut stack = Vec::new();
    for s in 0..n {
        if a.is_accept(s) {
            live[s] = true;
            stack.push(s);
        }
    }
    while let Some(s) = stack.pop() {
        for &pred in &reverse_adj[s] {
            if !live[pred] {
                live[pred] = true;
                stack.push(pred);
            }
        }
    }
    live
}

/// Drops states unreachable from the initial state or from which no accept
/// state is reachable. If the language is empty, the result has zero
/// states.
pub fn remove_dead_states(a: &Automaton) -> Automaton {
    let from_initial = live_from_initial(a);
    let to_accept = live_to_accept(a);
    let live: Vec<bool> = (0..a.num_states())
        .map(|s| from_initial[s] && to_accept[s])
        .collect();

    if live.is_empty() || !live.iter().any(|&b| b) {
        return Automaton::with_alpha_max(a.alpha_max());
    }

    let mut new_id = vec![usize::MAX; a.num_states()];
    let mut next = 0;
    for s in 0..a.num_states() {
        if live[s] {
            new_id[s] = next;
            next += 1;
        }
    }

    let mut builder = AutomatonBuilder::with_alpha_max(a.alpha_max());
    for _ in 0..next {
        builder.create_state();
    }
    for s in 0..a.num_states() {
        if !live[s] {
            continue;
        }
        builder.set_accept(new_id[s], a.is_accept(s));
        for t in a.transitions_of(s) {
            if live[t.dest] {
                builder.add_transition(new_id[s], new_id[t.dest], t.min, t.max);
            }
        }
    }
    let result = builder.finish().unwrap_or_else(|_| Automaton::with_alpha_max(a.alpha_max()));
    crate::contracts::check_no_dead_states(&result);
    result
}

/// True iff `a` accepts no strings: zero states, a non-accepting state 0
/// with no transitions, or no accept state reachable from 0.
pub fn is_empty(a: &Automaton) -> bool {
    if a.num_states() == 0 {
        return true;
    }
    if !a.is_accept(0) && a.transitions_of(0).is_empty() {
        return true;
    }
    let live = live_from_initial(a);
    !(0..a.num_states()).any(|s| live[s] && a.is_accept(s))
}

/// True iff `a`'s language is finite: a DFS from state 0 never follows a
/// transition into a state currently on the search stack (a cycle
/// reachable from, and able to reach, an accept state would make the
/// language infinite; any cycle found here is treated conservatively as
/// making the automaton infinite, matching the reference behavior).
pub fn is_finite(a: &Automaton) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        Unvisited,
        OnStack,
        Finished,
    }
    let n = a.num_states();
    if n == 0 {
        return true;
    }
    let mut color = vec![Color::Unvisited; n];
    let mut stack: Vec<(usize, usize)> = vec![(0usize, 0usize)]; // (state, next transition index)
    color[0] = Color::OnStack;

    loop {
        let Some(&(s, idx)) = stack.last() else {
            break;
        };
        let transitions = a.transitions_of(s);
        if idx >= transitions.len() {
            color[s] = Color::Finished;
            stack.pop();
            continue;
        }
        let dest = transitions[idx].dest;
        stack.last_mut().unwrap().1 += 1;
        match color[dest] {
            Color::OnStack => return false,
            Color::Unvisited => {
                color[dest] = Color::OnStack;
                stack.push((dest, 0));
            }
            Color::Finished => {}
        }
    }
    true
}

/// True iff `a1`'s language is a subset of `a2`'s. Both inputs must be
/// deterministic.
pub fn subset_of(a1: &Automaton, a2: &Automaton) -> Result<bool> {
    if !a1.is_deterministic() || !a2.is_deterministic() {
        return Err(AutomatonError::InvalidInput(
            "subset_of requires both inputs to be deterministic".to_string(),
        ));
    }
    if a1.num_states() == 0 {
        return Ok(true);
    }
    if a2.num_states() == 0 {
        return Ok(is_empty(a1));
    }

    let mut visited: HashMap<(usize, usize), ()> = HashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back((0usize, 0usize));
    visited.insert((0, 0), ());

    while let Some((p1, p2)) = queue.pop_front() {
        if a1.is_accept(p1) && !a2.is_accept(p2) {
            return Ok(false);
        }
        for t1 in a1.transitions_of(p1) {
            let mut lo = t1.min;
            let hi = t1.max;
            // The union of p2's transitions overlapping [lo,hi] must cover it.
            let mut covering: Vec<(Symbol, Symbol, usize)> = a2
                .transitions_of(p2)
                .iter()
                .filter(|t2| t2.max >= lo && t2.min <= hi)
                .map(|t2| (t2.min.max(lo), t2.max.min(hi), t2.dest))
                .collect();
            covering.sort_unstable();
            for (cmin, cmax, dest) in covering {
                if cmin > lo {
                    return Ok(false);
                }
                let pair = (t1.dest, dest);
                if visited.insert(pair, ()).is_none() {
                    queue.push_back(pair);
                }
                if cmax >= hi {
                    lo = hi.saturating_add(1);
                    break;
                }
                lo = cmax.saturating_add(1);
            }
            if lo <= hi {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// True iff `a1` and `a2` accept the same language. Internally determinizes
/// both and checks `subset_of` in each direction.
pub fn same_language(a1: &Automaton, a2: &Automaton) -> bool {
    let d1 = crate::determinize::determinize(a1);
    let d2 = crate::determinize::determinize(a2);
    subset_of(&d1, &d2).unwrap_or(false) && subset_of(&d2, &d1).unwrap_or(false)
}

/// Walks `symbols` through `a` from state 0 via `step`, returning whether
/// the final state accepts. Any symbol with no matching transition rejects
/// immediately.
pub fn run(a: &Automaton, symbols: &[Symbol]) -> bool {
    if a.num_states() == 0 {
        return false;
    }
    let mut state = 0usize;
    for &sym in symbols {
        match a.step(state, sym) {
            Some(next) => state = next,
            None => return false,
        }
    }
    a.is_accept(state)
}

/// The longest symbol sequence every string in `a`'s language is guaranteed
/// to start with: determinizes `a` (a non-deterministic automaton can have
/// more than one transition leaving a state on the same symbol even where
/// the language itself has a forced prefix), then follows state 0 while each
/// state has exactly one outgoing transition that is a single-symbol
/// interval (`min == max`) and is not itself accepting (an accepting state
/// with further transitions would make continuing past it optional,
/// breaking the guarantee).
pub fn get_common_prefix(a: &Automaton) -> Vec<Symbol> {
    let a = crate::determinize::determinize(a);
    let mut prefix = Vec::new();
    if a.num_states() == 0 {
        return prefix;
    }
    let mut state = 0usize;
    loop {
        if a.is_accept(state) {
            break;
        }
        let transitions = a.transitions_of(state);
        if transitions.len() != 1 || transitions[0].min != transitions[0].max {
            break;
        }
        prefix.push(transitions[0].min);
        state = transitions[0].dest;
    }
    prefix
}
