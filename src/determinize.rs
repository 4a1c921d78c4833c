//! Subset construction: converts an arbitrary automaton into a deterministic
//! equivalent via the classic NFA-to-DFA powerset algorithm, with
//! interval-coalescing so the emitted transitions stay `(min,max,dest)`
//! partitioned rather than one transition per symbol.

use crate::automaton::{Automaton, Symbol};
use crate::int_set::{FrozenIntSet, SortedIntSet};
use std::collections::{BTreeMap, HashMap, VecDeque};

const POINT_SET_CUTOVER: usize = 30;

/// Per-point start/end transition events collected while sweeping one
/// subset's members. Mirrors `SortedIntSet`'s small-array/map cutover so the
/// common case (small alphabets) stays a flat sorted vector.
enum PointRepr {
    Small(Vec<(Symbol, Vec<usize>, Vec<usize>)>),
    Large(BTreeMap<Symbol, (Vec<usize>, Vec<usize>)>),
}

struct PointTransitionSet {
    repr: PointRepr,
}

impl PointTransitionSet {
    fn new() -> Self {
        Self { repr: PointRepr::Small(Vec::new()) }
    }

    fn entry(&mut self, point: Symbol) -> &mut (Vec<usize>, Vec<usize>) {
        let needs_upgrade = matches!(
            &self.repr,
            PointRepr::Small(vec)
                if vec.len() >= POINT_SET_CUTOVER
                    && vec.binary_search_by_key(&point, |e| e.0).is_err()
        );
        if needs_upgrade {
            self.upgrade();
        }
        match &mut self.repr {
            PointRepr::Small(vec) => {
                let i = match vec.binary_search_by_key(&point, |e| e.0) {
                    Ok(i) => i,
                    Err(i) => {
                        vec.insert(i, (point, (Vec::new(), Vec::new())));
                        i
                    }
                };
                &mut vec[i].1
            }
            PointRepr::Large(map) => map.entry(point).or_insert_with(|| (Vec::new(), Vec::new())),
        }
    }

    fn add_start(&mut self, point: Symbol, dest: usize) {
        self.entry(point).0.push(dest);
    }

    fn add_end(&mut self, point: Symbol, dest: usize) {
        self.entry(point).1.push(dest);
    }

    fn upgrade(&mut self) {
        if let PointRepr::Small(vec) = &self.repr {
            let map: BTreeMap<Symbol, (Vec<usize>, Vec<usize>)> = vec
                .iter()
                .map(|(p, starts, ends)| (*p, (starts.clone(), ends.clone())))
                .collect();
            self.repr = PointRepr::Large(map);
        }
    }

    /// Consumes the set, returning `(point, starts, ends)` triples in
    /// ascending point order.
    fn into_sorted(self) -> Vec<(Symbol, Vec<usize>, Vec<usize>)> {
        match self.repr {
            PointRepr::Small(vec) => vec,
            PointRepr::Large(map) => map.into_iter().map(|(p, (s, e))| (p, s, e)).collect(),
        }
    }
}

/// Converts `a` into an equivalent deterministic automaton via subset
/// construction. Already-deterministic or trivial (`<= 1` state) inputs are
/// returned unchanged (cloned).
pub fn determinize(a: &Automaton) -> Automaton {
    if a.is_deterministic() || a.num_states() <= 1 {
        return a.clone();
    }

    let alpha_max = a.alpha_max();
    let mut result = Automaton::with_alpha_max(alpha_max);
    let mut dfa_states: HashMap<FrozenIntSet, usize> = HashMap::new();
    let mut queue: VecDeque<(usize, Vec<i32>)> = VecDeque::new();

    let initial_members = vec![0i32];
    let mut initial_set = SortedIntSet::new();
    initial_set.incr(0);
    let initial_id = result.create_state();
    result.set_accept(initial_id, a.is_accept(0));
    dfa_states.insert(initial_set.freeze(initial_id as i32), initial_id);
    queue.push_back((initial_id, initial_members));

    while let Some((r, members)) = queue.pop_front() {
        let mut events = PointTransitionSet::new();
        for &m in &members {
            for t in a.transitions_of(m as usize) {
                events.add_start(t.min, t.dest);
                if t.max < alpha_max {
                    events.add_end(t.max + 1, t.dest);
                }
            }
        }

        let points = events.into_sorted();
        let mut live = SortedIntSet::new();
        let mut last_point: Option<Symbol> = None;

        for (point, starts, ends) in points {
            if let Some(lp) = last_point {
                if !live.is_empty() && point > lp {
                    let frozen = live.freeze(0);
                    let members_vec = frozen.elements.clone();
                    let dest_id = *dfa_states.entry(frozen).or_insert_with(|| {
                        let id = result.create_state();
                        let accept = members_vec.iter().any(|&m| a.is_accept(m as usize));
                        result.set_accept(id, accept);
                        queue.push_back((id, members_vec.clone()));
                        id
                    });
                    result
                        .add_transition(r, dest_id, lp, point - 1)
                        .expect("determinizer produced an out-of-range transition");
                }
            }
            for dest in ends {
                live.decr(dest as i32);
            }
            for dest in starts {
                live.incr(dest as i32);
            }
            last_point = Some(point);
        }

        debug_assert!(live.is_empty(), "live set not empty after subset {r} finished");
    }

    result.finish_state();
    crate::contracts::check_deterministic_disjoint(&result);
    result
}
