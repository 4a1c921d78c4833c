//! Hopcroft partition refinement: collapses a determinized, totalized
//! automaton down to the minimal equivalent DFA.

use crate::algebra::{remove_dead_states, totalize};
use crate::automaton::{Automaton, AutomatonBuilder};
use crate::determinize::determinize;
use std::collections::{HashSet, VecDeque};

/// Minimizes `a`: determinizes it, checks the fast paths, then runs
/// Hopcroft partition refinement over a totalized copy.
pub fn minimize(a: &Automaton) -> Automaton {
    let det = determinize(a);

    if det.num_states() == 0 {
        return det;
    }
    if !det.is_accept(0) && det.transitions_of(0).is_empty() {
        return Automaton::with_alpha_max(det.alpha_max());
    }
    if det.is_accept(0) {
        let ts = det.transitions_of(0);
        if ts.len() == 1 && ts[0].dest == 0 && ts[0].min == 0 && ts[0].max == det.alpha_max() {
            return det;
        }
    }

    let total = totalize(&det);
    let n = total.num_states();
    let points = total.get_start_points();
    let p = points.len();

    let mut trans = vec![0usize; n * p];
    for s in 0..n {
        for (c, &point) in points.iter().enumerate() {
            trans[s * p + c] = total
                .step(s, point)
                .expect("totalized automaton must define every (state, symbol) pair");
        }
    }

    let mut block_of = vec![0usize; n];
    let mut blocks: Vec<Vec<usize>> = Vec::new();
    let (accept, non_accept): (Vec<usize>, Vec<usize>) = (0..n).partition(|&s| total.is_accept(s));
    if !accept.is_empty() {
        blocks.push(accept);
    }
    if !non_accept.is_empty() {
        blocks.push(non_accept);
    }
    for (bi, block) in blocks.iter().enumerate() {
        for &s in block {
            block_of[s] = bi;
        }
    }

    // reverse[c][q] = states with a transition into q on symbol class c.
    let mut reverse: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); n]; p];
    for s in 0..n {
        for c in 0..p {
            reverse[c][trans[s * p + c]].push(s);
        }
    }

    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    let mut queued: HashSet<(usize, usize)> = HashSet::new();
    for b in 0..blocks.len() {
        for c in 0..p {
            queue.push_back((b, c));
            queued.insert((b, c));
        }
    }

    while let Some((target_block, c)) = queue.pop_front() {
        queued.remove(&(target_block, c));

        let members = blocks[target_block].clone();
        let mut x: HashSet<usize> = HashSet::new();
        for &q in &members {
            x.extend(reverse[c][q].iter().copied());
        }
        if x.is_empty() {
            continue;
        }

        let existing_block_count = blocks.len();
        for y in 0..existing_block_count {
            let (in_x, not_x): (Vec<usize>, Vec<usize>) =
                blocks[y].iter().copied().partition(|s| x.contains(s));
            if in_x.is_empty() || not_x.is_empty() {
                continue;
            }

            let (keep, split_off) = if in_x.len() <= not_x.len() {
                (not_x, in_x)
            } else {
                (in_x, not_x)
            };
            let new_block_id = blocks.len();
            for &s in &split_off {
                block_of[s] = new_block_id;
            }
            blocks[y] = keep;
            blocks.push(split_off);

            for cc in 0..p {
                if queued.insert((y, cc)) {
                    queue.push_back((y, cc));
                }
                if queued.insert((new_block_id, cc)) {
                    queue.push_back((new_block_id, cc));
                }
            }
        }
    }

    let block_of_initial = block_of[0];
    let mut order: Vec<usize> = (0..blocks.len()).filter(|&b| !blocks[b].is_empty()).collect();
    order.sort_by_key(|&b| usize::from(b != block_of_initial));

    let mut builder = AutomatonBuilder::with_alpha_max(total.alpha_max());
    let mut new_id_of_block = vec![usize::MAX; blocks.len()];
    for &b in &order {
        new_id_of_block[b] = builder.create_state();
    }
    for &b in &order {
        let representative = blocks[b][0];
        let nid = new_id_of_block[b];
        builder.set_accept(nid, total.is_accept(representative));
        for (c, &point) in points.iter().enumerate() {
            let dest_state = trans[representative * p + c];
            let dest_nid = new_id_of_block[block_of[dest_state]];
            let hi = if c + 1 < p { points[c + 1] - 1 } else { total.alpha_max() };
            builder.add_transition(nid, dest_nid, point, hi);
        }
    }

    let minimized = builder
        .finish()
        .expect("minimizer assembled an automaton with out-of-range states");
    remove_dead_states(&minimized)
}
