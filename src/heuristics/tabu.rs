/*!
# Tabu Local Search on Permutations

Refines a seed elimination order by moving single vertices next to their
neighbors in the permutation: either just after the latest-positioned
preceding neighbor or just before the earliest-positioned successor. The cost
blends the squared maximum bag with the sum of squared per-vertex successor
counts, so the search keeps improving the shape of the order even while the
width is stuck. A short tabu queue keeps recently moved vertices fixed and a
random move escapes plateaus.
*/

use std::collections::{HashMap, VecDeque};

use rand::Rng;
use rand::rngs::StdRng;

use tracing::debug;

use crate::core::cancel::CancelFlag;
use crate::core::error::Result;
use crate::core::graph::Graph;
use crate::core::order::evaluate_order;
use crate::heuristics::greedy::GreedyOutcome;

const TABU_LENGTH: usize = 7;

/// Rounds and steps of the local search.
#[derive(Debug, Clone)]
pub struct TabuConfig {
    pub rounds: usize,
    pub steps: usize,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            rounds: 8,
            steps: 32,
        }
    }
}

fn cost(graph: &Graph, order: &[u32]) -> Result<(u64, usize)> {
    let eval = evaluate_order(graph, order)?;
    let n = order.len() as u64;
    let max_bag = eval.max_bag_size as u64;
    let mut total = max_bag * max_bag * n * n;
    for &size in &eval.bag_sizes {
        let successors = size as u64 - 1;
        total += successors * successors;
    }
    Ok((total, eval.max_bag_size))
}

fn move_vertex(order: &[u32], from: usize, to: usize) -> Vec<u32> {
    let mut out = order.to_vec();
    let v = out.remove(from);
    out.insert(to, v);
    out
}

/// The two candidate relocations of `v`: after its latest preceding neighbor
/// and before its earliest successor.
fn candidate_moves(
    graph: &Graph,
    order: &[u32],
    position: &HashMap<u32, usize>,
    v: u32,
) -> Vec<Vec<u32>> {
    let i = position[&v];
    let mut out = Vec::new();
    let neighbors = graph.neighbors_of(v).unwrap_or(&[]);
    if let Some(&j) = neighbors
        .iter()
        .filter_map(|u| position.get(u))
        .filter(|&&j| j < i)
        .max()
    {
        out.push(move_vertex(order, i, j + 1));
    }
    if let Some(&j) = neighbors
        .iter()
        .filter_map(|u| position.get(u))
        .filter(|&&j| j > i)
        .min()
    {
        out.push(move_vertex(order, i, j - 1));
    }
    out
}

/// Runs the tabu search from `seed`. Improvements over the seed width are
/// streamed to `on_improvement`; the best order found is returned.
pub fn tabu_search(
    graph: &Graph,
    seed: &[u32],
    config: &TabuConfig,
    rng: &mut StdRng,
    cancel: &CancelFlag,
    mut on_improvement: impl FnMut(&GreedyOutcome),
) -> Result<GreedyOutcome> {
    let (mut current_cost, mut current_max_bag) = cost(graph, seed)?;
    let mut current = seed.to_vec();
    let mut best = GreedyOutcome {
        order: current.clone(),
        width: current_max_bag.saturating_sub(1),
    };
    let mut best_cost = current_cost;
    if current.len() < 3 {
        return Ok(best);
    }
    let mut tabu: VecDeque<u32> = VecDeque::new();

    'outer: for _round in 0..config.rounds {
        for _step in 0..config.steps {
            if cancel.is_cancelled() {
                break 'outer;
            }
            let position: HashMap<u32, usize> =
                current.iter().enumerate().map(|(i, &v)| (v, i)).collect();
            let mut chosen: Option<(u64, usize, Vec<u32>, u32)> = None;
            for &v in &current {
                if tabu.contains(&v) {
                    continue;
                }
                for candidate in candidate_moves(graph, &current, &position, v) {
                    let (c, max_bag) = cost(graph, &candidate)?;
                    if c < current_cost
                        && chosen.as_ref().is_none_or(|(bc, _, _, _)| c < *bc)
                    {
                        chosen = Some((c, max_bag, candidate, v));
                    }
                }
            }
            let (new_cost, new_max_bag, new_order, moved) = match chosen {
                Some(found) => found,
                None => {
                    // Plateau: random relocation, accepted unconditionally.
                    let v = current[rng.random_range(0..current.len())];
                    let moves = candidate_moves(graph, &current, &position, v);
                    if moves.is_empty() {
                        continue;
                    }
                    let pick = moves[rng.random_range(0..moves.len())].clone();
                    let (c, max_bag) = cost(graph, &pick)?;
                    (c, max_bag, pick, v)
                }
            };
            current = new_order;
            current_cost = new_cost;
            current_max_bag = new_max_bag;
            tabu.push_back(moved);
            if tabu.len() > TABU_LENGTH {
                tabu.pop_front();
            }
            if current_cost < best_cost {
                best_cost = current_cost;
                let width = current_max_bag.saturating_sub(1);
                if width < best.width {
                    debug!(width, "tabu improvement");
                    best = GreedyOutcome {
                        order: current.clone(),
                        width,
                    };
                    on_improvement(&best);
                } else {
                    best.order = current.clone();
                }
            }
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::core::generators::{cycle_graph, path_graph};
    use crate::core::order::decompose_from_order;

    #[test]
    fn test_tabu_repairs_bad_path_order() {
        let g = path_graph(7);
        // Eliminating from the middle outward is deliberately poor.
        let seed = vec![4, 2, 6, 1, 3, 5, 7];
        let mut rng = StdRng::seed_from_u64(3);
        let cancel = CancelFlag::new();
        let out = tabu_search(&g, &seed, &TabuConfig::default(), &mut rng, &cancel, |_| {})
            .unwrap();
        assert!(out.width <= 2);
        let td = decompose_from_order(&g, &out.order).unwrap();
        assert_eq!(td.width() as usize, out.width);
    }

    #[test]
    fn test_tabu_keeps_optimal_seed() {
        let g = cycle_graph(6);
        let seed: Vec<u32> = (1..=6).collect();
        let mut rng = StdRng::seed_from_u64(9);
        let cancel = CancelFlag::new();
        let out = tabu_search(&g, &seed, &TabuConfig::default(), &mut rng, &cancel, |_| {})
            .unwrap();
        assert_eq!(out.width, 2);
    }
}
