/*!
# Stochastic Greedy Driver

Multi-restart randomized greedy search: every iteration draws a scoring
function from a fixed distribution (after two warm-up runs with the
sparsest-subgraph score), runs the greedy order with the current best width
as an abort bound, and keeps the best permutation seen. The driver is
anytime: it reports every strict improvement through a callback and exits on
an improvement plateau or when the shutdown flag is observed.
*/

use rand::Rng;
use rand::rngs::StdRng;

use tracing::debug;

use crate::core::cancel::CancelFlag;
use crate::core::error::Result;
use crate::core::graph::Graph;
use crate::heuristics::greedy::{GreedyConfig, GreedyOutcome, Scoring, greedy_order};

/// Iterations without improvement before the driver gives up.
const PLATEAU: usize = 500;

fn draw_scoring(rng: &mut StdRng, iteration: usize) -> Scoring {
    if iteration < 2 {
        return Scoring::SparsestSubgraph;
    }
    let roll: f64 = rng.random();
    if roll < 0.50 {
        Scoring::FillIn
    } else if roll < 0.80 {
        Scoring::SparsestSubgraph
    } else if roll < 0.95 {
        Scoring::DegreePlusFillIn
    } else if roll < 0.98 {
        Scoring::Degree
    } else if roll < 0.99 {
        Scoring::DegreeThenFillIn
    } else {
        Scoring::FillInThenDegree
    }
}

/// Runs the stochastic search seeded with `upper_bound` (typically from a
/// deterministic greedy pass). Returns the best outcome found, if any run
/// beat the seed bound; improvements are streamed to `on_improvement`.
pub fn stochastic_search(
    graph: &Graph,
    upper_bound: usize,
    rng: &mut StdRng,
    cancel: &CancelFlag,
    mut on_improvement: impl FnMut(&GreedyOutcome),
) -> Result<Option<GreedyOutcome>> {
    if graph.is_empty() {
        return Ok(None);
    }
    let iterations = ((upper_bound as f64).sqrt() as usize).max(10_000);
    let mut best: Option<GreedyOutcome> = None;
    let mut bound = upper_bound;
    let mut since_improvement = 0usize;
    for iteration in 0..iterations {
        if cancel.is_cancelled() {
            break;
        }
        if since_improvement >= PLATEAU {
            debug!(iteration, bound, "stochastic search reached a plateau");
            break;
        }
        let config = GreedyConfig {
            scoring: draw_scoring(rng, iteration),
            look_ahead: 0,
            upper_bound: Some(bound),
        };
        match greedy_order(graph, &config, rng)? {
            Some(outcome) if outcome.width < bound => {
                bound = outcome.width;
                debug!(iteration, width = outcome.width, "stochastic improvement");
                on_improvement(&outcome);
                best = Some(outcome);
                since_improvement = 0;
            }
            _ => since_improvement += 1,
        }
    }
    Ok(best)
}
