/*!
# Solver Pipelines

The three entry modes wired together from the lower layers:

- **exact**: minor-min-width seed → reducer → splitter targeting atoms →
  PID/BT → re-inflation.
- **approximation**: splitter with the balanced-separator approximator.
- **heuristic**: fast degree-greedy, then reduction plus stochastic greedy
  orders, then tabu refinement; every phase publishes improvements into a
  shared current-best slot.

All phases are anytime: a timeout arms the shared shutdown flag, signal
handlers set the same flag, and the drivers emit the best decomposition seen
when it trips.
*/

use std::sync::Mutex;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use tracing::{debug, info};

use crate::core::cancel::CancelFlag;
use crate::core::decomposition::TreeDecomposition;
use crate::core::error::Result;
use crate::core::graph::Graph;
use crate::core::order::decompose_from_order;
use crate::exact::AtomSolver;
use crate::heuristics::fast::fast_greedy_decomposition;
use crate::heuristics::greedy::{GreedyConfig, greedy_order};
use crate::heuristics::lower_bound::minor_min_width;
use crate::heuristics::stochastic::stochastic_search;
use crate::heuristics::tabu::{TabuConfig, tabu_search};
use crate::reduce::Reducer;
use crate::split::Splitter;

/// Run configuration shared by the three drivers.
#[derive(Debug, Clone)]
pub struct Config {
    pub seed: u64,
    pub timeout: Option<Duration>,
    pub parallel: bool,
    /// Emit the first complete solution instead of running the improvement
    /// phases.
    pub instant: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 42,
            timeout: None,
            parallel: false,
            instant: false,
        }
    }
}

impl Config {
    /// Arms the timeout, if any, onto the shared shutdown flag.
    pub fn arm_timeout(&self, cancel: &CancelFlag) {
        if let Some(timeout) = self.timeout {
            cancel.cancel_after(timeout);
        }
    }
}

/// Mutex-guarded anytime slot holding the narrowest decomposition seen.
#[derive(Debug, Default)]
pub struct CurrentBest {
    slot: Mutex<Option<TreeDecomposition>>,
}

impl CurrentBest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `td` if it beats the current width. Returns true on install.
    pub fn offer(&self, td: TreeDecomposition) -> bool {
        let mut slot = self.slot.lock().expect("slot lock");
        let improves = slot.as_ref().is_none_or(|best| td.width() < best.width());
        if improves {
            debug!(width = td.width(), "current best updated");
            *slot = Some(td);
        }
        improves
    }

    /// The current best, if any phase produced one yet.
    pub fn snapshot(&self) -> Option<TreeDecomposition> {
        self.slot.lock().expect("slot lock").clone()
    }
}

/// Exact pipeline: reduce, split, solve atoms with PID/BT, re-inflate.
pub fn exact(graph: &Graph, config: &Config, cancel: &CancelFlag) -> Result<TreeDecomposition> {
    config.arm_timeout(cancel);
    let low = minor_min_width(graph);
    let mut reducer = Reducer::new(graph.clone(), low);
    reducer.reduce()?;
    let reduced = reducer.graph().clone();
    info!(
        original = graph.num_vertices(),
        reduced = reduced.num_vertices(),
        low,
        "exact pipeline after reduction"
    );
    let inner = if reduced.is_empty() {
        TreeDecomposition::new(0)
    } else {
        let splitter = Splitter::new(
            AtomSolver::PidBt {
                lower_bound: None,
                upper_bound: None,
            },
            config.parallel,
            config.seed,
        );
        match splitter.decompose(&reduced, cancel) {
            Ok(td) => td,
            Err(error) if error.is_cancelled() => TreeDecomposition::trivial(&reduced),
            Err(error) => return Err(error),
        }
    };
    let td = reducer.inflate(inner)?;
    td.validate(graph)?;
    Ok(td)
}

/// Approximation pipeline: splitter with the balanced-separator atom solver.
pub fn approximation(
    graph: &Graph,
    config: &Config,
    cancel: &CancelFlag,
) -> Result<TreeDecomposition> {
    config.arm_timeout(cancel);
    let splitter = Splitter::new(AtomSolver::RobertsonSeymour, config.parallel, config.seed);
    let td = match splitter.decompose(graph, cancel) {
        Ok(td) => td,
        Err(error) if error.is_cancelled() => TreeDecomposition::trivial(graph),
        Err(error) => return Err(error),
    };
    td.validate(graph)?;
    Ok(td)
}

/// Heuristic pipeline: three improving phases over a shared best slot.
pub fn heuristic(graph: &Graph, config: &Config, cancel: &CancelFlag) -> Result<TreeDecomposition> {
    config.arm_timeout(cancel);
    let best = CurrentBest::new();
    if graph.is_empty() {
        return Ok(TreeDecomposition::new(0));
    }

    // Phase 1: fast degree-greedy, then one retry under its own ceiling.
    let mut ceiling = None;
    for _ in 0..2 {
        match fast_greedy_decomposition(graph, ceiling)? {
            Some(td) => {
                ceiling = Some(td.max_bag_size());
                best.offer(td);
            }
            None => break,
        }
        if cancel.is_cancelled() {
            break;
        }
    }
    if config.instant || cancel.is_cancelled() {
        return finish(graph, best);
    }

    // Phase 2: reduction plus stochastic greedy orders on the reduced graph.
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut reducer = Reducer::new(graph.clone(), minor_min_width(graph));
    reducer.reduce()?;
    let reduced = reducer.graph().clone();
    let best_order = if reduced.is_empty() {
        let td = reducer.inflate(TreeDecomposition::new(0))?;
        best.offer(td);
        reducer.inflate_order(&[])
    } else {
        let seed_run = greedy_order(&reduced, &GreedyConfig::default(), &mut rng)?
            .expect("unbounded greedy always completes");
        let full = reducer.inflate_order(&seed_run.order);
        best.offer(decompose_from_order(graph, &full)?);
        let outcome = stochastic_search(
            &reduced,
            seed_run.width,
            &mut rng,
            cancel,
            |improvement| {
                let inflated = reducer.inflate_order(&improvement.order);
                if let Ok(td) = decompose_from_order(graph, &inflated) {
                    best.offer(td);
                }
            },
        )?;
        match outcome {
            Some(outcome) => reducer.inflate_order(&outcome.order),
            None => full,
        }
    };
    if cancel.is_cancelled() {
        return finish(graph, best);
    }

    // Phase 3: tabu refinement of the best permutation.
    let refined = tabu_search(
        graph,
        &best_order,
        &TabuConfig::default(),
        &mut rng,
        cancel,
        |improvement| {
            if let Ok(td) = decompose_from_order(graph, &improvement.order) {
                best.offer(td);
            }
        },
    )?;
    if let Ok(td) = decompose_from_order(graph, &refined.order) {
        best.offer(td);
    }
    finish(graph, best)
}

fn finish(graph: &Graph, best: CurrentBest) -> Result<TreeDecomposition> {
    let td = best
        .snapshot()
        .unwrap_or_else(|| TreeDecomposition::trivial(graph));
    td.validate(graph)?;
    Ok(td)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generators::{complete_graph, cycle_graph, path_graph, petersen_graph};

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn test_exact_pipeline_on_known_widths() {
        let cancel = CancelFlag::new();
        let cases: Vec<(Graph, i32)> = vec![
            (path_graph(4), 1),
            (complete_graph(4), 3),
            (cycle_graph(5), 2),
            (petersen_graph(), 4),
        ];
        for (graph, expected) in cases {
            let td = exact(&graph, &config(), &cancel).unwrap();
            td.validate(&graph).unwrap();
            assert_eq!(td.width(), expected);
        }
    }

    #[test]
    fn test_empty_graph_everywhere() {
        let cancel = CancelFlag::new();
        let g = Graph::new();
        assert_eq!(exact(&g, &config(), &cancel).unwrap().width(), -1);
        assert_eq!(approximation(&g, &config(), &cancel).unwrap().width(), -1);
        assert_eq!(heuristic(&g, &config(), &cancel).unwrap().width(), -1);
    }

    #[test]
    fn test_heuristic_pipeline_is_valid_and_reasonable() {
        let cancel = CancelFlag::new();
        let g = cycle_graph(12);
        let td = heuristic(&g, &config(), &cancel).unwrap();
        td.validate(&g).unwrap();
        assert_eq!(td.width(), 2);
    }

    #[test]
    fn test_approximation_pipeline_is_valid() {
        let cancel = CancelFlag::new();
        let g = petersen_graph();
        let td = approximation(&g, &config(), &cancel).unwrap();
        td.validate(&g).unwrap();
        assert!(td.width() >= 4);
    }

    #[test]
    fn test_current_best_keeps_narrowest() {
        let best = CurrentBest::new();
        let mut wide = TreeDecomposition::new(3);
        wide.add_bag([1, 2, 3]);
        let mut narrow = TreeDecomposition::new(3);
        narrow.add_bag([1, 2]);
        narrow.add_bag([2, 3]);
        assert!(best.offer(wide));
        assert!(best.offer(narrow));
        assert_eq!(best.snapshot().unwrap().width(), 1);
    }

    #[test]
    fn test_cancelled_run_still_emits() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let g = petersen_graph();
        let td = heuristic(&g, &config(), &cancel).unwrap();
        td.validate(&g).unwrap();
    }
}
