/*!
# Greedy Elimination Orders

Builds elimination orders by repeatedly taking a vertex minimizing one of the
classic scores, with uniform random tie-breaks, an optional one-step
look-ahead over the best few candidates, and an early abort as soon as the
chosen bag would reach a caller-provided upper bound. The scores are exact
integers: the two blended variants are encoded as lexicographic pairs scaled
by the vertex count, which orders identically to the fractional forms.
*/

use rand::Rng;
use rand::rngs::StdRng;

use crate::core::error::Result;
use crate::core::graph::Graph;

/// Vertex scoring functions for the greedy search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    /// Current degree δ(v).
    Degree,
    /// Fill-in φ(v).
    FillIn,
    /// δ(v) + φ(v).
    DegreePlusFillIn,
    /// φ(v) − δ(v); prefers vertices whose neighborhood is almost a clique.
    SparsestSubgraph,
    /// δ(v) + φ(v)/n²: degree first, fill-in as tie-break.
    DegreeThenFillIn,
    /// φ(v) + δ(v)/n: fill-in first, degree as tie-break.
    FillInThenDegree,
}

impl Scoring {
    fn score(self, g: &Graph, v: u32) -> Result<i64> {
        let degree = g.degree(v).expect("candidate is a vertex") as i64;
        let fill = g.fill_in_value(v)? as i64;
        let n = g.num_vertices() as i64;
        Ok(match self {
            Scoring::Degree => degree,
            Scoring::FillIn => fill,
            Scoring::DegreePlusFillIn => degree + fill,
            Scoring::SparsestSubgraph => fill - degree,
            Scoring::DegreeThenFillIn => degree * n * n + fill,
            Scoring::FillInThenDegree => fill * n + degree,
        })
    }
}

/// Parameters of a single greedy run.
#[derive(Debug, Clone)]
pub struct GreedyConfig {
    pub scoring: Scoring,
    /// Number of best candidates to probe one elimination deeper. 0 disables
    /// the look-ahead.
    pub look_ahead: usize,
    /// Abort and return `None` as soon as the chosen closed neighborhood
    /// reaches this size.
    pub upper_bound: Option<usize>,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            scoring: Scoring::FillIn,
            look_ahead: 0,
            upper_bound: None,
        }
    }
}

/// Outcome of a completed greedy run.
#[derive(Debug, Clone)]
pub struct GreedyOutcome {
    pub order: Vec<u32>,
    /// Width of the decomposition the order decodes to.
    pub width: usize,
}

fn min_score(g: &Graph, scoring: Scoring) -> Result<Option<i64>> {
    let mut best = None;
    for v in g.vertices() {
        let s = scoring.score(g, v)?;
        if best.is_none_or(|b| s < b) {
            best = Some(s);
        }
    }
    Ok(best)
}

fn pick_candidate(
    g: &mut Graph,
    config: &GreedyConfig,
    rng: &mut StdRng,
) -> Result<u32> {
    let mut scored: Vec<(i64, u32)> = Vec::with_capacity(g.num_vertices());
    for v in g.vertices() {
        scored.push((config.scoring.score(g, v)?, v));
    }
    scored.sort_unstable();
    if config.look_ahead == 0 || scored.len() <= 1 {
        let best = scored[0].0;
        let ties: Vec<u32> = scored
            .iter()
            .take_while(|&&(s, _)| s == best)
            .map(|&(_, v)| v)
            .collect();
        return Ok(ties[rng.random_range(0..ties.len())]);
    }
    // Probe the top candidates one virtual elimination deep.
    let probes = scored.iter().take(config.look_ahead);
    let mut best: Vec<u32> = Vec::new();
    let mut best_combined = i64::MAX;
    for &(immediate, v) in probes {
        let record = g.eliminate(v)?;
        let next = min_score(g, config.scoring)?.unwrap_or(0);
        g.de_eliminate(record)?;
        let combined = immediate + next;
        if combined < best_combined {
            best_combined = combined;
            best = vec![v];
        } else if combined == best_combined {
            best.push(v);
        }
    }
    Ok(best[rng.random_range(0..best.len())])
}

/// Runs the greedy permutation search. Returns `None` when the upper-bound
/// abort fires.
pub fn greedy_order(
    graph: &Graph,
    config: &GreedyConfig,
    rng: &mut StdRng,
) -> Result<Option<GreedyOutcome>> {
    let mut work = graph.clone();
    let mut order = Vec::with_capacity(graph.num_vertices());
    let mut max_bag = 0usize;
    while !work.is_empty() {
        let v = pick_candidate(&mut work, config, rng)?;
        let bag_size = work.degree(v).expect("candidate is a vertex") + 1;
        if let Some(bound) = config.upper_bound {
            if bag_size >= bound + 1 {
                return Ok(None);
            }
        }
        max_bag = max_bag.max(bag_size);
        order.push(v);
        work.eliminate(v)?;
    }
    Ok(Some(GreedyOutcome {
        order,
        width: max_bag.saturating_sub(1),
    }))
}
