/*!
# Heuristic Engine Integration Tests

Every heuristic must emit decodable orders and valid decompositions; the
anytime drivers must respect the shutdown flag and only ever improve.
*/

use rand::SeedableRng;
use rand::rngs::StdRng;

use treedec::core::cancel::CancelFlag;
use treedec::core::generators::{
    complete_graph, cycle_graph, erdos_renyi_graph, hypercube_graph, path_graph,
};
use treedec::core::order::decompose_from_order;
use treedec::heuristics::fast::fast_greedy_decomposition;
use treedec::heuristics::greedy::{GreedyConfig, Scoring, greedy_order};
use treedec::heuristics::lower_bound::minor_min_width;
use treedec::heuristics::stochastic::stochastic_search;
use treedec::heuristics::tabu::{TabuConfig, tabu_search};

#[test]
fn test_all_scorings_produce_valid_orders() {
    let g = erdos_renyi_graph(20, 0.2, 5).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    for scoring in [
        Scoring::Degree,
        Scoring::FillIn,
        Scoring::DegreePlusFillIn,
        Scoring::SparsestSubgraph,
        Scoring::DegreeThenFillIn,
        Scoring::FillInThenDegree,
    ] {
        let config = GreedyConfig {
            scoring,
            ..Default::default()
        };
        let outcome = greedy_order(&g, &config, &mut rng).unwrap().unwrap();
        let td = decompose_from_order(&g, &outcome.order).unwrap();
        td.validate(&g).unwrap();
        assert_eq!(td.width() as usize, outcome.width, "{:?}", scoring);
    }
}

#[test]
fn test_heuristic_width_never_beats_lower_bound() {
    for seed in 0..5u64 {
        let g = erdos_renyi_graph(15, 0.3, seed).unwrap();
        let low = minor_min_width(&g);
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = greedy_order(&g, &GreedyConfig::default(), &mut rng)
            .unwrap()
            .unwrap();
        assert!(outcome.width >= low, "seed {}", seed);
    }
}

#[test]
fn test_stochastic_driver_improves_or_keeps_seed_width() {
    let g = hypercube_graph(4);
    let mut rng = StdRng::seed_from_u64(17);
    let seed_run = greedy_order(&g, &GreedyConfig::default(), &mut rng)
        .unwrap()
        .unwrap();
    let cancel = CancelFlag::new();
    let mut last_width = seed_run.width;
    let best = stochastic_search(&g, seed_run.width, &mut rng, &cancel, |improvement| {
        assert!(improvement.width < last_width);
        last_width = improvement.width;
    })
    .unwrap();
    if let Some(best) = best {
        assert!(best.width < seed_run.width);
        let td = decompose_from_order(&g, &best.order).unwrap();
        td.validate(&g).unwrap();
    }
}

#[test]
fn test_tabu_on_random_graph() {
    let g = erdos_renyi_graph(14, 0.25, 23).unwrap();
    let mut rng = StdRng::seed_from_u64(23);
    let seed_run = greedy_order(&g, &GreedyConfig::default(), &mut rng)
        .unwrap()
        .unwrap();
    let cancel = CancelFlag::new();
    let out = tabu_search(
        &g,
        &seed_run.order,
        &TabuConfig::default(),
        &mut rng,
        &cancel,
        |_| {},
    )
    .unwrap();
    assert!(out.width <= seed_run.width);
    let td = decompose_from_order(&g, &out.order).unwrap();
    td.validate(&g).unwrap();
}

#[test]
fn test_fast_greedy_on_families() {
    for (g, expected) in [
        (path_graph(50), 1),
        (cycle_graph(40), 2),
        (complete_graph(7), 6),
    ] {
        let td = fast_greedy_decomposition(&g, None).unwrap().unwrap();
        td.validate(&g).unwrap();
        assert_eq!(td.width(), expected);
    }
}

#[test]
fn test_fast_greedy_ceiling_contract() {
    let g = complete_graph(8);
    assert!(fast_greedy_decomposition(&g, Some(6)).unwrap().is_none());
    assert!(fast_greedy_decomposition(&g, Some(9)).unwrap().is_some());
}
