/*!
# Exact Solver Integration Tests

The two exact atom solvers against graphs of known treewidth, their
agreement on small random instances, and the solver dispatch fallbacks.
*/

use treedec::core::cancel::CancelFlag;
use treedec::core::generators::{
    complete_graph, cycle_graph, erdos_renyi_graph, hypercube_graph, path_graph, petersen_graph,
};
use treedec::core::graph::Graph;
use treedec::exact::{AtomSolver, game, pid};

fn game_width(graph: &Graph) -> i32 {
    let cancel = CancelFlag::new();
    let td = game::improve_lower_bound(graph, 0, &cancel).unwrap();
    td.validate(graph).unwrap();
    td.width()
}

fn pid_width(graph: &Graph) -> i32 {
    let cancel = CancelFlag::new();
    let td = pid::pid_exact(graph, 0, graph.num_vertices(), &cancel)
        .unwrap()
        .unwrap();
    td.validate(graph).unwrap();
    td.width()
}

#[test]
fn test_known_widths() {
    let cases: Vec<(Graph, i32)> = vec![
        (path_graph(4), 1),
        (complete_graph(4), 3),
        (cycle_graph(5), 2),
        (hypercube_graph(3), 3),
        (petersen_graph(), 4),
    ];
    for (graph, expected) in cases {
        assert_eq!(game_width(&graph), expected);
        assert_eq!(pid_width(&graph), expected);
    }
}

#[test]
fn test_solvers_agree_on_random_connected_graphs() {
    let mut checked = 0;
    let mut seed = 0u64;
    while checked < 25 {
        let graph = erdos_renyi_graph(10, 0.35, seed).unwrap();
        seed += 1;
        if !treedec::separators::is_connected(&graph) {
            continue;
        }
        assert_eq!(game_width(&graph), pid_width(&graph), "seed {}", seed - 1);
        checked += 1;
    }
}

#[test]
fn test_failed_width_probes_return_none() {
    let cancel = CancelFlag::new();
    let g = petersen_graph();
    assert!(game::game_decomposition(&g, 3, &cancel).unwrap().is_none());
    assert!(pid::pid_decomposition(&g, 3, &cancel).unwrap().is_none());
    assert!(game::game_decomposition(&g, 4, &cancel).unwrap().is_some());
    assert!(pid::pid_decomposition(&g, 4, &cancel).unwrap().is_some());
}

#[test]
fn test_sat_variant_falls_back_to_game() {
    let g = cycle_graph(7);
    let cancel = CancelFlag::new();
    let td = AtomSolver::Sat.solve(&g, 1, &cancel);
    td.validate(&g).unwrap();
    assert_eq!(td.width(), 2);
}

#[test]
fn test_descending_game_driver_matches_ascending() {
    let g = hypercube_graph(3);
    let cancel = CancelFlag::new();
    let ascending = game::improve_lower_bound(&g, 0, &cancel).unwrap();
    let descending = game::improve_upper_bound(&g, 7, &cancel).unwrap().unwrap();
    assert_eq!(ascending.width(), descending.width());
}
