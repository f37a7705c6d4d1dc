/*!
# Separator Machinery Integration Tests

The connectivity ladder pieces working against whole graphs: articulation
points, bounded-flow cuts, clique-minimal separators and minor safety.
*/

use treedec::core::generators::{complete_graph, cycle_graph, path_graph, petersen_graph};
use treedec::core::graph::Graph;
use treedec::separators::{
    articulation_point, clique_minimal_separator, connected_components, is_connected,
    is_minor_safe, minimum_vertex_separator,
};

#[test]
fn test_connectivity_basics() {
    assert!(is_connected(&petersen_graph()));
    let mut g = path_graph(3);
    g.add_edge(7, 8);
    assert_eq!(connected_components(&g).len(), 2);
}

#[test]
fn test_petersen_has_no_cut_vertex() {
    assert!(articulation_point(&petersen_graph()).is_none());
    assert!(articulation_point(&cycle_graph(8)).is_none());
}

#[test]
fn test_min_cut_matches_connectivity_of_petersen() {
    // Petersen is 3-connected: every non-adjacent pair needs three vertices.
    let g = petersen_graph();
    let cut = minimum_vertex_separator(&g, 1, 9, 5).unwrap();
    assert_eq!(cut.len(), 3);
    let mut rest = g.clone();
    for &v in &cut {
        rest.remove_vertex(v).unwrap();
    }
    assert!(!is_connected(&rest));
}

#[test]
fn test_clique_separator_decomposes_chordal_chain() {
    // Three triangles chained by shared edges.
    let mut g = Graph::new();
    for (a, b) in [(1, 2), (2, 3), (1, 3), (2, 4), (3, 4), (3, 5), (4, 5)] {
        g.add_edge(a, b);
    }
    let sep = clique_minimal_separator(&g).unwrap();
    assert!(sep == vec![2, 3] || sep == vec![3, 4]);
    assert!(is_minor_safe(&g, &sep));
}

#[test]
fn test_cliques_and_cycles_are_atoms() {
    assert!(clique_minimal_separator(&complete_graph(5)).is_none());
    assert!(clique_minimal_separator(&cycle_graph(7)).is_none());
    assert!(clique_minimal_separator(&petersen_graph()).is_none());
}

#[test]
fn test_minor_safety_rejects_bad_separators() {
    let g = cycle_graph(6);
    // A single cycle vertex does not separate anything.
    assert!(!is_minor_safe(&g, &[1]));
    // Two opposite vertices do, and each side contracts into the missing
    // edge.
    assert!(is_minor_safe(&g, &[1, 4]));
}
