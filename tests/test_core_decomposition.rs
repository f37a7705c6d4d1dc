/*!
# Tree Decomposition and I/O Integration Tests

Covers the three validity properties, the forest-joining step, width
reporting on boundary inputs, and the PACE text formats.
*/

use treedec::core::decomposition::TreeDecomposition;
use treedec::core::generators::{cycle_graph, path_graph};
use treedec::core::graph::Graph;
use treedec::core::io::{read_graph_from_str, write_decomposition};
use treedec::core::order::decompose_from_order;

#[test]
fn test_empty_graph_has_empty_decomposition() {
    let td = TreeDecomposition::new(0);
    assert_eq!(td.width(), -1);
    assert_eq!(td.num_bags(), 0);
    td.validate(&Graph::new()).unwrap();
}

#[test]
fn test_order_decoding_covers_cycle() {
    let g = cycle_graph(6);
    let order: Vec<u32> = (1..=6).collect();
    let td = decompose_from_order(&g, &order).unwrap();
    td.validate(&g).unwrap();
    assert_eq!(td.width(), 2);
}

#[test]
fn test_validation_rejects_broken_trees() {
    let g = path_graph(3);
    let mut td = TreeDecomposition::new(3);
    td.add_bag([1, 2]);
    td.add_bag([2, 3]);
    // Two bags, no edge: not a tree.
    assert!(td.validate(&g).is_err());
    td.connect_components().unwrap();
    td.validate(&g).unwrap();
}

#[test]
fn test_gr_parse_and_td_emit() {
    let g = read_graph_from_str("c tiny\np tw 3 2\n1 2\n2 3\n").unwrap();
    let td = decompose_from_order(&g, &[1, 2, 3]).unwrap();
    let mut out = Vec::new();
    write_decomposition(&mut out, &td).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("s td 3 2 3"));
    // One bag line per bag, smaller edge endpoint first.
    assert_eq!(text.matches("\nb ").count() + usize::from(text.starts_with("b ")), 3);
    for line in text.lines().skip(4) {
        let ids: Vec<u32> = line
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        assert!(ids[0] < ids[1]);
    }
}

#[test]
fn test_gr_parser_rejects_malformed_inputs() {
    assert!(read_graph_from_str("p tw\n").is_err());
    assert!(read_graph_from_str("p cnf 3 2\n1 2\n").is_err());
    assert!(read_graph_from_str("p tw 3 1\n0 2\n").is_err());
    assert!(read_graph_from_str("p tw 3 1\np tw 3 1\n").is_err());
}

#[test]
fn test_dgf_dialect_round_trip() {
    let g = read_graph_from_str("p edge 4 3\ne 1 2\ne 2 3\nd 1 1\ne 3 4\n").unwrap();
    assert_eq!(g.num_edges(), 3);
    let td = decompose_from_order(&g, &[1, 2, 3, 4]).unwrap();
    td.validate(&g).unwrap();
    assert_eq!(td.width(), 1);
}
