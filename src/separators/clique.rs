/*!
# Clique-Minimal Separators

The Berry–Bordat–Cogis route to safe splitting: compute a minimal
triangulation together with a minimal elimination ordering via MCS-M, scan
the ordering for generator vertices (vertices whose label did not increase),
and take the higher-numbered triangulation neighborhood of a generator. When
that neighborhood is a clique in the original graph and actually separates
it, it is a clique-minimal separator and splitting on it preserves treewidth.
*/

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::core::graph::Graph;
use crate::separators::components::connected_components;

/// Result of the MCS-M traversal: the vertices in selection order (reverse
/// elimination order), the label each vertex carried when selected, and the
/// fill edges of the minimal triangulation.
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub selection: Vec<u32>,
    pub labels: HashMap<u32, usize>,
    pub fill: Vec<(u32, u32)>,
}

/// MCS-M (maximum cardinality search for minimal triangulations).
///
/// Repeatedly selects an unnumbered vertex of maximum weight, then raises the
/// weight of every unnumbered vertex reachable through strictly
/// lighter-weighted internal vertices, recording a fill edge when the pair is
/// not adjacent.
pub fn mcs_m(g: &Graph) -> Triangulation {
    let mut weight: HashMap<u32, usize> = g.vertices().map(|v| (v, 0)).collect();
    let mut unnumbered: HashSet<u32> = g.vertices().collect();
    let mut selection = Vec::with_capacity(g.num_vertices());
    let mut labels = HashMap::new();
    let mut fill = Vec::new();

    while !unnumbered.is_empty() {
        let &v = unnumbered
            .iter()
            .max_by_key(|&&u| (weight[&u], Reverse(u)))
            .expect("set is non-empty");
        selection.push(v);
        labels.insert(v, weight[&v]);
        unnumbered.remove(&v);

        // Minimax search from v: reach(u) holds the smallest achievable
        // maximum weight over internal vertices of a v..u path inside the
        // unnumbered part; direct neighbors have no internal vertices.
        let mut reach: HashMap<u32, i64> = HashMap::new();
        let mut heap: BinaryHeap<Reverse<(i64, u32)>> = BinaryHeap::new();
        for &u in g.neighbors_of(v).expect("vertex exists") {
            if unnumbered.contains(&u) {
                reach.insert(u, i64::MIN);
                heap.push(Reverse((i64::MIN, u)));
            }
        }
        while let Some(Reverse((d, u))) = heap.pop() {
            if reach.get(&u).copied() != Some(d) {
                continue;
            }
            for &w in g.neighbors_of(u).expect("vertex exists") {
                if !unnumbered.contains(&w) || w == v {
                    continue;
                }
                let candidate = d.max(weight[&u] as i64);
                if reach.get(&w).is_none_or(|&cur| candidate < cur) {
                    reach.insert(w, candidate);
                    heap.push(Reverse((candidate, w)));
                }
            }
        }
        let mut raised: Vec<u32> = reach
            .iter()
            .filter(|&(&u, &d)| d < weight[&u] as i64)
            .map(|(&u, _)| u)
            .collect();
        raised.sort_unstable();
        for u in raised {
            *weight.get_mut(&u).expect("vertex exists") += 1;
            if !g.adjacent(u, v) {
                fill.push((v.min(u), v.max(u)));
            }
        }
    }
    Triangulation {
        selection,
        labels,
        fill,
    }
}

/// A clique-minimal separator of `g`, if one exists.
///
/// Generator candidates are vertices whose MCS-M label is at most the label
/// of the previously selected vertex; the candidate separator is the
/// triangulation neighborhood among the earlier-selected vertices. Each
/// candidate is verified to be a clique of the original graph that separates
/// it before being returned.
pub fn clique_minimal_separator(g: &Graph) -> Option<Vec<u32>> {
    if g.num_vertices() < 2 {
        return None;
    }
    let tri = mcs_m(g);
    let mut h = g.clone();
    for &(a, b) in &tri.fill {
        h.add_edge(a, b);
    }
    let mut earlier: HashSet<u32> = HashSet::new();
    let mut previous_label: Option<usize> = None;
    for &x in &tri.selection {
        let label = tri.labels[&x];
        let generator = previous_label.is_some_and(|prev| label <= prev);
        if generator {
            let mut separator: Vec<u32> = h
                .neighbors_of(x)
                .expect("vertex exists")
                .iter()
                .copied()
                .filter(|u| earlier.contains(u))
                .collect();
            separator.sort_unstable();
            if !separator.is_empty() && is_verified_clique_separator(g, &separator) {
                return Some(separator);
            }
        }
        previous_label = Some(label);
        earlier.insert(x);
    }
    None
}

fn is_verified_clique_separator(g: &Graph, separator: &[u32]) -> bool {
    for (i, &u) in separator.iter().enumerate() {
        for &v in &separator[i + 1..] {
            if !g.adjacent(u, v) {
                return false;
            }
        }
    }
    let mut rest = g.clone();
    for &v in separator {
        rest.remove_vertex(v).expect("vertex exists");
    }
    connected_components(&rest).len() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generators::{complete_graph, cycle_graph};

    #[test]
    fn test_mcs_m_on_chordal_graph_adds_no_fill() {
        // A tree is chordal: MCS-M must not add fill edges.
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(1, 3);
        g.add_edge(3, 4);
        let tri = mcs_m(&g);
        assert!(tri.fill.is_empty());
        assert_eq!(tri.selection.len(), 4);
    }

    #[test]
    fn test_mcs_m_triangulates_cycle() {
        let tri = mcs_m(&cycle_graph(5));
        // A minimal triangulation of C5 has exactly two chords.
        assert_eq!(tri.fill.len(), 2);
    }

    #[test]
    fn test_clique_separator_of_two_triangles() {
        // Two triangles sharing edge {2, 3}.
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(1, 3);
        g.add_edge(2, 3);
        g.add_edge(2, 4);
        g.add_edge(3, 4);
        let sep = clique_minimal_separator(&g).unwrap();
        assert_eq!(sep, vec![2, 3]);
    }

    #[test]
    fn test_atoms_have_no_clique_separator() {
        assert!(clique_minimal_separator(&complete_graph(4)).is_none());
        assert!(clique_minimal_separator(&cycle_graph(5)).is_none());
    }
}
