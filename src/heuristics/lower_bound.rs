/*!
# Minor-Min-Width Lower Bound

Contracting a minimum-degree vertex into its lightest neighbor only shrinks
the treewidth of a minor, so the largest minimum degree seen along the
contraction sequence bounds the treewidth of the input from below. This is
the seed bound for the exact drivers and the gate for the deeper reduction
rules.
*/

use crate::core::graph::Graph;

/// The minor-min-width heuristic lower bound on the treewidth of `graph`.
pub fn minor_min_width(graph: &Graph) -> usize {
    let mut g = graph.clone();
    let mut low = 0;
    while g.num_vertices() > 1 {
        let v = g
            .vertex_list()
            .into_iter()
            .min_by_key(|&v| (g.degree(v).expect("vertex exists"), v))
            .expect("graph is non-empty");
        let degree = g.degree(v).expect("vertex exists");
        low = low.max(degree);
        if degree == 0 {
            g.remove_vertex(v).expect("vertex exists");
            continue;
        }
        let neighbors = g.neighbors_of(v).expect("vertex exists").to_vec();
        let partner = neighbors
            .iter()
            .copied()
            .min_by_key(|&u| (g.degree(u).expect("vertex exists"), u))
            .expect("degree is positive");
        // Contract v into its lightest neighbor.
        for u in neighbors {
            if u != partner {
                g.add_edge(partner, u);
            }
        }
        g.remove_vertex(v).expect("vertex exists");
    }
    low
}
