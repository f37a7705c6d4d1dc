/*!
# Bounded Minimum Vertex Separators

Menger-style minimum vertex separators between a non-adjacent pair, computed
with a unit-capacity max-flow on the vertex-split network and bounded by the
caller: once more than `bound` augmenting paths exist the search stops, since
the caller only cares about small cuts.
*/

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::core::graph::Graph;

struct FlowEdge {
    to: usize,
    cap: i32,
}

struct FlowNetwork {
    edges: Vec<FlowEdge>,
    head: Vec<Vec<usize>>,
}

impl FlowNetwork {
    fn new(nodes: usize) -> Self {
        Self {
            edges: Vec::new(),
            head: vec![Vec::new(); nodes],
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, cap: i32) {
        self.head[from].push(self.edges.len());
        self.edges.push(FlowEdge { to, cap });
        self.head[to].push(self.edges.len());
        self.edges.push(FlowEdge { to: from, cap: 0 });
    }

    /// One BFS augmenting path from `source` to `sink`; returns false when no
    /// residual path exists.
    fn augment(&mut self, source: usize, sink: usize) -> bool {
        let mut parent: Vec<Option<usize>> = vec![None; self.head.len()];
        let mut queue = VecDeque::from([source]);
        parent[source] = Some(usize::MAX);
        while let Some(u) = queue.pop_front() {
            if u == sink {
                break;
            }
            for &eid in &self.head[u] {
                let edge = &self.edges[eid];
                if edge.cap > 0 && parent[edge.to].is_none() {
                    parent[edge.to] = Some(eid);
                    queue.push_back(edge.to);
                }
            }
        }
        if parent[sink].is_none() {
            return false;
        }
        let mut node = sink;
        while node != source {
            let eid = parent[node].expect("path edge recorded");
            self.edges[eid].cap -= 1;
            self.edges[eid ^ 1].cap += 1;
            node = self.edges[eid ^ 1].to;
        }
        true
    }

    fn residual_reachable(&self, source: usize) -> Vec<bool> {
        let mut seen = vec![false; self.head.len()];
        let mut queue = VecDeque::from([source]);
        seen[source] = true;
        while let Some(u) = queue.pop_front() {
            for &eid in &self.head[u] {
                let edge = &self.edges[eid];
                if edge.cap > 0 && !seen[edge.to] {
                    seen[edge.to] = true;
                    queue.push_back(edge.to);
                }
            }
        }
        seen
    }
}

/// A minimum vertex separator between the non-adjacent vertices `s` and `t`,
/// provided its size is at most `bound`. Returns the sorted separator.
///
/// Every vertex except `s` and `t` is split into an in/out pair with unit
/// capacity; the separator consists of the vertices whose split edge crosses
/// the residual cut.
pub fn minimum_vertex_separator(g: &Graph, s: u32, t: u32, bound: usize) -> Option<Vec<u32>> {
    if s == t || g.adjacent(s, t) || !g.has_vertex(s) || !g.has_vertex(t) {
        return None;
    }
    let vertices = g.vertex_list();
    let index: HashMap<u32, usize> = vertices.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    let n = vertices.len();
    let inf = (bound + 2) as i32;
    // Node 2i is the in-copy of vertex i, node 2i+1 its out-copy.
    let mut net = FlowNetwork::new(2 * n);
    for (i, &v) in vertices.iter().enumerate() {
        let cap = if v == s || v == t { inf } else { 1 };
        net.add_edge(2 * i, 2 * i + 1, cap);
    }
    for (u, v) in g.edges() {
        let (iu, iv) = (index[&u], index[&v]);
        net.add_edge(2 * iu + 1, 2 * iv, inf);
        net.add_edge(2 * iv + 1, 2 * iu, inf);
    }
    let source = 2 * index[&s] + 1;
    let sink = 2 * index[&t];
    let mut flow = 0;
    while net.augment(source, sink) {
        flow += 1;
        if flow > bound {
            return None;
        }
    }
    let reachable = net.residual_reachable(source);
    let mut cut: Vec<u32> = vertices
        .iter()
        .enumerate()
        .filter(|&(i, &v)| v != s && v != t && reachable[2 * i] && !reachable[2 * i + 1])
        .map(|(_, &v)| v)
        .collect();
    cut.sort_unstable();
    Some(cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_has_unit_cut() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        let cut = minimum_vertex_separator(&g, 1, 3, 3).unwrap();
        assert_eq!(cut, vec![2]);
    }

    #[test]
    fn test_diamond_has_two_cut() {
        let mut g = Graph::new();
        // Two vertex-disjoint paths 1-2-4 and 1-3-4.
        g.add_edge(1, 2);
        g.add_edge(2, 4);
        g.add_edge(1, 3);
        g.add_edge(3, 4);
        let cut = minimum_vertex_separator(&g, 1, 4, 3).unwrap();
        assert_eq!(cut, vec![2, 3]);
    }

    #[test]
    fn test_bound_is_respected() {
        let mut g = Graph::new();
        for mid in 2..=5 {
            g.add_edge(1, mid);
            g.add_edge(mid, 6);
        }
        // The minimum cut has four vertices, above the bound.
        assert!(minimum_vertex_separator(&g, 1, 6, 3).is_none());
        assert_eq!(
            minimum_vertex_separator(&g, 1, 6, 4).unwrap(),
            vec![2, 3, 4, 5]
        );
    }

    #[test]
    fn test_adjacent_pair_has_no_separator() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        assert!(minimum_vertex_separator(&g, 1, 2, 5).is_none());
    }
}
