/*!
# Graph Reduction

Rewrite rules that peel off vertices whose optimal bags are locally
determined: isolated, leaf, series, triangle, buddy, cube, simplicial and
almost-simplicial vertices. Every rule is an elimination, so the pending-bag
stack doubles as a partial elimination order; re-inflating a decomposition of
the reduced graph therefore has a cheap permutation path next to the generic
gluing path.

The triangle, buddy and cube rules are only sound once the treewidth is known
to be at least 3, and almost-simplicial elimination once the degree is within
the maintained lower bound; the reducer tracks that bound and raises it as
rules fire. Large graphs take a single-pass low-fill variant instead of the
exhaustive fixpoint.
*/

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::core::decomposition::TreeDecomposition;
use crate::core::error::Result;
use crate::core::graph::Graph;

/// Above this vertex count the exhaustive rule fixpoint gives way to the
/// single-pass low-fill queue.
const EXHAUSTIVE_THRESHOLD: usize = 2000;

/// A bag awaiting re-insertion: the eliminated witness vertex and its closed
/// neighborhood at elimination time.
#[derive(Debug, Clone)]
pub struct PendingBag {
    pub vertex: u32,
    pub bag: Vec<u32>,
}

/// Rule-based reducer owning a mutable processed copy of the input graph.
#[derive(Debug)]
pub struct Reducer {
    graph: Graph,
    pending: Vec<PendingBag>,
    low: usize,
    original_vertices: usize,
}

impl Reducer {
    /// Takes ownership of the working graph. `lower_bound` seeds the safety
    /// conditions of the deeper rules; pass 0 when nothing better is known.
    pub fn new(graph: Graph, lower_bound: usize) -> Self {
        let original_vertices = graph.num_vertices();
        Self {
            graph,
            pending: Vec::new(),
            low: lower_bound,
            original_vertices,
        }
    }

    /// The reduced graph H.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The maintained treewidth lower bound.
    pub fn lower_bound(&self) -> usize {
        self.low
    }

    /// The pending bags in elimination order.
    pub fn pending(&self) -> &[PendingBag] {
        &self.pending
    }

    /// Returns true if the rules consumed the whole graph.
    pub fn is_fully_reduced(&self) -> bool {
        self.graph.is_empty()
    }

    fn eliminate_into_bag(&mut self, v: u32) -> Result<()> {
        let bag = self
            .graph
            .closed_neighborhood(v)
            .ok_or_else(|| crate::core::error::TreedecError::invariant(format!(
                "reduction rule fired on missing vertex {}",
                v
            )))?;
        self.graph.eliminate(v)?;
        self.pending.push(PendingBag { vertex: v, bag });
        Ok(())
    }

    /// Applies the rules until none fires.
    pub fn reduce(&mut self) -> Result<()> {
        if self.original_vertices > EXHAUSTIVE_THRESHOLD {
            self.reduce_single_pass()?;
        } else {
            while self.apply_first_rule()? {}
        }
        debug!(
            remaining = self.graph.num_vertices(),
            pending = self.pending.len(),
            low = self.low,
            "reduction finished"
        );
        Ok(())
    }

    fn apply_first_rule(&mut self) -> Result<bool> {
        if self.apply_low_degree()? {
            return Ok(true);
        }
        if self.low >= 3 {
            if self.apply_triangle()? {
                return Ok(true);
            }
            if self.apply_buddy()? {
                return Ok(true);
            }
            if self.apply_cube()? {
                return Ok(true);
            }
        }
        if self.apply_simplicial()? {
            return Ok(true);
        }
        self.apply_almost_simplicial()
    }

    /// Isolated, leaf and series vertices, in that order.
    fn apply_low_degree(&mut self) -> Result<bool> {
        for target_degree in 0..=2usize {
            let found = self
                .graph
                .vertex_list()
                .into_iter()
                .find(|&v| self.graph.degree(v) == Some(target_degree));
            if let Some(v) = found {
                self.eliminate_into_bag(v)?;
                self.low = self.low.max(target_degree);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn apply_triangle(&mut self) -> Result<bool> {
        let found = self.graph.vertex_list().into_iter().find(|&v| {
            self.graph.degree(v) == Some(3) && self.graph.inner_edge_count(v).unwrap_or(0) >= 1
        });
        if let Some(v) = found {
            self.eliminate_into_bag(v)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Two non-adjacent degree-3 vertices with identical neighborhoods. The
    /// second becomes simplicial once the first is eliminated.
    fn apply_buddy(&mut self) -> Result<bool> {
        let mut by_neighborhood: HashMap<Vec<u32>, u32> = HashMap::new();
        for v in self.graph.vertex_list() {
            if self.graph.degree(v) != Some(3) {
                continue;
            }
            let key = self.graph.neighbors_of(v).expect("vertex exists").to_vec();
            match by_neighborhood.get(&key) {
                Some(&w) if !self.graph.adjacent(v, w) => {
                    self.eliminate_into_bag(w)?;
                    self.eliminate_into_bag(v)?;
                    return Ok(true);
                }
                Some(_) => {}
                None => {
                    by_neighborhood.insert(key, v);
                }
            }
        }
        Ok(false)
    }

    /// The corner of a 3-cube: v and its three degree-3 neighbors a, b, c
    /// whose pairwise extra common neighbors x, y, z are distinct. The three
    /// corner eliminations rewire v onto {x, y, z}.
    fn apply_cube(&mut self) -> Result<bool> {
        for v in self.graph.vertex_list() {
            if self.graph.degree(v) != Some(3) {
                continue;
            }
            let nbrs = self.graph.neighbors_of(v).expect("vertex exists").to_vec();
            let (a, b, c) = (nbrs[0], nbrs[1], nbrs[2]);
            if [a, b, c]
                .iter()
                .any(|&u| self.graph.degree(u) != Some(3))
            {
                continue;
            }
            let Some(x) = self.extra_common_neighbor(a, b, v) else {
                continue;
            };
            let Some(y) = self.extra_common_neighbor(a, c, v) else {
                continue;
            };
            let Some(z) = self.extra_common_neighbor(b, c, v) else {
                continue;
            };
            let corners = [v, a, b, c];
            let outer = [x, y, z];
            let distinct: HashSet<u32> = outer.iter().copied().collect();
            if distinct.len() != 3 || outer.iter().any(|o| corners.contains(o)) {
                continue;
            }
            self.eliminate_into_bag(a)?;
            self.eliminate_into_bag(b)?;
            self.eliminate_into_bag(c)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn extra_common_neighbor(&self, a: u32, b: u32, v: u32) -> Option<u32> {
        let nb: HashSet<u32> = self
            .graph
            .neighbors_of(b)?
            .iter()
            .copied()
            .collect();
        let common: Vec<u32> = self
            .graph
            .neighbors_of(a)?
            .iter()
            .copied()
            .filter(|&u| u != v && nb.contains(&u))
            .collect();
        match common.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn apply_simplicial(&mut self) -> Result<bool> {
        let forbidden = HashSet::new();
        if let Some(v) = self.graph.simplicial_vertex(&forbidden) {
            let degree = self.graph.degree(v).expect("vertex exists");
            self.eliminate_into_bag(v)?;
            self.low = self.low.max(degree);
            return Ok(true);
        }
        Ok(false)
    }

    fn apply_almost_simplicial(&mut self) -> Result<bool> {
        let forbidden = HashSet::new();
        if let Some((v, _witness)) = self.graph.almost_simplicial_vertex(&forbidden) {
            if self.graph.degree(v).expect("vertex exists") <= self.low {
                self.eliminate_into_bag(v)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Single-pass variant for large graphs: a work queue over low-degree and
    /// low-fill vertices, requeueing affected neighbors after every
    /// elimination.
    fn reduce_single_pass(&mut self) -> Result<()> {
        let mut queue: VecDeque<u32> = VecDeque::new();
        let mut enqueued: HashSet<u32> = HashSet::new();
        for v in self.graph.vertex_list() {
            let degree = self.graph.degree(v).expect("vertex exists");
            let fill = self.graph.fill_in_value(v)?;
            if degree <= 3 || fill <= 2 {
                queue.push_back(v);
                enqueued.insert(v);
            }
        }
        while let Some(v) = queue.pop_front() {
            enqueued.remove(&v);
            if !self.graph.has_vertex(v) {
                continue;
            }
            let degree = self.graph.degree(v).expect("vertex exists");
            let fill = self.graph.fill_in_value(v)?;
            let fires = fill <= 1 || (degree == 3 && fill <= 2 && self.low >= 3);
            if !fires {
                continue;
            }
            if fill == 0 {
                self.low = self.low.max(degree);
            }
            let neighbors = self.graph.neighbors_of(v).expect("vertex exists").to_vec();
            self.eliminate_into_bag(v)?;
            for u in neighbors {
                if self.graph.has_vertex(u) && enqueued.insert(u) {
                    queue.push_back(u);
                }
            }
        }
        Ok(())
    }

    /// Re-inflates a decomposition of the reduced graph into one of the input
    /// graph by popping pending bags: an existing bag covering the pending
    /// bag swallows it, a bag one vertex short is widened in place, otherwise
    /// the pending bag is attached to a bag containing its neighborhood, or
    /// kept detached and connected at the end.
    pub fn inflate(&self, mut td: TreeDecomposition) -> Result<TreeDecomposition> {
        td.set_num_graph_vertices(self.original_vertices);
        for pending in self.pending.iter().rev() {
            let bag = &pending.bag;
            if td.find_bag_containing(bag).is_some() {
                continue;
            }
            if let Some(id) = self.absorption_target(&td, bag) {
                td.replace_bag(id, bag.iter().copied())?;
                continue;
            }
            let without: Vec<u32> = bag
                .iter()
                .copied()
                .filter(|&u| u != pending.vertex)
                .collect();
            let fresh = td.add_bag(bag.iter().copied());
            if let Some(host) = td.find_bag_containing(&without) {
                if host != fresh {
                    td.add_edge(fresh, host)?;
                }
            }
        }
        td.connect_components()?;
        Ok(td)
    }

    /// A bag whose contents the pending bag extends by exactly one vertex.
    fn absorption_target(&self, td: &TreeDecomposition, bag: &[u32]) -> Option<u32> {
        let as_set: HashSet<u32> = bag.iter().copied().collect();
        td.bags()
            .iter()
            .find(|b| {
                b.vertices.len() + 1 >= bag.len()
                    && b.vertices.iter().all(|v| as_set.contains(v))
            })
            .map(|b| b.id)
    }

    /// Composes a full elimination order of the input graph from an order of
    /// the reduced graph: the pending vertices precede it in elimination
    /// order.
    pub fn inflate_order(&self, order_of_reduced: &[u32]) -> Vec<u32> {
        let mut order: Vec<u32> = self.pending.iter().map(|p| p.vertex).collect();
        order.extend_from_slice(order_of_reduced);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generators::{complete_graph, cycle_graph, path_graph};

    #[test]
    fn test_tree_reduces_completely() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(1, 3);
        g.add_edge(3, 4);
        g.add_edge(3, 5);
        let original = g.clone();
        let mut reducer = Reducer::new(g, 0);
        reducer.reduce().unwrap();
        assert!(reducer.is_fully_reduced());
        let td = reducer.inflate(TreeDecomposition::new(0)).unwrap();
        td.validate(&original).unwrap();
        assert_eq!(td.width(), 1);
    }

    #[test]
    fn test_clique_reduces_to_single_bag() {
        let g = complete_graph(4);
        let original = g.clone();
        let mut reducer = Reducer::new(g, 0);
        reducer.reduce().unwrap();
        assert!(reducer.is_fully_reduced());
        assert_eq!(reducer.lower_bound(), 3);
        let td = reducer.inflate(TreeDecomposition::new(0)).unwrap();
        td.validate(&original).unwrap();
        assert_eq!(td.num_bags(), 1);
        assert_eq!(td.width(), 3);
    }

    #[test]
    fn test_cycle_reduces_with_width_two() {
        let g = cycle_graph(6);
        let original = g.clone();
        let mut reducer = Reducer::new(g, 0);
        reducer.reduce().unwrap();
        assert!(reducer.is_fully_reduced());
        let td = reducer.inflate(TreeDecomposition::new(0)).unwrap();
        td.validate(&original).unwrap();
        assert_eq!(td.width(), 2);
    }

    #[test]
    fn test_buddy_rule_on_k33() {
        // K_{3,3}: every pair on one side shares the other side as its
        // neighborhood, and the triangle rule cannot fire on a bipartite
        // graph, so the buddy rule does the work.
        let mut g = Graph::new();
        for u in 1..=3u32 {
            for v in 4..=6u32 {
                g.add_edge(u, v);
            }
        }
        let original = g.clone();
        let mut reducer = Reducer::new(g, 3);
        reducer.reduce().unwrap();
        assert!(reducer.is_fully_reduced());
        let td = reducer.inflate(TreeDecomposition::new(0)).unwrap();
        td.validate(&original).unwrap();
        assert_eq!(td.width(), 3);
    }

    #[test]
    fn test_order_composition() {
        let g = path_graph(5);
        let original = g.clone();
        let mut reducer = Reducer::new(g, 0);
        reducer.reduce().unwrap();
        let order = reducer.inflate_order(&[]);
        assert_eq!(order.len(), 5);
        let td = crate::core::order::decompose_from_order(&original, &order).unwrap();
        assert_eq!(td.width(), 1);
    }

    #[test]
    fn test_inflation_on_partial_reduction() {
        // A 4-clique with a pendant path: the path reduces away, the clique
        // stays for a downstream solver.
        let mut g = complete_graph(4);
        g.add_edge(4, 5);
        g.add_edge(5, 6);
        let original = g.clone();
        let mut reducer = Reducer::new(g, 0);
        reducer.reduce().unwrap();
        // The simplicial rule consumes the clique too, so everything reduces.
        assert!(reducer.is_fully_reduced());
        let td = reducer.inflate(TreeDecomposition::new(0)).unwrap();
        td.validate(&original).unwrap();
        assert_eq!(td.width(), 3);
    }
}
