/*!
# Graph Store

The mutable working representation used by the reducer, the heuristics and the
branch-and-bound style virtual eliminations. Vertices are `u32` labels (the
PACE reader keeps the original 1-based ids). Three structures are maintained in
lockstep on every mutation:

- an ordered neighbor list per vertex (kept sorted),
- a neighbor hash set per vertex for O(1) adjacency queries,
- a counter `e(v)` holding the number of edges inside N(v), so the fill-in
  value `C(deg(v), 2) - e(v)` is available in O(1).

`eliminate` returns an owned [`EliminationRecord`] that `de_eliminate`
consumes to restore the exact pre-elimination state, including all counters.
*/

use std::collections::{HashMap, HashSet};

use crate::core::error::{Result, TreedecError};

/// Undo record produced by [`Graph::eliminate`].
#[derive(Debug, Clone)]
pub struct EliminationRecord {
    /// The eliminated vertex.
    pub vertex: u32,
    /// Its neighborhood at elimination time, sorted.
    pub neighbors: Vec<u32>,
    /// Fill edges added while turning the neighborhood into a clique.
    pub added_edges: Vec<(u32, u32)>,
}

/// Undirected simple graph with fill-in counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    neighbors: HashMap<u32, Vec<u32>>,
    neighbor_sets: HashMap<u32, HashSet<u32>>,
    inner_edges: HashMap<u32, usize>,
    num_edges: usize,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with the given isolated vertices.
    pub fn with_vertices(vertices: impl IntoIterator<Item = u32>) -> Self {
        let mut g = Self::new();
        for v in vertices {
            g.add_vertex(v);
        }
        g
    }

    /// Adds an isolated vertex. No-op if present.
    pub fn add_vertex(&mut self, v: u32) {
        self.neighbors.entry(v).or_default();
        self.neighbor_sets.entry(v).or_default();
        self.inner_edges.entry(v).or_insert(0);
    }

    /// Returns true if `v` is a vertex of the graph.
    pub fn has_vertex(&self, v: u32) -> bool {
        self.neighbors.contains_key(&v)
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Returns true if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Iterates over the vertices in arbitrary order.
    pub fn vertices(&self) -> impl Iterator<Item = u32> + '_ {
        self.neighbors.keys().copied()
    }

    /// The vertices in ascending order.
    pub fn vertex_list(&self) -> Vec<u32> {
        let mut vs: Vec<u32> = self.neighbors.keys().copied().collect();
        vs.sort_unstable();
        vs
    }

    /// The sorted neighbor list of `v`, or `None` if `v` is not a vertex.
    pub fn neighbors_of(&self, v: u32) -> Option<&[u32]> {
        self.neighbors.get(&v).map(|n| n.as_slice())
    }

    /// Degree of `v`, or `None` if `v` is not a vertex.
    pub fn degree(&self, v: u32) -> Option<usize> {
        self.neighbors.get(&v).map(|n| n.len())
    }

    /// Returns true if `u` and `v` are adjacent.
    pub fn adjacent(&self, u: u32, v: u32) -> bool {
        self.neighbor_sets
            .get(&u)
            .is_some_and(|s| s.contains(&v))
    }

    /// Iterates over the edges as `(u, v)` pairs with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.neighbors.iter().flat_map(|(&u, ns)| {
            ns.iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }

    fn insert_neighbor(&mut self, u: u32, v: u32) {
        let list = self.neighbors.get_mut(&u).expect("vertex present");
        if let Err(pos) = list.binary_search(&v) {
            list.insert(pos, v);
        }
        self.neighbor_sets.get_mut(&u).expect("vertex present").insert(v);
    }

    fn erase_neighbor(&mut self, u: u32, v: u32) {
        let list = self.neighbors.get_mut(&u).expect("vertex present");
        if let Ok(pos) = list.binary_search(&v) {
            list.remove(pos);
        }
        self.neighbor_sets.get_mut(&u).expect("vertex present").remove(&v);
    }

    fn common_neighbors(&self, u: u32, v: u32) -> Vec<u32> {
        let su = &self.neighbor_sets[&u];
        let sv = &self.neighbor_sets[&v];
        let (small, large) = if su.len() <= sv.len() { (su, sv) } else { (sv, su) };
        small.iter().copied().filter(|x| large.contains(x)).collect()
    }

    /// Adds the edge `{u, v}`, creating missing endpoints. Idempotent; returns
    /// true if the edge was new. Self loops are ignored.
    pub fn add_edge(&mut self, u: u32, v: u32) -> bool {
        if u == v {
            return false;
        }
        self.add_vertex(u);
        self.add_vertex(v);
        if self.adjacent(u, v) {
            return false;
        }
        // Every common neighbor closes a triangle: the new edge lies inside
        // its neighborhood, and each common neighbor contributes one edge
        // inside N(u) and one inside N(v).
        let common = self.common_neighbors(u, v);
        for &x in &common {
            *self.inner_edges.get_mut(&x).expect("vertex present") += 1;
        }
        *self.inner_edges.get_mut(&u).expect("vertex present") += common.len();
        *self.inner_edges.get_mut(&v).expect("vertex present") += common.len();
        self.insert_neighbor(u, v);
        self.insert_neighbor(v, u);
        self.num_edges += 1;
        true
    }

    /// Removes the edge `{u, v}`. Idempotent; returns true if it existed.
    pub fn remove_edge(&mut self, u: u32, v: u32) -> bool {
        if !self.adjacent(u, v) {
            return false;
        }
        self.erase_neighbor(u, v);
        self.erase_neighbor(v, u);
        self.num_edges -= 1;
        let common = self.common_neighbors(u, v);
        for &x in &common {
            *self.inner_edges.get_mut(&x).expect("vertex present") -= 1;
        }
        *self.inner_edges.get_mut(&u).expect("vertex present") -= common.len();
        *self.inner_edges.get_mut(&v).expect("vertex present") -= common.len();
        true
    }

    /// Removes `v` and all incident edges.
    pub fn remove_vertex(&mut self, v: u32) -> Result<()> {
        let nbrs = self
            .neighbors
            .get(&v)
            .ok_or_else(|| TreedecError::invariant(format!("vertex {} is not in the graph", v)))?
            .clone();
        for u in nbrs {
            self.remove_edge(v, u);
        }
        self.neighbors.remove(&v);
        self.neighbor_sets.remove(&v);
        self.inner_edges.remove(&v);
        Ok(())
    }

    /// Eliminates `v`: turns N(v) into a clique and removes `v`. The returned
    /// record restores the graph exactly via [`Graph::de_eliminate`].
    pub fn eliminate(&mut self, v: u32) -> Result<EliminationRecord> {
        let nbrs = self
            .neighbors
            .get(&v)
            .ok_or_else(|| TreedecError::invariant(format!("cannot eliminate missing vertex {}", v)))?
            .clone();
        let mut added = Vec::new();
        for i in 0..nbrs.len() {
            for j in i + 1..nbrs.len() {
                if self.add_edge(nbrs[i], nbrs[j]) {
                    added.push((nbrs[i], nbrs[j]));
                }
            }
        }
        self.remove_vertex(v)?;
        Ok(EliminationRecord {
            vertex: v,
            neighbors: nbrs,
            added_edges: added,
        })
    }

    /// Reverses an elimination. The graph must be in the state produced by the
    /// matching [`Graph::eliminate`] call.
    pub fn de_eliminate(&mut self, record: EliminationRecord) -> Result<()> {
        if self.has_vertex(record.vertex) {
            return Err(TreedecError::invariant(format!(
                "cannot de-eliminate vertex {}: already present",
                record.vertex
            )));
        }
        self.add_vertex(record.vertex);
        for &u in &record.neighbors {
            self.add_edge(record.vertex, u);
        }
        for (a, b) in record.added_edges {
            self.remove_edge(a, b);
        }
        Ok(())
    }

    /// Number of fill edges elimination of `v` would create. O(1).
    pub fn fill_in_value(&self, v: u32) -> Result<usize> {
        let deg = self
            .degree(v)
            .ok_or_else(|| TreedecError::invariant(format!("vertex {} is not in the graph", v)))?;
        let inner = self.inner_edges[&v];
        Ok(deg * deg.saturating_sub(1) / 2 - inner)
    }

    /// Number of edges inside N(v). O(1).
    pub fn inner_edge_count(&self, v: u32) -> Option<usize> {
        self.inner_edges.get(&v).copied()
    }

    /// Any vertex outside `forbidden` whose neighborhood is a clique.
    pub fn simplicial_vertex(&self, forbidden: &HashSet<u32>) -> Option<u32> {
        let mut vs = self.vertex_list();
        vs.retain(|v| !forbidden.contains(v));
        vs.into_iter()
            .find(|&v| self.fill_in_value(v).unwrap_or(usize::MAX) == 0)
    }

    /// Any vertex outside `forbidden` whose neighborhood misses a clique by
    /// one vertex: some `z` in N(v) is incident to every non-edge inside N(v).
    /// Returns `(v, z)` for the smallest such `z`.
    pub fn almost_simplicial_vertex(&self, forbidden: &HashSet<u32>) -> Option<(u32, u32)> {
        for v in self.vertex_list() {
            if forbidden.contains(&v) {
                continue;
            }
            if let Some(z) = self.almost_simplicial_witness(v) {
                return Some((v, z));
            }
        }
        None
    }

    fn almost_simplicial_witness(&self, v: u32) -> Option<u32> {
        let nbrs = self.neighbors.get(&v)?;
        let mut candidates: Option<Vec<u32>> = None;
        let mut has_non_edge = false;
        for i in 0..nbrs.len() {
            for j in i + 1..nbrs.len() {
                if self.adjacent(nbrs[i], nbrs[j]) {
                    continue;
                }
                has_non_edge = true;
                let pair = [nbrs[i], nbrs[j]];
                candidates = Some(match candidates {
                    None => pair.to_vec(),
                    Some(cs) => cs.into_iter().filter(|c| pair.contains(c)).collect(),
                });
                if candidates.as_ref().is_some_and(|cs| cs.is_empty()) {
                    return None;
                }
            }
        }
        if !has_non_edge {
            return None;
        }
        candidates.and_then(|cs| cs.into_iter().min())
    }

    /// The induced subgraph on `vertices`.
    pub fn induced_subgraph(&self, vertices: &HashSet<u32>) -> Graph {
        let mut sub = Graph::new();
        for &v in vertices {
            if self.has_vertex(v) {
                sub.add_vertex(v);
            }
        }
        for (u, v) in self.edges() {
            if vertices.contains(&u) && vertices.contains(&v) {
                sub.add_edge(u, v);
            }
        }
        sub
    }

    /// Closed neighborhood of `v` as a sorted vector.
    pub fn closed_neighborhood(&self, v: u32) -> Option<Vec<u32>> {
        let mut bag = self.neighbors.get(&v)?.clone();
        let pos = bag.binary_search(&v).unwrap_err();
        bag.insert(pos, v);
        Some(bag)
    }
}
