/*!
# Bitset Graph

Adjacency-matrix view of a graph as one row bitset per vertex, with the
derived set operators the exact solvers are built from: borders, component
separation, saturation, and the potential-maximal-clique test of
Bouchitté–Todinca. Component decompositions, exterior borders and PMC verdicts
are memoized on bitset identity; the caches sit behind a `RefCell` because the
solvers drive the graph single-threaded and the operators are logically pure.

Positions are dense `0..n` indices; `labels` maps a position back to the vertex
id of the originating [`Graph`](crate::core::graph::Graph).
*/

use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::bitset::Bitset;
use crate::core::graph::Graph;

#[derive(Default)]
struct BitCache {
    components: HashMap<Bitset, Vec<Bitset>>,
    borders: HashMap<Bitset, Bitset>,
    pmc: HashMap<Bitset, bool>,
}

/// Dense bitset representation of a graph.
pub struct BitGraph {
    n: usize,
    rows: Vec<Bitset>,
    labels: Vec<u32>,
    index: HashMap<u32, usize>,
    all: Bitset,
    cache: RefCell<BitCache>,
}

impl BitGraph {
    /// Builds the bitset view of `graph`, assigning positions in ascending
    /// label order.
    pub fn from_graph(graph: &Graph) -> Self {
        let labels = graph.vertex_list();
        let n = labels.len();
        let index: HashMap<u32, usize> =
            labels.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let mut rows = vec![Bitset::new(n); n];
        for (u, v) in graph.edges() {
            let (pu, pv) = (index[&u], index[&v]);
            rows[pu].set(pv);
            rows[pv].set(pu);
        }
        Self {
            n,
            rows,
            labels,
            index,
            all: Bitset::full(n),
            cache: RefCell::new(BitCache::default()),
        }
    }

    /// Number of vertices.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The vertex label at `position`.
    pub fn label(&self, position: usize) -> u32 {
        self.labels[position]
    }

    /// The position of vertex `label`, if present.
    pub fn position(&self, label: u32) -> Option<usize> {
        self.index.get(&label).copied()
    }

    /// Adjacency row of the vertex at `position`.
    pub fn row(&self, position: usize) -> &Bitset {
        &self.rows[position]
    }

    /// Bitset of all vertices.
    pub fn all_vertices(&self) -> &Bitset {
        &self.all
    }

    /// Returns true if the two positions are adjacent.
    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        self.rows[u].contains(v)
    }

    /// Translates a position set into sorted vertex labels.
    pub fn labels_of(&self, set: &Bitset) -> Vec<u32> {
        set.iter().map(|p| self.labels[p]).collect()
    }

    /// The exterior border N(S) \ S. Memoized.
    pub fn exterior_border(&self, s: &Bitset) -> Bitset {
        if let Some(hit) = self.cache.borrow().borders.get(s) {
            return hit.clone();
        }
        let mut border = Bitset::new(self.n);
        for v in s.iter() {
            border.union_with(&self.rows[v]);
        }
        border.subtract(s);
        self.cache
            .borrow_mut()
            .borders
            .insert(s.clone(), border.clone());
        border
    }

    /// The interior border: vertices of S with a neighbor outside S.
    pub fn interior_border(&self, s: &Bitset) -> Bitset {
        let mut border = Bitset::new(self.n);
        for v in s.iter() {
            if !self.rows[v].is_subset_of(s) {
                border.set(v);
            }
        }
        border
    }

    /// S together with its exterior border.
    pub fn closed_neighborhood(&self, s: &Bitset) -> Bitset {
        let mut closed = self.exterior_border(s);
        closed.union_with(s);
        closed
    }

    fn component_of(&self, start: usize, excluded: &Bitset) -> Bitset {
        let mut comp = Bitset::new(self.n);
        comp.set(start);
        loop {
            let mut frontier = Bitset::new(self.n);
            for v in comp.iter() {
                frontier.union_with(&self.rows[v]);
            }
            frontier.subtract(excluded);
            frontier.subtract(&comp);
            if frontier.is_empty() {
                return comp;
            }
            comp.union_with(&frontier);
        }
    }

    /// Connected components of G[V \ S]. Memoized.
    pub fn separate(&self, s: &Bitset) -> Vec<Bitset> {
        if let Some(hit) = self.cache.borrow().components.get(s) {
            return hit.clone();
        }
        let mut remaining = self.all.difference(s);
        let mut components = Vec::new();
        while let Some(start) = remaining.first() {
            let comp = self.component_of(start, s);
            remaining.subtract(&comp);
            components.push(comp);
        }
        self.cache
            .borrow_mut()
            .components
            .insert(s.clone(), components.clone());
        components
    }

    /// Components of G[V \ K] whose exterior border equals the whole of `k`.
    pub fn full_components(&self, k: &Bitset) -> Vec<Bitset> {
        self.separate(k)
            .into_iter()
            .filter(|c| self.exterior_border(c) == *k)
            .collect()
    }

    /// Absorbs into S every border vertex whose neighborhood lies inside
    /// S ∪ N(S), iterating to the fixpoint.
    pub fn saturate(&self, s: &Bitset) -> Bitset {
        let mut current = s.clone();
        loop {
            let border = self.exterior_border(&current);
            let closed = current.union(&border);
            let mut absorbed = false;
            let mut next = current.clone();
            for v in border.iter() {
                if self.rows[v].is_subset_of(&closed) {
                    next.set(v);
                    absorbed = true;
                }
            }
            if !absorbed {
                return current;
            }
            current = next;
        }
    }

    /// Returns true if `k` induces a clique.
    pub fn is_clique(&self, k: &Bitset) -> bool {
        for v in k.iter() {
            let mut rest = k.clone();
            rest.unset(v);
            if !rest.is_subset_of(&self.rows[v]) {
                return false;
            }
        }
        true
    }

    /// The Bouchitté–Todinca potential-maximal-clique test: no component of
    /// G[V \ K] is full, and every non-adjacent pair of K is seen by a common
    /// component. Memoized.
    pub fn is_potential_maximal_clique(&self, k: &Bitset) -> bool {
        if let Some(hit) = self.cache.borrow().pmc.get(k) {
            return *hit;
        }
        let verdict = self.pmc_uncached(k);
        self.cache.borrow_mut().pmc.insert(k.clone(), verdict);
        verdict
    }

    fn pmc_uncached(&self, k: &Bitset) -> bool {
        if k.is_empty() {
            return false;
        }
        let components = self.separate(k);
        let borders: Vec<Bitset> = components
            .iter()
            .map(|c| self.exterior_border(c))
            .collect();
        if borders.iter().any(|b| b == k) {
            return false;
        }
        // Cliquish: each non-edge of K must be covered by a component
        // adjacent to both endpoints.
        let members: Vec<usize> = k.iter().collect();
        for (i, &u) in members.iter().enumerate() {
            for &v in &members[i + 1..] {
                if self.adjacent(u, v) {
                    continue;
                }
                let covered = borders
                    .iter()
                    .any(|b| b.contains(u) && b.contains(v));
                if !covered {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle5() -> BitGraph {
        let mut g = Graph::new();
        for i in 1..=5u32 {
            g.add_edge(i, i % 5 + 1);
        }
        BitGraph::from_graph(&g)
    }

    #[test]
    fn test_borders_and_separate() {
        let bg = cycle5();
        // Positions equal label-1 because labels are 1..=5.
        let s = Bitset::from_positions(5, &[0]);
        let border = bg.exterior_border(&s);
        assert_eq!(border.iter().collect::<Vec<_>>(), vec![1, 4]);

        let comps = bg.separate(&Bitset::from_positions(5, &[1, 4]));
        assert_eq!(comps.len(), 2);
        let sizes: Vec<usize> = comps.iter().map(|c| c.count()).collect();
        assert!(sizes.contains(&1) && sizes.contains(&2));
    }

    #[test]
    fn test_interior_border() {
        let bg = cycle5();
        let s = Bitset::from_positions(5, &[0, 1, 2]);
        // 1 is interior only when both neighbors are inside; here vertex
        // positions 0 and 2 touch the outside.
        assert_eq!(
            bg.interior_border(&s).iter().collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn test_pmc_on_cycle() {
        let bg = cycle5();
        // Three consecutive cycle vertices form a PMC of C5.
        assert!(bg.is_potential_maximal_clique(&Bitset::from_positions(5, &[0, 1, 2])));
        // A single edge leaves a full component.
        assert!(!bg.is_potential_maximal_clique(&Bitset::from_positions(5, &[0, 1])));
        // Two non-adjacent cycle vertices leave full components.
        assert!(!bg.is_potential_maximal_clique(&Bitset::from_positions(5, &[0, 2])));
    }

    #[test]
    fn test_saturate_absorbs_pendants() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        let bg = BitGraph::from_graph(&g);
        // Saturating {1} absorbs nothing: N(2) reaches 3 outside {1} ∪ {2}.
        let s = bg.saturate(&Bitset::from_positions(3, &[0]));
        assert_eq!(s.count(), 1);
        // Saturating {1, 3} absorbs 2.
        let s = bg.saturate(&Bitset::from_positions(3, &[0, 2]));
        assert_eq!(s.count(), 3);
    }

    #[test]
    fn test_clique_test() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(1, 3);
        g.add_edge(3, 4);
        let bg = BitGraph::from_graph(&g);
        assert!(bg.is_clique(&Bitset::from_positions(4, &[0, 1, 2])));
        assert!(!bg.is_clique(&Bitset::from_positions(4, &[0, 1, 3])));
    }
}
