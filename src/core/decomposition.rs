/*!
# Tree Decomposition

Bags with stable positive ids arranged as a tree. The type tracks the vertex
count of the decomposed graph, exposes width as `max |bag| - 1` (so the empty
decomposition has width −1), validates the three defining properties, and can
join a forest of bag components into a single tree, which algorithms that
produce per-component decompositions rely on as their final step.
*/

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::core::error::{Result, TreedecError};
use crate::core::graph::Graph;

/// A node of the decomposition tree: a stable id and a vertex set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    pub id: u32,
    pub vertices: BTreeSet<u32>,
}

/// A tree decomposition of an undirected graph.
#[derive(Debug, Clone, Default)]
pub struct TreeDecomposition {
    bags: Vec<Bag>,
    adjacency: Vec<Vec<u32>>,
    num_graph_vertices: usize,
}

impl TreeDecomposition {
    /// Creates an empty decomposition for a graph on `num_graph_vertices`
    /// vertices.
    pub fn new(num_graph_vertices: usize) -> Self {
        Self {
            bags: Vec::new(),
            adjacency: Vec::new(),
            num_graph_vertices,
        }
    }

    /// The one-bag decomposition holding every vertex of `graph`.
    pub fn trivial(graph: &Graph) -> Self {
        let mut td = Self::new(graph.num_vertices());
        if !graph.is_empty() {
            td.add_bag(graph.vertices());
        }
        td
    }

    /// Number of bags.
    pub fn num_bags(&self) -> usize {
        self.bags.len()
    }

    /// Vertex count of the decomposed graph.
    pub fn num_graph_vertices(&self) -> usize {
        self.num_graph_vertices
    }

    /// Updates the recorded vertex count of the decomposed graph. Used when a
    /// decomposition of a reduced graph is re-inflated.
    pub fn set_num_graph_vertices(&mut self, n: usize) {
        self.num_graph_vertices = n;
    }

    /// The bags in id order.
    pub fn bags(&self) -> &[Bag] {
        &self.bags
    }

    /// The bag with the given id.
    pub fn bag(&self, id: u32) -> Option<&Bag> {
        if id == 0 {
            return None;
        }
        self.bags.get(id as usize - 1)
    }

    /// Ids of the bags adjacent to `id`.
    pub fn neighbors(&self, id: u32) -> &[u32] {
        &self.adjacency[id as usize - 1]
    }

    /// Tree edges as `(smaller, larger)` id pairs.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for bag in &self.bags {
            for &other in self.neighbors(bag.id) {
                if bag.id < other {
                    out.push((bag.id, other));
                }
            }
        }
        out
    }

    /// Creates a bag and returns its id. Ids start at 1 and are stable.
    pub fn add_bag(&mut self, vertices: impl IntoIterator<Item = u32>) -> u32 {
        let id = self.bags.len() as u32 + 1;
        self.bags.push(Bag {
            id,
            vertices: vertices.into_iter().collect(),
        });
        self.adjacency.push(Vec::new());
        id
    }

    /// Adds a tree edge between two existing bags.
    pub fn add_edge(&mut self, a: u32, b: u32) -> Result<()> {
        if a == b || self.bag(a).is_none() || self.bag(b).is_none() {
            return Err(TreedecError::invariant(format!(
                "cannot connect bags {} and {}",
                a, b
            )));
        }
        if !self.adjacency[a as usize - 1].contains(&b) {
            self.adjacency[a as usize - 1].push(b);
            self.adjacency[b as usize - 1].push(a);
        }
        Ok(())
    }

    /// Replaces the contents of a bag. Used by the re-inflation gluing step
    /// that absorbs a pending bag into an existing one.
    pub fn replace_bag(&mut self, id: u32, vertices: impl IntoIterator<Item = u32>) -> Result<()> {
        match self.bags.get_mut(id as usize - 1) {
            Some(bag) => {
                bag.vertices = vertices.into_iter().collect();
                Ok(())
            }
            None => Err(TreedecError::invariant(format!("no bag with id {}", id))),
        }
    }

    /// Largest bag size, 0 when empty.
    pub fn max_bag_size(&self) -> usize {
        self.bags.iter().map(|b| b.vertices.len()).max().unwrap_or(0)
    }

    /// Width of the decomposition: `max |bag| - 1`, or −1 when empty.
    pub fn width(&self) -> i32 {
        self.max_bag_size() as i32 - 1
    }

    /// Any bag whose contents contain all of `vertices`.
    pub fn find_bag_containing(&self, vertices: &[u32]) -> Option<u32> {
        self.bags
            .iter()
            .find(|b| vertices.iter().all(|v| b.vertices.contains(v)))
            .map(|b| b.id)
    }

    /// Appends all bags and edges of `other`, shifting its ids. Returns the
    /// offset that maps an old id of `other` to its new id.
    pub fn append(&mut self, other: TreeDecomposition) -> u32 {
        let offset = self.bags.len() as u32;
        for bag in other.bags {
            self.bags.push(Bag {
                id: bag.id + offset,
                vertices: bag.vertices,
            });
        }
        for list in other.adjacency {
            self.adjacency
                .push(list.into_iter().map(|id| id + offset).collect());
        }
        offset
    }

    fn bag_components(&self) -> Vec<Vec<u32>> {
        let mut seen: HashSet<u32> = HashSet::new();
        let mut components = Vec::new();
        for bag in &self.bags {
            if seen.contains(&bag.id) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::from([bag.id]);
            seen.insert(bag.id);
            while let Some(id) = queue.pop_front() {
                component.push(id);
                for &next in self.neighbors(id) {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Joins the components of the bag forest into a single tree by chaining
    /// one representative per component into a path.
    pub fn connect_components(&mut self) -> Result<()> {
        let roots: Vec<u32> = self
            .bag_components()
            .into_iter()
            .map(|c| c.into_iter().min().expect("component is non-empty"))
            .collect();
        for pair in roots.windows(2) {
            self.add_edge(pair[0], pair[1])?;
        }
        Ok(())
    }

    /// Checks the three defining properties against `graph` plus the shape
    /// requirement that the bag graph is a single tree.
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        if self.bags.is_empty() {
            return if graph.is_empty() {
                Ok(())
            } else {
                Err(TreedecError::invariant(
                    "decomposition has no bags but the graph has vertices",
                ))
            };
        }
        let num_edges: usize = self.adjacency.iter().map(|l| l.len()).sum::<usize>() / 2;
        if num_edges != self.bags.len() - 1 || self.bag_components().len() != 1 {
            return Err(TreedecError::invariant("bag graph is not a tree"));
        }
        for v in graph.vertices() {
            if !self.bags.iter().any(|b| b.vertices.contains(&v)) {
                return Err(TreedecError::invariant(format!(
                    "vertex {} is in no bag",
                    v
                )));
            }
        }
        for (u, v) in graph.edges() {
            if !self
                .bags
                .iter()
                .any(|b| b.vertices.contains(&u) && b.vertices.contains(&v))
            {
                return Err(TreedecError::invariant(format!(
                    "edge {{{}, {}}} is in no bag",
                    u, v
                )));
            }
        }
        for v in graph.vertices() {
            let holding: Vec<u32> = self
                .bags
                .iter()
                .filter(|b| b.vertices.contains(&v))
                .map(|b| b.id)
                .collect();
            let mut seen: HashSet<u32> = HashSet::new();
            let mut queue = VecDeque::from([holding[0]]);
            seen.insert(holding[0]);
            while let Some(id) = queue.pop_front() {
                for &next in self.neighbors(id) {
                    if self.bag(next).expect("bag exists").vertices.contains(&v)
                        && seen.insert(next)
                    {
                        queue.push_back(next);
                    }
                }
            }
            if seen.len() != holding.len() {
                return Err(TreedecError::invariant(format!(
                    "bags containing vertex {} are disconnected",
                    v
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path3_graph() -> Graph {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g
    }

    #[test]
    fn test_empty_decomposition() {
        let td = TreeDecomposition::new(0);
        assert_eq!(td.width(), -1);
        assert_eq!(td.num_bags(), 0);
        assert!(td.validate(&Graph::new()).is_ok());
    }

    #[test]
    fn test_valid_path_decomposition() {
        let g = path3_graph();
        let mut td = TreeDecomposition::new(3);
        let a = td.add_bag([1, 2]);
        let b = td.add_bag([2, 3]);
        td.add_edge(a, b).unwrap();
        assert_eq!(td.width(), 1);
        td.validate(&g).unwrap();
    }

    #[test]
    fn test_validation_catches_missing_edge() {
        let g = path3_graph();
        let mut td = TreeDecomposition::new(3);
        let a = td.add_bag([1, 2]);
        let b = td.add_bag([3]);
        td.add_edge(a, b).unwrap();
        assert!(td.validate(&g).is_err());
    }

    #[test]
    fn test_validation_catches_disconnected_trace() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(1, 3);
        let mut td = TreeDecomposition::new(3);
        let a = td.add_bag([1, 2]);
        let b = td.add_bag([2, 3]);
        let c = td.add_bag([1, 3]);
        td.add_edge(a, b).unwrap();
        td.add_edge(b, c).unwrap();
        // Vertex 1 appears in bags a and c which are not adjacent.
        assert!(td.validate(&g).is_err());
    }

    #[test]
    fn test_connect_components() {
        let mut td = TreeDecomposition::new(4);
        td.add_bag([1, 2]);
        td.add_bag([3]);
        td.add_bag([4]);
        td.connect_components().unwrap();
        let mut g = Graph::with_vertices([1, 2, 3, 4]);
        g.add_edge(1, 2);
        td.validate(&g).unwrap();
    }

    #[test]
    fn test_add_edge_to_missing_bag_fails() {
        let mut td = TreeDecomposition::new(1);
        let a = td.add_bag([1]);
        assert!(td.add_edge(a, 99).is_err());
    }

    #[test]
    fn test_append_offsets_ids() {
        let mut td = TreeDecomposition::new(4);
        td.add_bag([1]);
        let mut other = TreeDecomposition::new(4);
        let x = other.add_bag([2, 3]);
        let y = other.add_bag([3, 4]);
        other.add_edge(x, y).unwrap();
        let offset = td.append(other);
        assert_eq!(offset, 1);
        assert_eq!(td.num_bags(), 3);
        assert_eq!(td.neighbors(2).to_vec(), vec![3]);
    }
}
