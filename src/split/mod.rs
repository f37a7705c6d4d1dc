/*!
# Safe-Separator Splitter

Recursive divide-and-conquer over the safe-separator ladder: disconnected
parts, cut vertices, two- and three-vertex separators, clique-minimal and
almost-clique separators, and finally labeled-minor safe separators. Each
fork completes the separator to a clique inside every component subgraph,
decomposes the parts (in parallel when configured), and glues the results
around a fresh bag holding exactly the separator. Whatever survives the
ladder is an atom and goes to the configured solver.

The ladder restarts from the top for every child: a component carved out by
one separator may well be disconnected or articulated again.
*/

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::core::cancel::CancelFlag;
use crate::core::decomposition::TreeDecomposition;
use crate::core::error::{Result, TreedecError};
use crate::core::graph::Graph;
use crate::exact::AtomSolver;
use crate::separators::clique::clique_minimal_separator;
use crate::separators::components::{
    articulation_point, connected_components, safe_three_separator, two_separator,
};
use crate::separators::minor::is_minor_safe;
use crate::heuristics::fast::fast_greedy_decomposition;

/// Vertex-count gate for the expensive three-separator and almost-clique
/// searches.
const SMALL_GRAPH_LIMIT: usize = 200;

/// The rungs of the splitting ladder, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SplitMode {
    Disconnected,
    CutVertex,
    TwoSeparator,
    ThreeSeparator,
    Clique,
    AlmostClique,
    Minor,
    Atom,
}

impl SplitMode {
    fn next(self) -> SplitMode {
        match self {
            SplitMode::Disconnected => SplitMode::CutVertex,
            SplitMode::CutVertex => SplitMode::TwoSeparator,
            SplitMode::TwoSeparator => SplitMode::ThreeSeparator,
            SplitMode::ThreeSeparator => SplitMode::Clique,
            SplitMode::Clique => SplitMode::AlmostClique,
            SplitMode::AlmostClique => SplitMode::Minor,
            SplitMode::Minor | SplitMode::Atom => SplitMode::Atom,
        }
    }
}

/// Recursive splitting task dispatching atoms to `solver`.
#[derive(Debug, Clone)]
pub struct Splitter {
    pub solver: AtomSolver,
    /// First ladder mode to skip; everything from here on is solved as an
    /// atom.
    pub target: SplitMode,
    pub parallel: bool,
    pub seed: u64,
}

impl Splitter {
    pub fn new(solver: AtomSolver, parallel: bool, seed: u64) -> Self {
        Self {
            solver,
            target: SplitMode::Atom,
            parallel,
            seed,
        }
    }

    /// Decomposes `graph` by recursive safe splitting.
    pub fn decompose(&self, graph: &Graph, cancel: &CancelFlag) -> Result<TreeDecomposition> {
        self.decompose_from(graph, SplitMode::Disconnected, self.seed, cancel)
    }

    fn decompose_from(
        &self,
        graph: &Graph,
        start: SplitMode,
        seed: u64,
        cancel: &CancelFlag,
    ) -> Result<TreeDecomposition> {
        if graph.is_empty() {
            return Ok(TreeDecomposition::new(0));
        }
        let mut mode = start;
        loop {
            if mode >= self.target {
                mode = SplitMode::Atom;
            }
            let separator = match mode {
                SplitMode::Disconnected => Some(Vec::new()),
                SplitMode::CutVertex => articulation_point(graph).map(|c| vec![c]),
                SplitMode::TwoSeparator => two_separator(graph).map(|(a, b)| vec![a, b]),
                SplitMode::ThreeSeparator => {
                    if graph.num_vertices() <= SMALL_GRAPH_LIMIT {
                        safe_three_separator(graph)
                    } else {
                        None
                    }
                }
                SplitMode::Clique => clique_minimal_separator(graph),
                SplitMode::AlmostClique => {
                    if graph.num_vertices() <= SMALL_GRAPH_LIMIT {
                        almost_clique_separator(graph)
                    } else {
                        None
                    }
                }
                SplitMode::Minor => self.minor_separator(graph),
                SplitMode::Atom => {
                    return Ok(self.solver.solve(graph, seed, cancel));
                }
            };
            if let Some(separator) = separator {
                if let Some(td) = self.fork(graph, &separator, mode, seed, cancel)? {
                    return Ok(td);
                }
            }
            mode = mode.next();
        }
    }

    /// Splits on `separator` if it actually disconnects the graph. Each
    /// component keeps the separator, completed to a clique; the glued result
    /// has one fresh bag on exactly the separator.
    fn fork(
        &self,
        graph: &Graph,
        separator: &[u32],
        mode: SplitMode,
        seed: u64,
        cancel: &CancelFlag,
    ) -> Result<Option<TreeDecomposition>> {
        cancel.check()?;
        let sep_set: HashSet<u32> = separator.iter().copied().collect();
        let mut rest = graph.clone();
        for &v in separator {
            rest.remove_vertex(v)?;
        }
        let components = connected_components(&rest);
        if components.len() < 2 {
            return Ok(None);
        }
        debug!(?mode, separator_len = separator.len(), parts = components.len(), "forking");
        let subtasks: Vec<(Graph, u64)> = components
            .iter()
            .enumerate()
            .map(|(i, component)| {
                let mut keep: HashSet<u32> = component.iter().copied().collect();
                keep.extend(sep_set.iter().copied());
                let mut sub = graph.induced_subgraph(&keep);
                for (i, &a) in separator.iter().enumerate() {
                    for &b in &separator[i + 1..] {
                        sub.add_edge(a, b);
                    }
                }
                (sub, derive_seed(seed, i))
            })
            .collect();
        let children: Vec<Result<TreeDecomposition>> = if self.parallel {
            subtasks
                .into_par_iter()
                .map(|(sub, child_seed)| {
                    self.decompose_from(&sub, SplitMode::Disconnected, child_seed, cancel)
                })
                .collect()
        } else {
            subtasks
                .into_iter()
                .map(|(sub, child_seed)| {
                    self.decompose_from(&sub, SplitMode::Disconnected, child_seed, cancel)
                })
                .collect()
        };
        let mut td = TreeDecomposition::new(graph.num_vertices());
        let glue_bag = if separator.is_empty() {
            None
        } else {
            Some(td.add_bag(separator.iter().copied()))
        };
        for child in children {
            let child = child?;
            let offset = td.append(child);
            if let Some(glue) = glue_bag {
                let host = td
                    .bags()
                    .iter()
                    .skip(offset as usize)
                    .find(|b| separator.iter().all(|v| b.vertices.contains(v)))
                    .map(|b| b.id)
                    .ok_or_else(|| {
                        TreedecError::invariant("child decomposition lost the separator clique")
                    })?;
                td.add_edge(glue, host)?;
            }
        }
        td.connect_components()?;
        Ok(Some(td))
    }

    /// A minor-safe separator taken from the edges of a heuristic
    /// decomposition.
    fn minor_separator(&self, graph: &Graph) -> Option<Vec<u32>> {
        let guide = fast_greedy_decomposition(graph, None).ok()??;
        let mut tried: HashSet<Vec<u32>> = HashSet::new();
        for (a, b) in guide.edges() {
            let bag_a = &guide.bag(a)?.vertices;
            let bag_b = &guide.bag(b)?.vertices;
            let separator: Vec<u32> = bag_a.intersection(bag_b).copied().collect();
            if separator.is_empty() || !tried.insert(separator.clone()) {
                continue;
            }
            if is_minor_safe(graph, &separator) {
                return Some(separator);
            }
        }
        None
    }
}

fn derive_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add(1 + index as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// An almost-clique separator: a vertex v plus a clique-minimal separator of
/// G − v whose removal leaves only components fully attached to the clique
/// part.
fn almost_clique_separator(graph: &Graph) -> Option<Vec<u32>> {
    for v in graph.vertex_list() {
        let mut rest = graph.clone();
        rest.remove_vertex(v).ok()?;
        let Some(clique_part) = clique_minimal_separator(&rest) else {
            continue;
        };
        let mut separator = clique_part.clone();
        separator.push(v);
        separator.sort_unstable();
        let mut remainder = graph.clone();
        for &s in &separator {
            remainder.remove_vertex(s).ok()?;
        }
        let clique_set: HashSet<u32> = clique_part.iter().copied().collect();
        let components = connected_components(&remainder);
        let all_full = components.iter().all(|component| {
            let mut touched: HashSet<u32> = HashSet::new();
            for &u in component {
                for &w in graph.neighbors_of(u).unwrap_or(&[]) {
                    if clique_set.contains(&w) {
                        touched.insert(w);
                    }
                }
            }
            touched.len() == clique_set.len()
        });
        // The extra vertex must be needed: it has to see at least two of the
        // components, else the clique part alone already separates.
        let v_sides = components
            .iter()
            .filter(|component| {
                component
                    .iter()
                    .any(|&u| graph.adjacent(u, v))
            })
            .count();
        if all_full && v_sides >= 2 {
            return Some(separator);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generators::{complete_graph, cycle_graph, path_graph};

    fn exact_splitter(parallel: bool) -> Splitter {
        Splitter::new(
            AtomSolver::PidBt {
                lower_bound: None,
                upper_bound: None,
            },
            parallel,
            13,
        )
    }

    #[test]
    fn test_split_disconnected_graph() {
        let mut g = path_graph(4);
        g.add_edge(10, 11);
        g.add_vertex(20);
        let cancel = CancelFlag::new();
        let td = exact_splitter(false).decompose(&g, &cancel).unwrap();
        td.validate(&g).unwrap();
        assert_eq!(td.width(), 1);
    }

    #[test]
    fn test_split_two_cliques_on_cut_vertex() {
        // K4 and K3 sharing vertex 4.
        let mut g = complete_graph(4);
        g.add_edge(4, 5);
        g.add_edge(4, 6);
        g.add_edge(5, 6);
        let cancel = CancelFlag::new();
        let td = exact_splitter(false).decompose(&g, &cancel).unwrap();
        td.validate(&g).unwrap();
        assert_eq!(td.width(), 3);
    }

    #[test]
    fn test_split_cycles_joined_by_edge_separator() {
        // Two 5-cycles sharing the edge {1, 2}: a clique-minimal separator.
        let mut g = cycle_graph(5);
        g.add_edge(1, 6);
        g.add_edge(6, 7);
        g.add_edge(7, 8);
        g.add_edge(8, 2);
        g.add_edge(1, 2);
        let cancel = CancelFlag::new();
        let td = exact_splitter(false).decompose(&g, &cancel).unwrap();
        td.validate(&g).unwrap();
        assert_eq!(td.width(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut g = complete_graph(4);
        g.add_edge(4, 5);
        g.add_edge(5, 6);
        g.add_edge(6, 7);
        g.add_edge(7, 5);
        let cancel = CancelFlag::new();
        let sequential = exact_splitter(false).decompose(&g, &cancel).unwrap();
        let parallel = exact_splitter(true).decompose(&g, &cancel).unwrap();
        sequential.validate(&g).unwrap();
        parallel.validate(&g).unwrap();
        assert_eq!(sequential.width(), parallel.width());
    }
}
