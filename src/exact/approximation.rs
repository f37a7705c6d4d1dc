/*!
# Iterative Balanced-Separator Approximation

The Robertson–Seymour scheme: guess a width k, recursively split the current
part on a separator of at most k+1 vertices that is balanced with respect to
the boundary set W (no component keeps more than half of W), and put W ∪ S
into a bag. The invariants |W| ≤ 3k+3 and |S| ≤ k+1 bound every bag by
4k+4, and parts of at most 4k+4 vertices become leaf bags outright. When no
balanced separator exists the guess k was too small and the driver retries
one larger.

Separators are taken from the bounded max-flow search between non-adjacent
boundary pairs, so the module leans on the same machinery as the splitter.
*/

use std::collections::HashSet;

use tracing::debug;

use crate::core::cancel::CancelFlag;
use crate::core::decomposition::TreeDecomposition;
use crate::core::error::Result;
use crate::core::graph::Graph;
use crate::separators::components::connected_components;
use crate::separators::flow::minimum_vertex_separator;

/// Builds a decomposition of width at most 4k+3 for the smallest workable k.
pub fn approximate_decomposition(
    graph: &Graph,
    lower_bound: usize,
    cancel: &CancelFlag,
) -> Result<TreeDecomposition> {
    if graph.is_empty() {
        return Ok(TreeDecomposition::new(0));
    }
    let mut k = lower_bound;
    loop {
        cancel.check()?;
        if let Some(td) = try_width(graph, k, cancel)? {
            debug!(k, width = td.width(), "approximation succeeded");
            return Ok(td);
        }
        k += 1;
    }
}

fn try_width(graph: &Graph, k: usize, cancel: &CancelFlag) -> Result<Option<TreeDecomposition>> {
    let mut td = TreeDecomposition::new(graph.num_vertices());
    let part: HashSet<u32> = graph.vertices().collect();
    let boundary = HashSet::new();
    match build(graph, &part, &boundary, k, &mut td, cancel)? {
        Some(_) => {
            td.connect_components()?;
            Ok(Some(td))
        }
        None => Ok(None),
    }
}

/// Recursive step: decomposes `part` with boundary `w`, returning the id of
/// a bag containing all of `w`, or `None` when k is too small.
fn build(
    graph: &Graph,
    part: &HashSet<u32>,
    w: &HashSet<u32>,
    k: usize,
    td: &mut TreeDecomposition,
    cancel: &CancelFlag,
) -> Result<Option<u32>> {
    cancel.check()?;
    if part.len() <= 4 * k + 4 {
        return Ok(Some(td.add_bag(part.iter().copied())));
    }
    let sub = graph.induced_subgraph(part);
    let Some((separator, components)) = balanced_separator(&sub, w, k) else {
        return Ok(None);
    };
    let mut bag_content: HashSet<u32> = w.clone();
    bag_content.extend(separator.iter().copied());
    let bag = td.add_bag(bag_content.iter().copied());
    for component in components {
        let mut child_part: HashSet<u32> = component.iter().copied().collect();
        let mut child_w: HashSet<u32> = separator.iter().copied().collect();
        for &v in &component {
            if w.contains(&v) {
                child_w.insert(v);
            }
        }
        child_part.extend(separator.iter().copied());
        let Some(child) = build(graph, &child_part, &child_w, k, td, cancel)? else {
            return Ok(None);
        };
        td.add_edge(bag, child)?;
    }
    Ok(Some(bag))
}

/// A separator of at most k+1 vertices of `sub` that actually splits it and
/// leaves at most half of `w` in every component.
fn balanced_separator(
    sub: &Graph,
    w: &HashSet<u32>,
    k: usize,
) -> Option<(Vec<u32>, Vec<Vec<u32>>)> {
    let vertices = sub.vertex_list();
    // Boundary pairs first: those drive the balance condition.
    let mut pairs: Vec<(u32, u32)> = Vec::new();
    for (i, &a) in vertices.iter().enumerate() {
        for &b in &vertices[i + 1..] {
            if !sub.adjacent(a, b) {
                if w.contains(&a) && w.contains(&b) {
                    pairs.insert(0, (a, b));
                } else {
                    pairs.push((a, b));
                }
            }
        }
    }
    for (a, b) in pairs {
        let Some(separator) = minimum_vertex_separator(sub, a, b, k) else {
            continue;
        };
        let mut rest = sub.clone();
        for &v in &separator {
            rest.remove_vertex(v).expect("vertex exists");
        }
        let components = connected_components(&rest);
        if components.len() < 2 {
            continue;
        }
        let balanced = components
            .iter()
            .all(|c| 2 * c.iter().filter(|&v| w.contains(v)).count() <= w.len() + 1);
        if balanced {
            return Some((separator, components));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generators::{cycle_graph, erdos_renyi_graph, path_graph};

    #[test]
    fn test_approximation_is_valid_and_bounded() {
        let g = path_graph(30);
        let cancel = CancelFlag::new();
        let td = approximate_decomposition(&g, 0, &cancel).unwrap();
        td.validate(&g).unwrap();
        // Treewidth 1: bags stay within 4k+4 for some k ≤ 1.
        assert!(td.max_bag_size() <= 8);
    }

    #[test]
    fn test_approximation_on_cycle() {
        let g = cycle_graph(24);
        let cancel = CancelFlag::new();
        let td = approximate_decomposition(&g, 0, &cancel).unwrap();
        td.validate(&g).unwrap();
        assert!(td.max_bag_size() <= 12);
    }

    #[test]
    fn test_approximation_on_random_graph() {
        let g = erdos_renyi_graph(25, 0.2, 11).unwrap();
        let cancel = CancelFlag::new();
        let td = approximate_decomposition(&g, 0, &cancel).unwrap();
        td.validate(&g).unwrap();
    }
}
