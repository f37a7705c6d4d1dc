/*!
# Elimination Orders

Decoding a permutation of the vertices into a tree decomposition: each vertex
in turn contributes a bag holding its closed neighborhood in the partially
eliminated graph, and the bag is attached to the bag of the neighbor that is
eliminated next. The decoder is the meeting point of the reducer, the greedy
and stochastic heuristics, and the tabu search, all of which speak in
permutations.
*/

use std::collections::HashMap;

use crate::core::decomposition::TreeDecomposition;
use crate::core::error::{Result, TreedecError};
use crate::core::graph::Graph;

fn check_permutation(graph: &Graph, order: &[u32]) -> Result<()> {
    if order.len() != graph.num_vertices() {
        return Err(TreedecError::invariant(format!(
            "elimination order has {} entries for {} vertices",
            order.len(),
            graph.num_vertices()
        )));
    }
    let mut seen = std::collections::HashSet::new();
    for &v in order {
        if !graph.has_vertex(v) {
            return Err(TreedecError::invariant(format!(
                "elimination order names unknown vertex {}",
                v
            )));
        }
        if !seen.insert(v) {
            return Err(TreedecError::invariant(format!(
                "vertex {} appears twice in the elimination order",
                v
            )));
        }
    }
    Ok(())
}

/// Decodes an elimination order into a tree decomposition of `graph`.
pub fn decompose_from_order(graph: &Graph, order: &[u32]) -> Result<TreeDecomposition> {
    check_permutation(graph, order)?;
    let position: HashMap<u32, usize> =
        order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    let mut work = graph.clone();
    let mut td = TreeDecomposition::new(graph.num_vertices());
    let mut bag_of: HashMap<u32, u32> = HashMap::new();

    let mut pending_edges: Vec<(u32, u32)> = Vec::new();
    for &v in order {
        let bag = work
            .closed_neighborhood(v)
            .ok_or_else(|| TreedecError::invariant(format!("vertex {} vanished", v)))?;
        let id = td.add_bag(bag.iter().copied());
        bag_of.insert(v, id);
        // Parent: the neighbor eliminated next.
        if let Some(&parent) = bag
            .iter()
            .filter(|&&u| u != v)
            .min_by_key(|&&u| position[&u])
        {
            pending_edges.push((id, parent));
        }
        work.eliminate(v)?;
    }
    for (id, parent_vertex) in pending_edges {
        td.add_edge(id, bag_of[&parent_vertex])?;
    }
    td.connect_components()?;
    Ok(td)
}

/// Per-position bag sizes of an order, used by the local search cost.
#[derive(Debug, Clone)]
pub struct OrderEvaluation {
    /// Largest bag over the whole order.
    pub max_bag_size: usize,
    /// `bag_sizes[i]` is the closed-neighborhood size of `order[i]` at its
    /// elimination. The number of later-positioned neighbors is one less.
    pub bag_sizes: Vec<usize>,
}

/// Simulates an elimination order without building the decomposition.
pub fn evaluate_order(graph: &Graph, order: &[u32]) -> Result<OrderEvaluation> {
    check_permutation(graph, order)?;
    let mut work = graph.clone();
    let mut bag_sizes = Vec::with_capacity(order.len());
    let mut max_bag_size = 0;
    for &v in order {
        let size = work
            .degree(v)
            .ok_or_else(|| TreedecError::invariant(format!("vertex {} vanished", v)))?
            + 1;
        max_bag_size = max_bag_size.max(size);
        bag_sizes.push(size);
        work.eliminate(v)?;
    }
    Ok(OrderEvaluation {
        max_bag_size,
        bag_sizes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path4() -> Graph {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(3, 4);
        g
    }

    #[test]
    fn test_path_order_has_width_one() {
        let g = path4();
        let td = decompose_from_order(&g, &[1, 2, 3, 4]).unwrap();
        assert_eq!(td.width(), 1);
        td.validate(&g).unwrap();
    }

    #[test]
    fn test_bad_orders_are_rejected() {
        let g = path4();
        assert!(decompose_from_order(&g, &[1, 2, 3]).is_err());
        assert!(decompose_from_order(&g, &[1, 2, 3, 3]).is_err());
        assert!(decompose_from_order(&g, &[1, 2, 3, 9]).is_err());
    }

    #[test]
    fn test_worst_order_on_star() {
        let mut g = Graph::new();
        g.add_edge(1, 2);
        g.add_edge(1, 3);
        g.add_edge(1, 4);
        // Eliminating the center first fills the leaves into a clique.
        let td = decompose_from_order(&g, &[1, 2, 3, 4]).unwrap();
        assert_eq!(td.width(), 3);
        td.validate(&g).unwrap();
        // Leaves first keeps width 1.
        let td = decompose_from_order(&g, &[2, 3, 4, 1]).unwrap();
        assert_eq!(td.width(), 1);
    }

    #[test]
    fn test_evaluate_matches_decode() {
        let g = path4();
        let eval = evaluate_order(&g, &[2, 1, 3, 4]).unwrap();
        let td = decompose_from_order(&g, &[2, 1, 3, 4]).unwrap();
        assert_eq!(eval.max_bag_size as i32 - 1, td.width());
        assert_eq!(eval.bag_sizes.len(), 4);
    }
}
