/*!
# Fast Degree-Greedy Decomposer

The workhorse for very large inputs: a lazy min-heap over current degrees,
one bag per extraction, and free absorption of neighbors that turn simplicial
inside the freshly completed bag. Produces a tree decomposition directly
without going through a full permutation decode; an optional ceiling makes
the run bail out as soon as a bag would exceed it.
*/

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::core::decomposition::TreeDecomposition;
use crate::core::error::Result;
use crate::core::graph::Graph;

/// Runs the degree-greedy construction. Returns `None` when a bag reaches
/// `ceiling` vertices.
pub fn fast_greedy_decomposition(
    graph: &Graph,
    ceiling: Option<usize>,
) -> Result<Option<TreeDecomposition>> {
    let mut work = graph.clone();
    let mut td = TreeDecomposition::new(graph.num_vertices());
    let mut heap: BinaryHeap<Reverse<(usize, u32)>> = work
        .vertices()
        .map(|v| Reverse((work.degree(v).expect("vertex exists"), v)))
        .collect();
    // For every eliminated vertex: its bag and elimination time.
    let mut bag_of: HashMap<u32, u32> = HashMap::new();
    let mut time_of: HashMap<u32, usize> = HashMap::new();
    // Per bag: members eliminated into it and the full bag contents.
    let mut bag_members: Vec<(u32, Vec<u32>, Vec<u32>)> = Vec::new();
    let mut clock = 0usize;

    while let Some(Reverse((degree, v))) = heap.pop() {
        if work.degree(v) != Some(degree) {
            // Stale entry; a fresher one is in the heap.
            continue;
        }
        let bag = work.closed_neighborhood(v).expect("vertex exists");
        if let Some(limit) = ceiling {
            if bag.len() >= limit {
                return Ok(None);
            }
        }
        let id = td.add_bag(bag.iter().copied());
        let mut absorbed = vec![v];
        bag_of.insert(v, id);
        time_of.insert(v, clock);
        work.eliminate(v)?;
        // Neighbors that became simplicial inside this bag ride along.
        let mut rest: Vec<u32> = bag.iter().copied().filter(|&u| u != v).collect();
        rest.sort_unstable();
        for &u in &rest {
            let contained = work
                .closed_neighborhood(u)
                .is_some_and(|nu| nu.iter().all(|x| bag.contains(x)));
            if contained {
                bag_of.insert(u, id);
                time_of.insert(u, clock);
                absorbed.push(u);
                work.eliminate(u)?;
            }
        }
        for &u in &rest {
            if let Some(d) = work.degree(u) {
                heap.push(Reverse((d, u)));
            }
        }
        bag_members.push((id, absorbed, bag));
        clock += 1;
    }

    // Attach each bag to the bag of its earliest-eliminated survivor.
    for (id, absorbed, bag) in &bag_members {
        let parent = bag
            .iter()
            .filter(|&&u| !absorbed.contains(&u))
            .min_by_key(|&&u| time_of[&u]);
        if let Some(&u) = parent {
            let target = bag_of[&u];
            if target != *id {
                td.add_edge(*id, target)?;
            }
        }
    }
    td.connect_components()?;
    Ok(Some(td))
}
