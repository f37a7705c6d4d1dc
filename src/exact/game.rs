/*!
# Catch-and-Glue Solver

Exact treewidth through the node-search game: k+1 cops catch a visible
fugitive of unbounded speed if and only if the treewidth is at most k. A
configuration is a caught region S with the cops standing on N(S); the solver
grows winning configurations bottom-up, either by flying a cop onto a border
vertex or by gluing two caught regions that meet at a shared border vertex,
saturating after every move so configurations stay canonical. Once a region
leaves at most k+1 vertices uncaught the game is won and the provenance chain
unwinds into a tree decomposition.

Configurations are interned in a dense store ([`ConfigStore`]); per-vertex
tries index regions by border membership for the glue step, and a global trie
prunes duplicates and dominated regions.
*/

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::HashMap;

use tracing::debug;

use crate::core::bitgraph::BitGraph;
use crate::core::bitset::Bitset;
use crate::core::cancel::CancelFlag;
use crate::core::decomposition::TreeDecomposition;
use crate::core::error::Result;
use crate::core::graph::Graph;
use crate::core::trie::BitsetTrie;

/// Dense interning of configurations with their provenance.
struct ConfigStore {
    ids: HashMap<Bitset, usize>,
    configs: Vec<Bitset>,
    parents: Vec<Vec<usize>>,
}

impl ConfigStore {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            configs: Vec::new(),
            parents: Vec::new(),
        }
    }

    fn intern(&mut self, config: Bitset, parents: Vec<usize>) -> usize {
        let id = self.configs.len();
        self.ids.insert(config.clone(), id);
        self.configs.push(config);
        self.parents.push(parents);
        id
    }

    fn id_of(&self, config: &Bitset) -> Option<usize> {
        self.ids.get(config).copied()
    }
}

struct GameSearch<'a> {
    bg: &'a BitGraph,
    k: usize,
    store: ConfigStore,
    memory: BitsetTrie,
    by_border: Vec<BitsetTrie>,
    queue: BinaryHeap<(usize, Reverse<usize>)>,
    winner: Option<usize>,
}

impl<'a> GameSearch<'a> {
    fn new(bg: &'a BitGraph, k: usize) -> Self {
        let n = bg.n();
        Self {
            bg,
            k,
            store: ConfigStore::new(),
            memory: BitsetTrie::new(n),
            by_border: (0..n).map(|_| BitsetTrie::new(n)).collect(),
            queue: BinaryHeap::new(),
            winner: None,
        }
    }

    /// Registers a saturated configuration unless it is pruned. Success means
    /// at most k+1 vertices remain uncaught.
    fn offer(&mut self, config: Bitset, parents: Vec<usize>) {
        if self.winner.is_some() || self.memory.contains(&config) {
            return;
        }
        let border = self.bg.exterior_border(&config);
        let mut delta = config.clone();
        for &p in &parents {
            delta.subtract(&self.store.configs[p]);
        }
        if border.count() + delta.count() > self.k + 1 {
            return;
        }
        // Dominated: a stored superset whose cops already stand inside this
        // region or on its border.
        let closed = config.union(&border);
        for stored in self.memory.supersets(&config) {
            if stored != config && self.bg.exterior_border(&stored).is_subset_of(&closed) {
                return;
            }
        }
        self.memory.insert(&config);
        let size = config.count();
        let id = self.store.intern(config, parents);
        if size + self.k + 1 >= self.bg.n() {
            self.winner = Some(id);
            return;
        }
        self.queue.push((size, Reverse(id)));
    }

    fn process(&mut self, id: usize) {
        let config = self.store.configs[id].clone();
        let border = self.bg.exterior_border(&config);
        for v in border.iter() {
            self.by_border[v].insert(&config);
            // Fly: extend the caught region by the border vertex itself.
            let mut flown = config.clone();
            flown.set(v);
            self.offer(self.bg.saturate(&flown), vec![id]);
            if self.winner.is_some() {
                return;
            }
            // Glue: grow a union of compatible partner regions sharing the
            // border vertex v, offering every stage.
            self.glue_extend(&config, vec![id], v);
            if self.winner.is_some() {
                return;
            }
        }
    }

    /// Extends `base` (the union of the configurations in `parents`) by
    /// partner regions that keep `v` on the border, offering the saturated
    /// region with `v` added at every stage. Partners are taken in ascending
    /// id order so each combination is built once.
    fn glue_extend(&mut self, base: &Bitset, parents: Vec<usize>, v: usize) {
        let base_border = self.bg.exterior_border(base);
        let mut free = self.bg.all_vertices().clone();
        free.subtract(base);
        free.subtract(&base_border);
        let partners: Vec<Bitset> = self.by_border[v].subsets(&free).collect();
        for partner in partners {
            let partner_id = self.store.id_of(&partner).expect("partner is interned");
            if parents.len() > 1 && partner_id <= *parents.last().expect("non-empty") {
                continue;
            }
            if partner_id == parents[0] {
                continue;
            }
            let partner_border = self.bg.exterior_border(&partner);
            if partner_border.intersects(base) {
                continue;
            }
            let cops = base_border.union(&partner_border);
            if cops.count() > self.k + 1 {
                continue;
            }
            let glued = base.union(&partner);
            let mut with_v = glued.clone();
            with_v.set(v);
            let mut next_parents = parents.clone();
            next_parents.push(partner_id);
            self.offer(self.bg.saturate(&with_v), next_parents.clone());
            if self.winner.is_some() {
                return;
            }
            self.glue_extend(&glued, next_parents, v);
            if self.winner.is_some() {
                return;
            }
        }
    }

    fn run(&mut self, cancel: &CancelFlag) -> Result<Option<usize>> {
        for v in 0..self.bg.n() {
            let mut seed = Bitset::new(self.bg.n());
            seed.set(v);
            self.offer(self.bg.saturate(&seed), Vec::new());
            if self.winner.is_some() {
                return Ok(self.winner);
            }
        }
        while let Some((_, Reverse(id))) = self.queue.pop() {
            cancel.check()?;
            self.process(id);
            if self.winner.is_some() {
                return Ok(self.winner);
            }
        }
        Ok(None)
    }

    /// Unwinds the provenance chain below `id` into decomposition bags.
    fn extract_into(&self, td: &mut TreeDecomposition, id: usize) -> u32 {
        let config = &self.store.configs[id];
        let border = self.bg.exterior_border(config);
        let mut delta = config.clone();
        for &p in &self.store.parents[id] {
            delta.subtract(&self.store.configs[p]);
        }
        let mut bag = delta;
        bag.union_with(&border);
        let bag_id = td.add_bag(self.bg.labels_of(&bag));
        for &p in &self.store.parents[id] {
            let child = self.extract_into(td, p);
            td.add_edge(bag_id, child).expect("bags exist");
        }
        bag_id
    }
}

/// One attempt at width `k`: `Ok(Some(td))` iff k+1 cops win on `graph`.
/// Disconnected graphs are played per component; the cops must win
/// everywhere.
pub fn game_decomposition(
    graph: &Graph,
    k: usize,
    cancel: &CancelFlag,
) -> Result<Option<TreeDecomposition>> {
    let n = graph.num_vertices();
    if n == 0 {
        return Ok(Some(TreeDecomposition::new(0)));
    }
    let components = crate::separators::components::connected_components(graph);
    if components.len() > 1 {
        let mut td = TreeDecomposition::new(n);
        for component in components {
            let sub = graph.induced_subgraph(&component.into_iter().collect());
            match game_decomposition(&sub, k, cancel)? {
                Some(part) => {
                    td.append(part);
                }
                None => return Ok(None),
            }
        }
        td.connect_components()?;
        return Ok(Some(td));
    }
    if k + 1 >= n {
        return Ok(Some(TreeDecomposition::trivial(graph)));
    }
    let bg = BitGraph::from_graph(graph);
    let mut search = GameSearch::new(&bg, k);
    let winner = search.run(cancel)?;
    let Some(root) = winner else {
        return Ok(None);
    };
    let mut td = TreeDecomposition::new(n);
    let caught = &search.store.configs[root];
    let mut uncaught = bg.all_vertices().clone();
    uncaught.subtract(caught);
    let inner = search.extract_into(&mut td, root);
    if !uncaught.is_empty() {
        let top = td.add_bag(bg.labels_of(&uncaught));
        td.add_edge(top, inner)?;
    }
    debug!(k, bags = td.num_bags(), "game solver succeeded");
    Ok(Some(td))
}

/// Ascending driver: tries k = `lower_bound`, `lower_bound`+1, … and returns
/// the first decomposition found. Terminates because k = n−1 always wins.
pub fn improve_lower_bound(
    graph: &Graph,
    lower_bound: usize,
    cancel: &CancelFlag,
) -> Result<TreeDecomposition> {
    let mut k = lower_bound;
    loop {
        cancel.check()?;
        if let Some(td) = game_decomposition(graph, k, cancel)? {
            return Ok(td);
        }
        k += 1;
    }
}

/// Descending driver: starting just below `upper_bound`, keeps decreasing k
/// while the game stays winnable; returns the narrowest decomposition found,
/// or `None` when even `upper_bound` − 1 fails.
pub fn improve_upper_bound(
    graph: &Graph,
    upper_bound: usize,
    cancel: &CancelFlag,
) -> Result<Option<TreeDecomposition>> {
    let mut best = None;
    let mut k = upper_bound;
    while k > 0 {
        cancel.check()?;
        match game_decomposition(graph, k - 1, cancel)? {
            Some(td) => {
                best = Some(td);
                k -= 1;
            }
            None => break,
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generators::{
        complete_graph, cycle_graph, hypercube_graph, path_graph, petersen_graph,
    };

    fn width_of(graph: &Graph) -> i32 {
        let cancel = CancelFlag::new();
        let td = improve_lower_bound(graph, 0, &cancel).unwrap();
        td.validate(graph).unwrap();
        td.width()
    }

    #[test]
    fn test_game_on_small_families() {
        assert_eq!(width_of(&path_graph(4)), 1);
        assert_eq!(width_of(&complete_graph(4)), 3);
        assert_eq!(width_of(&cycle_graph(5)), 2);
    }

    #[test]
    fn test_game_on_cube() {
        assert_eq!(width_of(&hypercube_graph(3)), 3);
    }

    #[test]
    fn test_game_on_petersen() {
        assert_eq!(width_of(&petersen_graph()), 4);
    }

    #[test]
    fn test_game_rejects_too_small_k() {
        let cancel = CancelFlag::new();
        assert!(
            game_decomposition(&cycle_graph(5), 1, &cancel)
                .unwrap()
                .is_none()
        );
        assert!(
            game_decomposition(&petersen_graph(), 3, &cancel)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_descending_driver() {
        let cancel = CancelFlag::new();
        let td = improve_upper_bound(&cycle_graph(6), 4, &cancel)
            .unwrap()
            .unwrap();
        assert_eq!(td.width(), 2);
    }
}
