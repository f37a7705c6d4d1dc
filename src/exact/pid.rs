/*!
# Positive-Instance-Driven Bouchitté–Todinca Solver

Exact treewidth by dynamic programming over *feasible* potential maximal
cliques only: instead of enumerating every PMC, the search grows I-Blocks
(inbound blocks already known to admit a width-k decomposition rooted at
their border) and derives new candidate PMCs from combinations of I-Blocks
with outbound blocks. A PMC realizes the block behind one of its separators
once every component hanging inside that block is an I-Block; success is a
PMC whose components are all I-Blocks, which roots the decomposition.

Blocks are oriented by the smallest vertex outside their border: the block
holding it is outbound, every other block behind the same border is inbound,
so decompositions are implicitly rooted around the smallest vertices. A PMC
realizes a block by choosing an upward component: the component of the graph
minus that side's border that swallows the PMC remainder becomes a new
I-Block once every component hanging inside it is one. I-Blocks persist
across width refreshes, so the ascending driver reseeds its queue from the
preserved I-Block set and only clears the O-Blocks, the candidate memory and
the pending list.
*/

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::core::bitgraph::BitGraph;
use crate::core::bitset::Bitset;
use crate::core::cancel::CancelFlag;
use crate::core::decomposition::TreeDecomposition;
use crate::core::error::Result;
use crate::core::graph::Graph;
use crate::core::trie::BitsetTrie;

/// I-Blocks with their realizing PMCs; preserved across width refreshes.
struct BlockStore {
    ids: HashMap<Bitset, usize>,
    blocks: Vec<Bitset>,
    realizer: Vec<Bitset>,
}

impl BlockStore {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            blocks: Vec::new(),
            realizer: Vec::new(),
        }
    }

    fn contains(&self, block: &Bitset) -> bool {
        self.ids.contains_key(block)
    }

    fn insert(&mut self, block: Bitset, realizer: Bitset) -> usize {
        let id = self.blocks.len();
        self.ids.insert(block.clone(), id);
        self.blocks.push(block);
        self.realizer.push(realizer);
        id
    }
}

struct PidSearch<'a> {
    bg: &'a BitGraph,
    k: usize,
    iblocks: &'a mut BlockStore,
    iblock_trie: BitsetTrie,
    oblocks: HashSet<Bitset>,
    oblock_trie: BitsetTrie,
    seen: HashSet<Bitset>,
    pending: Vec<Bitset>,
    queue: BinaryHeap<(usize, Reverse<usize>)>,
    candidates: Vec<Bitset>,
    root: Option<Bitset>,
}

impl<'a> PidSearch<'a> {
    fn new(bg: &'a BitGraph, k: usize, iblocks: &'a mut BlockStore) -> Self {
        let n = bg.n();
        let mut search = Self {
            bg,
            k,
            iblocks,
            iblock_trie: BitsetTrie::new(n),
            oblocks: HashSet::new(),
            oblock_trie: BitsetTrie::new(n),
            seen: HashSet::new(),
            pending: Vec::new(),
            queue: BinaryHeap::new(),
            candidates: Vec::new(),
            root: None,
        };
        // Reseed from the preserved I-Blocks.
        for id in 0..search.iblocks.blocks.len() {
            let block = search.iblocks.blocks[id].clone();
            search.iblock_trie.insert(&block);
            search.queue.push((block.count(), Reverse(id)));
        }
        search
    }

    /// A block is outbound when it holds the smallest vertex outside its own
    /// border.
    fn is_outbound(&self, block: &Bitset) -> bool {
        let border = self.bg.exterior_border(block);
        let outside = self.bg.all_vertices().difference(&border);
        let anchor = outside.first().expect("a border never covers the graph");
        block.contains(anchor)
    }

    fn enqueue_candidate(&mut self, candidate: Bitset) {
        if !candidate.is_empty() && !self.seen.contains(&candidate) {
            self.candidates.push(candidate);
        }
    }

    fn register_oblock(&mut self, block: Bitset) {
        if self.oblocks.contains(&block) || !self.is_outbound(&block) {
            return;
        }
        self.oblock_trie.insert(&block);
        let border = self.bg.exterior_border(&block);
        // Candidate PMCs around the new outbound block.
        for v in border.iter() {
            let mut candidate = block.intersection(self.bg.row(v));
            candidate.union_with(&border);
            self.enqueue_candidate(candidate);
        }
        let inner: Vec<Bitset> = self.iblock_trie.subsets(&block).collect();
        for iblock in inner {
            let candidate = border.union(&self.bg.exterior_border(&iblock));
            self.enqueue_candidate(candidate);
        }
        self.oblocks.insert(block);
    }

    fn handle_candidate(&mut self, candidate: Bitset) {
        if self.seen.contains(&candidate) {
            return;
        }
        self.seen.insert(candidate.clone());
        if candidate.count() > self.k + 1 {
            return;
        }
        if candidate.count() <= self.k {
            for full in self.bg.full_components(&candidate) {
                self.register_oblock(full);
            }
        }
        if !self.bg.is_potential_maximal_clique(&candidate) {
            return;
        }
        if self.try_feasible(&candidate) {
            self.root = Some(candidate);
        } else {
            // Buildable PMCs stay pending: a later I-Block can unlock
            // further realizations or the root check.
            self.pending.push(candidate);
        }
    }

    /// Root check plus block realization. Returns true when every component
    /// of G − K is already an I-Block, making K the decomposition root.
    /// Otherwise each component is tried as the upward side: the component of
    /// G minus that side's border holding the PMC remainder becomes a new
    /// I-Block once it is inbound and every component inside it is known.
    fn try_feasible(&mut self, pmc: &Bitset) -> bool {
        let components = self.bg.separate(pmc);
        if components.iter().all(|c| self.iblocks.contains(c)) {
            return true;
        }
        for upward in &components {
            let upward_border = self.bg.exterior_border(upward);
            let rest = pmc.difference(&upward_border);
            let Some(anchor) = rest.first() else {
                continue;
            };
            let crib = self
                .bg
                .separate(&upward_border)
                .into_iter()
                .find(|c| c.contains(anchor))
                .expect("anchor lies outside the border");
            if !rest.is_subset_of(&crib)
                || self.is_outbound(&crib)
                || self.iblocks.contains(&crib)
            {
                continue;
            }
            let ready = components
                .iter()
                .filter(|c| c.is_subset_of(&crib))
                .all(|c| self.iblocks.contains(c));
            if ready {
                let id = self.iblocks.insert(crib.clone(), pmc.clone());
                self.iblock_trie.insert(&crib);
                self.queue.push((crib.count(), Reverse(id)));
            }
        }
        false
    }

    fn process_iblock(&mut self, block: &Bitset) {
        let border = self.bg.exterior_border(block);
        // Pair with every recorded outbound block containing this one.
        let outer: Vec<Bitset> = self.oblock_trie.supersets(block).collect();
        for oblock in outer {
            let candidate = border.union(&self.bg.exterior_border(&oblock));
            self.enqueue_candidate(candidate);
        }
        // The full components of the border are outbound candidates, and each
        // one also seeds the separator-extension candidates directly.
        for full in self.bg.full_components(&border) {
            if full == *block {
                continue;
            }
            for v in border.iter() {
                let mut candidate = full.intersection(self.bg.row(v));
                candidate.union_with(&border);
                self.enqueue_candidate(candidate);
            }
            self.register_oblock(full);
        }
        // Minimal-separator extensions S ∪ {v}.
        let mut outside = self.bg.all_vertices().difference(&border);
        outside.subtract(block);
        for v in block.iter().chain(outside.iter()) {
            let mut candidate = border.clone();
            candidate.set(v);
            self.enqueue_candidate(candidate);
        }
    }

    fn run(&mut self, cancel: &CancelFlag) -> Result<Option<Bitset>> {
        for v in 0..self.bg.n() {
            let mut closed = self.bg.row(v).clone();
            closed.set(v);
            self.enqueue_candidate(closed);
        }
        loop {
            cancel.check()?;
            while let Some(candidate) = self.candidates.pop() {
                self.handle_candidate(candidate);
                if self.root.is_some() {
                    return Ok(self.root.clone());
                }
            }
            if let Some((_, Reverse(id))) = self.queue.pop() {
                let block = self.iblocks.blocks[id].clone();
                self.process_iblock(&block);
                continue;
            }
            // Main queue drained: revisit the buildable PMCs. They stay
            // pending for later rounds; the loop ends once a full pass
            // creates no I-Block.
            let before = self.iblocks.blocks.len();
            let postponed = self.pending.clone();
            for pmc in postponed {
                if self.try_feasible(&pmc) {
                    return Ok(Some(pmc));
                }
            }
            let progressed =
                self.iblocks.blocks.len() > before || !self.candidates.is_empty();
            if !progressed && self.queue.is_empty() {
                return Ok(None);
            }
        }
    }

    fn extract_block(&self, td: &mut TreeDecomposition, block: &Bitset) -> u32 {
        let pmc = {
            let id = self.iblocks.ids[block];
            self.iblocks.realizer[id].clone()
        };
        let bag = td.add_bag(self.bg.labels_of(&pmc));
        for component in self.bg.separate(&pmc) {
            if component.is_subset_of(block) {
                let child = self.extract_block(td, &component);
                td.add_edge(bag, child).expect("bags exist");
            }
        }
        bag
    }

    fn extract(&self, root: &Bitset) -> TreeDecomposition {
        let mut td = TreeDecomposition::new(self.bg.n());
        let bag = td.add_bag(self.bg.labels_of(root));
        for component in self.bg.separate(root) {
            let child = self.extract_block(&mut td, &component);
            td.add_edge(bag, child).expect("bags exist");
        }
        td
    }
}

/// Decomposes a disconnected graph component-wise with `solve_component`,
/// requiring success on every part.
fn per_component(
    graph: &Graph,
    cancel: &CancelFlag,
    solve_component: impl Fn(&Graph, &CancelFlag) -> Result<Option<TreeDecomposition>>,
) -> Result<Option<TreeDecomposition>> {
    let components = crate::separators::components::connected_components(graph);
    let mut td = TreeDecomposition::new(graph.num_vertices());
    for component in components {
        let sub = graph.induced_subgraph(&component.into_iter().collect());
        match solve_component(&sub, cancel)? {
            Some(part) => {
                td.append(part);
            }
            None => return Ok(None),
        }
    }
    td.connect_components()?;
    Ok(Some(td))
}

/// One attempt at width `k` with a fresh I-Block store. Disconnected graphs
/// are decomposed per component.
pub fn pid_decomposition(
    graph: &Graph,
    k: usize,
    cancel: &CancelFlag,
) -> Result<Option<TreeDecomposition>> {
    let n = graph.num_vertices();
    if n == 0 {
        return Ok(Some(TreeDecomposition::new(0)));
    }
    if crate::separators::components::connected_components(graph).len() > 1 {
        return per_component(graph, cancel, |sub, cancel| {
            pid_decomposition(sub, k, cancel)
        });
    }
    if k + 1 >= n {
        return Ok(Some(TreeDecomposition::trivial(graph)));
    }
    let bg = BitGraph::from_graph(graph);
    let mut store = BlockStore::new();
    let mut search = PidSearch::new(&bg, k, &mut store);
    let root = search.run(cancel)?;
    Ok(root.map(|r| search.extract(&r)))
}

/// Ascending driver seeded at `lower_bound`: preserves I-Blocks between
/// widths and returns the first decomposition found. `upper_bound` caps the
/// search; `None` means every width below the cap failed.
pub fn pid_exact(
    graph: &Graph,
    lower_bound: usize,
    upper_bound: usize,
    cancel: &CancelFlag,
) -> Result<Option<TreeDecomposition>> {
    let n = graph.num_vertices();
    if n == 0 {
        return Ok(Some(TreeDecomposition::new(0)));
    }
    if crate::separators::components::connected_components(graph).len() > 1 {
        return per_component(graph, cancel, |sub, cancel| {
            pid_exact(sub, lower_bound, upper_bound, cancel)
        });
    }
    let bg = BitGraph::from_graph(graph);
    let mut store = BlockStore::new();
    let mut k = lower_bound;
    while k <= upper_bound {
        cancel.check()?;
        if k + 1 >= n {
            return Ok(Some(TreeDecomposition::trivial(graph)));
        }
        let mut search = PidSearch::new(&bg, k, &mut store);
        if let Some(root) = search.run(cancel)? {
            debug!(k, "pid solver succeeded");
            return Ok(Some(search.extract(&root)));
        }
        k += 1;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generators::{
        complete_graph, cycle_graph, hypercube_graph, path_graph, petersen_graph,
    };

    fn width_of(graph: &Graph) -> i32 {
        let cancel = CancelFlag::new();
        let td = pid_exact(graph, 0, graph.num_vertices(), &cancel)
            .unwrap()
            .unwrap();
        td.validate(graph).unwrap();
        td.width()
    }

    #[test]
    fn test_pid_on_small_families() {
        assert_eq!(width_of(&path_graph(4)), 1);
        assert_eq!(width_of(&complete_graph(4)), 3);
        assert_eq!(width_of(&cycle_graph(5)), 2);
    }

    #[test]
    fn test_pid_on_cube() {
        assert_eq!(width_of(&hypercube_graph(3)), 3);
    }

    #[test]
    fn test_pid_on_petersen() {
        assert_eq!(width_of(&petersen_graph()), 4);
    }

    #[test]
    fn test_pid_rejects_too_small_k() {
        let cancel = CancelFlag::new();
        assert!(
            pid_decomposition(&cycle_graph(5), 1, &cancel)
                .unwrap()
                .is_none()
        );
        assert!(
            pid_decomposition(&hypercube_graph(3), 2, &cancel)
                .unwrap()
                .is_none()
        );
    }
}
