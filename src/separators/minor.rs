/*!
# Minor-Safe Separators

The last rung of the splitter ladder before handing an atom to an exact
solver: a separator S taken from a heuristic decomposition is *safe* when,
for every component C of G − S, the separator can be completed into a clique
by contracting edges inside G[V \ C]. The check grows one branch set per
separator vertex and greedily routes each missing separator edge through a
shortest path of still-unused outside vertices; paths are vertex-disjoint, so
a successful run witnesses a labeled clique minor.
*/

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::graph::Graph;

/// Returns true if contracting inside `allowed` (disjoint from the separator)
/// can make `separator` a clique. Greedy and one-sided: `false` only means
/// the witness search failed.
fn has_clique_minor(g: &Graph, separator: &[u32], allowed: &HashSet<u32>) -> bool {
    // branch[v] = separator vertex whose branch set absorbed v.
    let mut branch: HashMap<u32, u32> = separator.iter().map(|&s| (s, s)).collect();
    let mut adjacent: HashSet<(u32, u32)> = HashSet::new();
    for (i, &a) in separator.iter().enumerate() {
        for &b in &separator[i + 1..] {
            if g.adjacent(a, b) {
                adjacent.insert((a, b));
            }
        }
    }
    for (i, &a) in separator.iter().enumerate() {
        for &b in &separator[i + 1..] {
            if adjacent.contains(&(a, b)) {
                continue;
            }
            match connect_branches(g, a, b, &branch, allowed) {
                Some(path) => {
                    for v in path {
                        branch.insert(v, a);
                    }
                    adjacent.insert((a, b));
                }
                None => return false,
            }
        }
    }
    true
}

/// Shortest path of unused `allowed` vertices joining the branch sets of `a`
/// and `b`; returns its internal vertices.
fn connect_branches(
    g: &Graph,
    a: u32,
    b: u32,
    branch: &HashMap<u32, u32>,
    allowed: &HashSet<u32>,
) -> Option<Vec<u32>> {
    let sources: Vec<u32> = branch
        .iter()
        .filter(|&(_, &owner)| owner == a)
        .map(|(&v, _)| v)
        .collect();
    let targets: HashSet<u32> = branch
        .iter()
        .filter(|&(_, &owner)| owner == b)
        .map(|(&v, _)| v)
        .collect();
    let mut parent: HashMap<u32, u32> = HashMap::new();
    let mut queue: VecDeque<u32> = VecDeque::new();
    for &s in &sources {
        parent.insert(s, s);
        queue.push_back(s);
    }
    while let Some(u) = queue.pop_front() {
        for &w in g.neighbors_of(u).unwrap_or(&[]) {
            if targets.contains(&w) {
                // Reconstruct the internal vertices between the branch sets.
                let mut path = Vec::new();
                let mut node = u;
                while parent[&node] != node {
                    path.push(node);
                    node = parent[&node];
                }
                return Some(path);
            }
            let usable = allowed.contains(&w) && !branch.contains_key(&w);
            if usable && !parent.contains_key(&w) {
                parent.insert(w, u);
                queue.push_back(w);
            }
        }
    }
    None
}

/// Returns true if `separator` is minor-safe: every component of G − S admits
/// a clique minor on S inside the rest of the graph.
pub fn is_minor_safe(g: &Graph, separator: &[u32]) -> bool {
    if separator.is_empty() {
        return false;
    }
    let sep_set: HashSet<u32> = separator.iter().copied().collect();
    let mut rest = g.clone();
    for &v in separator {
        if rest.remove_vertex(v).is_err() {
            return false;
        }
    }
    let components = crate::separators::components::connected_components(&rest);
    if components.len() < 2 {
        return false;
    }
    for component in &components {
        let inside: HashSet<u32> = component.iter().copied().collect();
        let allowed: HashSet<u32> = g
            .vertices()
            .filter(|v| !sep_set.contains(v) && !inside.contains(v))
            .collect();
        if !has_clique_minor(g, separator, &allowed) {
            return false;
        }
    }
    true
}
