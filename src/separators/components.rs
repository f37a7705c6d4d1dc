/*!
# Connectivity Invariants

Connected components, articulation points (Hopcroft–Tarjan lowpoint search,
iterative so deep graphs cannot overflow the stack), two-vertex separators by
fixing a vertex and re-running the articulation search, and the guarded
three-vertex separator search used by the splitter on small graphs.
*/

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::graph::Graph;
use crate::separators::flow::minimum_vertex_separator;

/// Connected components as sorted vertex lists, ordered by smallest member.
pub fn connected_components(g: &Graph) -> Vec<Vec<u32>> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut components = Vec::new();
    for v in g.vertex_list() {
        if seen.contains(&v) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([v]);
        seen.insert(v);
        while let Some(u) = queue.pop_front() {
            component.push(u);
            for &w in g.neighbors_of(u).expect("vertex exists") {
                if seen.insert(w) {
                    queue.push_back(w);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Returns true if the graph is connected. The empty graph counts as
/// connected.
pub fn is_connected(g: &Graph) -> bool {
    connected_components(g).len() <= 1
}

/// All articulation points, ascending.
pub fn articulation_points(g: &Graph) -> Vec<u32> {
    let mut disc: HashMap<u32, usize> = HashMap::new();
    let mut low: HashMap<u32, usize> = HashMap::new();
    let mut cut: HashSet<u32> = HashSet::new();
    let mut timer = 0usize;

    for root in g.vertex_list() {
        if disc.contains_key(&root) {
            continue;
        }
        // Iterative lowpoint DFS; each frame remembers how far its neighbor
        // list has been scanned.
        let mut stack: Vec<(u32, Option<u32>, usize)> = vec![(root, None, 0)];
        let mut root_children = 0usize;
        disc.insert(root, timer);
        low.insert(root, timer);
        timer += 1;
        while let Some(&mut (v, parent, ref mut cursor)) = stack.last_mut() {
            let neighbors = g.neighbors_of(v).expect("vertex exists");
            if *cursor < neighbors.len() {
                let w = neighbors[*cursor];
                *cursor += 1;
                if Some(w) == parent {
                    continue;
                }
                match disc.get(&w) {
                    Some(&d) => {
                        let lv = low.get_mut(&v).expect("visited");
                        *lv = (*lv).min(d);
                    }
                    None => {
                        disc.insert(w, timer);
                        low.insert(w, timer);
                        timer += 1;
                        if v == root {
                            root_children += 1;
                        }
                        stack.push((w, Some(v), 0));
                    }
                }
            } else {
                stack.pop();
                if let Some(&(p, _, _)) = stack.last() {
                    let lv = low[&v];
                    let lp = low.get_mut(&p).expect("visited");
                    *lp = (*lp).min(lv);
                    if p != root && lv >= disc[&p] {
                        cut.insert(p);
                    }
                }
            }
        }
        if root_children >= 2 {
            cut.insert(root);
        }
    }
    let mut out: Vec<u32> = cut.into_iter().collect();
    out.sort_unstable();
    out
}

/// The smallest articulation point, if any.
pub fn articulation_point(g: &Graph) -> Option<u32> {
    articulation_points(g).into_iter().next()
}

/// A two-vertex separator of a biconnected graph: fix `v` and look for an
/// articulation point of G − v.
pub fn two_separator(g: &Graph) -> Option<(u32, u32)> {
    if g.num_vertices() < 4 {
        return None;
    }
    for v in g.vertex_list() {
        let mut rest = g.clone();
        rest.remove_vertex(v).expect("vertex exists");
        if let Some(c) = articulation_point(&rest) {
            return Some((v, c));
        }
    }
    None
}

/// A *safe* three-vertex separator: a minimum vertex cut `S = {a, b, c}` of
/// some non-adjacent pair such that S induces an edge, or splits the graph
/// into at least three components, or is the full neighborhood of no vertex.
pub fn safe_three_separator(g: &Graph) -> Option<Vec<u32>> {
    let vertices = g.vertex_list();
    for (i, &s) in vertices.iter().enumerate() {
        for &t in &vertices[i + 1..] {
            if g.adjacent(s, t) {
                continue;
            }
            let Some(cut) = minimum_vertex_separator(g, s, t, 3) else {
                continue;
            };
            if cut.len() != 3 {
                continue;
            }
            if is_safe_three(g, &cut) {
                return Some(cut);
            }
        }
    }
    None
}

fn is_safe_three(g: &Graph, cut: &[u32]) -> bool {
    let induces_edge = g.adjacent(cut[0], cut[1])
        || g.adjacent(cut[0], cut[2])
        || g.adjacent(cut[1], cut[2]);
    if induces_edge {
        return true;
    }
    let mut rest = g.clone();
    for &v in cut {
        rest.remove_vertex(v).expect("vertex exists");
    }
    if connected_components(&rest).len() >= 3 {
        return true;
    }
    let as_set: HashSet<u32> = cut.iter().copied().collect();
    g.vertices().all(|v| {
        g.neighbors_of(v)
            .map(|ns| ns.len() != 3 || !ns.iter().all(|u| as_set.contains(u)))
            .unwrap_or(true)
    })
}
