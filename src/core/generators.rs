/*!
# Graph Generators

Classic graph families used by the test suites and benches. Vertices are
labeled 1..=n to match the PACE convention of the rest of the crate. The
random generator is seeded for reproducibility.
*/

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::error::{Result, TreedecError};
use crate::core::graph::Graph;

/// Path on `n` vertices.
pub fn path_graph(n: u32) -> Graph {
    let mut g = Graph::with_vertices(1..=n);
    for v in 1..n {
        g.add_edge(v, v + 1);
    }
    g
}

/// Cycle on `n` vertices.
pub fn cycle_graph(n: u32) -> Graph {
    let mut g = path_graph(n);
    if n >= 3 {
        g.add_edge(n, 1);
    }
    g
}

/// Complete graph on `n` vertices.
pub fn complete_graph(n: u32) -> Graph {
    let mut g = Graph::with_vertices(1..=n);
    for u in 1..=n {
        for v in u + 1..=n {
            g.add_edge(u, v);
        }
    }
    g
}

/// Erdős–Rényi graph G(n, p) with a seeded generator.
pub fn erdos_renyi_graph(n: u32, p: f64, seed: u64) -> Result<Graph> {
    if !(0.0..=1.0).contains(&p) {
        return Err(TreedecError::invariant(format!(
            "edge probability {} outside [0, 1]",
            p
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = Graph::with_vertices(1..=n);
    for u in 1..=n {
        for v in u + 1..=n {
            if rng.random_bool(p) {
                g.add_edge(u, v);
            }
        }
    }
    Ok(g)
}

/// Hypercube graph Q_dim on 2^dim vertices: labels differing in one bit are
/// adjacent.
pub fn hypercube_graph(dim: u32) -> Graph {
    let n = 1u32 << dim;
    let mut g = Graph::with_vertices(1..=n);
    for code in 0..n {
        for bit in 0..dim {
            let other = code ^ (1 << bit);
            if code < other {
                g.add_edge(code + 1, other + 1);
            }
        }
    }
    g
}

/// The Petersen graph: outer 5-cycle 1..=5, inner 5-star 6..=10, spokes.
pub fn petersen_graph() -> Graph {
    let mut g = Graph::with_vertices(1..=10);
    for i in 0..5u32 {
        g.add_edge(i + 1, (i + 1) % 5 + 1);
        g.add_edge(i + 6, (i + 2) % 5 + 6);
        g.add_edge(i + 1, i + 6);
    }
    g
}
