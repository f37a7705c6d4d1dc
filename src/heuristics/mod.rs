/*!
# Heuristic Upper Bounds

Elimination-order heuristics: the scored greedy search, its stochastic
multi-restart driver, the tabu local search on permutations, the heap-driven
degree-greedy construction for very large graphs, and the minor-min-width
lower bound that seeds the exact solvers.
*/

pub mod fast;
pub mod greedy;
pub mod lower_bound;
pub mod stochastic;
pub mod tabu;

pub use fast::fast_greedy_decomposition;
pub use greedy::{GreedyConfig, GreedyOutcome, Scoring, greedy_order};
pub use lower_bound::minor_min_width;
pub use stochastic::stochastic_search;
pub use tabu::{TabuConfig, tabu_search};
