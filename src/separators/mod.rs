/*!
# Separator Invariants

Connectivity and separator machinery backing the splitter: connected
components and articulation points, bounded-flow minimum vertex separators,
clique-minimal separators via minimal triangulation, and the labeled-minor
safety check.
*/

pub mod clique;
pub mod components;
pub mod flow;
pub mod minor;

pub use clique::clique_minimal_separator;
pub use components::{articulation_point, connected_components, is_connected};
pub use flow::minimum_vertex_separator;
pub use minor::is_minor_safe;
