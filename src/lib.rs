pub mod core;
pub mod exact;
pub mod heuristics;
pub mod pipeline;
pub mod reduce;
pub mod separators;
#[cfg(feature = "logging")]
mod settings;
pub mod split;
