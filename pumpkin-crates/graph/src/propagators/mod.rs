//! The graph propagators.
mod connected;
mod neighbour_successor_channel;
mod node_degree_at_most;
mod transitivity;
pub mod tsp;

pub use connected::*;
pub use neighbour_successor_channel::*;
pub use node_degree_at_most::*;
pub use transitivity::*;
