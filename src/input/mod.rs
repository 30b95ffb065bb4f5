//! Input module turning held-key samples into one-shot presses.
pub mod edge;

pub use edge::InputEdgeDetector;
