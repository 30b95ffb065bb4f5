//! Core module providing the per-frame clock every scene system reads.
pub mod plugin;

pub use plugin::{CorePlugin, SceneClock};
