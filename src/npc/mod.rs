//! NPC module: philosopher identity, roaming behaviour, and sprite presentation.
pub mod components;
pub mod config;
pub mod plugin;
pub mod roaming;
pub mod systems;

pub use plugin::NpcPlugin;
