// src/ui/dialogue_panel/mod.rs
//
// Dialogue panel module: bottom-of-screen box mirroring the scene's dialogue session.

pub mod components;
pub mod plugin;
pub mod systems;
pub mod wrap;

pub use plugin::UiPlugin;
