// src/ui/mod.rs
//
// UI module providing the screen-space dialogue surface.

pub mod dialogue_panel;

pub use dialogue_panel::UiPlugin;
