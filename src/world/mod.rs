//! World module housing map data, camera follow, and obstacle rendering.
pub mod components;
pub mod map;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
