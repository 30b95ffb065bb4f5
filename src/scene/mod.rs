//! Scene module: the per-frame coordinator and the exploration scene hosting it.
pub mod coordinator;
pub mod errors;
pub mod exploration;
pub mod plugin;
pub mod settings;
pub mod systems;

pub use plugin::ScenePlugin;
