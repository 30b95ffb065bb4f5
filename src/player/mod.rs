//! Player module: the walking avatar and the proximity query used to pick a conversation partner.
pub mod components;
pub mod plugin;
pub mod proximity;
pub mod systems;

pub use plugin::PlayerPlugin;
