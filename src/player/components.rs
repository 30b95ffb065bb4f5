//! Components for the player avatar.
use bevy::prelude::*;

/// Side length of the player's square sprite, in world pixels.
pub const PLAYER_SIZE: f32 = 24.0;

/// Marker component identifying the player entity.
#[derive(Component, Debug)]
pub struct Player;
