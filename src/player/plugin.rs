//! Player plugin wiring the avatar's spawn and movement.
use bevy::prelude::*;

use crate::{
    player::systems::{move_player, spawn_player},
    scene::systems::create_exploration_scene,
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player.after(create_exploration_scene))
            .add_systems(Update, move_player);
    }
}
