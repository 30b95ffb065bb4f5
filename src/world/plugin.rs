//! WorldPlugin coordinates the camera and obstacle rendering for the scene map.
use bevy::prelude::*;

use crate::{
    player::systems::move_player,
    scene::systems::create_exploration_scene,
    world::systems::{follow_player_camera, spawn_obstacle_tiles, spawn_world_camera},
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(96, 140, 88)))
            .add_systems(
                Startup,
                (
                    spawn_world_camera,
                    spawn_obstacle_tiles.after(create_exploration_scene),
                ),
            )
            .add_systems(Update, follow_player_camera.after(move_player));
    }
}
