//! NPC plugin wiring philosopher presentation.
use bevy::prelude::*;

use crate::{
    npc::systems::{spawn_philosophers, sync_name_labels, sync_philosopher_sprites},
    scene::systems::{create_exploration_scene, tick_exploration_scene},
};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_philosophers.after(create_exploration_scene))
            .add_systems(
                Update,
                (sync_philosopher_sprites, sync_name_labels).after(tick_exploration_scene),
            );
    }
}
