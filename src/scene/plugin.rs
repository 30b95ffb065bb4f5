//! ScenePlugin loads the scene configuration and drives the exploration scene each frame.
use bevy::prelude::*;

use crate::player::systems::move_player;

use super::{
    settings::SceneSettings,
    systems::{apply_configured_time_scale, create_exploration_scene, tick_exploration_scene},
};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        let settings = SceneSettings::load_or_default();
        info!(
            "Scene settings: seed {:#x}, time scale {:.2}, {} philosopher(s), map {}",
            settings.seed,
            settings.time_scale,
            settings.philosophers.len(),
            settings.map_path.display()
        );

        app.insert_resource(settings)
            .add_systems(
                Startup,
                (apply_configured_time_scale, create_exploration_scene),
            )
            .add_systems(Update, tick_exploration_scene.after(move_player));
    }
}
