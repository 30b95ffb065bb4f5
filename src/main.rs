use bevy::prelude::*;

mod core;
mod dialogue;
mod input;
mod npc;
mod player;
mod scene;
mod ui;
mod world;

use crate::{
    core::CorePlugin, dialogue::DialoguePlugin, npc::NpcPlugin, player::PlayerPlugin,
    scene::ScenePlugin, ui::UiPlugin, world::WorldPlugin,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Philosopher Grove".into(),
                    ..default()
                }),
                ..default()
            }),
            CorePlugin,
            ScenePlugin, // Before the presentation plugins that read ExplorationScene
            WorldPlugin,
            PlayerPlugin,
            NpcPlugin,
            DialoguePlugin,
            UiPlugin,
        ))
        .run();
}
