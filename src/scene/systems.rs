//! Systems hosting the exploration scene inside the Bevy schedule.
use bevy::prelude::*;

use crate::core::SceneClock;
use crate::dialogue::events::{DialogueTransition, DialogueTransitionEvent};
use crate::player::components::Player;
use crate::world::{components::MapPosition, map::WorldMap};

use super::{
    exploration::{ExplorationScene, FrameInput},
    settings::SceneSettings,
};

const INTERACT_KEY: KeyCode = KeyCode::Space;
const TOGGLE_LABELS_KEY: KeyCode = KeyCode::KeyL;

/// Loads the map and builds the scene resource. Setup errors are logged, never fatal.
pub fn create_exploration_scene(mut commands: Commands, settings: Res<SceneSettings>) {
    let map = WorldMap::load_or_open(&settings.map_path);
    let (scene, errors) = ExplorationScene::on_create(&settings, map);

    info!(
        "Exploration scene created with {} philosopher(s), {} setup error(s)",
        scene.coordinator().philosophers().len(),
        errors.len()
    );
    commands.insert_resource(scene);
}

/// Applies the configured time scale to the frame clock.
pub fn apply_configured_time_scale(settings: Res<SceneSettings>, mut clock: ResMut<SceneClock>) {
    clock.set_time_scale(settings.time_scale);
    debug!("Scene time scale set to {:.3}", clock.time_scale());
}

/// Samples the keyboard once per frame and forwards the scene's transitions.
pub fn tick_exploration_scene(
    keyboard: Res<ButtonInput<KeyCode>>,
    clock: Res<SceneClock>,
    mut scene: ResMut<ExplorationScene>,
    player_query: Query<&MapPosition, With<Player>>,
    mut transitions: MessageWriter<DialogueTransitionEvent>,
) {
    let player_position = player_query
        .single()
        .map(|position| position.0)
        .unwrap_or_else(|_| scene.player_spawn());

    let input = FrameInput {
        player_position,
        interact_down: keyboard.pressed(INTERACT_KEY),
        toggle_labels_down: keyboard.pressed(TOGGLE_LABELS_KEY),
        delta_seconds: clock.delta_secs(),
    };

    for transition in scene.on_tick(&input) {
        log_transition(&transition);
        transitions.write(DialogueTransitionEvent { transition });
    }
}

fn log_transition(transition: &DialogueTransition) {
    match transition {
        DialogueTransition::Started {
            speaker,
            name,
            line_count,
        } => info!(
            "Dialogue started with {} ({}), {} line(s)",
            name, speaker, line_count
        ),
        DialogueTransition::LineStarted { speaker, index, .. } => {
            debug!("{} line {} started", speaker, index)
        }
        DialogueTransition::LineRevealed {
            speaker,
            index,
            skipped,
        } => debug!("{} line {} revealed (skipped: {})", speaker, index, skipped),
        DialogueTransition::Closed { speaker, reason } => {
            info!("Dialogue with {} closed ({})", speaker, reason.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::session::DialoguePhase;

    const MAP: &str = r#"{
        "width": 16, "height": 16, "tilewidth": 32, "tileheight": 32,
        "layers": [
            { "type": "objectgroup", "name": "Objects", "objects": [
                { "name": "Krishna", "x": 256.0, "y": 256.0 },
                { "name": "Player", "x": 270.0, "y": 256.0 }
            ] }
        ]
    }"#;

    fn scene_app() -> App {
        let mut app = App::new();
        let settings = SceneSettings::default();
        let map = WorldMap::from_tiled_json(MAP).expect("map parses");
        let (scene, _) = ExplorationScene::on_create(&settings, map);

        app.insert_resource(settings)
            .insert_resource(scene)
            .insert_resource(SceneClock::default())
            .init_resource::<ButtonInput<KeyCode>>()
            .add_message::<DialogueTransitionEvent>()
            .add_systems(Update, tick_exploration_scene);
        app
    }

    fn drain(app: &mut App) -> Vec<DialogueTransition> {
        app.world_mut()
            .resource_mut::<Messages<DialogueTransitionEvent>>()
            .drain()
            .map(|event| event.transition)
            .collect()
    }

    #[test]
    fn space_press_near_philosopher_opens_dialogue() {
        let mut app = scene_app();
        app.world_mut().spawn((Player, MapPosition(Vec2::new(270.0, 256.0))));

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.update();

        let transitions = drain(&mut app);
        assert!(matches!(
            transitions.first(),
            Some(DialogueTransition::Started { name, .. }) if name == "Krishna"
        ));
        let scene = app.world().resource::<ExplorationScene>();
        assert_eq!(scene.coordinator().session().phase(), DialoguePhase::Typing);
    }

    #[test]
    fn far_away_player_only_roams() {
        let mut app = scene_app();
        app.world_mut().spawn((Player, MapPosition(Vec2::new(20.0, 20.0))));

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.update();

        assert!(drain(&mut app).is_empty());
        let scene = app.world().resource::<ExplorationScene>();
        assert!(!scene.coordinator().session().is_active());
    }

    #[test]
    fn configured_time_scale_reaches_the_clock() {
        let mut app = App::new();
        app.insert_resource(SceneSettings {
            time_scale: 2.5,
            ..SceneSettings::default()
        })
        .insert_resource(SceneClock::default())
        .add_systems(Startup, apply_configured_time_scale);
        app.update();

        assert_eq!(app.world().resource::<SceneClock>().time_scale(), 2.5);
    }
}
