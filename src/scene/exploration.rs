//! The exploration scene: map data, philosophers and the dialogue session behind
//! two lifecycle hooks driven by the host loop.
use std::collections::HashSet;

use bevy::prelude::*;

use crate::dialogue::{events::DialogueTransition, session::DialogueSession};
use crate::input::InputEdgeDetector;
use crate::npc::roaming::{agent_seed, RoamingAgent};
use crate::world::map::WorldMap;

use super::{
    coordinator::{SceneCoordinator, TickInput},
    errors::SceneSetupError,
    settings::SceneSettings,
};

/// Keys the scene edge-detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Interact,
    ToggleLabels,
}

/// Raw per-frame samples handed to [`ExplorationScene::on_tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub player_position: Vec2,
    pub interact_down: bool,
    pub toggle_labels_down: bool,
    pub delta_seconds: f32,
}

#[derive(Resource, Debug)]
pub struct ExplorationScene {
    coordinator: SceneCoordinator,
    keys: InputEdgeDetector<SceneKey>,
    map: WorldMap,
    player_spawn: Vec2,
}

impl ExplorationScene {
    /// Builds the scene. Philosophers without a spawn point are left out and reported.
    pub fn on_create(settings: &SceneSettings, map: WorldMap) -> (Self, Vec<SceneSetupError>) {
        let mut errors = Vec::new();
        let mut placed = HashSet::new();
        let mut philosophers = Vec::new();

        for (index, config) in settings.philosophers.iter().enumerate() {
            if !placed.insert(config.id.clone()) {
                errors.push(SceneSetupError::DuplicatePhilosopher {
                    id: config.id.clone(),
                });
                continue;
            }

            let Some(spawn) = map.find_spawn_point(|name| config.matches_spawn_point(name)) else {
                errors.push(SceneSetupError::MissingSpawnPoint {
                    id: config.id.clone(),
                    name: config.name.clone(),
                });
                continue;
            };

            philosophers.push(RoamingAgent::new(
                config,
                spawn.position,
                agent_seed(settings.seed, index),
            ));
        }

        for error in &errors {
            error!("Scene setup: {}", error);
        }

        let player_spawn = map
            .find_spawn_point(|name| name.eq_ignore_ascii_case(&settings.player.spawn_point))
            .map(|spawn| spawn.position)
            .unwrap_or_else(|| {
                let centre = map.pixel_size() * 0.5;
                warn!(
                    "Player spawn point \"{}\" not found; starting at map centre ({:.0}, {:.0})",
                    settings.player.spawn_point, centre.x, centre.y
                );
                centre
            });

        let coordinator = SceneCoordinator::new(
            philosophers,
            DialogueSession::new(settings.reveal_interval_secs),
            settings.labels_visible_on_start,
        );

        let scene = Self {
            coordinator,
            keys: InputEdgeDetector::new(),
            map,
            player_spawn,
        };
        (scene, errors)
    }

    /// Runs one frame: edge-detects the keys, then lets the coordinator resolve it.
    pub fn on_tick(&mut self, input: &FrameInput) -> Vec<DialogueTransition> {
        if self
            .keys
            .pressed(SceneKey::ToggleLabels, input.toggle_labels_down)
        {
            let visible = !self.coordinator.labels_visible();
            self.coordinator.set_labels_visible(visible);
            debug!("Philosopher labels {}", if visible { "shown" } else { "hidden" });
        }

        let interact_pressed = self.keys.pressed(SceneKey::Interact, input.interact_down);
        self.coordinator.tick(
            &TickInput {
                player_position: input.player_position,
                interact_pressed,
                delta_seconds: input.delta_seconds,
            },
            &self.map,
        )
    }

    pub fn coordinator(&self) -> &SceneCoordinator {
        &self.coordinator
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn player_spawn(&self) -> Vec2 {
        self.player_spawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::session::DialoguePhase;
    use crate::npc::components::PhilosopherId;

    const MAP: &str = r#"{
        "width": 20, "height": 20, "tilewidth": 32, "tileheight": 32,
        "layers": [
            { "type": "objectgroup", "name": "Objects", "objects": [
                { "name": "KRISHNA", "x": 320.0, "y": 320.0 },
                { "name": "player", "x": 330.0, "y": 320.0 }
            ] }
        ]
    }"#;

    fn settings() -> SceneSettings {
        SceneSettings {
            reveal_interval_secs: 0.25,
            ..SceneSettings::default()
        }
    }

    fn frame(scene: &ExplorationScene, interact: bool, labels: bool) -> FrameInput {
        FrameInput {
            player_position: scene.player_spawn(),
            interact_down: interact,
            toggle_labels_down: labels,
            delta_seconds: 0.25,
        }
    }

    #[test]
    fn missing_spawn_points_are_reported_not_fatal() {
        let map = WorldMap::from_tiled_json(MAP).expect("map parses");
        let (scene, errors) = ExplorationScene::on_create(&settings(), map);

        assert_eq!(scene.coordinator().philosophers().len(), 1);
        assert_eq!(
            scene.coordinator().philosophers()[0].id(),
            &PhilosopherId::new("krishna")
        );
        assert_eq!(
            errors,
            vec![SceneSetupError::MissingSpawnPoint {
                id: PhilosopherId::new("vivekananda"),
                name: "Vivekananda".into(),
            }]
        );
        assert_eq!(scene.player_spawn(), Vec2::new(330.0, 320.0));
    }

    #[test]
    fn duplicate_ids_are_skipped() {
        let mut settings = settings();
        let copy = settings.philosophers[0].clone();
        settings.philosophers.push(copy);
        let map = WorldMap::from_tiled_json(MAP).expect("map parses");

        let (scene, errors) = ExplorationScene::on_create(&settings, map);
        assert_eq!(scene.coordinator().philosophers().len(), 1);
        assert!(errors.contains(&SceneSetupError::DuplicatePhilosopher {
            id: PhilosopherId::new("krishna"),
        }));
    }

    #[test]
    fn held_interact_key_starts_only_once() {
        let map = WorldMap::from_tiled_json(MAP).expect("map parses");
        let (mut scene, _) = ExplorationScene::on_create(&settings(), map);

        let opened = scene.on_tick(&frame(&scene, true, false));
        assert!(matches!(opened[0], DialogueTransition::Started { .. }));

        // Holding the key neither skips nor closes.
        for _ in 0..3 {
            let transitions = scene.on_tick(&frame(&scene, true, false));
            assert!(transitions.is_empty());
        }
        assert_eq!(scene.coordinator().session().phase(), DialoguePhase::Typing);

        scene.on_tick(&frame(&scene, false, false));
        scene.on_tick(&frame(&scene, true, false));
        assert_eq!(
            scene.coordinator().session().phase(),
            DialoguePhase::AwaitingAdvance
        );
    }

    #[test]
    fn label_toggle_flips_on_each_press() {
        let map = WorldMap::from_tiled_json(MAP).expect("map parses");
        let (mut scene, _) = ExplorationScene::on_create(&settings(), map);
        assert!(scene.coordinator().labels_visible());

        scene.on_tick(&frame(&scene, false, true));
        scene.on_tick(&frame(&scene, false, true));
        assert!(!scene.coordinator().labels_visible());

        scene.on_tick(&frame(&scene, false, false));
        scene.on_tick(&frame(&scene, false, true));
        assert!(scene.coordinator().labels_visible());
    }

    #[test]
    fn missing_player_spawn_uses_map_centre() {
        let (scene, errors) = ExplorationScene::on_create(&settings(), WorldMap::open(10, 8, 16));
        assert_eq!(errors.len(), 2);
        assert!(scene.coordinator().philosophers().is_empty());
        assert_eq!(scene.player_spawn(), Vec2::new(80.0, 64.0));
    }

    #[test]
    fn shipped_map_places_the_default_roster() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets/maps/vedagent-town.json");
        let map = WorldMap::load(&path).expect("shipped map loads");
        let (scene, errors) = ExplorationScene::on_create(&SceneSettings::default(), map);

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(scene.coordinator().philosophers().len(), 2);
        assert_eq!(scene.player_spawn(), Vec2::new(640.0, 768.0));
    }
}
