//! Scene configuration loaded from `config/scene.toml`.
use std::{fs, path::Path, path::PathBuf};

use bevy::prelude::*;
use serde::Deserialize;

use crate::dialogue::session::DEFAULT_REVEAL_INTERVAL_SECS;
use crate::npc::{
    components::{Facing, PhilosopherId},
    config::{
        default_roster, PhilosopherConfig, RoamingSettings, DEFAULT_DIRECTION_CHANGE_CHANCE,
        DEFAULT_IDLE_SECONDS, DEFAULT_MOVE_SECONDS, DEFAULT_MOVE_SPEED, DEFAULT_PAUSE_CHANCE,
    },
};

const CONFIG_PATH: &str = "config/scene.toml";
const DEFAULT_MAP_PATH: &str = "assets/maps/vedagent-town.json";
const DEFAULT_SEED: u64 = 0x5eed_0f_a9e5;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_PLAYER_SPEED: f32 = 160.0;
const DEFAULT_PLAYER_SPAWN: &str = "Player";

const PALETTE: [[u8; 3]; 6] = [
    [70, 110, 200],
    [220, 130, 50],
    [150, 80, 170],
    [60, 160, 120],
    [200, 70, 90],
    [180, 170, 60],
];

#[derive(Debug, Clone, Deserialize, Default)]
struct RawSceneConfig {
    #[serde(default)]
    scene: RawSceneSection,
    #[serde(default)]
    player: RawPlayerSection,
    /// Absent means "use the built-in roster"; an empty list means "no philosophers".
    philosophers: Option<Vec<RawPhilosopher>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSceneSection {
    seed: u64,
    time_scale: f32,
    reveal_interval_secs: f32,
    labels_visible_on_start: bool,
    map_path: String,
}

impl Default for RawSceneSection {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            time_scale: DEFAULT_TIME_SCALE,
            reveal_interval_secs: DEFAULT_REVEAL_INTERVAL_SECS,
            labels_visible_on_start: true,
            map_path: DEFAULT_MAP_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPlayerSection {
    speed: f32,
    spawn_point: String,
}

impl Default for RawPlayerSection {
    fn default() -> Self {
        Self {
            speed: DEFAULT_PLAYER_SPEED,
            spawn_point: DEFAULT_PLAYER_SPAWN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawPhilosopher {
    id: String,
    name: String,
    default_direction: Facing,
    roam_radius: f32,
    default_message: String,
    #[serde(default)]
    script: Vec<String>,
    #[serde(default = "default_move_speed")]
    move_speed: f32,
    #[serde(default = "default_pause_chance")]
    pause_chance: f32,
    #[serde(default = "default_direction_change_chance")]
    direction_change_chance: f32,
    #[serde(default = "default_idle_seconds")]
    idle_seconds: [f32; 2],
    #[serde(default = "default_move_seconds")]
    move_seconds: [f32; 2],
    #[serde(default)]
    color: Option<[u8; 3]>,
}

fn default_move_speed() -> f32 {
    DEFAULT_MOVE_SPEED
}

fn default_pause_chance() -> f32 {
    DEFAULT_PAUSE_CHANCE
}

fn default_direction_change_chance() -> f32 {
    DEFAULT_DIRECTION_CHANGE_CHANCE
}

fn default_idle_seconds() -> [f32; 2] {
    [DEFAULT_IDLE_SECONDS.0, DEFAULT_IDLE_SECONDS.1]
}

fn default_move_seconds() -> [f32; 2] {
    [DEFAULT_MOVE_SECONDS.0, DEFAULT_MOVE_SECONDS.1]
}

/// Player tunables.
#[derive(Debug, Clone)]
pub struct PlayerSettings {
    /// World pixels per second.
    pub speed: f32,
    /// Name of the spawn object the player starts on (case-insensitive).
    pub spawn_point: String,
}

/// Runtime configuration of the exploration scene.
#[derive(Resource, Debug, Clone)]
pub struct SceneSettings {
    pub seed: u64,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    pub reveal_interval_secs: f32,
    pub labels_visible_on_start: bool,
    pub map_path: PathBuf,
    pub player: PlayerSettings,
    pub philosophers: Vec<PhilosopherConfig>,
}

impl SceneSettings {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(data) => Self::from_toml_or_default(&data),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawSceneConfig::default().into()
            }
        }
    }

    fn from_toml_or_default(data: &str) -> Self {
        match toml::from_str::<RawSceneConfig>(data) {
            Ok(raw) => raw.into(),
            Err(err) => {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawSceneConfig::default().into()
            }
        }
    }

    /// Looks up the configuration of a placed philosopher.
    pub fn philosopher(&self, id: &PhilosopherId) -> Option<&PhilosopherConfig> {
        self.philosophers.iter().find(|config| &config.id == id)
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        RawSceneConfig::default().into()
    }
}

impl From<RawSceneConfig> for SceneSettings {
    fn from(value: RawSceneConfig) -> Self {
        let scene = value.scene;
        let philosophers = match value.philosophers {
            Some(raw) => raw
                .into_iter()
                .enumerate()
                .map(|(index, philosopher)| philosopher.into_config(index))
                .collect(),
            None => default_roster(),
        };

        Self {
            seed: scene.seed,
            time_scale: finite_or_default(scene.time_scale, DEFAULT_TIME_SCALE),
            reveal_interval_secs: finite_or_default(
                scene.reveal_interval_secs,
                DEFAULT_REVEAL_INTERVAL_SECS,
            ),
            labels_visible_on_start: scene.labels_visible_on_start,
            map_path: PathBuf::from(scene.map_path),
            player: PlayerSettings {
                speed: finite_or_default(value.player.speed, DEFAULT_PLAYER_SPEED),
                spawn_point: value.player.spawn_point.trim().to_string(),
            },
            philosophers,
        }
    }
}

/// Non-negative finite value, or `fallback`.
fn finite_or_default(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

impl RawPhilosopher {
    fn into_config(self, index: usize) -> PhilosopherConfig {
        let [r, g, b] = self.color.unwrap_or(PALETTE[index % PALETTE.len()]);
        PhilosopherConfig {
            id: PhilosopherId::new(self.id.trim().to_lowercase()),
            name: self.name.trim().to_string(),
            default_direction: self.default_direction,
            default_message: self.default_message,
            script: self.script,
            roaming: RoamingSettings {
                move_speed: self.move_speed,
                pause_chance: self.pause_chance,
                direction_change_chance: self.direction_change_chance,
                roam_radius: self.roam_radius,
                idle_seconds: (self.idle_seconds[0], self.idle_seconds[1]),
                move_seconds: (self.move_seconds[0], self.move_seconds[1]),
            }
            .sanitised(),
            color: Color::srgb_u8(r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_fall_back_to_default_roster() {
        let settings = SceneSettings::default();
        let ids: Vec<_> = settings
            .philosophers
            .iter()
            .map(|config| config.id.as_str().to_string())
            .collect();

        assert_eq!(ids, vec!["krishna", "vivekananda"]);
        assert_eq!(settings.philosophers[0].roaming.move_speed, 40.0);
        assert_eq!(settings.philosophers[0].roaming.pause_chance, 0.2);
        assert_eq!(settings.philosophers[0].roaming.direction_change_chance, 0.3);
        assert_eq!(settings.philosophers[1].roaming.roam_radius, 800.0);
        assert_eq!(settings.player.spawn_point, "Player");
    }

    #[test]
    fn parses_roster_with_optional_fields() {
        let raw = r#"
            [scene]
            seed = 42
            time_scale = 0.5
            reveal_interval_secs = 0.05

            [player]
            speed = 90.0

            [[philosophers]]
            id = " Buddha "
            name = "Buddha"
            default_direction = "left"
            roam_radius = 120.0
            default_message = "Peace comes from within."
            script = ["Peace comes from within.", "Do not seek it without."]
            pause_chance = 1.7
        "#;
        let settings = SceneSettings::from_toml_or_default(raw);

        assert_eq!(settings.seed, 42);
        assert_eq!(settings.time_scale, 0.5);
        assert_eq!(settings.reveal_interval_secs, 0.05);
        assert_eq!(settings.player.speed, 90.0);
        assert_eq!(settings.player.spawn_point, "Player");
        assert_eq!(settings.philosophers.len(), 1);

        let buddha = &settings.philosophers[0];
        assert_eq!(buddha.id.as_str(), "buddha");
        assert_eq!(buddha.default_direction, Facing::Left);
        assert_eq!(buddha.roaming.roam_radius, 120.0);
        assert_eq!(buddha.roaming.pause_chance, 1.0);
        assert_eq!(buddha.roaming.move_speed, DEFAULT_MOVE_SPEED);
        assert_eq!(buddha.dialogue_lines().len(), 2);
        assert!(settings.philosopher(&PhilosopherId::new("buddha")).is_some());
    }

    #[test]
    fn empty_roster_is_respected() {
        let settings = SceneSettings::from_toml_or_default("philosophers = []");
        assert!(settings.philosophers.is_empty());
    }

    #[test]
    fn invalid_toml_uses_defaults() {
        let settings = SceneSettings::from_toml_or_default("[[philosophers]]\nid = 3");
        assert_eq!(settings.philosophers.len(), 2);
        assert_eq!(settings.seed, DEFAULT_SEED);
    }

    #[test]
    fn philosopher_without_required_keys_rejects_the_file() {
        let raw = r#"
            [scene]
            seed = 9

            [[philosophers]]
            id = "buddha"
            name = "Buddha"
            default_direction = "front"
        "#;
        let settings = SceneSettings::from_toml_or_default(raw);

        assert_eq!(settings.seed, DEFAULT_SEED);
        assert_eq!(settings.philosophers.len(), 2);
        assert!(settings
            .philosopher(&PhilosopherId::new("buddha"))
            .is_none());
    }

    #[test]
    fn nan_and_inf_in_config_are_replaced() {
        let raw = r#"
            [scene]
            time_scale = nan
            reveal_interval_secs = inf

            [player]
            speed = nan

            [[philosophers]]
            id = "krishna"
            name = "Krishna"
            default_direction = "front"
            roam_radius = inf
            default_message = "Hello."
            pause_chance = nan
            move_seconds = [1.0, inf]
        "#;
        let settings = SceneSettings::from_toml_or_default(raw);

        assert_eq!(settings.time_scale, DEFAULT_TIME_SCALE);
        assert_eq!(settings.reveal_interval_secs, DEFAULT_REVEAL_INTERVAL_SECS);
        assert_eq!(settings.player.speed, DEFAULT_PLAYER_SPEED);

        let roaming = &settings.philosophers[0].roaming;
        assert_eq!(roaming.pause_chance, DEFAULT_PAUSE_CHANCE);
        assert_eq!(roaming.roam_radius, crate::npc::config::DEFAULT_ROAM_RADIUS);
        assert_eq!(roaming.move_seconds, (1.0, DEFAULT_MOVE_SECONDS.1));

        // Sanitised settings roll without panicking.
        let mut agent = crate::npc::roaming::RoamingAgent::new(
            &settings.philosophers[0],
            Vec2::ZERO,
            7,
        );
        for _ in 0..600 {
            agent.update(0.05, false);
        }
    }
}
