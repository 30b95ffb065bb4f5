//! Runtime configuration for philosophers and their roaming behaviour.
use bevy::prelude::*;

use super::components::{Facing, PhilosopherId};

pub const DEFAULT_MOVE_SPEED: f32 = 40.0;
pub const DEFAULT_PAUSE_CHANCE: f32 = 0.2;
pub const DEFAULT_DIRECTION_CHANGE_CHANCE: f32 = 0.3;
pub const DEFAULT_ROAM_RADIUS: f32 = 800.0;
pub const DEFAULT_IDLE_SECONDS: (f32, f32) = (1.0, 3.0);
pub const DEFAULT_MOVE_SECONDS: (f32, f32) = (1.0, 2.5);

/// Tunables of a single roaming agent.
#[derive(Debug, Clone, PartialEq)]
pub struct RoamingSettings {
    /// World pixels per second.
    pub move_speed: f32,
    /// Chance an expired pause is extended instead of walking off.
    pub pause_chance: f32,
    /// Chance an expired walk (or a bump) changes course.
    pub direction_change_chance: f32,
    pub roam_radius: f32,
    /// Inclusive range for a fresh idle duration, seconds.
    pub idle_seconds: (f32, f32),
    /// Inclusive range for a fresh walk duration, seconds.
    pub move_seconds: (f32, f32),
}

impl Default for RoamingSettings {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            pause_chance: DEFAULT_PAUSE_CHANCE,
            direction_change_chance: DEFAULT_DIRECTION_CHANGE_CHANCE,
            roam_radius: DEFAULT_ROAM_RADIUS,
            idle_seconds: DEFAULT_IDLE_SECONDS,
            move_seconds: DEFAULT_MOVE_SECONDS,
        }
    }
}

impl RoamingSettings {
    /// Clamps every field into its valid domain. Non-finite values fall back to the defaults.
    pub fn sanitised(self) -> Self {
        Self {
            move_speed: finite_or(self.move_speed, DEFAULT_MOVE_SPEED).max(0.0),
            pause_chance: finite_or(self.pause_chance, DEFAULT_PAUSE_CHANCE).clamp(0.0, 1.0),
            direction_change_chance: finite_or(
                self.direction_change_chance,
                DEFAULT_DIRECTION_CHANGE_CHANCE,
            )
            .clamp(0.0, 1.0),
            roam_radius: finite_or(self.roam_radius, DEFAULT_ROAM_RADIUS).max(0.0),
            idle_seconds: ordered_range(self.idle_seconds, DEFAULT_IDLE_SECONDS),
            move_seconds: ordered_range(self.move_seconds, DEFAULT_MOVE_SECONDS),
        }
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn ordered_range((a, b): (f32, f32), fallback: (f32, f32)) -> (f32, f32) {
    let a = finite_or(a, fallback.0).max(0.0);
    let b = finite_or(b, fallback.1).max(0.0);
    (a.min(b), a.max(b))
}

/// Everything needed to place a philosopher in the scene.
#[derive(Debug, Clone)]
pub struct PhilosopherConfig {
    pub id: PhilosopherId,
    pub name: String,
    pub default_direction: Facing,
    pub default_message: String,
    /// Full conversation script; empty means "say the default message".
    pub script: Vec<String>,
    pub roaming: RoamingSettings,
    pub color: Color,
}

impl PhilosopherConfig {
    /// Lines spoken when a conversation starts.
    pub fn dialogue_lines(&self) -> Vec<String> {
        if self.script.is_empty() {
            vec![self.default_message.clone()]
        } else {
            self.script.clone()
        }
    }

    /// Case-insensitive spawn point match: exact display name, or lowercased id.
    pub fn matches_spawn_point(&self, object_name: &str) -> bool {
        object_name == self.name || object_name.to_lowercase() == self.id.as_str()
    }
}

/// Roster used when `config/scene.toml` is missing or unreadable.
pub fn default_roster() -> Vec<PhilosopherConfig> {
    vec![
        PhilosopherConfig {
            id: PhilosopherId::new("krishna"),
            name: "Krishna".to_string(),
            default_direction: Facing::Front,
            default_message: "I am Krishna. Let me guide you through dharma, karma and truth."
                .to_string(),
            script: Vec::new(),
            roaming: RoamingSettings::default(),
            color: Color::srgb_u8(70, 110, 200),
        },
        PhilosopherConfig {
            id: PhilosopherId::new("vivekananda"),
            name: "Vivekananda".to_string(),
            default_direction: Facing::Right,
            default_message: "Arise, awake and stop not until the goal is reached.".to_string(),
            script: Vec::new(),
            roaming: RoamingSettings::default(),
            color: Color::srgb_u8(220, 130, 50),
        },
    ]
}
