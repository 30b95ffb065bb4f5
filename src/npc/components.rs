//! Philosopher-specific components and the shared facing type.
use std::fmt;

use bevy::prelude::*;
use serde::Deserialize;

/// Stable identifier of a philosopher, e.g. `krishna`. Also the prefix of its animation keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhilosopherId(String);

impl PhilosopherId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhilosopherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the four directions a character can walk or face.
///
/// Steps are expressed in map space, where `y` grows downwards: `Front` walks
/// towards the viewer (down the screen), `Back` walks away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
    #[default]
    Front,
    Back,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Left, Facing::Right, Facing::Front, Facing::Back];

    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Front => "front",
            Self::Back => "back",
        }
    }

    /// Unit step in map space.
    pub fn step(self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Front => Vec2::new(0.0, 1.0),
            Self::Back => Vec2::new(0.0, -1.0),
        }
    }

    /// Direction from an observer towards `offset`; horizontal wins ties.
    pub fn towards(offset: Vec2) -> Self {
        if offset.x.abs() >= offset.y.abs() {
            if offset.x >= 0.0 {
                Self::Right
            } else {
                Self::Left
            }
        } else if offset.y > 0.0 {
            Self::Front
        } else {
            Self::Back
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Marks the sprite entity that renders a philosopher.
#[derive(Component, Debug, Clone)]
pub struct PhilosopherSprite {
    pub id: PhilosopherId,
}

/// Marks the floating name label of a philosopher.
#[derive(Component, Debug, Clone)]
pub struct NameLabel {
    pub id: PhilosopherId,
}

/// Small marker showing which way a philosopher is facing.
#[derive(Component, Debug, Clone)]
pub struct FacingIndicator {
    pub id: PhilosopherId,
}

/// Walk animation the renderer should play for a philosopher sprite.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkAnimation {
    pub key: String,
    pub playing: bool,
}
