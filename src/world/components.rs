//! Components used by the world module.
use bevy::prelude::*;

/// Position in map space (pixels, `y` grows downwards), the space all scene logic runs in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MapPosition(pub Vec2);

impl MapPosition {
    /// Bevy world translation for this map position at the given depth.
    pub fn to_translation(self, z: f32) -> Vec3 {
        map_to_world(self.0, z)
    }
}

/// Map space to Bevy world space: same pixels, `y` flipped.
pub fn map_to_world(position: Vec2, z: f32) -> Vec3 {
    Vec3::new(position.x, -position.y, z)
}

/// Marker for the 2D camera that follows the player.
#[derive(Component, Default)]
pub struct WorldCamera;

/// Marker for the sprites drawing blocked tiles.
#[derive(Component, Default)]
pub struct ObstacleTile;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_space_flips_y() {
        assert_eq!(
            MapPosition(Vec2::new(12.0, 40.0)).to_translation(3.0),
            Vec3::new(12.0, -40.0, 3.0)
        );
    }
}
