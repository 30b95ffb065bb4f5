//! Systems spawning and walking the player avatar.
use bevy::prelude::*;

use crate::{
    core::SceneClock,
    player::components::{Player, PLAYER_SIZE},
    scene::{exploration::ExplorationScene, settings::SceneSettings},
    world::{
        components::{map_to_world, MapPosition},
        map::CollisionMap,
    },
};

const PLAYER_COLOR: Color = Color::srgb(0.95, 0.92, 0.8);
const PLAYER_DEPTH: f32 = 10.0;

pub fn spawn_player(mut commands: Commands, scene: Res<ExplorationScene>) {
    let spawn = scene.player_spawn();
    commands.spawn((
        Sprite::from_color(PLAYER_COLOR, Vec2::splat(PLAYER_SIZE)),
        Transform::from_translation(map_to_world(spawn, PLAYER_DEPTH)),
        MapPosition(spawn),
        Player,
        Name::new("Player"),
    ));
    info!("Player spawned at ({:.0}, {:.0})", spawn.x, spawn.y);
}

/// Walks the player with the arrow keys or WASD.
pub fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    clock: Res<SceneClock>,
    settings: Res<SceneSettings>,
    scene: Res<ExplorationScene>,
    mut query: Query<(&mut MapPosition, &mut Transform), With<Player>>,
) {
    let Ok((mut position, mut transform)) = query.single_mut() else {
        return;
    };

    let direction = movement_direction(&keyboard);
    if direction == Vec2::ZERO {
        return;
    }

    let offset = direction * settings.player.speed * clock.delta_secs();
    position.0 = step_player(position.0, offset, scene.map());
    transform.translation = position.to_translation(PLAYER_DEPTH);
}

/// Map-space direction from the held keys; y grows downwards.
fn movement_direction(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let held = |keys: [KeyCode; 2]| keyboard.any_pressed(keys);
    let mut direction = Vec2::ZERO;
    if held([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        direction.x -= 1.0;
    }
    if held([KeyCode::ArrowRight, KeyCode::KeyD]) {
        direction.x += 1.0;
    }
    if held([KeyCode::ArrowUp, KeyCode::KeyW]) {
        direction.y -= 1.0;
    }
    if held([KeyCode::ArrowDown, KeyCode::KeyS]) {
        direction.y += 1.0;
    }
    direction.normalize_or_zero()
}

/// Applies `offset` one axis at a time so the player slides along walls.
pub fn step_player(from: Vec2, offset: Vec2, map: &impl CollisionMap) -> Vec2 {
    let mut position = from;

    let horizontal = Vec2::new(position.x + offset.x, position.y);
    if !map.collides(horizontal) {
        position = horizontal;
    }

    let vertical = Vec2::new(position.x, position.y + offset.y);
    if !map.collides(vertical) {
        position = vertical;
    }

    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::map::{OpenField, WorldMap};

    #[test]
    fn open_field_never_blocks() {
        let moved = step_player(Vec2::new(10.0, 10.0), Vec2::new(5.0, -3.0), &OpenField);
        assert_eq!(moved, Vec2::new(15.0, 7.0));
    }

    #[test]
    fn player_slides_along_walls() {
        // Column x = 2 is solid.
        let map = WorldMap::from_tiled_json(
            r#"{
                "width": 4, "height": 2, "tilewidth": 10, "tileheight": 10,
                "tilesets": [{ "firstgid": 1, "tiles": [
                    { "id": 0, "properties": [{ "name": "collides", "type": "bool", "value": true }] }
                ] }],
                "layers": [{ "type": "tilelayer", "name": "World", "width": 4, "height": 2,
                             "data": [0, 0, 1, 0, 0, 0, 1, 0] }]
            }"#,
        )
        .expect("map parses");

        let moved = step_player(Vec2::new(15.0, 5.0), Vec2::new(8.0, 6.0), &map);
        assert_eq!(moved, Vec2::new(15.0, 11.0));
    }

    #[test]
    fn leaving_the_map_is_blocked() {
        let map = WorldMap::open(2, 2, 10);
        let moved = step_player(Vec2::new(2.0, 2.0), Vec2::new(-5.0, -5.0), &map);
        assert_eq!(moved, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn held_keys_are_normalised() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowRight);
        keyboard.press(KeyCode::KeyS);

        let direction = movement_direction(&keyboard);
        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!(direction.x > 0.0 && direction.y > 0.0);
    }
}
