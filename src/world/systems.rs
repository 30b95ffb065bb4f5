//! Systems for the world module.
use bevy::{prelude::*, window::PrimaryWindow};

use crate::player::components::Player;
use crate::scene::exploration::ExplorationScene;
use crate::world::components::{map_to_world, MapPosition, ObstacleTile, WorldCamera};

const OBSTACLE_COLOR: Color = Color::srgb(0.22, 0.2, 0.18);
const OBSTACLE_DEPTH: f32 = 1.0;
const CAMERA_DEPTH: f32 = 999.0;

pub fn spawn_world_camera(mut commands: Commands) {
    commands.spawn((Camera2d, WorldCamera, Name::new("World Camera")));
}

/// Draws every blocked tile of the scene map as a dark square.
pub fn spawn_obstacle_tiles(mut commands: Commands, scene: Res<ExplorationScene>) {
    let map = scene.map();
    let tile_size = map.tile_size();
    let mut count = 0usize;

    for (x, y) in map.blocked_tiles() {
        let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * tile_size;
        commands.spawn((
            Sprite::from_color(OBSTACLE_COLOR, tile_size),
            Transform::from_translation(map_to_world(centre, OBSTACLE_DEPTH)),
            ObstacleTile,
        ));
        count += 1;
    }

    info!(
        "World map ready: {:.0}x{:.0} px, {} blocked tiles, {} spawn points",
        map.pixel_size().x,
        map.pixel_size().y,
        count,
        map.spawn_points().len()
    );
}

/// Keeps the camera on the player without showing anything outside the world bounds.
pub fn follow_player_camera(
    scene: Res<ExplorationScene>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    player_query: Query<&MapPosition, With<Player>>,
    mut camera_query: Query<&mut Transform, With<WorldCamera>>,
) {
    let Ok(player) = player_query.single() else {
        return;
    };
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };
    let viewport = window_query
        .single()
        .map(|window| Vec2::new(window.width(), window.height()))
        .unwrap_or(Vec2::ZERO);

    let target = clamp_to_bounds(player.0, viewport, scene.map().pixel_size());
    camera.translation = map_to_world(target, CAMERA_DEPTH);
}

/// Clamps a camera centre so the viewport stays inside `bounds`; centres maps smaller than it.
pub fn clamp_to_bounds(centre: Vec2, viewport: Vec2, bounds: Vec2) -> Vec2 {
    let half = viewport * 0.5;
    let axis = |value: f32, half: f32, extent: f32| {
        if extent <= half * 2.0 {
            extent * 0.5
        } else {
            value.clamp(half, extent - half)
        }
    };
    Vec2::new(
        axis(centre.x, half.x, bounds.x),
        axis(centre.y, half.y, bounds.y),
    )
}
