//! Tiled map data: spawn points, the `collides` tile property, and world bounds.
use std::{collections::HashSet, fmt, fs, io, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const WORLD_LAYER: &str = "World";
const SPAWN_LAYER: &str = "Objects";
const COLLIDES_PROPERTY: &str = "collides";
/// Strips Tiled's flip/rotation flags from a global tile id.
const GID_MASK: u32 = 0x0FFF_FFFF;

pub const FALLBACK_MAP_TILES: (u32, u32) = (40, 30);
pub const FALLBACK_TILE_SIZE: u32 = 32;
/// Largest tile grid accepted from a map file.
const MAX_MAP_TILES: u32 = 1 << 24;

/// Answers whether a point in map space is blocked.
pub trait CollisionMap {
    fn collides(&self, position: Vec2) -> bool;
}

/// Map without obstacles or bounds.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl CollisionMap for OpenField {
    fn collides(&self, _position: Vec2) -> bool {
        false
    }
}

/// Named point from the spawn object layer, in map pixels (y grows downwards).
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPoint {
    pub name: String,
    pub position: Vec2,
}

#[derive(Debug)]
pub enum MapLoadError {
    Io { path: String, source: io::Error },
    Parse(serde_json::Error),
    InvalidDimensions { width: u32, height: u32 },
    LayerSizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for MapLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {}", path, source),
            Self::Parse(err) => write!(f, "invalid Tiled JSON: {}", err),
            Self::InvalidDimensions { width, height } => {
                write!(f, "map has no area ({}x{})", width, height)
            }
            Self::LayerSizeMismatch { expected, actual } => write!(
                f,
                "layer \"{}\" holds {} tiles, expected {}",
                WORLD_LAYER, actual, expected
            ),
        }
    }
}

impl std::error::Error for MapLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MapLoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Deserialize)]
struct RawTiledMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    layers: Vec<RawLayer>,
    #[serde(default)]
    tilesets: Vec<RawTileset>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawLayer {
    Tilelayer {
        name: String,
        #[serde(default)]
        data: Vec<u32>,
    },
    Objectgroup {
        name: String,
        #[serde(default)]
        objects: Vec<RawObject>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    #[serde(default)]
    name: String,
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
struct RawTileset {
    firstgid: u32,
    #[serde(default)]
    tiles: Vec<RawTile>,
}

#[derive(Debug, Deserialize)]
struct RawTile {
    id: u32,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    name: String,
    #[serde(default)]
    value: serde_json::Value,
}

/// Static map data consumed by the scene. Read-only after loading.
#[derive(Debug, Clone)]
pub struct WorldMap {
    width_tiles: u32,
    height_tiles: u32,
    tile_size: Vec2,
    blocked: Vec<bool>,
    spawn_points: Vec<SpawnPoint>,
}

impl WorldMap {
    /// Blank, obstacle-free map with no spawn points.
    pub fn open(width_tiles: u32, height_tiles: u32, tile_size: u32) -> Self {
        let width_tiles = width_tiles.max(1);
        let height_tiles = height_tiles.max(1);
        Self {
            width_tiles,
            height_tiles,
            tile_size: Vec2::splat(tile_size.max(1) as f32),
            blocked: vec![false; (width_tiles * height_tiles) as usize],
            spawn_points: Vec::new(),
        }
    }

    pub fn from_tiled_json(raw: &str) -> Result<Self, MapLoadError> {
        let map: RawTiledMap = serde_json::from_str(raw)?;
        if map.width == 0 || map.height == 0 || map.tilewidth == 0 || map.tileheight == 0 {
            return Err(MapLoadError::InvalidDimensions {
                width: map.width,
                height: map.height,
            });
        }

        let colliding_gids: HashSet<u32> = map
            .tilesets
            .iter()
            .flat_map(|tileset| {
                tileset
                    .tiles
                    .iter()
                    .filter(|tile| {
                        tile.properties.iter().any(|property| {
                            property.name == COLLIDES_PROPERTY
                                && property.value == serde_json::Value::Bool(true)
                        })
                    })
                    .map(move |tile| tileset.firstgid + tile.id)
            })
            .collect();

        let expected = map
            .width
            .checked_mul(map.height)
            .filter(|tiles| *tiles <= MAX_MAP_TILES)
            .ok_or(MapLoadError::InvalidDimensions {
                width: map.width,
                height: map.height,
            })? as usize;
        let mut blocked = vec![false; expected];
        let mut spawn_points = Vec::new();

        for layer in map.layers {
            match layer {
                RawLayer::Tilelayer { name, data } if name == WORLD_LAYER => {
                    if data.len() != expected {
                        return Err(MapLoadError::LayerSizeMismatch {
                            expected,
                            actual: data.len(),
                        });
                    }
                    for (cell, gid) in blocked.iter_mut().zip(data) {
                        *cell = colliding_gids.contains(&(gid & GID_MASK));
                    }
                }
                RawLayer::Objectgroup { name, objects } if name == SPAWN_LAYER => {
                    spawn_points.extend(objects.into_iter().map(|object| SpawnPoint {
                        name: object.name,
                        position: Vec2::new(object.x, object.y),
                    }));
                }
                _ => {}
            }
        }

        Ok(Self {
            width_tiles: map.width,
            height_tiles: map.height,
            tile_size: Vec2::new(map.tilewidth as f32, map.tileheight as f32),
            blocked,
            spawn_points,
        })
    }

    pub fn load(path: &Path) -> Result<Self, MapLoadError> {
        let raw = fs::read_to_string(path).map_err(|source| MapLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_tiled_json(&raw)
    }

    /// Loads the map, falling back to a blank open map when it cannot be used.
    pub fn load_or_open(path: &Path) -> Self {
        match Self::load(path) {
            Ok(map) => map,
            Err(err) => {
                warn!(
                    "Failed to load map {} ({}). Falling back to an empty {}x{} map.",
                    path.display(),
                    err,
                    FALLBACK_MAP_TILES.0,
                    FALLBACK_MAP_TILES.1
                );
                Self::open(
                    FALLBACK_MAP_TILES.0,
                    FALLBACK_MAP_TILES.1,
                    FALLBACK_TILE_SIZE,
                )
            }
        }
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// World bounds in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width_tiles as f32, self.height_tiles as f32) * self.tile_size
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    /// First spawn point whose name satisfies `matches`.
    pub fn find_spawn_point(&self, matches: impl Fn(&str) -> bool) -> Option<&SpawnPoint> {
        self.spawn_points.iter().find(|point| matches(&point.name))
    }

    pub fn is_tile_blocked(&self, x: u32, y: u32) -> bool {
        if x >= self.width_tiles || y >= self.height_tiles {
            return true;
        }
        self.blocked[(y * self.width_tiles + x) as usize]
    }

    /// Tile coordinates of every blocked tile, row by row.
    pub fn blocked_tiles(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width_tiles;
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, blocked)| **blocked)
            .map(move |(index, _)| (index as u32 % width, index as u32 / width))
    }
}

impl CollisionMap for WorldMap {
    fn collides(&self, position: Vec2) -> bool {
        let bounds = self.pixel_size();
        if position.x < 0.0 || position.y < 0.0 || position.x >= bounds.x || position.y >= bounds.y
        {
            return true;
        }
        let tile = (position / self.tile_size).floor();
        self.is_tile_blocked(tile.x as u32, tile.y as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "width": 3,
        "height": 2,
        "tilewidth": 32,
        "tileheight": 32,
        "layers": [
            { "type": "tilelayer", "name": "Below Player", "data": [1, 1, 1, 1, 1, 1] },
            { "type": "tilelayer", "name": "World", "data": [0, 2, 0, 0, 0, 2147483650] },
            { "type": "objectgroup", "name": "Objects", "objects": [
                { "name": "Krishna", "x": 16.0, "y": 48.0 },
                { "name": "vivekananda", "x": 80.0, "y": 16.0 }
            ] },
            { "type": "imagelayer", "name": "Sky" }
        ],
        "tilesets": [
            { "firstgid": 1, "name": "tuxmon", "tiles": [
                { "id": 0, "properties": [{ "name": "collides", "type": "bool", "value": false }] },
                { "id": 1, "properties": [{ "name": "collides", "type": "bool", "value": true }] }
            ] }
        ]
    }"#;

    #[test]
    fn parses_spawn_points_and_colliding_tiles() {
        let map = WorldMap::from_tiled_json(SAMPLE).expect("sample map parses");

        assert_eq!(map.pixel_size(), Vec2::new(96.0, 64.0));
        assert_eq!(map.spawn_points().len(), 2);
        assert_eq!(map.spawn_points()[0].position, Vec2::new(16.0, 48.0));

        assert!(!map.is_tile_blocked(0, 0));
        assert!(map.is_tile_blocked(1, 0));
        // Flipped tile still collides once the flag bits are masked.
        assert!(map.is_tile_blocked(2, 1));
        assert_eq!(map.blocked_tiles().collect::<Vec<_>>(), vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn collision_checks_tiles_and_bounds() {
        let map = WorldMap::from_tiled_json(SAMPLE).expect("sample map parses");

        assert!(!map.collides(Vec2::new(10.0, 10.0)));
        assert!(map.collides(Vec2::new(40.0, 10.0)));
        assert!(map.collides(Vec2::new(-1.0, 10.0)));
        assert!(map.collides(Vec2::new(10.0, 64.0)));
    }

    #[test]
    fn spawn_lookup_uses_predicate() {
        let map = WorldMap::from_tiled_json(SAMPLE).expect("sample map parses");
        let found = map
            .find_spawn_point(|name| name.to_lowercase() == "vivekananda")
            .expect("spawn exists");
        assert_eq!(found.position, Vec2::new(80.0, 16.0));
        assert!(map.find_spawn_point(|name| name == "Buddha").is_none());
    }

    #[test]
    fn rejects_mismatched_world_layer() {
        let raw = r#"{ "width": 2, "height": 2, "tilewidth": 16, "tileheight": 16,
            "layers": [{ "type": "tilelayer", "name": "World", "data": [0, 0, 0] }] }"#;
        let err = WorldMap::from_tiled_json(raw).expect_err("layer is short");
        assert!(matches!(
            err,
            MapLoadError::LayerSizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn rejects_empty_map_and_bad_json() {
        let raw = r#"{ "width": 0, "height": 2, "tilewidth": 16, "tileheight": 16 }"#;
        assert!(matches!(
            WorldMap::from_tiled_json(raw),
            Err(MapLoadError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            WorldMap::from_tiled_json("not json"),
            Err(MapLoadError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_open_map() {
        let map = WorldMap::load_or_open(Path::new("does/not/exist.json"));
        assert!(map.spawn_points().is_empty());
        assert_eq!(map.blocked_tiles().count(), 0);
        assert_eq!(
            map.pixel_size(),
            Vec2::new(
                (FALLBACK_MAP_TILES.0 * FALLBACK_TILE_SIZE) as f32,
                (FALLBACK_MAP_TILES.1 * FALLBACK_TILE_SIZE) as f32
            )
        );
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let raw = r#"{ "width": 100000, "height": 100000, "tilewidth": 32, "tileheight": 32 }"#;
        assert!(matches!(
            WorldMap::from_tiled_json(raw),
            Err(MapLoadError::InvalidDimensions {
                width: 100000,
                height: 100000
            })
        ));
    }
}
