//! Level files and the immutable level definition built from them.
//!
//! Positions are top-left pixel coordinates unless noted. Checkpoints and the
//! finish flag are placed by the foot of their pole (bottom-left), so a flag
//! stands on the ground line given in the file. Entity sizes default to one
//! tile; flags are one tile wide and two tall.

use std::path::Path;

use glam::Vec2;
use serde::Deserialize;
use srx_core::geometry::{Aabb, Rect};

use crate::checkpoint::Checkpoint;
use crate::collision::{StaticGeometry, StaticKind};
use crate::config::SimConfig;
use crate::data::{read_json, DataError};
use crate::enemy::{Enemy, EnemyKind};
use crate::platform::{Axis, MovingPlatform};
use crate::powerup::{PowerUp, PowerUpKind};

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    #[serde(default)]
    pub tile_size: Option<f32>,
    pub player_start: Point,
    #[serde(default)]
    pub player_size: Option<Size>,
    #[serde(default)]
    pub solids: Vec<Rect>,
    #[serde(default)]
    pub boundaries: Vec<Rect>,
    /// Runs of ground tiles, one tile tall.
    #[serde(default)]
    pub rows: Vec<TileRow>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub powerups: Vec<PowerUpDef>,
    #[serde(default)]
    pub checkpoints: Vec<Point>,
    pub finish: Point,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TileRow {
    pub x: f32,
    pub y: f32,
    pub count: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    #[default]
    Spike,
    Lava,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct HazardDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub kind: HazardKind,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub axis: Axis,
    pub distance: f32,
    /// Pixels per second.
    pub speed: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub kind: EnemyKind,
    #[serde(default)]
    pub patrol_distance: Option<f32>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PowerUpDef {
    pub x: f32,
    pub y: f32,
    pub kind: PowerUpKind,
}

/// Static damaging box. The kind only matters to presentation.
#[derive(Debug, Clone, Copy)]
pub struct Hazard {
    pub aabb: Aabb,
    pub kind: HazardKind,
}

/// Everything a run starts from. Never mutated; restart rebuilds the run's
/// mutable state from here.
#[derive(Debug, Clone)]
pub struct Level {
    pub level_id: String,
    pub tile_size: f32,
    /// Top-left of the actor at spawn.
    pub player_start: Vec2,
    pub player_size: Vec2,
    pub statics: Vec<StaticGeometry>,
    pub hazards: Vec<Hazard>,
    pub platforms: Vec<MovingPlatform>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<PowerUp>,
    pub checkpoints: Vec<Checkpoint>,
    pub finish: Aabb,
}

impl Level {
    pub fn build(file: &LevelFile, config: &SimConfig) -> Self {
        let tile = file.tile_size.unwrap_or(config.tile_size);
        let square = |x: f32, y: f32| Aabb::from_top_left(x, y, tile, tile);

        let mut statics: Vec<StaticGeometry> = file
            .solids
            .iter()
            .map(|rect| StaticGeometry {
                aabb: rect.to_aabb(),
                kind: StaticKind::Solid,
            })
            .collect();
        for row in &file.rows {
            statics.extend((0..row.count).map(|i| StaticGeometry {
                aabb: square(row.x + i as f32 * tile, row.y),
                kind: StaticKind::Solid,
            }));
        }
        statics.extend(file.boundaries.iter().map(|rect| StaticGeometry {
            aabb: rect.to_aabb(),
            kind: StaticKind::Boundary,
        }));

        let player_size = file
            .player_size
            .map_or(Vec2::splat(tile), |size| Vec2::new(size.w, size.h));

        Self {
            level_id: file.level_id.clone(),
            tile_size: tile,
            player_start: file.player_start.to_vec2(),
            player_size,
            statics,
            hazards: file
                .hazards
                .iter()
                .map(|h| Hazard {
                    aabb: square(h.x, h.y),
                    kind: h.kind,
                })
                .collect(),
            platforms: file
                .platforms
                .iter()
                .map(|p| {
                    let size = p.size.unwrap_or(Size { w: tile, h: tile });
                    MovingPlatform::new(
                        Aabb::from_top_left(p.x, p.y, size.w, size.h),
                        p.axis,
                        p.distance,
                        p.speed,
                    )
                })
                .collect(),
            enemies: file
                .enemies
                .iter()
                .map(|e| {
                    let distance = e
                        .patrol_distance
                        .unwrap_or(config.enemy.default_patrol_distance);
                    Enemy::new(e.kind, square(e.x, e.y), distance)
                })
                .collect(),
            powerups: file
                .powerups
                .iter()
                .map(|p| PowerUp {
                    aabb: square(p.x, p.y),
                    kind: p.kind,
                })
                .collect(),
            checkpoints: file
                .checkpoints
                .iter()
                .map(|cp| Checkpoint::new(cp.to_vec2(), tile, tile * 2.0))
                .collect(),
            finish: Aabb::from_bottom_left(file.finish.x, file.finish.y, tile, tile * 2.0),
        }
    }

    pub fn spawn_box(&self) -> Aabb {
        Aabb::from_top_left(
            self.player_start.x,
            self.player_start.y,
            self.player_size.x,
            self.player_size.y,
        )
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, DataError> {
    let level: LevelFile = read_json(path)?;
    validate_level(&level)?;
    log::debug!(
        "loaded level '{}' from {} ({} solids, {} rows, {} enemies)",
        level.level_id,
        path.display(),
        level.solids.len(),
        level.rows.len(),
        level.enemies.len()
    );
    Ok(level)
}

pub fn validate_level(level: &LevelFile) -> Result<(), DataError> {
    if level.version.trim().is_empty() {
        return Err(invalid("version is empty".to_string()));
    }
    if level.level_id.trim().is_empty() {
        return Err(invalid("level_id is empty".to_string()));
    }
    if level
        .level_id
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '.') || c.is_whitespace())
    {
        return Err(invalid(format!(
            "level_id '{}' must be usable as a file name stem",
            level.level_id
        )));
    }
    if level.tile_size.is_some_and(|tile| tile <= 0.0) {
        return Err(invalid("tile_size must be > 0".to_string()));
    }
    if let Some(size) = level.player_size {
        if size.w <= 0.0 || size.h <= 0.0 {
            return Err(invalid("player_size must have positive extents".to_string()));
        }
    }
    for (i, rect) in level.solids.iter().chain(&level.boundaries).enumerate() {
        if !rect.to_aabb().has_positive_extent() {
            return Err(invalid(format!(
                "rect {i} has non-positive size ({} x {})",
                rect.w, rect.h
            )));
        }
    }
    if let Some(i) = level.rows.iter().position(|row| row.count == 0) {
        return Err(invalid(format!("row {i} has count 0")));
    }
    for (i, platform) in level.platforms.iter().enumerate() {
        if platform.distance < 0.0 || platform.speed < 0.0 {
            return Err(invalid(format!(
                "platform {i} must have non-negative distance and speed"
            )));
        }
        if platform.size.is_some_and(|size| size.w <= 0.0 || size.h <= 0.0) {
            return Err(invalid(format!("platform {i} has non-positive size")));
        }
    }
    if let Some(i) = level
        .enemies
        .iter()
        .position(|e| e.patrol_distance.is_some_and(|d| d < 0.0))
    {
        return Err(invalid(format!("enemy {i} has negative patrol_distance")));
    }
    Ok(())
}

fn invalid(reason: String) -> DataError {
    DataError::Invalid(format!("Level validation failed: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::temp_file_path;
    use std::fs;

    const SAMPLE: &str = r#"{
      "version": "1",
      "level_id": "level1",
      "player_start": { "x": 64, "y": 320 },
      "solids": [ { "x": 400, "y": 300, "w": 64, "h": 32 } ],
      "boundaries": [ { "x": -320, "y": 480, "w": 4000, "h": 320 } ],
      "rows": [ { "x": 0, "y": 448, "count": 10 } ],
      "hazards": [ { "x": 300, "y": 416, "kind": "lava" } ],
      "platforms": [ { "x": 500, "y": 350, "axis": "vertical", "distance": 100, "speed": 120 } ],
      "enemies": [
        { "x": 200, "y": 416, "kind": "jumping", "patrol_distance": 96 },
        { "x": 250, "y": 416 }
      ],
      "powerups": [ { "x": 150, "y": 380, "kind": "speed" } ],
      "checkpoints": [ { "x": 288, "y": 448 } ],
      "finish": { "x": 600, "y": 448 }
    }"#;

    fn write_level(hint: &str, body: &str) -> std::path::PathBuf {
        let path = temp_file_path(hint);
        fs::write(&path, body).expect("write level file");
        path
    }

    #[test]
    fn load_level_parses_and_builds() {
        let path = write_level("level_valid", SAMPLE);
        let file = load_level_from_path(&path).expect("level should load");
        let level = Level::build(&file, &SimConfig::default());

        assert_eq!(level.level_id, "level1");
        // 1 solid + 10 row tiles + 1 boundary.
        assert_eq!(level.statics.len(), 12);
        assert_eq!(level.statics[11].kind, StaticKind::Boundary);
        assert_eq!(level.statics[10].aabb.left(), 288.0);
        assert_eq!(level.hazards[0].kind, HazardKind::Lava);
        assert_eq!(level.platforms[0].axis, Axis::Vertical);
        assert_eq!(level.enemies[0].kind, EnemyKind::Jumping);
        assert_eq!(level.enemies[0].patrol_distance, 96.0);
        assert_eq!(level.enemies[1].kind, EnemyKind::Patrol);
        assert_eq!(level.enemies[1].patrol_distance, 128.0);
        assert_eq!(level.powerups[0].kind, PowerUpKind::Speed);
        assert_eq!(level.checkpoints[0].aabb.top(), 384.0);
        assert_eq!(level.finish.bottom(), 448.0);
        assert_eq!(level.spawn_box(), Aabb::from_top_left(64.0, 320.0, 32.0, 32.0));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn level_tile_size_overrides_config() {
        let body = SAMPLE.replace("\"version\": \"1\",", "\"version\": \"1\", \"tile_size\": 16,");
        let file: LevelFile = serde_json::from_str(&body).expect("parse level");
        let level = Level::build(&file, &SimConfig::default());
        assert_eq!(level.tile_size, 16.0);
        assert_eq!(level.player_size, Vec2::splat(16.0));
        assert_eq!(level.hazards[0].aabb.width(), 16.0);
    }

    #[test]
    fn load_level_rejects_negative_platform_distance() {
        let body = SAMPLE.replace("\"distance\": 100", "\"distance\": -5");
        let path = write_level("level_bad_platform", &body);
        let err = load_level_from_path(&path).expect_err("negative distance should fail");
        assert!(err.to_string().contains("platform 0"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_rejects_degenerate_solid() {
        let body = SAMPLE.replace("\"w\": 64, \"h\": 32", "\"w\": 0, \"h\": 32");
        let path = write_level("level_bad_solid", &body);
        let err = load_level_from_path(&path).expect_err("zero width should fail");
        assert!(err.to_string().contains("non-positive size"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_rejects_path_like_level_id() {
        let body = SAMPLE.replace("\"level1\"", "\"../level1\"");
        let path = write_level("level_bad_id", &body);
        assert!(load_level_from_path(&path).is_err());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_requires_finish() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).expect("parse sample");
        value
            .as_object_mut()
            .expect("level is an object")
            .remove("finish");
        let path = write_level("level_no_finish", &value.to_string());
        let err = load_level_from_path(&path).expect_err("missing finish should fail");
        assert!(matches!(err, DataError::Parse { .. }));
        let _ = fs::remove_file(path);
    }
}
