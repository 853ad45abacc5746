//! Level layouts: what the world is built from
//!
//! A layout is plain data. It can be hand placed ([`LevelLayout::demo`]),
//! generated from a seed ([`LevelLayout::generate`]) or loaded from JSON.

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{
    AMBUSH_HEIGHT, AMBUSH_WIDTH, BLOCK_SIZE, GROUND_ENEMY_SIZE, SHELLED_HEIGHT, SHELLED_WIDTH,
};
use crate::error::ConfigError;
use crate::sim::item::ItemKind;
use crate::sim::state::{LevelBounds, Pit};

/// Enemy types a layout can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Ground,
    Shelled,
    Ambush,
}

impl EnemyKind {
    fn width(self) -> f32 {
        match self {
            EnemyKind::Ground => GROUND_ENEMY_SIZE,
            EnemyKind::Shelled => SHELLED_WIDTH,
            EnemyKind::Ambush => AMBUSH_WIDTH,
        }
    }

    fn height(self) -> f32 {
        match self {
            EnemyKind::Ground => GROUND_ENEMY_SIZE,
            EnemyKind::Shelled => SHELLED_HEIGHT,
            EnemyKind::Ambush => AMBUSH_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSpawn {
    pub x: f32,
    pub y: f32,
    /// Item released by the first bump (`None` = empty block)
    #[serde(default)]
    pub item: Option<ItemKind>,
}

/// Everything needed to build a [`World`](crate::sim::World)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub ground_y: f32,
    pub goal_x: f32,
    pub map_width: f32,
    pub view_width: f32,
    pub view_height: f32,
    /// Top-left of the player box
    pub player_spawn: (f32, f32),
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub blocks: Vec<BlockSpawn>,
    #[serde(default)]
    pub pits: Vec<Pit>,
}

// Demo / generator geometry
const GROUND_Y: f32 = 400.0;
const VIEW_WIDTH: f32 = 800.0;
const VIEW_HEIGHT: f32 = 480.0;
const MAP_WIDTH: f32 = 3200.0;
const GOAL_X: f32 = 3000.0;
/// Block row height above the ground; the underside is in reach of a full jump
const BLOCK_ROW_Y: f32 = GROUND_Y - 90.0 - BLOCK_SIZE;
/// Generated features start this far from the spawn
const SAFE_START: f32 = 400.0;
/// Width of one generated section
const SECTION_WIDTH: f32 = 320.0;

impl LevelLayout {
    /// Empty level: ground, goal and the player
    pub fn flat(map_width: f32, goal_x: f32) -> Self {
        Self {
            ground_y: GROUND_Y,
            goal_x,
            map_width,
            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,
            player_spawn: (100.0, GROUND_Y - 40.0),
            enemies: Vec::new(),
            blocks: Vec::new(),
            pits: Vec::new(),
        }
    }

    /// Hand-placed level: three patrolling enemies from the start of the
    /// classic stage plus a few blocks, a shelled enemy, an ambush socket and
    /// one pit.
    pub fn demo() -> Self {
        let mut layout = Self::flat(MAP_WIDTH, GOAL_X);
        layout.enemies = vec![
            EnemySpawn {
                kind: EnemyKind::Ground,
                x: 500.0,
                y: 300.0,
            },
            EnemySpawn {
                kind: EnemyKind::Ground,
                x: 1200.0,
                y: 300.0,
            },
            EnemySpawn {
                kind: EnemyKind::Ground,
                x: 1600.0,
                y: 300.0,
            },
            EnemySpawn {
                kind: EnemyKind::Shelled,
                x: 2000.0,
                y: GROUND_Y - SHELLED_HEIGHT,
            },
            EnemySpawn {
                kind: EnemyKind::Ambush,
                x: 2500.0,
                y: GROUND_Y - AMBUSH_HEIGHT,
            },
        ];
        layout.blocks = vec![
            BlockSpawn {
                x: 300.0,
                y: BLOCK_ROW_Y,
                item: Some(ItemKind::Mushroom),
            },
            BlockSpawn {
                x: 300.0 + BLOCK_SIZE,
                y: BLOCK_ROW_Y,
                item: None,
            },
            BlockSpawn {
                x: 900.0,
                y: BLOCK_ROW_Y,
                item: Some(ItemKind::Flower),
            },
            BlockSpawn {
                x: 1800.0,
                y: BLOCK_ROW_Y,
                item: Some(ItemKind::Mushroom),
            },
        ];
        layout.pits = vec![Pit {
            start: 1400.0,
            end: 1480.0,
        }];
        layout
    }

    /// Deterministic random level. The same seed always yields the same layout.
    pub fn generate(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut layout = Self::flat(MAP_WIDTH, GOAL_X);

        let mut x = SAFE_START;
        while x + SECTION_WIDTH <= GOAL_X - 100.0 {
            let feature_x = x + rng.random_range(0.0..SECTION_WIDTH / 2.0);
            match rng.random_range(0..5u32) {
                0 => layout.enemies.push(ground_spawn(EnemyKind::Ground, feature_x)),
                1 => layout.enemies.push(ground_spawn(EnemyKind::Shelled, feature_x)),
                2 => layout.enemies.push(ground_spawn(EnemyKind::Ambush, feature_x)),
                3 => {
                    let count = rng.random_range(1..=3u32);
                    let prize = rng.random_range(0..count);
                    for i in 0..count {
                        let item = if i == prize && rng.random_bool(0.6) {
                            Some(if rng.random_bool(0.75) {
                                ItemKind::Mushroom
                            } else {
                                ItemKind::Flower
                            })
                        } else {
                            None
                        };
                        layout.blocks.push(BlockSpawn {
                            x: feature_x + i as f32 * BLOCK_SIZE,
                            y: BLOCK_ROW_Y,
                            item,
                        });
                    }
                }
                _ => {
                    let width = rng.random_range(64.0..128.0f32).round();
                    layout.pits.push(Pit {
                        start: feature_x,
                        end: feature_x + width,
                    });
                }
            }
            x += SECTION_WIDTH;
        }

        log::info!(
            "Generated level (seed {seed}): {} enemies, {} blocks, {} pits",
            layout.enemies.len(),
            layout.blocks.len(),
            layout.pits.len()
        );
        layout
    }

    /// Parse and validate a layout from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load and validate a layout file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let layout = Self::from_json(&json)?;
        log::info!("Loaded level from {}", path.as_ref().display());
        Ok(layout)
    }

    /// Reject layouts the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidLevel(msg));

        let scalars = [
            ("ground_y", self.ground_y),
            ("goal_x", self.goal_x),
            ("map_width", self.map_width),
            ("view_width", self.view_width),
            ("view_height", self.view_height),
            ("player_spawn.x", self.player_spawn.0),
            ("player_spawn.y", self.player_spawn.1),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return invalid(format!("{name} is not finite"));
            }
        }
        if self.map_width <= 0.0 || self.view_width <= 0.0 || self.view_height <= 0.0 {
            return invalid("map and view sizes must be positive".into());
        }
        if self.ground_y > self.view_height {
            return invalid(format!(
                "ground_y {} is below the view height {}",
                self.ground_y, self.view_height
            ));
        }
        if self.goal_x > self.map_width {
            return invalid(format!(
                "goal_x {} is past the map width {}",
                self.goal_x, self.map_width
            ));
        }
        if self.player_spawn.0 < 0.0 || self.player_spawn.0 >= self.map_width {
            return invalid(format!("player spawn x {} is off the map", self.player_spawn.0));
        }

        for (i, enemy) in self.enemies.iter().enumerate() {
            if !enemy.x.is_finite() || !enemy.y.is_finite() {
                return invalid(format!("enemy {i} position is not finite"));
            }
            let max_x = self.map_width - enemy.kind.width();
            if enemy.x < 0.0 || enemy.x > max_x {
                return invalid(format!(
                    "enemy {i} at x {} is outside [0, {max_x}]",
                    enemy.x
                ));
            }
        }
        for (i, block) in self.blocks.iter().enumerate() {
            if !block.x.is_finite() || !block.y.is_finite() {
                return invalid(format!("block {i} position is not finite"));
            }
        }
        for (i, pit) in self.pits.iter().enumerate() {
            if !(pit.start.is_finite() && pit.end.is_finite()) || pit.start >= pit.end {
                return invalid(format!("pit {i} has an empty or inverted span"));
            }
        }
        Ok(())
    }

    /// Static geometry handed to the world
    pub fn bounds(&self) -> LevelBounds {
        LevelBounds {
            ground_y: self.ground_y,
            goal_x: self.goal_x,
            map_width: self.map_width,
            view_width: self.view_width,
            view_height: self.view_height,
            pits: self.pits.clone(),
        }
    }
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::demo()
    }
}

/// Spawn an enemy standing on the ground line
fn ground_spawn(kind: EnemyKind, x: f32) -> EnemySpawn {
    EnemySpawn {
        kind,
        x,
        y: GROUND_Y - kind.height(),
    }
}
