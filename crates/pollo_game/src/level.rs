//! Level configuration and the layout built from it.
//!
//! A `LevelConfig` is pure data (built in, or loaded from a JSON table). A
//! `Level` is the placed world it produces: backdrops, clouds, enemies, the
//! boss, and pickups.

use pollo_core::cadence::Cadence;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::boss::Boss;
use crate::collectible::{BottleArtPicker, Coin, GroundBottle};
use crate::context::SimContext;
use crate::enemy::{Enemy, EnemyKind};
use crate::entity::Body;

/// Width of one background segment. Segments overlap by one pixel.
pub const SEGMENT_WIDTH: f32 = 1919.0;
pub const BACKDROP_WIDTH: f32 = 1920.0;
pub const BACKDROP_HEIGHT: f32 = 1080.0;
pub const CLOUD_WIDTH: f32 = 1000.0;
pub const CLOUD_HEIGHT: f32 = 500.0;
pub const CLOUD_Y: f32 = 100.0;
pub const CLOUD_DRIFT_TICK_MS: u64 = 16;
pub const CLOUD_DRIFT_STEP: f32 = 0.15;
const CLOUD_IMAGE: &str = "img/5_background/layers/4_clouds/1.png";
const LAYERS: &str = "img/5_background/layers";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub label: String,
    #[serde(default = "default_length_multiplier")]
    pub length_multiplier: u32,
    pub max_enemy_speed: f32,
    pub throw_cooldown_ms: u64,
    pub throw_damage: u32,
    pub enemy_damage: u32,
    pub boss_damage: u32,
    pub boss_speed: f32,
    #[serde(default = "default_boss_spawn_offset")]
    pub boss_spawn_offset: f32,
    pub heavy_enemies: u32,
    pub light_enemies: u32,
    pub coins: u32,
    pub bottles: u32,
}

impl LevelConfig {
    /// The five levels of the stock game.
    pub fn builtin(level: u32) -> Option<LevelConfig> {
        let row = match level {
            1 => (5, 1, 18, 9, 0.8, 700, 20, 10, 20, 5.0, 3),
            2 => (15, 4, 18, 13, 1.2, 1_400, 15, 12, 20, 6.5, 3),
            3 => (5, 13, 19, 11, 1.8, 1_800, 15, 15, 16, 7.0, 3),
            4 => (10, 13, 22, 11, 2.2, 1_800, 15, 17, 15, 7.0, 4),
            5 => (0, 35, 19, 15, 3.0, 1_500, 20, 20, 20, 7.0, 6),
            _ => return None,
        };
        let (heavy, light, coins, bottles, max_speed, cooldown, throw, enemy, boss, boss_speed, mult) =
            row;
        Some(LevelConfig {
            label: format!("Level {level}"),
            length_multiplier: mult,
            max_enemy_speed: max_speed,
            throw_cooldown_ms: cooldown,
            throw_damage: throw,
            enemy_damage: enemy,
            boss_damage: boss,
            boss_speed,
            boss_spawn_offset: default_boss_spawn_offset(),
            heavy_enemies: heavy,
            light_enemies: light,
            coins,
            bottles,
        })
    }

    pub fn builtin_count() -> u32 {
        5
    }

    pub fn end_x(&self) -> f32 {
        SEGMENT_WIDTH * self.length_multiplier as f32
    }

    pub fn boss_x(&self) -> f32 {
        self.end_x() + self.boss_spawn_offset
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTable {
    pub levels: Vec<LevelConfig>,
}

impl LevelTable {
    pub fn builtin() -> Self {
        Self {
            levels: (1..=LevelConfig::builtin_count())
                .filter_map(LevelConfig::builtin)
                .collect(),
        }
    }

    /// 1-based lookup, matching how levels are numbered to the player.
    pub fn get(&self, level: u32) -> Option<&LevelConfig> {
        level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
    }
}

pub fn load_level_table(path: &Path) -> Result<LevelTable, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level table {}: {e}", path.display()))?;
    let table: LevelTable = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level table JSON {}: {e}", path.display()))?;
    validate_level_table(&table)?;
    log::info!(
        "Loaded {} level(s) from {}",
        table.levels.len(),
        path.display()
    );
    Ok(table)
}

fn validate_level_table(table: &LevelTable) -> Result<(), String> {
    if table.levels.is_empty() {
        return Err("Level validation failed: levels list is empty".to_string());
    }
    for level in &table.levels {
        let label = &level.label;
        if level.length_multiplier < 1 {
            return Err(format!(
                "Level validation failed: '{label}' length_multiplier must be >= 1"
            ));
        }
        if level.throw_cooldown_ms == 0 {
            return Err(format!(
                "Level validation failed: '{label}' throw_cooldown_ms must be > 0"
            ));
        }
        if level.max_enemy_speed <= 0.0 || level.boss_speed <= 0.0 {
            return Err(format!(
                "Level validation failed: '{label}' speeds must be > 0"
            ));
        }
        for (name, damage) in [
            ("throw_damage", level.throw_damage),
            ("enemy_damage", level.enemy_damage),
            ("boss_damage", level.boss_damage),
        ] {
            if !(1..=100).contains(&damage) {
                return Err(format!(
                    "Level validation failed: '{label}' {name} must be within 1..=100, got {damage}"
                ));
            }
        }
    }
    Ok(())
}

const fn default_length_multiplier() -> u32 {
    1
}

const fn default_boss_spawn_offset() -> f32 {
    700.0
}

/// One static background image.
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    pub body: Body,
    pub image: String,
}

pub struct Cloud {
    pub body: Body,
    drift: Cadence,
}

impl Cloud {
    pub fn new(x: f32, now_ms: u64) -> Self {
        Self {
            body: Body::new(x, CLOUD_Y, CLOUD_WIDTH, CLOUD_HEIGHT),
            drift: Cadence::every(CLOUD_DRIFT_TICK_MS, now_ms),
        }
    }

    pub fn image(&self) -> &'static str {
        CLOUD_IMAGE
    }

    pub fn update(&mut self, ctx: &mut SimContext) {
        if self.drift.fire(ctx.now_ms) {
            self.body.pos.x -= CLOUD_DRIFT_STEP;
        }
    }
}

pub struct Level {
    pub config: LevelConfig,
    pub end_x: f32,
    pub backdrops: Vec<Backdrop>,
    pub clouds: Vec<Cloud>,
    pub enemies: Vec<Enemy>,
    pub boss: Boss,
    pub coins: Vec<Coin>,
    pub bottles: Vec<GroundBottle>,
}

impl Level {
    pub fn build<R: Rng + ?Sized>(config: LevelConfig, now_ms: u64, rng: &mut R) -> Self {
        let end_x = config.end_x();
        let backdrops = backdrops(config.length_multiplier);
        let clouds = vec![Cloud::new(800.0 + rng.gen::<f32>() * 500.0, now_ms)];

        let mut enemies = Vec::new();
        for (kind, count) in [
            (EnemyKind::Heavy, config.heavy_enemies),
            (EnemyKind::Light, config.light_enemies),
        ] {
            for _ in 0..count {
                enemies.push(Enemy::spawn(
                    kind,
                    end_x,
                    config.max_enemy_speed,
                    now_ms,
                    rng,
                ));
            }
        }

        let coins = (0..config.coins)
            .map(|_| {
                let x = pickup_x(end_x, rng);
                Coin::new(x, 300.0 + rng.gen::<f32>() * 400.0)
            })
            .collect();

        let mut art = BottleArtPicker::new();
        let bottles = (0..config.bottles)
            .map(|_| {
                let x = pickup_x(end_x, rng);
                GroundBottle::new(x, art.next(rng))
            })
            .collect();

        let boss = Boss::new(
            config.boss_x(),
            config.boss_damage,
            config.boss_speed,
            now_ms,
        );

        log::info!(
            "Built '{}': end_x={} enemies={} coins={} bottles={}",
            config.label,
            end_x,
            enemies.len(),
            config.coins,
            config.bottles
        );

        Self {
            config,
            end_x,
            backdrops,
            clouds,
            enemies,
            boss,
            coins,
            bottles,
        }
    }
}

fn pickup_x<R: Rng + ?Sized>(end_x: f32, rng: &mut R) -> f32 {
    500.0 + rng.gen::<f32>() * (end_x - 300.0)
}

fn backdrops(length_multiplier: u32) -> Vec<Backdrop> {
    let mut out = Vec::new();
    for i in -1..=length_multiplier as i32 {
        let variant = if i % 2 == 0 { 2 } else { 1 };
        let x = SEGMENT_WIDTH * i as f32;
        for image in [
            format!("{LAYERS}/air.png"),
            format!("{LAYERS}/3_third_layer/{variant}.png"),
            format!("{LAYERS}/2_second_layer/{variant}.png"),
            format!("{LAYERS}/1_first_layer/{variant}.png"),
        ] {
            out.push(Backdrop {
                body: Body::new(x, 0.0, BACKDROP_WIDTH, BACKDROP_HEIGHT),
                image,
            });
        }
    }
    out
}
