/// Game tunables.  Every field has a default, so a config file only needs
/// the values it changes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::entities::{Rect, MAX_EXTENT};
use crate::error::ConfigError;

/// Longest accepted frame.
const MAX_FRAME_MS: u64 = 1000;
const MAX_STARS: u64 = 10_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Game-clock milliseconds per frame; also the real frame delay.
    pub frame_ms: u64,
    /// Extra room around the screen before things are culled.
    pub cull_margin: u32,

    pub player_width: u32,
    pub player_height: u32,
    pub player_speed: f32,
    /// Speed multiplier while the slow key is held.
    pub slow_modifier: f32,
    pub hitbox_size: u32,
    pub player_bullet_width: u32,
    pub player_bullet_height: u32,
    pub player_bullet_speed: f32,
    pub player_fire_cooldown_ms: u64,

    pub respawn_delay_ms: u64,
    pub invulnerability_ms: u64,
    pub blink_ms: u64,

    pub background_speed: f32,
    pub star_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen_width: 1024,
            screen_height: 768,
            frame_ms: 33,
            cull_margin: 64,
            player_width: 50,
            player_height: 85,
            player_speed: 8.0,
            slow_modifier: 0.5,
            hitbox_size: 10,
            player_bullet_width: 8,
            player_bullet_height: 24,
            player_bullet_speed: 14.0,
            player_fire_cooldown_ms: 120,
            respawn_delay_ms: 500,
            invulnerability_ms: 1000,
            blink_ms: 100,
            background_speed: 5.0,
            star_count: 48,
        }
    }
}

impl GameConfig {
    /// Parse and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extent = MAX_EXTENT as u64;
        let sizes = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("hitbox_size", self.hitbox_size),
            ("player_bullet_width", self.player_bullet_width),
            ("player_bullet_height", self.player_bullet_height),
        ];
        for (field, value) in sizes {
            in_range(field, value as u64, 1, extent)?;
        }
        in_range("cull_margin", self.cull_margin as u64, 0, extent)?;
        in_range("frame_ms", self.frame_ms, 1, MAX_FRAME_MS)?;
        in_range("star_count", self.star_count as u64, 0, MAX_STARS)?;

        let speeds = [
            ("player_speed", self.player_speed),
            ("slow_modifier", self.slow_modifier),
            ("player_bullet_speed", self.player_bullet_speed),
            ("background_speed", self.background_speed),
        ];
        for (field, value) in speeds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::BadSpeed { field, value });
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn screen(&self) -> Rect {
        Rect::new(0, 0, self.screen_width, self.screen_height)
    }

    /// The screen grown by `cull_margin`; anything wholly outside is gone.
    pub fn cull_bounds(&self) -> Rect {
        self.screen().expanded(self.cull_margin)
    }

    /// One-pixel walls along the left, right, top and bottom screen edges.
    pub fn screen_edges(&self) -> [Rect; 4] {
        let (w, h) = (self.screen_width, self.screen_height);
        [
            Rect::new(0, 0, 1, h),
            Rect::new(w as i32 - 1, 0, 1, h),
            Rect::new(0, 0, w, 1),
            Rect::new(0, h as i32 - 1, w, 1),
        ]
    }
}

fn in_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
