/// Bullet and enemy templates, plus the wave script that places them.
///
/// The file format is TOML:
///
/// ```toml
/// [bullets.red-bullet]
/// texture = "red-bullet"
/// velocity = 6.0
/// width = 12
/// height = 12
/// cooldown_ms = 400
///
/// [enemies.bat]
/// texture = "bat"
/// velocity = 4.0
/// width = 40
/// height = 30
/// bullet = "red-bullet"
/// sequence = [{ commands = ["down", "fire"], dwell_ms = 0 }]
///
/// [[waves]]
/// enemies = [{ template = "bat", x = 200, y = 20 }]
/// ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entities::{Entity, Rect};
use crate::error::AssetError;
use crate::sequencer::{ActionSequence, ActionStep, Command, RepeatPolicy};
use crate::textures::TextureTable;
use crate::waves::{Enemy, Wave, WaveQueue};

/// Content compiled into the binary.
pub const DEFAULT_CONTENT: &str = include_str!("../assets/content.toml");

fn one() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletTemplate {
    pub texture: String,
    pub velocity: f32,
    pub width: u32,
    pub height: u32,
    /// Minimum time between two shots of this bullet.
    pub cooldown_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub texture: String,
    pub velocity: f32,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<String>,
    #[serde(default = "one")]
    pub hit_points: u32,
    #[serde(default)]
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime_ms: Option<u64>,
    #[serde(default)]
    pub repeat: RepeatPolicy,
    pub sequence: Vec<ActionStep>,
}

/// One enemy in a wave.  `sequence`/`repeat` override the template's.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub template: String,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<ActionStep>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveRecord {
    #[serde(default)]
    pub enemies: Vec<Placement>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub bullets: BTreeMap<String, BulletTemplate>,
    #[serde(default)]
    pub enemies: BTreeMap<String, EnemyTemplate>,
    #[serde(default)]
    pub waves: Vec<WaveRecord>,
}

impl Content {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read content {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parse content {}", path.display()))
    }

    /// Prototype entity for a bullet, positioned at the origin.
    pub fn bullet_prototype(
        &self,
        name: &str,
        textures: &TextureTable,
    ) -> Result<(Entity, u64), AssetError> {
        let t = self
            .bullets
            .get(name)
            .ok_or_else(|| AssetError::UnknownBullet(name.to_string()))?;
        let rect = sized_rect(name, t.width, t.height)?;
        let entity = Entity::new(textures.resolve(&t.texture), t.velocity, rect)
            .with_lifetime(t.lifetime_ms);
        Ok((entity, t.cooldown_ms))
    }

    /// An enemy built from its template and placed as `placement` says.
    pub fn enemy(&self, placement: &Placement, textures: &TextureTable) -> Result<Enemy, AssetError> {
        let name = placement.template.as_str();
        let t = self
            .enemies
            .get(name)
            .ok_or_else(|| AssetError::UnknownEnemy(name.to_string()))?;

        let rect = sized_rect(name, t.width, t.height)?;
        let mut entity = Entity::new(textures.resolve(&t.texture), t.velocity, rect)
            .placed_at(placement.x, placement.y)
            .with_hit_points(t.hit_points)
            .with_score(t.score)
            .with_lifetime(t.lifetime_ms);
        if let Some(bullet) = &t.bullet {
            let (template, cooldown_ms) = self.bullet_prototype(bullet, textures)?;
            entity = entity.with_fire(template, cooldown_ms);
        }

        let steps = placement.sequence.clone().unwrap_or_else(|| t.sequence.clone());
        let policy = placement.repeat.unwrap_or(t.repeat);
        let sequence = ActionSequence::new(steps, policy).map_err(|source| {
            AssetError::BadSequence {
                name: name.to_string(),
                source,
            }
        })?;

        let scripted_fire = sequence
            .steps()
            .iter()
            .any(|step| step.commands.contains(Command::Fire));
        if scripted_fire && !entity.can_fire() {
            warn!(enemy = name, "script fires but template has no bullet; fire ignored");
        }

        Ok(Enemy { entity, sequence })
    }

    /// Build the wave queue.  Enemies that fail to build are logged and
    /// left out; waves left with nobody in them are dropped.
    pub fn build_waves(&self, textures: &TextureTable) -> WaveQueue {
        let mut waves = Vec::with_capacity(self.waves.len());
        for (index, record) in self.waves.iter().enumerate() {
            let mut enemies = Vec::with_capacity(record.enemies.len());
            for placement in &record.enemies {
                match self.enemy(placement, textures) {
                    Ok(enemy) => enemies.push(enemy),
                    Err(err) => warn!(wave = index + 1, %err, "skipping enemy"),
                }
            }
            if enemies.is_empty() {
                warn!(wave = index + 1, "wave has no usable enemies, dropped");
                continue;
            }
            waves.push(Wave::new(enemies));
        }
        info!(waves = waves.len(), "wave script loaded");
        WaveQueue::new(waves)
    }
}

fn sized_rect(name: &str, width: u32, height: u32) -> Result<Rect, AssetError> {
    Rect::try_new(0, 0, width as i64, height as i64).map_err(|source| AssetError::BadGeometry {
        name: name.to_string(),
        source,
    })
}
