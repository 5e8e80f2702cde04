/// Game entity types: mostly data, with the small amount of behaviour that
/// belongs to a single entity (movement, firing, expiry).

use crate::collision::SideCollider;
use crate::error::{ContractViolation, GeometryError};
use crate::life::PlayerLife;
use crate::projectiles::{self, ProjectilePool};
use crate::sequencer::{Command, CommandSet};
use crate::textures::TextureId;
use crate::waves::WaveQueue;

/// Milliseconds on the game clock.
pub type Tick = u64;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Largest width or height accepted from data files, in pixels.
pub const MAX_EXTENT: u32 = 1 << 16;

/// Axis-aligned rectangle in world pixels.  Width and height are at least 1
/// and fit in an `i32`; edges saturate instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    width: u32,
    height: u32,
}

impl Rect {
    /// Panics on a zero-sized or oversized rectangle; use [`Rect::try_new`]
    /// for data that comes from outside the program.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        assert!(
            (1..=i32::MAX as u32).contains(&width) && (1..=i32::MAX as u32).contains(&height),
            "malformed rectangle {width}x{height}"
        );
        Rect { x, y, width, height }
    }

    /// Accepts sizes in `1..=MAX_EXTENT` on both axes.
    pub fn try_new(x: i32, y: i32, width: i64, height: i64) -> Result<Self, GeometryError> {
        let range = 1..=MAX_EXTENT as i64;
        if !range.contains(&width) || !range.contains(&height) {
            return Err(GeometryError::Malformed { width, height });
        }
        Ok(Rect::new(x, y, width as u32, height as u32))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// Grown by `margin` on every side.
    pub fn expanded(&self, margin: u32) -> Rect {
        let m = margin.min(i32::MAX as u32);
        let grow = |side: u32| side.saturating_add(m.saturating_mul(2)).min(i32::MAX as u32);
        Rect::new(
            self.x.saturating_sub(m as i32),
            self.y.saturating_sub(m as i32),
            grow(self.width),
            grow(self.height),
        )
    }

    /// A `width` x `height` rectangle sharing this one's centre.
    pub fn centered(&self, width: u32, height: u32) -> Rect {
        Rect::new(
            self.x.saturating_add((self.width as i32 - width as i32) / 2),
            self.y.saturating_add((self.height as i32 - height as i32) / 2),
            width,
            height,
        )
    }

    /// Shift so the rectangle lies inside `bounds` where it fits.
    pub fn clamp_within(&mut self, bounds: &Rect) {
        self.x = self
            .x
            .min(bounds.right().saturating_sub(self.width as i32))
            .max(bounds.left());
        self.y = self
            .y
            .min(bounds.bottom().saturating_sub(self.height as i32))
            .max(bounds.top());
    }

    /// True when no part of the rectangle overlaps `bounds`.
    pub fn is_outside(&self, bounds: &Rect) -> bool {
        self.left() > bounds.right()
            || self.right() < bounds.left()
            || self.top() > bounds.bottom()
            || self.bottom() < bounds.top()
    }
}

// ── Fire control ──────────────────────────────────────────────────────────────

/// Firing capability: the prototype for emitted projectiles and the cooldown
/// between shots.
#[derive(Clone, Debug, PartialEq)]
pub struct FireControl {
    pub template: Box<Entity>,
    pub cooldown_ms: u64,
    /// Absolute tick from which the next shot is allowed.
    pub next_ready_at: Tick,
}

impl FireControl {
    pub fn new(template: Entity, cooldown_ms: u64) -> Self {
        FireControl {
            template: Box::new(template),
            cooldown_ms,
            next_ready_at: 0,
        }
    }

    pub fn is_ready(&self, now: Tick) -> bool {
        now >= self.next_ready_at
    }

    pub fn rearm(&mut self, now: Tick) {
        self.next_ready_at = now + self.cooldown_ms;
    }
}

// ── Entity ────────────────────────────────────────────────────────────────────

/// Anything positioned and drawn: player, enemy, projectile, background.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub rect: Rect,
    /// Pixels per frame.
    pub velocity: f32,
    /// Multiplier on `velocity` (e.g. 0.5 while the slow key is held).
    pub velocity_mod: f32,
    /// Handle into the shared texture table; `None` when loading failed.
    pub texture: Option<TextureId>,
    pub fire: Option<FireControl>,
    pub spawn_origin: (i32, i32),
    pub active_until: Option<Tick>,
    /// Lifetime stamped onto copies spawned from this entity as a template.
    pub lifetime_ms: Option<u64>,
    pub hit_points: u32,
    pub score_value: u32,
}

impl Entity {
    pub fn new(texture: Option<TextureId>, velocity: f32, rect: Rect) -> Self {
        Entity {
            rect,
            velocity,
            velocity_mod: 1.0,
            texture,
            fire: None,
            spawn_origin: (rect.x, rect.y),
            active_until: None,
            lifetime_ms: None,
            hit_points: 1,
            score_value: 0,
        }
    }

    pub fn with_fire(mut self, template: Entity, cooldown_ms: u64) -> Self {
        self.fire = Some(FireControl::new(template, cooldown_ms));
        self
    }

    pub fn with_lifetime(mut self, lifetime_ms: Option<u64>) -> Self {
        self.lifetime_ms = lifetime_ms;
        self
    }

    pub fn with_hit_points(mut self, hit_points: u32) -> Self {
        self.hit_points = hit_points.max(1);
        self
    }

    pub fn with_score(mut self, score_value: u32) -> Self {
        self.score_value = score_value;
        self
    }

    /// Place the entity, making the new position its spawn origin.
    pub fn placed_at(mut self, x: i32, y: i32) -> Self {
        self.rect.x = x;
        self.rect.y = y;
        self.spawn_origin = (x, y);
        self
    }

    /// Distance covered per frame along one axis.
    pub fn stride(&self) -> i32 {
        (self.velocity * self.velocity_mod).round() as i32
    }

    /// Translate by one stride in every direction present in `commands`.
    pub fn apply_movement(&mut self, commands: CommandSet) {
        let d = self.stride();
        let (mut dx, mut dy) = (0, 0);
        if commands.contains(Command::Left) {
            dx -= d;
        }
        if commands.contains(Command::Right) {
            dx += d;
        }
        if commands.contains(Command::Up) {
            dy -= d;
        }
        if commands.contains(Command::Down) {
            dy += d;
        }
        self.rect.translate(dx, dy);
    }

    pub fn can_fire(&self) -> bool {
        self.fire.is_some()
    }

    /// Emit a projectile if the cooldown has elapsed, re-arming it.
    ///
    /// Asking an entity without a projectile template to fire is a caller
    /// bug and is reported as a [`ContractViolation`].
    pub fn try_fire(&mut self, now: Tick) -> Result<Option<Entity>, ContractViolation> {
        let fire = self
            .fire
            .as_ref()
            .ok_or(ContractViolation::NoProjectileTemplate)?;
        if !fire.is_ready(now) {
            return Ok(None);
        }
        let projectile = projectiles::spawn(&fire.template, self, now);
        if let Some(fire) = self.fire.as_mut() {
            fire.rearm(now);
        }
        Ok(Some(projectile))
    }

    pub fn reset_to_origin(&mut self) {
        self.rect.x = self.spawn_origin.0;
        self.rect.y = self.spawn_origin.1;
    }

    pub fn is_expired(&self, now: Tick) -> bool {
        self.active_until.map_or(false, |until| now >= until)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub entity: Entity,
    pub hitbox_size: u32,
    pub hitbox_texture: Option<TextureId>,
    pub life: PlayerLife,
    pub sides: SideCollider,
}

impl Player {
    /// The reduced collision rectangle centred on the sprite.
    pub fn hitbox(&self) -> Rect {
        self.entity.rect.centered(self.hitbox_size, self.hitbox_size)
    }
}

// ── Background ────────────────────────────────────────────────────────────────

/// A scrolling starfield.  `layer` spans the screen and scrolls down; a
/// second copy is drawn one screen-height above it so the field wraps.
#[derive(Clone, Debug)]
pub struct Background {
    pub layer: Entity,
    /// Star offsets relative to the layer's top-left corner.
    pub stars: Vec<(i32, i32)>,
}

impl Background {
    pub fn scroll(&mut self, screen_height: i32) {
        if self.layer.rect.y > screen_height - 1 {
            self.layer.reset_to_origin();
        } else {
            let d = self.layer.stride();
            self.layer.rect.translate(0, d);
        }
    }

    /// Vertical offsets of the two drawn copies.
    pub fn copy_offsets(&self) -> [i32; 2] {
        let y = self.layer.rect.y;
        [y, y - self.layer.rect.height() as i32]
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    /// The wave queue ran dry.
    Cleared,
}

/// The entire game state.  Cloneable so pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub waves: WaveQueue,
    pub projectiles: ProjectilePool,
    pub background: Background,
    pub score: u32,
    pub kills: u32,
    pub status: GameStatus,
    pub paused: bool,
    /// Game clock; advances only while unpaused.
    pub now: Tick,
    pub frame: u64,
}
