/// Live projectile collections and their lifecycle.

use tracing::debug;

use crate::entities::{Entity, Rect, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TravelDirection {
    /// Toward the top of the screen (player shots).
    Up,
    /// Toward the player's side of the screen (enemy shots).
    Down,
}

/// Build a projectile from `template`, positioned on `origin`.
///
/// Texture, size, velocity and lifetime come from the template.  The copy is
/// horizontally centred on the origin with its top edge level with the
/// origin's.  Fire control is never copied: projectiles cannot fire.
pub fn spawn(template: &Entity, origin: &Entity, now: Tick) -> Entity {
    let width = template.rect.width();
    let x = origin
        .rect
        .x
        .saturating_add((origin.rect.width() as i32 - width as i32) / 2);
    let rect = Rect::new(x, origin.rect.y, width, template.rect.height());
    let mut projectile = Entity::new(template.texture, template.velocity, rect);
    projectile.velocity_mod = template.velocity_mod;
    projectile.active_until = template.lifetime_ms.map(|ms| now + ms);
    projectile
}

/// Move every projectile one stride along `direction`.
pub fn advance_all(projectiles: &mut [Entity], direction: TravelDirection) {
    for p in projectiles.iter_mut() {
        let d = p.stride();
        match direction {
            TravelDirection::Up => p.rect.translate(0, -d),
            TravelDirection::Down => p.rect.translate(0, d),
        }
    }
}

/// Drop projectiles lying wholly outside `bounds`.  Returns how many went.
pub fn cull_offscreen(projectiles: &mut Vec<Entity>, bounds: &Rect) -> usize {
    let before = projectiles.len();
    projectiles.retain(|p| !p.rect.is_outside(bounds));
    before - projectiles.len()
}

/// Drop projectiles whose lifetime has run out.
pub fn cull_expired(projectiles: &mut Vec<Entity>, now: Tick) -> usize {
    let before = projectiles.len();
    projectiles.retain(|p| !p.is_expired(now));
    before - projectiles.len()
}

// ── Pool ──────────────────────────────────────────────────────────────────────

/// Player-fired and enemy-fired projectiles, kept apart.
#[derive(Clone, Debug, Default)]
pub struct ProjectilePool {
    pub player: Vec<Entity>,
    pub enemy: Vec<Entity>,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// One frame of travel followed by culling.
    pub fn update(&mut self, bounds: &Rect, now: Tick) {
        advance_all(&mut self.player, TravelDirection::Up);
        advance_all(&mut self.enemy, TravelDirection::Down);

        let culled = cull_offscreen(&mut self.player, bounds)
            + cull_offscreen(&mut self.enemy, bounds)
            + cull_expired(&mut self.player, now)
            + cull_expired(&mut self.enemy, now);
        if culled > 0 {
            debug!(culled, "projectiles retired");
        }
    }

    /// Screen clear on player death.
    pub fn clear_enemy(&mut self) {
        self.enemy.clear();
    }

    pub fn len(&self) -> usize {
        self.player.len() + self.enemy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
