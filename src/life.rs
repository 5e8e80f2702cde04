/// Player life-state machine: Alive → Dead → Invulnerable → Alive.
///
/// Every state that ends carries its absolute end tick.

use tracing::info;

use crate::entities::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dead { respawn_at: Tick },
    /// Only entered from `Dead`.
    Invulnerable { until: Tick },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerLife {
    pub state: LifeState,
    pub deaths: u32,
    pub respawn_delay_ms: u64,
    pub invulnerability_ms: u64,
}

impl PlayerLife {
    pub fn new(respawn_delay_ms: u64, invulnerability_ms: u64) -> Self {
        PlayerLife {
            state: LifeState::Alive,
            deaths: 0,
            respawn_delay_ms,
            invulnerability_ms,
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state, LifeState::Dead { .. })
    }

    pub fn is_invulnerable(&self) -> bool {
        matches!(self.state, LifeState::Invulnerable { .. })
    }

    /// Only an `Alive` player can be hit.
    pub fn is_vulnerable(&self) -> bool {
        self.state == LifeState::Alive
    }

    /// Register a projectile hit at `now`.  Returns true when it killed the
    /// player; hits while dead or invulnerable are ignored.
    pub fn hit(&mut self, now: Tick) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.state = LifeState::Dead {
            respawn_at: now + self.respawn_delay_ms,
        };
        self.deaths += 1;
        info!(deaths = self.deaths, tick = now, "player died");
        true
    }

    /// Apply any timed transition due at `now`.  Returns the new state when
    /// one happened.
    pub fn update(&mut self, now: Tick) -> Option<LifeState> {
        let next = match self.state {
            LifeState::Dead { respawn_at } if now >= respawn_at => LifeState::Invulnerable {
                until: now + self.invulnerability_ms,
            },
            LifeState::Invulnerable { until } if now >= until => LifeState::Alive,
            _ => return None,
        };
        self.state = next;
        Some(next)
    }

    /// Whether the sprite is drawn at `now`: never while dead, on alternate
    /// `blink_ms` phases while invulnerable.
    pub fn is_visible(&self, now: Tick, blink_ms: u64) -> bool {
        match self.state {
            LifeState::Alive => true,
            LifeState::Dead { .. } => false,
            LifeState::Invulnerable { .. } => (now / blink_ms.max(1)) % 2 == 0,
        }
    }
}
