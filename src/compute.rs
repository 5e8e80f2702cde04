/// Game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` and returns a brand-new `GameState`.  Randomness only enters
/// through the RNG handed to `init_state`.

use rand::Rng;
use tracing::{info, warn};

use crate::collision::{intersects, SideCollider};
use crate::config::GameConfig;
use crate::entities::{Background, Entity, GameState, GameStatus, Player, Rect, Tick};
use crate::input::InputSnapshot;
use crate::life::PlayerLife;
use crate::projectiles::ProjectilePool;
use crate::sequencer::{Command, CommandSet};
use crate::textures::TextureTable;
use crate::waves::WaveQueue;

/// Gap between the player's starting position and the bottom edge.
const PLAYER_START_MARGIN: i32 = 40;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: player at the bottom centre, the given
/// waves queued, a freshly scattered starfield.
pub fn init_state(
    config: &GameConfig,
    waves: WaveQueue,
    textures: &TextureTable,
    rng: &mut impl Rng,
) -> GameState {
    let screen = config.screen();

    let bullet = Entity::new(
        textures.resolve("player-bullet"),
        config.player_bullet_speed,
        Rect::new(0, 0, config.player_bullet_width, config.player_bullet_height),
    );
    let start_x = (config.screen_width as i32 - config.player_width as i32) / 2;
    let start_y = config.screen_height as i32 - config.player_height as i32 - PLAYER_START_MARGIN;
    let entity = Entity::new(
        textures.resolve("player"),
        config.player_speed,
        Rect::new(start_x, start_y, config.player_width, config.player_height),
    )
    .with_fire(bullet, config.player_fire_cooldown_ms);

    let player = Player {
        entity,
        hitbox_size: config.hitbox_size,
        hitbox_texture: textures.resolve("hitbox"),
        life: PlayerLife::new(config.respawn_delay_ms, config.invulnerability_ms),
        sides: SideCollider::default(),
    };

    let stars = (0..config.star_count)
        .map(|_| {
            (
                rng.gen_range(0..config.screen_width as i32),
                rng.gen_range(0..config.screen_height as i32),
            )
        })
        .collect();
    let background = Background {
        layer: Entity::new(textures.resolve("star"), config.background_speed, screen),
        stars,
    };

    let status = if waves.is_empty() {
        GameStatus::Cleared
    } else {
        GameStatus::Playing
    };

    GameState {
        player,
        waves,
        projectiles: ProjectilePool::new(),
        background,
        score: 0,
        kills: 0,
        status,
        paused: false,
        now: 0,
        frame: 0,
    }
}

// ── Input-driven state transitions ───────────────────────────────────────────

pub fn toggle_pause(state: &GameState) -> GameState {
    let paused = !state.paused;
    info!(paused, tick = state.now, "pause toggled");
    GameState {
        paused,
        ..state.clone()
    }
}

/// Move the player per the held keys, refusing to move toward a screen edge
/// it is already touching.
fn steer_player(player: &mut Player, input: &InputSnapshot, config: &GameConfig) {
    let edges = config.screen_edges();
    player.sides.check(&player.entity.rect, edges.iter());
    let blocked = player.sides.contacts;

    let mut commands = CommandSet::EMPTY;
    if input.left && !blocked.left {
        commands.insert(Command::Left);
    }
    if input.right && !blocked.right {
        commands.insert(Command::Right);
    }
    if input.up && !blocked.top {
        commands.insert(Command::Up);
    }
    if input.down && !blocked.bottom {
        commands.insert(Command::Down);
    }

    player.entity.velocity_mod = if input.slow {
        config.slow_modifier
    } else {
        1.0
    };
    player.entity.apply_movement(commands);
    player.entity.rect.clamp_within(&config.screen());
}

fn player_fire(state: &mut GameState, now: Tick) {
    match state.player.entity.try_fire(now) {
        Ok(Some(bullet)) => state.projectiles.player.push(bullet),
        Ok(None) => {}
        Err(err) => warn!(%err, "player cannot fire"),
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Run every enemy of the current wave through its script for this tick.
fn advance_enemies(state: &mut GameState, now: Tick) {
    let Some(wave) = state.waves.current_mut() else {
        return;
    };
    for enemy in wave.enemies.iter_mut() {
        let entity = &mut enemy.entity;
        if entity.active_until.is_none() {
            entity.active_until = entity.lifetime_ms.map(|ms| now + ms);
        }

        let commands = enemy.sequence.advance(now);
        entity.apply_movement(commands);

        if commands.contains(Command::Fire) && entity.can_fire() {
            match entity.try_fire(now) {
                Ok(Some(bullet)) => state.projectiles.enemy.push(bullet),
                Ok(None) => {}
                Err(err) => warn!(%err, "enemy cannot fire"),
            }
        }
    }
}

/// Player projectiles against enemies of the current wave.  Each projectile
/// hits at most one enemy and is used up by the hit.
fn resolve_enemy_damage(state: &mut GameState) {
    let Some(wave) = state.waves.current_mut() else {
        return;
    };
    let mut score = 0;
    let mut kills = 0;
    state.projectiles.player.retain(|bullet| {
        let target = wave
            .enemies
            .iter_mut()
            .find(|e| e.entity.hit_points > 0 && intersects(&bullet.rect, &e.entity.rect));
        let Some(enemy) = target else {
            return true;
        };
        enemy.entity.hit_points -= 1;
        if enemy.entity.hit_points == 0 {
            score += enemy.entity.score_value;
            kills += 1;
        }
        false
    });
    state.score += score;
    state.kills += kills;
}

/// Enemy projectiles against the player's hitbox.  Ignored unless alive.
fn resolve_player_damage(state: &mut GameState, now: Tick) {
    if !state.player.life.is_vulnerable() {
        return;
    }
    let hitbox = state.player.hitbox();
    let hit = state
        .projectiles
        .enemy
        .iter()
        .any(|p| intersects(&hitbox, &p.rect));
    if hit && state.player.life.hit(now) {
        state.projectiles.clear_enemy();
    }
}

/// Remove defeated, expired and offscreen enemies from the current wave.
fn retire_enemies(state: &mut GameState, bounds: &Rect, now: Tick) {
    let Some(wave) = state.waves.current_mut() else {
        return;
    };
    wave.retain_enemies(|e| {
        e.entity.hit_points > 0 && !e.entity.is_expired(now) && !e.entity.rect.is_outside(bounds)
    });
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// Order matters: background, life timers, player, enemy scripts,
/// projectile travel and culling, collisions, enemy retirement, and finally
/// wave retirement, so a wave emptied this frame is replaced this frame.
/// A paused state is returned unchanged.
pub fn tick(state: &GameState, input: &InputSnapshot, config: &GameConfig) -> GameState {
    if state.paused {
        return state.clone();
    }

    let mut next = state.clone();
    next.frame += 1;
    next.now += config.frame_ms;
    let now = next.now;
    let bounds = config.cull_bounds();

    // ── 1. Background ────────────────────────────────────────────────────────
    next.background.scroll(config.screen_height as i32);

    // ── 2. Respawn / invulnerability timers ──────────────────────────────────
    next.player.life.update(now);

    // ── 3. Player ────────────────────────────────────────────────────────────
    if !next.player.life.is_dead() {
        steer_player(&mut next.player, input, config);
        if input.fire {
            player_fire(&mut next, now);
        }
    }

    // ── 4. Enemy scripts ─────────────────────────────────────────────────────
    advance_enemies(&mut next, now);

    // ── 5. Projectiles ───────────────────────────────────────────────────────
    next.projectiles.update(&bounds, now);

    // ── 6. Collisions ────────────────────────────────────────────────────────
    resolve_enemy_damage(&mut next);
    resolve_player_damage(&mut next, now);
    if next.player.life.is_dead() {
        next.projectiles.clear_enemy();
    }

    // ── 7. Enemy & wave retirement ───────────────────────────────────────────
    retire_enemies(&mut next, &bounds, now);
    next.waves.retire_empty_waves();

    if next.waves.is_empty() && next.status == GameStatus::Playing {
        info!(
            score = next.score,
            deaths = next.player.life.deaths,
            "all waves cleared"
        );
        next.status = GameStatus::Cleared;
    }

    next
}
