/// What gets drawn each frame, independent of how.
///
/// `draw_world` decides visibility and order; a [`Renderer`] only receives
/// a texture handle and a world rectangle per visible entity.

use std::io;

use crate::config::GameConfig;
use crate::entities::{Entity, GameState, Rect};
use crate::life::LifeState;
use crate::textures::TextureId;

pub trait Renderer {
    fn draw(&mut self, texture: TextureId, rect: &Rect) -> io::Result<()>;
}

/// Side of a background star, in world pixels.
const STAR_SIZE: u32 = 2;

/// Draw background, enemies, projectiles and player, back to front.
pub fn draw_world<R: Renderer>(r: &mut R, state: &GameState, config: &GameConfig) -> io::Result<()> {
    let bg = &state.background;
    if let Some(star) = bg.layer.texture {
        for dy in bg.copy_offsets() {
            for &(sx, sy) in &bg.stars {
                let rect = Rect::new(bg.layer.rect.x + sx, dy + sy, STAR_SIZE, STAR_SIZE);
                r.draw(star, &rect)?;
            }
        }
    }

    if let Some(wave) = state.waves.current() {
        for enemy in &wave.enemies {
            draw_entity(r, &enemy.entity)?;
        }
    }

    for p in &state.projectiles.player {
        draw_entity(r, p)?;
    }
    for p in &state.projectiles.enemy {
        draw_entity(r, p)?;
    }

    let player = &state.player;
    if player.life.is_visible(state.now, config.blink_ms) {
        draw_entity(r, &player.entity)?;
        if player.life.state == LifeState::Alive {
            if let Some(hitbox) = player.hitbox_texture {
                r.draw(hitbox, &player.hitbox())?;
            }
        }
    }
    Ok(())
}

/// Entities whose texture failed to load are skipped.
fn draw_entity<R: Renderer>(r: &mut R, entity: &Entity) -> io::Result<()> {
    match entity.texture {
        Some(texture) => r.draw(texture, &entity.rect),
        None => Ok(()),
    }
}
