use std::io;

use wave_shooter::compute::init_state;
use wave_shooter::config::GameConfig;
use wave_shooter::entities::*;
use wave_shooter::life::LifeState;
use wave_shooter::render::{draw_world, Renderer};
use wave_shooter::sequencer::{ActionSequence, ActionStep, RepeatPolicy};
use wave_shooter::textures::{TextureId, TextureTable, DEFAULT_MANIFEST};
use wave_shooter::waves::{Enemy, Wave, WaveQueue};

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct Recorder {
    draws: Vec<(TextureId, Rect)>,
}

impl Renderer for Recorder {
    fn draw(&mut self, texture: TextureId, rect: &Rect) -> io::Result<()> {
        self.draws.push((texture, *rect));
        Ok(())
    }
}

fn textures() -> TextureTable {
    TextureTable::from_manifest_str(DEFAULT_MANIFEST).unwrap()
}

fn make_state(waves: Vec<Wave>) -> GameState {
    init_state(
        &GameConfig::default(),
        WaveQueue::new(waves),
        &textures(),
        &mut StdRng::seed_from_u64(7),
    )
}

fn record(state: &GameState) -> Vec<(TextureId, Rect)> {
    let mut r = Recorder::default();
    draw_world(&mut r, state, &GameConfig::default()).unwrap();
    r.draws
}

fn enemy(texture: Option<TextureId>, x: i32) -> Enemy {
    Enemy {
        entity: Entity::new(texture, 0.0, Rect::new(0, 0, 40, 30)).placed_at(x, 50),
        sequence: ActionSequence::new(vec![ActionStep::new(&[], 0)], RepeatPolicy::Hold).unwrap(),
    }
}

const STARS: usize = 48 * 2;

#[test]
fn alive_player_drawn_last_with_hitbox() {
    let t = textures();
    let s = make_state(Vec::new());
    let draws = record(&s);
    assert_eq!(draws.len(), STARS + 2);
    assert_eq!(draws[STARS], (t.load("player").unwrap(), s.player.entity.rect));
    assert_eq!(draws[STARS + 1], (t.load("hitbox").unwrap(), s.player.hitbox()));
}

#[test]
fn stars_follow_both_background_copies() {
    let t = textures();
    let mut s = make_state(Vec::new());
    s.background.layer.rect.y = 100;
    let draws = record(&s);
    let star = t.load("star").unwrap();
    let (sx, sy) = s.background.stars[0];
    assert_eq!(draws[0], (star, Rect::new(sx, 100 + sy, 2, 2)));
    assert_eq!(draws[48], (star, Rect::new(sx, 100 - 768 + sy, 2, 2)));
}

#[test]
fn dead_player_is_not_drawn() {
    let mut s = make_state(Vec::new());
    s.player.life.state = LifeState::Dead { respawn_at: 500 };
    assert_eq!(record(&s).len(), STARS);
}

#[test]
fn invulnerable_player_blinks_without_hitbox() {
    let mut s = make_state(Vec::new());
    s.player.life.state = LifeState::Invulnerable { until: 1_000 };
    s.now = 50;
    assert_eq!(record(&s).len(), STARS + 1);
    s.now = 150;
    assert_eq!(record(&s).len(), STARS);
}

#[test]
fn untextured_entities_are_skipped() {
    let t = textures();
    let bat = t.load("bat").unwrap();
    let s = make_state(vec![Wave::new(vec![enemy(Some(bat), 100), enemy(None, 300)])]);
    let draws = record(&s);
    assert_eq!(draws.len(), STARS + 3);
    assert_eq!(draws[STARS], (bat, Rect::new(100, 50, 40, 30)));
}

#[test]
fn projectiles_drawn_between_enemies_and_player() {
    let t = textures();
    let red = t.load("red-bullet").unwrap();
    let mut s = make_state(Vec::new());
    s.projectiles
        .enemy
        .push(Entity::new(Some(red), 6.0, Rect::new(10, 10, 12, 12)));
    let draws = record(&s);
    assert_eq!(draws[STARS], (red, Rect::new(10, 10, 12, 12)));
    assert_eq!(draws.len(), STARS + 3);
}

#[test]
fn empty_texture_table_draws_nothing() {
    let s = init_state(
        &GameConfig::default(),
        WaveQueue::new(Vec::new()),
        &TextureTable::new(),
        &mut StdRng::seed_from_u64(7),
    );
    assert!(record(&s).is_empty());
}
