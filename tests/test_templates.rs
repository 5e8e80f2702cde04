use rand::rngs::StdRng;
use rand::SeedableRng;

use wave_shooter::compute::{init_state, tick};
use wave_shooter::config::GameConfig;
use wave_shooter::error::{AssetError, GeometryError, SequenceError};
use wave_shooter::input::InputSnapshot;
use wave_shooter::sequencer::{ActionStep, Command, RepeatPolicy};
use wave_shooter::templates::*;
use wave_shooter::textures::{TextureTable, DEFAULT_MANIFEST};

fn textures() -> TextureTable {
    TextureTable::from_manifest_str(DEFAULT_MANIFEST).unwrap()
}

fn content() -> Content {
    Content::from_toml_str(DEFAULT_CONTENT).unwrap()
}

fn placement(template: &str) -> Placement {
    Placement {
        template: template.to_string(),
        x: 10,
        y: 20,
        repeat: None,
        sequence: None,
    }
}

// ── Built-in content ──────────────────────────────────────────────────────────

#[test]
fn builtin_content_parses() {
    let c = content();
    assert_eq!(c.bullets.len(), 2);
    assert_eq!(c.enemies.len(), 2);
    let sizes: Vec<_> = c.waves.iter().map(|w| w.enemies.len()).collect();
    assert_eq!(sizes, vec![2, 3, 3]);
}

#[test]
fn builtin_content_round_trips() {
    let c = content();
    let text = c.to_toml_string().unwrap();
    assert_eq!(Content::from_toml_str(&text).unwrap(), c);
}

#[test]
fn builtin_waves_build_completely() {
    let q = content().build_waves(&textures());
    assert_eq!(q.len(), 3);
    let first = q.current().unwrap();
    assert_eq!(first.len(), 2);

    let bat = &first.enemies[0];
    assert_eq!((bat.entity.rect.x, bat.entity.rect.y), (200, 20));
    assert_eq!(bat.entity.spawn_origin, (200, 20));
    assert_eq!(bat.entity.score_value, 100);
    assert_eq!(bat.entity.fire.as_ref().map(|f| f.cooldown_ms), Some(400));
    assert_eq!(
        bat.sequence.steps()[0],
        ActionStep::new(&[Command::Down, Command::Left, Command::Fire], 200)
    );
    assert!(bat.entity.texture.is_some());
}

// ── Building enemies ──────────────────────────────────────────────────────────

#[test]
fn enemy_uses_template_script_unless_overridden() {
    let c = content();
    let owl = c.enemy(&placement("owl"), &textures()).unwrap();
    assert_eq!(owl.sequence.steps().len(), 5);
    assert_eq!(owl.sequence.policy(), RepeatPolicy::Loop);
    assert_eq!(owl.entity.hit_points, 4);
    assert_eq!(owl.entity.lifetime_ms, Some(30_000));

    let mut p = placement("owl");
    p.repeat = Some(RepeatPolicy::Hold);
    p.sequence = Some(vec![ActionStep::new(&[Command::Up], 0)]);
    let owl = c.enemy(&p, &textures()).unwrap();
    assert_eq!(owl.sequence.steps().len(), 1);
    assert_eq!(owl.sequence.policy(), RepeatPolicy::Hold);
}

#[test]
fn bullet_prototype_carries_lifetime() {
    let (bullet, cooldown) = content().bullet_prototype("blue-bullet", &textures()).unwrap();
    assert_eq!(cooldown, 250);
    assert_eq!(bullet.lifetime_ms, Some(4_000));
    assert_eq!((bullet.rect.width(), bullet.rect.height()), (10, 20));
}

#[test]
fn unknown_templates_are_reported() {
    let c = content();
    assert_eq!(
        c.enemy(&placement("dragon"), &textures()),
        Err(AssetError::UnknownEnemy("dragon".to_string()))
    );
    assert_eq!(
        c.bullet_prototype("laser", &textures()).err(),
        Some(AssetError::UnknownBullet("laser".to_string()))
    );
}

#[test]
fn bad_template_data_is_reported() {
    let c = Content::from_toml_str(
        r#"
        [enemies.flat]
        texture = "bat"
        velocity = 1.0
        width = 0
        height = 10
        sequence = [{ commands = ["down"], dwell_ms = 0 }]

        [enemies.idle]
        texture = "bat"
        velocity = 1.0
        width = 10
        height = 10
        sequence = []
        "#,
    )
    .unwrap();
    assert_eq!(
        c.enemy(&placement("flat"), &textures()),
        Err(AssetError::BadGeometry {
            name: "flat".to_string(),
            source: GeometryError::Malformed { width: 0, height: 10 },
        })
    );
    assert_eq!(
        c.enemy(&placement("idle"), &textures()),
        Err(AssetError::BadSequence {
            name: "idle".to_string(),
            source: SequenceError::Empty,
        })
    );
}

#[test]
fn missing_texture_leaves_enemy_undrawn_but_alive() {
    let c = content();
    let bat = c.enemy(&placement("bat"), &TextureTable::new()).unwrap();
    assert_eq!(bat.entity.texture, None);
    assert!(bat.entity.can_fire());
}

#[test]
fn firing_script_without_bullet_still_builds() {
    let c = Content::from_toml_str(
        r#"
        [enemies.dud]
        texture = "bat"
        velocity = 1.0
        width = 10
        height = 10
        sequence = [{ commands = ["fire"], dwell_ms = 0 }]
        "#,
    )
    .unwrap();
    let dud = c.enemy(&placement("dud"), &textures()).unwrap();
    assert!(!dud.entity.can_fire());
}

// ── Wave assembly ─────────────────────────────────────────────────────────────

#[test]
fn broken_enemies_are_skipped_and_empty_waves_dropped() {
    let c = Content::from_toml_str(
        r#"
        [enemies.bat]
        texture = "bat"
        velocity = 1.0
        width = 10
        height = 10
        sequence = [{ commands = ["down"], dwell_ms = 0 }]

        [[waves]]
        enemies = [{ template = "ghost", x = 0, y = 0 }]

        [[waves]]
        enemies = [
            { template = "ghost", x = 0, y = 0 },
            { template = "bat", x = 5, y = 5 },
        ]

        [[waves]]
        "#,
    )
    .unwrap();
    let q = c.build_waves(&textures());
    assert_eq!(q.len(), 1);
    assert_eq!(q.current().unwrap().len(), 1);
}

#[test]
fn malformed_content_is_a_parse_error() {
    assert!(Content::from_toml_str("[[waves]]\nenemies = 3").is_err());
}

// ── Oversized geometry ────────────────────────────────────────────────────────

const GIANTS: &str = r#"
[enemies.bat]
texture = "bat"
velocity = 4.0
width = 40
height = 30
sequence = [{ commands = ["down", "right"], dwell_ms = 0 }]

[enemies.wide]
texture = "bat"
velocity = 4.0
width = 2147483647
height = 30
sequence = [{ commands = ["down"], dwell_ms = 0 }]

[enemies.huge]
texture = "bat"
velocity = 4.0
width = 40
height = 3000000000
sequence = [{ commands = ["down"], dwell_ms = 0 }]

[[waves]]
enemies = [
    { template = "wide", x = 200, y = 0 },
    { template = "huge", x = 200, y = 0 },
    { template = "bat", x = 200, y = 0 },
    { template = "bat", x = 2147483600, y = 2147483600 },
]
"#;

#[test]
fn oversized_templates_are_rejected() {
    let c = Content::from_toml_str(GIANTS).unwrap();
    assert_eq!(
        c.enemy(&placement("wide"), &textures()),
        Err(AssetError::BadGeometry {
            name: "wide".to_string(),
            source: GeometryError::Malformed {
                width: 2_147_483_647,
                height: 30
            },
        })
    );
    assert!(matches!(
        c.enemy(&placement("huge"), &textures()),
        Err(AssetError::BadGeometry { .. })
    ));
}

#[test]
fn enemies_at_the_edge_of_the_coordinate_space_never_overflow() {
    let c = Content::from_toml_str(GIANTS).unwrap();
    let waves = c.build_waves(&textures());
    assert_eq!(waves.current().unwrap().len(), 2);

    let config = GameConfig::default();
    let mut state = init_state(&config, waves, &textures(), &mut StdRng::seed_from_u64(1));
    for _ in 0..5 {
        state = tick(&state, &InputSnapshot::default(), &config);
    }
    // The far-away bat is culled; the one on screen keeps flying.
    let wave = state.waves.current().unwrap();
    assert_eq!(wave.len(), 1);
    assert_eq!(wave.enemies[0].entity.rect.x, 220);
}
