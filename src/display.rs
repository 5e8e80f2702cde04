/// Terminal presentation; all terminal output lives here.
///
/// The world is simulated in pixels; this module scales it onto the
/// terminal's cell grid.  No game logic is performed; this module only
/// translates state into terminal commands.

use std::io::{self, Write};
use std::ops::Range;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use wave_shooter::config::GameConfig;
use wave_shooter::entities::{GameState, GameStatus, Rect};
use wave_shooter::life::LifeState;
use wave_shooter::render::{draw_world, Renderer};
use wave_shooter::textures::{TextureId, TextureTable, Tint};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_DEATHS: Color = Color::Red;
const C_HUD_WAVE: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::White => Color::White,
        Tint::Grey => Color::Grey,
        Tint::DarkGrey => Color::DarkGrey,
        Tint::Red => Color::Red,
        Tint::Green => Color::Green,
        Tint::Yellow => Color::Yellow,
        Tint::Blue => Color::Blue,
        Tint::Magenta => Color::Magenta,
        Tint::Cyan => Color::Cyan,
    }
}

// ── World → cell mapping ──────────────────────────────────────────────────────

/// The play area inside the border, and the world size it shows.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    col0: u16,
    row0: u16,
    cols: u16,
    rows: u16,
    world_w: u32,
    world_h: u32,
}

impl Viewport {
    /// Play area for a `width` x `height` terminal: row 0 is the HUD, rows 1
    /// and height-2 are the border, the last row is the controls hint.
    fn for_terminal(width: u16, height: u16, config: &GameConfig) -> Self {
        Viewport {
            col0: 1,
            row0: 2,
            cols: width.saturating_sub(2),
            rows: height.saturating_sub(4),
            world_w: config.screen_width,
            world_h: config.screen_height,
        }
    }

    /// Cells covered by `rect`, clipped to the play area.
    fn cells(&self, rect: &Rect) -> Option<(Range<u16>, Range<u16>)> {
        let cols = span(rect.left(), rect.right(), self.cols, self.world_w)?;
        let rows = span(rect.top(), rect.bottom(), self.rows, self.world_h)?;
        Some((cols, rows))
    }
}

/// Map the world interval `[lo, hi)` onto `cells` cells spanning `world`
/// pixels.  Anything touching a cell covers it.
fn span(lo: i32, hi: i32, cells: u16, world: u32) -> Option<Range<u16>> {
    let (cells, world) = (cells as i64, world.max(1) as i64);
    let first = (lo as i64 * cells).div_euclid(world).clamp(0, cells);
    let end = (hi as i64 * cells + world - 1).div_euclid(world).clamp(0, cells);
    (first < end).then(|| first as u16..end as u16)
}

struct TerminalRenderer<'a, W: Write> {
    out: &'a mut W,
    textures: &'a TextureTable,
    view: Viewport,
}

impl<W: Write> Renderer for TerminalRenderer<'_, W> {
    fn draw(&mut self, texture: TextureId, rect: &Rect) -> io::Result<()> {
        let Some(glyph) = self.textures.glyph(texture) else {
            return Ok(());
        };
        let Some((cols, rows)) = self.view.cells(rect) else {
            return Ok(());
        };
        let run: String = std::iter::repeat(glyph.symbol).take(cols.len()).collect();
        self.out.queue(style::SetForegroundColor(tint_color(glyph.tint)))?;
        for row in rows {
            self.out
                .queue(cursor::MoveTo(self.view.col0 + cols.start, self.view.row0 + row))?;
            self.out.queue(Print(&run))?;
        }
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    textures: &TextureTable,
    config: &GameConfig,
) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, width)?;

    let mut renderer = TerminalRenderer {
        out: &mut *out,
        textures,
        view: Viewport::for_terminal(width, height, config),
    };
    draw_world(&mut renderer, state, config)?;

    draw_controls_hint(out, height)?;

    if state.paused {
        draw_banner(out, width, height, &[("PAUSED", Color::Cyan), ("ESC - Resume", Color::White)])?;
    } else if state.status == GameStatus::Cleared {
        let score_line = format!("Final Score: {:>6}", state.score);
        let deaths_line = format!("Deaths: {}", state.player.life.deaths);
        draw_banner(
            out,
            width,
            height,
            &[
                ("╔════════════════════╗", Color::Green),
                ("║  ALL WAVES CLEAR   ║", Color::Green),
                ("╚════════════════════╝", Color::Green),
                (score_line.as_str(), Color::Yellow),
                (deaths_line.as_str(), Color::Red),
                ("Q - Quit", Color::White),
            ],
        )?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> io::Result<()> {
    // Score and kills, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}  Kills:{:>3}", state.score, state.kills)))?;

    // Wave, centre
    let retired = state.waves.retired() as usize;
    let wave_str = if state.waves.is_empty() {
        "[ ALL CLEAR ]".to_string()
    } else {
        format!("[ WAVE {}/{} ]", retired + 1, retired + state.waves.len())
    };
    let wx = (width / 2).saturating_sub(wave_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WAVE))?;
    out.queue(Print(&wave_str))?;

    // Life state and deaths, right
    let life_tag = match state.player.life.state {
        LifeState::Alive => "",
        LifeState::Dead { .. } => "[DOWN] ",
        LifeState::Invulnerable { .. } => "[SHIELD] ",
    };
    let right_str = format!("{}Deaths:{:>3}", life_tag, state.player.life.deaths);
    let rx = width.saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_DEATHS))?;
    out.queue(Print(&right_str))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "Arrows/WASD : Move   SHIFT/X : Slow   SPACE/Z : Shoot   ESC : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[(&str, Color)],
) -> io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
