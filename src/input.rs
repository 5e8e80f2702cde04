/// Keyboard input: crossterm key events in, a per-frame [`InputSnapshot`]
/// and discrete [`InputEvent`]s out.
///
/// Each key remembers the frame it was last pressed or repeated, and counts
/// as held for `HOLD_WINDOW` frames after that.  Terminals with keyboard
/// enhancement also send releases, which drop the key straight away; on
/// other terminals OS key-repeat keeps refreshing a held key.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key counts as held if it was last seen within this many frames.
pub const HOLD_WINDOW: u64 = 4;

/// Keys held during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Precise movement at reduced speed.
    pub slow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    TogglePause,
}

/// Marker stored for "a Shift-modified key was seen".
const SHIFT: KeyCode = KeyCode::Null;

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame; call before feeding that frame's events.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Record one key event.  Returns a discrete event for keys that trigger
    /// one on press.
    pub fn handle(&mut self, key: &KeyEvent) -> Option<InputEvent> {
        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Press => {
                self.touch(code, key.modifiers);
                match code {
                    KeyCode::Char('q') | KeyCode::Enter => Some(InputEvent::Quit),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(InputEvent::Quit)
                    }
                    KeyCode::Esc => Some(InputEvent::TogglePause),
                    _ => None,
                }
            }
            KeyEventKind::Repeat => {
                self.touch(code, key.modifiers);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
                if !key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.key_frame.remove(&SHIFT);
                }
                None
            }
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        let held = |codes: &[KeyCode]| codes.iter().any(|c| self.is_held(c));
        InputSnapshot {
            left: held(&[KeyCode::Left, KeyCode::Char('a')]),
            right: held(&[KeyCode::Right, KeyCode::Char('d')]),
            up: held(&[KeyCode::Up, KeyCode::Char('w')]),
            down: held(&[KeyCode::Down, KeyCode::Char('s')]),
            fire: held(&[KeyCode::Char(' '), KeyCode::Char('z')]),
            slow: held(&[SHIFT, KeyCode::Char('x')]),
        }
    }

    fn touch(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.key_frame.insert(code, self.frame);
        if modifiers.contains(KeyModifiers::SHIFT) {
            self.key_frame.insert(SHIFT, self.frame);
        }
    }

    fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }
}

/// Fold letter case so Shift+A still moves left.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn held_key_expires_after_hold_window() {
        let mut t = KeyTracker::new();
        t.begin_frame();
        t.handle(&press(KeyCode::Left));
        assert!(t.snapshot().left);
        for _ in 0..HOLD_WINDOW {
            t.begin_frame();
        }
        assert!(t.snapshot().left);
        t.begin_frame();
        assert!(!t.snapshot().left);
    }

    #[test]
    fn release_drops_key_immediately() {
        let mut t = KeyTracker::new();
        t.begin_frame();
        t.handle(&press(KeyCode::Char(' ')));
        t.handle(&KeyEvent::new_with_kind(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert!(!t.snapshot().fire);
    }

    #[test]
    fn fire_and_move_combine() {
        let mut t = KeyTracker::new();
        t.begin_frame();
        t.handle(&press(KeyCode::Char('z')));
        t.handle(&press(KeyCode::Char('D')));
        let s = t.snapshot();
        assert!(s.fire && s.right && !s.left);
    }

    #[test]
    fn shift_marks_slow() {
        let mut t = KeyTracker::new();
        t.begin_frame();
        t.handle(&KeyEvent::new_with_kind(
            KeyCode::Up,
            KeyModifiers::SHIFT,
            KeyEventKind::Press,
        ));
        let s = t.snapshot();
        assert!(s.up && s.slow);
    }

    #[test]
    fn discrete_events() {
        let mut t = KeyTracker::new();
        t.begin_frame();
        assert_eq!(t.handle(&press(KeyCode::Esc)), Some(InputEvent::TogglePause));
        assert_eq!(t.handle(&press(KeyCode::Enter)), Some(InputEvent::Quit));
        assert_eq!(t.handle(&press(KeyCode::Char('Q'))), Some(InputEvent::Quit));
        assert_eq!(
            t.handle(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Quit)
        );
        assert_eq!(t.handle(&press(KeyCode::Left)), None);
    }
}
