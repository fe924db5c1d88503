/// Terminal stand-in for the matrix keypad.
///
/// Terminal key events arrive over a channel. Each pad key remembers when
/// it was last pressed (or repeated); a key reads as closed while that is
/// within `HOLD_WINDOW`, which lets a held key behave like a held button
/// on terminals that never report releases.

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use nebula_conqueror::hal::{key_at, Keypad, PadKey, ScanLine, SenseLine};

/// Must stay shorter than the engine's debounce window so one tap is one
/// press, and longer than the keyboard's auto-repeat interval so a held
/// key stays closed.
const HOLD_WINDOW: Duration = Duration::from_millis(40);

fn pad_key(code: KeyCode) -> Option<PadKey> {
    match code {
        KeyCode::Char(' ') | KeyCode::Char('#') | KeyCode::Enter => Some(PadKey::Hash),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('9') => {
            Some(PadKey::Nine)
        }
        KeyCode::Char('6') => Some(PadKey::Six),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('0') => {
            Some(PadKey::Zero)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('8') => {
            Some(PadKey::Eight)
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('5') => {
            Some(PadKey::Five)
        }
        _ => None,
    }
}

pub struct HeldKeys {
    last_seen: HashMap<PadKey, Instant>,
    strobe: ScanLine,
}

impl HeldKeys {
    pub fn new() -> Self {
        HeldKeys {
            last_seen: HashMap::new(),
            strobe: ScanLine::First,
        }
    }

    /// Drain pending terminal events. Returns `true` when the user asked
    /// to quit.
    pub fn pump(&mut self, rx: &mpsc::Receiver<Event>) -> bool {
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                continue;
            };
            match (kind, code) {
                (KeyEventKind::Press, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) => {
                    return true;
                }
                (KeyEventKind::Press, KeyCode::Char('c'))
                    if modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    return true;
                }
                (KeyEventKind::Press | KeyEventKind::Repeat, code) => {
                    if let Some(key) = pad_key(code) {
                        self.last_seen.insert(key, Instant::now());
                    }
                }
                (KeyEventKind::Release, code) => {
                    if let Some(key) = pad_key(code) {
                        self.last_seen.remove(&key);
                    }
                }
            }
        }
        false
    }

    fn is_held(&self, key: PadKey) -> bool {
        self.last_seen
            .get(&key)
            .map(|seen| seen.elapsed() <= HOLD_WINDOW)
            .unwrap_or(false)
    }
}

impl Keypad for HeldKeys {
    fn set_strobe(&mut self, high: ScanLine, _low: ScanLine) {
        self.strobe = high;
    }

    fn read_bit(&mut self, line: SenseLine) -> bool {
        self.is_held(key_at(self.strobe, line))
    }
}
