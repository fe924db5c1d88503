/// Terminal stand-in for the 20×4 character LCD.
///
/// The engine only issues set-address and write-glyph calls; this module
/// decodes the DDRAM address, keeps an auto-advancing cursor like the real
/// controller, and maps each glyph code from the display's character ROM
/// to a Unicode character and colour.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use nebula_conqueror::grid::{COLS, ROWS};
use nebula_conqueror::hal::{ddram_position, Display};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_ENEMY_HEAVY: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_STAR: Color = Color::DarkGrey;
const C_IMPACT: Color = Color::Yellow;
const C_TEXT: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// Top-left corner of the LCD frame on the terminal.
const ORIGIN: (u16, u16) = (2, 1);

/// Character-ROM lookup for every glyph the engine emits.
fn glyph_char(code: u8) -> (char, Color) {
    match code {
        // Custom characters 0 and 1: the player's ship.
        0x00 => ('≡', C_PLAYER),
        0x01 => ('▶', C_PLAYER),
        0x10 | 0x20 => (' ', C_TEXT),
        0x3D => ('=', C_BULLET_PLAYER),
        0x3C => ('<', C_ENEMY),
        0x28 => ('(', C_ENEMY_HEAVY),
        0x2C | 0x2E => (code as char, C_STAR),
        0x2A => ('*', C_IMPACT),
        0x21..=0x7D => (code as char, C_TEXT),
        0xA1 => ('｡', C_STAR),
        0xA5 => ('･', C_IMPACT),
        0xAA => ('ｪ', C_BULLET_ENEMY),
        0xB4 => ('ｴ', C_ENEMY),
        0xCC => ('ﾌ', C_ENEMY),
        0xD3 => ('ﾓ', C_ENEMY_HEAVY),
        0xDB => ('ﾛ', C_IMPACT),
        0xDE => ('ﾞ', C_STAR),
        0xDF => ('ﾟ', C_STAR),
        0xE0 => ('α', C_ENEMY_HEAVY),
        0xE5 => ('σ', C_ENEMY_HEAVY),
        0xF6 => ('Σ', C_ENEMY),
        0xFF => ('█', C_IMPACT),
        _ => ('?', C_TEXT),
    }
}

/// DDRAM address that follows `ddram` after a write.
fn advance(ddram: u8) -> u8 {
    match ddram {
        0x27 => 0x40,
        0x67 => 0x00,
        other => other + 1,
    }
}

pub struct LcdScreen<W: Write> {
    out: W,
    ddram: u8,
    tone_shown: bool,
}

impl<W: Write> LcdScreen<W> {
    pub fn new(out: W) -> Self {
        LcdScreen {
            out,
            ddram: 0,
            tone_shown: false,
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Clear the terminal and draw the bezel around the LCD.
    pub fn draw_frame(&mut self) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border()?;
        self.draw_controls_hint()?;
        self.out.flush()
    }

    fn draw_border(&mut self) -> io::Result<()> {
        let (x, y) = (ORIGIN.0 - 1, ORIGIN.1 - 1);
        let w = COLS;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(x, y))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
        self.out.queue(cursor::MoveTo(x, y + ROWS as u16 + 1))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w))))?;
        for row in 1..=ROWS as u16 {
            self.out.queue(cursor::MoveTo(x, y + row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(x + w as u16 + 1, y + row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    fn draw_controls_hint(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(0, ORIGIN.1 + ROWS as u16 + 2))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print("←↑↓→ / WASD / 8 5 0 9 : Move   SPACE / # : Fire   Q : Quit"))?;
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    /// Show a note symbol beside the LCD while the laser tone is sounding.
    pub fn show_tone(&mut self, sounding: bool) -> io::Result<()> {
        if sounding == self.tone_shown {
            return Ok(());
        }
        self.tone_shown = sounding;
        self.out.queue(cursor::MoveTo(ORIGIN.0 + COLS as u16 + 2, ORIGIN.1))?;
        self.out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
        self.out.queue(Print(if sounding { '♪' } else { ' ' }))?;
        self.out.queue(style::ResetColor)?;
        Ok(())
    }
}

impl<W: Write> Display for LcdScreen<W> {
    fn move_cursor(&mut self, address: u8) -> io::Result<()> {
        self.ddram = address & 0x7F;
        Ok(())
    }

    fn write_glyph(&mut self, code: u8) -> io::Result<()> {
        if let Some((row, col)) = ddram_position(self.ddram) {
            let (ch, color) = glyph_char(code);
            self.out
                .queue(cursor::MoveTo(ORIGIN.0 + col as u16, ORIGIN.1 + row as u16))?;
            self.out.queue(style::SetForegroundColor(color))?;
            self.out.queue(Print(ch))?;
        }
        self.ddram = advance(self.ddram);
        Ok(())
    }
}
