/// Terminal presentation: all terminal I/O lives here.
///
/// The game draws into an 84×48 `FrameBuffer`; this module only copies the
/// shown frame to the terminal, two LCD rows per text row using half-block
/// glyphs, plus a HUD line, a controls hint and the last status report
/// underneath. No game logic is performed here.

use std::io::Write;
use std::sync::mpsc;

use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind},
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use tom_and_jerry::config::{LCD_X, LCD_Y};
use tom_and_jerry::entities::{GameState, GameStatus};
use tom_and_jerry::framebuffer::FrameBuffer;
use tom_and_jerry::pickups::is_super;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_LCD: Color = Color::Green;
const C_HUD: Color = Color::Yellow;
const C_SUPER: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;
const C_STATUS: Color = Color::White;

/// Terminal rows taken by the LCD image.
const LCD_ROWS: u16 = (LCD_Y / 2) as u16;

/// First row of the status report, below the hint.
const STATUS_ROW: u16 = LCD_ROWS + 5;
/// Rows kept for the status report.
const STATUS_LINES: u16 = 12;

// ── Start screen ──────────────────────────────────────────────────────────────

/// Show the title until a key is pressed. Returns `false` if the player quit.
pub fn show_start_screen<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<bool> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let lines: &[(&str, Color)] = &[
        ("Tom And Jerry", Color::Cyan),
        ("-On the Teensy-", Color::White),
        ("", Color::White),
        ("Arrows : move      Space : firework", C_HINT),
        ("X : pause   Z : next level", C_HINT),
        ("[ ] : mouse speed   - = : wall speed", C_HINT),
        ("", Color::White),
        ("Press any key to start, Q to quit", Color::Yellow),
    ];
    for (i, (text, colour)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(2, 2 + i as u16))?;
        out.queue(style::SetForegroundColor(*colour))?;
        out.queue(Print(*text))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind, .. })) if kind != KeyEventKind::Release => {
                let quit = matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc);
                return Ok(!quit);
            }
            Ok(_) => {}
            // Input thread gone: nothing more will ever arrive.
            Err(_) => return Ok(false),
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame, with the most recent status report if any.
pub fn render<W: Write>(
    out: &mut W,
    fb: &FrameBuffer,
    state: &GameState,
    status: Option<&str>,
) -> std::io::Result<()> {
    draw_border(out)?;
    draw_lcd(out, fb)?;
    draw_hud(out, state)?;
    draw_controls_hint(out, state)?;
    draw_status(out, status)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, STATUS_ROW + STATUS_LINES))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W) -> std::io::Result<()> {
    let w = LCD_X as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
    out.queue(cursor::MoveTo(0, LCD_ROWS + 1))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in 1..=LCD_ROWS {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(LCD_X as u16 + 1, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── LCD image ─────────────────────────────────────────────────────────────────

fn draw_lcd<W: Write>(out: &mut W, fb: &FrameBuffer) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_LCD))?;
    for text_row in 0..LCD_ROWS {
        let upper = i32::from(text_row) * 2;
        let line: String = (0..LCD_X)
            .map(|x| match (fb.shown_pixel(x, upper), fb.shown_pixel(x, upper + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            })
            .collect();
        out.queue(cursor::MoveTo(1, text_row + 1))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, LCD_ROWS + 2))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Fireworks: {:>2}  Mouse x{:.2}  Walls x{:.2}",
        state.mouse.fireworks, state.player_speed, state.wall_speed
    )))?;

    if is_super(state) {
        out.queue(style::SetForegroundColor(C_SUPER))?;
        out.queue(Print("  SUPER!"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, LCD_ROWS + 3))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    let hint = match state.status {
        GameStatus::GameOver => "Z / X / R : play again   Q : quit",
        GameStatus::Paused => "X / P : resume   I : status   Q : quit",
        GameStatus::Playing => "Arrows : move   Space : fire   X : pause   Q : quit",
    };
    out.queue(Print(hint))?;
    Ok(())
}

// ── Status report ─────────────────────────────────────────────────────────────

fn draw_status<W: Write>(out: &mut W, status: Option<&str>) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_STATUS))?;
    let mut lines = status.unwrap_or("").lines();
    for row in STATUS_ROW..STATUS_ROW + STATUS_LINES {
        out.queue(cursor::MoveTo(1, row))?;
        out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        if let Some(line) = lines.next() {
            out.queue(Print(line))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tom_and_jerry::compute::{init_state, status_report};

    fn rendered(status: Option<&str>) -> String {
        let state = init_state(&mut StdRng::seed_from_u64(42));
        let mut out = Vec::new();
        render(&mut out, &FrameBuffer::new(), &state, status).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn status_report_reaches_the_terminal() {
        let state = init_state(&mut StdRng::seed_from_u64(42));
        let report = status_report(&state);
        let screen = rendered(Some(&report));
        for line in report.lines() {
            assert!(screen.contains(line), "missing {line:?}");
        }
    }

    #[test]
    fn no_report_leaves_status_rows_blank() {
        let screen = rendered(None);
        assert!(!screen.contains("level:"));
        assert!(screen.contains("Fireworks:"));
    }
}
