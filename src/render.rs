/// Translates game state into canvas calls.
///
/// A frame is drawn in two passes. The scenery pass (walls, status bar) runs
/// before the simulation so wall collisions can read it back; the actor pass
/// runs afterwards and adds everything that moves or can be picked up.

use crate::config::{LCD_X, STATUS_BAR_HEIGHT};
use crate::entities::{GameState, GameStatus};
use crate::framebuffer::{Canvas, Colour, CHAR_WIDTH};
use crate::pickups::is_super;

const FG: Colour = Colour::Foreground;

// ── Sprites ───────────────────────────────────────────────────────────────────

const JERRY: [u8; 5] = [0b10001, 0b01110, 0b10101, 0b01110, 0b00100];
const JERRY_SUPER: [u8; 5] = [0b11111, 0b11111, 0b10101, 0b11111, 0b01110];
const TOM: [u8; 5] = [0b10001, 0b11111, 0b10101, 0b11111, 0b01110];
const CHEESE: [u8; 5] = [0b00011, 0b01111, 0b11101, 0b10111, 0b11111];
const TRAP: [u8; 5] = [0b10001, 0b01010, 0b00100, 0b01010, 0b10001];
const DOOR: [u8; 5] = [0b11111, 0b10001, 0b10011, 0b10001, 0b11111];
const MILK: [u8; 5] = [0b01110, 0b00100, 0b01110, 0b01110, 0b01110];

/// Clear the frame, draw the walls, then the status bar over the top rows.
pub fn draw_scenery<C: Canvas + ?Sized>(canvas: &mut C, state: &GameState) {
    canvas.clear_screen();

    for wall in &state.walls {
        canvas.draw_line(
            wall.x1.round() as i32,
            wall.y1.round() as i32,
            wall.x2.round() as i32,
            wall.y2.round() as i32,
            FG,
        );
    }

    // Walls passing under the status bar are hidden.
    canvas.fill_rect(0, 0, LCD_X, STATUS_BAR_HEIGHT, Colour::Background);
    draw_gui(canvas, state);
}

fn draw_gui<C: Canvas + ?Sized>(canvas: &mut C, state: &GameState) {
    canvas.draw_string(0, 1, &format!("L{}", state.level.number()), FG);
    canvas.draw_string(12, 1, &format!("H{}", state.mouse.lives), FG);
    canvas.draw_string(28, 1, &format!("S{}", state.mouse.score), FG);

    let clock = format_clock(state.game_time);
    let x = LCD_X - clock.len() as i32 * CHAR_WIDTH;
    canvas.draw_string(x, 1, &clock, FG);

    canvas.draw_line(0, STATUS_BAR_HEIGHT, LCD_X - 1, STATUS_BAR_HEIGHT, FG);
}

/// `MM:SS` of game time.
pub fn format_clock(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", (whole / 60) % 100, whole % 60)
}

/// Pickups, fireworks, the two actors and any banner.
pub fn draw_actors<C: Canvas + ?Sized>(canvas: &mut C, state: &GameState) {
    for (_, p) in state.cheese.iter() {
        let (x, y) = p.pixel();
        canvas.draw_sprite(x, y, &CHEESE, FG);
    }
    for (_, p) in state.traps.iter() {
        let (x, y) = p.pixel();
        canvas.draw_sprite(x, y, &TRAP, FG);
    }
    if let Some(p) = state.door {
        let (x, y) = p.pixel();
        canvas.draw_sprite(x, y, &DOOR, FG);
    }
    if let Some(p) = state.milk {
        let (x, y) = p.pixel();
        canvas.draw_sprite(x, y, &MILK, FG);
    }
    for (_, p) in state.fireworks.iter() {
        let (x, y) = p.pixel();
        canvas.draw_pixel(x, y, FG);
    }

    let (x, y) = state.mouse.pos.pixel();
    let jerry = if is_super(state) { &JERRY_SUPER } else { &JERRY };
    canvas.draw_sprite(x, y, jerry, FG);
    let (x, y) = state.cat.pos.pixel();
    canvas.draw_sprite(x, y, &TOM, FG);

    match state.status {
        GameStatus::Paused => draw_banner(canvas, "PAUSED"),
        GameStatus::GameOver if state.won => draw_banner(canvas, "YOU WIN!"),
        GameStatus::GameOver => draw_banner(canvas, "GAME OVER"),
        GameStatus::Playing => {}
    }
}

fn draw_banner<C: Canvas + ?Sized>(canvas: &mut C, text: &str) {
    let width = text.len() as i32 * CHAR_WIDTH + 3;
    let x = (LCD_X - width) / 2;
    let y = 24;
    canvas.fill_rect(x, y, width, 9, Colour::Background);
    canvas.fill_rect(x, y, width, 1, FG);
    canvas.fill_rect(x, y + 8, width, 1, FG);
    canvas.draw_string(x + 2, y + 2, text, FG);
}
