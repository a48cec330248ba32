/// Rendering adapter.
///
/// The game draws through the [`Canvas`] trait and reads its own drawing back
/// through [`PixelQuery`]; collision against walls depends on that read-back,
/// so walls must be drawn before anything asks about them.
///
/// [`FrameBuffer`] is the 84×48 monochrome implementation. Pixels are packed
/// the way the LCD controller stores them: six 8-row pages, one byte per
/// column per page, bit 0 at the top of the page.

use crate::config::{LCD_X, LCD_Y};

const PAGES: usize = (LCD_Y as usize) / 8;
const BUF_LEN: usize = LCD_X as usize * PAGES;

/// Glyph cell width including one column of spacing.
pub const CHAR_WIDTH: i32 = 4;
pub const CHAR_HEIGHT: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colour {
    Foreground,
    Background,
}

/// Read-only view of what has been drawn into the current frame.
pub trait PixelQuery {
    /// Whether `(x, y)` holds a foreground pixel. Off-screen is background.
    fn is_pixel(&self, x: i32, y: i32) -> bool;
}

/// Drawing primitives the game renders through.
pub trait Canvas: PixelQuery {
    fn clear_screen(&mut self);

    fn draw_pixel(&mut self, x: i32, y: i32, colour: Colour);

    /// Publish the drawn frame to the display.
    fn show_screen(&mut self);

    /// Bresenham line including both endpoints.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, colour: Colour) {
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);

        loop {
            self.draw_pixel(x, y, colour);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Text in the built-in 3×5 font; `(x, y)` is the top-left corner.
    fn draw_string(&mut self, x: i32, y: i32, text: &str, colour: Colour) {
        for (i, c) in text.chars().enumerate() {
            let left = x + i as i32 * CHAR_WIDTH;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) != 0 {
                        self.draw_pixel(left + col, y + row as i32, colour);
                    }
                }
            }
        }
    }

    /// Blit a 5×5 sprite, most significant of the low five bits leftmost.
    fn draw_sprite(&mut self, x: i32, y: i32, rows: &[u8; 5], colour: Colour) {
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..5 {
                if bits & (0b1_0000 >> col) != 0 {
                    self.draw_pixel(x + col, y + row as i32, colour);
                }
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Colour) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.draw_pixel(xx, yy, colour);
            }
        }
    }
}

/// Double-buffered packed monochrome frame.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    back: [u8; BUF_LEN],
    front: [u8; BUF_LEN],
    frames_shown: u64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer {
            back: [0; BUF_LEN],
            front: [0; BUF_LEN],
            frames_shown: 0,
        }
    }
}

impl FrameBuffer {
    pub fn new() -> FrameBuffer {
        FrameBuffer::default()
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        if !(0..LCD_X).contains(&x) || !(0..LCD_Y).contains(&y) {
            return None;
        }
        let index = (y as usize / 8) * LCD_X as usize + x as usize;
        Some((index, 1 << (y % 8)))
    }

    /// Pixel of the last frame passed to `show_screen`.
    pub fn shown_pixel(&self, x: i32, y: i32) -> bool {
        Self::locate(x, y).map_or(false, |(i, bit)| self.front[i] & bit != 0)
    }

    /// Raw page bytes of the shown frame, in controller order.
    pub fn shown_bytes(&self) -> &[u8] {
        &self.front
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    /// Foreground pixels in the frame being drawn.
    pub fn lit_count(&self) -> u32 {
        self.back.iter().map(|b| b.count_ones()).sum()
    }
}

impl PixelQuery for FrameBuffer {
    fn is_pixel(&self, x: i32, y: i32) -> bool {
        Self::locate(x, y).map_or(false, |(i, bit)| self.back[i] & bit != 0)
    }
}

impl Canvas for FrameBuffer {
    fn clear_screen(&mut self) {
        self.back = [0; BUF_LEN];
    }

    fn draw_pixel(&mut self, x: i32, y: i32, colour: Colour) {
        if let Some((i, bit)) = Self::locate(x, y) {
            match colour {
                Colour::Foreground => self.back[i] |= bit,
                Colour::Background => self.back[i] &= !bit,
            }
        }
    }

    fn show_screen(&mut self) {
        self.front = self.back;
        self.frames_shown += 1;
    }
}

// ── Font ──────────────────────────────────────────────────────────────────────

/// 3×5 glyph rows, bit 2 leftmost. Lowercase maps to uppercase.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        _ => [0b110, 0b001, 0b010, 0b000, 0b010],
    }
}
