use tom_and_jerry::compute::init_state;
use tom_and_jerry::config::{LCD_X, LCD_Y, STATUS_BAR_HEIGHT};
use tom_and_jerry::entities::Wall;
use tom_and_jerry::framebuffer::*;
use tom_and_jerry::render::{draw_scenery, format_clock};

use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn line_covers_both_endpoints() {
    let mut fb = FrameBuffer::new();
    fb.draw_line(18, 15, 13, 25, Colour::Foreground);
    assert!(fb.is_pixel(18, 15));
    assert!(fb.is_pixel(13, 25));
    // One pixel per row on a steep line.
    assert_eq!(fb.lit_count(), 11);
}

#[test]
fn off_screen_is_background() {
    let mut fb = FrameBuffer::new();
    fb.draw_pixel(-1, 5, Colour::Foreground);
    fb.draw_pixel(LCD_X, 5, Colour::Foreground);
    fb.draw_pixel(5, LCD_Y, Colour::Foreground);
    assert_eq!(fb.lit_count(), 0);
    assert!(!fb.is_pixel(-1, 5));
    assert!(!fb.is_pixel(LCD_X, 5));
}

#[test]
fn background_erases() {
    let mut fb = FrameBuffer::new();
    fb.fill_rect(10, 10, 5, 5, Colour::Foreground);
    assert_eq!(fb.lit_count(), 25);
    fb.draw_pixel(12, 12, Colour::Background);
    assert!(!fb.is_pixel(12, 12));
    fb.clear_screen();
    assert_eq!(fb.lit_count(), 0);
}

#[test]
fn drawing_is_invisible_until_shown() {
    let mut fb = FrameBuffer::new();
    fb.draw_pixel(40, 20, Colour::Foreground);
    assert!(fb.is_pixel(40, 20));
    assert!(!fb.shown_pixel(40, 20));

    fb.show_screen();
    assert!(fb.shown_pixel(40, 20));
    assert_eq!(fb.frames_shown(), 1);

    fb.clear_screen();
    assert!(fb.shown_pixel(40, 20));
    assert!(!fb.is_pixel(40, 20));
}

#[test]
fn text_advances_one_cell_per_char() {
    let mut fb = FrameBuffer::new();
    fb.draw_string(0, 0, "11", Colour::Foreground);
    // Bottom row of '1' is solid.
    for x in [0, 1, 2, CHAR_WIDTH, CHAR_WIDTH + 1, CHAR_WIDTH + 2] {
        assert!(fb.is_pixel(x, CHAR_HEIGHT - 1), "column {x}");
    }
    assert!(!fb.is_pixel(3, CHAR_HEIGHT - 1));
}

#[test]
fn sprite_bits_map_left_to_right() {
    let mut fb = FrameBuffer::new();
    fb.draw_sprite(20, 20, &[0b10000, 0, 0, 0, 0b00001], Colour::Foreground);
    assert!(fb.is_pixel(20, 20));
    assert!(fb.is_pixel(24, 24));
    assert_eq!(fb.lit_count(), 2);
}

#[test]
fn walls_never_show_in_status_bar() {
    let mut state = init_state(&mut StdRng::seed_from_u64(42));
    state.walls = vec![Wall::new(40.0, 0.0, 40.0, 30.0)];
    let mut fb = FrameBuffer::new();
    draw_scenery(&mut fb, &state);

    assert!(fb.is_pixel(40, 20));
    // Rows above the separator belong to the status text only; column 40
    // falls in the gap between the score and the clock.
    for y in 0..STATUS_BAR_HEIGHT {
        assert!(!fb.is_pixel(40, y), "row {y}");
    }
    assert!(fb.is_pixel(40, STATUS_BAR_HEIGHT));
}

#[test]
fn clock_format() {
    assert_eq!(format_clock(0.0), "00:00");
    assert_eq!(format_clock(59.9), "00:59");
    assert_eq!(format_clock(125.0), "02:05");
}
