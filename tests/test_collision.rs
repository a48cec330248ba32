use rand::rngs::StdRng;
use rand::SeedableRng;

use tom_and_jerry::collision::*;
use tom_and_jerry::config::{LCD_X, LCD_Y, OBJ_SIZE, PLAY_TOP};
use tom_and_jerry::entities::Point;
use tom_and_jerry::framebuffer::{Canvas, Colour, FrameBuffer, PixelQuery};

fn vertical_wall_at(x: i32) -> FrameBuffer {
    let mut fb = FrameBuffer::new();
    fb.draw_line(x, PLAY_TOP, x, LCD_Y - 1, Colour::Foreground);
    fb
}

// ── Box collision ─────────────────────────────────────────────────────────────

#[test]
fn box_collision_is_symmetric() {
    let positions = [0.0, 2.5, 4.0, 4.9, 5.0, 7.25, 11.0];
    for offset in [0.0, 1.0] {
        for &ax in &positions {
            for &ay in &positions {
                for &bx in &positions {
                    for &by in &positions {
                        let a = Point::new(ax, ay);
                        let b = Point::new(bx, by);
                        assert_eq!(
                            box_collision(a, b, 0.0, 0.0, offset),
                            box_collision(b, a, 0.0, 0.0, offset),
                            "{a:?} {b:?} offset {offset}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn edge_adjacent_boxes_do_not_collide() {
    let a = Point::new(10.0, 20.0);
    assert!(!box_collision(a, Point::new(15.0, 20.0), 0.0, 0.0, 0.0));
    assert!(!box_collision(a, Point::new(10.0, 25.0), 0.0, 0.0, 0.0));
    assert!(box_collision(a, Point::new(14.0, 24.0), 0.0, 0.0, 0.0));
}

#[test]
fn offset_ignores_one_pixel_overlap() {
    let a = Point::new(10.0, 20.0);
    let b = Point::new(14.0, 20.0);
    assert!(box_collision(a, b, 0.0, 0.0, 0.0));
    assert!(!box_collision(a, b, 0.0, 0.0, 1.0));
    assert!(box_collision(a, b, 1.0, 0.0, 1.0));
}

#[test]
fn proposed_step_is_applied_to_first_box() {
    let a = Point::new(10.0, 20.0);
    let b = Point::new(16.0, 20.0);
    assert!(!box_collision(a, b, 0.0, 0.0, 0.0));
    assert!(box_collision(a, b, 2.0, 0.0, 0.0));
    assert!(!box_collision(a, b, -2.0, 0.0, 0.0));
}

#[test]
fn point_in_box_is_half_open() {
    let corner = Point::new(30.0, 30.0);
    assert!(point_in_box(Point::new(30.0, 30.0), corner));
    assert!(point_in_box(Point::new(34.9, 34.9), corner));
    assert!(!point_in_box(Point::new(35.0, 32.0), corner));
    assert!(!point_in_box(Point::new(29.9, 32.0), corner));
}

// ── Bitmap collision ──────────────────────────────────────────────────────────

#[test]
fn leading_column_is_tested() {
    let fb = vertical_wall_at(10);
    assert!(wall_collision(&fb, (5, 20), 1, 0));
    assert!(!wall_collision(&fb, (4, 20), 1, 0));
    assert!(wall_collision(&fb, (11, 20), -1, 0));
    assert!(!wall_collision(&fb, (12, 20), -1, 0));
}

#[test]
fn leading_row_is_tested() {
    let mut fb = FrameBuffer::new();
    fb.draw_line(0, 30, LCD_X - 1, 30, Colour::Foreground);
    assert!(wall_collision(&fb, (20, 25), 0, 1));
    assert!(!wall_collision(&fb, (20, 24), 0, 1));
    assert!(wall_collision(&fb, (20, 31), 0, -1));
}

#[test]
fn step_size_is_clamped_to_one_pixel() {
    let fb = vertical_wall_at(10);
    assert_eq!(wall_collision(&fb, (5, 20), 7, 0), wall_collision(&fb, (5, 20), 1, 0));
    assert!(!wall_collision(&fb, (3, 20), 7, 0));
}

#[test]
fn diagonal_step_catches_corner_pixel() {
    let mut fb = FrameBuffer::new();
    fb.draw_pixel(25, 35, Colour::Foreground);
    // Box (20, 30) covers 20..25 × 30..35; moving down-right reaches (25, 35).
    assert!(wall_collision(&fb, (20, 30), 1, 1));
    assert!(!wall_collision(&fb, (20, 30), 1, 0));
    assert!(!wall_collision(&fb, (20, 30), 0, 1));
}

#[test]
fn path_is_checked_pixel_by_pixel() {
    let fb = vertical_wall_at(10);
    assert!(path_blocked(&fb, Point::new(3.0, 20.0), Point::new(7.0, 20.0)));
    assert!(!path_blocked(&fb, Point::new(3.0, 20.0), Point::new(4.9, 20.0)));
    assert!(!path_blocked(&fb, Point::new(4.2, 20.0), Point::new(4.9, 20.0)));
}

// ── Bounds ────────────────────────────────────────────────────────────────────

#[test]
fn bounds_exclude_status_bar() {
    assert!(in_bounds(Point::new(0.0, f64::from(PLAY_TOP))));
    assert!(!in_bounds(Point::new(0.0, f64::from(PLAY_TOP) - 0.5)));
    assert!(in_bounds(Point::new(f64::from(LCD_X - OBJ_SIZE), f64::from(LCD_Y - OBJ_SIZE))));
    assert!(!in_bounds(Point::new(f64::from(LCD_X - OBJ_SIZE) + 0.1, 20.0)));
    assert!(!in_bounds(Point::new(-0.1, 20.0)));
}

#[test]
fn playfield_points() {
    assert!(point_in_playfield(Point::new(83.5, 47.5)));
    assert!(!point_in_playfield(Point::new(84.0, 20.0)));
    assert!(!point_in_playfield(Point::new(10.0, 8.9)));
}

// ── Clear-spot search ─────────────────────────────────────────────────────────

#[test]
fn footprint_detects_any_pixel() {
    let mut fb = FrameBuffer::new();
    assert!(footprint_clear(&fb, 20, 20));
    fb.draw_pixel(24, 24, Colour::Foreground);
    assert!(!footprint_clear(&fb, 20, 20));
    assert!(footprint_clear(&fb, 25, 20));
}

#[test]
fn clear_spot_avoids_walls() {
    let mut fb = FrameBuffer::new();
    for x in (0..LCD_X).step_by(8) {
        fb.draw_line(x, PLAY_TOP, x, LCD_Y - 1, Colour::Foreground);
    }
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        if let Some(spot) = find_clear_spot(&fb, &mut rng, |_| true) {
            let (x, y) = spot.pixel();
            assert!(footprint_clear(&fb, x, y));
            assert!(in_bounds(spot));
        }
    }
}

#[test]
fn saturated_playfield_gives_up() {
    let mut fb = FrameBuffer::new();
    fb.fill_rect(0, 0, LCD_X, LCD_Y, Colour::Foreground);
    assert!(fb.is_pixel(40, 40));
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(find_clear_spot(&fb, &mut rng, |_| true), None);
}

#[test]
fn clear_spot_respects_extra_filter() {
    let fb = FrameBuffer::new();
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(find_clear_spot(&fb, &mut rng, |_| false), None);
    let spot = find_clear_spot(&fb, &mut rng, |p| p.x >= 40.0);
    assert!(spot.map_or(false, |p| p.x >= 40.0));
}
