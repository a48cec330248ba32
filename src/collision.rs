/// Collision tests.
///
/// Walls are arbitrary line segments, so anything moving against them is
/// tested pixel by pixel against the frame drawn so far. Sprites are uniform
/// OBJ_SIZE squares and use a plain box overlap instead.

use rand::Rng;

use crate::config::{LCD_X, LCD_Y, MAX_SPAWN_ATTEMPTS, OBJ_SIZE, PLAY_TOP};
use crate::entities::Point;
use crate::framebuffer::PixelQuery;

const SIZE: f64 = OBJ_SIZE as f64;

/// Would the box at `pos`, moved one pixel by `(dx, dy)`, cover a lit pixel?
///
/// `dx` and `dy` are clamped to `-1..=1`. Only the leading row and column
/// are sampled; the box itself is assumed clear.
pub fn wall_collision<Q: PixelQuery + ?Sized>(q: &Q, pos: (i32, i32), dx: i32, dy: i32) -> bool {
    let (x, y) = pos;
    let (dx, dy) = (dx.signum(), dy.signum());

    if dx != 0 {
        let col = if dx > 0 { x + OBJ_SIZE } else { x - 1 };
        if (y + dy..y + dy + OBJ_SIZE).any(|row| q.is_pixel(col, row)) {
            return true;
        }
    }
    if dy != 0 {
        let row = if dy > 0 { y + OBJ_SIZE } else { y - 1 };
        if (x + dx..x + dx + OBJ_SIZE).any(|col| q.is_pixel(col, row)) {
            return true;
        }
    }
    false
}

/// Walk the box from `from` to `to` one pixel at a time and report whether
/// any unit step hits a wall. Moves that stay inside the same pixel are free.
pub fn path_blocked<Q: PixelQuery + ?Sized>(q: &Q, from: Point, to: Point) -> bool {
    let (mut x, mut y) = from.pixel();
    let (tx, ty) = to.pixel();

    while (x, y) != (tx, ty) {
        let dx = (tx - x).signum();
        let dy = (ty - y).signum();
        if wall_collision(q, (x, y), dx, dy) {
            return true;
        }
        x += dx;
        y += dy;
    }
    false
}

/// Do two OBJ_SIZE boxes overlap once `a` is moved by `(dx, dy)`?
///
/// `offset` shrinks the overlap region so boxes that only graze each other
/// are not counted. With no movement the test is symmetric in `a` and `b`.
pub fn box_collision(a: Point, b: Point, dx: f64, dy: f64, offset: f64) -> bool {
    let ax = a.x + dx;
    let ay = a.y + dy;
    let reach = SIZE - offset;
    ax < b.x + reach && b.x < ax + reach && ay < b.y + reach && b.y < ay + reach
}

/// Is `p` inside the box whose top-left corner is `corner`?
pub fn point_in_box(p: Point, corner: Point) -> bool {
    p.x >= corner.x && p.x < corner.x + SIZE && p.y >= corner.y && p.y < corner.y + SIZE
}

/// Does a box at `p` fit inside the playfield?
pub fn in_bounds(p: Point) -> bool {
    p.x >= 0.0
        && p.x <= f64::from(LCD_X - OBJ_SIZE)
        && p.y >= f64::from(PLAY_TOP)
        && p.y <= f64::from(LCD_Y - OBJ_SIZE)
}

/// Is the point inside the playfield?
pub fn point_in_playfield(p: Point) -> bool {
    p.x >= 0.0 && p.x < f64::from(LCD_X) && p.y >= f64::from(PLAY_TOP) && p.y < f64::from(LCD_Y)
}

/// No lit pixel anywhere under a box at `(x, y)`.
pub fn footprint_clear<Q: PixelQuery + ?Sized>(q: &Q, x: i32, y: i32) -> bool {
    (y..y + OBJ_SIZE).all(|row| (x..x + OBJ_SIZE).all(|col| !q.is_pixel(col, row)))
}

/// Rejection-sample a playfield spot whose footprint is clear of drawn
/// pixels and which `accept` agrees to. Gives up after
/// `MAX_SPAWN_ATTEMPTS` candidates.
pub fn find_clear_spot<Q, R, F>(q: &Q, rng: &mut R, accept: F) -> Option<Point>
where
    Q: PixelQuery + ?Sized,
    R: Rng + ?Sized,
    F: Fn(Point) -> bool,
{
    (0..MAX_SPAWN_ATTEMPTS).find_map(|_| {
        let x = rng.gen_range(0..=LCD_X - OBJ_SIZE);
        let y = rng.gen_range(PLAY_TOP..=LCD_Y - OBJ_SIZE);
        let candidate = Point::new(f64::from(x), f64::from(y));
        (footprint_clear(q, x, y) && accept(candidate)).then_some(candidate)
    })
}
