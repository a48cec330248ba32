/// Per-frame movement for the mouse, the cat, fireworks and walls.
///
/// Every mover asks the collision engine first and only then commits. Wall
/// tests read the frame buffer, so callers must draw the walls before any of
/// these run.

use std::f64::consts::TAU;

use log::trace;
use rand::Rng;

use crate::collision::{box_collision, in_bounds, path_blocked, point_in_box, point_in_playfield};
use crate::config::{LCD_X, LCD_Y, MIN_SPEED, PLAY_TOP, WALL_SPEED};
use crate::debounce::SwitchStates;
use crate::entities::{Actor, Command, Direction, GameEvent, GameState, Point, Wall};
use crate::framebuffer::PixelQuery;

/// Contact tolerance between the mouse and the cat.
pub const TAG_TOLERANCE: f64 = 0.0;

// ── Mouse ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseStep {
    Idle,
    Moved,
    Blocked,
    /// The step would have run into the cat.
    TouchedCat,
}

/// Direction requested this frame: held switches first, in priority order,
/// then a one-shot move command.
pub fn mouse_direction(switches: SwitchStates, command: Option<Command>) -> Option<Direction> {
    Direction::PRIORITY
        .into_iter()
        .find(|d| switches.is_pressed(d.switch()))
        .or(match command {
            Some(Command::Move(d)) => Some(d),
            _ => None,
        })
}

/// Step the mouse by `player_speed` in `direction` if the destination stays
/// in the playfield, misses the cat and crosses no wall.
pub fn update_mouse<Q: PixelQuery + ?Sized>(
    state: &mut GameState,
    q: &Q,
    direction: Option<Direction>,
) -> MouseStep {
    let Some(direction) = direction else {
        return MouseStep::Idle;
    };
    let (ux, uy) = direction.unit();
    let (dx, dy) = (ux * state.player_speed, uy * state.player_speed);
    let from = state.mouse.pos;
    let to = from.offset(dx, dy);

    if !in_bounds(to) {
        return MouseStep::Blocked;
    }
    if box_collision(from, state.cat.pos, dx, dy, TAG_TOLERANCE) {
        return MouseStep::TouchedCat;
    }
    if path_blocked(q, from, to) {
        return MouseStep::Blocked;
    }
    state.mouse.pos = to;
    MouseStep::Moved
}

// ── Cat ───────────────────────────────────────────────────────────────────────

/// Pick a fresh heading in `[0, 2π)` and a base speed in
/// `[MIN_SPEED, 2 * MIN_SPEED]`. The wall wheel scales it each frame in
/// [`update_cat`].
pub fn randomise<R: Rng + ?Sized>(cat: &mut Actor, rng: &mut R) {
    cat.speed = rng.gen_range(MIN_SPEED..=MIN_SPEED + MIN_SPEED);
    cat.direction = rng.gen_range(0.0..TAU);
}

/// Wander one frame at the base speed times the wall wheel. If the step
/// would leave the playfield or touch a wall, either as a whole or along a
/// single axis, the cat stays put and picks a new speed and heading instead.
/// Returns whether it re-randomised.
pub fn update_cat<Q, R>(state: &mut GameState, q: &Q, rng: &mut R) -> bool
where
    Q: PixelQuery + ?Sized,
    R: Rng + ?Sized,
{
    let step = state.cat.speed * state.wall_speed;
    let cat = &mut state.cat;
    let dx = step * cat.direction.cos();
    let dy = step * cat.direction.sin();
    let from = cat.pos;
    let along_x = from.offset(dx, 0.0);
    let along_y = from.offset(0.0, dy);
    let whole = from.offset(dx, dy);

    let blocked = !in_bounds(whole)
        || !in_bounds(along_x)
        || !in_bounds(along_y)
        || path_blocked(q, from, whole)
        || path_blocked(q, from, along_x)
        || path_blocked(q, from, along_y);

    if blocked {
        randomise(cat, rng);
        trace!("cat turned: speed {:.2}, heading {:.2}", cat.speed, cat.direction);
        return true;
    }

    // Each axis is committed on its own.
    cat.pos.x += dx;
    cat.pos.y += dy;
    false
}

// ── Fireworks ─────────────────────────────────────────────────────────────────

/// Fly every active firework one unit toward the cat.
///
/// A firework that reaches the cat knocks it back to its start; one that
/// would leave the playfield or meet a wall fizzles. Either way the slot is
/// freed and the shot goes back into the mouse's inventory.
pub fn update_fireworks<Q: PixelQuery + ?Sized>(
    state: &mut GameState,
    q: &Q,
    events: &mut Vec<GameEvent>,
) {
    let active: Vec<(usize, Point)> = state.fireworks.iter().collect();

    for (slot, pos) in active {
        let target = state.cat.pos;
        match step_firework(pos, target, q) {
            Flight::Flying(next) => state.fireworks.set(slot, next),
            Flight::Hit => {
                state.fireworks.remove(slot);
                state.mouse.fireworks += 1;
                state.cat.respawn();
                events.push(GameEvent::FireworkHit);
            }
            Flight::Fizzled => {
                state.fireworks.remove(slot);
                state.mouse.fireworks += 1;
                events.push(GameEvent::FireworkFizzled);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Flight {
    Flying(Point),
    Hit,
    Fizzled,
}

fn step_firework<Q: PixelQuery + ?Sized>(pos: Point, target: Point, q: &Q) -> Flight {
    if point_in_box(pos, target) {
        return Flight::Hit;
    }
    let (dx, dy) = (target.x - pos.x, target.y - pos.y);
    let distance = dx.hypot(dy);
    if distance < f64::EPSILON {
        return Flight::Hit;
    }

    let next = pos.offset(dx / distance, dy / distance);
    if !point_in_playfield(next) {
        return Flight::Fizzled;
    }

    let (cx, cy) = pos.pixel();
    let (nx, ny) = next.pixel();
    // A diagonal step can squeeze between the pixels of a diagonal line, so
    // a lit pixel on both adjacent corners counts as a wall too.
    if q.is_pixel(nx, ny) || (q.is_pixel(nx, cy) && q.is_pixel(cx, ny)) {
        return Flight::Fizzled;
    }

    if point_in_box(next, target) {
        Flight::Hit
    } else {
        Flight::Flying(next)
    }
}

// ── Walls ─────────────────────────────────────────────────────────────────────

/// Slide every wall along its own axis and wrap the ones that have left the
/// playfield.
pub fn update_walls(walls: &mut [Wall], multiplier: f64) {
    let step = WALL_SPEED * multiplier;
    for wall in walls.iter_mut() {
        let (vx, vy) = (wall.x2 - wall.x1, wall.y2 - wall.y1);
        let length = vx.hypot(vy);
        if length < f64::EPSILON {
            continue;
        }
        wall.translate(vx / length * step, vy / length * step);
        wrap_wall(wall);
    }
}

/// Once both endpoints are past one edge, move the wall so it comes back in
/// from the opposite edge. The wall is translated, so its length and
/// orientation never change.
pub fn wrap_wall(wall: &mut Wall) {
    let (min_x, max_x) = (wall.x1.min(wall.x2), wall.x1.max(wall.x2));
    let (min_y, max_y) = (wall.y1.min(wall.y2), wall.y1.max(wall.y2));
    let span_x = max_x - min_x;
    let span_y = max_y - min_y;
    let width = f64::from(LCD_X);
    let top = f64::from(PLAY_TOP);
    let height = f64::from(LCD_Y) - top;

    if max_x < 0.0 {
        wall.translate(width + span_x, 0.0);
    } else if min_x >= width {
        wall.translate(-(width + span_x), 0.0);
    }

    if max_y < top {
        wall.translate(0.0, height + span_y);
    } else if min_y >= f64::from(LCD_Y) {
        wall.translate(0.0, -(height + span_y));
    }
}
