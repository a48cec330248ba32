/// Pickups, contacts and power-ups: spawning cheese, traps, the door and
/// milk; what happens when the mouse touches them or the cat; the
/// invincibility timer and the firework ammo economy.

use log::{debug, info, warn};
use rand::Rng;

use crate::collision::{box_collision, find_clear_spot};
use crate::config::{
    AMMO_SCORE, CHEESE_COOLDOWN, DOOR_CHEESE, MAX_AMMO, MILK_COOLDOWN, SUPER_DURATION,
    TRAP_COOLDOWN,
};
use crate::entities::{GameEvent, GameState, Level, Point};
use crate::framebuffer::PixelQuery;
use crate::motion::TAG_TOLERANCE;

/// Edge tolerance for mouse-versus-pickup and spawn-exclusion tests.
pub const PICKUP_TOLERANCE: f64 = 1.0;

// ── Timers ────────────────────────────────────────────────────────────────────

/// Whole seconds of game time since `since`.
pub fn whole_seconds_since(since: f64, game_time: f64) -> u32 {
    (game_time - since).max(0.0).floor() as u32
}

pub fn is_super(state: &GameState) -> bool {
    state
        .super_since
        .map_or(false, |since| state.game_time - since < SUPER_DURATION)
}

/// Drop invincibility once its time is up.
pub fn expire_super(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.super_since.is_some() && !is_super(state) {
        state.super_since = None;
        debug!("invincibility over at {:.1}s", state.game_time);
        events.push(GameEvent::SuperExpired);
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Does anything already placed (cheese, trap, door, milk) overlap a box at `p`?
pub fn pickup_at(state: &GameState, p: Point) -> bool {
    let hit = |other: Point| box_collision(p, other, 0.0, 0.0, PICKUP_TOLERANCE);
    state.cheese.iter().any(|(_, c)| hit(c))
        || state.traps.iter().any(|(_, t)| hit(t))
        || state.door.map_or(false, hit)
        || state.milk.map_or(false, hit)
}

/// Place one cheese on a clear spot every `CHEESE_COOLDOWN` seconds while
/// fewer than the pool capacity are out.
pub fn spawn_cheese<Q, R>(state: &mut GameState, q: &Q, rng: &mut R, events: &mut Vec<GameEvent>)
where
    Q: PixelQuery + ?Sized,
    R: Rng + ?Sized,
{
    if state.cheese.is_full() || whole_seconds_since(state.last_cheese, state.game_time) < CHEESE_COOLDOWN {
        return;
    }
    let Some(spot) = find_clear_spot(q, rng, |p| !pickup_at(state, p)) else {
        warn!("no clear spot for cheese, retrying next frame");
        return;
    };
    state.cheese.insert(spot);
    state.last_cheese = state.game_time;
    debug!("cheese at ({}, {}), {} out", spot.x, spot.y, state.cheese.len());
    events.push(GameEvent::CheeseSpawned);
}

/// The cat drops a trap where it stands every `TRAP_COOLDOWN` seconds, as
/// long as the pool has room and nothing else is lying there.
pub fn spawn_trap(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.traps.is_full() || whole_seconds_since(state.last_trap, state.game_time) < TRAP_COOLDOWN {
        return;
    }
    let spot = state.cat.pos;
    if pickup_at(state, spot) {
        return;
    }
    state.traps.insert(spot);
    state.last_trap = state.game_time;
    debug!("trap at ({:.1}, {:.1})", spot.x, spot.y);
    events.push(GameEvent::TrapDropped);
}

/// Level 2 only: the cat leaves milk behind every `MILK_COOLDOWN` seconds
/// when none is out.
pub fn spawn_milk(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.level != Level::Two
        || state.milk.is_some()
        || whole_seconds_since(state.last_milk, state.game_time) < MILK_COOLDOWN
    {
        return;
    }
    let spot = state.cat.pos;
    if pickup_at(state, spot) {
        return;
    }
    state.milk = Some(spot);
    state.last_milk = state.game_time;
    debug!("milk at ({:.1}, {:.1})", spot.x, spot.y);
    events.push(GameEvent::MilkDropped);
}

/// Open the door once enough cheese has been eaten on this level.
pub fn spawn_door<Q, R>(state: &mut GameState, q: &Q, rng: &mut R, events: &mut Vec<GameEvent>)
where
    Q: PixelQuery + ?Sized,
    R: Rng + ?Sized,
{
    if state.door.is_some() || state.cheese_collected < DOOR_CHEESE {
        return;
    }
    let Some(spot) = find_clear_spot(q, rng, |p| !pickup_at(state, p)) else {
        warn!("no clear spot for the door, retrying next frame");
        return;
    };
    state.door = Some(spot);
    info!("door open at ({}, {})", spot.x, spot.y);
    events.push(GameEvent::DoorAppeared);
}

/// Run every spawner for this frame.
pub fn update_spawns<Q, R>(state: &mut GameState, q: &Q, rng: &mut R, events: &mut Vec<GameEvent>)
where
    Q: PixelQuery + ?Sized,
    R: Rng + ?Sized,
{
    spawn_cheese(state, q, rng, events);
    spawn_trap(state, events);
    spawn_milk(state, events);
    spawn_door(state, q, rng, events);
}

// ── Contacts ──────────────────────────────────────────────────────────────────

/// Did the mouse step onto the door this frame?
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorContact {
    None,
    Entered,
}

/// Resolve the mouse touching cheese, traps, milk and the door.
pub fn collect_pickups(state: &mut GameState, events: &mut Vec<GameEvent>) -> DoorContact {
    let mouse = state.mouse.pos;
    let touches = |p: Point| box_collision(mouse, p, 0.0, 0.0, PICKUP_TOLERANCE);

    let eaten: Vec<usize> = state.cheese.iter().filter(|&(_, c)| touches(c)).map(|(i, _)| i).collect();
    for slot in eaten {
        state.cheese.remove(slot);
        state.mouse.score += 1;
        state.cheese_collected += 1;
        debug!("cheese eaten, score {}", state.mouse.score);
        events.push(GameEvent::CheeseEaten);
    }

    let sprung: Vec<usize> = state.traps.iter().filter(|&(_, t)| touches(t)).map(|(i, _)| i).collect();
    for slot in sprung {
        state.traps.remove(slot);
        if is_super(state) {
            events.push(GameEvent::TrapCrushed);
        } else {
            state.mouse.lives = state.mouse.lives.saturating_sub(1);
            debug!("trap sprung, {} lives left", state.mouse.lives);
            events.push(GameEvent::TrapTriggered);
        }
    }

    if state.milk.map_or(false, touches) {
        state.milk = None;
        state.super_since = Some(state.game_time);
        state.last_milk = state.game_time;
        info!("milk drunk, invincible until {:.1}s", state.game_time + SUPER_DURATION);
        events.push(GameEvent::MilkDrunk);
    }

    if state.door.map_or(false, touches) {
        state.door = None;
        return DoorContact::Entered;
    }
    DoorContact::None
}

/// Are the mouse and the cat touching where they stand?
pub fn cat_touches_mouse(state: &GameState) -> bool {
    box_collision(state.mouse.pos, state.cat.pos, 0.0, 0.0, TAG_TOLERANCE)
}

/// Cat meets mouse. Invincible: the mouse scores and the cat is knocked back.
/// Otherwise the mouse loses a life and both go back to their starts.
pub fn resolve_tag(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if is_super(state) {
        state.mouse.score += 1;
        state.cat.respawn();
        debug!("cat repelled, score {}", state.mouse.score);
        events.push(GameEvent::CatRepelled);
    } else {
        state.mouse.lives = state.mouse.lives.saturating_sub(1);
        state.mouse.respawn();
        state.cat.respawn();
        debug!("caught, {} lives left", state.mouse.lives);
        events.push(GameEvent::Caught);
    }
}

// ── Fireworks ─────────────────────────────────────────────────────────────────

/// Hand out the level 1 firework stock once the score threshold is reached.
pub fn grant_ammo(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.level == Level::One && !state.ammo_granted && state.mouse.score >= AMMO_SCORE {
        state.ammo_granted = true;
        state.mouse.fireworks = MAX_AMMO;
        info!("fireworks unlocked: {} shots", MAX_AMMO);
        events.push(GameEvent::AmmoGranted(MAX_AMMO));
    }
}

/// Launch a firework from the mouse if there is ammo and a free slot.
pub fn fire(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if state.mouse.fireworks == 0 {
        return false;
    }
    if state.fireworks.insert(state.mouse.pos).is_none() {
        return false;
    }
    state.mouse.fireworks -= 1;
    debug!("firework away, {} left", state.mouse.fireworks);
    events.push(GameEvent::FireworkLaunched);
    true
}
