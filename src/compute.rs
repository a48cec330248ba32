/// The per-frame game step and the level/run state machine.
///
/// `tick` is the only entry point the main loop needs: it takes the frame's
/// input snapshot, advances the simulation, draws into the canvas and reports
/// what happened. All randomness comes through the injected RNG so tests can
/// seed it.

use log::info;
use rand::Rng;

use crate::clock::PauseLedger;
use crate::config::{ANALOG_CENTRE, ANALOG_MAX, CAT_START, MAX_AMMO, MOUSE_START, START_GRACE};
use crate::debounce::{Switch, SwitchStates};
use crate::entities::{
    Actor, Command, FrameInput, GameEvent, GameState, GameStatus, Level, Point, SlotPool, Wall,
};
use crate::framebuffer::{Canvas, PixelQuery};
use crate::motion::{self, MouseStep};
use crate::pickups::{self, DoorContact};
use crate::render;

// ── Level layouts ─────────────────────────────────────────────────────────────

pub fn level_walls(level: Level) -> Vec<Wall> {
    match level {
        Level::One => vec![
            Wall::new(18.0, 15.0, 13.0, 25.0),
            Wall::new(25.0, 35.0, 25.0, 45.0),
            Wall::new(45.0, 18.0, 60.0, 18.0),
            Wall::new(58.0, 25.0, 72.0, 30.0),
        ],
        Level::Two => vec![
            Wall::new(10.0, 20.0, 10.0, 30.0),
            Wall::new(20.0, 16.0, 35.0, 16.0),
            Wall::new(30.0, 40.0, 45.0, 40.0),
            Wall::new(50.0, 20.0, 60.0, 32.0),
            Wall::new(66.0, 12.0, 66.0, 22.0),
            Wall::new(38.0, 26.0, 44.0, 30.0),
        ],
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// A fresh run on level 1.
pub fn init_state<R: Rng + ?Sized>(rng: &mut R) -> GameState {
    let mouse_start = Point::new(MOUSE_START.0, MOUSE_START.1);
    let cat_start = Point::new(CAT_START.0, CAT_START.1);
    let mut state = GameState {
        level: Level::One,
        status: GameStatus::Playing,
        won: false,
        mouse: Actor::new(mouse_start),
        cat: Actor::new(cat_start),
        walls: Vec::new(),
        cheese: SlotPool::new(),
        traps: SlotPool::new(),
        fireworks: SlotPool::new(),
        door: None,
        milk: None,
        cheese_collected: 0,
        ammo_granted: false,
        super_since: None,
        pause: PauseLedger::new(),
        run_started: 0.0,
        elapsed: 0.0,
        game_time: 0.0,
        last_cheese: 0.0,
        last_trap: 0.0,
        last_milk: 0.0,
        player_speed: 1.0,
        wall_speed: 1.0,
        prev_switches: SwitchStates::default(),
        frame: 0,
    };
    load_level(&mut state, Level::One, rng);
    state
}

/// Set up `level`: positions, walls, pickups and timers start over; lives
/// and score carry on.
pub fn load_level<R: Rng + ?Sized>(state: &mut GameState, level: Level, rng: &mut R) {
    state.level = level;
    state.walls = level_walls(level);

    state.mouse.respawn();
    state.cat.respawn();
    motion::randomise(&mut state.cat, rng);

    state.cheese.clear();
    state.traps.clear();
    state.fireworks.clear();
    state.door = None;
    state.milk = None;
    state.cheese_collected = 0;
    state.super_since = None;
    state.last_cheese = state.game_time;
    state.last_trap = state.game_time;
    state.last_milk = state.game_time;

    if level == Level::Two {
        state.mouse.fireworks = MAX_AMMO;
        state.ammo_granted = true;
    }
}

/// Throw the current run away and start again on level 1. The clock keeps
/// running, so the new run measures its time from `state.elapsed`.
pub fn restart<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let now = state.elapsed;
    let frame = state.frame;
    let prev_switches = state.prev_switches;
    *state = init_state(rng);
    state.run_started = now;
    state.elapsed = now;
    state.frame = frame;
    state.prev_switches = prev_switches;
    info!("new run started at {:.1}s", now);
}

/// Map an analog wheel reading to a 0x..2x speed multiplier.
pub fn analog_multiplier(raw: u16) -> f64 {
    f64::from(raw.min(ANALOG_MAX)) / f64::from(ANALOG_CENTRE)
}

// ── State transitions ─────────────────────────────────────────────────────────

fn game_over(state: &mut GameState, won: bool, events: &mut Vec<GameEvent>) {
    state.status = GameStatus::GameOver;
    state.won = won;
    info!(
        "game over ({}): level {}, score {}",
        if won { "won" } else { "lost" },
        state.level.number(),
        state.mouse.score
    );
    events.push(GameEvent::GameOver { won });
}

/// Go through the door: next level, or the end of the run on the last one.
pub fn advance_level<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    match state.level.next() {
        Some(next) => {
            load_level(state, next, rng);
            info!("entering level {}", next.number());
            events.push(GameEvent::LevelAdvanced(next));
        }
        None => game_over(state, true, events),
    }
}

fn toggle_pause(state: &mut GameState, now: f64, events: &mut Vec<GameEvent>) {
    if state.pause.toggle(now) {
        state.status = GameStatus::Paused;
        info!("paused at {:.1}s", now);
        events.push(GameEvent::Paused);
    } else {
        state.status = GameStatus::Playing;
        info!("resumed, {:.1}s paused in total", state.pause.total());
        events.push(GameEvent::Resumed);
    }
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the game by one frame and draw it.
pub fn tick<C, R>(state: &mut GameState, input: &FrameInput, canvas: &mut C, rng: &mut R) -> Vec<GameEvent>
where
    C: Canvas + ?Sized,
    R: Rng + ?Sized,
{
    let mut events = Vec::new();
    let switches = input.switches;
    let mut prev = state.prev_switches;
    state.frame += 1;
    state.elapsed = input.now;
    state.prev_switches = switches;

    let button_pressed = switches.rose(prev, Switch::LeftButton) || switches.rose(prev, Switch::RightButton);

    if state.status == GameStatus::GameOver {
        if button_pressed || input.command == Some(Command::Restart) {
            restart(state, rng);
            events.push(GameEvent::Restarted);
            // The restarting press must not also pause or skip a level.
            prev = switches;
        } else {
            draw_frame(canvas, state);
            report_status(state, input, &mut events);
            return events;
        }
    }

    // Lives that ran out last frame end the run now.
    if state.mouse.lives == 0 {
        game_over(state, false, &mut events);
        draw_frame(canvas, state);
        return events;
    }

    let pause_requested = switches.rose(prev, Switch::RightButton) || input.command == Some(Command::Pause);
    if pause_requested && input.now - state.run_started > START_GRACE {
        toggle_pause(state, input.now, &mut events);
    }

    state.game_time = (state.pause.game_time(input.now) - state.run_started).max(0.0);
    state.player_speed = analog_multiplier(input.player_wheel);
    state.wall_speed = analog_multiplier(input.wall_wheel);

    let running = state.status == GameStatus::Playing;
    if running {
        motion::update_walls(&mut state.walls, state.wall_speed);
    }
    render::draw_scenery(canvas, state);

    if running {
        simulate(state, input, prev, &*canvas, rng, &mut events);
    }

    render::draw_actors(canvas, state);
    canvas.show_screen();
    report_status(state, input, &mut events);
    events
}

/// Everything that moves, collides or spawns. The canvas holds this frame's
/// scenery and nothing else.
fn simulate<Q, R>(
    state: &mut GameState,
    input: &FrameInput,
    prev: SwitchStates,
    q: &Q,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) where
    Q: PixelQuery + ?Sized,
    R: Rng + ?Sized,
{
    let switches = input.switches;
    pickups::expire_super(state, events);

    if switches.rose(prev, Switch::LeftButton) || input.command == Some(Command::Level) {
        advance_level(state, rng, events);
        return;
    }

    if switches.rose(prev, Switch::Centre) || input.command == Some(Command::Fire) {
        pickups::fire(state, events);
    }

    let direction = motion::mouse_direction(switches, input.command);
    if motion::update_mouse(state, q, direction) == MouseStep::TouchedCat {
        pickups::resolve_tag(state, events);
    }

    motion::update_cat(state, q, rng);
    if pickups::cat_touches_mouse(state) {
        pickups::resolve_tag(state, events);
    }

    motion::update_fireworks(state, q, events);

    if pickups::collect_pickups(state, events) == DoorContact::Entered {
        advance_level(state, rng, events);
        return;
    }

    pickups::grant_ammo(state, events);
    pickups::update_spawns(state, q, rng, events);
}

fn draw_frame<C: Canvas + ?Sized>(canvas: &mut C, state: &GameState) {
    render::draw_scenery(canvas, state);
    render::draw_actors(canvas, state);
    canvas.show_screen();
}

fn report_status(state: &GameState, input: &FrameInput, events: &mut Vec<GameEvent>) {
    if input.command == Some(Command::Status) {
        events.push(GameEvent::Status(status_report(state)));
    }
}

// ── Debug output ──────────────────────────────────────────────────────────────

/// Human-readable multi-line status dump for the debug channel.
pub fn status_report(state: &GameState) -> String {
    format!(
        "time: {} ({:.2}s)\n\
         level: {}\n\
         lives: {}\n\
         score: {}\n\
         fireworks: {} active, {} in stock\n\
         traps: {}\n\
         cheese: {} out, {} eaten\n\
         super: {}\n\
         paused: {}",
        render::format_clock(state.game_time),
        state.game_time,
        state.level.number(),
        state.mouse.lives,
        state.mouse.score,
        state.fireworks.len(),
        state.mouse.fireworks,
        state.traps.len(),
        state.cheese.len(),
        state.cheese_collected,
        if pickups::is_super(state) { "yes" } else { "no" },
        if state.pause.is_paused() { "yes" } else { "no" },
    )
}
