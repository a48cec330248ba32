/// All game entity types. Mostly plain data; the only logic here keeps the
/// fixed-capacity pools consistent.

use crate::clock::PauseLedger;
use crate::config::{MAX_CHEESE, MAX_FIREWORKS, MAX_TRAPS, START_LIVES};
use crate::debounce::{Switch, SwitchStates};
use crate::error::GameError;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A position on the LCD. Fractional so sub-pixel speeds accumulate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// The pixel this point falls in.
    pub fn pixel(self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// A wall segment. Walls are only ever translated, never reshaped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Wall {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
        Wall { x1, y1, x2, y2 }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x1 += dx;
        self.x2 += dx;
        self.y1 += dy;
        self.y2 += dy;
    }
}

// ── Actors ────────────────────────────────────────────────────────────────────

/// The mouse (Jerry) or the cat (Tom).
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub pos: Point,
    /// Respawn position for the current level.
    pub start: Point,
    pub lives: u32,
    pub score: u32,
    /// Base pixels per frame before the wall wheel is applied. Only the cat
    /// uses this; the mouse follows its own wheel.
    pub speed: f64,
    /// Heading in radians.
    pub direction: f64,
    /// Firework ammo held in inventory.
    pub fireworks: u32,
}

impl Actor {
    pub fn new(start: Point) -> Actor {
        Actor {
            pos: start,
            start,
            lives: START_LIVES,
            score: 0,
            speed: 0.0,
            direction: 0.0,
            fireworks: 0,
        }
    }

    pub fn respawn(&mut self) {
        self.pos = self.start;
    }
}

// ── Fixed-capacity pools ──────────────────────────────────────────────────────

/// A fixed number of position slots, each either empty or occupied.
///
/// Allocation is first-fit from slot 0. The occupied count is kept alongside
/// the slots and always equals the number of `Some` entries.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotPool<const N: usize> {
    slots: [Option<Point>; N],
    count: usize,
}

impl<const N: usize> Default for SlotPool<N> {
    fn default() -> Self {
        SlotPool {
            slots: [None; N],
            count: 0,
        }
    }
}

impl<const N: usize> SlotPool<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `p` in the lowest free slot. Returns the slot index, or `None`
    /// when the pool is full.
    pub fn insert(&mut self, p: Point) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(p);
        self.count += 1;
        Some(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Point> {
        let taken = self.slots.get_mut(index)?.take();
        if taken.is_some() {
            self.count -= 1;
        }
        taken
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.slots.get(index).copied().flatten()
    }

    /// Overwrite an occupied slot. Empty slots are left untouched.
    pub fn set(&mut self, index: usize, p: Point) {
        if let Some(slot @ Some(_)) = self.slots.get_mut(index) {
            *slot = Some(p);
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; N];
        self.count = 0;
    }

    /// Tracked number of occupied slots.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == N
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Occupied slots with their indices, lowest index first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|p| (i, p)))
    }

    pub fn slots(&self) -> &[Option<Point>; N] {
        &self.slots
    }
}

// ── Levels & status ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    One,
    Two,
}

impl Level {
    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
        }
    }

    /// The level the door leads to, or `None` on the final level.
    pub fn next(self) -> Option<Level> {
        match self {
            Level::One => Some(Level::Two),
            Level::Two => None,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = GameError;

    fn try_from(n: u8) -> Result<Level, GameError> {
        match n {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            other => Err(GameError::UnknownLevel(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Playing with the clock frozen.
    Paused,
    GameOver,
}

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Movement directions in priority order: when several are held at once the
/// first one listed wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Down,
    Left,
    Up,
    Right,
}

impl Direction {
    pub const PRIORITY: [Direction; 4] =
        [Direction::Down, Direction::Left, Direction::Up, Direction::Right];

    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    pub fn switch(self) -> Switch {
        match self {
            Direction::Down => Switch::Down,
            Direction::Left => Switch::Left,
            Direction::Up => Switch::Up,
            Direction::Right => Switch::Right,
        }
    }
}

/// Single-character commands from the serial-style control surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Status,
    Pause,
    Level,
    Fire,
    Restart,
}

impl Command {
    pub fn from_char(c: char) -> Option<Command> {
        let command = match c.to_ascii_lowercase() {
            'w' => Command::Move(Direction::Up),
            'a' => Command::Move(Direction::Left),
            's' => Command::Move(Direction::Down),
            'd' => Command::Move(Direction::Right),
            'i' => Command::Status,
            'p' => Command::Pause,
            'l' => Command::Level,
            'f' => Command::Fire,
            'r' => Command::Restart,
            _ => return None,
        };
        Some(command)
    }
}

/// Everything the main loop samples once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Clock reading in seconds, pause time included.
    pub now: f64,
    pub switches: SwitchStates,
    /// Analog wheel driving the mouse speed, `0..=1024`.
    pub player_wheel: u16,
    /// Analog wheel driving wall speed, `0..=1024`.
    pub wall_wheel: u16,
    pub command: Option<Command>,
}

// ── Events ────────────────────────────────────────────────────────────────────

/// Things that happened during one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    CheeseSpawned,
    TrapDropped,
    DoorAppeared,
    MilkDropped,
    CheeseEaten,
    TrapTriggered,
    /// A trap touched while invincible.
    TrapCrushed,
    MilkDrunk,
    Caught,
    /// The cat touched an invincible mouse.
    CatRepelled,
    FireworkLaunched,
    FireworkHit,
    FireworkFizzled,
    AmmoGranted(u32),
    SuperExpired,
    LevelAdvanced(Level),
    Paused,
    Resumed,
    GameOver { won: bool },
    Restarted,
    Status(String),
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state, owned by the main loop and handed by reference to
/// every subsystem.
#[derive(Clone, Debug)]
pub struct GameState {
    pub level: Level,
    pub status: GameStatus,
    /// Set when the run ended through the final door.
    pub won: bool,
    pub mouse: Actor,
    pub cat: Actor,
    pub walls: Vec<Wall>,
    pub cheese: SlotPool<MAX_CHEESE>,
    pub traps: SlotPool<MAX_TRAPS>,
    pub fireworks: SlotPool<MAX_FIREWORKS>,
    pub door: Option<Point>,
    pub milk: Option<Point>,
    /// Cheese eaten on the current level.
    pub cheese_collected: u32,
    /// Level 1 ammo bonus already handed out.
    pub ammo_granted: bool,
    /// Game time at which invincibility started.
    pub super_since: Option<f64>,
    pub pause: PauseLedger,
    /// Clock reading when this run started.
    pub run_started: f64,
    /// Last clock reading, pause time included.
    pub elapsed: f64,
    /// Clock reading minus pause time.
    pub game_time: f64,
    pub last_cheese: f64,
    pub last_trap: f64,
    pub last_milk: f64,
    pub player_speed: f64,
    pub wall_speed: f64,
    pub prev_switches: SwitchStates,
    pub frame: u64,
}
