/// Game configuration.
///
/// Compile-time gameplay constants live here as plain `const`s; the few knobs
/// the host front end exposes are collected in [`Settings`].

use std::time::Duration;

use crate::entities::Level;
use crate::error::GameError;

// ── Screen geometry ──────────────────────────────────────────────────────────

/// LCD width in pixels.
pub const LCD_X: i32 = 84;
/// LCD height in pixels.
pub const LCD_Y: i32 = 48;
/// Height of the status bar. The separator line is drawn on this row, the
/// playfield starts on the row below it.
pub const STATUS_BAR_HEIGHT: i32 = 8;
/// First playfield row.
pub const PLAY_TOP: i32 = STATUS_BAR_HEIGHT + 1;
/// Sprite edge length for every entity (mouse, cat, cheese, trap, door, milk).
pub const OBJ_SIZE: i32 = 5;

// ── Inputs ───────────────────────────────────────────────────────────────────

pub const NUM_SWITCHES: usize = 7;
/// Five-sample debounce window.
pub const DEBOUNCE_MASK: u8 = 0b0001_1111;
/// Full scale of the analog wheels.
pub const ANALOG_MAX: u16 = 1024;
/// Wheel reading that maps to a 1x multiplier.
pub const ANALOG_CENTRE: u16 = 512;

// ── Clock source ─────────────────────────────────────────────────────────────

pub const CPU_HZ: f64 = 8_000_000.0;
pub const TIMER_PRESCALER: f64 = 256.0;
/// 8-bit free-running counter.
pub const TIMER_TOP: u32 = 256;
/// Seconds per counter tick.
pub const TICK_PERIOD: f64 = TIMER_PRESCALER / CPU_HZ;
/// Seconds per counter overflow (8.192 ms).
pub const OVERFLOW_PERIOD: f64 = TICK_PERIOD * TIMER_TOP as f64;

// ── Actors ───────────────────────────────────────────────────────────────────

pub const START_LIVES: u32 = 5;
pub const MOUSE_START: (f64, f64) = (0.0, PLAY_TOP as f64);
pub const CAT_START: (f64, f64) = ((LCD_X - 9) as f64, (LCD_Y - 9) as f64);
/// Lower bound of the cat's randomised speed, in pixels per frame.
pub const MIN_SPEED: f64 = 0.3;

// ── Pools and pickups ────────────────────────────────────────────────────────

pub const MAX_CHEESE: usize = 5;
pub const MAX_TRAPS: usize = 5;
pub const MAX_FIREWORKS: usize = 20;
/// Firework stock granted on level 1 once the score threshold is reached,
/// and handed out in full on level 2.
pub const MAX_AMMO: u32 = 20;
pub const AMMO_SCORE: u32 = 3;
/// Cheese collected in a level before the door opens.
pub const DOOR_CHEESE: u32 = 5;

pub const CHEESE_COOLDOWN: u32 = 2;
pub const TRAP_COOLDOWN: u32 = 3;
pub const MILK_COOLDOWN: u32 = 5;
pub const SUPER_DURATION: f64 = 10.0;
/// Pause input is ignored until this many seconds into a run.
pub const START_GRACE: f64 = 2.0;

/// Tries per clear-spot search before giving up for the frame.
pub const MAX_SPAWN_ATTEMPTS: usize = 64;

/// Base wall speed in pixels per frame at a 1x wheel setting.
pub const WALL_SPEED: f64 = 0.25;

// ── Runtime settings ─────────────────────────────────────────────────────────

const DEFAULT_FPS: u32 = 30;

/// Host-side knobs read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub fps: u32,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    /// Where the debug channel is written; stderr when unset.
    pub serial_path: Option<String>,
    /// Level the first run opens on. Restarts always go back to level 1.
    pub start_level: Level,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fps: DEFAULT_FPS,
            seed: None,
            serial_path: None,
            start_level: Level::One,
        }
    }
}

impl Settings {
    /// Read `TOMJERRY_FPS`, `TOMJERRY_SEED`, `TOMJERRY_SERIAL` and
    /// `TOMJERRY_LEVEL`.
    pub fn from_env() -> Result<Settings, GameError> {
        Settings::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, GameError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(raw) = lookup("TOMJERRY_FPS") {
            settings.fps = match raw.trim().parse::<u32>() {
                Ok(fps) if (1..=240).contains(&fps) => fps,
                _ => return Err(invalid("TOMJERRY_FPS", raw)),
            };
        }
        if let Some(raw) = lookup("TOMJERRY_SEED") {
            let seed = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid("TOMJERRY_SEED", raw.clone()))?;
            settings.seed = Some(seed);
        }
        settings.serial_path = lookup("TOMJERRY_SERIAL").filter(|p| !p.trim().is_empty());
        if let Some(raw) = lookup("TOMJERRY_LEVEL") {
            let n = raw
                .trim()
                .parse::<u8>()
                .map_err(|_| invalid("TOMJERRY_LEVEL", raw.clone()))?;
            settings.start_level = Level::try_from(n)?;
        }

        Ok(settings)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }
}

fn invalid(name: &'static str, value: String) -> GameError {
    GameError::InvalidSetting { name, value }
}
