mod display;

use std::collections::VecDeque;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tom_and_jerry::clock::{Clock, HostCounter};
use tom_and_jerry::compute::{init_state, load_level, tick};
use tom_and_jerry::config::{Settings, ANALOG_CENTRE, ANALOG_MAX, NUM_SWITCHES, OVERFLOW_PERIOD};
use tom_and_jerry::debounce::{Debouncer, Switch, SwitchMailbox};
use tom_and_jerry::entities::{Command, FrameInput, GameEvent, Level};
use tom_and_jerry::error::GameError;
use tom_and_jerry::framebuffer::FrameBuffer;

/// Without release events a key press holds its pin this long. Longer than
/// the usual OS autorepeat delay, so a held key is still high when the first
/// repeat arrives.
const FIRST_HOLD: Duration = Duration::from_millis(650);

/// Hold extension granted by each autorepeat while the key stays down.
const REPEAT_HOLD: Duration = Duration::from_millis(200);

/// Wheel change per key press.
const WHEEL_STEP: u16 = 64;

// ── Raw pins ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum Hold {
    Up,
    /// High until the deadline unless refreshed.
    Until(Instant),
    /// High until the key's release event.
    Down,
}

/// Emulated input pins. With release events a pin is latched from press to
/// release; without them each press holds it for a time window.
struct PinBoard {
    releases: bool,
    pins: Mutex<[Hold; NUM_SWITCHES]>,
}

impl PinBoard {
    fn new(releases: bool) -> Self {
        PinBoard {
            releases,
            pins: Mutex::new([Hold::Up; NUM_SWITCHES]),
        }
    }

    fn press(&self, switch: Switch, now: Instant) {
        let mut pins = self.pins.lock().unwrap_or_else(|e| e.into_inner());
        let pin = &mut pins[switch.index()];
        *pin = match *pin {
            _ if self.releases => Hold::Down,
            Hold::Until(deadline) if deadline >= now => Hold::Until(deadline.max(now + REPEAT_HOLD)),
            _ => Hold::Until(now + FIRST_HOLD),
        };
    }

    fn release(&self, switch: Switch) {
        let mut pins = self.pins.lock().unwrap_or_else(|e| e.into_inner());
        pins[switch.index()] = Hold::Up;
    }

    /// Pin levels at `now`, bit `i` for switch `i`.
    fn levels(&self, now: Instant) -> u8 {
        let pins = self.pins.lock().unwrap_or_else(|e| e.into_inner());
        pins.iter().enumerate().fold(0, |bits, (i, pin)| match pin {
            Hold::Down => bits | (1 << i),
            Hold::Until(deadline) if now <= *deadline => bits | (1 << i),
            _ => bits,
        })
    }
}

fn pin_for(code: &KeyCode) -> Option<Switch> {
    match code {
        KeyCode::Down => Some(Switch::Down),
        KeyCode::Left => Some(Switch::Left),
        KeyCode::Up => Some(Switch::Up),
        KeyCode::Right => Some(Switch::Right),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Switch::Centre),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Switch::LeftButton),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Switch::RightButton),
        _ => None,
    }
}

// ── Sampler ("timer interrupt") ───────────────────────────────────────────────

/// Fixed-rate task standing in for the timer overflow interrupt: bumps the
/// clock's overflow count and feeds the debouncer, independent of how long
/// a frame takes to draw.
fn spawn_sampler(
    pins: Arc<PinBoard>,
    mailbox: Arc<SwitchMailbox>,
    counter: Arc<HostCounter>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let period = Duration::from_secs_f64(OVERFLOW_PERIOD);
        let mut debouncer = Debouncer::new();
        let mut next = Instant::now() + period;

        while running.load(Ordering::Acquire) {
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            }
            next += period;

            counter.on_overflow();
            debouncer.sample_all(pins.levels(Instant::now()));
            mailbox.publish(debouncer.states());
        }
    })
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The debug channel goes to `TOMJERRY_SERIAL` when set. Otherwise only
/// warnings reach stderr, since the terminal is busy showing the game.
fn init_logging(settings: &Settings) -> Result<(), GameError> {
    let default = if settings.serial_path.is_some() { "info" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    if let Some(path) = &settings.serial_path {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

struct Wheels {
    player: u16,
    wall: u16,
}

impl Wheels {
    fn turn(value: &mut u16, up: bool) {
        *value = if up {
            value.saturating_add(WHEEL_STEP).min(ANALOG_MAX)
        } else {
            value.saturating_sub(WHEEL_STEP)
        };
    }
}

/// Returns when the player quits.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
    releases: bool,
) -> Result<(), GameError> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let counter = Arc::new(HostCounter::new());
    let clock = Clock::new(Arc::clone(&counter));
    let pins = Arc::new(PinBoard::new(releases));
    let mailbox = Arc::new(SwitchMailbox::new());
    let running = Arc::new(AtomicBool::new(true));
    let sampler = spawn_sampler(
        Arc::clone(&pins),
        Arc::clone(&mailbox),
        Arc::clone(&counter),
        Arc::clone(&running),
    );

    let result = play(out, rx, settings, &mut rng, &clock, &pins, &mailbox);

    running.store(false, Ordering::Release);
    if sampler.join().is_err() {
        error!("sampler thread panicked");
    }
    result
}

fn play<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
    rng: &mut StdRng,
    clock: &Clock<Arc<HostCounter>>,
    pins: &PinBoard,
    mailbox: &SwitchMailbox,
) -> Result<(), GameError> {
    if !display::show_start_screen(out, rx)? {
        return Ok(());
    }
    out.execute(terminal::Clear(terminal::ClearType::All))?;

    let mut state = init_state(rng);
    if settings.start_level != Level::One {
        load_level(&mut state, settings.start_level, rng);
    }
    state.run_started = clock.elapsed_time();
    state.elapsed = state.run_started;
    info!("run started on level {}", state.level.number());

    let mut fb = FrameBuffer::new();
    let mut wheels = Wheels { player: ANALOG_CENTRE, wall: ANALOG_CENTRE };
    let mut commands: VecDeque<Command> = VecDeque::new();
    let frame = settings.frame_period();
    let mut last_status: Option<String> = None;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            if kind == KeyEventKind::Release {
                if let Some(switch) = pin_for(&code) {
                    pins.release(switch);
                }
                continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Char('[') => Wheels::turn(&mut wheels.player, false),
                KeyCode::Char(']') => Wheels::turn(&mut wheels.player, true),
                KeyCode::Char('-') => Wheels::turn(&mut wheels.wall, false),
                KeyCode::Char('=') => Wheels::turn(&mut wheels.wall, true),
                other => {
                    if let Some(switch) = pin_for(&other) {
                        pins.press(switch, Instant::now());
                    } else if let KeyCode::Char(c) = other {
                        // One-shot commands only on the initial press.
                        if kind == KeyEventKind::Press {
                            commands.extend(Command::from_char(c));
                        }
                    }
                }
            }
        }

        let input = FrameInput {
            now: clock.elapsed_time(),
            switches: mailbox.snapshot(),
            player_wheel: wheels.player,
            wall_wheel: wheels.wall,
            command: commands.pop_front(),
        };

        for event in tick(&mut state, &input, &mut fb, rng) {
            match event {
                GameEvent::Status(report) => {
                    info!("status\n{report}");
                    last_status = Some(report);
                }
                GameEvent::Restarted => last_status = None,
                _ => {}
            }
        }

        display::render(out, &fb, &state, last_status.as_deref())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let settings = Settings::from_env()?;
    init_logging(&settings)?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events where the terminal supports them; others fall back
    // to the hold windows.
    let releases = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    info!("key release events: {releases}");

    // Dedicated thread for blocking event reads so the frame loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &settings, releases);

    // Always restore the terminal
    if releases {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        error!("{err}");
    }
    result
}
