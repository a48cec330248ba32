/// Switch debouncing.
///
/// Every switch keeps a five-sample shift register. The register is fed from
/// a fixed-rate sampler that runs independently of the frame loop; a switch
/// only changes its stable state once the whole window agrees.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::config::{DEBOUNCE_MASK, NUM_SWITCHES};

/// Logical switches, in sampling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Switch {
    /// SW2, the left tactile button.
    LeftButton = 0,
    /// SW3, the right tactile button.
    RightButton = 1,
    Down = 2,
    Left = 3,
    Up = 4,
    Right = 5,
    Centre = 6,
}

impl Switch {
    pub const ALL: [Switch; NUM_SWITCHES] = [
        Switch::LeftButton,
        Switch::RightButton,
        Switch::Down,
        Switch::Left,
        Switch::Up,
        Switch::Right,
        Switch::Centre,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }
}

/// Stable switch states packed one bit per switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwitchStates(u8);

impl SwitchStates {
    pub const fn from_bits(bits: u8) -> SwitchStates {
        SwitchStates(bits & 0b0111_1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn with(self, switch: Switch) -> SwitchStates {
        SwitchStates(self.0 | switch.bit())
    }

    pub fn is_pressed(self, switch: Switch) -> bool {
        self.0 & switch.bit() != 0
    }

    /// Released in `prev`, pressed now.
    pub fn rose(self, prev: SwitchStates, switch: Switch) -> bool {
        self.is_pressed(switch) && !prev.is_pressed(switch)
    }
}

/// Per-switch history registers plus the derived stable states.
#[derive(Clone, Debug, Default)]
pub struct Debouncer {
    history: [u8; NUM_SWITCHES],
    states: SwitchStates,
}

impl Debouncer {
    pub fn new() -> Debouncer {
        Debouncer::default()
    }

    /// Shift one raw sample into the register of switch `index`.
    ///
    /// All ones in the window means pressed, all zeros released, anything in
    /// between keeps the previous stable state.
    pub fn sample(&mut self, raw: bool, index: usize) {
        let Some(&switch) = Switch::ALL.get(index) else {
            return;
        };
        let register = &mut self.history[index];
        *register = ((*register << 1) & DEBOUNCE_MASK) | u8::from(raw);

        if *register == DEBOUNCE_MASK {
            self.states.0 |= switch.bit();
        } else if *register == 0 {
            self.states.0 &= !switch.bit();
        }
    }

    /// Sample every switch at once; bit `i` of `raw` is pin `i`.
    pub fn sample_all(&mut self, raw: u8) {
        for i in 0..NUM_SWITCHES {
            self.sample(raw & (1 << i) != 0, i);
        }
    }

    pub fn states(&self) -> SwitchStates {
        self.states
    }

    pub fn history(&self, switch: Switch) -> u8 {
        self.history[switch.index()]
    }

    pub fn reset(&mut self) {
        *self = Debouncer::default();
    }
}

/// Single-slot handoff from the sampler to the frame loop.
///
/// All seven states travel in one byte, so a reader always sees a snapshot
/// written by a single `publish`.
#[derive(Debug, Default)]
pub struct SwitchMailbox {
    cell: AtomicU8,
}

impl SwitchMailbox {
    pub fn new() -> SwitchMailbox {
        SwitchMailbox::default()
    }

    pub fn publish(&self, states: SwitchStates) {
        self.cell.store(states.bits(), Ordering::Release);
    }

    pub fn snapshot(&self) -> SwitchStates {
        SwitchStates::from_bits(self.cell.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_masked_to_window() {
        let mut d = Debouncer::new();
        for _ in 0..12 {
            d.sample(true, Switch::Up.index());
        }
        assert_eq!(d.history(Switch::Up), DEBOUNCE_MASK);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut d = Debouncer::new();
        d.sample(true, NUM_SWITCHES);
        assert_eq!(d.states(), SwitchStates::default());
    }
}
