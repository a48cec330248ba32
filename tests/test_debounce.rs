use std::sync::Arc;
use std::thread;

use tom_and_jerry::config::DEBOUNCE_MASK;
use tom_and_jerry::debounce::*;

fn feed(d: &mut Debouncer, switch: Switch, samples: &[bool]) {
    for &s in samples {
        d.sample(s, switch.index());
    }
}

// ── Debouncer ─────────────────────────────────────────────────────────────────

#[test]
fn press_needs_five_consecutive_highs() {
    let mut d = Debouncer::new();
    feed(&mut d, Switch::Down, &[true; 4]);
    assert!(!d.states().is_pressed(Switch::Down));

    feed(&mut d, Switch::Down, &[true]);
    assert!(d.states().is_pressed(Switch::Down));
}

#[test]
fn release_needs_five_consecutive_lows() {
    let mut d = Debouncer::new();
    feed(&mut d, Switch::Centre, &[true; 5]);
    feed(&mut d, Switch::Centre, &[false; 4]);
    assert!(d.states().is_pressed(Switch::Centre));

    feed(&mut d, Switch::Centre, &[false]);
    assert!(!d.states().is_pressed(Switch::Centre));
}

#[test]
fn bouncing_input_keeps_previous_state() {
    let mut d = Debouncer::new();
    feed(&mut d, Switch::Up, &[true; 5]);
    feed(&mut d, Switch::Up, &[false, true, false, true, false, true, true, false]);
    assert!(d.states().is_pressed(Switch::Up));

    let mut d = Debouncer::new();
    feed(&mut d, Switch::Up, &[true, true, true, true, false, true, true, true, true]);
    assert!(!d.states().is_pressed(Switch::Up));
}

#[test]
fn every_window_follows_the_all_or_nothing_rule() {
    for start_pressed in [false, true] {
        for pattern in 0u8..32 {
            let mut d = Debouncer::new();
            feed(&mut d, Switch::Left, &[start_pressed; 5]);

            let samples: Vec<bool> = (0..5).map(|i| pattern & (0b10000 >> i) != 0).collect();
            feed(&mut d, Switch::Left, &samples);

            let expected = match pattern {
                0b11111 => true,
                0b00000 => false,
                _ => start_pressed,
            };
            assert_eq!(
                d.states().is_pressed(Switch::Left),
                expected,
                "start {start_pressed}, window {pattern:05b}"
            );
            assert_eq!(d.history(Switch::Left), pattern & DEBOUNCE_MASK);
        }
    }
}

#[test]
fn switches_are_independent() {
    let mut d = Debouncer::new();
    feed(&mut d, Switch::Right, &[true; 5]);
    assert!(d.states().is_pressed(Switch::Right));
    for other in Switch::ALL.into_iter().filter(|s| *s != Switch::Right) {
        assert!(!d.states().is_pressed(other));
    }
}

#[test]
fn sample_all_reads_one_bit_per_pin() {
    let mut d = Debouncer::new();
    let raw = (1 << Switch::LeftButton.index()) | (1 << Switch::Centre.index());
    for _ in 0..5 {
        d.sample_all(raw);
    }
    let states = d.states();
    assert!(states.is_pressed(Switch::LeftButton));
    assert!(states.is_pressed(Switch::Centre));
    assert!(!states.is_pressed(Switch::RightButton));
    assert_eq!(states.bits(), raw);
}

#[test]
fn reset_clears_history_and_states() {
    let mut d = Debouncer::new();
    d.sample_all(0b111_1111);
    for _ in 0..5 {
        d.sample_all(0b111_1111);
    }
    d.reset();
    assert_eq!(d.states(), SwitchStates::default());
    assert_eq!(d.history(Switch::Down), 0);
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

#[test]
fn rising_edge_only_on_transition() {
    let idle = SwitchStates::default();
    let held = idle.with(Switch::Centre);
    assert!(held.rose(idle, Switch::Centre));
    assert!(!held.rose(held, Switch::Centre));
    assert!(!idle.rose(held, Switch::Centre));
}

#[test]
fn mailbox_hands_over_whole_snapshot() {
    let mailbox = Arc::new(SwitchMailbox::new());
    assert_eq!(mailbox.snapshot(), SwitchStates::default());

    let writer = Arc::clone(&mailbox);
    let expected = SwitchStates::default().with(Switch::Down).with(Switch::RightButton);
    thread::spawn(move || {
        let mut d = Debouncer::new();
        for _ in 0..5 {
            d.sample_all(expected.bits());
            writer.publish(d.states());
        }
    })
    .join()
    .unwrap();

    assert_eq!(mailbox.snapshot(), expected);
}
