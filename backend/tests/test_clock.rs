//! Tests for SimClock

use scheduler_simulator_core_rs::SimClock;

#[test]
fn test_clock_new() {
    let clock = SimClock::new();
    assert_eq!(clock.now(), 0);
    assert_eq!(clock.ticks_elapsed(), 0);
    assert_eq!(clock, SimClock::default());
}

#[test]
fn test_advance_tick() {
    let mut clock = SimClock::new();

    clock.advance_tick();
    assert_eq!(clock.now(), 1);

    clock.advance_tick();
    assert_eq!(clock.now(), 2);
}

#[test]
fn test_many_ticks() {
    let mut clock = SimClock::new();
    for _ in 0..250 {
        clock.advance_tick();
    }
    assert_eq!(clock.now(), 250);
    assert_eq!(clock.ticks_elapsed(), 250);
}

#[test]
fn test_restored_clock_keeps_counting() {
    let mut clock = SimClock::starting_at(17);
    clock.advance_tick();
    assert_eq!(clock.now(), 18);
}

#[test]
fn test_clock_serializes_as_tick() {
    let clock = SimClock::starting_at(9);
    let json = serde_json::to_string(&clock).unwrap();
    let back: SimClock = serde_json::from_str(&json).unwrap();
    assert_eq!(back.now(), 9);
}
