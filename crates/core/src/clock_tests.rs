// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_does_not_advance_on_its_own() {
    let clock = FakeClock::new();
    let t0 = clock.now();
    let t1 = clock.now();
    assert_eq!(t0, t1);
}

#[test]
fn fake_clock_advances_by_requested_amount() {
    let clock = FakeClock::new();
    let t0 = clock.now();
    clock.advance(Duration::from_secs(5));
    let t1 = clock.now();
    assert_eq!(t1 - t0, Duration::from_secs(5));
}

#[test]
fn fake_clock_clones_share_state() {
    let clock = FakeClock::new();
    let clone = clock.clone();
    clone.advance(Duration::from_millis(100));
    assert_eq!(clock.now(), clone.now());
}

#[test]
fn system_clock_is_monotonic() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}
