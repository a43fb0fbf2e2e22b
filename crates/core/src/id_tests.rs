// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

crate::define_id! {
    pub struct TestId;
}

#[test]
fn short_truncates_to_n_chars() {
    let id = TestId::new("abcdefgh");
    assert_eq!(id.short(4), "abcd");
}

#[test]
fn short_is_noop_when_already_short() {
    let id = TestId::new("ab");
    assert_eq!(id.short(4), "ab");
}

#[test]
fn str_short_handles_non_ascii_boundary_safely() {
    // "n" is 1 byte, so short(1) is a valid char boundary.
    let s = "n";
    assert_eq!(s.short(1), "n");
}

#[test]
fn display_matches_inner_string() {
    let id = TestId::new("xyz");
    assert_eq!(id.to_string(), "xyz");
}

#[test]
fn atomic_id_gen_is_monotonic_and_unique() {
    let gen = AtomicIdGen::default();
    let a = gen.next();
    let b = gen.next();
    let c = gen.next();
    assert!(a < b);
    assert!(b < c);
}

#[test]
fn atomic_id_gen_shared_clone_keeps_counting() {
    let gen = AtomicIdGen::default();
    let clone = gen.clone();
    let a = gen.next();
    let b = clone.next();
    assert_ne!(a, b);
}
