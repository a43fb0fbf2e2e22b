// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fresh_token_is_not_cancelled() {
    let token = CancelToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn cancel_marks_the_token() {
    let token = CancelToken::new();
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn child_is_cancelled_when_parent_is_cancelled() {
    let parent = CancelToken::new();
    let child = parent.child();
    assert!(!child.is_cancelled());
    parent.cancel();
    assert!(child.is_cancelled());
}

#[test]
fn parent_is_unaffected_by_child_cancel() {
    let parent = CancelToken::new();
    let child = parent.child();
    child.cancel();
    assert!(child.is_cancelled());
    assert!(!parent.is_cancelled());
}

#[tokio::test]
async fn cancelled_future_resolves_after_cancel() {
    let token = CancelToken::new();
    let waiter = token.clone();
    let handle = tokio::spawn(async move {
        waiter.cancelled().await;
    });
    token.cancel();
    tokio::time::timeout(std::time::Duration::from_secs(1), handle)
        .await
        .expect("cancelled() should resolve promptly")
        .unwrap();
}

#[tokio::test]
async fn cancelled_future_resolves_via_parent() {
    let parent = CancelToken::new();
    let child = parent.child();
    let waiter = child.clone();
    let handle = tokio::spawn(async move {
        waiter.cancelled().await;
    });
    parent.cancel();
    tokio::time::timeout(std::time::Duration::from_secs(1), handle)
        .await
        .expect("child should observe parent cancellation")
        .unwrap();
}
