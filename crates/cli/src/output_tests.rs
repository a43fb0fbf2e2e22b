// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn text_is_the_default() {
    assert_eq!(OutputFormat::default(), OutputFormat::Text);
}
