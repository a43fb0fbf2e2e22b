// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn get_returns_none_for_missing_key() {
    let env = CapturedEnvironment::from_map(map(&[]));
    assert_eq!(env.get("MISSING"), None);
}

#[test]
fn get_returns_captured_value() {
    let env = CapturedEnvironment::from_map(map(&[("FOO", "bar")]));
    assert_eq!(env.get("FOO"), Some("bar"));
}

#[yare::parameterized(
    ci = { "CI" },
    github_actions = { "GITHUB_ACTIONS" },
    travis = { "TRAVIS" },
    circleci = { "CIRCLECI" },
    jenkins = { "JENKINS_URL" },
    gitlab = { "GITLAB_CI" },
    buildkite = { "BUILDKITE" },
    build_number = { "BUILD_NUMBER" },
)]
fn looks_like_ci_true_when_indicator_present_and_nonempty(var: &str) {
    let env = CapturedEnvironment::from_map(map(&[(var, "true")]));
    assert!(env.looks_like_ci());
}

#[test]
fn looks_like_ci_false_when_indicator_present_but_empty() {
    let env = CapturedEnvironment::from_map(map(&[("CI", "")]));
    assert!(!env.looks_like_ci());
}

#[test]
fn looks_like_ci_false_with_no_indicators() {
    let env = CapturedEnvironment::from_map(map(&[("PATH", "/usr/bin")]));
    assert!(!env.looks_like_ci());
}

#[test]
fn clone_shares_the_same_snapshot() {
    let env = CapturedEnvironment::from_map(map(&[("FOO", "bar")]));
    let clone = env.clone();
    assert_eq!(clone.get("FOO"), Some("bar"));
}
