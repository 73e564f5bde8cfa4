use crate::service::TimeoutPolicy;

use std::time::Duration;

use docseek_config::TimeoutConfig;
use googletest::assert_that;
use googletest::prelude::eq;

#[test]
fn given_index_path_when_resolve_then_long_timeout() {
    let policy = TimeoutPolicy::default();

    assert_that!(policy.resolve("/index/folder"), eq(Duration::from_secs(1800)));
}

#[test]
fn given_content_path_when_resolve_then_medium_timeout() {
    let policy = TimeoutPolicy::default();

    assert_that!(policy.resolve("/content/42"), eq(Duration::from_secs(120)));
}

#[test]
fn given_search_path_when_resolve_then_short_timeout() {
    let policy = TimeoutPolicy::default();

    assert_that!(policy.resolve("/search?q=tax"), eq(Duration::from_secs(30)));
}

#[test]
fn given_unknown_path_when_resolve_then_default_timeout() {
    let policy = TimeoutPolicy::default();

    assert_that!(policy.resolve("/stats"), eq(policy.default_timeout()));
}

#[test]
fn given_path_with_two_markers_when_resolve_then_index_wins() {
    // Given
    let policy = TimeoutPolicy::default();

    // When
    let timeout = policy.resolve("/search/index/rebuild");

    // Then
    assert_that!(timeout, eq(Duration::from_secs(1800)));
}

#[test]
fn given_custom_config_when_from_config_then_markers_and_durations_used() {
    // Given
    let config = TimeoutConfig {
        search_marker: "/query".into(),
        search_secs: 5,
        default_secs: 12,
        ..TimeoutConfig::default()
    };

    // When
    let policy = TimeoutPolicy::from_config(&config);

    // Then
    assert_that!(policy.resolve("/query?q=a"), eq(Duration::from_secs(5)));
    assert_that!(policy.resolve("/search?q=a"), eq(Duration::from_secs(12)));
}
