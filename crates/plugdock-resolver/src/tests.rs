use plugdock_core::{parse_version, PluginDefinition, ReleaseChannel};

use crate::{resolve_update, ResolveRequest, SkipReason, UpdateDecision};

fn remote(stable: &str, testing: Option<&str>) -> PluginDefinition {
    PluginDefinition {
        internal_name: "demo".to_string(),
        display_name: "Demo".to_string(),
        stable_version: stable.to_string(),
        testing_version: testing.map(str::to_string),
        testing_only: false,
        min_api_level: 1,
    }
}

fn request<'a>(
    local: &str,
    remote: Option<&'a PluginDefinition>,
    testing_enabled: bool,
) -> ResolveRequest<'a> {
    ResolveRequest {
        installed_version: parse_version(local),
        remote,
        testing_channel_enabled: testing_enabled,
        host_api_level: 10,
    }
}

#[test]
fn stable_update_is_due() {
    let definition = remote("1.1.0", None);
    let decision = resolve_update(&request("1.0.0", Some(&definition), false));
    assert_eq!(
        decision,
        UpdateDecision::Due {
            channel: ReleaseChannel::Stable,
            target_version: "1.1.0".to_string(),
        }
    );
}

#[test]
fn equal_stable_version_is_up_to_date() {
    let definition = remote("1.0.0", None);
    let decision = resolve_update(&request("1.0.0", Some(&definition), false));
    assert_eq!(decision, UpdateDecision::UpToDate);
}

#[test]
fn older_remote_stable_is_up_to_date() {
    let definition = remote("1.9.0", None);
    let decision = resolve_update(&request("2.0.0", Some(&definition), false));
    assert_eq!(decision, UpdateDecision::UpToDate);
}

#[test]
fn newer_testing_version_selects_testing_channel_when_enabled() {
    let definition = remote("1.0.0", Some("1.1.0-beta"));
    let decision = resolve_update(&request("1.0.0", Some(&definition), true));
    assert_eq!(
        decision,
        UpdateDecision::Due {
            channel: ReleaseChannel::Testing,
            target_version: "1.1.0-beta".to_string(),
        }
    );
}

#[test]
fn testing_version_is_ignored_when_channel_disabled() {
    let definition = remote("1.0.0", Some("1.1.0-beta"));
    let decision = resolve_update(&request("1.0.0", Some(&definition), false));
    assert_eq!(decision, UpdateDecision::UpToDate);
}

#[test]
fn testing_wins_over_stable_when_both_are_newer() {
    let definition = remote("1.1.0", Some("1.2.0-rc.1"));
    let decision = resolve_update(&request("1.0.0", Some(&definition), true));
    assert_eq!(
        decision,
        UpdateDecision::Due {
            channel: ReleaseChannel::Testing,
            target_version: "1.2.0-rc.1".to_string(),
        }
    );
}

#[test]
fn absent_remote_skips_as_unavailable() {
    let decision = resolve_update(&request("1.0.0", None, true));
    assert_eq!(
        decision,
        UpdateDecision::Skip {
            reason: SkipReason::Unavailable,
        }
    );
}

#[test]
fn api_level_above_host_skips_as_incompatible() {
    let mut definition = remote("9.0.0", None);
    definition.min_api_level = 11;
    let decision = resolve_update(&request("1.0.0", Some(&definition), true));
    assert_eq!(
        decision,
        UpdateDecision::Skip {
            reason: SkipReason::Incompatible,
        }
    );
}

#[test]
fn missing_api_level_defaults_to_incompatible() {
    let definition = PluginDefinition::from_json_str(
        r#"{"internalName": "demo", "displayName": "Demo", "stableVersion": "9.0.0"}"#,
    )
    .expect("must parse");
    let decision = resolve_update(&request("1.0.0", Some(&definition), false));
    assert_eq!(
        decision,
        UpdateDecision::Skip {
            reason: SkipReason::Incompatible,
        }
    );
}

#[test]
fn unparsable_local_version_sorts_below_any_remote() {
    let definition = remote("0.1.0", None);
    let decision = resolve_update(&request("garbage", Some(&definition), false));
    assert_eq!(
        decision,
        UpdateDecision::Due {
            channel: ReleaseChannel::Stable,
            target_version: "0.1.0".to_string(),
        }
    );
}

#[test]
fn remote_without_parseable_versions_skips() {
    let definition = remote("not-semver", None);
    let decision = resolve_update(&request("1.0.0", Some(&definition), true));
    assert_eq!(
        decision,
        UpdateDecision::Skip {
            reason: SkipReason::NoParseableVersion,
        }
    );
}

#[test]
fn testing_only_plugin_uses_testing_channel_without_parseable_stable() {
    let mut definition = remote("", Some("1.1.0-beta"));
    definition.testing_only = true;
    let decision = resolve_update(&request("1.0.0", Some(&definition), true));
    assert_eq!(
        decision,
        UpdateDecision::Due {
            channel: ReleaseChannel::Testing,
            target_version: "1.1.0-beta".to_string(),
        }
    );
}

#[test]
fn testing_only_plugin_forces_testing_channel_over_newer_stable() {
    let mut definition = remote("2.0.0", Some("1.5.0-beta"));
    definition.testing_only = true;
    let decision = resolve_update(&request("1.0.0", Some(&definition), true));
    assert_eq!(
        decision,
        UpdateDecision::Due {
            channel: ReleaseChannel::Testing,
            target_version: "1.5.0-beta".to_string(),
        }
    );
}

#[test]
fn testing_only_plugin_with_unparsable_testing_version_skips() {
    let mut definition = remote("2.0.0", Some("next"));
    definition.testing_only = true;
    let decision = resolve_update(&request("1.0.0", Some(&definition), true));
    assert_eq!(
        decision,
        UpdateDecision::Skip {
            reason: SkipReason::NoParseableVersion,
        }
    );
}

#[test]
fn enabling_testing_channel_never_revokes_a_due_update() {
    let cases = [
        ("1.0.0", "1.1.0", None),
        ("1.0.0", "1.1.0", Some("1.0.5-beta")),
        ("garbage", "0.1.0", Some("0.0.1-alpha")),
        ("1.0.0", "2.0.0", Some("1.9.9-rc.2")),
    ];

    for (local, stable, testing) in cases {
        let definition = remote(stable, testing);
        let disabled = resolve_update(&request(local, Some(&definition), false));
        let enabled = resolve_update(&request(local, Some(&definition), true));

        if matches!(disabled, UpdateDecision::Due { .. }) {
            assert!(
                matches!(enabled, UpdateDecision::Due { .. }),
                "enabling testing dropped a due update for local={local} stable={stable} testing={testing:?}"
            );
        }
    }
}

#[test]
fn fresh_install_treats_missing_local_version_as_lowest() {
    let definition = remote("1.0.0", None);
    let decision = resolve_update(&ResolveRequest {
        installed_version: None,
        remote: Some(&definition),
        testing_channel_enabled: false,
        host_api_level: 10,
    });
    assert_eq!(
        decision,
        UpdateDecision::Due {
            channel: ReleaseChannel::Stable,
            target_version: "1.0.0".to_string(),
        }
    );
}
