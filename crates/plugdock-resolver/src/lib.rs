use plugdock_core::{parse_version, PluginDefinition, ReleaseChannel};
use semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unavailable,
    Incompatible,
    NoParseableVersion,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Incompatible => "incompatible",
            Self::NoParseableVersion => "no-parseable-version",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    UpToDate,
    Skip { reason: SkipReason },
    Due { channel: ReleaseChannel, target_version: String },
}

#[derive(Debug, Clone)]
pub struct ResolveRequest<'a> {
    pub installed_version: Option<Version>,
    pub remote: Option<&'a PluginDefinition>,
    pub testing_channel_enabled: bool,
    pub host_api_level: u32,
}

pub fn resolve_update(request: &ResolveRequest) -> UpdateDecision {
    let Some(remote) = request.remote else {
        return UpdateDecision::Skip {
            reason: SkipReason::Unavailable,
        };
    };

    if remote.min_api_level > request.host_api_level {
        return UpdateDecision::Skip {
            reason: SkipReason::Incompatible,
        };
    }

    let stable = parse_version(&remote.stable_version);
    let testing = remote
        .testing_version
        .as_deref()
        .and_then(parse_version);

    if stable.is_none() && testing.is_none() {
        return UpdateDecision::Skip {
            reason: SkipReason::NoParseableVersion,
        };
    }

    // Option<Version> orders None below any parsed version, which gives
    // unparsable-local-sorts-lowest for free.
    let stable_newer = stable > request.installed_version;
    let testing_eligible =
        request.testing_channel_enabled && testing > request.installed_version;

    if !stable_newer && !testing_eligible {
        return UpdateDecision::UpToDate;
    }

    let use_testing =
        testing_eligible || (remote.testing_only && request.testing_channel_enabled);
    if use_testing {
        return match testing {
            Some(version) => UpdateDecision::Due {
                channel: ReleaseChannel::Testing,
                target_version: version.to_string(),
            },
            None => UpdateDecision::Skip {
                reason: SkipReason::NoParseableVersion,
            },
        };
    }

    match stable {
        Some(version) => UpdateDecision::Due {
            channel: ReleaseChannel::Stable,
            target_version: version.to_string(),
        },
        None => UpdateDecision::Skip {
            reason: SkipReason::NoParseableVersion,
        },
    }
}

#[cfg(test)]
mod tests;
