use semver::Version;

pub fn parse_version(raw: &str) -> Option<Version> {
    Version::parse(raw.trim()).ok()
}
