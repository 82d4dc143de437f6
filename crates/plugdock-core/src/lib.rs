mod channel;
mod definition;
mod host;
mod policy;
mod version;

pub use channel::ReleaseChannel;
pub use definition::{catalog_from_json_str, validate_internal_name, PluginDefinition};
pub use host::{DetachedHost, PluginHost};
pub use policy::{FixedPolicy, UpdatePolicy};
pub use version::parse_version;
