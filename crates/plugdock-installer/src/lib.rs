mod cleanup;
mod extract;
mod install;
mod layout;
mod markers;
mod scan;

pub use cleanup::{cleanup, CleanupReport};
pub use extract::{ArchiveExtractor, CommandExtractor};
pub use install::{InstallReport, Installer};
pub use layout::{default_store_root, default_user_prefix, StoreLayout, BINARY_EXTENSION};
pub use markers::{
    clear_disabled, clear_testing, read_markers, set_disabled, set_testing, MarkerState,
};
pub use scan::{
    disable_all_versions, installed_plugins, newest_parseable_version, plugin_fully_disabled,
    plugin_versions, read_local_manifest, write_local_manifest, InstalledVersion,
};
