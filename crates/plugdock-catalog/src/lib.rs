mod remote;
mod store;

pub use remote::{HttpRemoteSource, RemoteSource};
pub use store::{current_unix_timestamp, CatalogSnapshot, CatalogState, CatalogStore};

#[cfg(test)]
mod tests;
