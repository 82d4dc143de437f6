use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use plugdock_core::{catalog_from_json_str, PluginDefinition};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    Unknown,
    InProgress,
    Success,
    Fail,
}

impl CatalogState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::InProgress => "in-progress",
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub plugins: Vec<PluginDefinition>,
    pub fetched_at_unix: u64,
}

impl CatalogSnapshot {
    pub fn find_by_display_name(&self, display_name: &str) -> Option<&PluginDefinition> {
        self.plugins
            .iter()
            .find(|definition| definition.display_name == display_name)
    }
}

#[derive(Debug)]
struct CatalogInner {
    state: CatalogState,
    snapshot: Option<Arc<CatalogSnapshot>>,
    last_error: Option<String>,
}

#[derive(Debug)]
pub struct CatalogStore {
    inner: Mutex<CatalogInner>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CatalogInner {
                state: CatalogState::Unknown,
                snapshot: None,
                last_error: None,
            }),
        }
    }

    pub fn state(&self) -> CatalogState {
        self.lock().state
    }

    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.lock().snapshot.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn refresh(
        self: &Arc<Self>,
        remote: Arc<dyn crate::RemoteSource>,
    ) -> thread::JoinHandle<CatalogState> {
        let store = Arc::clone(self);
        thread::spawn(move || store.refresh_blocking(remote.as_ref()))
    }

    pub fn refresh_blocking(&self, remote: &dyn crate::RemoteSource) -> CatalogState {
        self.lock().state = CatalogState::InProgress;

        match fetch_snapshot(remote) {
            Ok(snapshot) => {
                debug!(plugins = snapshot.plugins.len(), "catalog refreshed");
                let mut inner = self.lock();
                inner.snapshot = Some(Arc::new(snapshot));
                inner.last_error = None;
                inner.state = CatalogState::Success;
            }
            Err(err) => {
                warn!("catalog refresh failed: {err:#}");
                let mut inner = self.lock();
                inner.last_error = Some(format!("{err:#}"));
                inner.state = CatalogState::Fail;
            }
        }

        self.lock().state
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn fetch_snapshot(remote: &dyn crate::RemoteSource) -> Result<CatalogSnapshot> {
    let raw = remote.fetch_catalog().context("catalog fetch failed")?;
    let plugins = catalog_from_json_str(&raw)?;
    Ok(CatalogSnapshot {
        plugins,
        fetched_at_unix: current_unix_timestamp(),
    })
}

pub fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
