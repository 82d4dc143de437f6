use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use plugdock_core::ReleaseChannel;

use crate::{CatalogSnapshot, CatalogState, CatalogStore, RemoteSource};

struct ScriptedRemote {
    catalog_responses: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedRemote {
    fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            catalog_responses: Mutex::new(responses.into()),
        }
    }
}

impl RemoteSource for ScriptedRemote {
    fn fetch_catalog(&self) -> Result<String> {
        let next = self
            .catalog_responses
            .lock()
            .expect("scripted remote lock")
            .pop_front()
            .expect("unexpected catalog fetch");
        next.map_err(|reason| anyhow!(reason))
    }

    fn fetch_manifest(&self, _channel: ReleaseChannel, _internal_name: &str) -> Result<String> {
        Err(anyhow!("manifest fetch not scripted"))
    }

    fn download_artifact(
        &self,
        _internal_name: &str,
        _is_update: bool,
        _channel: ReleaseChannel,
    ) -> Result<Vec<u8>> {
        Err(anyhow!("artifact download not scripted"))
    }
}

fn catalog_json() -> String {
    r#"[
        {"internalName": "zeta", "displayName": "Zeta", "stableVersion": "1.0.0", "minApiLevel": 1},
        {"internalName": "alpha", "displayName": "Alpha", "stableVersion": "2.0.0", "minApiLevel": 1}
    ]"#
    .to_string()
}

#[test]
fn new_store_has_no_snapshot() {
    let store = CatalogStore::new();
    assert_eq!(store.state(), CatalogState::Unknown);
    assert!(store.current().is_none());
    assert!(store.last_error().is_none());
}

#[test]
fn refresh_success_stores_sorted_snapshot() {
    let store = CatalogStore::new();
    let remote = ScriptedRemote::new(vec![Ok(catalog_json())]);

    let state = store.refresh_blocking(&remote);
    assert_eq!(state, CatalogState::Success);

    let snapshot = store.current().expect("snapshot must exist");
    let names: Vec<&str> = snapshot
        .plugins
        .iter()
        .map(|definition| definition.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
    assert!(store.last_error().is_none());
}

#[test]
fn refresh_failure_retains_previous_snapshot() {
    let store = CatalogStore::new();
    let remote = ScriptedRemote::new(vec![
        Ok(catalog_json()),
        Err("connection refused".to_string()),
    ]);

    assert_eq!(store.refresh_blocking(&remote), CatalogState::Success);
    let first = store.current().expect("snapshot must exist");

    assert_eq!(store.refresh_blocking(&remote), CatalogState::Fail);
    let second = store.current().expect("previous snapshot must be retained");
    assert_eq!(first, second);
    assert!(store
        .last_error()
        .expect("failure must be recorded")
        .contains("connection refused"));
}

#[test]
fn refresh_parse_failure_is_recoverable() {
    let store = CatalogStore::new();
    let remote = ScriptedRemote::new(vec![
        Ok("{not json".to_string()),
        Ok(catalog_json()),
    ]);

    assert_eq!(store.refresh_blocking(&remote), CatalogState::Fail);
    assert!(store.current().is_none());

    assert_eq!(store.refresh_blocking(&remote), CatalogState::Success);
    assert!(store.current().is_some());
    assert!(store.last_error().is_none());
}

#[test]
fn refresh_on_worker_thread_joins_with_final_state() {
    let store = Arc::new(CatalogStore::new());
    let remote: Arc<dyn RemoteSource> = Arc::new(ScriptedRemote::new(vec![Ok(catalog_json())]));

    let handle = store.refresh(remote);
    let state = handle.join().expect("refresh thread must join");
    assert_eq!(state, CatalogState::Success);
    assert_eq!(store.state(), CatalogState::Success);
    assert!(store.current().is_some());
}

#[test]
fn find_by_display_name_returns_first_match() {
    let snapshot = CatalogSnapshot {
        plugins: plugdock_core::catalog_from_json_str(
            r#"[
                {"internalName": "first", "displayName": "Dup"},
                {"internalName": "second", "displayName": "Dup"}
            ]"#,
        )
        .expect("must parse"),
        fetched_at_unix: 0,
    };

    let matched = snapshot
        .find_by_display_name("Dup")
        .expect("must find entry");
    assert_eq!(matched.internal_name, "first");
    assert!(snapshot.find_by_display_name("Missing").is_none());
}
