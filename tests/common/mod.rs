//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use vaultview::{
    DetailFieldKind, DirectoryStream, Entry, EntryDetail, EntryDetailItem, EntryInfo, EntryStream,
    EntryType, Session, SessionError, StreamError, ViewState,
};

/// Initialize tracing output for a test (idempotent).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn entry(id: &str, name: &str, directory: &str) -> Entry {
    Entry::new(
        EntryInfo {
            id: id.to_string(),
            name: name.to_string(),
            entry_type: EntryType::Login,
            directory: directory.to_string(),
        },
        EntryDetail::default(),
    )
}

pub fn entry_info(name: &str, directory: &str) -> EntryInfo {
    EntryInfo {
        id: String::new(),
        name: name.to_string(),
        entry_type: EntryType::Login,
        directory: directory.to_string(),
    }
}

pub fn login_detail(username: &str, password: &str) -> EntryDetail {
    EntryDetail {
        items: vec![
            EntryDetailItem {
                kind: DetailFieldKind::Username,
                value: username.to_string(),
            },
            EntryDetailItem {
                kind: DetailFieldKind::Password,
                value: password.to_string(),
            },
        ],
    }
}

/// Await until the view's snapshot satisfies `pred`, or panic after two
/// seconds with the last snapshot seen.
pub async fn wait_for(
    view: &vaultview::EntryListView,
    pred: impl Fn(&ViewState) -> bool,
) -> ViewState {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    let mut rx = view.subscribe();
    loop {
        let snapshot = rx.borrow_and_update().clone();
        if pred(&snapshot) {
            return snapshot;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("state never satisfied predicate; last snapshot: {snapshot:#?}");
        }
        let _ = tokio::time::timeout(Duration::from_millis(25), rx.changed()).await;
    }
}

/// Poll until `pred` holds, or panic after two seconds.
pub async fn wait_until(pred: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !pred() {
        if tokio::time::Instant::now() > deadline {
            panic!("condition never satisfied");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

type StreamItem = Result<Entry, StreamError>;

struct MockInner {
    cache: HashMap<String, Vec<Entry>>,
    rebuild: HashMap<String, Vec<StreamItem>>,
    manual_rebuild: Option<mpsc::UnboundedReceiver<StreamItem>>,
    rebuild_streams_started: usize,
    fail_create: bool,
    fail_update: bool,
    fail_delete: bool,
}

/// Scriptable storage session.
///
/// Entries come from canned caches and rebuild lists; failures are armed
/// per operation. A rebuild stream can also be driven by hand through a
/// channel so tests can hold one open across assertions.
pub struct MockSession {
    directories: Vec<String>,
    directory_error: Option<StreamError>,
    inner: Mutex<MockInner>,
}

impl MockSession {
    pub fn new(directories: &[&str]) -> Self {
        Self {
            directories: directories.iter().map(|d| d.to_string()).collect(),
            directory_error: None,
            inner: Mutex::new(MockInner {
                cache: HashMap::new(),
                rebuild: HashMap::new(),
                manual_rebuild: None,
                rebuild_streams_started: 0,
                fail_create: false,
                fail_update: false,
                fail_delete: false,
            }),
        }
    }

    /// Terminate the directory stream with `error` after the canned names.
    pub fn with_directory_error(mut self, error: StreamError) -> Self {
        self.directory_error = Some(error);
        self
    }

    /// Serve `entries` from the fast-path cache for `directory`.
    pub fn with_cache(self, directory: &str, entries: Vec<Entry>) -> Self {
        self.inner.lock().cache.insert(directory.to_string(), entries);
        self
    }

    /// Serve `items` from the rebuild stream for `directory`.
    pub fn with_rebuild(self, directory: &str, items: Vec<StreamItem>) -> Self {
        self.inner.lock().rebuild.insert(directory.to_string(), items);
        self
    }

    /// Arm a hand-driven rebuild stream; the next rebuild consumes it.
    /// Dropping the returned sender ends the stream.
    pub fn arm_manual_rebuild(&self) -> mpsc::UnboundedSender<StreamItem> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().manual_rebuild = Some(rx);
        tx
    }

    pub fn rebuild_streams_started(&self) -> usize {
        self.inner.lock().rebuild_streams_started
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.inner.lock().fail_create = fail;
    }

    pub fn set_fail_update(&self, fail: bool) {
        self.inner.lock().fail_update = fail;
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.inner.lock().fail_delete = fail;
    }
}

#[async_trait]
impl Session for MockSession {
    fn stream_directory_list(&self) -> DirectoryStream {
        let mut items: Vec<Result<String, StreamError>> =
            self.directories.iter().cloned().map(Ok).collect();
        if let Some(err) = &self.directory_error {
            items.push(Err(err.clone()));
        }
        Box::pin(stream::iter(items))
    }

    async fn entry_list_cache(&self, directory: &str) -> Option<Vec<Entry>> {
        self.inner.lock().cache.get(directory).cloned()
    }

    fn create_entry_list_cache_streaming(&self, directory: &str) -> EntryStream {
        let mut inner = self.inner.lock();
        inner.rebuild_streams_started += 1;
        if let Some(rx) = inner.manual_rebuild.take() {
            return Box::pin(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            }));
        }
        let items = inner.rebuild.get(directory).cloned().unwrap_or_default();
        Box::pin(stream::iter(items))
    }

    async fn create_entry(
        &self,
        directory: &str,
        info: EntryInfo,
        detail: EntryDetail,
    ) -> Result<Entry, SessionError> {
        if self.inner.lock().fail_create {
            return Err(SessionError::CreateFailed {
                reason: "mock backend rejected create".to_string(),
            });
        }
        Ok(Entry::new(
            EntryInfo {
                id: uuid::Uuid::new_v4().to_string(),
                directory: directory.to_string(),
                ..info
            },
            detail,
        ))
    }

    async fn update_entry(
        &self,
        _directory: &str,
        id: &str,
        _info: EntryInfo,
        _detail: EntryDetail,
    ) -> Result<(), SessionError> {
        if self.inner.lock().fail_update {
            return Err(SessionError::UpdateFailed {
                id: id.to_string(),
                reason: "mock backend rejected update".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_entry(&self, _directory: &str, id: &str) -> Result<(), SessionError> {
        if self.inner.lock().fail_delete {
            return Err(SessionError::DeleteFailed {
                id: id.to_string(),
                reason: "mock backend rejected delete".to_string(),
            });
        }
        Ok(())
    }
}
