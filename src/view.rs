//! The master-detail entry view orchestrator.
//!
//! `EntryListView` owns the state store and every task it spawns
//! (ingestion, observers, the render-queue consumer) and cancels the whole
//! set on disposal. All user gestures resolve into serialized mutations
//! against the store; session writes are confirmed before the state machine
//! is allowed to move.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ViewConfig;
use crate::detail::{DetailIntent, DetailState};
use crate::error::SessionError;
use crate::filter;
use crate::ingest;
use crate::model::{Entry, EntryDetail, EntryInfo};
use crate::render::{spawn_distinct, RenderHandle, RenderQueue};
use crate::session::Session;
use crate::shutdown::ShutdownCoordinator;
use crate::store::{Notice, StateStore, ViewState};

/// Master-detail view over one directory of vault entries.
pub struct EntryListView {
    store: Arc<StateStore>,
    session: Arc<dyn Session>,
    render: RenderHandle,
    shutdown: ShutdownCoordinator,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl EntryListView {
    /// Construct the view and start ingestion for `initial_directory`.
    ///
    /// Must be called from within a tokio runtime; the directory stream,
    /// the cache load and the render-queue consumer are spawned immediately.
    pub fn start(
        config: ViewConfig,
        session: Arc<dyn Session>,
        initial_directory: impl Into<String>,
    ) -> Arc<Self> {
        let directory = initial_directory.into();
        info!(directory = %directory, "entry view starting");

        let store = Arc::new(StateStore::new(
            ViewState::new(directory.clone()),
            config.match_policy,
        ));
        let shutdown = ShutdownCoordinator::new();
        let (render, consumer) = RenderQueue::spawn(shutdown.handle());

        let view = Arc::new(Self {
            store,
            session,
            render,
            shutdown,
            tasks: Mutex::new(vec![consumer]),
        });

        view.spawn_tracked(ingest::run_directory_stream(
            Arc::clone(&view.store),
            Arc::clone(&view.session),
            view.shutdown.handle(),
        ));
        view.spawn_tracked(ingest::load_entry_list(
            Arc::clone(&view.store),
            Arc::clone(&view.session),
            directory,
            view.shutdown.handle(),
        ));

        view
    }

    /// Coalescing snapshot stream for the rendering collaborator.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.store.subscribe()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> ViewState {
        self.store.snapshot()
    }

    // ------------------------------------------------------------------
    // Derived signals, marshalled through the render queue
    // ------------------------------------------------------------------

    /// Entry-counter label: the total alone while unfiltered,
    /// `filtered/total` while a filter is active.
    pub fn observe_count_label(&self, on_change: impl Fn(String) + Send + Sync + 'static) {
        self.observe(
            |s| filter::count_label(s.filtered_entries.len(), s.entry_list.len(), &s.filter_text),
            on_change,
        );
    }

    /// Refresh-control enablement; disabled while a rebuild is in flight.
    pub fn observe_refresh_enabled(&self, on_change: impl Fn(bool) + Send + Sync + 'static) {
        self.observe(|s| !s.regenerating_cache, on_change);
    }

    /// Detail-pane state, driving pane contents and the action-button set.
    pub fn observe_detail(&self, on_change: impl Fn(DetailState) + Send + Sync + 'static) {
        self.observe(|s| s.detail.clone(), on_change);
    }

    /// List enablement: the list is locked while a form is open.
    pub fn observe_selection_locked(&self, on_change: impl Fn(bool) + Send + Sync + 'static) {
        self.observe(|s| s.detail.locks_selection(), on_change);
    }

    /// Directory names for the namespace chooser.
    pub fn observe_directory_list(&self, on_change: impl Fn(Vec<String>) + Send + Sync + 'static) {
        self.observe(|s| s.directory_list.clone(), on_change);
    }

    /// Filtered entries for the list widget.
    pub fn observe_filtered_entries(
        &self,
        on_change: impl Fn(Vec<Entry>) + Send + Sync + 'static,
    ) {
        self.observe(|s| s.filtered_entries.clone(), on_change);
    }

    /// Inline failure notices.
    pub fn observe_notice(&self, on_change: impl Fn(Option<Notice>) + Send + Sync + 'static) {
        self.observe(|s| s.notice.clone(), on_change);
    }

    fn observe<T>(
        &self,
        map: impl Fn(&ViewState) -> T + Send + 'static,
        on_change: impl Fn(T) + Send + Sync + 'static,
    ) where
        T: Clone + PartialEq + Send + 'static,
    {
        let handle = spawn_distinct(
            self.store.subscribe(),
            self.render.clone(),
            self.shutdown.handle(),
            map,
            on_change,
        );
        self.tasks.lock().push(handle);
    }

    // ------------------------------------------------------------------
    // User gestures
    // ------------------------------------------------------------------

    /// List selection settled on `index` within the filtered entries.
    ///
    /// Ignored mid-drag. The index is resolved against the filtered list
    /// inside the mutation, so a concurrent fold cannot skew it. While a
    /// form is open the reducer drops the event — the pane stays locked to
    /// the in-progress operation.
    pub async fn selection_changed(&self, index: Option<usize>, is_adjusting: bool) {
        if is_adjusting {
            return;
        }
        self.store
            .mutate(|s| {
                let entry = index.and_then(|i| s.filtered_entries.get(i)).cloned();
                s.dispatch_detail(DetailIntent::SelectionChanged { entry });
            })
            .await;
    }

    /// Filter-box edit.
    pub async fn set_filter(&self, text: impl Into<String>) {
        let text = text.into();
        self.store.mutate(move |s| s.filter_text = text).await;
    }

    /// Counter-label click: drop the filter.
    pub async fn clear_filter(&self) {
        self.set_filter("").await;
    }

    /// "New entry" action.
    pub async fn begin_create(&self) {
        self.store
            .mutate(|s| s.dispatch_detail(DetailIntent::BeginCreate))
            .await;
    }

    /// "Edit" action on the viewed entry.
    pub async fn begin_edit(&self) {
        self.store
            .mutate(|s| s.dispatch_detail(DetailIntent::BeginEdit))
            .await;
    }

    /// Cancel the open form.
    pub async fn cancel_edit(&self) {
        self.store
            .mutate(|s| s.dispatch_detail(DetailIntent::Cancel))
            .await;
    }

    /// Commit the open form.
    ///
    /// The session call must succeed before the state machine moves: on
    /// failure the form stays open, a notice is surfaced and the error is
    /// returned to the caller.
    pub async fn save(&self, info: EntryInfo, detail: EntryDetail) -> Result<(), SessionError> {
        let snapshot = self.store.snapshot();
        match snapshot.detail {
            DetailState::Creating { .. } => {
                match self
                    .session
                    .create_entry(&snapshot.directory, info, detail)
                    .await
                {
                    Ok(entry) => {
                        info!(id = %entry.info.id, "entry created");
                        self.store
                            .mutate(move |s| {
                                s.upsert_entry(entry.clone());
                                s.notice = None;
                                s.dispatch_detail(DetailIntent::SaveCommitted { entry });
                            })
                            .await;
                        Ok(())
                    }
                    Err(err) => {
                        warn!(error = %err, "create rejected by session");
                        self.store
                            .mutate(|s| s.notice = Some(Notice::session(&err)))
                            .await;
                        Err(err)
                    }
                }
            }
            DetailState::Editing { entry: existing } => {
                // Identity never changes on edit; only name, type and
                // payload do.
                let info = EntryInfo {
                    id: existing.info.id.clone(),
                    directory: existing.info.directory.clone(),
                    ..info
                };
                match self
                    .session
                    .update_entry(&snapshot.directory, existing.id(), info.clone(), detail.clone())
                    .await
                {
                    Ok(()) => {
                        info!(id = %info.id, "entry updated");
                        let entry = Entry::new(info, detail);
                        self.store
                            .mutate(move |s| {
                                s.upsert_entry(entry.clone());
                                s.notice = None;
                                s.dispatch_detail(DetailIntent::SaveCommitted { entry });
                            })
                            .await;
                        Ok(())
                    }
                    Err(err) => {
                        warn!(error = %err, "update rejected by session");
                        self.store
                            .mutate(|s| s.notice = Some(Notice::session(&err)))
                            .await;
                        Err(err)
                    }
                }
            }
            _ => {
                debug!("save ignored outside an open form");
                Ok(())
            }
        }
    }

    /// Delete the viewed entry after the user confirmed.
    ///
    /// Two-phase: the local removal commits only once the session confirmed
    /// the delete. On failure the entry and the viewing state survive.
    pub async fn delete_confirmed(&self) -> Result<(), SessionError> {
        let snapshot = self.store.snapshot();
        let DetailState::Viewing { entry, .. } = snapshot.detail else {
            debug!("delete ignored outside viewing");
            return Ok(());
        };
        match self
            .session
            .delete_entry(&entry.info.directory, entry.id())
            .await
        {
            Ok(()) => {
                info!(id = %entry.info.id, "entry deleted");
                self.store
                    .mutate(move |s| {
                        s.remove_entry(&entry.info.id);
                        s.notice = None;
                        s.dispatch_detail(DetailIntent::DeleteCommitted);
                    })
                    .await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "delete rejected by session");
                self.store
                    .mutate(|s| s.notice = Some(Notice::session(&err)))
                    .await;
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Cache refresh and directory switching
    // ------------------------------------------------------------------

    /// Force refresh: start an authoritative cache rebuild.
    ///
    /// A no-op while a rebuild is already in flight, so a doubled gesture
    /// starts exactly one stream.
    pub async fn request_refresh(&self) {
        let directory = self.store.snapshot().directory;
        if !ingest::begin_rebuild(&self.store, &directory).await {
            return;
        }
        self.spawn_tracked(ingest::run_rebuild(
            Arc::clone(&self.store),
            Arc::clone(&self.session),
            directory,
            self.shutdown.handle(),
        ));
    }

    /// Reload from the cache without rebuilding it.
    ///
    /// TODO wire up once the session exposes a cheap cache re-read that
    /// bypasses the rebuild stream.
    pub async fn request_cache_reload(&self) {
        debug!("cache-only reload requested; not implemented");
    }

    /// Switch the view to another directory.
    ///
    /// Resets the entry list, filter and detail pane, then re-runs the
    /// cache load protocol for the new directory.
    pub async fn switch_directory(&self, directory: impl Into<String>) {
        let directory = directory.into();
        info!(directory = %directory, "switching directory");
        let target = directory.clone();
        self.store
            .mutate(move |s| {
                s.directory = target;
                s.entry_list.clear();
                s.filter_text.clear();
                s.notice = None;
                s.regenerating_cache = false;
                s.detail = DetailState::Empty {
                    user_triggered: false,
                };
            })
            .await;
        self.spawn_tracked(ingest::load_entry_list(
            Arc::clone(&self.store),
            Arc::clone(&self.session),
            directory,
            self.shutdown.handle(),
        ));
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Tear the view down: signal shutdown and cancel every task it owns.
    pub fn dispose(&self) {
        self.shutdown.signal();
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }

    fn spawn_tracked(&self, fut: impl Future<Output = ()> + Send + 'static) {
        self.tasks.lock().push(tokio::spawn(fut));
    }
}

impl Drop for EntryListView {
    fn drop(&mut self) {
        self.dispose();
    }
}
