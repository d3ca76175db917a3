//! Render-context marshalling.
//!
//! All render-affecting callbacks execute on one dedicated consumer task,
//! so visible UI mutations are serialized with respect to each other no
//! matter which worker produced the triggering state change. Components
//! never touch render-owned objects directly; they post closures here.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::shutdown::ShutdownHandle;
use crate::store::ViewState;

type RenderTask = Box<dyn FnOnce() + Send>;

/// Posting side of the render queue.
#[derive(Clone)]
pub struct RenderHandle {
    tx: mpsc::UnboundedSender<RenderTask>,
}

impl RenderHandle {
    /// Queue `f` for execution on the render context. Posts after disposal
    /// are dropped silently.
    pub fn post(&self, f: impl FnOnce() + Send + 'static) {
        let _ = self.tx.send(Box::new(f));
    }
}

/// Single-consumer task queue standing in for the toolkit's UI thread.
pub struct RenderQueue;

impl RenderQueue {
    /// Spawn the consumer task and hand back the posting side.
    pub fn spawn(shutdown: ShutdownHandle) -> (RenderHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<RenderTask>();
        let consumer = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.wait() => break,
                    task = rx.recv() => match task {
                        Some(task) => task(),
                        None => break,
                    },
                }
            }
        });
        (RenderHandle { tx }, consumer)
    }
}

/// Observe a derived slice of the snapshot stream.
///
/// Delivers the current value immediately, then only distinct changes,
/// each marshalled through the render queue. Coalescing applies: a burst
/// of mutations may collapse into one delivery of the final value.
pub fn spawn_distinct<T>(
    mut rx: watch::Receiver<ViewState>,
    render: RenderHandle,
    shutdown: ShutdownHandle,
    map: impl Fn(&ViewState) -> T + Send + 'static,
    on_change: impl Fn(T) + Send + Sync + 'static,
) -> JoinHandle<()>
where
    T: Clone + PartialEq + Send + 'static,
{
    let on_change = Arc::new(on_change);
    tokio::spawn(async move {
        let mut last: Option<T> = None;
        loop {
            let current = map(&rx.borrow_and_update());
            if last.as_ref() != Some(&current) {
                last = Some(current.clone());
                let deliver = Arc::clone(&on_change);
                render.post(move || deliver(current));
            }
            tokio::select! {
                _ = shutdown.wait() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    })
}
