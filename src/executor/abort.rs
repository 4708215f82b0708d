use std::sync::{
    Arc, Mutex, OnceLock, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use futures::{
    FutureExt as _,
    channel::oneshot,
    future::{self, BoxFuture, Shared},
};

/// Message of the error recorded for fields skipped after an abort.
pub const ABORTED_MESSAGE: &str = "This operation was aborted";

struct AbortState {
    aborted: AtomicBool,
    reason: OnceLock<String>,
    notify: Shared<oneshot::Receiver<()>>,
}

/// Handle aborting a request.
///
/// Dropping the controller without calling [`AbortController::abort()`]
/// leaves its signals untriggered.
pub struct AbortController {
    state: Arc<AbortState>,
    stopper: Mutex<Option<oneshot::Sender<()>>>,
}

/// Signal observed by the executor and by resolvers to stop work on a
/// request.
#[derive(Clone, Default)]
pub struct AbortSignal {
    state: Option<Arc<AbortState>>,
}

impl AbortController {
    /// Creates a controller whose signal is not triggered yet.
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            state: Arc::new(AbortState {
                aborted: AtomicBool::new(false),
                reason: OnceLock::new(),
                notify: rx.shared(),
            }),
            stopper: Mutex::new(Some(tx)),
        }
    }

    /// Signal triggered by this controller.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            state: Some(self.state.clone()),
        }
    }

    /// Triggers the signal with the default reason.
    pub fn abort(&self) {
        self.trigger(None);
    }

    /// Triggers the signal, reporting `reason` for aborted fields.
    pub fn abort_with_reason(&self, reason: impl Into<String>) {
        self.trigger(Some(reason.into()));
    }

    fn trigger(&self, reason: Option<String>) {
        if let Some(reason) = reason {
            _ = self.state.reason.set(reason);
        }
        self.state.aborted.store(true, Ordering::Release);
        let stopper = self
            .stopper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tx) = stopper {
            // The receiver is kept alive by `state`.
            _ = tx.send(());
        }
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    /// Signal that is never triggered.
    pub fn never() -> Self {
        Self::default()
    }

    /// Whether the signal was triggered.
    pub fn is_aborted(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.aborted.load(Ordering::Acquire))
    }

    /// Message describing why the signal was triggered.
    pub fn reason(&self) -> &str {
        self.state
            .as_ref()
            .and_then(|s| s.reason.get())
            .map_or(ABORTED_MESSAGE, String::as_str)
    }

    /// Completes once the signal is triggered.
    ///
    /// Never completes if the controller is dropped without aborting.
    pub fn aborted(&self) -> BoxFuture<'static, ()> {
        let Some(state) = &self.state else {
            return future::pending().boxed();
        };
        let notify = state.notify.clone();
        async move {
            if notify.await.is_err() {
                future::pending::<()>().await;
            }
        }
        .boxed()
    }
}

impl std::fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

impl std::fmt::Debug for AbortController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbortController")
            .field("signal", &self.signal())
            .finish()
    }
}
