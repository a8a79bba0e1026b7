use parking_lot::Mutex;
use tracing::info;

/// The navigation boundary: a full-page redirect to `path`.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Records redirects for the host shell to act on. Nothing is navigated until
/// the host drains the queue.
#[derive(Debug, Default)]
pub struct PendingNavigator {
    pending: Mutex<Vec<String>>,
}

impl PendingNavigator {
    pub fn new() -> Self { Self::default() }

    pub fn take_pending(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn redirect_count(&self) -> usize { self.pending.lock().len() }

    pub fn last(&self) -> Option<String> { self.pending.lock().last().cloned() }
}

impl Navigator for PendingNavigator {
    fn redirect(&self, path: &str) {
        self.pending.lock().push(path.to_string());
    }
}

/// Logs the redirect. Used by the CLI, where "navigating to login" means
/// telling the operator to sign in again.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect(&self, path: &str) {
        info!(target: "stockdash::session", path, "redirect to login entry point");
    }
}
