// Explicit logging capability handed to each component.
// Wraps a tracing dispatcher so nothing depends on a process-global subscriber.

use tracing::Dispatch;

/// Logging capability. The default discards everything.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    enabled: bool,
}

impl Logger {
    /// Logger that drops all events.
    pub fn noop() -> Self {
        Self {
            dispatch: Dispatch::none(),
            enabled: false,
        }
    }

    /// Logger backed by the given subscriber.
    pub fn new(subscriber: impl tracing::Subscriber + Send + Sync + 'static) -> Self {
        Self {
            dispatch: Dispatch::new(subscriber),
            enabled: true,
        }
    }

    /// Whether events sent through this logger go anywhere.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run `f` with this logger as the active dispatcher.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
