//! Developer trace lines. Each line goes to the logger under [`DEV_TARGET`] and, while a
//! [`Capture`] is alive, into a per-thread buffer that tests can inspect.

use std::cell::RefCell;

/// Log target used by [`dev_trace!`](crate::dev_trace).
pub const DEV_TARGET: &str = "litedoc::dev";

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Active capture on the current thread. Dropping it discards the buffer.
#[must_use = "capture stops when the guard is dropped"]
pub struct Capture(());

impl Capture {
    /// Takes every line recorded so far.
    pub fn take(&self) -> Vec<String> {
        CAPTURED.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
    }

    pub fn lines(&self) -> Vec<String> {
        CAPTURED.with(|c| c.borrow().clone().unwrap_or_default())
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        CAPTURED.with(|c| c.borrow_mut().take());
    }
}

/// Starts recording trace lines emitted on this thread.
pub fn capture() -> Capture {
    CAPTURED.with(|c| c.replace(Some(Vec::new())));
    Capture(())
}

#[doc(hidden)]
pub fn record(line: String) {
    CAPTURED.with(|c| {
        if let Some(buf) = c.borrow_mut().as_mut() {
            buf.push(line.clone());
        }
    });
    log::trace!(target: DEV_TARGET, "{line}");
}

/// Emits a developer trace line. Formatting only happens when TRACE is enabled for
/// [`DEV_TARGET`] or a [`Capture`] is active.
#[macro_export]
macro_rules! dev_trace {
    ($($arg:tt)*) => {
        if log::log_enabled!(target: $crate::utils::devlog::DEV_TARGET, log::Level::Trace)
            || $crate::utils::devlog::is_capturing()
        {
            $crate::utils::devlog::record(format!($($arg)*));
        }
    };
}

#[doc(hidden)]
pub fn is_capturing() -> bool {
    CAPTURED.with(|c| c.borrow().is_some())
}
