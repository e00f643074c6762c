//! Cooperative cancellation.

#[cfg(test)]
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag polled by the generator between placement steps.
///
/// Clones share the flag, so a caller can keep one handle and move the
/// other into a background thread running the generator.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    #[cfg(test)]
    trip_after: Option<Arc<AtomicUsize>>,
}

impl CancellationToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that cancels itself on the poll after the first `polls`.
    #[cfg(test)]
    pub(crate) fn tripping_after(polls: usize) -> Self {
        Self {
            trip_after: Some(Arc::new(AtomicUsize::new(polls))),
            ..Self::default()
        }
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.count_poll();
        self.flag.load(Ordering::Acquire)
    }

    #[cfg(test)]
    fn count_poll(&self) {
        if let Some(remaining) = &self.trip_after {
            let exhausted = remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_err();
            if exhausted {
                self.cancel();
            }
        }
    }

    #[cfg(not(test))]
    #[inline]
    fn count_poll(&self) {}
}
