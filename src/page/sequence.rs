//! page::sequence
//!
//! Request ordering and busy indicators.
//!
//! # Design
//!
//! A store may have several calls of the same kind in flight (a user pages
//! quickly, or picks another row before the previous detail arrives). Each
//! call takes a [`Ticket`] from the [`RequestSequencer`] for its kind; when
//! the response arrives the store asks whether the ticket is still the
//! newest one and drops stale responses.
//!
//! Spinners are counters, not booleans. A [`SpinnerGuard`] raises its
//! spinner on creation and lowers it on drop, so the flag stays up until the
//! last overlapping call finishes, including calls whose future was dropped.
//!
//! # Example
//!
//! ```
//! use pagestore::page::sequence::{RequestSequencer, Spinner};
//!
//! let seq = RequestSequencer::new();
//! let first = seq.issue();
//! let second = seq.issue();
//! assert!(!seq.is_latest(first));
//! assert!(seq.is_latest(second));
//!
//! let spinner = Spinner::new();
//! {
//!     let _a = spinner.raise();
//!     let _b = spinner.raise();
//!     assert!(spinner.is_spinning());
//! }
//! assert!(!spinner.is_spinning());
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Position of a call in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// The raw sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic ticket issuer for one kind of request.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket. Tickets start at 1.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued ticket, without issuing a new one.
    pub fn current(&self) -> Ticket {
        Ticket(self.latest.load(Ordering::SeqCst))
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// A counted busy indicator.
///
/// Cloning shares the counter.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    active: Arc<AtomicUsize>,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the spinner until the returned guard is dropped.
    pub fn raise(&self) -> SpinnerGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        SpinnerGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// Whether at least one guard is alive.
    pub fn is_spinning(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }
}

/// RAII guard holding a spinner raised.
#[derive(Debug)]
#[must_use = "the spinner lowers as soon as the guard is dropped"]
pub struct SpinnerGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_are_monotonic() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
        assert_eq!(a.value(), 1);
        assert_eq!(b.value(), 2);
    }

    #[test]
    fn current_does_not_issue() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        assert_eq!(seq.current(), a);
        assert!(seq.is_latest(seq.current()));
    }

    #[test]
    fn only_newest_ticket_is_latest() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        assert!(seq.is_latest(a));
        let b = seq.issue();
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
    }

    #[test]
    fn spinner_counts_overlapping_guards() {
        let spinner = Spinner::new();
        assert!(!spinner.is_spinning());

        let a = spinner.raise();
        let b = spinner.raise();
        drop(a);
        assert!(spinner.is_spinning());
        drop(b);
        assert!(!spinner.is_spinning());
    }

    #[test]
    fn cloned_spinner_shares_state() {
        let spinner = Spinner::new();
        let view = spinner.clone();
        let _guard = spinner.raise();
        assert!(view.is_spinning());
    }
}
