//! Presentation primitives: transient toast messages and a modal overlay
//! holding scoped data across its close transition.

use std::time::{Duration, Instant};

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub shown_at: Instant,
}

/// FIFO queue of transient messages.
#[derive(Debug, Default)]
pub struct Toasts {
    queue: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: impl Into<String>) {
        self.queue.push(Toast {
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    /// Toasts still visible at `now`. Expiry is checked against a supplied
    /// instant so callers (and tests) control the clock.
    pub fn active_at(&self, now: Instant) -> impl Iterator<Item = &Toast> {
        self.queue
            .iter()
            .filter(move |t| now.duration_since(t.shown_at) < TOAST_TTL)
    }

    /// Drop expired toasts and return the texts of those still active.
    pub fn drain_active(&mut self) -> Vec<String> {
        let now = Instant::now();
        let texts = self.active_at(now).map(|t| t.text.clone()).collect();
        self.queue.clear();
        texts
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// A modal overlay scoped to a value of type `T` (a form draft, a bindings
/// view). Closing is a two-step transition; the scoped value stays readable
/// until the transition finishes, so data entered mid-close is not lost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal<T> {
    #[default]
    Closed,
    Open(T),
    Closing(T),
}

impl<T> Modal<T> {
    pub fn open(&mut self, value: T) {
        *self = Modal::Open(value);
    }

    /// Begin the close transition, keeping the scoped value.
    pub fn close(&mut self) {
        if let Modal::Open(value) = std::mem::replace(self, Modal::Closed) {
            *self = Modal::Closing(value);
        }
    }

    /// Complete the close transition and drop the scoped value.
    pub fn finish_close(&mut self) {
        *self = Modal::Closed;
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Modal::Open(v) | Modal::Closing(v) => Some(v),
            Modal::Closed => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Modal::Open(v) | Modal::Closing(v) => Some(v),
            Modal::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }
}
