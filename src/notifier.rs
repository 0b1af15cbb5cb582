//! Transient toast messages.

use std::time::{Duration, Instant};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Increases with every `show`, so front-ends can tell a new toast apart
    /// from a repeat of the same text.
    pub seq: u64,
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

/// Single-slot toast display. A new message replaces the current one and
/// restarts the hide delay.
#[derive(Debug)]
pub struct Notifier {
    delay: Duration,
    current: Option<Toast>,
    next_seq: u64,
}

impl Notifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: None,
            next_seq: 1,
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        let message = message.into();
        match kind {
            ToastKind::Success => info!(toast = %message, "toast"),
            ToastKind::Error => warn!(toast = %message, "error toast"),
        }
        self.current = Some(Toast {
            seq: self.next_seq,
            message,
            kind,
            expires_at: now + self.delay,
        });
        self.next_seq += 1;
    }

    /// The toast visible at `now`, if any.
    pub fn current_at(&self, now: Instant) -> Option<&Toast> {
        self.current.as_ref().filter(|t| now < t.expires_at)
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current_at(Instant::now())
    }

    /// Last toast shown regardless of expiry.
    pub fn last(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_hides_after_delay() {
        let mut n = Notifier::new(Duration::from_millis(3000));
        let t0 = Instant::now();
        n.show_at("Saved", ToastKind::Success, t0);
        assert_eq!(n.current_at(t0).unwrap().message, "Saved");
        assert!(n.current_at(t0 + Duration::from_millis(2999)).is_some());
        assert!(n.current_at(t0 + Duration::from_millis(3000)).is_none());
        assert!(n.last().is_some());
    }

    #[test]
    fn newer_toast_replaces_and_restarts_delay() {
        let mut n = Notifier::new(Duration::from_millis(1000));
        let t0 = Instant::now();
        n.show_at("first", ToastKind::Success, t0);
        let t1 = t0 + Duration::from_millis(800);
        n.show_at("second", ToastKind::Error, t1);
        let visible = n.current_at(t0 + Duration::from_millis(1500)).unwrap();
        assert_eq!(visible.message, "second");
        assert!(visible.is_error());
        assert_eq!(visible.seq, 2);
    }

    #[test]
    fn empty_notifier_shows_nothing() {
        let n = Notifier::default();
        assert!(n.current().is_none());
        assert_eq!(n.delay(), Duration::from_millis(3000));
    }
}
