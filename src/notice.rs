//! Transient user-facing notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How many notices are kept at once; the oldest is dropped first.
pub const MAX_NOTICES: usize = 3;

/// How long the GUI keeps a notice on screen.
pub const NOTICE_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
    next_id: u64,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message.into());
    }

    fn push(&mut self, kind: NoticeKind, message: String) {
        if self.queue.len() == MAX_NOTICES {
            self.queue.pop_front();
        }
        self.next_id += 1;
        self.queue.push_back(Notice {
            id: self.next_id,
            kind,
            message,
            raised_at: Instant::now(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn dismiss(&mut self, id: u64) {
        self.queue.retain(|n| n.id != id);
    }

    /// Drops notices raised more than `ttl` before `now`.
    pub fn expire(&mut self, now: Instant, ttl: Duration) {
        self.queue
            .retain(|n| now.saturating_duration_since(n.raised_at) < ttl);
    }

    /// Removes and returns everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_bounded() {
        let mut notices = Notices::new();
        for i in 0..5 {
            notices.success(format!("n{i}"));
        }
        assert_eq!(notices.len(), MAX_NOTICES);
        let messages: Vec<_> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["n2", "n3", "n4"]);
    }

    #[test]
    fn test_dismiss_and_drain() {
        let mut notices = Notices::new();
        notices.success("ok");
        notices.error("bad");
        let first = notices.iter().next().unwrap().id;
        notices.dismiss(first);
        assert_eq!(notices.len(), 1);
        assert!(notices.latest().unwrap().is_error());

        let drained = notices.drain();
        assert_eq!(drained.len(), 1);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_expire() {
        let mut notices = Notices::new();
        notices.success("old");
        let later = Instant::now() + NOTICE_TTL + Duration::from_millis(1);
        notices.expire(later, NOTICE_TTL);
        assert!(notices.is_empty());

        notices.success("fresh");
        notices.expire(Instant::now(), NOTICE_TTL);
        assert_eq!(notices.len(), 1);
    }
}
