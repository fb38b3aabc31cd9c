// svckit/src/notify.rs
//
// Transient user-facing notifications (toasts)

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub timestamp: DateTime<Local>,
    pub level: NoticeLevel,
    pub message: String,
}

/// Shared, bounded board of notices. Clones share the same board.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    inner: Arc<Mutex<VecDeque<Notice>>>,
    capacity: usize,
}

impl NoticeBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    /// Generic failure notice naming the attempted action,
    /// e.g. "Erreur lors de la création du club. Veuillez réessayer."
    pub fn failure(&self, action: &str) {
        self.error(format!("Erreur lors {}. Veuillez réessayer.", action));
    }

    fn push(&self, level: NoticeLevel, message: String) {
        let mut notices = self.inner.lock();
        notices.push_back(Notice {
            timestamp: Local::now(),
            level,
            message,
        });
        while notices.len() > self.capacity {
            notices.pop_front();
        }
    }

    /// Newest last.
    pub fn snapshot(&self) -> Vec<Notice> {
        self.inner.lock().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<Notice> {
        self.inner.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_names_action() {
        let board = NoticeBoard::default();
        board.failure("de la suppression du match");
        let notice = board.latest().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(
            notice.message,
            "Erreur lors de la suppression du match. Veuillez réessayer."
        );
    }

    #[test]
    fn test_board_is_bounded() {
        let board = NoticeBoard::new(3);
        for i in 0..5 {
            board.info(format!("notice {}", i));
        }
        let messages: Vec<_> = board.snapshot().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["notice 2", "notice 3", "notice 4"]);
    }

    #[test]
    fn test_clones_share_board() {
        let board = NoticeBoard::default();
        let other = board.clone();
        other.success("Club créé avec succès");
        assert_eq!(board.len(), 1);
    }
}
