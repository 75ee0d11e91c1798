//! Session-scoped notice board.
//!
//! Each editing session owns its own board and hands it to whatever view is
//! rendering that session. There is no process-wide registry.

use tracing::debug;
use uuid::Uuid;

use rolekit_contracts::notice::{Notice, NoticeLevel};

#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notice and return its id.
    pub fn raise(&mut self, notice: Notice) -> Uuid {
        debug!(
            notice_id = %notice.id,
            level = ?notice.level,
            retryable = notice.retryable,
            message = %notice.message,
            "notice raised"
        );
        let id = notice.id;
        self.notices.push(notice);
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> Uuid {
        self.raise(Notice::new(NoticeLevel::Info, message))
    }

    pub fn success(&mut self, message: impl Into<String>) -> Uuid {
        self.raise(Notice::new(NoticeLevel::Success, message))
    }

    pub fn warning(&mut self, message: impl Into<String>) -> Uuid {
        self.raise(Notice::new(NoticeLevel::Warning, message))
    }

    pub fn error(&mut self, message: impl Into<String>) -> Uuid {
        self.raise(Notice::new(NoticeLevel::Error, message))
    }

    /// Remove one notice. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Notices still showing, oldest first.
    pub fn active(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Hand every pending notice to the renderer and clear the board.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
