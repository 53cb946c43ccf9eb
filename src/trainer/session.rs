//! Pending quiz state, keyed per (user, chat).
//!
//! Holds the expected answer between "question issued" and "answer judged".
//! Keying per chat keeps concurrent conversations of the same user
//! independent. The state is deliberately not persisted; a restart simply
//! drops open questions.

use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory session store for pending quiz answers.
#[derive(Default)]
pub struct SessionStore {
    pending: Mutex<HashMap<(i64, i64), String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the expected answer for (user, chat), replacing any previous
    /// question in that chat.
    pub fn set_pending(&self, user_id: i64, chat_id: i64, answer: String) {
        let mut pending = self.pending.lock().unwrap();
        pending.insert((user_id, chat_id), answer);
    }

    /// The expected answer for (user, chat), if a question is open.
    pub fn pending(&self, user_id: i64, chat_id: i64) -> Option<String> {
        let pending = self.pending.lock().unwrap();
        pending.get(&(user_id, chat_id)).cloned()
    }

    /// Drop the open question for (user, chat), if any.
    pub fn clear_pending(&self, user_id: i64, chat_id: i64) {
        let mut pending = self.pending.lock().unwrap();
        pending.remove(&(user_id, chat_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let sessions = SessionStore::new();
        assert!(sessions.pending(1, 10).is_none());

        sessions.set_pending(1, 10, "Car".to_string());
        assert_eq!(sessions.pending(1, 10).as_deref(), Some("Car"));

        sessions.clear_pending(1, 10);
        assert!(sessions.pending(1, 10).is_none());
    }

    #[test]
    fn test_new_question_supersedes_old() {
        let sessions = SessionStore::new();
        sessions.set_pending(1, 10, "Car".to_string());
        sessions.set_pending(1, 10, "House".to_string());
        assert_eq!(sessions.pending(1, 10).as_deref(), Some("House"));
    }

    #[test]
    fn test_chats_are_isolated() {
        let sessions = SessionStore::new();
        sessions.set_pending(1, 10, "Car".to_string());
        sessions.set_pending(1, 20, "House".to_string());

        sessions.clear_pending(1, 10);
        assert!(sessions.pending(1, 10).is_none());
        assert_eq!(sessions.pending(1, 20).as_deref(), Some("House"));
    }
}
