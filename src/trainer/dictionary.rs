//! Personal dictionary: registration with common-word seeding, add/remove,
//! and free-form lookup.

use std::sync::Arc;

use tracing::info;

use crate::trainer::error::TrainerError;
use crate::trainer::store::{UserProfile, VocabStore, Word};

pub struct Dictionary {
    store: Arc<VocabStore>,
}

impl Dictionary {
    pub fn new(store: Arc<VocabStore>) -> Self {
        Self { store }
    }

    /// Make sure the shared dictionary contains the configured starter pairs.
    /// Existing entries are left alone, so this is safe to run every start.
    pub fn ensure_seed_words(&self, pairs: &[(String, String)]) -> Result<usize, TrainerError> {
        let before = self.store.word_count()?;
        for (source, target) in pairs {
            self.store.create_word(source.trim(), target.trim())?;
        }
        let added = self.store.word_count()? - before;
        if added > 0 {
            info!("Seeded {} common words into the dictionary", added);
        }
        Ok(added)
    }

    /// Register the user and, on first contact only, subscribe them to every
    /// word in the dictionary. The zero-subscription guard means existing
    /// users are never re-seeded, even after the dictionary grows.
    pub fn register_user(&self, profile: &UserProfile) -> Result<u32, TrainerError> {
        self.store.upsert_user(profile)?;

        let count = self.store.subscription_count(profile.user_id)?;
        if count > 0 {
            return Ok(count);
        }

        for word in self.store.all_words()? {
            self.store.add_subscription(profile.user_id, word.word_id)?;
        }
        let seeded = self.store.subscription_count(profile.user_id)?;
        info!(
            "New user {} subscribed to {} common words",
            profile.user_id, seeded
        );
        Ok(seeded)
    }

    /// Add a word pair for the user. Reuses a case-insensitive matching
    /// dictionary entry when one exists; adding the same pair twice is a
    /// no-op. Returns the user's updated subscription count.
    pub fn add_word(
        &self,
        user_id: i64,
        source: &str,
        target: &str,
    ) -> Result<u32, TrainerError> {
        let source = source.trim();
        let target = target.trim();
        if source.is_empty() {
            return Err(TrainerError::Validation("source text is empty".into()));
        }
        if target.is_empty() {
            return Err(TrainerError::Validation("target text is empty".into()));
        }

        let word = match self.store.find_word(source, target)? {
            Some(existing) => existing,
            None => self.store.create_word(source, target)?,
        };
        self.store.add_subscription(user_id, word.word_id)?;
        self.store.subscription_count(user_id)
    }

    /// Remove the user's subscription for a pair. Unknown pairs and
    /// already-removed subscriptions are silent no-ops.
    pub fn remove_word(
        &self,
        user_id: i64,
        source: &str,
        target: &str,
    ) -> Result<(), TrainerError> {
        if let Some(word) = self.store.find_word(source.trim(), target.trim())? {
            self.store.remove_subscription(user_id, word.word_id)?;
        }
        Ok(())
    }

    /// Free-form lookup: the text is tried as a source word first, then as a
    /// target word, case-insensitively.
    pub fn lookup(&self, text: &str) -> Result<Option<Word>, TrainerError> {
        self.store.find_translation(text.trim())
    }

    /// The user's drilled words, for the delete keyboard.
    pub fn subscribed_words(&self, user_id: i64) -> Result<Vec<Word>, TrainerError> {
        self.store.subscribed_words(user_id)
    }
}
