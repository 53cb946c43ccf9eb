//! Persistent SQLite store for users, words and subscriptions.

use crate::trainer::error::TrainerError;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Telegram user identity as the platform reports it.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// A dictionary entry: source-language text paired with its translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub word_id: i64,
    pub source: String,
    pub target: String,
}

/// Persistent SQLite store for the trainer.
///
/// Case-insensitive matching goes through the `source_fold`/`target_fold`
/// columns, which hold Rust `to_lowercase` output. SQLite's own `LOWER()`
/// only folds ASCII and would miss Cyrillic entries entirely.
pub struct VocabStore {
    conn: Mutex<Connection>,
}

fn fold(text: &str) -> String {
    text.to_lowercase()
}

fn now_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl VocabStore {
    /// Create a new in-memory store.
    pub fn open_in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema();
        store
    }

    /// Open (or create) a store at the given path.
    pub fn open(path: &Path) -> Result<Self, TrainerError> {
        let conn = Connection::open(path)?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema();

        let words = store.word_count()?;
        info!("Opened vocabulary store at {:?} ({} words)", path, words);
        Ok(store)
    }

    fn init_schema(&self) {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT NOT NULL,
                last_name TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS words (
                word_id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_text TEXT NOT NULL,
                target_text TEXT NOT NULL,
                source_fold TEXT NOT NULL,
                target_fold TEXT NOT NULL,
                UNIQUE(source_text, target_text)
            );

            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
                word_id INTEGER NOT NULL REFERENCES words(word_id) ON DELETE CASCADE,
                added_at TEXT NOT NULL,
                UNIQUE(user_id, word_id)
            );

            CREATE INDEX IF NOT EXISTS idx_words_source_fold ON words(source_fold);
            CREATE INDEX IF NOT EXISTS idx_words_target_fold ON words(target_fold);
            CREATE INDEX IF NOT EXISTS idx_subscriptions_user ON subscriptions(user_id);
        "#,
        )
        .expect("Failed to initialize database schema");
    }

    // ==================== USERS ====================

    /// Insert the user or refresh their display fields.
    pub fn upsert_user(&self, profile: &UserProfile) -> Result<(), TrainerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (user_id, username, first_name, last_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                username = ?2,
                first_name = ?3,
                last_name = ?4",
            params![
                profile.user_id,
                profile.username,
                profile.first_name,
                profile.last_name,
                now_stamp()
            ],
        )?;
        Ok(())
    }

    // ==================== WORDS ====================

    /// Total number of dictionary entries.
    pub fn word_count(&self) -> Result<usize, TrainerError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All dictionary entries, lowest id first.
    pub fn all_words(&self) -> Result<Vec<Word>, TrainerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT word_id, source_text, target_text FROM words ORDER BY word_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Word {
                word_id: row.get(0)?,
                source: row.get(1)?,
                target: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Create a dictionary entry, or return the existing one for the exact
    /// same pair. The UNIQUE constraint absorbs concurrent duplicate inserts.
    pub fn create_word(&self, source: &str, target: &str) -> Result<Word, TrainerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO words (source_text, target_text, source_fold, target_fold)
             VALUES (?1, ?2, ?3, ?4)",
            params![source, target, fold(source), fold(target)],
        )?;
        let word = conn.query_row(
            "SELECT word_id, source_text, target_text FROM words
             WHERE source_text = ?1 AND target_text = ?2",
            params![source, target],
            |row| {
                Ok(Word {
                    word_id: row.get(0)?,
                    source: row.get(1)?,
                    target: row.get(2)?,
                })
            },
        )?;
        Ok(word)
    }

    /// Find an entry matching both texts case-insensitively.
    /// When several rows differ only by case, the lowest id wins.
    pub fn find_word(&self, source: &str, target: &str) -> Result<Option<Word>, TrainerError> {
        let conn = self.conn.lock().unwrap();
        let word = conn
            .query_row(
                "SELECT word_id, source_text, target_text FROM words
                 WHERE source_fold = ?1 AND target_fold = ?2
                 ORDER BY word_id LIMIT 1",
                params![fold(source), fold(target)],
                |row| {
                    Ok(Word {
                        word_id: row.get(0)?,
                        source: row.get(1)?,
                        target: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(word)
    }

    /// Find an entry whose source OR target matches the text
    /// case-insensitively. Source matches take precedence, then lowest id.
    pub fn find_translation(&self, text: &str) -> Result<Option<Word>, TrainerError> {
        let folded = fold(text);
        let conn = self.conn.lock().unwrap();

        for column in ["source_fold", "target_fold"] {
            let sql = format!(
                "SELECT word_id, source_text, target_text FROM words
                 WHERE {column} = ?1 ORDER BY word_id LIMIT 1"
            );
            let word = conn
                .query_row(&sql, params![folded], |row| {
                    Ok(Word {
                        word_id: row.get(0)?,
                        source: row.get(1)?,
                        target: row.get(2)?,
                    })
                })
                .optional()?;
            if word.is_some() {
                return Ok(word);
            }
        }
        Ok(None)
    }

    /// Candidate distractor target texts: one representative per case fold
    /// (the lowest-id row), excluding anything that folds to `exclude`.
    pub fn distractor_targets(&self, exclude: &str) -> Result<Vec<String>, TrainerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT target_text, MIN(word_id) FROM words
             WHERE target_fold <> ?1 GROUP BY target_fold",
        )?;
        let rows = stmt.query_map(params![fold(exclude)], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ==================== SUBSCRIPTIONS ====================

    /// Number of words the user is drilling.
    pub fn subscription_count(&self, user_id: i64) -> Result<u32, TrainerError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM subscriptions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    /// The words the user is drilling, lowest id first.
    pub fn subscribed_words(&self, user_id: i64) -> Result<Vec<Word>, TrainerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT w.word_id, w.source_text, w.target_text
             FROM subscriptions s JOIN words w ON s.word_id = w.word_id
             WHERE s.user_id = ?1 ORDER BY w.word_id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Word {
                word_id: row.get(0)?,
                source: row.get(1)?,
                target: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Subscribe the user to a word. Returns false if they already were;
    /// the UNIQUE constraint makes concurrent duplicates collapse silently.
    pub fn add_subscription(&self, user_id: i64, word_id: i64) -> Result<bool, TrainerError> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO subscriptions (user_id, word_id, added_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, word_id, now_stamp()],
        )?;
        Ok(inserted > 0)
    }

    /// Unsubscribe the user from a word. Absent rows are a no-op.
    pub fn remove_subscription(&self, user_id: i64, word_id: i64) -> Result<(), TrainerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM subscriptions WHERE user_id = ?1 AND word_id = ?2",
            params![user_id, word_id],
        )?;
        Ok(())
    }
}
