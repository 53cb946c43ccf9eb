use std::fmt;

/// Errors surfaced by the trainer core.
///
/// "Not found" conditions (no subscriptions, no dictionary match, no pending
/// question) are modelled as plain result variants, not errors. Duplicate
/// word/subscription conflicts are absorbed inside the store.
#[derive(Debug)]
pub enum TrainerError {
    /// Bad user input on add (empty source or target).
    Validation(String),
    /// The underlying SQLite store failed.
    Store(rusqlite::Error),
}

impl fmt::Display for TrainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(reason) => write!(f, "invalid input: {}", reason),
            Self::Store(source) => write!(f, "store error: {}", source),
        }
    }
}

impl std::error::Error for TrainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(_) => None,
            Self::Store(source) => Some(source),
        }
    }
}

impl From<rusqlite::Error> for TrainerError {
    fn from(source: rusqlite::Error) -> Self {
        Self::Store(source)
    }
}
