//! Trainer core: vocabulary store, quiz engine and personal dictionary.

pub mod dictionary;
pub mod error;
pub mod quiz;
pub mod session;
pub mod store;

pub use dictionary::Dictionary;
pub use error::TrainerError;
pub use quiz::{NextQuestion, QuizCard, QuizEngine, Verdict};
pub use session::SessionStore;
pub use store::{UserProfile, VocabStore, Word};
