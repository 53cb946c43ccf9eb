//! Quiz engine: question selection, distractor sampling and answer judging.

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::trainer::error::TrainerError;
use crate::trainer::session::SessionStore;
use crate::trainer::store::VocabStore;

/// Distractors shown alongside the correct answer.
const DISTRACTOR_COUNT: usize = 3;

/// A question ready to render: prompt, shuffled options, expected answer.
#[derive(Debug, Clone)]
pub struct QuizCard {
    pub prompt: String,
    pub answer: String,
    pub options: Vec<String>,
}

/// Result of asking for the next question.
#[derive(Debug)]
pub enum NextQuestion {
    Question(QuizCard),
    /// The user is not drilling any words yet. Not an error.
    NoWords,
}

/// Result of judging a submitted answer.
#[derive(Debug, PartialEq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// No question is open for this (user, chat); treat the text as a lookup.
    NoPending,
}

/// Selects questions and judges answers against the pending session state.
pub struct QuizEngine {
    store: Arc<VocabStore>,
    sessions: Arc<SessionStore>,
}

impl QuizEngine {
    pub fn new(store: Arc<VocabStore>, sessions: Arc<SessionStore>) -> Self {
        Self { store, sessions }
    }

    /// Pick a subscribed word uniformly, sample up to three distractor
    /// targets, shuffle, and record the expected answer for (user, chat).
    ///
    /// A dictionary with fewer than four distinct targets yields fewer
    /// options rather than padding with duplicates.
    pub fn next_question<R: Rng + ?Sized>(
        &self,
        user_id: i64,
        chat_id: i64,
        rng: &mut R,
    ) -> Result<NextQuestion, TrainerError> {
        let subscribed = self.store.subscribed_words(user_id)?;
        let Some(word) = subscribed.choose(rng) else {
            return Ok(NextQuestion::NoWords);
        };

        let pool = self.store.distractor_targets(&word.target)?;
        let mut options: Vec<String> = pool
            .choose_multiple(rng, DISTRACTOR_COUNT)
            .cloned()
            .collect();
        options.push(word.target.clone());
        // Fisher-Yates: every ordering equally likely.
        options.shuffle(rng);

        self.sessions
            .set_pending(user_id, chat_id, word.target.clone());

        Ok(NextQuestion::Question(QuizCard {
            prompt: word.source.clone(),
            answer: word.target.clone(),
            options,
        }))
    }

    /// Compare the text against the pending answer, case-insensitively.
    /// Correct clears the pending state; incorrect leaves it so the same
    /// question can be retried.
    pub fn judge_answer(&self, user_id: i64, chat_id: i64, text: &str) -> Verdict {
        let Some(expected) = self.sessions.pending(user_id, chat_id) else {
            return Verdict::NoPending;
        };

        if text.to_lowercase() == expected.to_lowercase() {
            self.sessions.clear_pending(user_id, chat_id);
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const USER: i64 = 100;
    const CHAT: i64 = -500;

    fn engine_with_words(pairs: &[(&str, &str)]) -> QuizEngine {
        let store = Arc::new(VocabStore::open_in_memory());
        store
            .upsert_user(&crate::trainer::store::UserProfile {
                user_id: USER,
                username: None,
                first_name: "Alice".to_string(),
                last_name: None,
            })
            .unwrap();
        for (source, target) in pairs {
            let word = store.create_word(source, target).unwrap();
            store.add_subscription(USER, word.word_id).unwrap();
        }
        QuizEngine::new(store, Arc::new(SessionStore::new()))
    }

    fn five_words() -> QuizEngine {
        engine_with_words(&[
            ("Машина", "Car"),
            ("Дом", "House"),
            ("Кот", "Cat"),
            ("Собака", "Dog"),
            ("Стол", "Table"),
        ])
    }

    fn take_card(next: NextQuestion) -> QuizCard {
        match next {
            NextQuestion::Question(card) => card,
            NextQuestion::NoWords => panic!("expected a question"),
        }
    }

    #[test]
    fn test_question_has_four_distinct_options_with_answer() {
        let engine = five_words();
        let mut rng = StdRng::seed_from_u64(1);

        let card = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
        assert_eq!(card.options.len(), 4);
        assert!(card.options.contains(&card.answer));

        let mut unique = card.options.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_answer_position_is_roughly_uniform() {
        let engine = five_words();
        let mut rng = StdRng::seed_from_u64(42);
        let mut position_counts = [0usize; 4];

        for _ in 0..400 {
            let card = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
            let pos = card
                .options
                .iter()
                .position(|o| o == &card.answer)
                .expect("answer must be among the options");
            position_counts[pos] += 1;
        }

        // Expected 100 per position; generous bounds to stay flake-free.
        for count in position_counts {
            assert!((50..=150).contains(&count), "skewed counts: {position_counts:?}");
        }
    }

    #[test]
    fn test_no_subscriptions_returns_no_words() {
        let engine = engine_with_words(&[]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            engine.next_question(USER, CHAT, &mut rng).unwrap(),
            NextQuestion::NoWords
        ));
    }

    #[test]
    fn test_small_dictionary_yields_fewer_options() {
        let engine = engine_with_words(&[("Машина", "Car"), ("Дом", "House")]);
        let mut rng = StdRng::seed_from_u64(1);

        let card = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
        assert_eq!(card.options.len(), 2);
        assert!(card.options.contains(&card.answer));
    }

    #[test]
    fn test_single_word_dictionary_still_asks() {
        let engine = engine_with_words(&[("Машина", "Car")]);
        let mut rng = StdRng::seed_from_u64(1);

        let card = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
        assert_eq!(card.options, vec!["Car".to_string()]);
    }

    #[test]
    fn test_judge_is_case_insensitive_and_clears_pending() {
        let engine = five_words();
        let mut rng = StdRng::seed_from_u64(3);

        let card = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
        assert_eq!(
            engine.judge_answer(USER, CHAT, &card.answer.to_uppercase()),
            Verdict::Correct
        );
        // Pending state is gone; the duplicate submission is not an answer.
        assert_eq!(
            engine.judge_answer(USER, CHAT, &card.answer),
            Verdict::NoPending
        );
    }

    #[test]
    fn test_wrong_answer_keeps_question_retryable() {
        let engine = five_words();
        let mut rng = StdRng::seed_from_u64(4);

        let card = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
        assert_eq!(
            engine.judge_answer(USER, CHAT, "definitely wrong"),
            Verdict::Incorrect
        );
        assert_eq!(
            engine.judge_answer(USER, CHAT, "still wrong"),
            Verdict::Incorrect
        );
        assert_eq!(engine.judge_answer(USER, CHAT, &card.answer), Verdict::Correct);
    }

    #[test]
    fn test_pending_state_is_per_chat() {
        let engine = five_words();
        let mut rng = StdRng::seed_from_u64(5);

        let card_a = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
        let card_b = take_card(engine.next_question(USER, CHAT + 1, &mut rng).unwrap());

        assert_eq!(engine.judge_answer(USER, CHAT, &card_a.answer), Verdict::Correct);
        // The other conversation still has its own open question.
        assert_eq!(
            engine.judge_answer(USER, CHAT + 1, &card_b.answer),
            Verdict::Correct
        );
    }

    #[test]
    fn test_new_question_supersedes_pending() {
        let engine = five_words();
        let mut rng = StdRng::seed_from_u64(6);

        let first = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
        let second = loop {
            let card = take_card(engine.next_question(USER, CHAT, &mut rng).unwrap());
            if card.answer != first.answer {
                break card;
            }
        };

        assert_eq!(engine.judge_answer(USER, CHAT, &first.answer), Verdict::Incorrect);
        assert_eq!(engine.judge_answer(USER, CHAT, &second.answer), Verdict::Correct);
    }
}
