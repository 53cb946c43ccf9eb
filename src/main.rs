mod config;
mod keyboard;
mod trainer;

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

use config::Config;
use keyboard::{BTN_ADD, BTN_DELETE, BTN_NEXT};
use trainer::{
    Dictionary, NextQuestion, QuizEngine, SessionStore, TrainerError, UserProfile, Verdict,
    VocabStore,
};

const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

struct BotState {
    dictionary: Dictionary,
    quiz: QuizEngine,
}

impl BotState {
    fn new(config: &Config) -> Result<Self, TrainerError> {
        let store = Arc::new(VocabStore::open(&config.database_path)?);
        let sessions = Arc::new(SessionStore::new());

        let dictionary = Dictionary::new(Arc::clone(&store));
        dictionary.ensure_seed_words(&config.seed_words)?;

        let quiz = QuizEngine::new(store, sessions);
        Ok(Self { dictionary, quiz })
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "vocabot.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("vocabot.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("🚀 Starting vocabot...");
    info!("Loaded config from {config_path}");

    let state = match BotState::new(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            warn!("Failed to open vocabulary store: {e}");
            std::process::exit(1);
        }
    };

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(ref user) = msg.from else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let text = text.trim();
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    match text {
        "/start" => {
            let profile = UserProfile {
                user_id,
                username: user.username.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
            };
            match state.dictionary.register_user(&profile) {
                Ok(count) => {
                    info!("👋 /start from {} ({}), {} words", user.first_name, user_id, count);
                    bot.send_message(
                        chat_id,
                        format!(
                            "Hi, {}! 👋\n\
                             I'll help you drill word translations.\n\
                             Press '{BTN_NEXT}' for a question, or send me any word to look it up.\n\
                             You're drilling {count} word(s).",
                            user.first_name
                        ),
                    )
                    .reply_markup(keyboard::main_menu())
                    .await?;
                }
                Err(e) => {
                    warn!("register_user failed for {user_id}: {e}");
                    bot.send_message(chat_id, GENERIC_FAILURE).await?;
                }
            }
        }

        BTN_NEXT => {
            let question = {
                let mut rng = rand::thread_rng();
                state.quiz.next_question(user_id, chat_id.0, &mut rng)
            };
            match question {
                Ok(NextQuestion::Question(card)) => {
                    bot.send_message(chat_id, format!("What does '{}' mean?", card.prompt))
                        .reply_markup(keyboard::question_options(&card.options))
                        .await?;
                }
                Ok(NextQuestion::NoWords) => {
                    bot.send_message(
                        chat_id,
                        format!("You have no words yet. Add one with '{BTN_ADD}'."),
                    )
                    .await?;
                }
                Err(e) => {
                    warn!("next_question failed for {user_id}: {e}");
                    bot.send_message(chat_id, GENERIC_FAILURE).await?;
                }
            }
        }

        BTN_ADD => {
            bot.send_message(
                chat_id,
                "Send the pair as:\nsource | translation\nExample: Машина | Car",
            )
            .await?;
        }

        BTN_DELETE => match state.dictionary.subscribed_words(user_id) {
            Ok(words) if words.is_empty() => {
                bot.send_message(chat_id, "Nothing to delete yet.").await?;
            }
            Ok(words) => {
                bot.send_message(chat_id, "Pick a word to delete:")
                    .reply_markup(keyboard::delete_list(&words))
                    .await?;
            }
            Err(e) => {
                warn!("subscribed_words failed for {user_id}: {e}");
                bot.send_message(chat_id, GENERIC_FAILURE).await?;
            }
        },

        t if keyboard::parse_delete_label(t).is_some() => {
            // Checked just above.
            let (source, target) = keyboard::parse_delete_label(t).unwrap();
            match state.dictionary.remove_word(user_id, source, target) {
                Ok(()) => {
                    info!("Removed '{source}' → '{target}' for {user_id}");
                    bot.send_message(chat_id, "✅ Word removed.")
                        .reply_markup(keyboard::main_menu())
                        .await?;
                }
                Err(e) => {
                    warn!("remove_word failed for {user_id}: {e}");
                    bot.send_message(chat_id, GENERIC_FAILURE).await?;
                }
            }
        }

        t if t.matches('|').count() == 1 => {
            // "source | translation" add request.
            let (source, target) = t.split_once('|').unwrap();
            match state.dictionary.add_word(user_id, source, target) {
                Ok(count) => {
                    let source = source.trim();
                    let target = target.trim();
                    info!("Added '{source}' → '{target}' for {user_id}");
                    bot.send_message(
                        chat_id,
                        format!(
                            "✅ '{source}' → '{target}' added!\nYou're now drilling {count} word(s)."
                        ),
                    )
                    .await?;
                }
                Err(TrainerError::Validation(reason)) => {
                    bot.send_message(chat_id, format!("❌ Can't add that: {reason}."))
                        .await?;
                }
                Err(e) => {
                    warn!("add_word failed for {user_id}: {e}");
                    bot.send_message(chat_id, GENERIC_FAILURE).await?;
                }
            }
        }

        _ => {
            answer_or_lookup(&bot, &state, user_id, chat_id, text).await?;
        }
    }

    Ok(())
}

/// Free text is first judged against an open question, then treated as a
/// dictionary lookup.
async fn answer_or_lookup(
    bot: &Bot,
    state: &BotState,
    user_id: i64,
    chat_id: ChatId,
    text: &str,
) -> ResponseResult<()> {
    match state.quiz.judge_answer(user_id, chat_id.0, text) {
        Verdict::Correct => {
            bot.send_message(chat_id, "❤️ Correct!")
                .reply_markup(keyboard::main_menu())
                .await?;
            return Ok(());
        }
        Verdict::Incorrect => {
            bot.send_message(chat_id, "❌ Not quite. Try again.").await?;
            return Ok(());
        }
        Verdict::NoPending => {}
    }

    match state.dictionary.lookup(text) {
        Ok(Some(word)) => {
            // Show the opposite-language side of the matched pair.
            let translation = if word.source.to_lowercase() == text.to_lowercase() {
                &word.target
            } else {
                &word.source
            };
            bot.send_message(chat_id, format!("💡 {} → {}", text, translation))
                .await?;
        }
        Ok(None) => {
            bot.send_message(chat_id, "🔍 Word not found in the dictionary.")
                .await?;
        }
        Err(e) => {
            warn!("lookup failed for {user_id}: {e}");
            bot.send_message(chat_id, GENERIC_FAILURE).await?;
        }
    }

    Ok(())
}
