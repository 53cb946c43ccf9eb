use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    telegram_bot_token: String,
    /// Directory for state files (database, logs). Defaults to current directory.
    data_dir: Option<String>,
    /// SQLite database path. Defaults to `<data_dir>/vocab.db`.
    database_path: Option<String>,
    /// Starter word pairs as `[source, target]` arrays, inserted on startup
    /// if missing. Defaults to a small built-in list.
    seed_words: Option<Vec<(String, String)>>,
}

pub struct Config {
    pub telegram_bot_token: String,
    /// Directory for state files (database, logs).
    pub data_dir: PathBuf,
    /// SQLite database path.
    pub database_path: PathBuf,
    /// Starter word pairs seeded into the shared dictionary.
    pub seed_words: Vec<(String, String)>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        if file.telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegram_bot_token is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }

        if let Some(ref pairs) = file.seed_words {
            for (source, target) in pairs {
                if source.trim().is_empty() || target.trim().is_empty() {
                    return Err(ConfigError::Validation(
                        "seed_words entries must have non-empty source and target".into(),
                    ));
                }
            }
        }

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let database_path = file
            .database_path
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("vocab.db"));

        Ok(Self {
            telegram_bot_token: file.telegram_bot_token,
            data_dir,
            database_path,
            seed_words: file.seed_words.unwrap_or_else(default_seed_words),
        })
    }
}

fn default_seed_words() -> Vec<(String, String)> {
    [
        ("Привет", "Hello"),
        ("Машина", "Car"),
        ("Дом", "House"),
        ("Кот", "Cat"),
        ("Собака", "Dog"),
        ("Вода", "Water"),
        ("Хлеб", "Bread"),
        ("Книга", "Book"),
        ("Солнце", "Sun"),
        ("Дерево", "Tree"),
    ]
    .into_iter()
    .map(|(s, t)| (s.to_string(), t.to_string()))
    .collect()
}
