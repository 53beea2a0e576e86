//! Engine configuration loaded from TOML.
//!
//! | Env | Description |
//! |-----|-------------|
//! | TURNLOOP_CONFIG | Path of the TOML file. Unset => defaults. |
//! | TURNLOOP_TTS_COMMAND | Speech command (`say`, `espeak`). Overrides `voice.command`. |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::games::word_guess::DEFAULT_MAX_GUESSES;
use crate::kernel::time::ticks_from_ms;
use crate::kernel::turn::TurnConfig;
use crate::speech::SilencePolicy;

pub const CONFIG_ENV: &str = "TURNLOOP_CONFIG";
pub const TTS_COMMAND_ENV: &str = "TURNLOOP_TTS_COMMAND";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub turn: TurnSection,
    #[serde(default)]
    pub listening: ListeningSection,
    #[serde(default)]
    pub voice: VoiceSection,
    #[serde(default)]
    pub game: GameSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSection {
    /// Pause between the end of a prompt and the start of listening.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningSection {
    /// How long to wait for the first words.
    #[serde(default = "default_initial_timeout_ms")]
    pub initial_timeout_ms: u64,
    /// Silence after speech that ends the reply.
    #[serde(default = "default_trailing_silence_ms")]
    pub trailing_silence_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSection {
    /// External TTS program. None => prompts are printed only.
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Pace used to time printed prompts.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSection {
    #[serde(default = "default_max_guesses")]
    pub max_guesses: usize,
    /// Newline-delimited answers. None => built-in list.
    #[serde(default)]
    pub answers_path: Option<PathBuf>,
    #[serde(default)]
    pub allowed_path: Option<PathBuf>,
}

fn default_cooldown_ms() -> u64 {
    300
}

fn default_initial_timeout_ms() -> u64 {
    10_000
}

fn default_trailing_silence_ms() -> u64 {
    2_000
}

fn default_words_per_minute() -> u32 {
    180
}

fn default_max_guesses() -> usize {
    DEFAULT_MAX_GUESSES
}

impl Default for TurnSection {
    fn default() -> Self {
        Self { cooldown_ms: default_cooldown_ms() }
    }
}

impl Default for ListeningSection {
    fn default() -> Self {
        Self {
            initial_timeout_ms: default_initial_timeout_ms(),
            trailing_silence_ms: default_trailing_silence_ms(),
        }
    }
}

impl Default for VoiceSection {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            words_per_minute: default_words_per_minute(),
        }
    }
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            max_guesses: default_max_guesses(),
            answers_path: None,
            allowed_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// File named by `TURNLOOP_CONFIG` (or defaults), then env overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        if let Some(command) = env_opt_string(TTS_COMMAND_ENV) {
            config.voice.command = Some(command);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.max_guesses == 0 {
            return Err(ConfigError::Invalid("game.max_guesses must be at least 1".into()));
        }
        if self.listening.initial_timeout_ms == 0 || self.listening.trailing_silence_ms == 0 {
            return Err(ConfigError::Invalid("listening timeouts must be non-zero".into()));
        }
        if self.voice.words_per_minute == 0 {
            return Err(ConfigError::Invalid("voice.words_per_minute must be non-zero".into()));
        }
        Ok(())
    }

    pub fn turn_config(&self) -> TurnConfig {
        TurnConfig {
            cooldown_ticks: ticks_from_ms(self.turn.cooldown_ms),
        }
    }

    pub fn silence_policy(&self) -> SilencePolicy {
        SilencePolicy {
            initial_ticks: ticks_from_ms(self.listening.initial_timeout_ms),
            trailing_ticks: ticks_from_ms(self.listening.trailing_silence_ms),
        }
    }
}

fn env_opt_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.turn_config().cooldown_ticks, 15);
        assert_eq!(config.silence_policy(), SilencePolicy { initial_ticks: 500, trailing_ticks: 100 });
        assert_eq!(config.game.max_guesses, 6);
        assert_eq!(config.voice.command, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_matches_default_silence_policy() {
        assert_eq!(EngineConfig::default().silence_policy(), SilencePolicy::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            [voice]
            command = "espeak"
            args = ["-s", "160"]

            [game]
            max_guesses = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.voice.command.as_deref(), Some("espeak"));
        assert_eq!(config.voice.args, vec!["-s", "160"]);
        assert_eq!(config.voice.words_per_minute, 180);
        assert_eq!(config.game.max_guesses, 4);
        assert_eq!(config.turn.cooldown_ms, 300);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            EngineConfig::from_toml("[game]\nmax_guesses = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml("[listening]\ntrailing_silence_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(EngineConfig::from_toml("[turn]\ncooldown_ms = \"soon\""), Err(ConfigError::Parse(_))));
    }
}
