use std::collections::HashSet;
use std::path::Path;

use rand::seq::SliceRandom;
use tracing::info;

use super::logic::WORD_LENGTH;
use crate::error::WordListError;
use crate::input::Lexicon;

/// Known-words source of the game.
pub trait WordSource: Lexicon {
    /// A fresh uppercase answer.
    fn random_answer(&self) -> String;
}

const BUILTIN_ANSWERS: &[&str] = &[
    "APPLE", "BEACH", "BRAIN", "BREAD", "BRICK", "CANDY", "CHAIR", "CHALK", "CHEST", "CLOUD", "CRANE", "DANCE",
    "DREAM", "EAGLE", "EARTH", "FEAST", "FIELD", "FLAME", "FROST", "GHOST", "GLASS", "GRAPE", "GRASS", "HEART",
    "HONEY", "HORSE", "HOUSE", "JUICE", "KNIFE", "LEMON", "LIGHT", "MAPLE", "MONEY", "MOUSE", "MUSIC", "NIGHT",
    "OCEAN", "OLIVE", "PAINT", "PEACH", "PIANO", "PLANT", "RIVER", "ROBIN", "SALAD", "SHEEP", "SLOTH", "SMILE",
    "SNAKE", "SPOON", "STONE", "STORM", "SUGAR", "TABLE", "TIGER", "TOAST", "TRAIN", "WATER", "WHALE", "WORLD",
];

/// Accepted as guesses in addition to the answers.
const BUILTIN_ALLOWED: &[&str] = &[
    "ADIEU", "ALLOW", "AROSE", "AUDIO", "CRATE", "EERIE", "ERASE", "LLAMA", "RAISE", "ROATE", "SLATE", "SPEED",
    "STARE", "THREE", "TRACE", "ADDLE", "ABOUT", "AFTER", "AGAIN", "BELOW", "COULD", "EVERY", "FIRST", "FOUND",
    "GREAT", "LARGE", "NEVER", "OTHER", "PLACE", "RIGHT", "SMALL", "SOUND", "STILL", "THEIR", "THERE", "THESE",
    "THING", "THINK", "WHERE", "WHICH", "WHILE", "WOULD", "WRITE", "YOUNG",
];

#[derive(Debug, Clone)]
pub struct WordList {
    answers: Vec<String>,
    allowed: HashSet<String>,
}

impl WordList {
    pub fn builtin() -> Self {
        Self {
            answers: BUILTIN_ANSWERS.iter().map(|w| w.to_string()).collect(),
            allowed: BUILTIN_ANSWERS.iter().chain(BUILTIN_ALLOWED).map(|w| w.to_string()).collect(),
        }
    }

    /// Answers are always allowed as guesses. Words that are not
    /// `WORD_LENGTH` letters are skipped.
    pub fn new<A, G>(answers: A, allowed: G, origin: &str) -> Result<Self, WordListError>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
    {
        let answers: Vec<String> = answers.into_iter().filter_map(|w| clean(w.as_ref())).collect();
        if answers.is_empty() {
            return Err(WordListError::Empty {
                origin: origin.to_string(),
                length: WORD_LENGTH,
            });
        }

        let mut allowed: HashSet<String> = allowed.into_iter().filter_map(|w| clean(w.as_ref())).collect();
        allowed.extend(answers.iter().cloned());

        Ok(Self { answers, allowed })
    }

    /// Newline-delimited word files.
    pub fn from_files(answers_path: &Path, allowed_path: Option<&Path>) -> Result<Self, WordListError> {
        let answers = read_words(answers_path)?;
        let allowed = match allowed_path {
            Some(path) => read_words(path)?,
            None => Vec::new(),
        };

        let list = Self::new(answers, allowed, &answers_path.display().to_string())?;
        info!("Loaded {} answers, {} allowed guesses", list.answers.len(), list.allowed.len());
        Ok(list)
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon for WordList {
    fn is_valid_guess(&self, word: &str) -> bool {
        self.allowed.contains(&word.to_uppercase())
    }
}

impl WordSource for WordList {
    fn random_answer(&self) -> String {
        // `new` guarantees at least one answer
        self.answers
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

fn clean(word: &str) -> Option<String> {
    let word = word.trim().to_uppercase();
    (word.chars().count() == WORD_LENGTH && word.chars().all(|c| c.is_ascii_alphabetic())).then_some(word)
}

fn read_words(path: &Path) -> Result<Vec<String>, WordListError> {
    let text = std::fs::read_to_string(path).map_err(|source| WordListError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}
