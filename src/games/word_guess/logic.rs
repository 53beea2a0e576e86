use serde::{Deserialize, Serialize};

use crate::error::GuessError;

pub const WORD_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterResult {
    /// Right letter, right position.
    Correct,
    /// Right letter, wrong position.
    Present,
    /// Not in the word (or every occurrence already credited).
    Absent,
}

impl LetterResult {
    pub fn spoken(&self) -> &'static str {
        match self {
            LetterResult::Correct => "green",
            LetterResult::Present => "yellow",
            LetterResult::Absent => "gray",
        }
    }
}

/// A scored guess. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResult {
    guess: String,
    results: [LetterResult; WORD_LENGTH],
}

impl GuessResult {
    pub fn guess(&self) -> &str {
        &self.guess
    }

    pub fn results(&self) -> &[LetterResult; WORD_LENGTH] {
        &self.results
    }

    pub fn is_all_correct(&self) -> bool {
        self.results.iter().all(|r| *r == LetterResult::Correct)
    }

    /// "C is green. R is gray. A is yellow. N is gray. E is green."
    pub fn spoken_feedback(&self) -> String {
        let parts: Vec<String> = self
            .guess
            .chars()
            .zip(self.results.iter())
            .map(|(letter, result)| format!("{} is {}", letter, result.spoken()))
            .collect();
        format!("{}.", parts.join(". "))
    }
}

/// Scores `guess` against `target` (case-insensitive).
///
/// Correct letters are credited first and consume their target letter, so a
/// letter is never credited more often than it occurs in the target.
pub fn evaluate(guess: &str, target: &str) -> Result<GuessResult, GuessError> {
    let guess_letters = letters("guess", guess)?;
    let target_letters = letters("target", target)?;

    let mut results = [LetterResult::Absent; WORD_LENGTH];
    let mut remaining: [Option<char>; WORD_LENGTH] = target_letters.map(Some);

    // First pass: exact matches
    for i in 0..WORD_LENGTH {
        if guess_letters[i] == target_letters[i] {
            results[i] = LetterResult::Correct;
            remaining[i] = None;
        }
    }

    // Second pass: misplaced letters from what is left
    for i in 0..WORD_LENGTH {
        if results[i] == LetterResult::Correct {
            continue;
        }
        if let Some(slot) = remaining.iter_mut().find(|slot| **slot == Some(guess_letters[i])) {
            *slot = None;
            results[i] = LetterResult::Present;
        }
    }

    Ok(GuessResult {
        guess: guess_letters.iter().collect(),
        results,
    })
}

fn letters(role: &'static str, word: &str) -> Result<[char; WORD_LENGTH], GuessError> {
    let upper: Vec<char> = word.to_uppercase().chars().collect();
    upper.try_into().map_err(|_| GuessError::InvalidLength {
        role,
        expected: WORD_LENGTH,
        actual: word.to_string(),
    })
}

/// "APPLE" -> "A. P. P. L. E"
pub fn spelled_out(word: &str) -> String {
    word.chars().map(|c| c.to_string()).collect::<Vec<_>>().join(". ")
}

pub fn ordinal(n: usize) -> String {
    match n {
        1 => "first".to_string(),
        2 => "second".to_string(),
        3 => "third".to_string(),
        4 => "fourth".to_string(),
        5 => "fifth".to_string(),
        n => format!("{}th", n),
    }
}

pub fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}
