use super::logic::{plural, spelled_out, GuessResult, LetterResult, WORD_LENGTH};
use super::phrases::tokens;

/// Ordered, append-only record of scored guesses for one game.
#[derive(Debug, Clone)]
pub struct GuessHistory {
    entries: Vec<GuessResult>,
    max_guesses: usize,
}

impl GuessHistory {
    pub fn new(max_guesses: usize) -> Self {
        Self {
            entries: Vec::with_capacity(max_guesses),
            max_guesses,
        }
    }

    /// Appends a guess. Returns false once the history is full.
    pub fn push(&mut self, result: GuessResult) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push(result);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_guesses
    }

    pub fn max_guesses(&self) -> usize {
        self.max_guesses
    }

    pub fn remaining(&self) -> usize {
        self.max_guesses.saturating_sub(self.entries.len())
    }

    /// 1-based lookup.
    pub fn get(&self, number: usize) -> Option<&GuessResult> {
        number.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GuessResult> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Positions any guess has already marked Correct.
    pub fn revealed_positions(&self) -> [bool; WORD_LENGTH] {
        let mut revealed = [false; WORD_LENGTH];
        for result in &self.entries {
            for (i, letter) in result.results().iter().enumerate() {
                if *letter == LetterResult::Correct {
                    revealed[i] = true;
                }
            }
        }
        revealed
    }

    pub fn recall(&self, query: RecallQuery) -> Recall {
        match query {
            RecallQuery::NoneYet => Recall::NoneYet,
            RecallQuery::Recap => Recall::Recap {
                guesses: self.entries.clone(),
                remaining: self.remaining(),
            },
            RecallQuery::Last => self.recall_number(self.len()),
            RecallQuery::Number(number) => self.recall_number(number),
        }
    }

    fn recall_number(&self, number: usize) -> Recall {
        match self.get(number) {
            Some(result) => Recall::Guess { number, result: result.clone() },
            None => Recall::OutOfRange { number, made: self.len() },
        }
    }
}

/// A request to hear earlier guesses again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallQuery {
    /// Asked about guesses before making any.
    NoneYet,
    Recap,
    Number(usize),
    Last,
}

const RECAP_TRIGGERS: &[&str] = &["RECAP", "ALL GUESS", "MY GUESS", "SUMMARY", "READ THEM", "READ BACK", "SO FAR"];
const LAST_TRIGGERS: &[&str] = &["LAST GUESS", "PREVIOUS GUESS"];
const ORDINALS: &[(&str, usize)] = &[("FIRST", 1), ("SECOND", 2), ("THIRD", 3), ("FOURTH", 4), ("FIFTH", 5), ("SIXTH", 6)];
const NUMBER_WORDS: &[(&str, usize)] = &[("ONE", 1), ("TWO", 2), ("THREE", 3), ("FOUR", 4), ("FIVE", 5), ("SIX", 6)];

impl RecallQuery {
    /// Classifies a normalized reply. Substring triggers, best effort.
    pub fn detect(input: &str, history: &GuessHistory) -> Option<Self> {
        if history.is_empty() {
            let asks_about_guesses =
                input.contains("GUESS") && ["WHAT", "MY", "RECAP", "ALL"].iter().any(|w| input.contains(w));
            return asks_about_guesses.then_some(RecallQuery::NoneYet);
        }

        if RECAP_TRIGGERS.iter().any(|t| input.contains(t)) {
            return Some(RecallQuery::Recap);
        }
        if let Some(number) = guess_number(input) {
            return Some(RecallQuery::Number(number));
        }
        if LAST_TRIGGERS.iter().any(|t| input.contains(t)) {
            return Some(RecallQuery::Last);
        }
        None
    }
}

/// "first guess", "guess one", "guess 3", "number two".
fn guess_number(input: &str) -> Option<usize> {
    if !(input.contains("GUESS") || input.contains("NUMBER")) {
        return None;
    }
    let words = tokens(input);

    lookup(&words, ORDINALS)
        .or_else(|| lookup(&words, NUMBER_WORDS))
        .or_else(|| words.iter().find_map(|w| w.parse::<usize>().ok().filter(|n| *n >= 1)))
}

fn lookup(words: &[&str], table: &[(&str, usize)]) -> Option<usize> {
    table
        .iter()
        .find(|(word, _)| words.iter().any(|w| w == word))
        .map(|(_, n)| *n)
}

/// Structured answer to a `RecallQuery`.
#[derive(Debug, Clone, PartialEq)]
pub enum Recall {
    NoneYet,
    Recap { guesses: Vec<GuessResult>, remaining: usize },
    Guess { number: usize, result: GuessResult },
    OutOfRange { number: usize, made: usize },
}

impl Recall {
    pub fn spoken(&self) -> String {
        match self {
            Recall::NoneYet => "You haven't guessed yet. What's your first guess?".to_string(),
            Recall::Recap { guesses, remaining } => {
                let parts: Vec<String> = guesses
                    .iter()
                    .enumerate()
                    .map(|(i, result)| {
                        format!("Guess {}, {}. {}", i + 1, spelled_out(result.guess()), result.spoken_feedback())
                    })
                    .collect();
                format!(
                    "{} {} left. What's your next guess?",
                    parts.join(" "),
                    plural(*remaining, "guess", "guesses")
                )
            }
            Recall::Guess { number, result } => format!(
                "Guess {} was {}. {} What's your next guess?",
                number,
                spelled_out(result.guess()),
                result.spoken_feedback()
            ),
            Recall::OutOfRange { made, .. } => format!(
                "You've only made {} so far. What's your next guess?",
                plural(*made, "guess", "guesses")
            ),
        }
    }
}
