//! Voice word-guessing game.
//!
//! Three sub-modes gate how a reply is read:
//! - `Active`: guesses, recall queries and global commands.
//! - `Thinking`: the player asked for time; only quit, repeat, recall and
//!   resume phrases (or a word-shaped guess) are acted on.
//! - `EndGame`: play again or quit.

pub mod logic;
pub mod phrases;
pub mod recall;
pub mod words;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{Dialogue, Directive};
use crate::error::DialogueError;
use crate::input::{GlobalCommand, InputKind, InputSpec, NormalizationProfile, ParsedCommand, ValidationSource};
use crate::kernel::turn::{Prompt, TurnFailure};
use logic::{evaluate, ordinal, plural, spelled_out, GuessResult, WORD_LENGTH};
use recall::{GuessHistory, RecallQuery};
use words::WordSource;

pub use logic::LetterResult;
pub use words::WordList;

pub const DEFAULT_MAX_GUESSES: usize = 6;

/// Failed turns in a row before the game gives up on the player.
const MAX_FAILED_TURNS: u32 = 3;

const GOODBYE: &str = "Thanks for playing Word Guess. Goodbye!";
const ASK_GUESS: &str = "What's your guess?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Playing,
    Won(usize),
    Lost(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DialogueMode {
    Active,
    Thinking,
    EndGame,
}

pub struct WordGuessGame<W: WordSource> {
    words: W,
    target: String,
    history: GuessHistory,
    phase: GamePhase,
    mode: DialogueMode,
    last_message: String,
    failed_turns: u32,
    finished: bool,
}

impl<W: WordSource> WordGuessGame<W> {
    pub fn new(words: W, max_guesses: usize) -> Self {
        Self {
            words,
            target: String::new(),
            history: GuessHistory::new(max_guesses.max(1)),
            phase: GamePhase::Playing,
            mode: DialogueMode::Active,
            last_message: String::new(),
            failed_turns: 0,
            finished: false,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn history(&self) -> &GuessHistory {
        &self.history
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn mode(&self) -> DialogueMode {
        self.mode
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    fn max_guesses(&self) -> usize {
        self.history.max_guesses()
    }

    fn reset(&mut self) {
        self.target = self.words.random_answer();
        self.history.clear();
        self.phase = GamePhase::Playing;
        self.mode = DialogueMode::Active;
        self.failed_turns = 0;
        self.finished = false;
        debug!("New game, target {}", self.target);
    }

    // Input specs

    fn word_spec() -> InputSpec {
        InputSpec::default()
            .accepting([InputKind::Word, InputKind::OpenEnded])
            .with_profile(NormalizationProfile::Phonetic)
    }

    fn open_spec() -> InputSpec {
        InputSpec::open_ended()
    }

    /// What a guess must satisfy after the length and letter checks.
    fn guess_spec() -> InputSpec {
        InputSpec::default()
            .accepting([InputKind::Word])
            .with_validation(ValidationSource::AllowedGuesses)
            .without_spaces()
    }

    // Turn builders

    fn ask(&mut self, mode: DialogueMode, message: String, spec: InputSpec) -> Directive {
        self.mode = mode;
        self.last_message = message.clone();
        Directive::Say(Prompt::ask(message, spec))
    }

    fn ask_word(&mut self, message: impl Into<String>) -> Directive {
        self.ask(DialogueMode::Active, message.into(), Self::word_spec())
    }

    fn ask_thinking(&mut self, message: impl Into<String>) -> Directive {
        self.ask(DialogueMode::Thinking, message.into(), Self::open_spec())
    }

    fn ask_end(&mut self, message: impl Into<String>) -> Directive {
        self.ask(DialogueMode::EndGame, message.into(), Self::open_spec())
    }

    fn goodbye(&mut self) -> Directive {
        info!("Word Guess finished");
        self.finished = true;
        Directive::Say(Prompt::say(GOODBYE))
    }

    // Active mode

    fn handle_active(&mut self, parsed: &ParsedCommand) -> Result<Directive, DialogueError> {
        let input = parsed.normalized.as_str();

        if phrases::contains_phrase(input, phrases::THINKING) {
            return Ok(self.enter_thinking());
        }

        if let Some(query) = RecallQuery::detect(input, &self.history) {
            let answer = self.history.recall(query).spoken();
            return Ok(self.ask_word(answer));
        }

        if let Some(command) = parsed.global_command {
            return Ok(self.handle_command(command));
        }

        self.handle_guess(input)
    }

    fn handle_guess(&mut self, input: &str) -> Result<Directive, DialogueError> {
        if input.chars().count() != WORD_LENGTH {
            return Ok(self.ask_word("Please say a 5 letter word. Say WAIT if you need more time."));
        }
        if !input.chars().all(|c| c.is_alphabetic()) {
            return Ok(self.ask_word("Please say a word using only letters."));
        }
        if let Err(rejection) = Self::guess_spec().validate(input, &self.words) {
            debug!("Guess rejected: {}", rejection);
            return Ok(self.ask_word(format!("I don't recognize {}. Try another word.", spelled_out(input))));
        }

        let result = evaluate(input, &self.target)?;
        Ok(self.record_guess(result))
    }

    fn record_guess(&mut self, result: GuessResult) -> Directive {
        self.history.push(result.clone());
        let count = self.history.len();

        if result.is_all_correct() {
            info!("Won in {} guesses", count);
            self.phase = GamePhase::Won(count);
            let message = format!(
                "Correct! The word was {}. You got it in {}! Say PLAY to start a new game, or QUIT to exit.",
                spelled_out(&self.target),
                plural(count, "guess", "guesses")
            );
            self.ask_end(message)
        } else if count >= self.max_guesses() {
            info!("Lost after {} guesses", count);
            self.phase = GamePhase::Lost(self.target.clone());
            let message = format!(
                "Out of guesses. The word was {}. Say PLAY to try again, or QUIT to exit.",
                spelled_out(&self.target)
            );
            self.ask_end(message)
        } else {
            let message = format!(
                "{} That's guess {}. {} left. What's your next guess? Say WAIT if you need time.",
                result.spoken_feedback(),
                count,
                plural(self.history.remaining(), "guess", "guesses")
            );
            self.ask_word(message)
        }
    }

    fn handle_command(&mut self, command: GlobalCommand) -> Directive {
        match command {
            GlobalCommand::Quit => self.goodbye(),
            GlobalCommand::Repeat => {
                let message = self.last_message.clone();
                self.ask_word(message)
            }
            GlobalCommand::Help => self.ask_word(
                "I'm thinking of a 5 letter word. Guess a word, and I'll tell you which letters are correct. \
                 Green means right letter, right spot. Yellow means right letter, wrong spot. \
                 Gray means the letter isn't in the word. Say WAIT if you need time to think. \
                 Say HINT for a clue, or GIVE UP to reveal the answer. What's your guess?",
            ),
            GlobalCommand::Rules => {
                let message = format!(
                    "Guess the 5 letter word in {} tries. After each guess, I'll tell you how close you are. \
                     Green means correct letter in the correct spot. \
                     Yellow means the letter is in the word but wrong spot. \
                     Gray means the letter isn't in the word. Say WAIT any time you need to think. What's your guess?",
                    self.max_guesses()
                );
                self.ask_word(message)
            }
            GlobalCommand::Hint => {
                let message = format!("Here's a hint. {} {}", self.hint(), ASK_GUESS);
                self.ask_word(message)
            }
            GlobalCommand::GiveUp => {
                info!("Player gave up");
                self.phase = GamePhase::Lost(self.target.clone());
                let message = format!(
                    "The word was {}. Say PLAY to try a new word, or QUIT to exit.",
                    spelled_out(&self.target)
                );
                self.ask_end(message)
            }
            GlobalCommand::Stats => self.ask_word("Stats coming soon. What's your guess?"),
        }
    }

    /// The lowest position no guess has marked Correct.
    fn hint(&self) -> String {
        let letters: Vec<char> = self.target.chars().collect();

        if self.history.is_empty() {
            return match letters.first() {
                Some(first) => format!("The word starts with {}.", first),
                None => "You've found all the letters! Just arrange them correctly.".to_string(),
            };
        }

        let revealed = self.history.revealed_positions();
        match revealed.iter().position(|known| !known).and_then(|i| letters.get(i).map(|c| (i, c))) {
            Some((position, letter)) => format!("The {} letter is {}.", ordinal(position + 1), letter),
            None => "You've found all the letters! Just arrange them correctly.".to_string(),
        }
    }

    // Thinking mode

    fn enter_thinking(&mut self) -> Directive {
        let message = if self.history.is_empty() {
            "Take your time. Say READY when you want to guess.".to_string()
        } else {
            format!(
                "Take your time. You have {} left. Say READY when you want to guess.",
                plural(self.history.remaining(), "guess", "guesses")
            )
        };
        self.ask_thinking(message)
    }

    fn handle_thinking(&mut self, parsed: &ParsedCommand) -> Result<Directive, DialogueError> {
        let input = parsed.normalized.as_str();

        if parsed.is(GlobalCommand::Quit) {
            return Ok(self.goodbye());
        }
        if parsed.is(GlobalCommand::Repeat) {
            let message = self.last_message.clone();
            return Ok(self.ask_thinking(message));
        }
        if let Some(query) = RecallQuery::detect(input, &self.history) {
            let answer = self.history.recall(query).spoken();
            return Ok(self.ask_thinking(answer));
        }
        if phrases::contains_phrase(input, phrases::THINKING) {
            // Acknowledge without replacing the message REPEAT replays
            return Ok(Directive::Say(Prompt::ask("No rush.", Self::open_spec())));
        }
        if phrases::contains_phrase(input, phrases::RESUME) {
            return Ok(self.ask_word(ASK_GUESS));
        }
        if input.chars().count() == WORD_LENGTH && input.chars().all(|c| c.is_alphabetic()) {
            // Said the guess straight away
            self.mode = DialogueMode::Active;
            return self.handle_active(parsed);
        }

        // Still paused until a resume phrase or a guess
        Ok(self.ask_thinking(ASK_GUESS))
    }

    // End game

    fn handle_end_game(&mut self, parsed: &ParsedCommand) -> Directive {
        let input = parsed.normalized.as_str();

        if parsed.is(GlobalCommand::Quit) {
            return self.goodbye();
        }
        if parsed.is(GlobalCommand::Repeat) {
            let message = self.last_message.clone();
            return self.ask_end(message);
        }
        if phrases::contains_phrase(input, phrases::PLAY_AGAIN) {
            return self.start();
        }
        if phrases::contains_phrase(input, phrases::DECLINE) {
            return self.goodbye();
        }

        self.ask_end("Say PLAY for a new game, or QUIT to exit.")
    }
}

impl<W: WordSource> Dialogue for WordGuessGame<W> {
    fn name(&self) -> &'static str {
        "Word Guess"
    }

    fn start(&mut self) -> Directive {
        info!("Starting new game");
        self.reset();
        let greeting = format!(
            "Word Guess. I'm thinking of a 5 letter word. You have {} guesses. \
             Say WAIT if you need time to think. What's your first guess?",
            self.max_guesses()
        );
        self.ask_word(greeting)
    }

    fn on_reply(&mut self, parsed: ParsedCommand) -> Result<Directive, DialogueError> {
        self.failed_turns = 0;
        match self.mode {
            DialogueMode::Active => self.handle_active(&parsed),
            DialogueMode::Thinking => self.handle_thinking(&parsed),
            DialogueMode::EndGame => Ok(self.handle_end_game(&parsed)),
        }
    }

    fn on_failure(&mut self, failure: &TurnFailure) -> Option<Directive> {
        if self.finished {
            return None;
        }

        self.failed_turns += 1;
        if self.failed_turns >= MAX_FAILED_TURNS {
            warn!("{} failed turns in a row, ending game ({:?})", self.failed_turns, failure);
            return Some(self.goodbye());
        }

        let directive = match self.mode {
            DialogueMode::Active => self.ask_word(format!("I didn't catch that. {}", ASK_GUESS)),
            DialogueMode::Thinking => self.ask_thinking("I didn't catch that. Say READY when you want to guess."),
            DialogueMode::EndGame => self.ask_end("I didn't catch that. Say PLAY for a new game, or QUIT to exit."),
        };
        Some(directive)
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
