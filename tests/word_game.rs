use turnloop::error::SpeechError;
use turnloop::games::word_guess::logic::evaluate;
use turnloop::games::word_guess::{DialogueMode, GamePhase, LetterResult, WordGuessGame, WordList};
use turnloop::games::{Dialogue, Directive};
use turnloop::input::{CommandParser, InputSpec};
use turnloop::kernel::turn::TurnFailure;

use LetterResult::*;

/// A game whose answer is always APPLE.
fn game(max_guesses: usize) -> WordGuessGame<WordList> {
    let words = WordList::new(["APPLE"], ["GRAPE", "CRANE", "SLOTH", "ALLOW", "CHALK"], "test").unwrap();
    WordGuessGame::new(words, max_guesses)
}

fn text(directive: &Directive) -> &str {
    match directive {
        Directive::Say(prompt) => &prompt.text,
        other => panic!("Expected a prompt, got {:?}", other),
    }
}

/// Parses `raw` with the spec of the prompt it answers, as the turn loop would.
fn answer(game: &mut WordGuessGame<WordList>, asked: &Directive, raw: &str) -> Directive {
    let spec = match asked {
        Directive::Say(prompt) => prompt.spec.clone(),
        Directive::RepeatLast => InputSpec::open_ended(),
    };
    game.on_reply(CommandParser::new().parse(raw, &spec)).unwrap()
}

#[test]
fn test_evaluator_duplicate_letters() {
    let result = evaluate("LLAMA", "ALLOW").unwrap();
    assert_eq!(result.results(), &[Present, Correct, Present, Absent, Absent]);

    let result = evaluate("APPLE", "APPLE").unwrap();
    assert!(result.is_all_correct());

    assert!(evaluate("APPLES", "APPLE").is_err(), "Length mismatch is an error, not a result");
}

#[test]
fn test_win_on_second_guess() {
    let mut game = game(6);
    let asked = game.start();
    assert!(text(&asked).contains("You have 6 guesses"));
    assert_eq!(game.target(), "APPLE");

    let asked = answer(&mut game, &asked, "grape");
    let first = game.history().get(1).unwrap();
    assert_eq!(first.results(), &[Absent, Absent, Present, Present, Correct]);
    assert_eq!(game.history().remaining(), 5);
    assert!(text(&asked).contains("A is yellow"));
    assert!(text(&asked).contains("E is green"));
    assert!(text(&asked).contains("5 guesses left"));
    assert_eq!(*game.phase(), GamePhase::Playing);

    let asked = answer(&mut game, &asked, "Apple");
    assert_eq!(*game.phase(), GamePhase::Won(2));
    assert_eq!(game.mode(), DialogueMode::EndGame);
    assert!(text(&asked).starts_with("Correct! The word was A. P. P. L. E."));
    assert!(text(&asked).contains("You got it in 2 guesses!"));

    println!("Won in 2: {}", text(&asked));
}

#[test]
fn test_out_of_guesses_loses() {
    let mut game = game(2);
    let asked = game.start();
    let asked = answer(&mut game, &asked, "grape");
    let asked = answer(&mut game, &asked, "crane");

    assert_eq!(*game.phase(), GamePhase::Lost("APPLE".into()));
    assert_eq!(game.mode(), DialogueMode::EndGame);
    assert!(text(&asked).starts_with("Out of guesses."));
}

#[test]
fn test_rejected_guesses_are_not_counted() {
    let mut game = game(6);
    let asked = game.start();

    let asked = answer(&mut game, &asked, "xyzzy");
    assert_eq!(text(&asked), "I don't recognize X. Y. Z. Z. Y. Try another word.");

    let asked = answer(&mut game, &asked, "cat");
    assert!(text(&asked).starts_with("Please say a 5 letter word."));

    answer(&mut game, &asked, "app1e");
    assert!(game.history().is_empty());
    assert_eq!(game.mode(), DialogueMode::Active);
}

#[test]
fn test_recall_by_number_and_recap() {
    let mut game = game(6);
    let asked = game.start();
    let asked = answer(&mut game, &asked, "crane");
    let asked = answer(&mut game, &asked, "sloth");

    let asked = answer(&mut game, &asked, "what was my first guess");
    assert!(text(&asked).starts_with("Guess 1 was C. R. A. N. E."), "got: {}", text(&asked));
    assert_eq!(game.history().len(), 2, "Recall is not a guess");

    let asked = answer(&mut game, &asked, "recap");
    let recap = text(&asked);
    let crane = recap.find("Guess 1, C. R. A. N. E.").expect("first guess in recap");
    let sloth = recap.find("Guess 2, S. L. O. T. H.").expect("second guess in recap");
    assert!(crane < sloth, "Recap keeps guess order");
    assert!(recap.contains("4 guesses left"));

    let asked = answer(&mut game, &asked, "what was guess five");
    assert!(text(&asked).starts_with("You've only made 2 guesses so far."));
}

#[test]
fn test_recall_before_any_guess() {
    let mut game = game(6);
    let asked = game.start();
    let asked = answer(&mut game, &asked, "what are my guesses");
    assert_eq!(text(&asked), "You haven't guessed yet. What's your first guess?");
}

#[test]
fn test_thinking_then_ready() {
    let mut game = game(6);
    let asked = game.start();

    let asked = answer(&mut game, &asked, "hold on");
    assert_eq!(game.mode(), DialogueMode::Thinking);
    assert_eq!(text(&asked), "Take your time. Say READY when you want to guess.");

    // Still thinking: acknowledged, but REPEAT replays the thinking prompt
    let asked = answer(&mut game, &asked, "let me think");
    assert_eq!(text(&asked), "No rush.");
    let asked = answer(&mut game, &asked, "repeat");
    assert_eq!(text(&asked), "Take your time. Say READY when you want to guess.");

    let asked = answer(&mut game, &asked, "ready");
    assert_eq!(game.mode(), DialogueMode::Active);
    assert_eq!(text(&asked), "What's your guess?");
    assert!(game.history().is_empty(), "Pausing never spends a guess");
}

#[test]
fn test_guess_while_thinking_counts() {
    let mut game = game(6);
    let asked = game.start();
    let asked = answer(&mut game, &asked, "wait");
    answer(&mut game, &asked, "grape");

    assert_eq!(game.mode(), DialogueMode::Active);
    assert_eq!(game.history().len(), 1);
}

#[test]
fn test_hint_names_first_unrevealed_position() {
    let mut game = game(6);
    let asked = game.start();

    let asked = answer(&mut game, &asked, "hint");
    assert_eq!(text(&asked), "Here's a hint. The word starts with A. What's your guess?");

    let asked = answer(&mut game, &asked, "allow");
    let asked = answer(&mut game, &asked, "hint");
    assert_eq!(text(&asked), "Here's a hint. The second letter is P. What's your guess?");
}

#[test]
fn test_hint_skips_past_revealed_later_position() {
    let mut game = game(6);
    let asked = game.start();

    // CHALK vs APPLE: only the fourth letter is Correct
    let asked = answer(&mut game, &asked, "chalk");
    assert_eq!(game.history().revealed_positions(), [false, false, false, true, false]);

    let asked = answer(&mut game, &asked, "hint");
    assert_eq!(text(&asked), "Here's a hint. The first letter is A. What's your guess?");
}

#[test]
fn test_unrecognized_reply_keeps_thinking() {
    let mut game = game(6);
    let asked = game.start();
    let asked = answer(&mut game, &asked, "hold on");
    assert_eq!(game.mode(), DialogueMode::Thinking);

    let asked = answer(&mut game, &asked, "banana split");
    assert_eq!(text(&asked), "What's your guess?");
    assert_eq!(game.mode(), DialogueMode::Thinking, "Unrecognized reply does not end the pause");

    let asked = answer(&mut game, &asked, "hmm");
    assert_eq!(text(&asked), "What's your guess?");
    assert_eq!(game.mode(), DialogueMode::Thinking);
    assert!(game.history().is_empty());

    answer(&mut game, &asked, "ready");
    assert_eq!(game.mode(), DialogueMode::Active);
}

#[test]
fn test_repeat_replays_last_prompt() {
    let mut game = game(6);
    let asked = game.start();
    let greeting = text(&asked).to_string();

    let asked = answer(&mut game, &asked, "repeat");
    assert_eq!(text(&asked), greeting);
}

#[test]
fn test_give_up_then_play_again() {
    let mut game = game(6);
    let asked = game.start();
    let asked = answer(&mut game, &asked, "grape");

    let asked = answer(&mut game, &asked, "give up");
    assert_eq!(*game.phase(), GamePhase::Lost("APPLE".into()));
    assert!(text(&asked).starts_with("The word was A. P. P. L. E."));

    let asked = answer(&mut game, &asked, "maybe");
    assert_eq!(text(&asked), "Say PLAY for a new game, or QUIT to exit.");

    let asked = answer(&mut game, &asked, "play again");
    assert_eq!(*game.phase(), GamePhase::Playing);
    assert_eq!(game.mode(), DialogueMode::Active);
    assert!(game.history().is_empty());
    assert!(text(&asked).starts_with("Word Guess."));
}

#[test]
fn test_decline_says_goodbye() {
    let mut game = game(6);
    let asked = game.start();
    let asked = answer(&mut game, &asked, "give up");

    let goodbye = answer(&mut game, &asked, "no thanks");
    assert!(game.is_finished());
    match goodbye {
        Directive::Say(prompt) => {
            assert!(!prompt.listen_after_speech, "Goodbye does not wait for a reply");
            assert_eq!(prompt.text, "Thanks for playing Word Guess. Goodbye!");
        }
        other => panic!("Expected goodbye, got {:?}", other),
    }
}

#[test]
fn test_quit_mid_game() {
    let mut game = game(6);
    let asked = game.start();
    answer(&mut game, &asked, "quit");
    assert!(game.is_finished());
}

#[test]
fn test_three_failures_end_the_game() {
    let mut game = game(6);
    game.start();
    let failure = TurnFailure::Recognition(SpeechError::NoSpeech);

    let first = game.on_failure(&failure).unwrap();
    assert_eq!(text(&first), "I didn't catch that. What's your guess?");
    game.on_failure(&failure).unwrap();
    assert!(!game.is_finished());

    game.on_failure(&failure).unwrap();
    assert!(game.is_finished(), "Third failure in a row ends the game");
    assert!(game.on_failure(&failure).is_none(), "Nothing left to say");
}

#[test]
fn test_reply_resets_failure_count() {
    let mut game = game(6);
    let asked = game.start();
    let failure = TurnFailure::Recognition(SpeechError::NoSpeech);

    game.on_failure(&failure);
    game.on_failure(&failure);
    answer(&mut game, &asked, "grape");
    game.on_failure(&failure);

    assert!(!game.is_finished());
}
