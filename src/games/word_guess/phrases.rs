//! Best-effort keyword matching for free-form replies.
//!
//! A phrase matches when its words appear as consecutive tokens of the
//! reply. This is not a grammar: "hold on a sec" pauses the game, "seconds"
//! does not. False positives and negatives are expected.

pub const THINKING: &[&str] = &[
    "WAIT", "HOLD", "HOLD ON", "NEED TIME", "THINKING", "NEED A MINUTE", "NEED A MOMENT", "ONE MOMENT",
    "PAUSE", "JUST A MOMENT", "HANG ON", "LET ME THINK", "NEED MORE TIME", "STAY", "ONE SECOND", "SEC",
];

pub const RESUME: &[&str] = &[
    "READY", "START", "BEGIN", "GO", "OK", "OKAY", "BEGIN AGAIN", "START AGAIN", "CONTINUE", "YES",
    "I'M READY", "GUESS", "BACK",
];

pub const PLAY_AGAIN: &[&str] = &["PLAY", "AGAIN", "YES", "NEW"];

pub const DECLINE: &[&str] = &["NO", "QUIT", "EXIT", "STOP"];

/// Words of `input`, split on anything but letters, digits and apostrophes.
pub fn tokens(input: &str) -> Vec<&str> {
    input
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn contains_phrase(input: &str, phrases: &[&str]) -> bool {
    let words = tokens(input);
    phrases.iter().any(|phrase| {
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        !needle.is_empty() && words.windows(needle.len()).any(|window| window == needle.as_slice())
    })
}
