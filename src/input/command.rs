use serde::{Deserialize, Serialize};

use super::normalizer::normalize;
use super::spec::InputSpec;

/// Fixed spoken keywords that override normal input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalCommand {
    Repeat,
    Help,
    Rules,
    Hint,
    GiveUp,
    Stats,
    Quit,
}

/// Exact-match vocabulary, checked in order.
const VOCABULARY: &[(&str, GlobalCommand)] = &[
    ("REPEAT", GlobalCommand::Repeat),
    ("HELP", GlobalCommand::Help),
    ("RULES", GlobalCommand::Rules),
    ("HINT", GlobalCommand::Hint),
    ("GIVE UP", GlobalCommand::GiveUp),
    ("STATS", GlobalCommand::Stats),
    ("QUIT", GlobalCommand::Quit),
    ("EXIT", GlobalCommand::Quit),
    ("STOP", GlobalCommand::Quit),
];

impl GlobalCommand {
    /// Whole-string equality against the vocabulary. No substring matching.
    pub fn detect(normalized: &str) -> Option<Self> {
        VOCABULARY
            .iter()
            .find(|(phrase, _)| *phrase == normalized)
            .map(|(_, command)| *command)
    }
}

/// One interpreted utterance. Produced once, consumed by exactly one turn outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub global_command: Option<GlobalCommand>,
    pub normalized: String,
    pub raw: String,
}

impl ParsedCommand {
    pub fn is(&self, command: GlobalCommand) -> bool {
        self.global_command == Some(command)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str, spec: &InputSpec) -> ParsedCommand {
        let normalized = normalize(raw, spec);
        let global_command = GlobalCommand::detect(&normalized);

        ParsedCommand {
            global_command,
            normalized,
            raw: raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::spec::NormalizationProfile;

    #[test]
    fn test_detects_vocabulary() {
        let parser = CommandParser::new();
        let spec = InputSpec::open_ended();

        assert_eq!(parser.parse(" repeat ", &spec).global_command, Some(GlobalCommand::Repeat));
        assert_eq!(parser.parse("Give  Up", &spec).global_command, Some(GlobalCommand::GiveUp));
        assert_eq!(parser.parse("hint", &spec).global_command, Some(GlobalCommand::Hint));
        assert_eq!(parser.parse("stats", &spec).global_command, Some(GlobalCommand::Stats));
        for quit in ["quit", "exit", "STOP"] {
            assert!(parser.parse(quit, &spec).is(GlobalCommand::Quit));
        }
    }

    #[test]
    fn test_exact_match_only() {
        let parser = CommandParser::new();
        let spec = InputSpec::open_ended();

        assert_eq!(parser.parse("please help", &spec).global_command, None);
        assert_eq!(parser.parse("stopwatch", &spec).global_command, None);
        assert_eq!(parser.parse("", &spec).global_command, None);
    }

    #[test]
    fn test_keeps_raw_and_normalized() {
        let parser = CommandParser::new();
        let spec = InputSpec::default().with_profile(NormalizationProfile::Phonetic);
        let parsed = parser.parse("  guess  won ", &spec);

        assert_eq!(parsed.raw, "  guess  won ");
        assert_eq!(parsed.normalized, "GUESS ONE");
        assert_eq!(parsed.global_command, None);
    }

    #[test]
    fn test_give_up_needs_spaces() {
        let parser = CommandParser::new();
        let spec = InputSpec::open_ended().without_spaces();
        assert_eq!(parser.parse("give up", &spec).global_command, None);
    }
}
