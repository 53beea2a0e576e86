use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Categories of reply a turn is prepared to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputKind {
    Word,
    SingleLetter,
    OpenEnded,
}

/// Where a reply is checked for membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationSource {
    None,
    AllowedGuesses,
    GeneralDictionary,
    Custom(BTreeSet<String>),
}

/// Text cleanup applied after the standard steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationProfile {
    Standard,
    /// Corrects number words that speech-to-text commonly mishears.
    Phonetic,
    /// Optional phonetic correction followed by whole-token overrides (uppercase keys).
    GameSpecific {
        phonetic: bool,
        overrides: BTreeMap<String, String>,
    },
}

/// Dictionary lookups the validation sources rely on.
pub trait Lexicon {
    fn is_valid_guess(&self, word: &str) -> bool;

    fn is_dictionary_word(&self, word: &str) -> bool {
        self.is_valid_guess(word)
    }
}

/// What reply one turn expects. Built per turn, never mutated once handed
/// to the `TurnManager`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    accepted: BTreeSet<InputKind>,
    validation: ValidationSource,
    max_tokens: Option<usize>,
    allows_spaces: bool,
    profile: NormalizationProfile,
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            accepted: BTreeSet::from([InputKind::Word]),
            validation: ValidationSource::None,
            max_tokens: None,
            allows_spaces: true,
            profile: NormalizationProfile::Standard,
        }
    }
}

/// Why a normalized reply does not satisfy an `InputSpec`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputRejection {
    #[error("empty reply")]
    Empty,

    #[error("spaces are not allowed")]
    SpacesNotAllowed,

    #[error("expected at most {max} words, got {actual}")]
    TooManyTokens { max: usize, actual: usize },

    #[error("reply is not an accepted kind of input")]
    WrongKind,

    #[error("{0} is not a known word")]
    Unknown(String),
}

impl InputSpec {
    /// Anything goes: free-form replies, no validation.
    pub fn open_ended() -> Self {
        Self::default().accepting([InputKind::OpenEnded])
    }

    pub fn accepting(mut self, kinds: impl IntoIterator<Item = InputKind>) -> Self {
        self.accepted = kinds.into_iter().collect();
        self
    }

    pub fn with_validation(mut self, validation: ValidationSource) -> Self {
        self.validation = match validation {
            ValidationSource::Custom(words) => {
                ValidationSource::Custom(words.into_iter().map(|w| w.to_uppercase()).collect())
            }
            other => other,
        };
        self
    }

    pub fn with_max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn without_spaces(mut self) -> Self {
        self.allows_spaces = false;
        self
    }

    pub fn with_profile(mut self, profile: NormalizationProfile) -> Self {
        self.profile = match profile {
            NormalizationProfile::GameSpecific { phonetic, overrides } => NormalizationProfile::GameSpecific {
                phonetic,
                overrides: overrides
                    .into_iter()
                    .map(|(k, v)| (k.to_uppercase(), v.to_uppercase()))
                    .collect(),
            },
            other => other,
        };
        self
    }

    pub fn accepts(&self, kind: InputKind) -> bool {
        self.accepted.contains(&kind)
    }

    pub fn validation(&self) -> &ValidationSource {
        &self.validation
    }

    pub fn max_tokens(&self) -> Option<usize> {
        self.max_tokens
    }

    pub fn allows_spaces(&self) -> bool {
        self.allows_spaces
    }

    pub fn profile(&self) -> &NormalizationProfile {
        &self.profile
    }

    /// Checks an already normalized reply against this spec.
    pub fn validate(&self, normalized: &str, lexicon: &dyn Lexicon) -> Result<(), InputRejection> {
        if normalized.is_empty() {
            return Err(InputRejection::Empty);
        }

        let tokens: Vec<&str> = normalized.split(' ').collect();
        if !self.allows_spaces && tokens.len() > 1 {
            return Err(InputRejection::SpacesNotAllowed);
        }
        if let Some(max) = self.max_tokens {
            if tokens.len() > max {
                return Err(InputRejection::TooManyTokens { max, actual: tokens.len() });
            }
        }

        if !self.accepts(InputKind::OpenEnded) {
            let is_letter = normalized.chars().count() == 1 && normalized.chars().all(|c| c.is_alphabetic());
            let is_word = tokens.len() == 1 && normalized.chars().all(|c| c.is_alphabetic() || c == '\'');
            let matched = (is_letter && self.accepts(InputKind::SingleLetter))
                || (is_word && self.accepts(InputKind::Word));
            if !matched {
                return Err(InputRejection::WrongKind);
            }
        }

        let known = match &self.validation {
            ValidationSource::None => true,
            ValidationSource::AllowedGuesses => lexicon.is_valid_guess(normalized),
            ValidationSource::GeneralDictionary => lexicon.is_dictionary_word(normalized),
            ValidationSource::Custom(words) => words.contains(normalized),
        };
        if known {
            Ok(())
        } else {
            Err(InputRejection::Unknown(normalized.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fruit;

    impl Lexicon for Fruit {
        fn is_valid_guess(&self, word: &str) -> bool {
            matches!(word, "APPLE" | "GRAPE")
        }
    }

    #[test]
    fn test_default_spec() {
        let spec = InputSpec::default();
        assert!(spec.accepts(InputKind::Word));
        assert!(!spec.accepts(InputKind::OpenEnded));
        assert!(spec.allows_spaces());
        assert_eq!(spec.profile(), &NormalizationProfile::Standard);
        assert_eq!(spec.validation(), &ValidationSource::None);
    }

    #[test]
    fn test_validate_against_lexicon() {
        let spec = InputSpec::default().with_validation(ValidationSource::AllowedGuesses);
        assert_eq!(spec.validate("APPLE", &Fruit), Ok(()));
        assert_eq!(spec.validate("XYZZY", &Fruit), Err(InputRejection::Unknown("XYZZY".into())));
        assert_eq!(spec.validate("", &Fruit), Err(InputRejection::Empty));
    }

    #[test]
    fn test_validate_kinds_and_tokens() {
        let letters = InputSpec::default().accepting([InputKind::SingleLetter]);
        assert_eq!(letters.validate("A", &Fruit), Ok(()));
        assert_eq!(letters.validate("AB", &Fruit), Err(InputRejection::WrongKind));

        let words = InputSpec::default();
        assert_eq!(words.validate("TWO WORDS", &Fruit), Err(InputRejection::WrongKind));

        let short = InputSpec::open_ended().with_max_tokens(2);
        assert_eq!(short.validate("ONE TWO", &Fruit), Ok(()));
        assert_eq!(
            short.validate("ONE TWO THREE", &Fruit),
            Err(InputRejection::TooManyTokens { max: 2, actual: 3 })
        );

        let compact = InputSpec::open_ended().without_spaces();
        assert_eq!(compact.validate("A B", &Fruit), Err(InputRejection::SpacesNotAllowed));
    }

    #[test]
    fn test_custom_set_is_uppercased() {
        let spec = InputSpec::default()
            .with_validation(ValidationSource::Custom(BTreeSet::from(["yes".to_string(), "no".to_string()])));
        assert_eq!(spec.validate("YES", &Fruit), Ok(()));
        assert!(spec.validate("MAYBE", &Fruit).is_err());
    }
}
