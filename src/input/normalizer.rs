//! Deterministic text cleanup for recognized speech.
//!
//! Steps run in a fixed order, each on the output of the previous one:
//! trim, uppercase, collapse whitespace, strip spaces (if the spec forbids
//! them), then the profile's corrections.

use super::spec::{InputSpec, NormalizationProfile};

/// Common speech-to-text mishearings of number words.
const PHONETIC_FIXES: &[(&str, &str)] = &[
    ("WON", "ONE"),
    ("TOO", "TWO"),
    ("FOR", "FOUR"),
    ("ATE", "EIGHT"),
];

/// PURE FUNCTION: raw transcript -> normalized reply.
pub fn normalize(text: &str, spec: &InputSpec) -> String {
    let result = text.trim();
    let result = result.to_uppercase();
    let result = collapse_whitespace(&result);

    let result = if spec.allows_spaces() {
        result
    } else {
        result.replace(' ', "")
    };

    match spec.profile() {
        NormalizationProfile::Standard => result,
        NormalizationProfile::Phonetic => apply_phonetic_fixes(&result),
        NormalizationProfile::GameSpecific { phonetic, overrides } => {
            let result = if *phonetic { apply_phonetic_fixes(&result) } else { result };
            replace_tokens(&result, |token| overrides.get(token).map(String::as_str))
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-token replacement only: "WON" becomes "ONE", "WONDER" is untouched.
fn apply_phonetic_fixes(text: &str) -> String {
    replace_tokens(text, |token| {
        PHONETIC_FIXES
            .iter()
            .find(|(wrong, _)| *wrong == token)
            .map(|(_, right)| *right)
    })
}

fn replace_tokens<'a, F>(text: &'a str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    text.split(' ')
        .map(|token| lookup(token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn phonetic() -> InputSpec {
        InputSpec::default().with_profile(NormalizationProfile::Phonetic)
    }

    #[test]
    fn test_standard_pipeline() {
        let spec = InputSpec::default();
        assert_eq!(normalize("  hold   on  ", &spec), "HOLD ON");
        assert_eq!(normalize("give\tup", &spec), "GIVE UP");
        assert_eq!(normalize("", &spec), "");
    }

    #[test]
    fn test_spaces_removed_before_corrections() {
        let spec = InputSpec::default().without_spaces();
        assert_eq!(normalize(" c r a n e ", &spec), "CRANE");

        let spec = phonetic().without_spaces();
        assert_eq!(normalize("w on", &spec), "ONE");
    }

    #[test]
    fn test_phonetic_is_whole_token() {
        let spec = phonetic();
        assert_eq!(normalize("guess won", &spec), "GUESS ONE");
        assert_eq!(normalize("too", &spec), "TWO");
        assert_eq!(normalize("wonder", &spec), "WONDER");
        assert_eq!(normalize("forth", &spec), "FORTH");
        assert_eq!(normalize("plate", &spec), "PLATE");
    }

    #[test]
    fn test_game_specific_overrides() {
        let overrides = BTreeMap::from([("see".to_string(), "c".to_string())]);
        let spec = InputSpec::default().with_profile(NormalizationProfile::GameSpecific {
            phonetic: true,
            overrides,
        });
        assert_eq!(normalize("see won", &spec), "C ONE");

        let spec = InputSpec::default().with_profile(NormalizationProfile::GameSpecific {
            phonetic: false,
            overrides: BTreeMap::new(),
        });
        assert_eq!(normalize("won", &spec), "WON");
    }

    #[test]
    fn test_idempotent_over_corpus() {
        let corpus = [
            "", "   ", "crane", "  Hold   On ", "guess won", "w o n", "too for ate",
            "what was my FIRST guess", "give\tup", "I'm ready!", "read\nback", "straße",
        ];
        let specs = [InputSpec::default(), phonetic(), phonetic().without_spaces(), InputSpec::open_ended().without_spaces()];

        for spec in &specs {
            for text in corpus {
                let once = normalize(text, spec);
                assert_eq!(normalize(&once, spec), once, "not idempotent for {:?}", text);
            }
        }
    }
}
