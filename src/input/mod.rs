//! Input interpretation: what a turn expects, and how a transcript is read.

pub mod command;
pub mod normalizer;
pub mod spec;

pub use command::{CommandParser, GlobalCommand, ParsedCommand};
pub use normalizer::normalize;
pub use spec::{InputKind, InputRejection, InputSpec, Lexicon, NormalizationProfile, ValidationSource};
