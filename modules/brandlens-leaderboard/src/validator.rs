//! Name Validator — decides whether a raw extracted string is plausible
//! as a real business name.
//!
//! LLM recommendation prose gets naively parsed by position/delimiter
//! heuristics upstream, so sentence fragments routinely arrive here
//! looking like "competitors". The validator is an ordered list of
//! rejection rules evaluated short-circuit: any one match rejects, and
//! each rule has its own reason code. False negatives (rejecting a
//! short or unusual real name) are tolerated; false positives
//! (accepting prose as a name) are not.

use brandlens_common::LeaderboardConfig;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Why a candidate string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TooShort,
    TooLong,
    DiscourseOpener,
    PronounOpener,
    QuestionOpener,
    CourtesyOpener,
    DeicticOpener,
    ContractionOpener,
    NotProperNoun,
    FragmentPunctuation,
    GenericWord,
    Boilerplate,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RejectReason::TooShort => "too_short",
            RejectReason::TooLong => "too_long",
            RejectReason::DiscourseOpener => "discourse_opener",
            RejectReason::PronounOpener => "pronoun_opener",
            RejectReason::QuestionOpener => "question_opener",
            RejectReason::CourtesyOpener => "courtesy_opener",
            RejectReason::DeicticOpener => "deictic_opener",
            RejectReason::ContractionOpener => "contraction_opener",
            RejectReason::NotProperNoun => "not_proper_noun",
            RejectReason::FragmentPunctuation => "fragment_punctuation",
            RejectReason::GenericWord => "generic_word",
            RejectReason::Boilerplate => "boilerplate",
        };
        write!(f, "{s}")
    }
}

/// Single generic words that are never a business name on their own.
const GENERIC_WORDS: &[&str] = &[
    "quality",
    "professional",
    "local",
    "community",
    "excellence",
    "choice",
    "group",
    "services",
    "solutions",
];

/// LLM boilerplate phrases; a candidate containing any of these is
/// prose, not a name.
const BOILERPLATE_PHRASES: &[&str] = &[
    "quality professional services",
    "strong community presence",
    "demonstrated professional standards",
    "serves the local community",
];

pub struct NameValidator {
    openers: Vec<(Regex, RejectReason)>,
    min_len: usize,
    max_len: usize,
}

impl NameValidator {
    pub fn new(config: &LeaderboardConfig) -> Self {
        // Opener rules are case-insensitive: "Here are some options"
        // must be rejected even though it starts uppercase.
        let openers = vec![
            (
                Regex::new(r"(?i)^(here|there)\s+(are|is)\b").expect("valid regex"),
                RejectReason::DiscourseOpener,
            ),
            (
                Regex::new(r"(?i)^(i|we|you|they)\s+(would|should|could|can|will|might|may|need|want)\b")
                    .expect("valid regex"),
                RejectReason::PronounOpener,
            ),
            (
                Regex::new(r"(?i)^(if|when|where|how|why|what|which|who)\s").expect("valid regex"),
                RejectReason::QuestionOpener,
            ),
            (
                Regex::new(r"(?i)^(please|thank|thanks|sorry)\b").expect("valid regex"),
                RejectReason::CourtesyOpener,
            ),
            (
                Regex::new(r"(?i)^(that's|this is|it's|these are|those are)\b").expect("valid regex"),
                RejectReason::DeicticOpener,
            ),
            (
                Regex::new(
                    r"(?i)^(i'd|i'll|i'm|i've|we'd|we'll|we're|we've|you'd|you'll|you're|they'd|they'll|they're)\b",
                )
                .expect("valid regex"),
                RejectReason::ContractionOpener,
            ),
        ];
        Self {
            openers,
            min_len: config.min_name_len,
            max_len: config.max_name_len,
        }
    }

    /// Accept or reject a candidate string, with the first matching
    /// rejection rule as the reason.
    pub fn validate(&self, name: &str) -> Result<(), RejectReason> {
        let len = name.chars().count();
        if len < self.min_len {
            return Err(RejectReason::TooShort);
        }
        if len > self.max_len {
            return Err(RejectReason::TooLong);
        }

        for (re, reason) in &self.openers {
            if re.is_match(name) {
                return Err(*reason);
            }
        }

        // Legitimate business names are proper nouns.
        if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(RejectReason::NotProperNoun);
        }

        if name.contains('?') || name.trim_end().ends_with(':') {
            return Err(RejectReason::FragmentPunctuation);
        }

        let lowered = name.to_lowercase();
        if GENERIC_WORDS.iter().any(|w| lowered == *w) {
            return Err(RejectReason::GenericWord);
        }
        if BOILERPLATE_PHRASES.iter().any(|p| lowered.contains(p)) {
            return Err(RejectReason::Boilerplate);
        }

        Ok(())
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.validate(name).is_ok()
    }
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new(&LeaderboardConfig::default())
    }
}
