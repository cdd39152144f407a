//! Input classifiers for the research chat
//!
//! Two small heuristics run on every submission:
//! - follow-up detection: does this message build on the conversation so far?
//! - depth inference: quick overview, balanced analysis, or deep research?

use once_cell::sync::Lazy;
use regex::Regex;

/// Research depth levels understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchDepth {
    Quick,
    Medium,
    Deep,
}

impl ResearchDepth {
    /// Wire value for the /brief payload
    pub fn as_int(&self) -> u8 {
        match self {
            Self::Quick => 1,
            Self::Medium => 2,
            Self::Deep => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Medium => "medium",
            Self::Deep => "deep",
        }
    }

    /// Label used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quick => "Quick",
            Self::Medium => "Medium",
            Self::Deep => "Deep",
        }
    }
}

impl std::fmt::Display for ResearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Depth selector: explicit level or delegate to the classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepthChoice {
    #[default]
    Auto,
    Fixed(ResearchDepth),
}

impl DepthChoice {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "quick" => Some(Self::Fixed(ResearchDepth::Quick)),
            "medium" => Some(Self::Fixed(ResearchDepth::Medium)),
            "deep" => Some(Self::Fixed(ResearchDepth::Deep)),
            _ => None,
        }
    }

    /// Resolve to a concrete depth, classifying the input under Auto
    pub fn resolve(&self, input: &str) -> ResearchDepth {
        match self {
            Self::Auto => classify_depth(input),
            Self::Fixed(depth) => *depth,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Fixed(d) => d.as_str(),
        }
    }
}

/// Classify research depth from cue words in the input.
///
/// Shallow cues are checked before deep cues, so a message carrying both
/// ("quick but comprehensive") resolves to Quick.
pub fn classify_depth(input: &str) -> ResearchDepth {
    let input_lower = input.to_lowercase();

    if contains_any(&input_lower, &["quick", "brief", "overview", "summary", "shallow"]) {
        return ResearchDepth::Quick;
    }

    if contains_any(&input_lower, &["detailed", "thorough", "comprehensive", "deep", "in-depth"]) {
        return ResearchDepth::Deep;
    }

    ResearchDepth::Medium
}

fn contains_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

/// Phrasings that reference the conversation so far, in match order
static FOLLOW_UP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(more|further|additional|tell me more|expand|elaborate|dive deeper)\b",
        r"\b(what about|how about|also|furthermore|moreover)\b",
        r"\b(can you|could you)\s+(explain|analyze|research|find|look into)\b",
        r"\b(follow up|follow-up|related to)\b",
        r"^\s*(and|but|however|although|though)\b",
        r"\b(previous|earlier|before|above)\b",
        r"\b(that|this|it)\s+(topic|subject|research|analysis)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("follow-up pattern must compile"))
    .collect()
});

/// Detect whether the input is a follow-up to an earlier exchange.
///
/// Pure function of the input text and whether any history exists; with an
/// empty history nothing can be a follow-up.
pub fn is_follow_up(input: &str, history_len: usize) -> bool {
    if history_len == 0 {
        return false;
    }

    let input_lower = input.to_lowercase();

    if FOLLOW_UP_PATTERNS.iter().any(|re| re.is_match(&input_lower)) {
        return true;
    }

    // Short messages built around a bare pronoun ("why does it matter?")
    // lean on prior context even without an explicit cue.
    let tokens: Vec<&str> = input_lower.split_whitespace().collect();
    if tokens.len() < 10 {
        return tokens.iter().any(|t| {
            matches!(
                t.trim_matches(|c: char| !c.is_alphanumeric()),
                "this" | "that" | "it" | "them"
            )
        });
    }

    false
}
