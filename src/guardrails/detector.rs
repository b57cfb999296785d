//! Deterministic special-case detector.
//!
//! Recognizes requests whose correct answer is knowable without any model
//! reasoning: canonical trick-question templates with a closed-form answer.
//! Matching is pure pattern work over normalized text. No clock, no
//! randomness, no state across calls.

/// A ready-made answer for a recognized special case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedAnswer {
    /// Template identifier, snake_case, used in logs.
    pub template: &'static str,
    pub answer: &'static str,
}

struct Template {
    name: &'static str,
    /// Every phrase must occur in the normalized text for a hit.
    required_phrases: &'static [&'static str],
    answer: &'static str,
}

/// Known closed-form trick questions. First match wins, in library order.
const TEMPLATES: &[Template] = &[
    Template {
        name: "wall_already_built",
        required_phrases: &["wall", "already built"],
        answer: "No time at all: the wall is already built, so zero additional time is required.",
    },
    Template {
        name: "bury_the_survivors",
        required_phrases: &["bury", "survivors"],
        answer: "Nowhere: you do not bury survivors.",
    },
    Template {
        name: "months_with_28_days",
        required_phrases: &["months", "28 days"],
        answer: "All twelve months have at least 28 days.",
    },
    Template {
        name: "dirt_in_the_hole",
        required_phrases: &["dirt", "hole"],
        answer: "None: a hole has had all its dirt removed, so there is no dirt in it.",
    },
];

/// Match `text` against the template library.
///
/// Total over all inputs: any string, however malformed, is a valid input,
/// and a miss is `None`, never an error.
pub fn match_special_case(text: &str) -> Option<CannedAnswer> {
    let normalized = normalize(text);
    TEMPLATES
        .iter()
        .find(|template| {
            template
                .required_phrases
                .iter()
                .all(|phrase| normalized.contains(phrase))
        })
        .map(|template| CannedAnswer {
            template: template.name,
            answer: template.answer,
        })
}

/// Lowercase, strip punctuation, collapse whitespace.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}
