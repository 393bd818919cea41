use serde::Deserialize;

use crate::models::{UseCase, Winner};

/// Structured payload extracted from an evaluation response.
///
/// Every field has a serde default so a payload is total even when the
/// backend omits fields; an unparseable response yields the parse-failure
/// payload instead of an error.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationPayload {
    #[serde(default)]
    pub agent_score_numeric: u8,
    #[serde(default)]
    pub agent_score_text: String,
    #[serde(default)]
    pub first_response_efficient: bool,
    #[serde(default)]
    pub efficiency_notes: String,
    #[serde(default)]
    pub client_intention: String,
    #[serde(default)]
    pub use_case: UseCase,
    #[serde(default)]
    pub key_topics: String,
}

impl EvaluationPayload {
    /// Payload for a response no structured record could be read from
    pub fn parse_failure() -> Self {
        Self {
            agent_score_numeric: 0,
            agent_score_text: "Could not parse a structured evaluation from the model output"
                .to_string(),
            first_response_efficient: false,
            efficiency_notes: "Not available".to_string(),
            client_intention: "Undetermined".to_string(),
            use_case: UseCase::Other,
            key_topics: String::new(),
        }
    }
}

fn neutral_score() -> u8 {
    3
}

fn not_evaluated() -> String {
    "Not evaluated".to_string()
}

fn no_criterion() -> String {
    "N/A".to_string()
}

/// Structured verdict extracted from a comparative-evaluation response.
///
/// Defaults are neutral (3/3 tie) rather than zero: an unparseable verdict
/// means "could not judge", which must not be conflated with the 0 score
/// that marks a transport failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonVerdict {
    #[serde(default = "neutral_score")]
    pub advisor_score: u8,
    #[serde(default = "neutral_score")]
    pub generated_score: u8,
    #[serde(default = "not_evaluated")]
    pub advisor_justification: String,
    #[serde(default = "not_evaluated")]
    pub generated_justification: String,
    #[serde(default)]
    pub winner: Winner,
    #[serde(default = "no_criterion")]
    pub decisive_criterion: String,
}

impl ComparisonVerdict {
    /// Neutral verdict for a response no structured record could be read from
    pub fn undetermined() -> Self {
        Self {
            advisor_score: 3,
            generated_score: 3,
            advisor_justification: not_evaluated(),
            generated_justification: not_evaluated(),
            winner: Winner::Tie,
            decisive_criterion: no_criterion(),
        }
    }

    /// Verdict for a comparative evaluation whose generation request failed
    pub fn transport_failure(message: &str) -> Self {
        Self {
            advisor_score: 0,
            generated_score: 0,
            advisor_justification: message.to_string(),
            generated_justification: message.to_string(),
            winner: Winner::Error,
            decisive_criterion: "Error".to_string(),
        }
    }
}

/// Locate the JSON-looking span in free-form generated text.
///
/// Greedy match from the first `{` to the last `}`. Not a balanced-brace
/// parse: trailing braces or a second object in the same response extend
/// the span and make it unparseable, which routes the caller to its
/// fallback record. That failure mode is deliberate and relied on by the
/// decode fallbacks; do not tighten it to a balanced scan.
pub fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Decode an evaluation payload from raw generated text, never failing
pub fn decode_evaluation(raw: &str) -> EvaluationPayload {
    extract_json_span(raw)
        .and_then(|span| serde_json::from_str(span).ok())
        .unwrap_or_else(EvaluationPayload::parse_failure)
}

/// Decode a comparison verdict from raw generated text, never failing
pub fn decode_comparison(raw: &str) -> ComparisonVerdict {
    extract_json_span(raw)
        .and_then(|span| serde_json::from_str(span).ok())
        .unwrap_or_else(ComparisonVerdict::undetermined)
}
