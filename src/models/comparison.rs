use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome label of an advisor-vs-generated comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Advisor,
    Generated,
    #[default]
    Tie,
    Error,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Winner::Advisor => "advisor",
            Winner::Generated => "generated",
            Winner::Tie => "tie",
            Winner::Error => "error",
        };
        f.write_str(label)
    }
}

/// Head-to-head comparison of the advisor's real first reply against a
/// generated alternative for one conversation.
///
/// Always total. Scores are 1-5, or 0 when the comparative evaluation call
/// itself failed in transport; a merely unparseable verdict lands on the
/// neutral 3/3 tie instead, so "backend degraded" and "could not judge"
/// stay distinguishable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub conversation_id: String,
    /// Human-readable summary of the interests detected in the bot phase
    pub client_interests: String,
    /// Advisor's first reply, truncated for storage
    pub advisor_response: String,
    /// Generated alternative reply, truncated for storage
    pub generated_response: String,
    pub advisor_score: u8,
    pub generated_score: u8,
    pub advisor_justification: String,
    pub generated_justification: String,
    pub winner: Winner,
    pub decisive_criterion: String,
}
