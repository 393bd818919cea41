use serde::{Deserialize, Serialize};

/// Interest signals detected in the bot-phase transcript.
///
/// Produced by a deterministic keyword classifier, never a model call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterestSignals {
    pub financing: bool,
    pub test_drive: bool,
    pub cash_purchase: bool,
    /// First product model token found, uppercased
    pub model: Option<String>,
    /// Human-readable summary of the matched categories
    pub summary: String,
}

impl InterestSignals {
    /// Whether any category or model matched
    pub fn any(&self) -> bool {
        self.financing || self.test_drive || self.cash_purchase || self.model.is_some()
    }
}
