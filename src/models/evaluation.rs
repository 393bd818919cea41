use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Fixed vocabulary for the client's commercial intent.
///
/// The backend is instructed to answer with one of these labels, but its
/// output is not contractually guaranteed: anything outside the vocabulary
/// decodes to `Other` rather than failing the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UseCase {
    Financing,
    Quote,
    TestDrive,
    VehicleSale,
    Service,
    #[default]
    Other,
}

impl UseCase {
    pub const ALL: [UseCase; 6] = [
        UseCase::Financing,
        UseCase::Quote,
        UseCase::TestDrive,
        UseCase::VehicleSale,
        UseCase::Service,
        UseCase::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UseCase::Financing => "FINANCING",
            UseCase::Quote => "QUOTE",
            UseCase::TestDrive => "TEST_DRIVE",
            UseCase::VehicleSale => "VEHICLE_SALE",
            UseCase::Service => "SERVICE",
            UseCase::Other => "OTHER",
        }
    }

    /// Lenient mapping from a generated label; unknown labels become `Other`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "FINANCING" => UseCase::Financing,
            "QUOTE" => UseCase::Quote,
            "TEST_DRIVE" => UseCase::TestDrive,
            "VEHICLE_SALE" => UseCase::VehicleSale,
            "SERVICE" => UseCase::Service,
            _ => UseCase::Other,
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UseCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = UseCase::from_label(s);
        if parsed == UseCase::Other && !s.trim().eq_ignore_ascii_case("OTHER") {
            return Err(format!(
                "unknown use case '{}', expected one of FINANCING, QUOTE, TEST_DRIVE, VEHICLE_SALE, SERVICE, OTHER",
                s
            ));
        }
        Ok(parsed)
    }
}

impl<'de> Deserialize<'de> for UseCase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(UseCase::from_label(&label))
    }
}

/// Quality evaluation of one advisor conversation.
///
/// Always total: a transport or decode failure degrades field values, it
/// never omits them. `analysis_success == false` exactly when `error` is
/// set and the numeric score is 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub conversation_id: String,
    /// 1-5, or 0 to signal an unrecoverable extraction/transport failure
    pub agent_score_numeric: u8,
    pub agent_score_text: String,
    pub first_response_efficient: bool,
    pub efficiency_notes: String,
    pub client_intention: String,
    pub use_case: UseCase,
    /// Comma-joined key topics
    pub key_topics: String,
    pub analysis_success: bool,
    pub error: Option<String>,
}

impl EvaluationRecord {
    /// Record for a conversation whose generation request failed outright
    pub fn transport_failure(conversation_id: impl Into<String>, message: &str) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            agent_score_numeric: 0,
            agent_score_text: message.to_string(),
            first_response_efficient: false,
            efficiency_notes: message.to_string(),
            client_intention: message.to_string(),
            use_case: UseCase::Other,
            key_topics: String::new(),
            analysis_success: false,
            error: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_case_from_label() {
        assert_eq!(UseCase::from_label("FINANCING"), UseCase::Financing);
        assert_eq!(UseCase::from_label(" test_drive "), UseCase::TestDrive);
        assert_eq!(UseCase::from_label("something else"), UseCase::Other);
        assert_eq!(UseCase::from_label(""), UseCase::Other);
    }

    #[test]
    fn test_use_case_deserialize_unknown() {
        let parsed: UseCase = serde_json::from_str("\"NOT_A_CASE\"").unwrap();
        assert_eq!(parsed, UseCase::Other);

        let parsed: UseCase = serde_json::from_str("\"VEHICLE_SALE\"").unwrap();
        assert_eq!(parsed, UseCase::VehicleSale);
    }

    #[test]
    fn test_use_case_from_str_rejects_unknown() {
        assert!("QUOTE".parse::<UseCase>().is_ok());
        assert!("other".parse::<UseCase>().is_ok());
        assert!("banana".parse::<UseCase>().is_err());
    }

    #[test]
    fn test_transport_failure_invariant() {
        let record = EvaluationRecord::transport_failure("c1", "backend unreachable");
        assert_eq!(record.agent_score_numeric, 0);
        assert!(!record.analysis_success);
        assert_eq!(record.error.as_deref(), Some("backend unreachable"));
        assert_eq!(record.client_intention, "backend unreachable");
    }
}
