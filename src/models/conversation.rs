use serde::{Deserialize, Serialize};

/// A single bot-to-advisor handoff conversation as loaded from the dataset.
///
/// Immutable for the duration of a pipeline run. The advisor transcript is
/// required and non-empty; rows without one are dropped by the loader
/// before they reach any orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Unique identifier, used to correlate output rows with the dataset
    pub id: String,
    /// Bot/client exchange prior to the advisor handoff, if captured
    pub bot_transcript: Option<String>,
    /// Advisor/client exchange after the handoff
    pub advisor_transcript: String,
    /// Auxiliary attributes, used only as prompt context
    pub metadata: ConversationMetadata,
}

/// Attributes carried alongside a conversation. Never validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMetadata {
    pub company_name: Option<String>,
    pub group_name: Option<String>,
    pub advisor_name: Option<String>,
}

impl ConversationRecord {
    pub fn new(id: impl Into<String>, advisor_transcript: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bot_transcript: None,
            advisor_transcript: advisor_transcript.into(),
            metadata: ConversationMetadata::default(),
        }
    }

    /// Bot transcript or the empty string when none was captured
    pub fn bot_transcript_or_empty(&self) -> &str {
        self.bot_transcript.as_deref().unwrap_or("")
    }
}
