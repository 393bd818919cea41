use tracing::{debug, warn};

use crate::llm::{EvaluationPayload, TextGenerator, build_evaluation_prompt, decode_evaluation};
use crate::models::{ConversationRecord, EvaluationRecord};

/// Scores one conversation's advisor quality through the generation backend.
///
/// `evaluate` is total: transport failures become score-0 records carrying
/// the error message, decode failures are absorbed by the codec, and the
/// caller always gets exactly one record per conversation.
pub struct ConversationEvaluator<G> {
    client: G,
}

impl<G: TextGenerator> ConversationEvaluator<G> {
    pub fn new(client: G) -> Self {
        Self { client }
    }

    pub async fn evaluate(&self, record: &ConversationRecord) -> EvaluationRecord {
        let prompt = build_evaluation_prompt(record);

        match self.client.generate(&prompt).await {
            Ok(text) => {
                debug!(conversation = %record.id, "evaluation response received");
                from_payload(&record.id, decode_evaluation(&text))
            }
            Err(e) => {
                warn!(conversation = %record.id, "evaluation request failed: {e}");
                EvaluationRecord::transport_failure(&record.id, &e.to_string())
            }
        }
    }
}

fn from_payload(conversation_id: &str, payload: EvaluationPayload) -> EvaluationRecord {
    EvaluationRecord {
        conversation_id: conversation_id.to_string(),
        agent_score_numeric: payload.agent_score_numeric,
        agent_score_text: payload.agent_score_text,
        first_response_efficient: payload.first_response_efficient,
        efficiency_notes: payload.efficiency_notes,
        client_intention: payload.client_intention,
        use_case: payload.use_case,
        key_topics: payload.key_topics,
        analysis_success: true,
        error: None,
    }
}
