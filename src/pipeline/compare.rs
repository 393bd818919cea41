use tracing::{debug, warn};

use crate::heuristics::{detect_client_interest, extract_first_advisor_reply};
use crate::llm::{
    ComparisonVerdict, TextGenerator, build_comparison_prompt, build_generation_prompt,
    decode_comparison,
};
use crate::models::{ComparisonRecord, ConversationRecord, InterestSignals};
use crate::text::truncate_chars;

/// Stored response texts are capped at this many characters
const STORED_RESPONSE_CHARS: usize = 500;

/// Reference material the comparator embeds in its generation prompt.
///
/// Explicit configuration passed in at construction; empty strings mean
/// "not configured" and render as placeholders in the prompt.
#[derive(Debug, Clone, Default)]
pub struct SalesContext {
    pub sales_script: String,
    pub knowledge_base: String,
}

/// Compares the advisor's real first reply against a generated alternative.
///
/// Four stages per conversation: extract the advisor's first reply, detect
/// interests, generate an alternative reply, evaluate both head-to-head.
/// Each generation call is failure-contained on its own, so a transport
/// fault degrades the affected fields and the comparator still returns a
/// total record.
pub struct ResponseComparator<G> {
    client: G,
    context: SalesContext,
}

impl<G: TextGenerator> ResponseComparator<G> {
    pub fn new(client: G, context: SalesContext) -> Self {
        Self { client, context }
    }

    pub async fn compare(&self, record: &ConversationRecord) -> ComparisonRecord {
        let bot_transcript = record.bot_transcript_or_empty();

        let advisor_response = extract_first_advisor_reply(&record.advisor_transcript);
        let interests = detect_client_interest(bot_transcript);

        let generated_response = self.generate_alternative(record, bot_transcript, &interests).await;

        let verdict = self
            .evaluate_both(record, &advisor_response, &generated_response, bot_transcript, &interests)
            .await;

        ComparisonRecord {
            conversation_id: record.id.clone(),
            client_interests: interests.summary,
            advisor_response: truncate_chars(&advisor_response, STORED_RESPONSE_CHARS).to_string(),
            generated_response: truncate_chars(&generated_response, STORED_RESPONSE_CHARS)
                .to_string(),
            advisor_score: verdict.advisor_score,
            generated_score: verdict.generated_score,
            advisor_justification: verdict.advisor_justification,
            generated_justification: verdict.generated_justification,
            winner: verdict.winner,
            decisive_criterion: verdict.decisive_criterion,
        }
    }

    /// Ask the backend for an alternative first reply.
    ///
    /// On transport failure the error text itself becomes the "generated
    /// response" and the comparison proceeds against that degraded text.
    async fn generate_alternative(
        &self,
        record: &ConversationRecord,
        bot_transcript: &str,
        interests: &InterestSignals,
    ) -> String {
        let prompt = build_generation_prompt(
            bot_transcript,
            interests,
            &self.context.sales_script,
            &self.context.knowledge_base,
        );

        match self.client.generate(&prompt).await {
            Ok(text) => {
                debug!(conversation = %record.id, "alternative reply generated");
                text.trim().to_string()
            }
            Err(e) => {
                warn!(conversation = %record.id, "reply generation failed: {e}");
                format!("Error: {e}")
            }
        }
    }

    async fn evaluate_both(
        &self,
        record: &ConversationRecord,
        advisor_response: &str,
        generated_response: &str,
        bot_transcript: &str,
        interests: &InterestSignals,
    ) -> ComparisonVerdict {
        let prompt = build_comparison_prompt(
            advisor_response,
            generated_response,
            bot_transcript,
            interests,
        );

        match self.client.generate(&prompt).await {
            Ok(text) => decode_comparison(&text),
            Err(e) => {
                warn!(conversation = %record.id, "comparative evaluation failed: {e}");
                ComparisonVerdict::transport_failure(&e.to_string())
            }
        }
    }
}
