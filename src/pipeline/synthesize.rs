use std::collections::HashMap;

use tracing::info;

use crate::llm::{
    TextGenerator, TransportError, build_knowledge_base_prompt, build_sales_script_prompt,
    build_use_case_script_prompt,
};
use crate::models::{EvaluationRecord, UseCase};

/// Score at or above which a conversation counts as a success pattern
const SUCCESS_SCORE: u8 = 4;
/// Caps on how much aggregate material the synthesis prompts embed
const MAX_PATTERNS: usize = 10;
const PATTERNS_IN_PROMPT: usize = 5;
const MAX_INTENTIONS: usize = 15;
const MAX_TOP_TOPICS: usize = 20;
const MAX_USE_CASE_NOTES: usize = 5;

/// Frequency statistics aggregated over an already-scored corpus.
///
/// Collected only from successful records; ordering is deterministic
/// (first-seen for intentions, count-descending then name for topics) so
/// the same corpus always produces the same synthesis prompt.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    /// Score texts of high-scoring conversations
    pub success_patterns: Vec<String>,
    /// Unique client intentions, first-seen order
    pub intentions: Vec<String>,
    /// Unique use cases, first-seen order
    pub use_cases: Vec<UseCase>,
    /// Topic frequencies, most mentioned first
    pub top_topics: Vec<(String, usize)>,
}

impl CorpusStats {
    pub fn collect(records: &[EvaluationRecord]) -> Self {
        let successful: Vec<&EvaluationRecord> =
            records.iter().filter(|r| r.analysis_success).collect();

        let success_patterns = successful
            .iter()
            .filter(|r| r.agent_score_numeric >= SUCCESS_SCORE)
            .map(|r| r.agent_score_text.clone())
            .filter(|t| !t.is_empty())
            .take(MAX_PATTERNS)
            .collect();

        let mut intentions = Vec::new();
        for record in &successful {
            let intention = record.client_intention.trim();
            if intention.is_empty() {
                continue;
            }
            if !intentions.iter().any(|i: &String| i == intention) {
                intentions.push(intention.to_string());
            }
            if intentions.len() == MAX_INTENTIONS {
                break;
            }
        }

        let mut use_cases = Vec::new();
        for record in &successful {
            if !use_cases.contains(&record.use_case) {
                use_cases.push(record.use_case);
            }
        }

        let mut topic_freq: HashMap<String, usize> = HashMap::new();
        for record in &successful {
            for topic in record.key_topics.split(',') {
                let topic = topic.trim();
                if !topic.is_empty() {
                    *topic_freq.entry(topic.to_string()).or_insert(0) += 1;
                }
            }
        }
        let mut top_topics: Vec<(String, usize)> = topic_freq.into_iter().collect();
        top_topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_topics.truncate(MAX_TOP_TOPICS);

        Self {
            success_patterns,
            intentions,
            use_cases,
            top_topics,
        }
    }

    fn use_case_labels(&self) -> Vec<String> {
        self.use_cases.iter().map(|u| u.label().to_string()).collect()
    }
}

/// Synthesizes a sales script and a knowledge base from a scored corpus.
///
/// Aggregation is local and deterministic; each synthesis is a single
/// generation call whose transport error, unlike the per-conversation
/// paths, surfaces to the caller.
pub struct CorpusSynthesizer<G> {
    client: G,
}

impl<G: TextGenerator> CorpusSynthesizer<G> {
    pub fn new(client: G) -> Self {
        Self { client }
    }

    /// Generate a consolidated sales script from the corpus
    pub async fn sales_script(
        &self,
        records: &[EvaluationRecord],
    ) -> Result<String, TransportError> {
        let stats = CorpusStats::collect(records);
        info!(
            patterns = stats.success_patterns.len(),
            intentions = stats.intentions.len(),
            "synthesizing sales script"
        );

        let patterns: Vec<String> = stats
            .success_patterns
            .iter()
            .take(PATTERNS_IN_PROMPT)
            .cloned()
            .collect();
        let intentions: Vec<String> = stats.intentions.iter().take(10).cloned().collect();

        let prompt = build_sales_script_prompt(&patterns, &intentions, &stats.use_case_labels());
        let text = self.client.generate(&prompt).await?;
        Ok(text.trim().to_string())
    }

    /// Generate a sales script for a single use case
    pub async fn use_case_script(
        &self,
        records: &[EvaluationRecord],
        use_case: UseCase,
    ) -> Result<String, TransportError> {
        let notes: Vec<String> = records
            .iter()
            .filter(|r| r.analysis_success && r.use_case == use_case)
            .map(|r| r.agent_score_text.clone())
            .filter(|t| !t.is_empty())
            .take(MAX_USE_CASE_NOTES)
            .collect();

        info!(use_case = %use_case, notes = notes.len(), "synthesizing use-case script");

        let prompt = build_use_case_script_prompt(use_case.label(), &notes);
        let text = self.client.generate(&prompt).await?;
        Ok(text.trim().to_string())
    }

    /// Generate a knowledge base from the corpus
    pub async fn knowledge_base(
        &self,
        records: &[EvaluationRecord],
    ) -> Result<String, TransportError> {
        let stats = CorpusStats::collect(records);
        info!(topics = stats.top_topics.len(), "synthesizing knowledge base");

        let prompt = build_knowledge_base_prompt(
            &stats.top_topics,
            &stats.intentions,
            &stats.use_case_labels(),
        );
        let text = self.client.generate(&prompt).await?;
        Ok(text.trim().to_string())
    }
}
