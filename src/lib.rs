pub mod heuristics;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod text;

pub use heuristics::{InterestKeywords, detect_client_interest, extract_first_advisor_reply};
pub use io::{ComparisonReport, EvaluationReport, parse_conversations_file, parse_conversations_json};
pub use llm::{
    FixedIntervalLimiter, GeminiClient, GeminiConfig, TextGenerator, TransportError,
    decode_comparison, decode_evaluation,
};
pub use models::{
    ComparisonRecord, ConversationMetadata, ConversationRecord, EvaluationRecord, InterestSignals,
    UseCase, Winner,
};
pub use pipeline::{
    ConversationEvaluator, CorpusStats, CorpusSynthesizer, ResponseComparator, SalesContext,
    run_batch,
};
