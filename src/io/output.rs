use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ComparisonRecord, EvaluationRecord, Winner};

/// Provenance block written at the top of every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ReportMetadata {
    fn new(total: usize, succeeded: usize) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            total,
            succeeded,
            failed: total - succeeded,
        }
    }
}

/// Machine-readable evaluation report: one result row per input row,
/// in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub metadata: ReportMetadata,
    pub results: Vec<EvaluationRecord>,
}

impl EvaluationReport {
    pub fn new(results: Vec<EvaluationRecord>) -> Self {
        let succeeded = results.iter().filter(|r| r.analysis_success).count();
        Self {
            metadata: ReportMetadata::new(results.len(), succeeded),
            results,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse evaluation report")
    }

    /// Human-readable summary of the run
    pub fn format_summary(&self) -> String {
        let mut output = String::new();

        output.push_str("Evaluation Summary\n");
        output.push_str("==================\n");
        output.push_str(&format!("Conversations: {}\n", self.metadata.total));
        output.push_str(&format!(
            "Succeeded: {}, failed: {}\n",
            self.metadata.succeeded, self.metadata.failed
        ));

        let scored: Vec<u8> = self
            .results
            .iter()
            .filter(|r| r.agent_score_numeric > 0)
            .map(|r| r.agent_score_numeric)
            .collect();

        if !scored.is_empty() {
            let avg = scored.iter().map(|&s| s as f64).sum::<f64>() / scored.len() as f64;
            output.push_str(&format!("Average score: {:.2}\n", avg));

            output.push_str("\nScore distribution\n------------------\n");
            for score in 1..=5u8 {
                let count = scored.iter().filter(|&&s| s == score).count();
                output.push_str(&format!("{score}: {count}\n"));
            }
        }

        let mut use_cases: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &self.results {
            *use_cases.entry(record.use_case.label()).or_insert(0) += 1;
        }
        output.push_str("\nUse cases\n---------\n");
        for (label, count) in use_cases {
            output.push_str(&format!("{label}: {count}\n"));
        }

        let efficient = self
            .results
            .iter()
            .filter(|r| r.first_response_efficient)
            .count();
        output.push_str(&format!("\nEfficient first responses: {efficient}\n"));

        output
    }
}

/// Machine-readable comparison report, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub metadata: ReportMetadata,
    pub results: Vec<ComparisonRecord>,
}

impl ComparisonReport {
    pub fn new(results: Vec<ComparisonRecord>) -> Self {
        let succeeded = results.iter().filter(|r| r.winner != Winner::Error).count();
        Self {
            metadata: ReportMetadata::new(results.len(), succeeded),
            results,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse comparison report")
    }

    /// Human-readable summary of the run
    pub fn format_summary(&self) -> String {
        let mut output = String::new();

        output.push_str("Comparison Summary\n");
        output.push_str("==================\n");
        output.push_str(&format!("Conversations: {}\n", self.metadata.total));
        output.push_str(&format!(
            "Evaluated: {}, errored: {}\n",
            self.metadata.succeeded, self.metadata.failed
        ));

        output.push_str("\nWinners\n-------\n");
        for winner in [Winner::Advisor, Winner::Generated, Winner::Tie, Winner::Error] {
            let count = self.results.iter().filter(|r| r.winner == winner).count();
            output.push_str(&format!("{winner}: {count}\n"));
        }

        let scored: Vec<&ComparisonRecord> = self
            .results
            .iter()
            .filter(|r| r.winner != Winner::Error)
            .collect();
        if !scored.is_empty() {
            let advisor_avg =
                scored.iter().map(|r| r.advisor_score as f64).sum::<f64>() / scored.len() as f64;
            let generated_avg =
                scored.iter().map(|r| r.generated_score as f64).sum::<f64>() / scored.len() as f64;
            output.push_str(&format!(
                "\nAverage scores: advisor {:.2}, generated {:.2}\n",
                advisor_avg, generated_avg
            ));
        }

        output
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UseCase;

    fn sample_evaluations() -> Vec<EvaluationRecord> {
        vec![
            EvaluationRecord {
                conversation_id: "a".to_string(),
                agent_score_numeric: 4,
                agent_score_text: "good".to_string(),
                first_response_efficient: true,
                efficiency_notes: String::new(),
                client_intention: "financing".to_string(),
                use_case: UseCase::Financing,
                key_topics: "precio".to_string(),
                analysis_success: true,
                error: None,
            },
            EvaluationRecord::transport_failure("b", "backend down"),
        ]
    }

    #[test]
    fn test_evaluation_report_counts() {
        let report = EvaluationReport::new(sample_evaluations());
        assert_eq!(report.metadata.total, 2);
        assert_eq!(report.metadata.succeeded, 1);
        assert_eq!(report.metadata.failed, 1);
    }

    #[test]
    fn test_evaluation_report_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let report = EvaluationReport::new(sample_evaluations());
        report.write_json(&path).unwrap();

        let loaded = EvaluationReport::read_json(&path).unwrap();
        assert_eq!(loaded.metadata.run_id, report.metadata.run_id);
        assert_eq!(loaded.results.len(), 2);
        assert_eq!(loaded.results[0].use_case, UseCase::Financing);
        assert!(!loaded.results[1].analysis_success);
    }

    #[test]
    fn test_evaluation_summary_mentions_distribution() {
        let report = EvaluationReport::new(sample_evaluations());
        let summary = report.format_summary();
        assert!(summary.contains("Conversations: 2"));
        assert!(summary.contains("4: 1"));
        assert!(summary.contains("FINANCING: 1"));
    }

    #[test]
    fn test_comparison_report_counts_errors() {
        let results = vec![
            ComparisonRecord {
                conversation_id: "a".to_string(),
                client_interests: "FINANCING".to_string(),
                advisor_response: "hola".to_string(),
                generated_response: "buen día".to_string(),
                advisor_score: 2,
                generated_score: 4,
                advisor_justification: String::new(),
                generated_justification: String::new(),
                winner: Winner::Generated,
                decisive_criterion: "value".to_string(),
            },
            ComparisonRecord {
                conversation_id: "b".to_string(),
                client_interests: String::new(),
                advisor_response: String::new(),
                generated_response: String::new(),
                advisor_score: 0,
                generated_score: 0,
                advisor_justification: "backend down".to_string(),
                generated_justification: "backend down".to_string(),
                winner: Winner::Error,
                decisive_criterion: "Error".to_string(),
            },
        ];

        let report = ComparisonReport::new(results);
        assert_eq!(report.metadata.succeeded, 1);
        assert_eq!(report.metadata.failed, 1);

        let summary = report.format_summary();
        assert!(summary.contains("generated: 1"));
        assert!(summary.contains("error: 1"));
    }
}
