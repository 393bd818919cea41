use std::future::Future;

use anyhow::Result;

use crate::models::ConversationRecord;

/// Run a per-conversation operation over a batch, strictly sequentially.
///
/// Results come back in input order, one per record, and `on_progress`
/// fires with `(completed, total)` after each item. `item` is expected to
/// absorb its own generation and decoding failures into the record it
/// returns; an `Err` from it is an unexpected programming error and aborts
/// the remaining batch rather than being masked.
pub async fn run_batch<R, F, Fut, P>(
    records: Vec<ConversationRecord>,
    mut item: F,
    mut on_progress: P,
) -> Result<Vec<R>>
where
    F: FnMut(ConversationRecord) -> Fut,
    Fut: Future<Output = Result<R>>,
    P: FnMut(usize, usize),
{
    let total = records.len();
    let mut results = Vec::with_capacity(total);

    for (index, record) in records.into_iter().enumerate() {
        let result = item(record).await?;
        results.push(result);
        on_progress(index + 1, total);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::llm::{TextGenerator, TransportError};
    use crate::pipeline::ConversationEvaluator;

    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, TransportError>>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, TransportError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }
    }

    impl TextGenerator for ScriptedBackend {
        async fn generate(&self, _prompt: &str) -> Result<String, TransportError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    fn records(ids: &[&str]) -> Vec<ConversationRecord> {
        ids.iter()
            .map(|id| ConversationRecord::new(*id, "ADVISOR: hola"))
            .collect()
    }

    #[tokio::test]
    async fn test_results_preserve_input_order_under_failures() {
        let backend = ScriptedBackend::new(vec![
            Ok(r#"{"agent_score_numeric": 5}"#.to_string()),
            Err(TransportError::Backend {
                status: 500,
                body: "boom".to_string(),
            }),
            Ok(r#"{"agent_score_numeric": 2}"#.to_string()),
        ]);
        let evaluator = ConversationEvaluator::new(backend);
        let evaluator = &evaluator;

        let results = run_batch(
            records(&["a", "b", "c"]),
            |record| async move { Ok(evaluator.evaluate(&record).await) },
            |_, _| {},
        )
        .await
        .unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.conversation_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        // The transport failure shows up as data, not as a missing row
        assert_eq!(results[0].agent_score_numeric, 5);
        assert_eq!(results[1].agent_score_numeric, 0);
        assert!(!results[1].analysis_success);
        assert_eq!(results[2].agent_score_numeric, 2);
    }

    #[tokio::test]
    async fn test_progress_reports_after_each_item() {
        let mut reported = Vec::new();

        let results = run_batch(
            records(&["a", "b"]),
            |record| async move { Ok(record.id) },
            |done, total| reported.push((done, total)),
        )
        .await
        .unwrap();

        assert_eq!(results, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(reported, vec![(1, 2), (2, 2)]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results: Vec<String> = run_batch(vec![], |record| async move { Ok(record.id) }, |_, _| {})
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_error_aborts_the_batch() {
        let mut calls = 0;

        let result: Result<Vec<String>> = run_batch(
            records(&["a", "b", "c"]),
            |record| {
                calls += 1;
                async move {
                    if record.id == "b" {
                        anyhow::bail!("programming error");
                    }
                    Ok(record.id)
                }
            },
            |_, _| {},
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 2);
    }
}
