use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::models::{ConversationMetadata, ConversationRecord};

/// One row as it appears in the dataset export.
///
/// Column names vary between exports; the Spanish names are the ones the
/// upstream bot platform produces.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default, alias = "historial_de_mensajes_en_bot")]
    bot_transcript: Option<String>,
    #[serde(default, alias = "historial_de_mensajes_en_asesor")]
    advisor_transcript: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    group_name: Option<String>,
    #[serde(default, alias = "user_name")]
    advisor_name: Option<String>,
}

/// Load conversation rows from a JSON file (array of row objects)
pub fn parse_conversations_file(path: &Path) -> Result<Vec<ConversationRecord>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_conversations_json(&content)
}

/// Parse conversation rows from a JSON string.
///
/// Rows with an empty or absent advisor transcript are not eligible for
/// any pipeline and are dropped here. Rows without an id get a positional
/// `row_{index}` id so reruns stay correlatable.
pub fn parse_conversations_json(json: &str) -> Result<Vec<ConversationRecord>> {
    let rows: Vec<RawRow> =
        serde_json::from_str(json).context("Failed to parse conversation rows")?;

    let total = rows.len();
    let mut records = Vec::with_capacity(total);

    for (index, row) in rows.into_iter().enumerate() {
        let advisor_transcript = match row.advisor_transcript {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                debug!(row = index, "skipping row without advisor transcript");
                continue;
            }
        };

        let id = match row.conversation_id {
            Some(id) if !id.is_empty() => id,
            _ => format!("row_{index}"),
        };

        records.push(ConversationRecord {
            id,
            bot_transcript: row.bot_transcript.filter(|t| !t.is_empty()),
            advisor_transcript,
            metadata: ConversationMetadata {
                company_name: row.company_name,
                group_name: row.group_name,
                advisor_name: row.advisor_name,
            },
        });
    }

    debug!(total, kept = records.len(), "parsed conversation rows");
    Ok(records)
}
