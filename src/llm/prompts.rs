use crate::models::{ConversationRecord, InterestSignals};
use crate::text::truncate_chars;

/// Context budget for the bot-phase transcript, in characters
const BOT_CONTEXT_CHARS: usize = 2000;
/// Context budget for the advisor-phase transcript
const ADVISOR_CONTEXT_CHARS: usize = 3000;
/// Context budget per metadata field
const METADATA_CHARS: usize = 100;
/// Context budget for the configured sales script and knowledge base
const REFERENCE_CHARS: usize = 2000;
/// Context budget for the bot transcript in the comparative prompt
const COMPARISON_CONTEXT_CHARS: usize = 1000;

fn metadata_field(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => truncate_chars(v, METADATA_CHARS),
        _ => "N/A",
    }
}

fn context_or(text: &str, budget: usize, placeholder: &str) -> String {
    if text.is_empty() {
        placeholder.to_string()
    } else {
        truncate_chars(text, budget).to_string()
    }
}

/// Build the quality-evaluation prompt for one conversation
pub fn build_evaluation_prompt(record: &ConversationRecord) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a service-quality evaluator for WhatsApp conversations between a \
         commercial advisor and a client of a vehicle dealership. The client already \
         went through a bot; they are now talking to the human advisor.\n\n",
    );

    prompt.push_str("OPTIONAL BOT CONTEXT (pre-handoff):\n");
    prompt.push_str(&context_or(
        record.bot_transcript_or_empty(),
        BOT_CONTEXT_CHARS,
        "Not available",
    ));
    prompt.push_str("\n\nADVISOR-CLIENT CONVERSATION (required):\n");
    prompt.push_str(truncate_chars(
        &record.advisor_transcript,
        ADVISOR_CONTEXT_CHARS,
    ));

    prompt.push_str("\n\nMETADATA: ");
    prompt.push_str(&format!(
        "Company: {}. Group: {}. Advisor: {}.\n",
        metadata_field(record.metadata.company_name.as_deref()),
        metadata_field(record.metadata.group_name.as_deref()),
        metadata_field(record.metadata.advisor_name.as_deref()),
    ));

    prompt.push_str("\nINSTRUCTIONS:\n");
    prompt.push_str("1. Evaluate only the advisor's messages in the advisor-client conversation.\n");
    prompt.push_str(
        "2. First response: does the advisor acknowledge the topic or intention the client \
         already brought from the bot? Do they greet and offer something useful (information, \
         a next step) when context allows, or only ask a generic question?\n",
    );
    prompt.push_str(
        "3. Second response onwards: do they answer what the client just said? Do they avoid \
         redundant questions the bot already resolved? Does every message move toward a \
         solution (a fact, an appointment, an offer)?\n",
    );
    prompt.push_str(
        "4. Efficiency: could the need have been resolved in fewer messages? Are there \
         unfulfilled promises in the same thread?\n",
    );
    prompt.push_str("5. Clarity and tone: clear, professional language? Warm, empathetic treatment?\n");

    prompt.push_str("\nALSO EXTRACT:\n");
    prompt.push_str("- The client's main intention (what they are looking for)\n");
    prompt.push_str(
        "- The detected use case (FINANCING, QUOTE, TEST_DRIVE, VEHICLE_SALE, SERVICE, OTHER)\n",
    );

    prompt.push_str("\nOUTPUT FORMAT (JSON):\n");
    prompt.push_str(
        r#"{
  "agent_score_numeric": <integer 1 to 5, where 1 = very poor, 5 = excellent>,
  "agent_score_text": "<2-4 line summary: the advisor's strengths and weaknesses in this conversation, focused on first response, efficiency and clarity>",
  "first_response_efficient": <true if the first response acknowledges context or adds value; false if generic or redundant>,
  "efficiency_notes": "<one line: if it could have been more efficient, how>",
  "client_intention": "<the client's main intention>",
  "use_case": "<FINANCING | QUOTE | TEST_DRIVE | VEHICLE_SALE | SERVICE | OTHER>",
  "key_topics": "<key topics mentioned, comma-separated>"
}
"#,
    );
    prompt.push_str("\nRespond ONLY with the JSON, no additional text.\n");

    prompt
}

/// Build the prompt that asks for a generated alternative first reply
pub fn build_generation_prompt(
    bot_transcript: &str,
    interests: &InterestSignals,
    sales_script: &str,
    knowledge_base: &str,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are an expert sales advisor at a vehicle dealership.\n\n");

    prompt.push_str("BOT CONVERSATION CONTEXT:\n");
    prompt.push_str(&context_or(bot_transcript, BOT_CONTEXT_CHARS, "No prior history"));

    prompt.push_str("\n\nDETECTED CLIENT INTERESTS:\n");
    prompt.push_str(&interests.summary);

    prompt.push_str("\n\nSALES SCRIPT:\n");
    prompt.push_str(&context_or(sales_script, REFERENCE_CHARS, "Not available"));

    prompt.push_str("\n\nKNOWLEDGE BASE:\n");
    prompt.push_str(&context_or(knowledge_base, REFERENCE_CHARS, "Not available"));

    prompt.push_str("\n\nINSTRUCTIONS:\n");
    prompt.push_str("1. Generate the FIRST RESPONSE the advisor should give the client.\n");
    prompt.push_str(
        "2. Do NOT repeat options the client already chose (financing, test drive, etc.).\n",
    );
    prompt.push_str("3. The response must:\n");
    prompt.push_str("   - Acknowledge the context the client brought from the bot\n");
    prompt.push_str("   - Greet briefly and offer something useful\n");
    prompt.push_str("   - Move toward the next logical step\n");
    prompt.push_str("   - Be concise (2-4 sentences)\n");
    prompt.push_str("\nRespond ONLY with the text of the response.\n");

    prompt
}

/// Build the comparative-evaluation prompt for both first replies
pub fn build_comparison_prompt(
    advisor_response: &str,
    generated_response: &str,
    bot_transcript: &str,
    interests: &InterestSignals,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a customer-service quality evaluator.\n\n");

    prompt.push_str("CONTEXT (bot conversation):\n");
    prompt.push_str(&context_or(
        bot_transcript,
        COMPARISON_CONTEXT_CHARS,
        "Not available",
    ));

    prompt.push_str("\n\nCLIENT INTERESTS:\n");
    prompt.push_str(&interests.summary);

    prompt.push_str("\n\nRESPONSE #1 (ADVISOR):\n");
    prompt.push_str(advisor_response);

    prompt.push_str("\n\nRESPONSE #2 (GENERATED):\n");
    prompt.push_str(generated_response);

    prompt.push_str("\n\nCRITERIA:\n");
    prompt.push_str("1. CONTEXT RECOGNITION (25%): does it acknowledge what the client already expressed?\n");
    prompt.push_str("2. VALUE ADDED (25%): does it offer useful information or only ask?\n");
    prompt.push_str("3. PROGRESSION (25%): does it move toward a solution?\n");
    prompt.push_str("4. CLARITY AND TONE (25%): professional and empathetic?\n");

    prompt.push_str("\nSCALE: 1 = very poor, 5 = excellent\n");

    prompt.push_str("\nRespond ONLY with JSON:\n");
    prompt.push_str(
        r#"{
    "advisor_score": <1-5>,
    "generated_score": <1-5>,
    "advisor_justification": "<brief justification>",
    "generated_justification": "<brief justification>",
    "winner": "advisor" or "generated" or "tie",
    "decisive_criterion": "<the criterion that decided it>"
}
"#,
    );

    prompt
}

/// Build the consolidated sales-script synthesis prompt
pub fn build_sales_script_prompt(
    patterns: &[String],
    intentions: &[String],
    use_cases: &[String],
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Based on the analysis of customer-service conversations, generate a professional \
         SALES SCRIPT.\n\n",
    );

    prompt.push_str("SUCCESSFUL PATTERNS DETECTED:\n");
    push_list(&mut prompt, patterns, "Not available");

    prompt.push_str("\nCLIENT INTENTIONS DETECTED:\n");
    push_joined(&mut prompt, intentions, "Not available");

    prompt.push_str("\nUSE CASES IDENTIFIED:\n");
    push_joined(&mut prompt, use_cases, "Not available");

    prompt.push_str("\nGENERATE A SALES SCRIPT that includes:\n\n");
    prompt.push_str("1. OPENING GREETING\n   - Professional welcome phrase\n   - Advisor introduction\n\n");
    prompt.push_str(
        "2. NEED IDENTIFICATION\n   - Key questions to identify intent\n   - How to acknowledge \
         prior context (from the bot)\n\n",
    );
    prompt.push_str("3. OPTIONS TO OFFER\n   - Cash purchase\n   - Financing\n   - Test drive\n\n");
    prompt.push_str(
        "4. DATA TO REQUEST (per client type)\n   - Salaried: required data\n   - Self-employed: \
         required data\n\n",
    );
    prompt.push_str(
        "5. PRODUCT INFORMATION\n   - How to present features\n   - How to mention prices\n   - \
         How to talk about promotions\n\n",
    );
    prompt.push_str(
        "6. OBJECTION HANDLING\n   - Answers to common doubts\n   - How to overcome objections\n\n",
    );
    prompt.push_str("7. CLOSING\n   - Confirmation of the next step\n   - Professional farewell\n\n");
    prompt.push_str("Format: structured text with clear sections, verbatim phrases in quotes.\n");

    prompt
}

/// Build a sales-script synthesis prompt for a single use case
pub fn build_use_case_script_prompt(use_case: &str, notes: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("Generate a SALES SCRIPT specific to: {use_case}\n\n"));

    prompt.push_str("INFORMATION FROM SUCCESSFUL CONVERSATIONS:\n");
    push_list(&mut prompt, notes, "Not available");

    prompt.push_str("\nThe script must include:\n");
    prompt.push_str("1. Greeting contextualized to the use case\n");
    prompt.push_str("2. Questions specific to this type of client\n");
    prompt.push_str("3. Relevant information to provide\n");
    prompt.push_str("4. Data to request\n");
    prompt.push_str("5. Appropriate closing\n");
    prompt.push_str("\nFormat: structured text with verbatim phrases in quotes.\n");

    prompt
}

/// Build the knowledge-base synthesis prompt
pub fn build_knowledge_base_prompt(
    top_topics: &[(String, usize)],
    intentions: &[String],
    use_cases: &[String],
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Based on the analysis of customer-service conversations, generate a structured \
         KNOWLEDGE BASE.\n\n",
    );

    prompt.push_str("MOST FREQUENT TOPICS IN THE CONVERSATIONS:\n");
    if top_topics.is_empty() {
        prompt.push_str("Not available\n");
    } else {
        for (topic, count) in top_topics {
            prompt.push_str(&format!("- {topic} ({count} mentions)\n"));
        }
    }

    prompt.push_str("\nCLIENT INTENTIONS DETECTED:\n");
    push_list(&mut prompt, intentions, "Not available");

    prompt.push_str("\nUSE CASES IDENTIFIED:\n");
    push_list(&mut prompt, use_cases, "Not available");

    prompt.push_str("\nGENERATE A KNOWLEDGE BASE that includes:\n\n");
    prompt.push_str(
        "1. PRODUCT INFORMATION\n   - Available models\n   - Price ranges\n   - Main features\n\n",
    );
    prompt.push_str(
        "2. FINANCING PROCESSES\n   - Requirements for salaried clients\n   - Requirements for \
         self-employed clients\n   - Down-payment percentages\n   - Required documents\n\n",
    );
    prompt.push_str("3. PROMOTIONS AND BENEFITS\n   - Active promotions\n   - Included benefits\n\n");
    prompt.push_str(
        "4. SERVICE INFORMATION\n   - Available branches\n   - Opening hours\n   - Additional \
         services\n\n",
    );
    prompt.push_str("5. FREQUENTLY ASKED QUESTIONS\n   - Common client questions\n   - Standard answers\n\n");
    prompt.push_str("6. COMMON OBJECTIONS\n   - Typical objections\n   - Recommended answers\n\n");
    prompt.push_str("Format: structured text with clear sections and concrete, verifiable information.\n");

    prompt
}

fn push_list(prompt: &mut String, items: &[String], placeholder: &str) {
    if items.is_empty() {
        prompt.push_str(placeholder);
        prompt.push('\n');
    } else {
        for item in items {
            prompt.push_str(&format!("- {item}\n"));
        }
    }
}

fn push_joined(prompt: &mut String, items: &[String], placeholder: &str) {
    if items.is_empty() {
        prompt.push_str(placeholder);
    } else {
        prompt.push_str(&items.join(", "));
    }
    prompt.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::detect_client_interest;
    use crate::models::{ConversationMetadata, ConversationRecord};

    #[test]
    fn test_evaluation_prompt_includes_context_and_metadata() {
        let record = ConversationRecord {
            id: "c1".to_string(),
            bot_transcript: Some("CLIENT: quiero financiamiento".to_string()),
            advisor_transcript: "ADVISOR: hola".to_string(),
            metadata: ConversationMetadata {
                company_name: Some("Autos Norte".to_string()),
                group_name: None,
                advisor_name: Some("Lucía".to_string()),
            },
        };

        let prompt = build_evaluation_prompt(&record);
        assert!(prompt.contains("quiero financiamiento"));
        assert!(prompt.contains("Company: Autos Norte"));
        assert!(prompt.contains("Group: N/A"));
        assert!(prompt.contains("Advisor: Lucía"));
        assert!(prompt.contains("agent_score_numeric"));
    }

    #[test]
    fn test_evaluation_prompt_placeholder_for_missing_bot_context() {
        let record = ConversationRecord::new("c1", "ADVISOR: hola");
        let prompt = build_evaluation_prompt(&record);
        assert!(prompt.contains("Not available"));
    }

    #[test]
    fn test_evaluation_prompt_truncates_long_transcripts() {
        let mut record = ConversationRecord::new("c1", "a".repeat(5000));
        record.bot_transcript = Some("b".repeat(5000));

        let prompt = build_evaluation_prompt(&record);
        assert!(!prompt.contains(&"a".repeat(3001)));
        assert!(!prompt.contains(&"b".repeat(2001)));
        assert!(prompt.contains(&"a".repeat(3000)));
    }

    #[test]
    fn test_generation_prompt_embeds_interests_and_references() {
        let interests = detect_client_interest("quiero financiamiento para el x50");
        let prompt = build_generation_prompt("CLIENT: hola", &interests, "script text", "kb text");

        assert!(prompt.contains("FINANCING"));
        assert!(prompt.contains("Model: X50"));
        assert!(prompt.contains("script text"));
        assert!(prompt.contains("kb text"));
        assert!(prompt.contains("2-4 sentences"));
    }

    #[test]
    fn test_comparison_prompt_lists_both_responses() {
        let interests = detect_client_interest("");
        let prompt = build_comparison_prompt("real reply", "generated reply", "", &interests);

        assert!(prompt.contains("RESPONSE #1 (ADVISOR):\nreal reply"));
        assert!(prompt.contains("RESPONSE #2 (GENERATED):\ngenerated reply"));
        assert!(prompt.contains("CONTEXT RECOGNITION (25%)"));
        assert!(prompt.contains("\"winner\""));
    }

    #[test]
    fn test_knowledge_base_prompt_topic_counts() {
        let topics = vec![("precio".to_string(), 7), ("entrega".to_string(), 2)];
        let prompt = build_knowledge_base_prompt(&topics, &[], &[]);
        assert!(prompt.contains("- precio (7 mentions)"));
        assert!(prompt.contains("- entrega (2 mentions)"));
    }
}
