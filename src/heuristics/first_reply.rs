use crate::text::truncate_chars;

/// Maximum length of an extracted first reply, in characters
const MAX_REPLY_CHARS: usize = 1500;

/// Length of the raw-transcript fallback when no advisor marker is found
const UNTAGGED_FALLBACK_CHARS: usize = 500;

/// Extract the advisor's first reply from a handoff transcript.
///
/// The transcript is scanned line by line, in order. Advisor lines carry
/// an `ADVISOR:` marker (anywhere in the line) or a `[ADVISOR]` prefix;
/// client lines carry `CLIENT:` or `[CLIENT]`. Content from advisor lines
/// is accumulated until the first client line that follows an advisor
/// line; unmarked lines are skipped. Advisor turns after an interleaving
/// client turn are never included, so the result is exactly the first
/// advisor turn. Transcripts with no advisor marker at all are treated as
/// already being the advisor's voice and yield their first 500 characters.
pub fn extract_first_advisor_reply(transcript: &str) -> String {
    if transcript.is_empty() {
        return String::new();
    }

    let mut parts: Vec<&str> = Vec::new();
    let mut seen_advisor = false;

    for line in transcript.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(content) = advisor_content(line) {
            seen_advisor = true;
            if !content.is_empty() {
                parts.push(content);
            }
        } else if seen_advisor && is_client_line(line) {
            break;
        }
    }

    if parts.is_empty() {
        truncate_chars(transcript, UNTAGGED_FALLBACK_CHARS).to_string()
    } else {
        truncate_chars(&parts.join("\n"), MAX_REPLY_CHARS).to_string()
    }
}

/// Content of an advisor-tagged line, or None if the line is not tagged
fn advisor_content(line: &str) -> Option<&str> {
    if let Some(idx) = line.find("ADVISOR:") {
        Some(line[idx + "ADVISOR:".len()..].trim())
    } else if let Some(rest) = line.strip_prefix("[ADVISOR]") {
        Some(rest.trim())
    } else {
        None
    }
}

fn is_client_line(line: &str) -> bool {
    line.contains("CLIENT:") || line.contains("[CLIENT]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_first_client_line_after_advisor() {
        let transcript = "CLIENT: hi\nADVISOR: hello, how can I help?\nCLIENT: thanks\nADVISOR: sure thing";
        assert_eq!(
            extract_first_advisor_reply(transcript),
            "hello, how can I help?"
        );
    }

    #[test]
    fn test_accumulates_consecutive_advisor_lines() {
        let transcript = "CLIENT: hola\nADVISOR: buen día\nADVISOR: ¿en qué le ayudo?\nCLIENT: quiero información";
        assert_eq!(
            extract_first_advisor_reply(transcript),
            "buen día\n¿en qué le ayudo?"
        );
    }

    #[test]
    fn test_bracket_markers() {
        let transcript = "[CLIENT] hola\n[ADVISOR] bienvenido\n[CLIENT] gracias";
        assert_eq!(extract_first_advisor_reply(transcript), "bienvenido");
    }

    #[test]
    fn test_unmarked_lines_are_ignored() {
        let transcript = "-- handoff at 10:02 --\nADVISOR: good morning\nsystem note\nADVISOR: I have your quote ready\nCLIENT: great";
        assert_eq!(
            extract_first_advisor_reply(transcript),
            "good morning\nI have your quote ready"
        );
    }

    #[test]
    fn test_untagged_transcript_falls_back_to_first_500_chars() {
        let transcript = "x".repeat(800);
        let reply = extract_first_advisor_reply(&transcript);
        assert_eq!(reply, "x".repeat(500));
    }

    #[test]
    fn test_result_is_capped_at_1500_chars() {
        let long_line = "a".repeat(2000);
        let transcript = format!("ADVISOR: {long_line}");
        let reply = extract_first_advisor_reply(&transcript);
        assert_eq!(reply.chars().count(), 1500);
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(extract_first_advisor_reply(""), "");
    }

    #[test]
    fn test_client_line_before_any_advisor_does_not_stop_the_scan() {
        let transcript = "CLIENT: hola\nCLIENT: sigo aquí\nADVISOR: disculpe la espera";
        assert_eq!(extract_first_advisor_reply(transcript), "disculpe la espera");
    }

    #[test]
    fn test_advisor_lines_with_empty_content_fall_back() {
        // Marker present but no content behind it: nothing accumulates,
        // so the raw-transcript fallback applies.
        let transcript = "ADVISOR:\nCLIENT: hola";
        assert_eq!(extract_first_advisor_reply(transcript), transcript);
    }

    #[test]
    fn test_idempotent() {
        let transcript = "CLIENT: hi\nADVISOR: hello\nCLIENT: bye";
        let first = extract_first_advisor_reply(transcript);
        let second = extract_first_advisor_reply(transcript);
        assert_eq!(first, second);
    }
}
