use crate::models::InterestSignals;

use super::InterestKeywords;

/// Summary used when no keyword matched
const NO_INTEREST_SUMMARY: &str = "No specific interest detected";

/// Classify client interest signals from the bot-phase transcript.
///
/// Lower-cases the text and tests substring membership against the default
/// keyword sets. Intentionally conservative: exact substring match, no
/// stemming, no model call. Pure and idempotent.
pub fn detect_client_interest(bot_transcript: &str) -> InterestSignals {
    detect_with_keywords(bot_transcript, &InterestKeywords::default())
}

/// Classify with an explicit keyword configuration
pub fn detect_with_keywords(bot_transcript: &str, keywords: &InterestKeywords) -> InterestSignals {
    let text = bot_transcript.to_lowercase();

    let matches = |set: &[String]| set.iter().any(|kw| text.contains(kw.as_str()));

    let financing = matches(&keywords.financing);
    let test_drive = matches(&keywords.test_drive);
    let cash_purchase = matches(&keywords.cash_purchase);

    // First model token wins
    let model = keywords
        .model_tokens
        .iter()
        .find(|token| text.contains(token.as_str()))
        .map(|token| token.to_uppercase());

    let mut labels: Vec<String> = Vec::new();
    if financing {
        labels.push("FINANCING".to_string());
    }
    if test_drive {
        labels.push("TEST DRIVE".to_string());
    }
    if cash_purchase {
        labels.push("CASH PURCHASE".to_string());
    }
    if let Some(model) = &model {
        labels.push(format!("Model: {model}"));
    }

    let summary = if labels.is_empty() {
        NO_INTEREST_SUMMARY.to_string()
    } else {
        labels.join(", ")
    };

    InterestSignals {
        financing,
        test_drive,
        cash_purchase,
        model,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financing_and_model() {
        let signals = detect_client_interest("Hola, quiero FINANCIAMIENTO para el modelo X50");

        assert!(signals.financing);
        assert!(!signals.test_drive);
        assert_eq!(signals.model.as_deref(), Some("X50"));

        let financing_pos = signals.summary.find("FINANCING").unwrap();
        let model_pos = signals.summary.find("Model: X50").unwrap();
        assert!(financing_pos < model_pos);
    }

    #[test]
    fn test_no_match() {
        let signals = detect_client_interest("buenas tardes");
        assert!(!signals.any());
        assert_eq!(signals.summary, "No specific interest detected");
    }

    #[test]
    fn test_empty_transcript() {
        let signals = detect_client_interest("");
        assert!(!signals.any());
        assert_eq!(signals.summary, "No specific interest detected");
    }

    #[test]
    fn test_test_drive_and_cash() {
        let signals = detect_client_interest("quisiera una prueba de manejo y pagar de contado");
        assert!(signals.test_drive);
        assert!(signals.cash_purchase);
        assert!(!signals.financing);
        assert_eq!(signals.summary, "TEST DRIVE, CASH PURCHASE");
    }

    #[test]
    fn test_first_model_token_wins() {
        let signals = detect_client_interest("entre el x50 y el dashing prefiero el dashing");
        assert_eq!(signals.model.as_deref(), Some("X50"));
    }

    #[test]
    fn test_accented_and_unaccented_credit() {
        assert!(detect_client_interest("me interesa un crédito").financing);
        assert!(detect_client_interest("me interesa un credito").financing);
    }

    #[test]
    fn test_idempotent() {
        let text = "quiero financiamiento del s06";
        assert_eq!(detect_client_interest(text), detect_client_interest(text));
    }
}
