pub mod first_reply;
pub mod interest;

pub use first_reply::*;
pub use interest::*;

/// Keyword sets for the interest classifier.
///
/// Defaults cover the Spanish-market vocabulary the conversations are
/// written in. Matching is substring-based on lower-cased text, so every
/// entry here must be lower-case.
#[derive(Debug, Clone)]
pub struct InterestKeywords {
    pub financing: Vec<String>,
    pub test_drive: Vec<String>,
    pub cash_purchase: Vec<String>,
    /// Product model tokens; the first match is reported, uppercased
    pub model_tokens: Vec<String>,
}

impl Default for InterestKeywords {
    fn default() -> Self {
        Self {
            financing: vec![
                "financiamiento".to_string(),
                "financiar".to_string(),
                "crédito".to_string(),
                "credito".to_string(),
                "cuotas".to_string(),
            ],
            test_drive: vec![
                "prueba de manejo".to_string(),
                "test drive".to_string(),
                "cita".to_string(),
                "visitar".to_string(),
            ],
            cash_purchase: vec!["contado".to_string(), "efectivo".to_string()],
            model_tokens: vec![
                "x50".to_string(),
                "dashing".to_string(),
                "t1".to_string(),
                "t2".to_string(),
                "s06".to_string(),
            ],
        }
    }
}
