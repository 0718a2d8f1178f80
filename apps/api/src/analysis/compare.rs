//! Resume-vs-JD comparison via pluggable, trait-based comparators.
//!
//! The UI offers three method labels. Only `Gemini` resolves to a working
//! comparator; the other two are declared extension points that surface an
//! explicit unsupported-method error instead of a fake score.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::prompts::build_match_prompt;
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// The comparison verdict decoded from the model's JSON reply.
/// Field renames pin the exact key names the prompt demands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    #[serde(rename = "JDMatch")]
    pub jd_match: String,
    #[serde(rename = "MissingKeywords")]
    pub missing_keywords: String,
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Method selection
// ────────────────────────────────────────────────────────────────────────────

/// The comparison backends offered by the method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Gemini,
    HuggingFaceBert,
    Doc2Vec,
}

impl MatchMethod {
    /// Parses a selector label. Unknown labels are `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Gemini" => Some(Self::Gemini),
            "HuggingFace-BERT" => Some(Self::HuggingFaceBert),
            "Doc2Vec" => Some(Self::Doc2Vec),
            _ => None,
        }
    }

    /// Resolves the method against the comparator behind the `Gemini`
    /// label, or `None` where no implementation exists yet.
    pub fn resolve(&self, gemini: &Arc<dyn MatchStrategy>) -> Option<Arc<dyn MatchStrategy>> {
        match self {
            Self::Gemini => Some(Arc::clone(gemini)),
            Self::HuggingFaceBert | Self::Doc2Vec => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Comparator trait + Gemini implementation
// ────────────────────────────────────────────────────────────────────────────

/// A single comparison capability. Implement this to add a backend without
/// touching the handlers.
#[async_trait]
pub trait MatchStrategy: Send + Sync {
    async fn compare(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<MatchReport, MatchError>;
}

/// LLM-backed comparator: prompts the model to act as an ATS over the
/// resume and job description, then decodes its JSON verdict.
pub struct GeminiMatcher {
    llm: LlmClient,
}

impl GeminiMatcher {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl MatchStrategy for GeminiMatcher {
    async fn compare(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<MatchReport, MatchError> {
        let prompt = build_match_prompt(resume_text, job_description);
        let raw = self.llm.call_text(&prompt).await?;
        parse_match_report(&raw)
    }
}

/// Decodes the model's raw reply into a `MatchReport`, tolerating Markdown
/// code fences. Anything that is not a JSON object carrying both string
/// keys is `Malformed`; no repair, no re-ask.
pub fn parse_match_report(raw: &str) -> Result<MatchReport, MatchError> {
    let stripped = strip_json_fences(raw);
    serde_json::from_str(stripped).map_err(MatchError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_response_parses_exactly() {
        let raw = r#"{"JDMatch": "85%", "MissingKeywords": "Kubernetes, gRPC"}"#;
        let report = parse_match_report(raw).expect("well-formed response must parse");
        assert_eq!(report.jd_match, "85%");
        assert_eq!(report.missing_keywords, "Kubernetes, gRPC");
    }

    #[test]
    fn test_fenced_response_parses() {
        let raw = "```json\n{\"JDMatch\": \"40%\", \"MissingKeywords\": \"\"}\n```";
        let report = parse_match_report(raw).expect("fenced response must parse");
        assert_eq!(report.jd_match, "40%");
        assert_eq!(report.missing_keywords, "");
    }

    #[test]
    fn test_non_json_response_is_malformed() {
        let raw = "I would estimate the match at roughly 80 percent.";
        assert!(matches!(
            parse_match_report(raw),
            Err(MatchError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let raw = r#"{"JDMatch": "85%"}"#;
        assert!(matches!(
            parse_match_report(raw),
            Err(MatchError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_string_value_is_malformed() {
        let raw = r#"{"JDMatch": 85, "MissingKeywords": ""}"#;
        assert!(matches!(
            parse_match_report(raw),
            Err(MatchError::Malformed(_))
        ));
    }

    #[test]
    fn test_extra_keys_are_tolerated() {
        let raw = r#"{"JDMatch": "60%", "MissingKeywords": "Terraform", "Notes": "close call"}"#;
        let report = parse_match_report(raw).expect("extra keys must not break parsing");
        assert_eq!(report.jd_match, "60%");
    }

    #[test]
    fn test_selector_labels_parse() {
        assert_eq!(MatchMethod::parse("Gemini"), Some(MatchMethod::Gemini));
        assert_eq!(
            MatchMethod::parse("HuggingFace-BERT"),
            Some(MatchMethod::HuggingFaceBert)
        );
        assert_eq!(MatchMethod::parse("Doc2Vec"), Some(MatchMethod::Doc2Vec));
    }

    #[test]
    fn test_unknown_method_label_is_rejected() {
        assert_eq!(MatchMethod::parse("Word2Vec"), None);
        assert_eq!(MatchMethod::parse(""), None);
        assert_eq!(MatchMethod::parse("gemini"), None, "labels are case-sensitive");
    }

    #[test]
    fn test_only_gemini_resolves_to_a_strategy() {
        let gemini: Arc<dyn MatchStrategy> =
            Arc::new(GeminiMatcher::new(LlmClient::new("test-key".to_string())));
        assert!(MatchMethod::Gemini.resolve(&gemini).is_some());
        assert!(MatchMethod::HuggingFaceBert.resolve(&gemini).is_none());
        assert!(MatchMethod::Doc2Vec.resolve(&gemini).is_none());
    }
}
