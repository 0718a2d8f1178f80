//! Key-information extraction: summarizes a resume's essentials via the LLM.

use crate::analysis::cache::KeyInfoCache;
use crate::analysis::prompts::build_key_info_prompt;
use crate::llm_client::{LlmClient, LlmError};

/// Summarizes the candidate's key information (name, contact, education,
/// experience, skills, coursework) from extracted resume text.
///
/// The model's reply is returned verbatim, never parsed. Memoized by exact
/// input text: a repeated resume costs no additional model call while it
/// stays resident in the cache.
pub async fn get_key_info(
    resume_text: &str,
    llm: &LlmClient,
    cache: &KeyInfoCache,
) -> Result<String, LlmError> {
    cache
        .get_or_try_insert_with(resume_text, || async {
            let prompt = build_key_info_prompt(resume_text);
            llm.call_text(&prompt).await
        })
        .await
}
