// Resume analysis: key-information summaries and JD comparison.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod cache;
pub mod compare;
pub mod handlers;
pub mod key_info;
pub mod prompts;
