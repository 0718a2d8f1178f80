// All LLM prompt constants for the Analysis module.
// Placeholders use {snake_case} markers and are filled by the build_* helpers
// with plain string replacement.

/// JSON shape the comparison prompt instructs the model to emit, verbatim.
/// Also the shape `MatchReport` decodes, so prompt and parser cannot drift.
pub const RESPONSE_SCHEMA: &str = r#"{
        "JDMatch": "80%",
        "MissingKeywords": ""
}"#;

/// Key-information prompt template. Replace `{resume_text}` before sending.
/// The model's reply is free text and is surfaced verbatim, never parsed.
pub const KEY_INFO_PROMPT_TEMPLATE: &str = r#"This is a resume for a job applicant. Please analyze the text and provide the following information in a clear and concise format:

* Name
* Contact Information (Phone, Email, LinkedIn, Github, etc)
* Education (Degree, Year, Institution, marks)
* Work Experience/Internships (Company, Dates, Description)
* Skills
* Relevant Coursework

Resume: {resume_text}"#;

/// Resume-vs-JD comparison prompt template.
/// Replace: {resume_text}, {job_description}, {response_schema}
pub const ATS_MATCH_PROMPT_TEMPLATE: &str = r#"Act like a skilled and very experienced ATS (Application Tracking System) with a deep understanding of the tech field and software engineering. Your task is to evaluate the resume against the given job description. You must consider that the job market is very competitive. Assign the percentage match based on the job description and list the missing keywords with high accuracy.

resume: {resume_text}
description: {job_description}

Rules:
- The resume must be evaluated against the job description.
- MissingKeywords must be drawn from the job description's skills and experience, as one string separated by commas.
- Output must be JSON with the following schema, without any deviation:
{response_schema}

Respond with the JSON object only."#;

pub fn build_key_info_prompt(resume_text: &str) -> String {
    KEY_INFO_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}

pub fn build_match_prompt(resume_text: &str, job_description: &str) -> String {
    ATS_MATCH_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{job_description}", job_description)
        .replace("{response_schema}", RESPONSE_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_schema_is_valid_json_with_both_keys() {
        let value: serde_json::Value =
            serde_json::from_str(RESPONSE_SCHEMA).expect("schema literal must be valid JSON");
        assert!(value.get("JDMatch").is_some());
        assert!(value.get("MissingKeywords").is_some());
    }

    #[test]
    fn test_key_info_prompt_interpolates_resume_text() {
        let prompt = build_key_info_prompt("JANE DOE, Rust Engineer");
        assert!(prompt.contains("JANE DOE, Rust Engineer"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(prompt.contains("Relevant Coursework"));
    }

    #[test]
    fn test_match_prompt_interpolates_all_placeholders() {
        let prompt = build_match_prompt("resume body", "jd body");
        assert!(prompt.contains("resume: resume body"));
        assert!(prompt.contains("description: jd body"));
        assert!(prompt.contains("\"JDMatch\""));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{job_description}"));
        assert!(!prompt.contains("{response_schema}"));
    }

    #[test]
    fn test_match_prompt_demands_comma_separated_keywords() {
        assert!(ATS_MATCH_PROMPT_TEMPLATE.contains("separated by commas"));
    }
}
