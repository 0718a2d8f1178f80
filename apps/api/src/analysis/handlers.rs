use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::compare::{MatchError, MatchMethod};
use crate::analysis::key_info::get_key_info;
use crate::errors::AppError;
use crate::extract::extract_resume_text;
use crate::state::AppState;

/// Shown whenever a request arrives with no uploaded files.
const NO_RESUME_MESSAGE: &str = "Please upload a resume !!";

pub const EXTRACT_COLUMNS: [&str; 3] = ["Sr.no", "File Name", "key_info"];
pub const COMPARE_COLUMNS: [&str; 3] = ["File Name", "Match %", "Missing Keywords"];

// ────────────────────────────────────────────────────────────────────────────
// Request intake
// ────────────────────────────────────────────────────────────────────────────

/// One uploaded resume: file name plus raw PDF bytes. Lives for one request.
pub struct UploadedResume {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Default)]
struct AnalysisForm {
    resumes: Vec<UploadedResume>,
    job_description: Option<String>,
    method: Option<String>,
    on_error: Option<String>,
}

/// Collects multipart fields. `resume` file fields accumulate in upload
/// order; unknown fields are ignored.
async fn read_form(mut multipart: Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field
                    .file_name()
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        AppError::Validation("resume field must be a file upload".to_string())
                    })?;
                if !file_name.to_lowercase().ends_with(".pdf") {
                    return Err(AppError::Validation(format!(
                        "only .pdf files are accepted, got '{file_name}'"
                    )));
                }
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("failed to read upload '{file_name}': {e}"))
                })?;
                form.resumes.push(UploadedResume { file_name, bytes });
            }
            "job_description" => {
                form.job_description = Some(read_text_field(field, "job_description").await?);
            }
            "method" => {
                form.method = Some(read_text_field(field, "method").await?);
            }
            "on_error" => {
                form.on_error = Some(read_text_field(field, "on_error").await?);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read field '{name}': {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Failure policy
// ────────────────────────────────────────────────────────────────────────────

/// What to do when one file fails mid-batch: abort the whole run (default,
/// no partial table) or skip the file and record the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

impl FailurePolicy {
    fn from_form(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None => Ok(Self::default()),
            Some("abort") => Ok(Self::Abort),
            Some("skip") => Ok(Self::Skip),
            Some(other) => Err(AppError::Validation(format!(
                "on_error must be 'abort' or 'skip', got '{other}'"
            ))),
        }
    }
}

/// Which step of the per-file pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Extract,
    Model,
    Parse,
}

impl FailureStage {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Model => "model",
            Self::Parse => "parse",
        }
    }
}

/// A skipped file's failure record, returned alongside the table rows.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub stage: FailureStage,
    pub message: String,
}

/// Applies the failure policy to one failed file: records it under `Skip`,
/// converts it into the aborting response error under `Abort`.
fn record_or_abort<E: std::fmt::Display>(
    policy: FailurePolicy,
    failures: &mut Vec<FileFailure>,
    file_name: &str,
    stage: FailureStage,
    error: E,
) -> Result<(), AppError> {
    match policy {
        FailurePolicy::Skip => {
            warn!(
                "skipping '{}' after {} failure: {}",
                file_name,
                stage.as_str(),
                error
            );
            failures.push(FileFailure {
                file_name: file_name.to_string(),
                stage,
                message: error.to_string(),
            });
            Ok(())
        }
        FailurePolicy::Abort => {
            let message = format!("{file_name}: {error}");
            Err(match stage {
                FailureStage::Extract => AppError::Extraction(message),
                FailureStage::Model => AppError::Llm(message),
                FailureStage::Parse => AppError::MalformedResponse(message),
            })
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractRow {
    pub sr_no: usize,
    pub file_name: String,
    pub key_info: String,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub columns: [&'static str; 3],
    pub rows: Vec<ExtractRow>,
    pub failures: Vec<FileFailure>,
}

/// POST /api/v1/resumes/extract
///
/// Extracts each uploaded resume's text and summarizes its key information
/// via the model, one table row per file in upload order.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let form = read_form(multipart).await?;
    if form.resumes.is_empty() {
        return Err(AppError::Validation(NO_RESUME_MESSAGE.to_string()));
    }
    let policy = FailurePolicy::from_form(form.on_error.as_deref())?;

    let mut rows = Vec::new();
    let mut failures = Vec::new();

    for resume in &form.resumes {
        let text = match extract_resume_text(&resume.bytes) {
            Ok(text) => text,
            Err(e) => {
                record_or_abort(
                    policy,
                    &mut failures,
                    &resume.file_name,
                    FailureStage::Extract,
                    e,
                )?;
                continue;
            }
        };

        let key_info = match get_key_info(&text, &state.llm, &state.key_info_cache).await {
            Ok(key_info) => key_info,
            Err(e) => {
                record_or_abort(policy, &mut failures, &resume.file_name, FailureStage::Model, e)?;
                continue;
            }
        };

        info!("extracted key information for '{}'", resume.file_name);
        rows.push(ExtractRow {
            sr_no: rows.len() + 1,
            file_name: resume.file_name.clone(),
            key_info,
        });
    }

    Ok(Json(ExtractResponse {
        columns: EXTRACT_COLUMNS,
        rows,
        failures,
    }))
}

#[derive(Debug, Serialize)]
pub struct CompareRow {
    pub file_name: String,
    pub jd_match: String,
    pub missing_keywords: String,
}

#[derive(Serialize)]
pub struct CompareResponse {
    pub columns: [&'static str; 3],
    pub rows: Vec<CompareRow>,
    pub failures: Vec<FileFailure>,
}

/// POST /api/v1/resumes/compare
///
/// Scores each uploaded resume against the job description with the
/// selected comparison method. The method is resolved before any file is
/// touched.
pub async fn handle_compare(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CompareResponse>, AppError> {
    let form = read_form(multipart).await?;
    if form.resumes.is_empty() {
        return Err(AppError::Validation(NO_RESUME_MESSAGE.to_string()));
    }

    let job_description = form
        .job_description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if job_description.is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let method_label = form.method.as_deref().unwrap_or("Gemini");
    let matcher = MatchMethod::parse(method_label)
        .and_then(|method| method.resolve(&state.matcher))
        .ok_or_else(|| AppError::UnsupportedMethod {
            method: method_label.to_string(),
        })?;

    let policy = FailurePolicy::from_form(form.on_error.as_deref())?;

    let mut rows = Vec::new();
    let mut failures = Vec::new();

    for resume in &form.resumes {
        let text = match extract_resume_text(&resume.bytes) {
            Ok(text) => text,
            Err(e) => {
                record_or_abort(
                    policy,
                    &mut failures,
                    &resume.file_name,
                    FailureStage::Extract,
                    e,
                )?;
                continue;
            }
        };

        let report = match matcher.compare(&text, job_description).await {
            Ok(report) => report,
            Err(e) => {
                let stage = match &e {
                    MatchError::Llm(_) => FailureStage::Model,
                    MatchError::Malformed(_) => FailureStage::Parse,
                };
                record_or_abort(policy, &mut failures, &resume.file_name, stage, e)?;
                continue;
            }
        };

        info!(
            "compared '{}' against the job description: {}",
            resume.file_name, report.jd_match
        );
        rows.push(CompareRow {
            file_name: resume.file_name.clone(),
            jd_match: report.jd_match,
            missing_keywords: report.missing_keywords,
        });
    }

    Ok(Json(CompareResponse {
        columns: COMPARE_COLUMNS,
        rows,
        failures,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
