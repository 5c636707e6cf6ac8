//! The upload → extract → unpack → report pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Local};

use crate::archive::{self, STRUCTURED_DATA_ENTRY};
use crate::errors::PipelineError;
use crate::models::ProcessResponse;
use crate::state::AppState;
use crate::upload;

/// Fixed instruction sent to the report service.
const REPORT_INSTRUCTION: &str = "Give a credit report based on the provided financial data:";

/// Generation-length cap for the report.
const REPORT_MAX_TOKENS: u32 = 100;

const SUCCESS_TEXT: &str = "Text extracted successfully";

pub async fn process_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    match run_pipeline(&state, multipart).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// One linear sequence of awaited calls inside a single error boundary.
/// The first failure short-circuits; a partial success is never reported.
async fn run_pipeline(
    state: &AppState,
    multipart: Multipart,
) -> Result<ProcessResponse, PipelineError> {
    let stored = upload::receive_pdf(multipart, &state.config.upload_dir).await?;
    tracing::info!(
        path = %stored.path.display(),
        original = %stored.original_filename,
        "stored upload"
    );

    let output_path = output_archive_path(&state.config.output_dir, Local::now());
    state
        .extractor
        .extract_to(&stored.path, &output_path)
        .await?;

    let raw = archive::read_entry_text(&output_path, STRUCTURED_DATA_ENTRY)?;
    // The document must parse, but the prompt carries the fixed instruction
    // alone — the parsed value is not appended.
    let _financial_data: serde_json::Value = serde_json::from_str(&raw)?;

    let credit_report = state
        .reporter
        .generate(REPORT_INSTRUCTION, REPORT_MAX_TOKENS)
        .await?;

    Ok(ProcessResponse {
        text: SUCCESS_TEXT.to_string(),
        output_file_path: output_path.to_string_lossy().into_owned(),
        credit_report,
    })
}

/// `extract-<YYYY-MM-DDTHH-mm-ss>.zip` under the output directory, stamped
/// from the local clock.
fn output_archive_path(output_dir: &Path, now: DateTime<Local>) -> PathBuf {
    output_dir.join(format!("extract-{}.zip", now.format("%Y-%m-%dT%H-%M-%S")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn output_path_uses_timestamp_pattern() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 9, 7, 2).unwrap();
        let path = output_archive_path(Path::new("output"), now);
        assert_eq!(
            path,
            PathBuf::from("output/extract-2024-03-05T09-07-02.zip")
        );
    }

    #[test]
    fn output_path_zero_pads_components() {
        let now = Local.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let path = output_archive_path(Path::new("/var/data/output"), now);
        assert_eq!(
            path,
            PathBuf::from("/var/data/output/extract-2026-12-31T23-59-59.zip")
        );
    }
}
