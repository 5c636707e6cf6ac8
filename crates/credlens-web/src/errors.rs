//! Request-level error taxonomy and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use credlens_extract::ExtractError;
use credlens_report::ReportError;

use crate::archive::ArchiveError;
use crate::models::ErrorBody;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no PDF file uploaded")]
    MissingInput,
    #[error("multipart upload error: {0}")]
    Upload(String),
    #[error("extraction service error: {0}")]
    Extraction(#[from] ExtractError),
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("malformed structured data: {0}")]
    MalformedStructuredData(#[from] serde_json::Error),
    #[error("report service error: {0}")]
    Report(#[from] ReportError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Clients see one of three fixed bodies; every server-side stage
    /// failure other than the missing archive entry collapses into the
    /// generic message.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            PipelineError::MissingInput => (StatusCode::BAD_REQUEST, "No PDF file uploaded."),
            PipelineError::Archive(ArchiveError::EntryNotFound(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "No structured data found.")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Error extracting text."),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        // The underlying cause is for operators only; it never reaches the client.
        if status.is_server_error() {
            tracing::error!(error = %self, "request pipeline failed");
        } else {
            tracing::warn!(error = %self, "rejected request");
        }
        (status, Json(ErrorBody { error: message.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_is_a_client_error() {
        let (status, message) = PipelineError::MissingInput.status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "No PDF file uploaded.");
    }

    #[test]
    fn missing_archive_entry_has_its_own_body() {
        let err = PipelineError::Archive(ArchiveError::EntryNotFound(
            "structuredData.json".to_string(),
        ));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "No structured data found.");
    }

    #[test]
    fn service_failures_collapse_into_the_generic_body() {
        let cases = [
            PipelineError::Extraction(ExtractError::Api("rejected".into())),
            PipelineError::Extraction(ExtractError::Usage("quota".into())),
            PipelineError::Report(ReportError::NoChoices),
            PipelineError::Upload("truncated form".into()),
            PipelineError::Io(std::io::Error::other("disk full")),
        ];
        for err in cases {
            let (status, message) = err.status_and_message();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Error extracting text.");
        }
    }

    #[test]
    fn malformed_json_collapses_into_the_generic_body() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let (status, message) = PipelineError::MalformedStructuredData(parse_err).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Error extracting text.");
    }
}
