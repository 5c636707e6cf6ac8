use serde::Serialize;

/// Body of a successful `/process-pdf` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub text: String,
    pub output_file_path: String,
    pub credit_report: String,
}

/// JSON error body — the only shape error responses ever take.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
