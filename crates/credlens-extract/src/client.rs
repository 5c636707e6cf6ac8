//! REST client for the extraction service.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::{ElementType, ExtractError};

pub const DEFAULT_BASE_URL: &str = "https://pdf-services.adobe.io";

/// Delay between job status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Client for the document-extraction REST API.
///
/// One instance is shared across requests; the underlying `reqwest::Client`
/// pools connections internally.
pub struct ExtractClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    #[serde(rename = "assetID")]
    asset_id: String,
    #[serde(rename = "uploadUri")]
    upload_uri: String,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    status: String,
    resource: Option<DownloadRef>,
    error: Option<JobError>,
}

#[derive(Debug, Deserialize)]
struct DownloadRef {
    #[serde(rename = "downloadUri")]
    download_uri: String,
}

#[derive(Debug, Deserialize)]
struct JobError {
    code: Option<String>,
    message: Option<String>,
}

impl ExtractClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("credlens-extract/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout,
        })
    }

    /// Run extraction for `input` and save the result archive to `output`.
    ///
    /// The whole sequence (token, upload, job, download) shares one deadline
    /// derived from the configured timeout.
    pub async fn extract_to(
        &self,
        input: &Path,
        output: &Path,
        elements: &[ElementType],
    ) -> Result<(), ExtractError> {
        let deadline = Instant::now() + self.timeout;

        let token = self.fetch_token().await?;
        let asset = self.create_asset(&token).await?;
        self.upload_asset(&asset.upload_uri, input).await?;
        let location = self.submit_job(&token, &asset.asset_id, elements).await?;
        let download_uri = self.poll_job(&token, &location, deadline).await?;
        self.download_archive(&download_uri, output).await
    }

    /// Exchange client credentials for a short-lived access token.
    async fn fetch_token(&self) -> Result<String, ExtractError> {
        let resp = self
            .client
            .post(format!("{}/token", self.base_url))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }

    /// Register an upload asset; returns its id and a presigned upload URI.
    async fn create_asset(&self, token: &str) -> Result<AssetResponse, ExtractError> {
        let resp = self
            .client
            .post(format!("{}/assets", self.base_url))
            .bearer_auth(token)
            .header("X-API-Key", &self.client_id)
            .json(&json!({ "mediaType": "application/pdf" }))
            .send()
            .await?;

        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// PUT the PDF bytes to the presigned upload URI.
    async fn upload_asset(&self, upload_uri: &str, input: &Path) -> Result<(), ExtractError> {
        let data = std::fs::read(input)?;
        let resp = self
            .client
            .put(upload_uri)
            .header("Content-Type", "application/pdf")
            .body(data)
            .send()
            .await?;

        check_status(resp).await?;
        Ok(())
    }

    /// Submit the extract job; returns the polling URL from the Location header.
    async fn submit_job(
        &self,
        token: &str,
        asset_id: &str,
        elements: &[ElementType],
    ) -> Result<String, ExtractError> {
        let elements: Vec<&str> = elements.iter().map(|e| e.as_str()).collect();
        let resp = self
            .client
            .post(format!("{}/operation/extractpdf", self.base_url))
            .bearer_auth(token)
            .header("X-API-Key", &self.client_id)
            .json(&json!({
                "assetID": asset_id,
                "elementsToExtract": elements,
            }))
            .send()
            .await?;

        let resp = check_status(resp).await?;
        resp.headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| ExtractError::Api("job submission returned no Location header".into()))
    }

    /// Poll the job until it settles or the deadline passes.
    async fn poll_job(
        &self,
        token: &str,
        location: &str,
        deadline: Instant,
    ) -> Result<String, ExtractError> {
        loop {
            if Instant::now() >= deadline {
                return Err(ExtractError::Timeout(self.timeout));
            }

            let resp = self
                .client
                .get(location)
                .bearer_auth(token)
                .header("X-API-Key", &self.client_id)
                .send()
                .await?;

            let resp = check_status(resp).await?;
            let status: JobStatus = resp.json().await?;

            match status.status.as_str() {
                "done" => {
                    let resource = status.resource.ok_or_else(|| {
                        ExtractError::Api("job finished without a result resource".into())
                    })?;
                    return Ok(resource.download_uri);
                }
                "failed" => return Err(job_failure(status.error)),
                // "in progress" and anything transitional: keep polling
                _ => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
    }

    /// Stream the result archive to `output`.
    async fn download_archive(&self, uri: &str, output: &Path) -> Result<(), ExtractError> {
        let resp = self.client.get(uri).send().await?;
        let resp = check_status(resp).await?;

        let mut out = File::create(output)?;
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            out.write_all(&chunk?)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Map a non-success response to the error taxonomy, consuming its body.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ExtractError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(classify_failure(status, &body))
}

/// Quota and billing rejections are usage errors; everything else is an API
/// error. The web layer responds identically to both.
fn classify_failure(status: StatusCode, body: &str) -> ExtractError {
    let detail = if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    };
    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => ExtractError::Usage(detail),
        _ => ExtractError::Api(detail),
    }
}

fn job_failure(error: Option<JobError>) -> ExtractError {
    let detail = match error {
        Some(e) => format!(
            "extraction job failed: {} ({})",
            e.message.unwrap_or_else(|| "unknown error".into()),
            e.code.unwrap_or_else(|| "no code".into()),
        ),
        None => "extraction job failed".into(),
    };
    ExtractError::Api(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_classifies_as_usage() {
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, "quota exceeded");
        assert!(matches!(err, ExtractError::Usage(_)));
    }

    #[test]
    fn payment_required_classifies_as_usage() {
        let err = classify_failure(StatusCode::PAYMENT_REQUIRED, "");
        assert!(matches!(err, ExtractError::Usage(_)));
    }

    #[test]
    fn server_error_classifies_as_api() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let ExtractError::Api(detail) = err else {
            panic!("expected Api error");
        };
        assert!(detail.contains("500"));
        assert!(detail.contains("boom"));
    }

    #[test]
    fn job_status_parses_done_with_resource() {
        let status: JobStatus = serde_json::from_str(
            r#"{"status":"done","resource":{"downloadUri":"https://dl.example/archive.zip"}}"#,
        )
        .unwrap();
        assert_eq!(status.status, "done");
        assert_eq!(
            status.resource.unwrap().download_uri,
            "https://dl.example/archive.zip"
        );
    }

    #[test]
    fn job_status_parses_failure() {
        let status: JobStatus = serde_json::from_str(
            r#"{"status":"failed","error":{"code":"ERR_TIMEOUT","message":"processing timed out"}}"#,
        )
        .unwrap();
        let err = job_failure(status.error);
        let ExtractError::Api(detail) = err else {
            panic!("expected Api error");
        };
        assert!(detail.contains("processing timed out"));
        assert!(detail.contains("ERR_TIMEOUT"));
    }

    #[test]
    fn job_status_tolerates_in_progress_shape() {
        let status: JobStatus = serde_json::from_str(r#"{"status":"in progress"}"#).unwrap();
        assert_eq!(status.status, "in progress");
        assert!(status.resource.is_none());
        assert!(status.error.is_none());
    }

    #[test]
    fn asset_response_parses_vendor_field_names() {
        let asset: AssetResponse = serde_json::from_str(
            r#"{"assetID":"urn:asset:123","uploadUri":"https://up.example/put"}"#,
        )
        .unwrap();
        assert_eq!(asset.asset_id, "urn:asset:123");
        assert_eq!(asset.upload_uri, "https://up.example/put");
    }
}
