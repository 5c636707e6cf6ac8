//! Multipart upload receiver.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::Multipart;

use crate::errors::PipelineError;

/// The multipart field the PDF must arrive in.
pub const UPLOAD_FIELD: &str = "pdfFile";

/// A stored upload with its metadata.
#[derive(Debug)]
pub struct StoredPdf {
    pub original_filename: String,
    pub path: PathBuf,
    pub content_type: Option<String>,
}

/// Read the `pdfFile` field and persist it under `upload_dir`.
///
/// Absence of the field is [`PipelineError::MissingInput`]; the handler
/// turns that into the 400 response without running any pipeline step.
pub async fn receive_pdf(
    mut multipart: Multipart,
    upload_dir: &Path,
) -> Result<StoredPdf, PipelineError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PipelineError::Upload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            // Drain and ignore unknown fields
            let _ = field.bytes().await;
            continue;
        }

        let original_filename = field.file_name().unwrap_or("upload.pdf").to_string();
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| PipelineError::Upload(e.to_string()))?;

        let path = store(upload_dir, &original_filename, &data)?;
        return Ok(StoredPdf {
            original_filename,
            path,
            content_type,
        });
    }

    Err(PipelineError::MissingInput)
}

/// Write the upload as `<millis>-<random><original extension>`.
///
/// The random part is generated by `tempfile` with O_EXCL creation, so two
/// concurrent uploads in the same clock tick can never share a path.
fn store(upload_dir: &Path, original_filename: &str, data: &[u8]) -> Result<PathBuf, PipelineError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let temp = tempfile::Builder::new()
        .prefix(&format!("{millis}-"))
        .suffix(&extension_of(original_filename))
        .tempfile_in(upload_dir)
        .map_err(PipelineError::Io)?;

    let (mut file, path) = temp.keep().map_err(|e| PipelineError::Io(e.error))?;
    file.write_all(data).map_err(PipelineError::Io)?;
    Ok(path)
}

/// Original extension with its dot, or empty for extensionless names.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}
