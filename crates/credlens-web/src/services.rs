//! Trait seams over the two vendor services.
//!
//! The real clients implement these; tests substitute hand-rolled mocks so
//! the whole pipeline runs offline.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use credlens_extract::{ElementType, ExtractClient, ExtractError};
use credlens_report::{ReportClient, ReportError};

/// Runs a text-extraction job for a stored upload and saves the result
/// archive to `output`.
pub trait DocumentExtractor: Send + Sync {
    fn extract_to<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), ExtractError>> + Send + 'a>>;
}

/// Produces a generated report for a prompt, capped at `max_tokens`.
pub trait ReportGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String, ReportError>> + Send + 'a>>;
}

/// The service is always asked for plain-text extraction.
const TEXT_ONLY: &[ElementType] = &[ElementType::Text];

impl DocumentExtractor for ExtractClient {
    fn extract_to<'a>(
        &'a self,
        input: &'a Path,
        output: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), ExtractError>> + Send + 'a>> {
        Box::pin(ExtractClient::extract_to(self, input, output, TEXT_ONLY))
    }
}

impl ReportGenerator for ReportClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
    ) -> Pin<Box<dyn Future<Output = Result<String, ReportError>> + Send + 'a>> {
        Box::pin(ReportClient::generate(self, prompt, max_tokens))
    }
}
