//! Export of a search response as a downloadable JSON or CSV file.

use thiserror::Error;

use crate::types::SearchResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Case-insensitive; anything unrecognized is a client error upstream.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A rendered attachment ready to be sent as a file download.
#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub fn export_results(
    response: &SearchResponse,
    format: ExportFormat,
) -> Result<ExportFile, ExportError> {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");

    match format {
        ExportFormat::Json => Ok(ExportFile {
            filename: format!("search_results_{stamp}.json"),
            content_type: "application/json",
            body: serde_json::to_vec_pretty(response)?,
        }),
        ExportFormat::Csv => Ok(ExportFile {
            filename: format!("search_results_{stamp}.csv"),
            content_type: "text/csv",
            body: render_csv(response)?,
        }),
    }
}

fn render_csv(response: &SearchResponse) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Position", "Title", "URL", "Description"])?;
    for result in &response.results {
        writer.write_record([
            result.position.to_string(),
            result.title.clone(),
            result.url.clone(),
            result.description.clone(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}
