//! Dataset acquisition: local CSV first, HTTP fallback.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::DatasetSource;
use crate::error::AppError;
use crate::io::ingest::{IngestedData, read_dataset};

/// Public copy of the Telco customer churn dataset.
pub const DEFAULT_DATA_URL: &str =
    "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/Telco-Customer-Churn-re6WUJLg9NQrkqYJuGUfxcUvxUbjYe.csv";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Load the raw dataset described by `source`.
pub fn load_dataset(source: &DatasetSource) -> Result<IngestedData, AppError> {
    let data = match &source.input {
        Some(path) if path.exists() => {
            log::info!("loading dataset from local file: {}", path.display());
            let file = File::open(path)
                .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
            read_dataset(BufReader::new(file))?
        }
        Some(path) => {
            log::warn!(
                "local file not found at {}; falling back to URL",
                path.display()
            );
            fetch_dataset(&source.url, source.timeout)?
        }
        None => fetch_dataset(&source.url, source.timeout)?,
    };

    for err in &data.row_errors {
        log::warn!("skipped CSV line {}: {}", err.line, err.message);
    }
    log::info!(
        "dataset shape: {} rows x {} columns ({} lines read)",
        data.dataset.len(),
        data.dataset.columns.len(),
        data.rows_read
    );
    Ok(data)
}

/// Download and parse a CSV over HTTP.
pub fn fetch_dataset(url: &str, timeout: Duration) -> Result<IngestedData, AppError> {
    log::info!("downloading dataset from: {url}");

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::input(format!("Failed to build HTTP client: {e}")))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| AppError::input(format!("Dataset request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::input(format!(
            "Dataset request failed with status {}.",
            resp.status()
        )));
    }

    let body = resp
        .bytes()
        .map_err(|e| AppError::input(format!("Failed to read dataset response: {e}")))?;

    read_dataset(body.as_ref())
}
