//! Metadata enricher: resolves server-reported filenames via HEAD requests.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::{domain::DocumentRecord, errors::Error, ports::MetadataSource, Result};

/// Issues one header-only request per record over a shared client and fills
/// in `filename` from the `Content-Disposition` response header.
#[derive(Clone, Debug)]
pub struct MetadataEnricher {
    http: reqwest::Client,
}

impl MetadataEnricher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("http client build: {e}")))?;
        Ok(Self { http })
    }

    async fn head_filename(&self, url: &str) -> Result<Option<String>> {
        let resp = self
            .http
            .head(url)
            .send()
            .await
            .map_err(|e| Error::External(format!("head request: {e}")))?;

        let Some(disposition) = resp
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
        else {
            return Ok(None);
        };

        Ok(parse_disposition_filename(disposition))
    }
}

#[async_trait]
impl MetadataSource for MetadataEnricher {
    /// Attaches filenames to `records` in place, sequentially.
    ///
    /// A failed or headerless request leaves that record's filename unset and
    /// never aborts the batch; the diff engine treats the absent value as a
    /// comparison input like any other.
    async fn attach_filenames(&self, records: &mut [DocumentRecord]) {
        for record in records.iter_mut() {
            match self.head_filename(&record.url).await {
                Ok(filename) => record.filename = filename,
                Err(e) => {
                    warn!(url = %record.url, error = %e, "metadata request failed");
                    record.filename = None;
                }
            }
        }
    }
}

/// Pulls the `filename=` token out of a `Content-Disposition` header value.
pub fn parse_disposition_filename(disposition: &str) -> Option<String> {
    for part in disposition.split(';') {
        let part = part.trim();
        let Some(value) = part.strip_prefix("filename=") else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        if value.is_empty() {
            return None;
        }
        return Some(value.to_string());
    }
    None
}
