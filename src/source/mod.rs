//! Message sources: where a batch of message headers comes from.
//!
//! A source hands the aggregation engine an ordered, bounded batch of
//! [`MessageRecord`]s. All failures (missing file, malformed batch) are
//! reported here so the engine only ever sees a successfully read batch.

pub mod json;
pub mod mbox;

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, ScanError};
use crate::model::message::MessageRecord;

pub use json::JsonBatchSource;
pub use mbox::MboxSource;

/// Default number of messages fetched per scan.
pub const DEFAULT_BATCH_LIMIT: usize = 500;

/// Anything that can produce one batch of message headers.
pub trait MessageSource {
    /// Human-readable description for status lines and logs.
    fn describe(&self) -> String;

    /// Read at most `limit` messages, in source order.
    fn fetch(&mut self, limit: usize) -> Result<Vec<MessageRecord>>;
}

/// On-disk format of a message source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Pick by file extension: `.json` is a batch, anything else MBOX.
    Auto,
    /// Mail REST API response body (`{"value": [...]}`) or a bare array.
    Json,
    /// Unix MBOX file.
    Mbox,
}

impl FromStr for SourceFormat {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "json" => Ok(Self::Json),
            "mbox" => Ok(Self::Mbox),
            other => Err(ScanError::UnknownFormat(other.to_string())),
        }
    }
}

impl SourceFormat {
    /// Resolve `Auto` against a path.
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_json = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("json"));
                if is_json {
                    Self::Json
                } else {
                    Self::Mbox
                }
            }
            other => other,
        }
    }
}

/// Open the source for `path`. Fails early if the file does not exist.
pub fn open_source(path: &Path, format: SourceFormat) -> Result<Box<dyn MessageSource>> {
    if !path.exists() {
        return Err(ScanError::FileNotFound(path.to_path_buf()));
    }
    match format.resolve(path) {
        SourceFormat::Json => Ok(Box::new(JsonBatchSource::new(path))),
        SourceFormat::Mbox | SourceFormat::Auto => Ok(Box::new(MboxSource::new(path))),
    }
}

/// Parse a message timestamp. Unparseable or blank input yields `None`.
///
/// Accepts RFC 3339 (with offset), offset-less ISO 8601 (taken as UTC) and
/// RFC 2822.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    tracing::debug!(timestamp = trimmed, "Could not parse timestamp");
    None
}
