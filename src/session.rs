//! Scan session: owns the current contact directory between scans.
//!
//! A session starts empty, is filled by [`Session::scan`], and is reset by
//! [`Session::clear`]. A failed scan leaves the previous result in place.

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{ingest_with, IngestOptions};
use crate::error::{Result, ScanError};
use crate::model::contact::ContactRecord;
use crate::model::directory::ContactDirectory;
use crate::query::{self, ContactDetail};
use crate::source::{MessageSource, DEFAULT_BATCH_LIMIT};

/// Outcome of a successful scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub messages: usize,
    pub contacts: usize,
}

/// Headline numbers for the current directory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub total_contacts: usize,
    pub total_messages: usize,
    /// Messages scanned divided by contacts found (0 when there are none).
    pub avg_per_contact: f64,
}

/// Scan settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Maximum messages fetched per scan.
    pub batch_limit: usize,
    /// Number of history entries in a detail view.
    pub recent_history_limit: usize,
    pub ingest: IngestOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            batch_limit: DEFAULT_BATCH_LIMIT,
            recent_history_limit: query::RECENT_HISTORY_LIMIT,
            ingest: IngestOptions::default(),
        }
    }
}

/// The current scan result and the settings used to produce it.
#[derive(Debug, Default)]
pub struct Session {
    options: SessionOptions,
    directory: ContactDirectory,
    messages_scanned: usize,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Fetch one batch from `source` and replace the directory with it.
    ///
    /// On error the previous directory and counts are kept unchanged.
    pub fn scan(&mut self, source: &mut dyn MessageSource) -> Result<ScanSummary> {
        let messages = match source.fetch(self.options.batch_limit) {
            Ok(m) => m,
            Err(e) => {
                warn!(
                    source = %source.describe(),
                    error = %e,
                    "Scan failed; keeping previous results"
                );
                return Err(e);
            }
        };

        self.directory = ingest_with(&messages, &self.options.ingest);
        self.messages_scanned = messages.len();

        let summary = ScanSummary {
            messages: self.messages_scanned,
            contacts: self.directory.len(),
        };
        info!(
            source = %source.describe(),
            messages = summary.messages,
            contacts = summary.contacts,
            "Scan complete"
        );
        Ok(summary)
    }

    /// Forget the current results.
    pub fn clear(&mut self) {
        self.directory.clear();
        self.messages_scanned = 0;
        info!("Results cleared");
    }

    pub fn directory(&self) -> &ContactDirectory {
        &self.directory
    }

    /// Number of messages in the last successful scan.
    pub fn messages_scanned(&self) -> usize {
        self.messages_scanned
    }

    /// All contacts, most frequent first.
    pub fn ranked(&self) -> Vec<&ContactRecord> {
        query::rank(&self.directory)
    }

    /// The `n` most frequent contacts.
    pub fn top(&self, n: usize) -> Vec<&ContactRecord> {
        query::top(&self.directory, n)
    }

    /// Ranked contacts matching `query` (all of them for a blank query).
    pub fn search(&self, query: &str) -> Vec<&ContactRecord> {
        query::search(&self.directory, query)
    }

    /// Detail view for the contact with this address.
    pub fn detail(&self, address: &str) -> Result<ContactDetail<'_>> {
        let contact = self
            .directory
            .get(address)
            .ok_or_else(|| ScanError::ContactNotFound(address.trim().to_string()))?;
        Ok(query::detail_with_limit(
            contact,
            self.options.recent_history_limit,
        ))
    }

    pub fn stats(&self) -> DirectoryStats {
        let total_contacts = self.directory.len();
        let avg_per_contact = if total_contacts == 0 {
            0.0
        } else {
            self.messages_scanned as f64 / total_contacts as f64
        };
        DirectoryStats {
            total_contacts,
            total_messages: self.messages_scanned,
            avg_per_contact,
        }
    }
}
