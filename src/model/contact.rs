//! Aggregated per-contact record and its message history.

use chrono::{DateTime, Utc};

use super::address::{normalize_address, RecipientRole};

/// Subject recorded for messages that had none.
pub const NO_SUBJECT: &str = "(No subject)";

/// One message a contact appeared on, and in which role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReference {
    pub subject: String,
    pub received_at: Option<DateTime<Utc>>,
    pub role: RecipientRole,
}

/// Everything known about one correspondent after a scan.
///
/// Counters and history only change together through [`ContactRecord::record`],
/// so `total_count() == primary + copy + blind_copy == history.len()` holds
/// for every record the engine hands out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    normalized_address: String,
    address: String,
    display_name: String,
    primary_count: usize,
    copy_count: usize,
    blind_copy_count: usize,
    total_count: usize,
    history: Vec<MessageReference>,
}

impl ContactRecord {
    /// Create an empty record from the first occurrence of an address.
    ///
    /// `display_name` falls back to the address when absent or blank.
    pub(crate) fn new(address: &str, display_name: Option<&str>) -> Self {
        let address = address.trim();
        let display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(address);
        Self {
            normalized_address: normalize_address(address),
            address: address.to_string(),
            display_name: display_name.to_string(),
            primary_count: 0,
            copy_count: 0,
            blind_copy_count: 0,
            total_count: 0,
            history: Vec::new(),
        }
    }

    /// Count one more appearance on a message.
    pub(crate) fn record(&mut self, reference: MessageReference) {
        match reference.role {
            RecipientRole::Primary => self.primary_count += 1,
            RecipientRole::Copy => self.copy_count += 1,
            RecipientRole::BlindCopy => self.blind_copy_count += 1,
        }
        self.total_count += 1;
        self.history.push(reference);
        debug_assert_eq!(self.total_count, self.history.len());
    }

    /// Lowercased, trimmed address. Unique within a directory.
    pub fn normalized_address(&self) -> &str {
        &self.normalized_address
    }

    /// Address as spelled on its first occurrence.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Display name from the first occurrence (or the address).
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether a real display name was supplied, as opposed to the address fallback.
    pub fn has_display_name(&self) -> bool {
        self.display_name != self.address
    }

    pub fn primary_count(&self) -> usize {
        self.primary_count
    }

    pub fn copy_count(&self) -> usize {
        self.copy_count
    }

    pub fn blind_copy_count(&self) -> usize {
        self.blind_copy_count
    }

    /// Counter for a single role.
    pub fn count_for(&self, role: RecipientRole) -> usize {
        match role {
            RecipientRole::Primary => self.primary_count,
            RecipientRole::Copy => self.copy_count,
            RecipientRole::BlindCopy => self.blind_copy_count,
        }
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Messages in the order they were scanned (not sorted by date).
    pub fn history(&self) -> &[MessageReference] {
        &self.history
    }
}
