//! Per-contact detail: counters plus the most recent messages.

use crate::model::contact::{ContactRecord, MessageReference};

/// Number of history entries shown in a detail view.
pub const RECENT_HISTORY_LIMIT: usize = 10;

/// Detail view of one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetail<'a> {
    pub header: &'a ContactRecord,
    /// Newest first, at most the configured limit.
    pub recent_history: Vec<&'a MessageReference>,
    /// How many history entries did not fit.
    pub overflow_count: usize,
}

/// Detail view with the default limit of [`RECENT_HISTORY_LIMIT`] entries.
pub fn detail(contact: &ContactRecord) -> ContactDetail<'_> {
    detail_with_limit(contact, RECENT_HISTORY_LIMIT)
}

/// Detail view keeping at most `limit` history entries.
///
/// History is sorted newest first on a copy; entries received at the same
/// time keep their scan order, and entries without a timestamp come last.
pub fn detail_with_limit(contact: &ContactRecord, limit: usize) -> ContactDetail<'_> {
    let history = contact.history();
    let mut recent: Vec<&MessageReference> = history.iter().collect();
    // `None < Some(_)`, so reversing the comparison puts undated entries last.
    recent.sort_by(|a, b| b.received_at.cmp(&a.received_at));
    recent.truncate(limit);

    ContactDetail {
        header: contact,
        recent_history: recent,
        overflow_count: history.len().saturating_sub(limit),
    }
}
