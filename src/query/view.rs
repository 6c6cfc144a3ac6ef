//! Plain, serializable view models handed to a presenter.
//!
//! Presenters never need the directory itself: they render these and refer
//! back to a contact by its `address` key.

use serde::Serialize;

use crate::model::contact::{ContactRecord, MessageReference};

use super::detail::ContactDetail;

/// One row of a ranked or filtered contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    /// Normalized address; the lookup key for [`crate::session::Session::detail`].
    pub address: String,
    pub display_name: String,
    pub primary_count: usize,
    pub copy_count: usize,
    pub blind_copy_count: usize,
    pub total_count: usize,
}

impl From<&ContactRecord> for ContactSummary {
    fn from(c: &ContactRecord) -> Self {
        Self {
            address: c.normalized_address().to_string(),
            display_name: c.display_name().to_string(),
            primary_count: c.primary_count(),
            copy_count: c.copy_count(),
            blind_copy_count: c.blind_copy_count(),
            total_count: c.total_count(),
        }
    }
}

/// Summaries for a ranked or filtered list.
pub fn summaries(contacts: &[&ContactRecord]) -> Vec<ContactSummary> {
    contacts.iter().map(|c| ContactSummary::from(*c)).collect()
}

/// Owned, serializable form of a [`ContactDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetailView {
    #[serde(flatten)]
    pub summary: ContactSummary,
    pub recent_history: Vec<MessageReference>,
    pub overflow_count: usize,
}

impl From<&ContactDetail<'_>> for ContactDetailView {
    fn from(d: &ContactDetail<'_>) -> Self {
        Self {
            summary: ContactSummary::from(d.header),
            recent_history: d.recent_history.iter().map(|h| (*h).clone()).collect(),
            overflow_count: d.overflow_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ingest;
    use crate::model::address::{RecipientRef, RecipientRole};
    use crate::model::message::MessageRecord;
    use crate::query::detail::detail;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_detail_json_shape() {
        let msg = MessageRecord::new("Hi", Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap())
            .with_recipient(RecipientRef::new(RecipientRole::Copy, "B@x.com").with_name("Bee"));
        let dir = ingest(&[msg]);
        let view = ContactDetailView::from(&detail(dir.get("b@x.com").unwrap()));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["address"], "b@x.com");
        assert_eq!(json["displayName"], "Bee");
        assert_eq!(json["copyCount"], 1);
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["overflowCount"], 0);
        assert_eq!(json["recentHistory"][0]["subject"], "Hi");
        assert_eq!(json["recentHistory"][0]["role"], "copy");
        assert_eq!(json["recentHistory"][0]["receivedAt"], "2024-01-01T10:00:00Z");
    }
}
