//! Message header records handed over by a message source.

use chrono::{DateTime, Utc};

use super::address::{RecipientRef, RecipientRole};

/// Header data of a single message.
///
/// Only what contact aggregation needs is kept: the subject, the receive
/// timestamp and the recipients. Any field may be missing; the engine
/// substitutes defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageRecord {
    /// Decoded subject line, if the message had one.
    pub subject: Option<String>,

    /// When the message was received (or sent, for MBOX sources).
    pub received_at: Option<DateTime<Utc>>,

    /// Recipients in header order. Roles may be interleaved.
    pub recipients: Vec<RecipientRef>,
}

impl MessageRecord {
    /// Create a record with a subject and timestamp and no recipients.
    pub fn new(subject: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            subject: Some(subject.into()),
            received_at: Some(received_at),
            recipients: Vec::new(),
        }
    }

    /// Append a recipient (builder style).
    pub fn with_recipient(mut self, recipient: RecipientRef) -> Self {
        self.recipients.push(recipient);
        self
    }

    /// Recipients holding `role`, in header order.
    pub fn recipients_in(&self, role: RecipientRole) -> impl Iterator<Item = &RecipientRef> {
        self.recipients.iter().filter(move |r| r.role == role)
    }
}
