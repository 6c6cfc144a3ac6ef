//! Message batches stored as mail REST API JSON.
//!
//! Accepts the body of a `GET /me/messages?$select=toRecipients,ccRecipients,
//! bccRecipients,subject,receivedDateTime` response:
//!
//! ```json
//! { "value": [ { "subject": "Hi",
//!                "receivedDateTime": "2024-01-01T10:00:00Z",
//!                "toRecipients": [ { "emailAddress": { "name": "Alice", "address": "a@x.com" } } ],
//!                "ccRecipients": [], "bccRecipients": [] } ] }
//! ```
//!
//! A bare top-level array of messages is accepted too. Unknown fields are ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, ScanError};
use crate::model::address::{RecipientRef, RecipientRole};
use crate::model::message::MessageRecord;

use super::{parse_timestamp, MessageSource};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchBody {
    /// `value` must be present but may be `null`, which reads as no messages.
    Envelope {
        #[serde(deserialize_with = "Option::deserialize")]
        value: Option<Vec<RestMessage>>,
    },
    Bare(Vec<RestMessage>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RestMessage {
    subject: Option<String>,
    received_date_time: Option<String>,
    to_recipients: Option<Vec<RestRecipient>>,
    cc_recipients: Option<Vec<RestRecipient>>,
    bcc_recipients: Option<Vec<RestRecipient>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RestRecipient {
    email_address: Option<RestEmailAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestEmailAddress {
    name: Option<String>,
    address: Option<String>,
}

impl RestMessage {
    fn into_record(self) -> MessageRecord {
        let mut recipients = Vec::new();
        for (role, list) in [
            (RecipientRole::Primary, self.to_recipients),
            (RecipientRole::Copy, self.cc_recipients),
            (RecipientRole::BlindCopy, self.bcc_recipients),
        ] {
            for r in list.into_iter().flatten() {
                // A recipient without an `emailAddress` object still arrives
                // as an addressless reference; the engine drops it.
                let email = r.email_address.unwrap_or_default();
                recipients.push(RecipientRef {
                    role,
                    address: email.address,
                    display_name: email.name,
                });
            }
        }

        MessageRecord {
            subject: self.subject,
            received_at: self.received_date_time.as_deref().and_then(parse_timestamp),
            recipients,
        }
    }
}

/// Parse a JSON batch body into records, keeping at most `limit`.
pub fn parse_batch(json: &str, limit: usize) -> serde_json::Result<Vec<MessageRecord>> {
    let messages = match serde_json::from_str::<BatchBody>(json)? {
        BatchBody::Envelope { value } => value.unwrap_or_default(),
        BatchBody::Bare(list) => list,
    };
    Ok(messages
        .into_iter()
        .take(limit)
        .map(RestMessage::into_record)
        .collect())
}

/// A JSON batch file on disk.
pub struct JsonBatchSource {
    path: PathBuf,
}

impl JsonBatchSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MessageSource for JsonBatchSource {
    fn describe(&self) -> String {
        format!("JSON batch {}", self.path.display())
    }

    fn fetch(&mut self, limit: usize) -> Result<Vec<MessageRecord>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScanError::FileNotFound(self.path.clone())
            } else {
                ScanError::io(&self.path, e)
            }
        })?;

        let records = parse_batch(&contents, limit).map_err(|e| ScanError::InvalidBatch {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        info!(path = %self.path.display(), count = records.len(), "Read JSON batch");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let json = r#"{
            "@odata.context": "ignored",
            "value": [{
                "subject": "Hi",
                "receivedDateTime": "2024-01-01T10:00:00Z",
                "toRecipients": [{"emailAddress": {"name": "Alice", "address": "a@x.com"}}],
                "ccRecipients": [{"emailAddress": {"address": "b@x.com"}}],
                "bccRecipients": null
            }]
        }"#;
        let records = parse_batch(json, 500).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.subject.as_deref(), Some("Hi"));
        assert!(r.received_at.is_some());
        assert_eq!(r.recipients.len(), 2);
        assert_eq!(r.recipients[0].role, RecipientRole::Primary);
        assert_eq!(r.recipients[0].display_name.as_deref(), Some("Alice"));
        assert_eq!(r.recipients[1].role, RecipientRole::Copy);
        assert_eq!(r.recipients[1].display_name, None);
    }

    #[test]
    fn test_parse_bare_array_and_missing_fields() {
        let json = r#"[{}, {"toRecipients": [{}]}, {"receivedDateTime": "garbage"}]"#;
        let records = parse_batch(json, 500).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].recipients.is_empty());
        assert_eq!(records[1].recipients[0].address, None);
        assert!(records[2].received_at.is_none());
    }

    #[test]
    fn test_limit_applied() {
        let json = r#"{"value": [{"subject": "1"}, {"subject": "2"}, {"subject": "3"}]}"#;
        let records = parse_batch(json, 2).unwrap();
        let subjects: Vec<_> = records.iter().map(|r| r.subject.as_deref()).collect();
        assert_eq!(subjects, vec![Some("1"), Some("2")]);
    }

    #[test]
    fn test_null_value_is_empty_batch() {
        assert!(parse_batch(r#"{"value": null}"#, 500).unwrap().is_empty());
        assert!(parse_batch(r#"{"value": []}"#, 500).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_error() {
        assert!(parse_batch(r#"{"messages": []}"#, 10).is_err());
        assert!(parse_batch("not json", 10).is_err());
        assert!(parse_batch("{}", 10).is_err());
    }
}
