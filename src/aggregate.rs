//! Contact aggregation: turn a batch of message records into a directory.
//!
//! Complexity: O(r) where r = total recipients across all messages.
//! No sorting happens here; ranking is done on demand by [`crate::query`].

use tracing::debug;

use crate::model::address::{is_plausible_address, normalize_address, RecipientRole};
use crate::model::contact::{ContactRecord, MessageReference, NO_SUBJECT};
use crate::model::directory::ContactDirectory;
use crate::model::message::MessageRecord;

/// Tunables for a single ingest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Also drop addresses without a basic `local@domain.tld` shape.
    pub validate_addresses: bool,
}

/// Build a directory from `messages` with default options.
pub fn ingest(messages: &[MessageRecord]) -> ContactDirectory {
    ingest_with(messages, &IngestOptions::default())
}

/// Build a directory from `messages`.
///
/// Recipients are visited per message in role order (to, cc, bcc), which only
/// affects the order of each contact's history. Recipients with an absent or
/// blank address are skipped. Never fails; every call starts from an empty
/// directory.
pub fn ingest_with(messages: &[MessageRecord], options: &IngestOptions) -> ContactDirectory {
    let mut directory = ContactDirectory::new();
    let mut skipped = 0usize;

    for message in messages {
        let subject = message
            .subject
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_SUBJECT);

        for role in RecipientRole::ALL {
            for recipient in message.recipients_in(role) {
                let Some(address) = recipient.usable_address() else {
                    skipped += 1;
                    continue;
                };
                if options.validate_addresses && !is_plausible_address(address) {
                    skipped += 1;
                    continue;
                }

                let key = normalize_address(address);
                let contact = directory.entry_or_insert_with(&key, || {
                    ContactRecord::new(address, recipient.display_name.as_deref())
                });
                contact.record(MessageReference {
                    subject: subject.to_string(),
                    received_at: message.received_at,
                    role,
                });
            }
        }
    }

    debug!(
        messages = messages.len(),
        contacts = directory.len(),
        skipped_recipients = skipped,
        "Aggregated contacts"
    );

    directory
}
