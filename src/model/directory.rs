//! The contact directory produced by one scan.

use std::collections::HashMap;

use super::address::normalize_address;
use super::contact::ContactRecord;

/// Contacts keyed by normalized address, kept in first-seen order.
///
/// A directory is either empty or the complete result of one
/// [`ingest`](crate::aggregate::ingest) call. There is no way to merge two
/// directories; a new scan builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDirectory {
    contacts: Vec<ContactRecord>,
    by_address: HashMap<String, usize>,
}

impl ContactDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Look up a contact by address. Case and surrounding whitespace are ignored.
    pub fn get(&self, address: &str) -> Option<&ContactRecord> {
        self.by_address
            .get(&normalize_address(address))
            .map(|&i| &self.contacts[i])
    }

    /// Contacts in the order their address was first seen.
    pub fn iter(&self) -> std::slice::Iter<'_, ContactRecord> {
        self.contacts.iter()
    }

    /// Drop every contact.
    pub fn clear(&mut self) {
        self.contacts.clear();
        self.by_address.clear();
    }

    /// Record for `normalized`, creating it with `make` on first sight.
    pub(crate) fn entry_or_insert_with(
        &mut self,
        normalized: &str,
        make: impl FnOnce() -> ContactRecord,
    ) -> &mut ContactRecord {
        let idx = match self.by_address.get(normalized) {
            Some(&i) => i,
            None => {
                let i = self.contacts.len();
                self.contacts.push(make());
                self.by_address.insert(normalized.to_string(), i);
                i
            }
        };
        &mut self.contacts[idx]
    }
}

impl<'a> IntoIterator for &'a ContactDirectory {
    type Item = &'a ContactRecord;
    type IntoIter = std::slice::Iter<'a, ContactRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
