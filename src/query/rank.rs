//! Ranking contacts by how often they were addressed.

use crate::model::contact::ContactRecord;
use crate::model::directory::ContactDirectory;

/// All contacts, most frequent first.
///
/// Contacts with equal totals keep the order in which they were first seen
/// during the scan (`sort_by` is stable).
pub fn rank(directory: &ContactDirectory) -> Vec<&ContactRecord> {
    let mut ranked: Vec<&ContactRecord> = directory.iter().collect();
    ranked.sort_by(|a, b| b.total_count().cmp(&a.total_count()));
    ranked
}

/// The `n` most frequent contacts.
pub fn top(directory: &ContactDirectory, n: usize) -> Vec<&ContactRecord> {
    let mut ranked = rank(directory);
    ranked.truncate(n);
    ranked
}
