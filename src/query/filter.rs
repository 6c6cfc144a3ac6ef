//! Narrowing a ranked list by a search-box query.

use crate::model::contact::ContactRecord;

/// Keep contacts whose address or display name contains `query`,
/// ignoring case. Order is preserved.
///
/// A blank query returns the input unchanged. No match yields an empty list.
pub fn filter<'a>(ranked: &[&'a ContactRecord], query: &str) -> Vec<&'a ContactRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return ranked.to_vec();
    }

    ranked
        .iter()
        .copied()
        .filter(|contact| matches(contact, &needle))
        .collect()
}

/// Case-insensitive substring test. `needle` must already be lowercase.
fn matches(contact: &ContactRecord, needle: &str) -> bool {
    contact.normalized_address().contains(needle)
        || contact.address().to_lowercase().contains(needle)
        || contact.display_name().to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ingest;
    use crate::model::address::{RecipientRef, RecipientRole};
    use crate::model::directory::ContactDirectory;
    use crate::model::message::MessageRecord;
    use crate::query::rank::rank;

    fn directory() -> ContactDirectory {
        let m1 = MessageRecord::default()
            .with_recipient(
                RecipientRef::new(RecipientRole::Primary, "alice@corp.com")
                    .with_name("Alice Liddell"),
            )
            .with_recipient(RecipientRef::new(RecipientRole::Copy, "bob@corp.com").with_name("Bob"))
            .with_recipient(RecipientRef::new(RecipientRole::Copy, "malice@evil.org"));
        let m2 = MessageRecord::default()
            .with_recipient(RecipientRef::new(RecipientRole::Primary, "bob@corp.com"));
        ingest(&[m1, m2])
    }

    fn addresses(list: &[&ContactRecord]) -> Vec<String> {
        list.iter().map(|c| c.normalized_address().to_string()).collect()
    }

    #[test]
    fn test_blank_query_is_identity() {
        let dir = directory();
        let ranked = rank(&dir);
        assert_eq!(filter(&ranked, ""), ranked);
        assert_eq!(filter(&ranked, "   "), ranked);
    }

    #[test]
    fn test_case_insensitive() {
        let dir = directory();
        let ranked = rank(&dir);
        assert_eq!(filter(&ranked, "ALICE"), filter(&ranked, "alice"));
        assert_eq!(
            addresses(&filter(&ranked, "Alice")),
            vec!["alice@corp.com", "malice@evil.org"]
        );
    }

    #[test]
    fn test_matches_display_name() {
        let dir = directory();
        let ranked = rank(&dir);
        assert_eq!(addresses(&filter(&ranked, "liddell")), vec!["alice@corp.com"]);
    }

    #[test]
    fn test_preserves_ranked_order() {
        let dir = directory();
        let ranked = rank(&dir);
        // bob ranks first with 2 messages
        assert_eq!(
            addresses(&filter(&ranked, "corp")),
            vec!["bob@corp.com", "alice@corp.com"]
        );
    }

    #[test]
    fn test_no_match_is_empty() {
        let dir = directory();
        let ranked = rank(&dir);
        assert!(filter(&ranked, "zzz").is_empty());
    }
}
