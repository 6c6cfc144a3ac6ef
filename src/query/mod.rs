//! Read-only views over a contact directory: ranking, search, detail.
//!
//! None of these mutate the directory; they borrow from it and hand back
//! references (or owned view models from [`view`]).

pub mod detail;
pub mod filter;
pub mod rank;
pub mod view;

pub use detail::{detail, detail_with_limit, ContactDetail, RECENT_HISTORY_LIMIT};
pub use filter::filter;
pub use rank::{rank, top};

use crate::model::contact::ContactRecord;
use crate::model::directory::ContactDirectory;

/// Rank the directory, then narrow it by `query`.
pub fn search<'a>(directory: &'a ContactDirectory, query: &str) -> Vec<&'a ContactRecord> {
    filter(&rank(directory), query)
}
