//! Export functionality for contact lists.

pub mod csv;
