//! Core data model: message records in, contact directory out.

pub mod address;
pub mod contact;
pub mod directory;
pub mod message;
