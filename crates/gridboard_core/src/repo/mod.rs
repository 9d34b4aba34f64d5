//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Keep record encoding and shape validation out of the service layer.
//!
//! # Invariants
//! - Reads validate every field before a record is trusted.
//! - Repository APIs report semantic fallback reasons in addition to
//!   storage transport errors.

pub mod layout_repo;
