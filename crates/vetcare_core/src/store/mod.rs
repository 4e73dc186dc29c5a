//! Record store layer.
//!
//! # Responsibility
//! - Own the four entity collections and every mutation path over them.
//! - Enforce referential-integrity delete guards and creation-time
//!   reference checks.
//! - Answer derived schedule, vaccine, and search queries.
//!
//! # Invariants
//! - Every successful mutation rewrites all four persistence slots inside
//!   one transaction.
//! - Failed operations leave both memory and persisted state untouched.

pub mod record_store;
