//! Calendar export layer.
//!
//! # Responsibility
//! - Render single appointments as iCalendar text for the embedding UI to
//!   hand off as a download.
//!
//! # Invariants
//! - Export reads from the store; it never mutates it and performs no I/O.

pub mod ics;
