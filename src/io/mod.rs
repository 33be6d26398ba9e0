//! Input/output helpers.
//!
//! - CSV ingest + numeric coercion (`ingest`)
//! - held-out prediction export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
