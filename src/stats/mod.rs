//! Descriptive views of an ingested table: head-rows preview and column statistics.

pub mod describe;

pub use describe::*;
