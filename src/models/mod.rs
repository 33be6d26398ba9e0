//! Fitted regression models.

pub mod model;

pub use model::*;
