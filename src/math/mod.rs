//! Mathematical utilities: quantiles, imputation, splitting, least squares, metrics.

pub mod impute;
pub mod metrics;
pub mod ols;
pub mod quantile;
pub mod split;

pub use impute::*;
pub use metrics::*;
pub use ols::*;
pub use quantile::*;
pub use split::*;
