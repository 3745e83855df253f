//! HTTP handlers for the BFHL service.

pub mod bfhl;
pub mod health;
pub mod metrics;

pub use bfhl::process;
pub use health::{health_check, readiness_check};
pub use self::metrics::metrics_endpoint;
