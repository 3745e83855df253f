//! Domain models for the BFHL service.

pub mod envelope;
pub mod request;

pub use envelope::Envelope;
pub use request::{BfhlRequest, Operation, ValidationError, KEY_MISSING};
