//! The module contains the errors the client state can report.
//!
//! - [`Validation`] input rejected before any request is built (date range
//!   order, page size, malformed form values).
//!
//!  [`Validation`]: EngineError::Validation
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
}
