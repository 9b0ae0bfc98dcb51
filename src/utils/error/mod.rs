//! Error handling for the alert service
//!
//! This module defines the error type used throughout the service and its
//! HTTP representation.

mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{AppError, Result};
