//! Utility module
//!
//! - [`AppError`] - application error type and HTTP mapping
//! - [`AppResponse`] - API response envelope
//! - logging setup

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult, ok};
