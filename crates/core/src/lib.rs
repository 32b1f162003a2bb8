//! Core library with shared types, traits, and error handling.
//!
//! This crate provides reusable components for the REST service:
//! - Error taxonomy with automatic HTTP response conversion
//! - JWT issuance and validation
//! - Password hashing and one-time reset tokens
//! - Validation helpers

pub mod error;
pub mod jwt;
pub mod password;
pub mod request_ext;
pub mod str_ext;
pub mod token;
pub mod validation;

pub use error::{AppError, AppResult, ErrorBody, OptionExt, ResultExt};
pub use jwt::{ADMIN_REQUIRED, AuthInfo, Claims, JwtError, JwtSubject, JwtValidator};
pub use request_ext::RequestAuthExt;
pub use str_ext::{OptionStrExt, StrExt};
pub use token::{ResetToken, TokenGenerator};
