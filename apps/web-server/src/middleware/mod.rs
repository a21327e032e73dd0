//! Request plumbing: identity extractors and the application error type.

pub mod auth;
pub mod error;
