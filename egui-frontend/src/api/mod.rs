//! # API Module
//!
//! Blocking HTTP access to the invoice manager REST service.

pub mod client;
pub mod retry;

pub use client::{ApiClient, ApiError};
pub use retry::RetryPolicy;
