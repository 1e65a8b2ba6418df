//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, query string, URL params)
//! 2. Checks the input shape and calls the accounts service
//! 3. Returns HTTP response (JSON, status code)

/// Account and transfer endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;
