//! Banking HTTP API.
//!
//! Every operation runs as a linear pipeline that records the steps it takes
//! and ends in a single classified outcome, which the API layer translates
//! into an HTTP response.

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
