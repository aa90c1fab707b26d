//! Library core for the EWCO grants service: the woodland-creation grant
//! application workflow plus the configuration, telemetry, and error plumbing
//! shared by the HTTP server and the CLI.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
