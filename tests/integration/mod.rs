//! Integration tests for healthgate
//!
//! Each test spawns the HTTP server in-process on an ephemeral port with its
//! own registry, so tests need no external services and can run in parallel.
//!
//! Run with: cargo test --test integration

mod helpers;

mod health_endpoints;
mod monitor_flow;
