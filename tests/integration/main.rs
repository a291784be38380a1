//! Integration tests for the dispatcher.
//!
//! `mock_server` drives real HTTP round trips through mockito; the other
//! suites use a scripted in-process transport for deterministic failures.

mod envelope_flow;
mod host_limit;
mod interceptor_order;
mod retry;
mod session;
