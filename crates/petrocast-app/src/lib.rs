//! Application layer for petrocast: configuration, the remote series
//! fetcher, the forecast service, and the HTTP surface. The `petrocast`
//! binary wires these into the `fetch`, `train`, and `serve` commands.

pub mod config;
pub mod fetch;
pub mod server;
pub mod service;
