//! snooze - sleep/kill connection server
//!
//! Clients park a connection with `v1/sleep`, inspect parked connections
//! with `v1/server-status`, and end another client's sleep with `v1/kill`.

pub mod config;
pub mod http;
pub mod registry;
pub mod routes;
pub mod server;
