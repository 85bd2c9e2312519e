//! HTTP-like wire protocol.
//!
//! Only the request line is interpreted; every connection carries exactly
//! one request and is closed after its response.
//!
//! - **`connection`**: reads the request line and drives it through the router
//! - **`parser`**: splits the request line into method, route type and query
//! - **`request`**: parsed request representation
//! - **`response`**: JSON responses with the server's standard headers
//! - **`writer`**: serializes a response onto a stream
//! - **`handle`**: shared, answer-once write side of a connection
//!
//! # Connection lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the request line
//!        └──────┬──────┘
//!               │ Line received (or peer finished sending)
//!               ▼
//!        ┌──────────────────┐
//!        │    Routing       │ ← Stream moves into a ConnectionHandle
//!        └──────┬───────────┘
//!               │ Response for the caller (if any)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← First response wins, then close
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod handle;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
