//! webcore - Minimal HTTP origin server
//!
//! Accepts a connection, answers one request from a static route table,
//! and closes.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod site;
