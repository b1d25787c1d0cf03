//! HTTP API: server, routing, and HTML rendering for the form service.

pub mod app;
pub mod html;
pub mod middleware;
pub mod server;
