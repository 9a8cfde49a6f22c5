//! HTTP server for the Net-Flox video library.

pub mod api;
pub mod state;
