//! Platform REST API client

pub mod api;
pub mod client;
pub mod extensions;
pub mod tasks;
