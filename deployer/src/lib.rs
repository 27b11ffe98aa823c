//! Extension deployer library
//!
//! Publishes a packaged extension to one or more platform projects, waits
//! for the platform to process it and marks it trusted.

pub mod app;
pub mod artifact;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod utils;
