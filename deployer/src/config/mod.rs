//! Run configuration

pub mod file;
pub mod resolver;
