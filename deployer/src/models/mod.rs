//! Domain models

pub mod target;
