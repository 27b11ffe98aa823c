//! Wire models for the extension platform REST API

pub mod models;
