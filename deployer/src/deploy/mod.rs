//! Deployment pipeline

pub mod fsm;
pub mod lookup;
pub mod orchestrator;
pub mod poller;
pub mod summary;
pub mod trust;
