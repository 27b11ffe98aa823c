//! Per-run context

use crate::app::options::RunOptions;
use crate::artifact::Artifact;
use crate::http::api::PlatformApi;

/// Everything shared by the target pipelines of one run
///
/// Built once before any request and only read afterwards.
pub struct RunContext<A: PlatformApi> {
    /// Platform API client
    pub api: A,

    /// Artifact deployed to every target
    pub artifact: Artifact,

    /// Run options
    pub options: RunOptions,
}

impl<A: PlatformApi> RunContext<A> {
    pub fn new(api: A, artifact: Artifact, options: RunOptions) -> Self {
        Self {
            api,
            artifact,
            options,
        }
    }
}
