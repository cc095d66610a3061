//! Seam to the instrumentation client under test.
//!
//! The client library itself is an opaque external dependency: span
//! generation, batching, and network export all live on its side of this
//! trait. The harness only hands it a fully-built [`StartConfig`], once.

use crate::config::{ProcessTuning, ScenarioConfig};
use crate::scenario::ScenarioContext;
use serde::Serialize;
use tracing::info;

/// Everything the client's start entry point consumes: the scenario's
/// instrumentation options plus the process-scoped export tuning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartConfig {
    pub config: ScenarioConfig,
    pub tuning: ProcessTuning,
}

impl StartConfig {
    /// Snapshots a scenario context at start time.
    pub fn from_context(ctx: &ScenarioContext) -> Self {
        Self {
            config: ctx.config.clone(),
            tuning: ctx.tuning,
        }
    }
}

/// The instrumentation client's start entry point.
///
/// Start is treated as infallible given a well-formed environment; any
/// failure past this seam is the client's concern. Calling start more than
/// once per process is undefined behavior delegated to the client.
pub trait InstrumentationClient {
    fn start(&mut self, config: StartConfig);
}

/// Client stand-in that records start calls instead of exporting telemetry.
///
/// Used by tests and wired into the fixture binary, where the real client
/// library would otherwise be linked.
#[derive(Debug, Default)]
pub struct RecordingClient {
    started: Vec<StartConfig>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of start calls received.
    pub fn start_count(&self) -> usize {
        self.started.len()
    }

    /// The most recent start call, if any.
    pub fn last_start(&self) -> Option<&StartConfig> {
        self.started.last()
    }
}

impl InstrumentationClient for RecordingClient {
    fn start(&mut self, config: StartConfig) {
        info!(
            endpoint = %config.config.endpoint,
            batch_trigger = config.tuning.batch_trigger_size,
            "instrumentation client started"
        );
        self.started.push(config);
    }
}
