//! The scenario lifecycle contract.
//!
//! A scenario is one selectable, self-contained test case exercising the
//! instrumentation client under specific configuration. The default trait
//! bodies carry the base contract; concrete scenarios override what happens
//! in each step, not the order of steps (the runner owns that).

use crate::config::{CollectorAddress, ProcessTuning, ScenarioConfig, TEST_API_KEY};
use crate::error::HarnessError;
use crate::persistence::{AppIdentity, PersistentStore};
use tracing::info;

/// Per-runner configuration context passed to the lifecycle hooks.
///
/// Owned by exactly one scenario runner for its lifetime. `config` is
/// mutated exclusively inside `configure` and consumed as a snapshot at
/// start time; `tuning` is process-scoped (see [`ProcessTuning`]).
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    pub config: ScenarioConfig,
    pub tuning: ProcessTuning,
    pub collector: CollectorAddress,
}

impl ScenarioContext {
    /// Creates a fresh context with library defaults and the given collector.
    pub fn new(collector: CollectorAddress) -> Self {
        Self {
            config: ScenarioConfig::load(),
            tuning: ProcessTuning::default(),
            collector,
        }
    }

    /// Applies the base test configuration: fixed test API key, every
    /// automatic instrumentation category off so only scenario-initiated
    /// spans appear, full sampling for deterministic assertions, batch
    /// export after a single buffered item, and export pointed at the test
    /// collector's `/traces` endpoint.
    pub fn apply_test_defaults(&mut self) {
        self.tuning.batch_trigger_size = 1;
        self.config.api_key = TEST_API_KEY.to_string();
        self.config.auto_instrument_app_starts = false;
        self.config.auto_instrument_network = false;
        self.config.auto_instrument_navigation = false;
        self.config.sampling_probability = 1.0;
        self.config.endpoint = self.collector.traces_url();
    }
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self::new(CollectorAddress::default())
    }
}

/// One concrete test case with the fixed four-step lifecycle.
///
/// Overrides that adjust the configuration should start from
/// [`ScenarioContext::apply_test_defaults`] and then narrow or widen;
/// whatever they do, export must stay directed at the test collector.
pub trait Scenario {
    /// The textual name the driver selects this scenario by.
    fn name(&self) -> &str;

    /// Populates the owned configuration. The base body applies the test
    /// defaults unchanged.
    fn configure(&mut self, ctx: &mut ScenarioContext) {
        ctx.apply_test_defaults();
    }

    /// Best-effort erase of state the client persisted across launches,
    /// scoped to the application's identity namespace. Idempotent. The log
    /// line is an observable side effect the driver asserts on.
    fn clear_persistent_data(
        &mut self,
        store: &PersistentStore,
        identity: &AppIdentity,
    ) -> Result<(), HarnessError> {
        info!(scenario = self.name(), namespace = %identity, "clearing persisted instrumentation state");
        store.clear_namespace(identity)?;
        Ok(())
    }

    /// The behavior under test. Every concrete scenario must override this;
    /// reaching the base body is harness misuse.
    fn run(&mut self) -> Result<(), HarnessError> {
        Err(HarnessError::Unimplemented(self.name().to_string()))
    }
}
