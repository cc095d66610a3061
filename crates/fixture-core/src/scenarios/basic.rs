//! Baseline scenarios: the no-op case and the flush-by-sleeping case.

use crate::error::HarnessError;
use crate::scenario::Scenario;
use std::time::Duration;
use tracing::debug;

/// Scenario that applies the base configuration and does nothing in `run`.
///
/// Useful for asserting on the setup side alone: the driver sees the start
/// call with the test defaults and no scenario-initiated telemetry.
#[derive(Debug, Default)]
pub struct NoopScenario;

impl NoopScenario {
    pub fn new() -> Self {
        Self
    }
}

impl Scenario for NoopScenario {
    fn name(&self) -> &str {
        "Noop"
    }

    fn run(&mut self) -> Result<(), HarnessError> {
        Ok(())
    }
}

/// Scenario that sleeps so buffered spans flush before the process exits.
#[derive(Debug)]
pub struct SleepScenario {
    duration: Duration,
}

impl SleepScenario {
    /// Default sleep long enough for a batch trigger of 1 to drain.
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            duration: Self::DEFAULT_DURATION,
        }
    }

    /// Overrides the sleep duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl Default for SleepScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for SleepScenario {
    fn name(&self) -> &str {
        "Sleep"
    }

    fn run(&mut self) -> Result<(), HarnessError> {
        debug!(duration_ms = self.duration.as_millis() as u64, "sleeping to let spans flush");
        std::thread::sleep(self.duration);
        Ok(())
    }
}
