//! Scenarios that widen the automatic instrumentation categories.
//!
//! The base configuration turns every category off so only
//! scenario-initiated spans appear; these scenarios re-enable one category
//! each so the driver can assert on automatic spans in isolation.

use crate::error::HarnessError;
use crate::scenario::{Scenario, ScenarioContext};

/// Re-enables app-start timing instrumentation on top of the test defaults.
#[derive(Debug, Default)]
pub struct AppStartInstrumentationScenario;

impl AppStartInstrumentationScenario {
    pub fn new() -> Self {
        Self
    }
}

impl Scenario for AppStartInstrumentationScenario {
    fn name(&self) -> &str {
        "AppStartInstrumentation"
    }

    fn configure(&mut self, ctx: &mut ScenarioContext) {
        ctx.apply_test_defaults();
        ctx.config.auto_instrument_app_starts = true;
    }

    fn run(&mut self) -> Result<(), HarnessError> {
        // The app-start span is produced by the client itself; nothing to
        // initiate here.
        Ok(())
    }
}

/// Re-enables network call instrumentation on top of the test defaults.
#[derive(Debug, Default)]
pub struct NetworkInstrumentationScenario;

impl NetworkInstrumentationScenario {
    pub fn new() -> Self {
        Self
    }
}

impl Scenario for NetworkInstrumentationScenario {
    fn name(&self) -> &str {
        "NetworkInstrumentation"
    }

    fn configure(&mut self, ctx: &mut ScenarioContext) {
        ctx.apply_test_defaults();
        ctx.config.auto_instrument_network = true;
    }

    fn run(&mut self) -> Result<(), HarnessError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TEST_API_KEY;

    #[test]
    fn test_app_start_widens_only_its_category() {
        let mut scenario = AppStartInstrumentationScenario::new();
        let mut ctx = ScenarioContext::default();
        scenario.configure(&mut ctx);

        assert!(ctx.config.auto_instrument_app_starts);
        assert!(!ctx.config.auto_instrument_network);
        assert!(!ctx.config.auto_instrument_navigation);
        // The rest of the test defaults survive the override.
        assert_eq!(ctx.config.api_key, TEST_API_KEY);
        assert!(ctx.config.endpoint.ends_with("/traces"));
        assert_eq!(ctx.tuning.batch_trigger_size, 1);
    }

    #[test]
    fn test_network_widens_only_its_category() {
        let mut scenario = NetworkInstrumentationScenario::new();
        let mut ctx = ScenarioContext::default();
        scenario.configure(&mut ctx);

        assert!(ctx.config.auto_instrument_network);
        assert!(!ctx.config.auto_instrument_app_starts);
        assert!(!ctx.config.auto_instrument_navigation);
    }

    #[test]
    fn test_both_keep_the_test_collector() {
        for scenario in [
            &mut AppStartInstrumentationScenario::new() as &mut dyn Scenario,
            &mut NetworkInstrumentationScenario::new() as &mut dyn Scenario,
        ] {
            let mut ctx = ScenarioContext::default();
            scenario.configure(&mut ctx);
            assert_eq!(ctx.config.endpoint, "http://bs-local.com:9339/traces");
        }
    }

    #[test]
    fn test_runs_succeed() {
        assert!(AppStartInstrumentationScenario::new().run().is_ok());
        assert!(NetworkInstrumentationScenario::new().run().is_ok());
    }
}
