//! Fixed-order lifecycle driver for a single scenario.
//!
//! The runner owns one scenario and everything the lifecycle touches: the
//! configuration context, the persisted-state store, the instrumentation
//! client, and the journal. Lifecycle transitions are strictly forward;
//! no step may be repeated or skipped except the optional clear step.

use crate::client::{InstrumentationClient, StartConfig};
use crate::config::CollectorAddress;
use crate::error::HarnessError;
use crate::journal::Journal;
use crate::persistence::{AppIdentity, PersistentStore};
use crate::scenario::{Scenario, ScenarioContext};
use tracing::{info, warn};

/// Lifecycle phase of a scenario runner.
///
/// Uninitialized → Configured → [Cleared] → Started → Running → Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Configured,
    Cleared,
    Started,
    Running,
    Terminal,
}

/// Drives one scenario through the fixed lifecycle:
/// construct → configure → (optionally) clear persistent data → start → run.
pub struct ScenarioRunner<C: InstrumentationClient> {
    scenario: Box<dyn Scenario>,
    ctx: ScenarioContext,
    store: PersistentStore,
    client: C,
    journal: Journal,
    app_id: Option<String>,
    phase: Phase,
}

impl<C: InstrumentationClient> ScenarioRunner<C> {
    /// Creates a runner for a freshly constructed scenario.
    pub fn new(
        scenario: Box<dyn Scenario>,
        collector: CollectorAddress,
        store: PersistentStore,
        client: C,
    ) -> Self {
        Self {
            scenario,
            ctx: ScenarioContext::new(collector),
            store,
            client,
            journal: Journal::default_path(),
            app_id: None,
            phase: Phase::Uninitialized,
        }
    }

    /// Replaces the default journal.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Sets an explicit application identity for the clear step.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The configuration context as the lifecycle has shaped it so far.
    pub fn context(&self) -> &ScenarioContext {
        &self.ctx
    }

    /// The instrumentation client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn journal_step(&mut self, step: &str, detail: &str) {
        let scenario = self.scenario.name().to_string();
        if let Err(e) = self.journal.log_step(&scenario, step, detail) {
            warn!(step, error = %e, "failed to journal lifecycle step");
        }
    }

    fn reject_out_of_order(
        &self,
        step: &'static str,
        allowed: &[Phase],
    ) -> Result<(), HarnessError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(HarnessError::OutOfOrder {
                step,
                phase: self.phase,
            })
        }
    }

    /// Runs the scenario's `configure` hook. Must be the first step.
    pub fn configure(&mut self) -> Result<(), HarnessError> {
        self.reject_out_of_order("configure", &[Phase::Uninitialized])?;
        self.scenario.configure(&mut self.ctx);
        self.phase = Phase::Configured;
        let endpoint = self.ctx.config.endpoint.clone();
        self.journal_step("configure", &endpoint);
        Ok(())
    }

    /// Runs the optional clear step. Only valid between configure and start.
    ///
    /// Identity resolution failure is an unrecoverable environment fault.
    pub fn clear_persistent_data(&mut self) -> Result<(), HarnessError> {
        self.reject_out_of_order("clear_persistent_data", &[Phase::Configured])?;
        let identity = AppIdentity::resolve(self.app_id.as_deref())?;
        self.scenario.clear_persistent_data(&self.store, &identity)?;
        self.phase = Phase::Cleared;
        let namespace = identity.as_str().to_string();
        self.journal_step("clear_persistent_data", &namespace);
        Ok(())
    }

    /// Hands the configuration snapshot to the client's start entry point.
    ///
    /// The snapshot reflects every mutation `configure` made on this
    /// instance; the context is not mutated past this point.
    pub fn start_instrumentation(&mut self) -> Result<(), HarnessError> {
        self.reject_out_of_order("start_instrumentation", &[Phase::Configured, Phase::Cleared])?;
        let start = StartConfig::from_context(&self.ctx);
        let endpoint = start.config.endpoint.clone();
        self.client.start(start);
        self.phase = Phase::Started;
        self.journal_step("start_instrumentation", &endpoint);
        Ok(())
    }

    /// Runs the behavior under test. Terminal on success.
    pub fn run(&mut self) -> Result<(), HarnessError> {
        self.reject_out_of_order("run", &[Phase::Started])?;
        self.phase = Phase::Running;
        self.journal_step("run", "");
        self.scenario.run()?;
        self.phase = Phase::Terminal;
        Ok(())
    }

    /// Executes the whole fixed lifecycle in order.
    pub fn execute(&mut self, clear_state: bool) -> Result<(), HarnessError> {
        info!(scenario = self.scenario.name(), "executing scenario lifecycle");
        self.configure()?;
        if clear_state {
            self.clear_persistent_data()?;
        }
        self.start_instrumentation()?;
        self.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RecordingClient;
    use crate::config::TEST_API_KEY;
    use crate::journal::JournalHistory;
    use tempfile::TempDir;

    struct Trivial;

    impl Scenario for Trivial {
        fn name(&self) -> &str {
            "Trivial"
        }

        fn run(&mut self) -> Result<(), HarnessError> {
            Ok(())
        }
    }

    /// Narrows sampling and widens one category on top of the defaults.
    struct Tweaked;

    impl Scenario for Tweaked {
        fn name(&self) -> &str {
            "Tweaked"
        }

        fn configure(&mut self, ctx: &mut ScenarioContext) {
            ctx.apply_test_defaults();
            ctx.config.sampling_probability = 0.25;
            ctx.config.auto_instrument_network = true;
        }

        fn run(&mut self) -> Result<(), HarnessError> {
            Ok(())
        }
    }

    fn runner_in(tmp: &TempDir, scenario: Box<dyn Scenario>) -> ScenarioRunner<RecordingClient> {
        ScenarioRunner::new(
            scenario,
            CollectorAddress::default(),
            PersistentStore::new(tmp.path().join("state")),
            RecordingClient::new(),
        )
        .with_journal(Journal::new(tmp.path().join("lifecycle.jsonl")))
        .with_app_id("com.example.fixture")
    }

    #[test]
    fn test_full_lifecycle_with_clear() {
        let tmp = TempDir::new().unwrap();
        let mut runner = runner_in(&tmp, Box::new(Trivial));

        runner.execute(true).unwrap();

        assert_eq!(runner.phase(), Phase::Terminal);
        let ctx = runner.context();
        assert_eq!(ctx.config.endpoint, "http://bs-local.com:9339/traces");
        assert_eq!(ctx.config.api_key, TEST_API_KEY);
        assert_eq!(runner.client().start_count(), 1);
    }

    #[test]
    fn test_clear_step_may_be_skipped() {
        let tmp = TempDir::new().unwrap();
        let mut runner = runner_in(&tmp, Box::new(Trivial));

        runner.execute(false).unwrap();
        assert_eq!(runner.phase(), Phase::Terminal);
    }

    #[test]
    fn test_start_observes_configure_mutations() {
        let tmp = TempDir::new().unwrap();
        let mut runner = runner_in(&tmp, Box::new(Tweaked));

        runner.configure().unwrap();
        runner.start_instrumentation().unwrap();

        let start = runner.client().last_start().unwrap();
        assert!((start.config.sampling_probability - 0.25).abs() < f64::EPSILON);
        assert!(start.config.auto_instrument_network);
        assert!(!start.config.auto_instrument_app_starts);
        assert_eq!(start.tuning.batch_trigger_size, 1);
    }

    #[test]
    fn test_run_before_configure_is_out_of_order() {
        let tmp = TempDir::new().unwrap();
        let mut runner = runner_in(&tmp, Box::new(Trivial));

        let err = runner.run().unwrap_err();
        assert!(matches!(
            err,
            HarnessError::OutOfOrder {
                step: "run",
                phase: Phase::Uninitialized,
            }
        ));
    }

    #[test]
    fn test_configure_cannot_repeat() {
        let tmp = TempDir::new().unwrap();
        let mut runner = runner_in(&tmp, Box::new(Trivial));

        runner.configure().unwrap();
        let err = runner.configure().unwrap_err();
        assert!(matches!(err, HarnessError::OutOfOrder { .. }));
    }

    #[test]
    fn test_clear_after_start_is_out_of_order() {
        let tmp = TempDir::new().unwrap();
        let mut runner = runner_in(&tmp, Box::new(Trivial));

        runner.configure().unwrap();
        runner.start_instrumentation().unwrap();
        let err = runner.clear_persistent_data().unwrap_err();
        assert!(matches!(err, HarnessError::OutOfOrder { .. }));
    }

    #[test]
    fn test_unimplemented_run_surfaces_misuse() {
        struct NoRun;
        impl Scenario for NoRun {
            fn name(&self) -> &str {
                "NoRun"
            }
        }

        let tmp = TempDir::new().unwrap();
        let mut runner = runner_in(&tmp, Box::new(NoRun));

        let err = runner.execute(false).unwrap_err();
        assert!(matches!(err, HarnessError::Unimplemented(_)));
        assert_eq!(err.exit_code(), HarnessError::EXIT_MISUSE);
    }

    #[test]
    fn test_missing_identity_is_environment_fault() {
        let tmp = TempDir::new().unwrap();
        // No app_id and FIXTURE_APP_ID is unset in the test environment.
        let mut runner = ScenarioRunner::new(
            Box::new(Trivial),
            CollectorAddress::default(),
            PersistentStore::new(tmp.path().join("state")),
            RecordingClient::new(),
        )
        .with_journal(Journal::new(tmp.path().join("lifecycle.jsonl")));

        runner.configure().unwrap();
        let err = runner.clear_persistent_data().unwrap_err();
        assert!(matches!(err, HarnessError::Environment(_)));
        assert_eq!(err.exit_code(), HarnessError::EXIT_ENVIRONMENT);
    }

    #[test]
    fn test_journal_records_steps_in_order() {
        let tmp = TempDir::new().unwrap();
        let journal_path = tmp.path().join("lifecycle.jsonl");
        let mut runner = runner_in(&tmp, Box::new(Trivial))
            .with_journal(Journal::new(&journal_path));

        runner.execute(true).unwrap();

        let records = JournalHistory::new(&journal_path).read_all().unwrap();
        let steps: Vec<&str> = records.iter().map(|r| r.step.as_str()).collect();
        assert_eq!(
            steps,
            vec![
                "configure",
                "clear_persistent_data",
                "start_instrumentation",
                "run",
            ]
        );
        assert_eq!(records[1].detail, "com.example.fixture");
    }
}
