//! Error taxonomy for the fixture harness.
//!
//! All lifecycle steps are expected to succeed deterministically in a test
//! environment, so there is no recoverable error category and no retry
//! policy. Every variant here means the current process cannot usefully
//! continue; the CLI maps variants to distinct exit codes so the external
//! driver can tell harness misuse apart from a broken test environment.

use crate::runner::Phase;

/// Errors raised by the scenario harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The base `run()` was reached without an override.
    #[error("scenario '{0}' does not implement run()")]
    Unimplemented(String),

    /// The application's own identity namespace could not be resolved.
    #[error("application identity could not be resolved: {0}")]
    Environment(String),

    /// A lifecycle step was invoked out of order.
    #[error("lifecycle step '{step}' invoked in phase {phase:?}")]
    OutOfOrder { step: &'static str, phase: Phase },

    /// The requested scenario name is not registered.
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    /// Persisted-state store or journal I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Exit code for harness misuse (programmer error).
    pub const EXIT_MISUSE: i32 = 2;

    /// Exit code for an unrecoverable environment fault.
    pub const EXIT_ENVIRONMENT: i32 = 3;

    /// Process exit code the driver observes for this error.
    ///
    /// Misuse (unimplemented scenario, out-of-order lifecycle, unknown name)
    /// and environment faults get distinct codes; everything else maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::Unimplemented(_)
            | HarnessError::OutOfOrder { .. }
            | HarnessError::UnknownScenario(_) => Self::EXIT_MISUSE,
            HarnessError::Environment(_) => Self::EXIT_ENVIRONMENT,
            HarnessError::Io(_) => 1,
        }
    }
}
