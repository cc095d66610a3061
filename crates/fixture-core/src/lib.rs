//! # fixture-core
//!
//! Scenario harness for exercising a performance instrumentation client
//! under controlled, reproducible conditions. An external end-to-end test
//! driver launches the fixture once per test, selects one scenario by name,
//! and drives the fixed lifecycle:
//!
//! construct → configure → (optionally) clear persistent data → start
//! instrumentation → run.
//!
//! The instrumentation client itself is an opaque external dependency
//! behind [`client::InstrumentationClient`]; this crate owns the scenario
//! contract, the configuration model, the persisted-state store, and the
//! lifecycle journal the driver asserts against.

pub mod client;
pub mod config;
pub mod error;
pub mod journal;
pub mod persistence;
pub mod registry;
pub mod runner;
pub mod scenario;
pub mod scenarios;

pub use client::{InstrumentationClient, RecordingClient, StartConfig};
pub use config::{
    CollectorAddress, HarnessConfig, ProcessTuning, ScenarioConfig, DEFAULT_COLLECTOR_URL,
    TEST_API_KEY, TRACES_PATH,
};
pub use error::HarnessError;
pub use journal::{Journal, JournalHistory, StepRecord};
pub use persistence::{AppIdentity, PersistentStore};
pub use registry::ScenarioRegistry;
pub use runner::{Phase, ScenarioRunner};
pub use scenario::{Scenario, ScenarioContext};
