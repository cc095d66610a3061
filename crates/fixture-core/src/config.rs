//! Configuration for the instrumentation client and the harness itself.
//!
//! [`ScenarioConfig`] holds the instrumentation options a scenario hands to
//! the client's start call. [`ProcessTuning`] carries the process-scoped
//! export trigger. [`HarnessConfig`] is the optional `harness.yml` the
//! driver may place next to the fixture binary.

use crate::error::HarnessError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed 32-character API key used by every test scenario.
pub const TEST_API_KEY: &str = "12312312312312312312312312312312";

/// Well-known test-local collector base address operated by the driver.
pub const DEFAULT_COLLECTOR_URL: &str = "http://bs-local.com:9339";

/// Path appended to the collector base for trace export.
pub const TRACES_PATH: &str = "/traces";

/// Instrumentation options consumed by the client's start call.
///
/// Created fresh per scenario instance, mutated exclusively inside
/// `configure`, and snapshotted into a [`crate::client::StartConfig`] at
/// start time. Never shared between scenario instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Project API key the client reports under.
    pub api_key: String,

    /// Export endpoint URL for collected telemetry.
    pub endpoint: String,

    /// Automatic app-start timing instrumentation.
    pub auto_instrument_app_starts: bool,

    /// Automatic network call instrumentation.
    pub auto_instrument_network: bool,

    /// Automatic screen-navigation timing instrumentation.
    pub auto_instrument_navigation: bool,

    /// Probability in [0, 1] that a trace is captured.
    pub sampling_probability: f64,
}

impl ScenarioConfig {
    /// Loads a fresh configuration with the library's ecosystem defaults:
    /// every automatic instrumentation category enabled, full sampling, and
    /// no key or endpoint until `configure` supplies them.
    pub fn load() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            auto_instrument_app_starts: true,
            auto_instrument_network: true,
            auto_instrument_navigation: true,
            sampling_probability: 1.0,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::load()
    }
}

/// Process-scoped export tuning.
///
/// The batch trigger is shared by the whole process, not by one scenario:
/// it is set once before the client starts and stays in effect until a
/// later scenario in the same process overwrites it. Only one scenario runs
/// per process invocation, so no cross-scenario contention occurs in
/// practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessTuning {
    /// Buffered-item count that forces an immediate export. Must be >= 1.
    pub batch_trigger_size: u32,
}

impl Default for ProcessTuning {
    fn default() -> Self {
        Self {
            batch_trigger_size: 100,
        }
    }
}

/// Base address of the test-controlled collector endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorAddress {
    base: String,
}

impl CollectorAddress {
    /// Creates an address from a base URL, dropping any trailing slash.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// The collector base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full trace export URL (base + `/traces`).
    pub fn traces_url(&self) -> String {
        format!("{}{}", self.base, TRACES_PATH)
    }

    /// Heuristic for "looks like a test collector, not production":
    /// plain-http local addresses only.
    pub fn looks_local(&self) -> bool {
        self.base.starts_with("http://")
            && (self.base.contains("bs-local.com")
                || self.base.contains("localhost")
                || self.base.contains("127.0.0.1"))
    }
}

impl Default for CollectorAddress {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTOR_URL)
    }
}

/// Harness-level settings, loaded from `harness.yml` when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Collector base URL the scenarios derive their endpoints from.
    pub collector: String,

    /// Root directory of the persisted-state store.
    pub state_dir: String,

    /// Lifecycle journal file.
    pub journal_file: String,

    /// Explicit application identity. Falls back to the `FIXTURE_APP_ID`
    /// environment variable when unset.
    pub app_id: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            collector: DEFAULT_COLLECTOR_URL.to_string(),
            state_dir: crate::persistence::PersistentStore::DEFAULT_ROOT.to_string(),
            journal_file: crate::journal::Journal::DEFAULT_PATH.to_string(),
            app_id: None,
        }
    }
}

impl HarnessConfig {
    /// Loads the config from a YAML file.
    ///
    /// A malformed file is an environment fault: the driver wrote it, and
    /// the harness cannot guess what was meant.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            HarnessError::Environment(format!("malformed config {}: {e}", path.display()))
        })
    }

    /// The collector address scenarios should target.
    pub fn collector_address(&self) -> CollectorAddress {
        CollectorAddress::new(self.collector.clone())
    }

    /// Validates the config and returns human-readable warnings.
    ///
    /// A collector base that does not look like a local test address is
    /// worth flagging: scenarios must never export to production.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.collector_address().looks_local() {
            warnings.push(format!(
                "warning: collector '{}' does not look like a local test address",
                self.collector
            ));
        }
        if self.state_dir.trim().is_empty() {
            warnings.push("warning: state_dir is empty, using working directory".to_string());
        }
        warnings
    }
}
