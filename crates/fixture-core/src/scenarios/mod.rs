//! Shipped scenarios.
//!
//! Concrete test cases the driver can select by name through
//! [`crate::registry::ScenarioRegistry::builtin`]. Drivers with bespoke
//! needs register their own scenarios alongside these.

pub mod auto_instrument;
pub mod basic;

pub use auto_instrument::{AppStartInstrumentationScenario, NetworkInstrumentationScenario};
pub use basic::{NoopScenario, SleepScenario};
