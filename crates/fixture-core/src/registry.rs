//! Name-to-scenario registry.
//!
//! The external driver selects a scenario by textual name; this is the
//! fixture-side mapping from that name to a freshly constructed instance.

use crate::error::HarnessError;
use crate::scenario::Scenario;
use std::collections::BTreeMap;

type Constructor = fn() -> Box<dyn Scenario>;

/// Registry of constructible scenarios.
#[derive(Default)]
pub struct ScenarioRegistry {
    entries: BTreeMap<String, Constructor>,
}

impl ScenarioRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with every shipped scenario.
    pub fn builtin() -> Self {
        use crate::scenarios::{
            AppStartInstrumentationScenario, NetworkInstrumentationScenario, NoopScenario,
            SleepScenario,
        };

        let mut registry = Self::new();
        registry.register("Noop", || Box::new(NoopScenario::new()));
        registry.register("Sleep", || Box::new(SleepScenario::new()));
        registry.register("AppStartInstrumentation", || {
            Box::new(AppStartInstrumentationScenario::new())
        });
        registry.register("NetworkInstrumentation", || {
            Box::new(NetworkInstrumentationScenario::new())
        });
        registry
    }

    /// Registers a scenario constructor under a name. A later registration
    /// under the same name wins.
    pub fn register(&mut self, name: impl Into<String>, constructor: Constructor) {
        self.entries.insert(name.into(), constructor);
    }

    /// Constructs the named scenario.
    pub fn create(&self, name: &str) -> Result<Box<dyn Scenario>, HarnessError> {
        self.entries
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| HarnessError::UnknownScenario(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_creates_by_name() {
        let registry = ScenarioRegistry::builtin();
        let scenario = registry.create("Noop").unwrap();
        assert_eq!(scenario.name(), "Noop");
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let registry = ScenarioRegistry::builtin();
        let err = registry.create("DoesNotExist").err().unwrap();
        match err {
            HarnessError::UnknownScenario(name) => assert_eq!(name, "DoesNotExist"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = ScenarioRegistry::builtin();
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"Noop"));
        assert!(names.contains(&"Sleep"));
    }

    #[test]
    fn test_each_create_returns_a_fresh_instance() {
        struct Marker;
        impl Scenario for Marker {
            fn name(&self) -> &str {
                "Marker"
            }
        }

        let mut registry = ScenarioRegistry::new();
        registry.register("Marker", || Box::new(Marker));

        let first = registry.create("Marker").unwrap();
        let second = registry.create("Marker").unwrap();
        assert_eq!(first.name(), second.name());
        let first_addr = std::ptr::from_ref(first.as_ref()) as *const ();
        let second_addr = std::ptr::from_ref(second.as_ref()) as *const ();
        assert_ne!(first_addr, second_addr);
    }
}
