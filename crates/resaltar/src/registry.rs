//! Host module registry interface.
//!
//! Acceptance-test hosts keep their driver modules in a registry keyed by
//! name. The facade only needs two operations from it: presence check and
//! retrieval. Embedders with a real host implement [`ModuleRegistry`] over
//! it; tests and standalone use get [`StaticRegistry`].

use crate::driver::DriverModule;

/// Lookup interface over the host's active modules
pub trait ModuleRegistry {
    /// Driver type this registry hands out
    type Driver: DriverModule;

    /// Is a module with this name active?
    fn has_module(&self, name: &str) -> bool;

    /// Fetch the module by name
    fn get_module(&self, name: &str) -> Option<Self::Driver>;
}

/// Single-entry registry: one named driver.
#[derive(Debug, Clone)]
pub struct StaticRegistry<D> {
    name: String,
    driver: D,
}

impl<D: DriverModule + Clone> StaticRegistry<D> {
    /// Register `driver` under `name`
    #[must_use]
    pub fn new(name: impl Into<String>, driver: D) -> Self {
        Self {
            name: name.into(),
            driver,
        }
    }
}

impl<D: DriverModule + Clone> ModuleRegistry for StaticRegistry<D> {
    type Driver = D;

    fn has_module(&self, name: &str) -> bool {
        self.name == name
    }

    fn get_module(&self, name: &str) -> Option<D> {
        (self.name == name).then(|| self.driver.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    #[test]
    fn test_static_registry_matches_exact_name() {
        let registry = StaticRegistry::new("WebDriver", MockDriver::new());
        assert!(registry.has_module("WebDriver"));
        assert!(!registry.has_module("webdriver"));
        assert!(!registry.has_module("Playwright"));
    }

    #[test]
    fn test_get_module_returns_none_for_unknown_name() {
        let registry = StaticRegistry::new("WebDriver", MockDriver::new());
        assert!(registry.get_module("WebDriver").is_some());
        assert!(registry.get_module("Other").is_none());
    }
}
