//! Runtime configuration.
//!
//! Thread-local like the rest of the runtime state: every component tree
//! lives on one thread.

use std::cell::Cell;

/// Settings read by the engine at render and reduce time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecycleConfig {
    /// Fail the first render pass when a child constructor is reused
    /// without a distinguishing key.
    pub validate_keys: bool,
    /// Emit a `trace` event for every reducer application.
    pub trace_reducers: bool,
}

impl Default for RecycleConfig {
    fn default() -> Self {
        Self {
            validate_keys: true,
            trace_reducers: false,
        }
    }
}

thread_local! {
    static CONFIG: Cell<RecycleConfig> = Cell::new(RecycleConfig::default());
}

/// Current configuration.
pub fn config() -> RecycleConfig {
    CONFIG.with(|c| c.get())
}

/// Replace the configuration for this thread.
pub fn set_config(config: RecycleConfig) {
    CONFIG.with(|c| c.set(config));
}

/// Restore defaults (for testing).
pub fn reset_config() {
    set_config(RecycleConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_reset() {
        reset_config();
        assert!(config().validate_keys);
        assert!(!config().trace_reducers);

        set_config(RecycleConfig {
            validate_keys: false,
            trace_reducers: true,
        });
        assert!(!config().validate_keys);

        reset_config();
        assert_eq!(config(), RecycleConfig::default());
    }
}
