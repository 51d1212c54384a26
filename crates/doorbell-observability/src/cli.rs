//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-doorbell-core`, `--debug-doorbell-hal`, etc.

use std::collections::BTreeSet;
use std::env;

use crate::{crate_target, KNOWN_CRATES};

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use doorbell_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-doorbell-core".to_string()]);
/// assert!(flags.is_enabled("doorbell-core"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Looks for arguments matching `--debug-{crate-name}`.
    /// `--debug-all` enables every known crate.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enabled_crates.insert(crate_name.to_string());
            }
        }

        flags
    }

    /// Parse a comma-separated list (`"doorbell-core,doorbell-hal"` or `"all"`)
    pub fn from_list(list: &str) -> Self {
        let mut flags = CrateDebugFlags::default();
        flags.merge_list(list);
        flags
    }

    fn merge_list(&mut self, list: &str) {
        if list.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in list.split(',') {
            let crate_name = crate_name.trim();
            if !crate_name.is_empty() {
                self.enabled_crates.insert(crate_name.to_string());
            }
        }
    }

    fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enabled_crates.insert(crate_name.to_string());
        }
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Build an `EnvFilter` directive string on top of a base level.
    ///
    /// Format: `"doorbell_core=debug,info"`.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates
            .iter()
            .map(|name| format!("{}=debug", crate_target(name)))
            .collect();
        filters.push(base_level.to_string());
        filters.join(",")
    }
}

/// Parse debug flags from the process arguments and `DOORBELL_DEBUG`
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var("DOORBELL_DEBUG") {
        flags.merge_list(&env_var);
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-doorbell-core".to_string()]);
        assert!(flags.is_enabled("doorbell-core"));
        assert!(!flags.is_enabled("doorbell-hal"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
        assert!(flags.is_enabled("doorbell-observability"));
    }

    #[test]
    fn test_all_from_list_covers_every_workspace_crate() {
        let filter = CrateDebugFlags::from_list("all").to_filter_string("info");
        for target in [
            "doorbell=debug",
            "doorbell_core=debug",
            "doorbell_hal=debug",
            "doorbell_config=debug",
            "doorbell_observability=debug",
        ] {
            assert!(filter.split(',').any(|d| d == target), "missing {}", target);
        }
    }

    #[test]
    fn test_unrelated_args_ignored() {
        let flags = CrateDebugFlags::from_args(vec!["doorbell".to_string(), "--verbose".to_string()]);
        assert!(!flags.any_enabled());
    }

    #[test]
    fn test_filter_string_uses_target_names() {
        let flags = CrateDebugFlags::from_list("doorbell-core, doorbell-hal");
        let filter = flags.to_filter_string("warn");
        assert_eq!(filter, "doorbell_core=debug,doorbell_hal=debug,warn");
    }

    #[test]
    fn test_filter_string_without_flags() {
        let flags = CrateDebugFlags::default();
        assert_eq!(flags.to_filter_string("info"), "info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_list("doorbell-core");
        assert_eq!(flags.log_level("doorbell-core"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("doorbell-hal"), tracing::Level::INFO);
    }
}
