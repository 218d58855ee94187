//! Snapshot of the environment a spawned process would inherit.
//!
//! Two sources exist: the OS-level environment block, and a runtime-managed
//! override table layered on top of it by the host. Both are captured as
//! read-only maps and merged once per composition. On a name collision the
//! runtime table wins.

use tracing::{debug, warn};

use super::types::EnvMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnvironment {
    os: EnvMap,
    runtime: EnvMap,
}

impl ProcessEnvironment {
    pub fn new(os: EnvMap, runtime: EnvMap) -> Self {
        Self { os, runtime }
    }

    /// Snapshot the live OS environment with an empty runtime table.
    pub fn capture() -> Self {
        Self::capture_with_runtime(EnvMap::new())
    }

    /// Snapshot the live OS environment and pair it with `runtime`.
    ///
    /// Entries that are not valid UTF-8 are skipped.
    pub fn capture_with_runtime(runtime: EnvMap) -> Self {
        let mut os = EnvMap::new();
        let mut skipped = 0usize;

        for (name, value) in std::env::vars_os() {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => {
                    os.insert(name, value);
                }
                (name, _) => {
                    skipped += 1;
                    warn!(
                        event = "core.env.snapshot_entry_skipped",
                        name = ?name.ok(),
                        reason = "not valid UTF-8",
                    );
                }
            }
        }

        debug!(
            event = "core.env.snapshot_captured",
            os_vars = os.len(),
            runtime_vars = runtime.len(),
            skipped = skipped,
        );

        Self { os, runtime }
    }

    pub fn os(&self) -> &EnvMap {
        &self.os
    }

    pub fn runtime(&self) -> &EnvMap {
        &self.runtime
    }

    /// The inherited base: OS entries overlaid with runtime entries.
    pub fn merged(&self) -> EnvMap {
        let mut base = self.os.clone();
        base.extend(self.runtime.iter().map(|(k, v)| (k.clone(), v.clone())));
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_runtime_table_wins_over_os() {
        let env = ProcessEnvironment::new(
            map(&[("X_FOO", "X_BAR"), ("X_BAZ", "X_BIZ")]),
            map(&[("X_FOO", "X_BAR_runtime")]),
        );
        let merged = env.merged();
        assert_eq!(merged["X_FOO"], "X_BAR_runtime");
        assert_eq!(merged["X_BAZ"], "X_BIZ");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merged_does_not_mutate_sources() {
        let env = ProcessEnvironment::new(map(&[("A", "os")]), map(&[("A", "rt")]));
        let _ = env.merged();
        assert_eq!(env.os()["A"], "os");
        assert_eq!(env.runtime()["A"], "rt");
    }

    #[test]
    fn test_capture_sees_live_os_variable() {
        temp_env::with_var("SPAWN_ENV_SNAPSHOT_PROBE", Some("seen"), || {
            let env = ProcessEnvironment::capture();
            assert_eq!(
                env.os().get("SPAWN_ENV_SNAPSHOT_PROBE").map(String::as_str),
                Some("seen")
            );
            assert!(env.runtime().is_empty());
        });
    }

    #[test]
    fn test_capture_is_a_snapshot() {
        let env = temp_env::with_var("SPAWN_ENV_SNAPSHOT_LATE", None::<&str>, || {
            ProcessEnvironment::capture()
        });
        temp_env::with_var("SPAWN_ENV_SNAPSHOT_LATE", Some("later"), || {
            assert!(!env.os().contains_key("SPAWN_ENV_SNAPSHOT_LATE"));
        });
    }

    #[test]
    fn test_capture_with_runtime_overrides_os() {
        temp_env::with_var("SPAWN_ENV_SNAPSHOT_BOTH", Some("os"), || {
            let env = ProcessEnvironment::capture_with_runtime(map(&[(
                "SPAWN_ENV_SNAPSHOT_BOTH",
                "runtime",
            )]));
            assert_eq!(env.merged()["SPAWN_ENV_SNAPSHOT_BOTH"], "runtime");
        });
    }
}
