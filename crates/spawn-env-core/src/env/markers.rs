//! Variables the harness guarantees on isolated spawns.
//!
//! When a spawn does not inherit the parent environment, the child still
//! needs to know it was started by the harness. These names and values are a
//! contract with the spawned program, not configuration.

pub use spawn_env_config::HOST_REQUEST_MARKER;

use super::types::EnvMap;

/// Value of [`HOST_REQUEST_MARKER`].
pub const HOST_REQUEST_MARKER_VALUE: &str = "1";

/// Variables present in every isolated composition.
pub const MANDATORY_MARKERS: &[(&str, &str)] =
    &[(HOST_REQUEST_MARKER, HOST_REQUEST_MARKER_VALUE)];

pub fn is_marker(name: &str) -> bool {
    MANDATORY_MARKERS.iter().any(|(marker, _)| *marker == name)
}

/// Fresh map holding only the mandatory markers.
pub(super) fn marker_env() -> EnvMap {
    MANDATORY_MARKERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
