/*
[INPUT]:  Caller-chosen backend policy
[OUTPUT]: Defaults for grace time and destroy semantics
[POS]:    Backend layer - configuration
[UPDATE]: When adding backend policy knobs
*/

use std::time::Duration;

const DEFAULT_GRACE_TIME: Duration = Duration::from_secs(5 * 60);

/// Backend policy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Used when a container cannot report its own grace time
    pub grace_time: Duration,
    /// Treat a 404 from destroy as success
    pub destroy_missing_ok: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            grace_time: DEFAULT_GRACE_TIME,
            destroy_missing_ok: false,
        }
    }
}
