//! Built-in reporter defaults (layer 1)

use report_model::DEFAULT_SLOW_MS;

use crate::normalize::SeenScope;

use super::ConfigLayer;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".test-report.toml";

/// Built-in layer: no destination (emit on stdout), 75 ms slow threshold,
/// global seen-set semantics.
pub fn builtin_layer() -> ConfigLayer {
    ConfigLayer {
        output: None,
        slow_ms: Some(DEFAULT_SLOW_MS),
        seen_scope: Some(SeenScope::Global),
    }
}
