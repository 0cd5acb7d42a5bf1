// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use holeplan_core::{FailurePolicy, PlannerConfig};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Planner settings (families, parameters, document markers, policy).
    pub planner: PlannerConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, unset or unparsable values
    /// falling back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = PlannerConfig::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let planner = PlannerConfig {
            wall_family: text("HOLEPLAN_WALL_FAMILY", defaults.wall_family),
            floor_family: text("HOLEPLAN_FLOOR_FAMILY", defaults.floor_family),
            width_parameter: text("HOLEPLAN_WIDTH_PARAM", defaults.width_parameter),
            height_parameter: text("HOLEPLAN_HEIGHT_PARAM", defaults.height_parameter),
            mechanical_marker: text("HOLEPLAN_MECHANICAL_MARKER", defaults.mechanical_marker),
            plumbing_marker: text("HOLEPLAN_PLUMBING_MARKER", defaults.plumbing_marker),
            failure_policy: lookup("HOLEPLAN_FAILURE_POLICY")
                .and_then(|v| v.parse::<FailurePolicy>().ok())
                .unwrap_or(defaults.failure_policy),
            proximity_tolerance: lookup("HOLEPLAN_PROXIMITY_TOLERANCE")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(defaults.proximity_tolerance),
        };

        Self {
            planner,
            log_format: lookup("HOLEPLAN_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
