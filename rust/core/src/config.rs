// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planner configuration.

use crate::hole::{HoleCategory, HoleFamilySpec};
use crate::service::ServiceKind;
use std::fmt;
use std::str::FromStr;

/// What to do when a single hole cannot be created inside a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailurePolicy {
    /// Record the failure and keep going with the rest of the phase
    #[default]
    SkipAndContinue,
    /// Roll back the phase transaction and stop
    AbortPhase,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "skip-and-continue" | "continue" => Ok(FailurePolicy::SkipAndContinue),
            "abort" | "abort-phase" => Ok(FailurePolicy::AbortPhase),
            other => Err(format!("unknown failure policy: {}", other)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailurePolicy::SkipAndContinue => "skip",
            FailurePolicy::AbortPhase => "abort",
        })
    }
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Family used for wall openings.
    pub wall_family: String,
    /// Family used for floor openings.
    pub floor_family: String,
    /// Name of the width parameter in both families.
    pub width_parameter: String,
    /// Name of the height parameter in both families.
    pub height_parameter: String,
    /// Title marker of the mechanical (duct) companion document.
    pub mechanical_marker: String,
    /// Title marker of the plumbing (pipe) companion document.
    pub plumbing_marker: String,
    /// Per-placement failure handling inside a phase.
    pub failure_policy: FailurePolicy,
    /// Slack on the `0 <= proximity <= length` range check.
    pub proximity_tolerance: f64,
}

impl PlannerConfig {
    /// Family lookup for a hole category
    pub fn family_spec(&self, category: HoleCategory) -> HoleFamilySpec<'_> {
        let family = match category {
            HoleCategory::WallHole => &self.wall_family,
            HoleCategory::FloorHole => &self.floor_family,
        };
        HoleFamilySpec {
            category,
            family,
            width_parameter: &self.width_parameter,
            height_parameter: &self.height_parameter,
        }
    }

    /// Companion document title marker for a service kind
    pub fn source_marker(&self, kind: ServiceKind) -> &str {
        match kind {
            ServiceKind::Duct => &self.mechanical_marker,
            ServiceKind::Pipe => &self.plumbing_marker,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            wall_family: "Отверстие".into(),
            floor_family: "Отверстие в полу".into(),
            width_parameter: "Ширина".into(),
            height_parameter: "Высота".into(),
            mechanical_marker: "ОВ".into(),
            plumbing_marker: "ВК".into(),
            failure_policy: FailurePolicy::default(),
            proximity_tolerance: 0.0,
        }
    }
}
