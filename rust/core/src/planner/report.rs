// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outcome of a planning run.

use crate::error::PlacementError;
use crate::hole::{HoleCategory, HolePlacement};
use crate::ids::{BarrierKey, ElementId, HoleInstanceId};

/// A run or crossing that produced no hole
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedItem {
    pub run: ElementId,
    /// Barrier involved, `None` when the whole run was rejected
    pub barrier: Option<BarrierKey>,
    pub error: PlacementError,
}

/// A hole instance that was committed to the model
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedHole {
    pub instance: HoleInstanceId,
    pub placement: HolePlacement,
}

/// Result of one committed phase
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutcome {
    pub category: HoleCategory,
    pub runs_considered: usize,
    pub created: Vec<CreatedHole>,
    pub skipped: Vec<SkippedItem>,
}

impl PhaseOutcome {
    pub fn new(category: HoleCategory) -> Self {
        Self {
            category,
            runs_considered: 0,
            created: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn placements(&self) -> impl Iterator<Item = &HolePlacement> {
        self.created.iter().map(|hole| &hole.placement)
    }
}

/// Counts for logging and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub rejected_runs: usize,
    pub wall_holes: usize,
    pub floor_holes: usize,
    pub skipped: usize,
}

/// Full result of [`HolePlanner::run`](super::HolePlanner::run)
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    /// Runs excluded before casting (non-straight path, bad diameter)
    pub rejected_runs: Vec<SkippedItem>,
    pub walls: PhaseOutcome,
    pub floors: PhaseOutcome,
}

impl PlacementReport {
    /// Report with no holes in either phase
    pub fn empty(rejected_runs: Vec<SkippedItem>) -> Self {
        Self {
            rejected_runs,
            walls: PhaseOutcome::new(HoleCategory::WallHole),
            floors: PhaseOutcome::new(HoleCategory::FloorHole),
        }
    }

    pub fn holes_created(&self) -> usize {
        self.walls.created.len() + self.floors.created.len()
    }

    /// Rejected runs plus skipped crossings of both phases
    pub fn skipped_count(&self) -> usize {
        self.rejected_runs.len() + self.walls.skipped.len() + self.floors.skipped.len()
    }

    /// Wall placements first, then floor placements
    pub fn placements(&self) -> impl Iterator<Item = &HolePlacement> {
        self.walls.placements().chain(self.floors.placements())
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            rejected_runs: self.rejected_runs.len(),
            wall_holes: self.walls.created.len(),
            floor_holes: self.floors.created.len(),
            skipped: self.skipped_count(),
        }
    }
}
