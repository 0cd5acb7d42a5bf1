// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON rendering of a placement report.

use holeplan_core::{
    ElementId, HoleCategory, HoleInstanceId, HolePlacement, PhaseOutcome, PlacementReport,
    SkippedItem,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub model: &'a str,
    pub summary: Summary,
    pub rejected_runs: Vec<Skipped>,
    pub walls: Phase<'a>,
    pub floors: Phase<'a>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub holes_created: usize,
    pub wall_holes: usize,
    pub floor_holes: usize,
    pub rejected_runs: usize,
    pub skipped: usize,
}

#[derive(Debug, Serialize)]
pub struct Phase<'a> {
    pub category: HoleCategory,
    pub runs_considered: usize,
    pub created: Vec<Created<'a>>,
    pub skipped: Vec<Skipped>,
}

#[derive(Debug, Serialize)]
pub struct Created<'a> {
    pub instance: HoleInstanceId,
    #[serde(flatten)]
    pub placement: &'a HolePlacement,
}

#[derive(Debug, Serialize)]
pub struct Skipped {
    pub run: ElementId,
    pub barrier: Option<String>,
    pub reason: String,
}

impl From<&SkippedItem> for Skipped {
    fn from(item: &SkippedItem) -> Self {
        Self {
            run: item.run,
            barrier: item.barrier.map(|key| key.to_string()),
            reason: item.error.to_string(),
        }
    }
}

impl<'a> From<&'a PhaseOutcome> for Phase<'a> {
    fn from(outcome: &'a PhaseOutcome) -> Self {
        Self {
            category: outcome.category,
            runs_considered: outcome.runs_considered,
            created: outcome
                .created
                .iter()
                .map(|hole| Created {
                    instance: hole.instance,
                    placement: &hole.placement,
                })
                .collect(),
            skipped: outcome.skipped.iter().map(Skipped::from).collect(),
        }
    }
}

impl<'a> ReportDocument<'a> {
    pub fn new(model: &'a str, report: &'a PlacementReport) -> Self {
        let summary = report.summary();
        Self {
            model,
            summary: Summary {
                holes_created: report.holes_created(),
                wall_holes: summary.wall_holes,
                floor_holes: summary.floor_holes,
                rejected_runs: summary.rejected_runs,
                skipped: summary.skipped,
            },
            rejected_runs: report.rejected_runs.iter().map(Skipped::from).collect(),
            walls: Phase::from(&report.walls),
            floors: Phase::from(&report.floors),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
