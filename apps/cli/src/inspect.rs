// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only summary of a model snapshot.

use holeplan_core::{BarrierCatalog, BarrierKind, ServiceKind, ServiceRun};
use holeplan_geometry::{HoleStatistics, ModelDocument};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub title: String,
    pub levels: usize,
    pub walls: usize,
    pub floors: usize,
    pub linked_barriers: usize,
    /// View the planner would use
    pub view_3d: Option<String>,
    pub symbols: Vec<SymbolSummary>,
    pub companions: Vec<CompanionSummary>,
    pub existing_holes: usize,
    pub hosts_with_holes: usize,
    pub max_holes_per_host: usize,
    pub avg_holes_per_host: f64,
}

#[derive(Debug, Serialize)]
pub struct SymbolSummary {
    pub family: String,
    pub active: bool,
    pub parameters: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanionSummary {
    pub title: String,
    pub ducts: usize,
    pub pipes: usize,
    /// Runs the planner would reject before casting
    pub unsupported: usize,
}

impl ModelSummary {
    pub fn of(doc: &ModelDocument) -> Self {
        let barriers = doc.barriers();
        let count = |kind: BarrierKind| {
            barriers
                .iter()
                .filter(|entry| !entry.reference.is_linked() && entry.barrier.kind() == kind)
                .count()
        };
        let stats = HoleStatistics::from_index(doc.hole_index());

        Self {
            title: doc.title().to_string(),
            levels: doc.level_count(),
            walls: count(BarrierKind::Wall),
            floors: count(BarrierKind::Floor),
            linked_barriers: barriers.iter().filter(|e| e.reference.is_linked()).count(),
            view_3d: doc.view_3d().map(|view| view.name),
            symbols: doc
                .symbols()
                .iter()
                .map(|symbol| SymbolSummary {
                    family: symbol.family_name.clone(),
                    active: symbol.active,
                    parameters: symbol.parameters.clone(),
                })
                .collect(),
            companions: doc
                .companions()
                .iter()
                .map(|companion| {
                    let of_kind = |kind: ServiceKind| {
                        companion.services.iter().filter(|s| s.kind == kind).count()
                    };
                    CompanionSummary {
                        title: companion.title.clone(),
                        ducts: of_kind(ServiceKind::Duct),
                        pipes: of_kind(ServiceKind::Pipe),
                        unsupported: companion
                            .services
                            .iter()
                            .filter(|s| ServiceRun::from_element(s).is_err())
                            .count(),
                    }
                })
                .collect(),
            existing_holes: doc.holes().len(),
            hosts_with_holes: stats.hosts_with_holes,
            max_holes_per_host: stats.max_holes_per_host,
            avg_holes_per_host: stats.avg_holes_per_host,
        }
    }
}
