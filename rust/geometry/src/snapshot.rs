// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON snapshot of a host model.
//!
//! A snapshot describes levels, wall baselines, floor boundaries, 3D
//! views, loaded hole families, existing holes and companion documents
//! with their service runs. [`ModelDocument::from_snapshot`] builds the barrier
//! solids and validates cross references.

use crate::document::{CompanionDocument, FamilySymbol, Level, ModelDocument};
use crate::error::{Error, Result};
use crate::solid::BarrierSolid;
use holeplan_core::{
    Aabb, Barrier, ElementId, HoleInstanceId, HoleParameters, LevelId, ServiceElement,
    ServiceKind, ServicePath, SymbolId, ViewContext, ViewId,
};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub title: String,
    #[serde(default)]
    pub levels: Vec<LevelSnapshot>,
    #[serde(default)]
    pub walls: Vec<WallSnapshot>,
    #[serde(default)]
    pub floors: Vec<FloorSnapshot>,
    #[serde(default)]
    pub views: Vec<ViewSnapshot>,
    #[serde(default)]
    pub symbols: Vec<SymbolSnapshot>,
    #[serde(default)]
    pub companions: Vec<CompanionSnapshot>,
    /// Holes already present in the model
    #[serde(default)]
    pub holes: Vec<HoleSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub elevation: f64,
}

/// Straight wall along a baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSnapshot {
    pub id: i64,
    #[serde(default)]
    pub level: Option<i64>,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub thickness: f64,
    #[serde(default)]
    pub base: f64,
    pub height: f64,
    /// Link instance when the wall lives in a linked model
    #[serde(default)]
    pub link: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorSnapshot {
    pub id: i64,
    pub boundary: Vec<[f64; 2]>,
    /// Elevation of the top face
    pub top: f64,
    pub thickness: f64,
    #[serde(default)]
    pub link: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub hidden: Vec<i64>,
    /// `[min, max]` corners
    #[serde(default)]
    pub section_box: Option<[[f64; 3]; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub id: i64,
    pub family: String,
    pub parameters: Vec<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default = "default_activatable")]
    pub activatable: bool,
}

fn default_activatable() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleSnapshot {
    pub id: i64,
    pub symbol: i64,
    pub host: i64,
    pub location: [f64; 3],
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionSnapshot {
    pub title: String,
    #[serde(default)]
    pub ducts: Vec<ServiceSnapshot>,
    #[serde(default)]
    pub pipes: Vec<ServiceSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub id: i64,
    pub diameter: f64,
    pub path: PathSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathSnapshot {
    Line {
        start: [f64; 3],
        end: [f64; 3],
    },
    Arc {
        start: [f64; 3],
        mid: [f64; 3],
        end: [f64; 3],
    },
    Polyline {
        points: Vec<[f64; 3]>,
    },
}

fn point3([x, y, z]: [f64; 3]) -> Point3<f64> {
    Point3::new(x, y, z)
}

fn point2([x, y]: [f64; 2]) -> Point2<f64> {
    Point2::new(x, y)
}

impl From<&PathSnapshot> for ServicePath {
    fn from(path: &PathSnapshot) -> Self {
        match path {
            PathSnapshot::Line { start, end } => ServicePath::Line {
                start: point3(*start),
                end: point3(*end),
            },
            PathSnapshot::Arc { start, mid, end } => ServicePath::Arc {
                start: point3(*start),
                mid: point3(*mid),
                end: point3(*end),
            },
            PathSnapshot::Polyline { points } => {
                ServicePath::Polyline(points.iter().copied().map(point3).collect())
            }
        }
    }
}

impl ServiceSnapshot {
    fn to_element(&self, kind: ServiceKind) -> ServiceElement {
        ServiceElement {
            id: ElementId(self.id),
            kind,
            path: ServicePath::from(&self.path),
            diameter: self.diameter,
        }
    }
}

impl ViewSnapshot {
    fn to_view(&self) -> ViewContext {
        let mut view = ViewContext::new(ViewId(self.id), self.name.clone());
        view.is_template = self.is_template;
        view.hidden = self.hidden.iter().copied().map(ElementId).collect();
        view.section_box = self
            .section_box
            .map(|[min, max]| Aabb::new(point3(min), point3(max)));
        view
    }
}

impl ModelSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl ModelDocument {
    /// Build a document from a snapshot, validating cross references
    pub fn from_snapshot(snapshot: &ModelSnapshot) -> Result<Self> {
        let mut doc = ModelDocument::new(snapshot.title.clone());

        for level in &snapshot.levels {
            doc.add_level(Level {
                id: LevelId(level.id),
                name: level.name.clone(),
                elevation: level.elevation,
            })?;
        }

        for wall in &snapshot.walls {
            let solid = BarrierSolid::wall(
                point2(wall.start),
                point2(wall.end),
                wall.thickness,
                wall.base,
                wall.height,
            )
            .map_err(|e| Error::Snapshot(format!("wall #{}: {}", wall.id, e)))?;
            let id = ElementId(wall.id);
            let level = wall.level.map(LevelId);
            match wall.link {
                Some(link) => {
                    doc.add_linked_barrier(ElementId(link), Barrier::Wall { id, level }, solid)?
                }
                None => doc.add_wall(id, level, solid)?,
            }
        }

        for floor in &snapshot.floors {
            let boundary = floor.boundary.iter().copied().map(point2).collect();
            let solid = BarrierSolid::slab(boundary, floor.top, floor.thickness)
                .map_err(|e| Error::Snapshot(format!("floor #{}: {}", floor.id, e)))?;
            let id = ElementId(floor.id);
            match floor.link {
                Some(link) => {
                    doc.add_linked_barrier(ElementId(link), Barrier::Floor { id }, solid)?
                }
                None => doc.add_floor(id, solid)?,
            }
        }

        for view in &snapshot.views {
            doc.add_view(view.to_view());
        }

        for symbol in &snapshot.symbols {
            doc.add_symbol(FamilySymbol {
                id: SymbolId(symbol.id),
                family_name: symbol.family.clone(),
                parameters: symbol.parameters.clone(),
                active: symbol.active,
                activatable: symbol.activatable,
            })?;
        }

        for hole in &snapshot.holes {
            doc.add_hole(
                HoleInstanceId(hole.id),
                SymbolId(hole.symbol),
                ElementId(hole.host),
                point3(hole.location),
                HoleParameters {
                    width: hole.width,
                    height: hole.height,
                },
            )?;
        }

        for companion in &snapshot.companions {
            let services = companion
                .ducts
                .iter()
                .map(|s| s.to_element(ServiceKind::Duct))
                .chain(companion.pipes.iter().map(|s| s.to_element(ServiceKind::Pipe)))
                .collect();
            doc.add_companion(CompanionDocument {
                title: companion.title.clone(),
                services,
            });
        }

        tracing::debug!(
            title = %doc.title(),
            levels = doc.level_count(),
            barriers = doc.barriers().len(),
            views = doc.views().len(),
            symbols = doc.symbols().len(),
            companions = doc.companions().len(),
            holes = doc.holes().len(),
            "loaded model snapshot"
        );
        Ok(doc)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_snapshot(&ModelSnapshot::from_json(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_snapshot(&ModelSnapshot::from_path(path)?)
    }
}
