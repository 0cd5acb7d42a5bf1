// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D viewing contexts used to scope ray queries.

use crate::ids::{ElementId, ViewId};
use nalgebra::Point3;
use rustc_hash::FxHashSet;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, `None` for an empty input
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(Self { min, max })
    }

    /// Boxes touching on a face count as overlapping
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// A 3D view used purely as the spatial scope of ray queries.
///
/// Elements hidden in the view, or lying wholly outside its section box,
/// are invisible to intersectors bound to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewContext {
    pub id: ViewId,
    pub name: String,
    pub is_template: bool,
    pub hidden: FxHashSet<ElementId>,
    pub section_box: Option<Aabb>,
}

impl ViewContext {
    /// Unrestricted non-template view
    pub fn new(id: ViewId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_template: false,
            hidden: FxHashSet::default(),
            section_box: None,
        }
    }

    pub fn is_hidden(&self, element: ElementId) -> bool {
        self.hidden.contains(&element)
    }

    /// Whether geometry with the given bounds is inside the view scope
    pub fn includes_bounds(&self, bounds: &Aabb) -> bool {
        self.section_box
            .as_ref()
            .map(|section| section.overlaps(bounds))
            .unwrap_or(true)
    }
}
