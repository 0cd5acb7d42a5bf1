// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference intersector over barrier solids.

use crate::solid::BarrierSolid;
use holeplan_core::{BarrierReference, RayHit, RayIntersector, ViewContext};
use nalgebra::{Point3, Vector3};

/// A barrier solid addressed by the reference hits report
#[derive(Debug, Clone, Copy)]
pub struct BarrierTarget<'a> {
    pub reference: BarrierReference,
    pub solid: &'a BarrierSolid,
}

impl<'a> BarrierTarget<'a> {
    pub fn new(reference: BarrierReference, solid: &'a BarrierSolid) -> Self {
        Self { reference, solid }
    }

    /// Hidden if either the element or, for a linked barrier, the element
    /// inside the link is hidden in the view
    fn visible_in(&self, view: &ViewContext) -> bool {
        let hidden = view.is_hidden(self.reference.element)
            || self
                .reference
                .linked_element
                .map_or(false, |linked| view.is_hidden(linked));
        !hidden && view.includes_bounds(self.solid.bounds())
    }
}

/// Casts rays against a fixed set of barrier solids.
///
/// Reports every face crossing, so a ray through a barrier yields one
/// hit where it enters and one where it leaves.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIntersector<'a> {
    targets: Vec<BarrierTarget<'a>>,
}

impl<'a> ReferenceIntersector<'a> {
    pub fn new(targets: impl IntoIterator<Item = BarrierTarget<'a>>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// Keep only targets visible in `view` and overlapping its section box
    pub fn scoped(
        targets: impl IntoIterator<Item = BarrierTarget<'a>>,
        view: &ViewContext,
    ) -> Self {
        let targets: Vec<_> = targets
            .into_iter()
            .filter(|target| target.visible_in(view))
            .collect();
        tracing::trace!(view = %view.name, targets = targets.len(), "scoped intersector");
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl RayIntersector for ReferenceIntersector<'_> {
    fn find(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Vec<RayHit> {
        let norm = direction.norm();
        if !norm.is_finite() || norm <= f64::EPSILON {
            return Vec::new();
        }
        let direction = direction / norm;

        let mut hits: Vec<RayHit> = self
            .targets
            .iter()
            .flat_map(|target| {
                target
                    .solid
                    .ray_crossings(origin, &direction)
                    .into_iter()
                    .map(move |t| RayHit::new(target.reference, t))
            })
            .collect();
        hits.sort_by(|a, b| a.proximity.total_cmp(&b.proximity));
        hits
    }
}
