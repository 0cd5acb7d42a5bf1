// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! holeplan Geometry
//!
//! Ray intersection against barrier solids and an in-memory host model
//! that implements the planner's host contracts.

pub mod contour;
pub mod document;
pub mod error;
pub mod hole_index;
pub mod intersector;
pub mod plane;
pub mod snapshot;
pub mod solid;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use document::{
    BarrierEntry, CompanionDocument, FamilySymbol, HoleInstance, Level, ModelDocument,
};
pub use error::{Error, Result};
pub use hole_index::{HoleIndex, HoleStatistics};
pub use intersector::{BarrierTarget, ReferenceIntersector};
pub use plane::Plane;
pub use snapshot::ModelSnapshot;
pub use solid::BarrierSolid;
