// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # holeplan Core
//!
//! Places openings in walls and floors wherever a straight duct or pipe
//! passes through them, sized to the service diameter.
//!
//! ## Overview
//!
//! - **Data model**: [`ServiceRun`], [`Barrier`], [`RawIntersection`],
//!   [`HolePlacement`] and typed identifiers
//! - **Host contracts**: [`BarrierCatalog`], [`RayIntersector`],
//!   [`HoleFactory`] and [`ModelSession`], implemented by the host platform
//! - **Deduplication**: [`dedupe`] collapses crossings on the same barrier
//! - **Planner**: [`HolePlanner`] runs the wall phase, commits it, then runs
//!   the floor phase against the updated model
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use holeplan_core::{HolePlanner, PlannerConfig};
//!
//! let planner = HolePlanner::new(PlannerConfig::default());
//! let report = planner.run(&mut session)?;
//! println!("{} holes created", report.holes_created());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the data model

pub mod barrier;
pub mod config;
pub mod dedup;
pub mod error;
pub mod hole;
pub mod host;
pub mod ids;
pub mod planner;
pub mod service;
pub mod view;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use barrier::{Barrier, BarrierKind, RawIntersection, RayHit};
pub use config::{FailurePolicy, PlannerConfig};
pub use dedup::dedupe;
pub use error::{
    GeometryResolutionError, PlacementError, PlannerError, PreconditionError, Result,
    TransactionError,
};
pub use hole::{
    HoleCategory, HoleFamilySpec, HoleParameterSchema, HoleParameters, HolePlacement, HoleSymbol,
    ParameterSlot, StructuralKind,
};
pub use host::{BarrierCatalog, HoleFactory, ModelSession, RayIntersector};
pub use ids::{BarrierKey, BarrierReference, ElementId, HoleInstanceId, LevelId, SymbolId, ViewId};
pub use planner::{
    find_crossings, resolve_placement, CreatedHole, FloorPhasePlan, HolePlanner, PhaseOutcome,
    PlacementReport, Preflight, ReportSummary, SkippedItem, WallPhaseCommitted, WallPhasePlan,
    FLOOR_TRANSACTION, WALL_TRANSACTION,
};
pub use service::{
    Line, PathShape, ServiceElement, ServiceKind, ServicePath, ServiceRun, UnsupportedGeometry,
};
pub use view::{Aabb, ViewContext};
