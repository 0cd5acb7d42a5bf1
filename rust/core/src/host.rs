// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contracts between the planner and the host platform.
//!
//! The planner never talks to a concrete model. It pulls service runs and
//! ray intersectors from a [`BarrierCatalog`], creates holes through a
//! [`HoleFactory`], and brackets each phase with a transaction on the
//! [`ModelSession`].

use crate::barrier::{Barrier, BarrierKind, RayHit};
use crate::error::{PlacementError, PreconditionError, TransactionError};
use crate::hole::{HoleFamilySpec, HolePlacement, HoleSymbol, StructuralKind};
use crate::ids::{BarrierReference, HoleInstanceId};
use crate::service::{ServiceElement, ServiceKind};
use crate::view::ViewContext;
use nalgebra::{Point3, Vector3};

/// Ray intersection engine bound to one barrier class and one view.
pub trait RayIntersector {
    /// Every crossing along the infinite ray from `origin` in `direction`.
    ///
    /// Results are not filtered by any finite length. Implementations
    /// should order them by ascending proximity; callers sort regardless.
    fn find(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Vec<RayHit>;
}

/// Read side of the host model
pub trait BarrierCatalog {
    /// Services of `kind` from the companion document whose title contains
    /// `source_marker`.
    fn service_elements(
        &self,
        kind: ServiceKind,
        source_marker: &str,
    ) -> Result<Vec<ServiceElement>, PreconditionError>;

    /// First non-template 3D view
    fn view_3d(&self) -> Option<ViewContext>;

    /// Intersector over barriers of `kind`, scoped by `view`
    fn intersector<'a>(
        &'a self,
        kind: BarrierKind,
        view: &ViewContext,
    ) -> Box<dyn RayIntersector + 'a>;

    /// Checked resolution of a hit reference to a host barrier.
    ///
    /// `None` when the reference does not name a barrier of the host model
    /// (unknown element, link instance, ...).
    fn resolve_barrier(&self, reference: &BarrierReference) -> Option<Barrier>;
}

/// Creation side of the host model
pub trait HoleFactory {
    /// Load the hole symbol described by `spec`, binding its typed
    /// parameter schema.
    fn hole_symbol(&self, spec: &HoleFamilySpec<'_>) -> Result<HoleSymbol, PreconditionError>;

    /// Make `symbol` usable for instance creation
    fn activate_symbol(&mut self, symbol: &mut HoleSymbol) -> Result<(), PreconditionError>;

    /// Undo an [`activate_symbol`](Self::activate_symbol) made by this run
    fn deactivate_symbol(&mut self, symbol: &mut HoleSymbol);

    /// Create one hole instance inside the open transaction
    fn create_hole(
        &mut self,
        placement: &HolePlacement,
        symbol: &HoleSymbol,
        structural: StructuralKind,
    ) -> Result<HoleInstanceId, PlacementError>;
}

/// A host model that can be read, mutated and committed atomically.
///
/// Instances created between [`start_transaction`](Self::start_transaction)
/// and [`commit_transaction`](Self::commit_transaction) become part of the
/// model only on commit; [`rollback_transaction`](Self::rollback_transaction)
/// discards them.
pub trait ModelSession: BarrierCatalog + HoleFactory {
    fn start_transaction(&mut self, name: &str) -> Result<(), TransactionError>;

    /// Returns the number of instances made durable
    fn commit_transaction(&mut self) -> Result<usize, TransactionError>;

    fn rollback_transaction(&mut self) -> Result<(), TransactionError>;
}
