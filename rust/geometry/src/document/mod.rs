// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory host model.
//!
//! [`ModelDocument`] holds barriers with their solids, levels, 3D views,
//! loaded hole families and the companion documents that carry service
//! runs. It implements the full [`ModelSession`] contract, so the planner
//! can run against it unchanged.

use crate::error::{Error, Result};
use crate::hole_index::HoleIndex;
use crate::intersector::{BarrierTarget, ReferenceIntersector};
use crate::solid::BarrierSolid;
use holeplan_core::{
    Barrier, BarrierCatalog, BarrierKey, BarrierKind, BarrierReference, ElementId,
    GeometryResolutionError, HoleCategory, HoleFactory, HoleFamilySpec, HoleInstanceId,
    HoleParameterSchema, HoleParameters, HolePlacement, HoleSymbol, LevelId, ModelSession,
    ParameterSlot, PlacementError, PreconditionError, RayIntersector, ServiceElement, ServiceKind,
    StructuralKind, SymbolId, TransactionError, ViewContext,
};
use nalgebra::Point3;
use rustc_hash::{FxHashMap, FxHashSet};

/// Building level
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    pub elevation: f64,
}

/// A barrier with its geometry
#[derive(Debug, Clone)]
pub struct BarrierEntry {
    pub barrier: Barrier,
    pub reference: BarrierReference,
    pub solid: BarrierSolid,
}

/// A loaded family type with its parameter table
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySymbol {
    pub id: SymbolId,
    pub family_name: String,
    pub parameters: Vec<String>,
    pub active: bool,
    /// Whether activation can succeed
    pub activatable: bool,
}

impl FamilySymbol {
    /// Inactive but activatable symbol
    pub fn new(id: SymbolId, family_name: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            id,
            family_name: family_name.into(),
            parameters,
            active: false,
            activatable: true,
        }
    }
}

/// A linked discipline document (mechanical, plumbing, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionDocument {
    pub title: String,
    pub services: Vec<ServiceElement>,
}

/// A hole instance created in the model
#[derive(Debug, Clone, PartialEq)]
pub struct HoleInstance {
    pub id: HoleInstanceId,
    pub symbol: SymbolId,
    pub category: HoleCategory,
    pub host: ElementId,
    pub level: Option<LevelId>,
    pub location: Point3<f64>,
    pub structural: StructuralKind,
    /// Service run the hole was cut for, [`ElementId::INVALID`] when unknown
    pub run: ElementId,
    size: HoleParameters,
    values: Vec<f64>,
}

impl HoleInstance {
    pub fn parameters(&self) -> HoleParameters {
        self.size
    }

    /// Raw parameter table in family order, empty for holes loaded from a
    /// snapshot
    pub fn parameter_values(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug)]
struct OpenTransaction {
    name: String,
    created: Vec<HoleInstance>,
}

/// In-memory host model
#[derive(Debug, Default)]
pub struct ModelDocument {
    title: String,
    levels: FxHashMap<LevelId, Level>,
    barriers: Vec<BarrierEntry>,
    /// Host (non-linked) barriers by element id
    host_barriers: FxHashMap<ElementId, usize>,
    barrier_keys: FxHashSet<BarrierKey>,
    views: Vec<ViewContext>,
    symbols: Vec<FamilySymbol>,
    companions: Vec<CompanionDocument>,
    holes: Vec<HoleInstance>,
    hole_index: HoleIndex,
    transaction: Option<OpenTransaction>,
    committed_transactions: Vec<String>,
    next_instance: i64,
}

impl ModelDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            next_instance: 1,
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Instance ids are allocated above every id the model already uses
    fn reserve_id(&mut self, id: i64) {
        self.next_instance = self.next_instance.max(id.saturating_add(1));
    }

    pub fn add_level(&mut self, level: Level) -> Result<()> {
        if self.levels.contains_key(&level.id) {
            return Err(Error::DuplicateElement(level.id.0));
        }
        self.reserve_id(level.id.0);
        self.levels.insert(level.id, level);
        Ok(())
    }

    pub fn add_wall(
        &mut self,
        id: ElementId,
        level: Option<LevelId>,
        solid: BarrierSolid,
    ) -> Result<()> {
        if let Some(level) = level {
            if !self.levels.contains_key(&level) {
                return Err(Error::UnknownLevel {
                    element: id.0,
                    level: level.0,
                });
            }
        }
        self.push_barrier(
            Barrier::Wall { id, level },
            BarrierReference::host(id),
            solid,
        )
    }

    pub fn add_floor(&mut self, id: ElementId, solid: BarrierSolid) -> Result<()> {
        self.push_barrier(Barrier::Floor { id }, BarrierReference::host(id), solid)
    }

    /// Barrier living in a linked model, seen through `link_instance`.
    ///
    /// Rays hit it, but it never resolves to a host barrier.
    pub fn add_linked_barrier(
        &mut self,
        link_instance: ElementId,
        barrier: Barrier,
        solid: BarrierSolid,
    ) -> Result<()> {
        let reference = BarrierReference::linked(link_instance, barrier.id());
        self.push_barrier(barrier, reference, solid)
    }

    fn push_barrier(
        &mut self,
        barrier: Barrier,
        reference: BarrierReference,
        solid: BarrierSolid,
    ) -> Result<()> {
        if !self.barrier_keys.insert(reference.key()) {
            return Err(Error::DuplicateElement(barrier.id().0));
        }
        if !reference.is_linked() {
            self.host_barriers.insert(barrier.id(), self.barriers.len());
        }
        self.reserve_id(reference.element.0);
        self.reserve_id(barrier.id().0);
        self.barriers.push(BarrierEntry {
            barrier,
            reference,
            solid,
        });
        Ok(())
    }

    pub fn add_view(&mut self, view: ViewContext) {
        self.reserve_id(view.id.0);
        self.views.push(view);
    }

    pub fn add_symbol(&mut self, symbol: FamilySymbol) -> Result<()> {
        if self.symbols.iter().any(|s| s.id == symbol.id) {
            return Err(Error::DuplicateElement(symbol.id.0));
        }
        self.reserve_id(symbol.id.0);
        self.symbols.push(symbol);
        Ok(())
    }

    /// Register a hole that already exists in the model.
    ///
    /// The category and level follow from the host barrier.
    pub fn add_hole(
        &mut self,
        id: HoleInstanceId,
        symbol: SymbolId,
        host: ElementId,
        location: Point3<f64>,
        size: HoleParameters,
    ) -> Result<()> {
        if self.hole_index.host_of(id).is_some() {
            return Err(Error::DuplicateElement(id.0));
        }
        if self.stored_symbol(symbol).is_none() {
            return Err(Error::Snapshot(format!("hole {} uses unknown symbol {}", id, symbol)));
        }
        let barrier = self
            .host_barriers
            .get(&host)
            .map(|&index| self.barriers[index].barrier);
        let (category, level) = match barrier {
            Some(Barrier::Wall { level, .. }) => (HoleCategory::WallHole, level),
            Some(Barrier::Floor { .. }) => (HoleCategory::FloorHole, None),
            None => {
                return Err(Error::Snapshot(format!(
                    "hole {} is hosted on unknown barrier {}",
                    id, host
                )))
            }
        };

        self.reserve_id(id.0);
        self.hole_index.insert(host, id, category);
        self.holes.push(HoleInstance {
            id,
            symbol,
            category,
            host,
            level,
            location,
            structural: StructuralKind::NonStructural,
            run: ElementId::INVALID,
            size,
            values: Vec::new(),
        });
        Ok(())
    }

    pub fn add_companion(&mut self, companion: CompanionDocument) {
        for service in &companion.services {
            self.reserve_id(service.id.0);
        }
        self.companions.push(companion);
    }

    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(&id)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn barriers(&self) -> &[BarrierEntry] {
        &self.barriers
    }

    pub fn views(&self) -> &[ViewContext] {
        &self.views
    }

    pub fn symbols(&self) -> &[FamilySymbol] {
        &self.symbols
    }

    pub fn companions(&self) -> &[CompanionDocument] {
        &self.companions
    }

    /// Committed hole instances in creation order
    pub fn holes(&self) -> &[HoleInstance] {
        &self.holes
    }

    pub fn hole_index(&self) -> &HoleIndex {
        &self.hole_index
    }

    /// Names of committed transactions, oldest first
    pub fn committed_transactions(&self) -> &[String] {
        &self.committed_transactions
    }

    /// Name of the open transaction, if any
    pub fn open_transaction(&self) -> Option<&str> {
        self.transaction.as_ref().map(|t| t.name.as_str())
    }

    fn stored_symbol(&self, id: SymbolId) -> Option<&FamilySymbol> {
        self.symbols.iter().find(|s| s.id == id)
    }
}

impl BarrierCatalog for ModelDocument {
    fn service_elements(
        &self,
        kind: ServiceKind,
        source_marker: &str,
    ) -> std::result::Result<Vec<ServiceElement>, PreconditionError> {
        let companion = self
            .companions
            .iter()
            .find(|doc| doc.title.contains(source_marker))
            .ok_or_else(|| PreconditionError::MissingCompanionDocument {
                kind,
                marker: source_marker.to_string(),
            })?;

        Ok(companion
            .services
            .iter()
            .filter(|service| service.kind == kind)
            .cloned()
            .collect())
    }

    fn view_3d(&self) -> Option<ViewContext> {
        self.views.iter().find(|view| !view.is_template).cloned()
    }

    fn intersector<'a>(
        &'a self,
        kind: BarrierKind,
        view: &ViewContext,
    ) -> Box<dyn RayIntersector + 'a> {
        let targets = self
            .barriers
            .iter()
            .filter(|entry| entry.barrier.kind() == kind)
            .map(|entry| BarrierTarget::new(entry.reference, &entry.solid));
        Box::new(ReferenceIntersector::scoped(targets, view))
    }

    fn resolve_barrier(&self, reference: &BarrierReference) -> Option<Barrier> {
        if reference.is_linked() {
            return None;
        }
        self.host_barriers
            .get(&reference.element)
            .map(|&index| self.barriers[index].barrier)
    }
}

impl HoleFactory for ModelDocument {
    fn hole_symbol(
        &self,
        spec: &HoleFamilySpec<'_>,
    ) -> std::result::Result<HoleSymbol, PreconditionError> {
        let stored = self
            .symbols
            .iter()
            .find(|s| s.family_name == spec.family)
            .ok_or_else(|| PreconditionError::MissingHoleFamily {
                category: spec.category,
                family: spec.family.to_string(),
            })?;

        let slot = |name: &str| {
            stored
                .parameters
                .iter()
                .position(|p| p == name)
                .map(ParameterSlot)
                .ok_or_else(|| PreconditionError::MissingFamilyParameter {
                    family: stored.family_name.clone(),
                    parameter: name.to_string(),
                })
        };
        let schema = HoleParameterSchema {
            width: slot(spec.width_parameter)?,
            height: slot(spec.height_parameter)?,
        };

        Ok(HoleSymbol {
            id: stored.id,
            family_name: stored.family_name.clone(),
            category: spec.category,
            active: stored.active,
            schema,
        })
    }

    fn activate_symbol(
        &mut self,
        symbol: &mut HoleSymbol,
    ) -> std::result::Result<(), PreconditionError> {
        let stored = self
            .symbols
            .iter_mut()
            .find(|s| s.id == symbol.id)
            .ok_or_else(|| PreconditionError::SymbolActivation {
                family: symbol.family_name.clone(),
                reason: "symbol is not loaded".to_string(),
            })?;
        if !stored.activatable {
            return Err(PreconditionError::SymbolActivation {
                family: symbol.family_name.clone(),
                reason: "symbol cannot be activated".to_string(),
            });
        }

        stored.active = true;
        symbol.active = true;
        tracing::debug!(family = %symbol.family_name, symbol = %symbol.id, "activated symbol");
        Ok(())
    }

    fn deactivate_symbol(&mut self, symbol: &mut HoleSymbol) {
        if let Some(stored) = self.symbols.iter_mut().find(|s| s.id == symbol.id) {
            stored.active = false;
        }
        symbol.active = false;
        tracing::debug!(family = %symbol.family_name, symbol = %symbol.id, "deactivated symbol");
    }

    fn create_hole(
        &mut self,
        placement: &HolePlacement,
        symbol: &HoleSymbol,
        structural: StructuralKind,
    ) -> std::result::Result<HoleInstanceId, PlacementError> {
        if self.transaction.is_none() {
            return Err(PlacementError::NoTransaction);
        }

        let stored = self
            .stored_symbol(symbol.id)
            .ok_or_else(|| PlacementError::Factory(format!("symbol {} is not loaded", symbol.id)))?;
        if !stored.active {
            return Err(PlacementError::SymbolInactive(stored.family_name.clone()));
        }
        if placement.category != symbol.category {
            return Err(PlacementError::Factory(format!(
                "{} placement cannot use a {} symbol",
                placement.category, symbol.category
            )));
        }

        let expected = symbol.category.host_kind();
        let barrier = self
            .host_barriers
            .get(&placement.host)
            .map(|&index| self.barriers[index].barrier)
            .ok_or(PlacementError::HostNotFound(placement.host))?;
        if barrier.kind() != expected {
            return Err(PlacementError::HostMismatch {
                host: placement.host,
                expected,
            });
        }
        if expected == BarrierKind::Wall && placement.host_level.is_none() {
            return Err(GeometryResolutionError::MissingHostLevel {
                wall: placement.host,
            }
            .into());
        }

        let HoleParameters { width, height } = placement.parameters;
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(PlacementError::InvalidSize { width, height });
        }

        let mut values = vec![0.0; stored.parameters.len()];
        for (slot, value) in [(symbol.schema.width, width), (symbol.schema.height, height)] {
            let cell = values.get_mut(slot.0).ok_or_else(|| {
                PlacementError::Factory(format!(
                    "parameter slot {} out of range for \"{}\"",
                    slot.0, stored.family_name
                ))
            })?;
            *cell = value;
        }

        if self.next_instance == i64::MAX {
            return Err(PlacementError::Factory("instance ids exhausted".to_string()));
        }
        let id = HoleInstanceId(self.next_instance);
        self.next_instance += 1;
        let instance = HoleInstance {
            id,
            symbol: symbol.id,
            category: symbol.category,
            host: placement.host,
            level: placement.host_level,
            location: placement.anchor,
            structural,
            run: placement.run,
            size: placement.parameters,
            values,
        };

        if let Some(transaction) = self.transaction.as_mut() {
            transaction.created.push(instance);
        }
        Ok(id)
    }
}

impl ModelSession for ModelDocument {
    fn start_transaction(&mut self, name: &str) -> std::result::Result<(), TransactionError> {
        if let Some(open) = &self.transaction {
            return Err(TransactionError::AlreadyOpen(open.name.clone()));
        }
        self.transaction = Some(OpenTransaction {
            name: name.to_string(),
            created: Vec::new(),
        });
        Ok(())
    }

    fn commit_transaction(&mut self) -> std::result::Result<usize, TransactionError> {
        let transaction = self.transaction.take().ok_or(TransactionError::NotOpen)?;
        let count = transaction.created.len();
        for hole in transaction.created {
            self.hole_index.insert(hole.host, hole.id, hole.category);
            self.holes.push(hole);
        }
        tracing::debug!(transaction = %transaction.name, count, "committed");
        self.committed_transactions.push(transaction.name);
        Ok(count)
    }

    fn rollback_transaction(&mut self) -> std::result::Result<(), TransactionError> {
        let transaction = self.transaction.take().ok_or(TransactionError::NotOpen)?;
        tracing::debug!(
            transaction = %transaction.name,
            discarded = transaction.created.len(),
            "rolled back"
        );
        Ok(())
    }
}
