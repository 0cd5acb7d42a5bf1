// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hole Placement Planner
//!
//! Drives a [`ModelSession`] through two ordered phases:
//!
//! 1. **Wall phase**: every duct and pipe run is cast against walls; each
//!    surviving crossing becomes a wall hole hosted on the wall and its
//!    level.
//! 2. **Floor phase**: pipe runs only are cast against floors; each
//!    surviving crossing becomes a floor hole.
//!
//! Each phase is applied as one transaction. The floor phase can only be
//! planned from a [`WallPhaseCommitted`] token, which only
//! [`HolePlanner::apply_wall_phase`] hands out, so floor queries always run
//! against the model with the wall holes committed.

mod report;


pub use report::{CreatedHole, PhaseOutcome, PlacementReport, ReportSummary, SkippedItem};

use crate::barrier::{Barrier, RawIntersection};
use crate::config::{FailurePolicy, PlannerConfig};
use crate::dedup::dedupe;
use crate::error::{GeometryResolutionError, PlannerError, PreconditionError, Result};
use crate::hole::{HoleCategory, HoleParameters, HolePlacement, HoleSymbol, StructuralKind};
use crate::host::{BarrierCatalog, ModelSession, RayIntersector};
use crate::ids::BarrierReference;
use crate::service::{ServiceElement, ServiceKind, ServiceRun};
use crate::view::ViewContext;
use std::marker::PhantomData;

/// Transaction name of the wall phase
pub const WALL_TRANSACTION: &str = "Create wall holes";
/// Transaction name of the floor phase
pub const FLOOR_TRANSACTION: &str = "Create floor holes";

/// Casts `run` through `intersector` and returns the crossings that get a
/// hole: sorted by ascending proximity, restricted to the run's length and
/// collapsed to one per barrier.
pub fn find_crossings(
    run: &ServiceRun,
    intersector: &dyn RayIntersector,
    tolerance: f64,
) -> Vec<RawIntersection> {
    let mut raw: Vec<RawIntersection> = intersector
        .find(&run.origin(), &run.direction())
        .into_iter()
        .filter(|hit| hit.proximity.is_finite())
        .map(|hit| RawIntersection {
            run: run.id,
            reference: hit.reference,
            proximity: hit.proximity,
        })
        .collect();

    // Stable: equal proximities keep the engine's order
    raw.sort_by(|a, b| a.proximity.total_cmp(&b.proximity));

    let length = run.length();
    raw.retain(|r| r.proximity >= -tolerance && r.proximity <= length + tolerance);

    dedupe(raw)
}

/// Resolves the host of `crossing` and builds the placement for it.
///
/// The reference must resolve to a barrier matching `category`; wall hosts
/// must have a level.
pub fn resolve_placement<C: BarrierCatalog + ?Sized>(
    catalog: &C,
    run: &ServiceRun,
    crossing: &RawIntersection,
    category: HoleCategory,
) -> std::result::Result<HolePlacement, GeometryResolutionError> {
    let key = crossing.key();
    let barrier = catalog
        .resolve_barrier(&crossing.reference)
        .ok_or(GeometryResolutionError::UnresolvedBarrier { key })?;

    let host_level = match (category, barrier) {
        (HoleCategory::WallHole, Barrier::Wall { id, level }) => {
            Some(level.ok_or(GeometryResolutionError::MissingHostLevel { wall: id })?)
        }
        (HoleCategory::FloorHole, Barrier::Floor { .. }) => None,
        (_, other) => {
            return Err(GeometryResolutionError::UnexpectedBarrierKind {
                key,
                expected: category.host_kind(),
                found: other.kind(),
            })
        }
    };

    let proximity = crossing.proximity.clamp(0.0, run.length());
    Ok(HolePlacement {
        run: run.id,
        anchor: run.line.point_at(proximity),
        proximity,
        parameters: HoleParameters::square(run.diameter),
        host: barrier.id(),
        host_level,
        category,
    })
}

/// Everything gathered before the first transaction
#[derive(Debug, Clone)]
pub struct Preflight {
    pub view: ViewContext,
    pub wall_symbol: HoleSymbol,
    pub floor_symbol: HoleSymbol,
    pub ducts: Vec<ServiceRun>,
    pub pipes: Vec<ServiceRun>,
    /// Runs whose path could not be resolved to a straight line
    pub rejected: Vec<SkippedItem>,
}

/// Marker for the wall phase
#[derive(Debug)]
pub enum WallPhase {}

/// Marker for the floor phase
#[derive(Debug)]
pub enum FloorPhase {}

/// Placements planned for one phase, not yet applied
#[derive(Debug)]
pub struct PhasePlan<P> {
    runs_considered: usize,
    placements: Vec<HolePlacement>,
    skipped: Vec<SkippedItem>,
    _phase: PhantomData<P>,
}

pub type WallPhasePlan = PhasePlan<WallPhase>;
pub type FloorPhasePlan = PhasePlan<FloorPhase>;

impl<P> PhasePlan<P> {
    fn new() -> Self {
        Self {
            runs_considered: 0,
            placements: Vec::new(),
            skipped: Vec::new(),
            _phase: PhantomData,
        }
    }

    pub fn placements(&self) -> &[HolePlacement] {
        &self.placements
    }

    pub fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    pub fn runs_considered(&self) -> usize {
        self.runs_considered
    }
}

/// Proof that the wall phase has been committed
#[derive(Debug)]
pub struct WallPhaseCommitted {
    outcome: PhaseOutcome,
}

impl WallPhaseCommitted {
    pub fn outcome(&self) -> &PhaseOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> PhaseOutcome {
        self.outcome
    }
}

/// Two-phase hole placement planner
#[derive(Debug, Clone, Default)]
pub struct HolePlanner {
    config: PlannerConfig,
}

impl HolePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Runs preflight, the wall phase and the floor phase in order.
    pub fn run<S: ModelSession + ?Sized>(&self, session: &mut S) -> Result<PlacementReport> {
        let preflight = self.preflight(session)?;

        let wall_plan = self.plan_wall_phase(&*session, &preflight);
        let committed = match self.apply_wall_phase(session, wall_plan, &preflight) {
            Ok(committed) => committed,
            Err(error) => {
                let partial = PlacementReport::empty(preflight.rejected);
                return Err(error.with_partial(partial));
            }
        };

        let floor_plan = self.plan_floor_phase(&committed, &*session, &preflight);
        let floors = match self.apply_floor_phase(session, floor_plan, &preflight) {
            Ok(floors) => floors,
            Err(error) => {
                let mut partial = PlacementReport::empty(preflight.rejected);
                partial.walls = committed.into_outcome();
                return Err(error.with_partial(partial));
            }
        };

        let report = PlacementReport {
            rejected_runs: preflight.rejected,
            walls: committed.into_outcome(),
            floors,
        };

        let summary = report.summary();
        tracing::info!(
            wall_holes = summary.wall_holes,
            floor_holes = summary.floor_holes,
            skipped = summary.skipped,
            "Hole placement finished"
        );
        Ok(report)
    }

    /// Checks every precondition and snapshots the service runs.
    ///
    /// Nothing is mutated except symbol activation, which is undone when a
    /// later activation fails. Fails on the first missing prerequisite, in
    /// this order: mechanical document, plumbing document, wall family,
    /// floor family, 3D view, symbol activation.
    pub fn preflight<S: ModelSession + ?Sized>(
        &self,
        session: &mut S,
    ) -> std::result::Result<Preflight, PreconditionError> {
        let ducts = session.service_elements(
            ServiceKind::Duct,
            self.config.source_marker(ServiceKind::Duct),
        )?;
        let pipes = session.service_elements(
            ServiceKind::Pipe,
            self.config.source_marker(ServiceKind::Pipe),
        )?;

        let mut wall_symbol =
            session.hole_symbol(&self.config.family_spec(HoleCategory::WallHole))?;
        let mut floor_symbol =
            session.hole_symbol(&self.config.family_spec(HoleCategory::FloorHole))?;

        let view = session.view_3d().ok_or(PreconditionError::Missing3dView)?;

        let mut activated: Vec<&mut HoleSymbol> = Vec::new();
        for symbol in [&mut wall_symbol, &mut floor_symbol] {
            if symbol.active {
                continue;
            }
            if let Err(error) = session.activate_symbol(symbol) {
                for earlier in activated.into_iter().rev() {
                    session.deactivate_symbol(earlier);
                }
                return Err(error);
            }
            activated.push(symbol);
        }

        let mut rejected = Vec::new();
        let mut resolve = |elements: Vec<ServiceElement>| -> Vec<ServiceRun> {
            elements
                .iter()
                .filter_map(|element| match ServiceRun::from_element(element) {
                    Ok(run) => Some(run),
                    Err(error) => {
                        tracing::warn!(run = %element.id, %error, "Service run excluded");
                        rejected.push(SkippedItem {
                            run: element.id,
                            barrier: None,
                            error: error.into(),
                        });
                        None
                    }
                })
                .collect()
        };
        let ducts = resolve(ducts);
        let pipes = resolve(pipes);

        tracing::info!(
            view = %view.name,
            ducts = ducts.len(),
            pipes = pipes.len(),
            rejected = rejected.len(),
            "Preflight complete"
        );

        Ok(Preflight {
            view,
            wall_symbol,
            floor_symbol,
            ducts,
            pipes,
            rejected,
        })
    }

    /// Plans wall holes for every duct and pipe run.
    pub fn plan_wall_phase<C: BarrierCatalog + ?Sized>(
        &self,
        catalog: &C,
        preflight: &Preflight,
    ) -> WallPhasePlan {
        self.plan_phase(
            catalog,
            HoleCategory::WallHole,
            preflight.ducts.iter().chain(preflight.pipes.iter()),
            &preflight.view,
        )
    }

    /// Applies the wall plan as one transaction.
    pub fn apply_wall_phase<S: ModelSession + ?Sized>(
        &self,
        session: &mut S,
        plan: WallPhasePlan,
        preflight: &Preflight,
    ) -> Result<WallPhaseCommitted> {
        let outcome = self.apply_phase(session, WALL_TRANSACTION, plan, &preflight.wall_symbol)?;
        Ok(WallPhaseCommitted { outcome })
    }

    /// Plans floor holes for pipe runs. Duct runs never get floor holes.
    pub fn plan_floor_phase<C: BarrierCatalog + ?Sized>(
        &self,
        _committed: &WallPhaseCommitted,
        catalog: &C,
        preflight: &Preflight,
    ) -> FloorPhasePlan {
        self.plan_phase(
            catalog,
            HoleCategory::FloorHole,
            preflight.pipes.iter(),
            &preflight.view,
        )
    }

    /// Applies the floor plan as one transaction.
    pub fn apply_floor_phase<S: ModelSession + ?Sized>(
        &self,
        session: &mut S,
        plan: FloorPhasePlan,
        preflight: &Preflight,
    ) -> Result<PhaseOutcome> {
        self.apply_phase(session, FLOOR_TRANSACTION, plan, &preflight.floor_symbol)
    }

    fn plan_phase<'r, C, P>(
        &self,
        catalog: &C,
        category: HoleCategory,
        runs: impl IntoIterator<Item = &'r ServiceRun>,
        view: &ViewContext,
    ) -> PhasePlan<P>
    where
        C: BarrierCatalog + ?Sized,
    {
        let _span = tracing::info_span!("plan_phase", phase = %category).entered();
        let intersector = catalog.intersector(category.host_kind(), view);
        let mut plan = PhasePlan::new();

        for run in runs {
            plan.runs_considered += 1;
            let crossings =
                find_crossings(run, intersector.as_ref(), self.config.proximity_tolerance);

            for crossing in &crossings {
                match resolve_placement(catalog, run, crossing, category) {
                    Ok(placement) => plan.placements.push(placement),
                    Err(error) => {
                        tracing::warn!(
                            run = %run.id,
                            barrier = %crossing.key(),
                            %error,
                            "Crossing skipped"
                        );
                        plan.skipped.push(SkippedItem {
                            run: run.id,
                            barrier: Some(crossing.key()),
                            error: error.into(),
                        });
                    }
                }
            }
        }

        tracing::debug!(
            runs = plan.runs_considered,
            placements = plan.placements.len(),
            skipped = plan.skipped.len(),
            "Phase planned"
        );
        plan
    }

    fn apply_phase<S, P>(
        &self,
        session: &mut S,
        transaction: &str,
        plan: PhasePlan<P>,
        symbol: &HoleSymbol,
    ) -> Result<PhaseOutcome>
    where
        S: ModelSession + ?Sized,
    {
        let category = symbol.category;
        let mut outcome = PhaseOutcome::new(category);
        outcome.runs_considered = plan.runs_considered;
        outcome.skipped = plan.skipped;

        session.start_transaction(transaction)?;

        for placement in plan.placements {
            match session.create_hole(&placement, symbol, StructuralKind::NonStructural) {
                Ok(instance) => {
                    tracing::debug!(
                        %instance,
                        host = %placement.host,
                        x = placement.anchor.x,
                        y = placement.anchor.y,
                        z = placement.anchor.z,
                        size = placement.parameters.width,
                        "Hole created"
                    );
                    outcome.created.push(CreatedHole { instance, placement });
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::SkipAndContinue => {
                        tracing::warn!(
                            run = %placement.run,
                            host = %placement.host,
                            %error,
                            "Hole not created"
                        );
                        outcome.skipped.push(SkippedItem {
                            run: placement.run,
                            barrier: Some(BarrierReference::host(placement.host).key()),
                            error,
                        });
                    }
                    FailurePolicy::AbortPhase => {
                        tracing::error!(
                            run = %placement.run,
                            host = %placement.host,
                            %error,
                            "Phase aborted"
                        );
                        session.rollback_transaction()?;
                        return Err(PlannerError::PhaseAborted {
                            phase: category,
                            run: placement.run,
                            source: error,
                            partial: Box::new(PlacementReport::empty(Vec::new())),
                        });
                    }
                },
            }
        }

        let committed = session.commit_transaction()?;
        tracing::info!(
            phase = %category,
            committed,
            skipped = outcome.skipped.len(),
            "Phase committed"
        );
        Ok(outcome)
    }
}
