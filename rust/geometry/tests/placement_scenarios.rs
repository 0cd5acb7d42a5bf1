// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end placement runs against the in-memory model.

use approx::assert_relative_eq;
use holeplan_core::{
    BarrierCatalog, BarrierKind, BarrierReference, ElementId, FailurePolicy,
    GeometryResolutionError, HoleCategory, HoleFactory, HoleFamilySpec, HoleInstanceId,
    HolePlacement, HolePlanner, HoleSymbol, ModelSession, PlacementError, PlannerConfig,
    PlannerError, PreconditionError, RayIntersector, ServiceElement, ServiceKind, StructuralKind,
    TransactionError, ViewContext, FLOOR_TRANSACTION, WALL_TRANSACTION,
};
use holeplan_geometry::{ModelDocument, ModelSnapshot, Point3};
use serde_json::{json, Value};

fn wall(id: i64, y: f64) -> Value {
    // Baseline offset so the near face sits exactly at `y`
    json!({
        "id": id, "level": 1,
        "start": [-20.0, y + 0.1], "end": [20.0, y + 0.1],
        "thickness": 0.2, "base": -1.0, "height": 4.0
    })
}

fn line(id: i64, diameter: f64, start: [f64; 3], end: [f64; 3]) -> Value {
    json!({ "id": id, "diameter": diameter, "path": { "type": "line", "start": start, "end": end } })
}

fn snapshot(walls: Vec<Value>, floors: Vec<Value>, ducts: Vec<Value>, pipes: Vec<Value>) -> Value {
    json!({
        "title": "Tower_AR",
        "levels": [{ "id": 1, "name": "Level 1", "elevation": 0.0 }],
        "walls": walls,
        "floors": floors,
        "views": [{ "id": 2, "name": "{3D}" }],
        "symbols": [
            { "id": 3, "family": "Отверстие", "parameters": ["Ширина", "Высота"] },
            { "id": 4, "family": "Отверстие в полу", "parameters": ["Высота", "Ширина"] }
        ],
        "companions": [
            { "title": "Tower_ОВ", "ducts": ducts },
            { "title": "Tower_ВК", "pipes": pipes }
        ]
    })
}

fn load(value: Value) -> ModelDocument {
    let snapshot: ModelSnapshot = serde_json::from_value(value).unwrap();
    ModelDocument::from_snapshot(&snapshot).unwrap()
}

fn slab(id: i64) -> Value {
    json!({
        "id": id,
        "boundary": [[-20.0, -20.0], [20.0, -20.0], [20.0, 20.0], [-20.0, 20.0]],
        "top": 3.0, "thickness": 0.3
    })
}

#[test]
fn test_pipe_through_single_wall() {
    let mut doc = load(snapshot(
        vec![wall(10, 5.0)],
        vec![],
        vec![],
        vec![line(100, 0.2, [0.0, 0.0, 0.0], [0.0, 10.0, 0.0])],
    ));

    let report = HolePlanner::default().run(&mut doc).unwrap();

    assert_eq!(report.walls.created.len(), 1);
    assert!(report.floors.created.is_empty());
    let hole = &doc.holes()[0];
    assert_eq!(hole.category, HoleCategory::WallHole);
    assert_eq!(hole.host, ElementId(10));
    assert_relative_eq!(hole.location.y, 5.0, epsilon = 1e-9);
    assert_relative_eq!(hole.location.x, 0.0);
    assert_relative_eq!(hole.location.z, 0.0);
    assert_relative_eq!(hole.parameters().width, 0.2);
    assert_relative_eq!(hole.parameters().height, 0.2);
    assert_eq!(hole.structural, StructuralKind::NonStructural);
}

#[test]
fn test_duct_through_two_walls_in_ascending_order() {
    let mut doc = load(snapshot(
        vec![wall(20, 7.0), wall(10, 3.0)],
        vec![],
        vec![line(100, 0.3, [0.0, 0.0, 1.0], [0.0, 10.0, 1.0])],
        vec![],
    ));

    let report = HolePlanner::default().run(&mut doc).unwrap();

    let hosts: Vec<ElementId> = report.walls.placements().map(|p| p.host).collect();
    assert_eq!(hosts, vec![ElementId(10), ElementId(20)]);
    let anchors: Vec<f64> = doc.holes().iter().map(|h| h.location.y).collect();
    assert_relative_eq!(anchors[0], 3.0, epsilon = 1e-9);
    assert_relative_eq!(anchors[1], 7.0, epsilon = 1e-9);
}

#[test]
fn test_crossing_beyond_run_end_is_ignored() {
    let mut doc = load(snapshot(
        vec![wall(10, 6.0)],
        vec![],
        vec![],
        vec![line(100, 0.1, [0.0, 0.0, 1.0], [0.0, 4.0, 1.0])],
    ));

    let report = HolePlanner::default().run(&mut doc).unwrap();

    assert_eq!(report.holes_created(), 0);
    assert!(doc.holes().is_empty());
}

#[test]
fn test_entry_and_exit_faces_collapse_to_nearest() {
    let mut doc = load(snapshot(
        vec![wall(42, 5.0)],
        vec![],
        vec![],
        vec![line(100, 0.2, [0.0, 0.0, 1.0], [0.0, 10.0, 1.0])],
    ));

    let view = doc.view_3d().unwrap();
    let hits = doc
        .intersector(BarrierKind::Wall, &view)
        .find(&Point3::new(0.0, 0.0, 1.0), &holeplan_geometry::Vector3::y());
    assert_eq!(hits.len(), 2);
    assert_relative_eq!(hits[0].proximity, 5.0, epsilon = 1e-9);
    assert_relative_eq!(hits[1].proximity, 5.2, epsilon = 1e-9);

    let report = HolePlanner::default().run(&mut doc).unwrap();
    assert_eq!(report.walls.created.len(), 1);
    assert_relative_eq!(report.walls.created[0].placement.proximity, 5.0, epsilon = 1e-9);
    assert_eq!(doc.hole_index().holes_in(ElementId(42)).len(), 1);
}

#[test]
fn test_curved_run_is_reported_and_others_continue() {
    let arc = json!({
        "id": 101, "diameter": 0.2,
        "path": { "type": "arc", "start": [0.0, 0.0, 1.0], "mid": [1.0, 5.0, 1.0], "end": [0.0, 10.0, 1.0] }
    });
    let mut doc = load(snapshot(
        vec![wall(10, 5.0)],
        vec![],
        vec![arc],
        vec![line(100, 0.2, [2.0, 0.0, 1.0], [2.0, 10.0, 1.0])],
    ));

    let report = HolePlanner::default().run(&mut doc).unwrap();

    assert_eq!(report.rejected_runs.len(), 1);
    assert_eq!(report.rejected_runs[0].run, ElementId(101));
    assert!(matches!(
        report.rejected_runs[0].error,
        PlacementError::Resolution(GeometryResolutionError::UnsupportedGeometry { .. })
    ));
    assert_eq!(report.walls.created.len(), 1);
    assert_eq!(report.walls.created[0].placement.run, ElementId(100));
}

#[test]
fn test_vertical_pipe_gets_floor_hole_and_duct_does_not() {
    let mut doc = load(snapshot(
        vec![],
        vec![slab(30)],
        vec![line(100, 0.4, [1.0, 1.0, 0.0], [1.0, 1.0, 5.0])],
        vec![line(101, 0.05, [2.0, 2.0, 0.0], [2.0, 2.0, 5.0])],
    ));

    let report = HolePlanner::default().run(&mut doc).unwrap();

    assert!(report.walls.created.is_empty());
    assert_eq!(report.floors.created.len(), 1);
    let placement = &report.floors.created[0].placement;
    assert_eq!(placement.run, ElementId(101));
    assert_eq!(placement.host, ElementId(30));
    assert_eq!(placement.host_level, None);
    assert_relative_eq!(placement.anchor.z, 2.7, epsilon = 1e-9);

    // Width and height land in swapped slots of the floor family
    let hole = &doc.holes()[0];
    assert_eq!(hole.category, HoleCategory::FloorHole);
    assert_relative_eq!(hole.parameters().width, 0.05);
    assert_eq!(doc.hole_index().holes_in(ElementId(30)), &[hole.id]);
}

#[test]
fn test_wall_phase_commits_before_floor_phase() {
    let mut doc = load(snapshot(
        vec![wall(10, 5.0)],
        vec![slab(30)],
        vec![],
        vec![
            line(100, 0.1, [0.0, 0.0, 1.0], [0.0, 10.0, 1.0]),
            line(101, 0.1, [1.0, 1.0, 0.0], [1.0, 1.0, 5.0]),
        ],
    ));

    let report = HolePlanner::default().run(&mut doc).unwrap();

    assert_eq!(
        doc.committed_transactions(),
        &[WALL_TRANSACTION.to_string(), FLOOR_TRANSACTION.to_string()]
    );
    assert_eq!(report.summary().wall_holes, 1);
    assert_eq!(report.summary().floor_holes, 1);
    let wall_hole = doc.holes()[0].id;
    let floor_hole = doc.holes()[1].id;
    assert!(wall_hole < floor_hole);
}

#[test]
fn test_missing_plumbing_document_mutates_nothing() {
    let mut value = snapshot(
        vec![wall(10, 5.0)],
        vec![],
        vec![line(100, 0.2, [0.0, 0.0, 1.0], [0.0, 10.0, 1.0])],
        vec![],
    );
    value["companions"] = json!([{ "title": "Tower_ОВ" }]);
    let mut doc = load(value);

    let error = HolePlanner::default().run(&mut doc).unwrap_err();

    assert!(error.is_precondition());
    assert!(matches!(
        error,
        PlannerError::Precondition(PreconditionError::MissingCompanionDocument {
            kind: ServiceKind::Pipe,
            ..
        })
    ));
    assert!(doc.committed_transactions().is_empty());
    assert!(doc.symbols().iter().all(|s| !s.active));
}

#[test]
fn test_unactivatable_floor_symbol_leaves_wall_symbol_inactive() {
    let mut value = snapshot(
        vec![wall(10, 5.0)],
        vec![],
        vec![],
        vec![line(100, 0.2, [0.0, 0.0, 1.0], [0.0, 10.0, 1.0])],
    );
    value["symbols"][1]["activatable"] = json!(false);
    let mut doc = load(value);

    let error = HolePlanner::default().run(&mut doc).unwrap_err();

    assert!(matches!(
        error,
        PlannerError::Precondition(PreconditionError::SymbolActivation { .. })
    ));
    assert!(doc.symbols().iter().all(|s| !s.active));
    assert!(doc.committed_transactions().is_empty());
    assert!(doc.holes().is_empty());
}

#[test]
fn test_hidden_and_linked_walls() {
    let mut value = snapshot(
        vec![wall(10, 3.0), wall(20, 5.0)],
        vec![],
        vec![],
        vec![line(100, 0.2, [0.0, 0.0, 1.0], [0.0, 10.0, 1.0])],
    );
    value["walls"][1]["link"] = json!(500);
    value["views"][0]["hidden"] = json!([10]);
    let mut doc = load(value);

    let report = HolePlanner::default().run(&mut doc).unwrap();

    assert!(report.walls.created.is_empty());
    assert_eq!(report.walls.skipped.len(), 1);
    let skipped = &report.walls.skipped[0];
    assert_eq!(
        skipped.barrier,
        Some(BarrierReference::linked(ElementId(500), ElementId(20)).key())
    );
    assert!(matches!(
        skipped.error,
        PlacementError::Resolution(GeometryResolutionError::UnresolvedBarrier { .. })
    ));
}

/// Delegates to a document but refuses holes in one host
struct RefusingSession {
    inner: ModelDocument,
    refused: ElementId,
}

impl BarrierCatalog for RefusingSession {
    fn service_elements(
        &self,
        kind: ServiceKind,
        source_marker: &str,
    ) -> Result<Vec<ServiceElement>, PreconditionError> {
        self.inner.service_elements(kind, source_marker)
    }

    fn view_3d(&self) -> Option<ViewContext> {
        self.inner.view_3d()
    }

    fn intersector<'a>(
        &'a self,
        kind: BarrierKind,
        view: &ViewContext,
    ) -> Box<dyn RayIntersector + 'a> {
        self.inner.intersector(kind, view)
    }

    fn resolve_barrier(&self, reference: &BarrierReference) -> Option<holeplan_core::Barrier> {
        self.inner.resolve_barrier(reference)
    }
}

impl HoleFactory for RefusingSession {
    fn hole_symbol(&self, spec: &HoleFamilySpec<'_>) -> Result<HoleSymbol, PreconditionError> {
        self.inner.hole_symbol(spec)
    }

    fn activate_symbol(&mut self, symbol: &mut HoleSymbol) -> Result<(), PreconditionError> {
        self.inner.activate_symbol(symbol)
    }

    fn deactivate_symbol(&mut self, symbol: &mut HoleSymbol) {
        self.inner.deactivate_symbol(symbol)
    }

    fn create_hole(
        &mut self,
        placement: &HolePlacement,
        symbol: &HoleSymbol,
        structural: StructuralKind,
    ) -> Result<HoleInstanceId, PlacementError> {
        if placement.host == self.refused {
            return Err(PlacementError::Factory("host is locked".to_string()));
        }
        self.inner.create_hole(placement, symbol, structural)
    }
}

impl ModelSession for RefusingSession {
    fn start_transaction(&mut self, name: &str) -> Result<(), TransactionError> {
        self.inner.start_transaction(name)
    }

    fn commit_transaction(&mut self) -> Result<usize, TransactionError> {
        self.inner.commit_transaction()
    }

    fn rollback_transaction(&mut self) -> Result<(), TransactionError> {
        self.inner.rollback_transaction()
    }
}

fn refusing_session() -> RefusingSession {
    let inner = load(snapshot(
        vec![wall(10, 3.0), wall(20, 7.0)],
        vec![],
        vec![],
        vec![line(100, 0.2, [0.0, 0.0, 1.0], [0.0, 10.0, 1.0])],
    ));
    RefusingSession {
        inner,
        refused: ElementId(20),
    }
}

#[test]
fn test_skip_policy_keeps_the_rest_of_the_phase() {
    let mut session = refusing_session();

    let report = HolePlanner::default().run(&mut session).unwrap();

    assert_eq!(report.walls.created.len(), 1);
    assert_eq!(report.walls.skipped.len(), 1);
    assert_eq!(session.inner.holes().len(), 1);
    assert_eq!(session.inner.holes()[0].host, ElementId(10));
}

#[test]
fn test_abort_policy_rolls_back_the_phase() {
    let mut session = refusing_session();
    let config = PlannerConfig {
        failure_policy: FailurePolicy::AbortPhase,
        ..PlannerConfig::default()
    };

    let error = HolePlanner::new(config).run(&mut session).unwrap_err();

    assert!(matches!(
        error,
        PlannerError::PhaseAborted {
            phase: HoleCategory::WallHole,
            ..
        }
    ));
    assert!(session.inner.holes().is_empty());
    assert!(session.inner.committed_transactions().is_empty());
    assert_eq!(session.inner.open_transaction(), None);
    let partial = error.partial_report().unwrap();
    assert_eq!(partial.holes_created(), 0);
}

#[test]
fn test_floor_abort_reports_committed_wall_holes() {
    let inner = load(snapshot(
        vec![wall(10, 5.0)],
        vec![slab(30)],
        vec![],
        vec![
            line(100, 0.2, [0.0, 0.0, 1.0], [0.0, 10.0, 1.0]),
            line(101, 0.05, [1.0, 1.0, 0.0], [1.0, 1.0, 4.0]),
        ],
    ));
    let mut session = RefusingSession {
        inner,
        refused: ElementId(30),
    };
    let config = PlannerConfig {
        failure_policy: FailurePolicy::AbortPhase,
        ..PlannerConfig::default()
    };

    let error = HolePlanner::new(config).run(&mut session).unwrap_err();

    match &error {
        PlannerError::PhaseAborted { phase, run, .. } => {
            assert_eq!(*phase, HoleCategory::FloorHole);
            assert_eq!(*run, ElementId(101));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    let partial = error.partial_report().unwrap();
    assert_eq!(partial.walls.created.len(), 1);
    assert_eq!(partial.walls.created[0].placement.host, ElementId(10));
    assert!(partial.floors.created.is_empty());

    assert_eq!(session.inner.holes().len(), 1);
    assert_eq!(session.inner.holes()[0].id, partial.walls.created[0].instance);
    assert_eq!(
        session.inner.committed_transactions(),
        &[WALL_TRANSACTION.to_string()]
    );
}
