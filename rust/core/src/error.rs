// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error taxonomy for hole planning.
//!
//! - [`PreconditionError`]: fatal, raised before any transaction starts.
//! - [`GeometryResolutionError`]: per run or per crossing, reported and
//!   skipped.
//! - [`PlacementError`]: why a single placement was not realized.
//! - [`PlannerError`]: what aborts a whole planning run.

use crate::barrier::BarrierKind;
use crate::hole::HoleCategory;
use crate::ids::{BarrierKey, ElementId};
use crate::planner::PlacementReport;
use crate::service::{ServiceKind, UnsupportedGeometry};
use thiserror::Error;

/// Result type for planning operations
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Missing prerequisites; nothing is mutated when one of these is raised
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreconditionError {
    #[error("{kind} source document matching \"{marker}\" is not open")]
    MissingCompanionDocument { kind: ServiceKind, marker: String },

    #[error("no non-template 3D view found")]
    Missing3dView,

    #[error("{category} family \"{family}\" not found")]
    MissingHoleFamily {
        category: HoleCategory,
        family: String,
    },

    #[error("family \"{family}\" has no parameter \"{parameter}\"")]
    MissingFamilyParameter { family: String, parameter: String },

    #[error("family symbol \"{family}\" cannot be activated: {reason}")]
    SymbolActivation { family: String, reason: String },
}

/// A run or crossing that cannot be resolved to the expected geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryResolutionError {
    #[error("service run {run}: {reason}")]
    UnsupportedGeometry {
        run: ElementId,
        reason: UnsupportedGeometry,
    },

    #[error("service run {run}: invalid diameter {value}")]
    InvalidDiameter { run: ElementId, value: f64 },

    #[error("barrier {key} cannot be resolved in the host model")]
    UnresolvedBarrier { key: BarrierKey },

    #[error("barrier {key} is a {found}, expected a {expected}")]
    UnexpectedBarrierKind {
        key: BarrierKey,
        expected: BarrierKind,
        found: BarrierKind,
    },

    #[error("wall {wall} has no host level")]
    MissingHostLevel { wall: ElementId },
}

/// Why a single hole placement was not realized
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error(transparent)]
    Resolution(#[from] GeometryResolutionError),

    #[error("host {host} is not a {expected}")]
    HostMismatch { host: ElementId, expected: BarrierKind },

    #[error("host {0} not found")]
    HostNotFound(ElementId),

    #[error("hole symbol \"{0}\" is not active")]
    SymbolInactive(String),

    #[error("invalid hole size {width} x {height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("no open transaction")]
    NoTransaction,

    #[error("hole factory error: {0}")]
    Factory(String),
}

/// Transaction protocol violations reported by a model session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("transaction \"{0}\" is already open")]
    AlreadyOpen(String),

    #[error("no open transaction")]
    NotOpen,

    #[error("commit failed: {0}")]
    CommitFailed(String),
}

/// Errors that abort a planning run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("{phase} phase aborted after run {run}: {source}")]
    PhaseAborted {
        phase: HoleCategory,
        run: ElementId,
        #[source]
        source: PlacementError,
        /// What was committed before the aborted phase
        partial: Box<PlacementReport>,
    },

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

impl PlannerError {
    /// Whether the error was raised before any mutation took place
    pub fn is_precondition(&self) -> bool {
        matches!(self, PlannerError::Precondition(_))
    }

    /// Holes committed before an aborted phase, if the run got that far
    pub fn partial_report(&self) -> Option<&PlacementReport> {
        match self {
            PlannerError::PhaseAborted { partial, .. } => Some(partial.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn with_partial(self, report: PlacementReport) -> Self {
        match self {
            PlannerError::PhaseAborted { phase, run, source, .. } => PlannerError::PhaseAborted {
                phase,
                run,
                source,
                partial: Box::new(report),
            },
            other => other,
        }
    }
}
