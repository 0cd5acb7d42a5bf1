// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and exit codes for the CLI.

use holeplan_core::PlannerError;
use thiserror::Error;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot load model: {0}")]
    Model(#[from] holeplan_geometry::Error),

    #[error("{0}")]
    Planner(#[from] PlannerError),

    #[error("Cannot write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("Cannot encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Planner(error) if error.is_precondition() => 2,
            CliError::Model(_) => 3,
            _ => 1,
        }
    }

    /// Stable code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Model(_) => "MODEL_ERROR",
            CliError::Planner(PlannerError::Precondition(_)) => "PRECONDITION_FAILED",
            CliError::Planner(PlannerError::PhaseAborted { .. }) => "PHASE_ABORTED",
            CliError::Planner(PlannerError::Transaction(_)) => "TRANSACTION_ERROR",
            CliError::Output(_) => "OUTPUT_ERROR",
            CliError::Encode(_) => "ENCODE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holeplan_core::{HoleCategory, PlacementError, PlacementReport, PreconditionError};

    #[test]
    fn test_precondition_exits_with_two() {
        let error = CliError::from(PlannerError::from(PreconditionError::Missing3dView));
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.code(), "PRECONDITION_FAILED");
        assert_eq!(error.to_string(), "no non-template 3D view found");
    }

    #[test]
    fn test_other_failures_exit_non_zero() {
        let aborted = CliError::from(PlannerError::PhaseAborted {
            phase: HoleCategory::FloorHole,
            run: holeplan_core::ElementId(7),
            source: PlacementError::NoTransaction,
            partial: Box::new(PlacementReport::empty(Vec::new())),
        });
        assert_eq!(aborted.exit_code(), 1);

        let model = CliError::from(holeplan_geometry::Error::DuplicateElement(3));
        assert_eq!(model.exit_code(), 3);
        assert_eq!(model.code(), "MODEL_ERROR");
    }
}
