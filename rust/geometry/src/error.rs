// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry and model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building barrier solids or loading a model
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid solid: {0}")]
    InvalidSolid(String),

    #[error("Duplicate element id #{0}")]
    DuplicateElement(i64),

    #[error("Element #{element} references unknown level #{level}")]
    UnknownLevel { element: i64, level: i64 },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
