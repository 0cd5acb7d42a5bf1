// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hole placements and hole family symbols.

use crate::barrier::BarrierKind;
use crate::ids::{ElementId, LevelId, SymbolId};
use nalgebra::Point3;
use std::fmt;

/// Category of a hole, one per barrier class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HoleCategory {
    WallHole,
    FloorHole,
}

impl HoleCategory {
    /// Barrier class that hosts holes of this category
    pub fn host_kind(&self) -> BarrierKind {
        match self {
            HoleCategory::WallHole => BarrierKind::Wall,
            HoleCategory::FloorHole => BarrierKind::Floor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HoleCategory::WallHole => "WallHole",
            HoleCategory::FloorHole => "FloorHole",
        }
    }
}

impl fmt::Display for HoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural role of a created instance. Holes are never structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuralKind {
    #[default]
    NonStructural,
}

/// Typed dimensional parameters of a hole instance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoleParameters {
    pub width: f64,
    pub height: f64,
}

impl HoleParameters {
    /// Square opening sized to a service diameter
    pub fn square(size: f64) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

/// A sized hole to be created in a host barrier
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HolePlacement {
    /// Service run the hole was derived from
    pub run: ElementId,
    pub anchor: Point3<f64>,
    /// Distance from the run origin the anchor was computed from
    pub proximity: f64,
    pub parameters: HoleParameters,
    pub host: ElementId,
    /// Set for wall holes only
    pub host_level: Option<LevelId>,
    pub category: HoleCategory,
}

/// Index of a parameter slot within a family's parameter table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSlot(pub usize);

/// Binding of [`HoleParameters`] fields to family parameter slots.
///
/// Resolved once when the symbol is loaded; creating an instance never
/// looks parameters up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoleParameterSchema {
    pub width: ParameterSlot,
    pub height: ParameterSlot,
}

/// Which family to load for a hole category, and the names of its
/// dimensional parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleFamilySpec<'a> {
    pub category: HoleCategory,
    pub family: &'a str,
    pub width_parameter: &'a str,
    pub height_parameter: &'a str,
}

/// A loaded hole family type
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoleSymbol {
    pub id: SymbolId,
    pub family_name: String,
    pub category: HoleCategory,
    pub active: bool,
    pub schema: HoleParameterSchema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_parameters() {
        let params = HoleParameters::square(0.2);
        assert_eq!(params.width, 0.2);
        assert_eq!(params.height, 0.2);
    }

    #[test]
    fn category_host_kind() {
        assert_eq!(HoleCategory::WallHole.host_kind(), BarrierKind::Wall);
        assert_eq!(HoleCategory::FloorHole.host_kind(), BarrierKind::Floor);
        assert_eq!(StructuralKind::default(), StructuralKind::NonStructural);
    }
}
