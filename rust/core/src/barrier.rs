// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Barriers (walls and floors) and ray crossings against them.

use crate::ids::{BarrierKey, BarrierReference, ElementId, LevelId};
use std::fmt;

/// Barrier class. Walls and floors are always queried separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarrierKind {
    Wall,
    Floor,
}

impl BarrierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarrierKind::Wall => "Wall",
            BarrierKind::Floor => "Floor",
        }
    }
}

impl fmt::Display for BarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved host barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Barrier {
    /// Walls carry the level their holes are hosted on. A wall without a
    /// level cannot host a hole.
    Wall {
        id: ElementId,
        level: Option<LevelId>,
    },
    Floor {
        id: ElementId,
    },
}

impl Barrier {
    pub fn id(&self) -> ElementId {
        match self {
            Barrier::Wall { id, .. } | Barrier::Floor { id } => *id,
        }
    }

    pub fn kind(&self) -> BarrierKind {
        match self {
            Barrier::Wall { .. } => BarrierKind::Wall,
            Barrier::Floor { .. } => BarrierKind::Floor,
        }
    }
}

/// One crossing reported by a ray intersector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub reference: BarrierReference,
    /// Distance from the ray origin along its (unit) direction
    pub proximity: f64,
}

impl RayHit {
    pub fn new(reference: BarrierReference, proximity: f64) -> Self {
        Self {
            reference,
            proximity,
        }
    }
}

/// A ray crossing attributed to the service run that cast it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawIntersection {
    pub run: ElementId,
    pub reference: BarrierReference,
    pub proximity: f64,
}

impl RawIntersection {
    #[inline]
    pub fn key(&self) -> BarrierKey {
        self.reference.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barrier_accessors() {
        let wall = Barrier::Wall {
            id: ElementId(10),
            level: Some(LevelId(1)),
        };
        let floor = Barrier::Floor { id: ElementId(20) };

        assert_eq!(wall.id(), ElementId(10));
        assert_eq!(wall.kind(), BarrierKind::Wall);
        assert_eq!(floor.id(), ElementId(20));
        assert_eq!(floor.kind(), BarrierKind::Floor);
        assert_eq!(BarrierKind::Floor.to_string(), "Floor");
    }
}
