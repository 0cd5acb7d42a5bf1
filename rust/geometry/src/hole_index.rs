// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-to-hole relationships of committed hole instances.
//!
//! Filled when a transaction commits, so a later phase (and the CLI
//! inspection) sees which barriers already carry openings.

use holeplan_core::{ElementId, HoleCategory, HoleInstanceId};
use rustc_hash::FxHashMap;

/// Bidirectional index between host barriers and their holes
#[derive(Debug, Clone, Default)]
pub struct HoleIndex {
    host_to_holes: FxHashMap<ElementId, Vec<HoleInstanceId>>,
    hole_to_host: FxHashMap<HoleInstanceId, (ElementId, HoleCategory)>,
}

impl HoleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `hole` was cut into `host`.
    ///
    /// Re-recording a hole moves it to the new host.
    pub fn insert(&mut self, host: ElementId, hole: HoleInstanceId, category: HoleCategory) {
        if let Some((previous, _)) = self.hole_to_host.insert(hole, (host, category)) {
            if let Some(holes) = self.host_to_holes.get_mut(&previous) {
                holes.retain(|h| *h != hole);
                if holes.is_empty() {
                    self.host_to_holes.remove(&previous);
                }
            }
        }
        self.host_to_holes.entry(host).or_default().push(hole);
    }

    /// Holes of `host` in creation order, empty if none
    pub fn holes_in(&self, host: ElementId) -> &[HoleInstanceId] {
        self.host_to_holes
            .get(&host)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn host_of(&self, hole: HoleInstanceId) -> Option<ElementId> {
        self.hole_to_host.get(&hole).map(|(host, _)| *host)
    }

    pub fn category_of(&self, hole: HoleInstanceId) -> Option<HoleCategory> {
        self.hole_to_host.get(&hole).map(|(_, category)| *category)
    }

    pub fn has_holes(&self, host: ElementId) -> bool {
        !self.holes_in(host).is_empty()
    }

    pub fn host_count(&self) -> usize {
        self.host_to_holes.len()
    }

    pub fn hole_count(&self) -> usize {
        self.hole_to_host.len()
    }

    /// Number of holes of one category
    pub fn count_of(&self, category: HoleCategory) -> usize {
        self.hole_to_host
            .values()
            .filter(|(_, c)| *c == category)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &[HoleInstanceId])> {
        self.host_to_holes.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Hosts carrying at least one hole, ascending by id
    pub fn hosts(&self) -> Vec<ElementId> {
        let mut hosts: Vec<ElementId> = self.host_to_holes.keys().copied().collect();
        hosts.sort();
        hosts
    }
}

/// Distribution of holes over their hosts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleStatistics {
    pub hosts_with_holes: usize,
    pub wall_holes: usize,
    pub floor_holes: usize,
    pub max_holes_per_host: usize,
    pub avg_holes_per_host: f64,
}

impl HoleStatistics {
    pub fn from_index(index: &HoleIndex) -> Self {
        let hosts_with_holes = index.host_count();
        let max_holes_per_host = index
            .host_to_holes
            .values()
            .map(|v| v.len())
            .max()
            .unwrap_or(0);
        let avg_holes_per_host = if hosts_with_holes > 0 {
            index.hole_count() as f64 / hosts_with_holes as f64
        } else {
            0.0
        };

        Self {
            hosts_with_holes,
            wall_holes: index.count_of(HoleCategory::WallHole),
            floor_holes: index.count_of(HoleCategory::FloorHole),
            max_holes_per_host,
            avg_holes_per_host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn host(id: i64) -> ElementId {
        ElementId(id)
    }

    fn hole(id: i64) -> HoleInstanceId {
        HoleInstanceId(id)
    }

    #[test]
    fn test_lookups_both_ways() {
        let mut index = HoleIndex::new();
        index.insert(host(100), hole(200), HoleCategory::WallHole);
        index.insert(host(100), hole(201), HoleCategory::WallHole);
        index.insert(host(101), hole(202), HoleCategory::FloorHole);

        assert_eq!(index.holes_in(host(100)), &[hole(200), hole(201)]);
        assert_eq!(index.holes_in(host(101)), &[hole(202)]);
        assert!(index.holes_in(host(999)).is_empty());

        assert_eq!(index.host_of(hole(202)), Some(host(101)));
        assert_eq!(index.host_of(hole(999)), None);
        assert_eq!(index.category_of(hole(202)), Some(HoleCategory::FloorHole));

        assert!(index.has_holes(host(100)));
        assert!(!index.has_holes(host(999)));
        assert_eq!(index.host_count(), 2);
        assert_eq!(index.hole_count(), 3);
        assert_eq!(index.hosts(), vec![host(100), host(101)]);
    }

    #[test]
    fn test_reinserting_moves_hole() {
        let mut index = HoleIndex::new();
        index.insert(host(100), hole(200), HoleCategory::WallHole);
        index.insert(host(101), hole(200), HoleCategory::WallHole);

        assert!(!index.has_holes(host(100)));
        assert_eq!(index.host_of(hole(200)), Some(host(101)));
        assert_eq!(index.hole_count(), 1);
        assert_eq!(index.host_count(), 1);
    }

    #[test]
    fn test_statistics() {
        let mut index = HoleIndex::new();
        index.insert(host(100), hole(200), HoleCategory::WallHole);
        index.insert(host(100), hole(201), HoleCategory::WallHole);
        index.insert(host(100), hole(202), HoleCategory::WallHole);
        index.insert(host(101), hole(203), HoleCategory::FloorHole);

        let stats = HoleStatistics::from_index(&index);
        assert_eq!(stats.hosts_with_holes, 2);
        assert_eq!(stats.wall_holes, 3);
        assert_eq!(stats.floor_holes, 1);
        assert_eq!(stats.max_holes_per_host, 3);
        assert_relative_eq!(stats.avg_holes_per_host, 2.0);
    }

    #[test]
    fn test_statistics_of_empty_index() {
        let stats = HoleStatistics::from_index(&HoleIndex::new());
        assert_eq!(stats.hosts_with_holes, 0);
        assert_eq!(stats.avg_holes_per_host, 0.0);
    }
}
