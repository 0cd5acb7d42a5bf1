// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collapsing of duplicate crossings on the same barrier.
//!
//! A ray passing through a wall reports its entry face and its exit face.
//! Both name the same barrier and must produce a single hole. The first
//! crossing seen for a [`BarrierKey`](crate::BarrierKey) wins; with input in
//! ascending proximity that is the nearest one.

use crate::barrier::RawIntersection;
use rustc_hash::FxHashSet;

/// Keep one intersection per barrier key, first seen wins.
///
/// Input order is preserved for the retained entries.
pub fn dedupe(raw: impl IntoIterator<Item = RawIntersection>) -> Vec<RawIntersection> {
    let mut seen = FxHashSet::default();
    raw.into_iter()
        .filter(|intersection| seen.insert(intersection.key()))
        .collect()
}
