// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identifier types for host model elements.
//!
//! Every element of the host model (barriers, service runs, levels, views,
//! family symbols, hole instances) is addressed through a typed newtype so
//! that a level id can never be passed where a barrier id is expected.

use std::fmt;

macro_rules! element_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

element_newtype!(
    /// Id of an element in the host (or a linked) model.
    ElementId
);
element_newtype!(
    /// Id of a building level.
    LevelId
);
element_newtype!(
    /// Id of a 3D viewing context.
    ViewId
);
element_newtype!(
    /// Id of a loaded family symbol (hole type).
    SymbolId
);
element_newtype!(
    /// Id of a created hole instance.
    HoleInstanceId
);

impl ElementId {
    /// Sentinel used where no element applies (e.g. the linked element of a
    /// reference into the host model itself).
    pub const INVALID: ElementId = ElementId(-1);

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

/// What a ray hit names.
///
/// For a barrier in the host model `element` is the barrier itself and
/// `linked_element` is `None`. For a barrier inside a linked model `element`
/// is the link instance and `linked_element` the barrier within the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierReference {
    pub element: ElementId,
    pub linked_element: Option<ElementId>,
}

impl BarrierReference {
    /// Reference to a barrier of the host model.
    pub fn host(element: ElementId) -> Self {
        Self {
            element,
            linked_element: None,
        }
    }

    /// Reference to a barrier living inside a linked model.
    pub fn linked(link_instance: ElementId, element: ElementId) -> Self {
        Self {
            element: link_instance,
            linked_element: Some(element),
        }
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked_element.is_some()
    }

    /// Deduplication identity of the referenced barrier.
    #[inline]
    pub fn key(&self) -> BarrierKey {
        BarrierKey {
            linked: self.linked_element.unwrap_or(ElementId::INVALID),
            element: self.element,
        }
    }
}

/// Identity of a physical barrier: `(linked element, element)`.
///
/// Two crossings with equal keys hit the same barrier, whatever their
/// proximity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierKey {
    pub linked: ElementId,
    pub element: ElementId,
}

impl fmt::Display for BarrierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.linked.is_valid() {
            write!(f, "{}/{}", self.element, self.linked)
        } else {
            write!(f, "{}", self.element)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_reference_key_uses_invalid_link() {
        let key = BarrierReference::host(ElementId(42)).key();
        assert_eq!(key.element, ElementId(42));
        assert_eq!(key.linked, ElementId::INVALID);
        assert_eq!(key.to_string(), "#42");
    }

    #[test]
    fn linked_references_differ_by_inner_element() {
        let a = BarrierReference::linked(ElementId(7), ElementId(100));
        let b = BarrierReference::linked(ElementId(7), ElementId(101));
        assert!(a.is_linked());
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key().to_string(), "#7/#100");
    }

    #[test]
    fn host_and_linked_with_same_element_differ() {
        let host = BarrierReference::host(ElementId(7));
        let linked = BarrierReference::linked(ElementId(7), ElementId(3));
        assert_ne!(host.key(), linked.key());
    }
}
