/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

/// Dense index into the core subgraph, `0..core_node_count`. Distinct from a
/// graph node id: many graph nodes are not core nodes, and core indices are
/// assigned densely by `CoreNodeIdMap` so they can address matrix rows
/// directly.
#[derive(Hash, Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub struct CoreNodeIndex(usize);

impl CoreNodeIndex {
    pub fn new(idx: usize) -> Self {
        Self(idx)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CoreNodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "core:{}", self.0)
    }
}

/// Position of a landmark within a subnetwork's `0..K` landmark array. Not
/// the same as a graph node id or a `CoreNodeIndex` -- a landmark index only
/// makes sense relative to one subnetwork's landmark row.
#[derive(Hash, Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub struct LandmarkIndex(usize);

impl LandmarkIndex {
    pub fn new(idx: usize) -> Self {
        Self(idx)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LandmarkIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "lm:{}", self.0)
    }
}

/// Identifier of a strongly connected component of the core under a given
/// edge filter. `0` is reserved as a placeholder so that ids line up with
/// positions in `LandmarkStorage::landmark_ids`; see `UNCLEAR`/`UNSET` below.
#[derive(Hash, Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub struct SubnetworkId(i8);

impl SubnetworkId {
    pub const UNSET: SubnetworkId = SubnetworkId(-1);
    pub const UNCLEAR: SubnetworkId = SubnetworkId(0);

    /// Fails (by returning `None`) rather than silently truncating when `id`
    /// does not fit a positive `i8` -- callers turn this into
    /// `LandmarkError::TooManySubnetworks`.
    pub fn from_component_index(id: usize) -> Option<Self> {
        if id == 0 || id > 127 {
            return None;
        }
        Some(Self(id as i8))
    }

    pub fn raw(&self) -> i8 {
        self.0
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    pub fn is_unclear(&self) -> bool {
        *self == Self::UNCLEAR
    }

    /// Index into the landmark-id mapping region / `LandmarkStorage::landmark_ids`.
    pub fn as_list_index(&self) -> usize {
        debug_assert!(self.0 > 0, "list index only valid for assigned subnetworks");
        self.0 as usize
    }
}

impl fmt::Display for SubnetworkId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "subnetwork:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subnetwork_id_rejects_zero_and_overflow() {
        assert!(SubnetworkId::from_component_index(0).is_none());
        assert!(SubnetworkId::from_component_index(128).is_none());
        assert!(SubnetworkId::from_component_index(127).is_some());
    }

    #[test]
    fn subnetwork_sentinels() {
        assert!(SubnetworkId::UNSET.is_unset());
        assert!(SubnetworkId::UNCLEAR.is_unclear());
        assert!(!SubnetworkId::UNCLEAR.is_unset());
    }
}
