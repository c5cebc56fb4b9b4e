/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::landmarks::id_types::{CoreNodeIndex, SubnetworkId};

/// Byte-per-core-node mapping of core node -> subnetwork id. Every
/// cell starts `UNSET`; the build tags cells `UNCLEAR` for below-threshold
/// components and the component id otherwise.
#[derive(Debug)]
pub struct SubnetworkTable {
    cells: Vec<i8>,
}

impl SubnetworkTable {
    pub fn new(core_node_count: usize) -> Self {
        Self {
            cells: vec![SubnetworkId::UNSET.raw(); core_node_count],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, idx: CoreNodeIndex) -> SubnetworkId {
        match self.cells[idx.value()] {
            raw if raw < 0 => SubnetworkId::UNSET,
            0 => SubnetworkId::UNCLEAR,
            raw => SubnetworkId::from_component_index(raw as usize)
                .expect("stored subnetwork id must fit 1..=127"),
        }
    }

    pub fn set(&mut self, idx: CoreNodeIndex, id: SubnetworkId) {
        self.cells[idx.value()] = id.raw();
    }

    pub fn raw(&self) -> &[i8] {
        &self.cells
    }

    pub fn from_raw(cells: Vec<i8>) -> Self {
        Self { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_unset() {
        let table = SubnetworkTable::new(3);
        for i in 0..3 {
            assert!(table.get(CoreNodeIndex::new(i)).is_unset());
        }
    }

    #[test]
    fn roundtrips_assigned_and_unclear() {
        let mut table = SubnetworkTable::new(2);
        table.set(CoreNodeIndex::new(0), SubnetworkId::UNCLEAR);
        table.set(CoreNodeIndex::new(1), SubnetworkId::from_component_index(3).unwrap());
        assert!(table.get(CoreNodeIndex::new(0)).is_unclear());
        assert_eq!(table.get(CoreNodeIndex::new(1)).raw(), 3);
    }
}
