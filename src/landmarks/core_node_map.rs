/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use fxhash::FxHashMap;

use crate::landmarks::graph::CoreGraph;
use crate::landmarks::id_types::CoreNodeIndex;

/// Dense mapping from graph node id to compact core-node index, total over
/// core nodes and undefined elsewhere. Immutable after construction.
///
/// Density is asserted at construction time rather than checked on every
/// query lookup: the subnetwork table and weight table are both sized to
/// `core_node_count`, so a sparse map would silently corrupt addressing.
#[derive(Debug)]
pub struct CoreNodeIdMap {
    graph_to_core: FxHashMap<u32, CoreNodeIndex>,
    core_to_graph: Vec<u32>,
}

const CORE_LEVEL_OFFSET: i32 = 1;

impl CoreNodeIdMap {
    /// `core_level = node_count + 1`: nodes at or above this level are core
    /// nodes.
    pub fn core_level(node_count: usize) -> i32 {
        node_count as i32 + CORE_LEVEL_OFFSET
    }

    pub fn build<G: CoreGraph>(graph: &G) -> Self {
        let core_level = Self::core_level(graph.node_count());
        let mut core_to_graph = Vec::new();
        let mut graph_to_core = FxHashMap::default();
        for node in 0..graph.node_count() as u32 {
            if graph.get_level(node) >= core_level {
                let idx = CoreNodeIndex::new(core_to_graph.len());
                core_to_graph.push(node);
                graph_to_core.insert(node, idx);
            }
        }
        debug_assert_eq!(
            core_to_graph.len(),
            core_to_graph
                .iter()
                .enumerate()
                .filter(|(i, &n)| graph_to_core[&n].value() == *i)
                .count(),
            "core index assignment must be dense and order-preserving"
        );
        Self {
            graph_to_core,
            core_to_graph,
        }
    }

    pub fn core_node_count(&self) -> usize {
        self.core_to_graph.len()
    }

    pub fn to_core(&self, graph_node: u32) -> Option<CoreNodeIndex> {
        self.graph_to_core.get(&graph_node).copied()
    }

    pub fn to_graph(&self, core_idx: CoreNodeIndex) -> u32 {
        self.core_to_graph[core_idx.value()]
    }

    pub fn core_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.core_to_graph.iter().copied()
    }
}
