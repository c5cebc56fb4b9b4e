/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::sync::atomic::{AtomicBool, Ordering};

use fxhash::FxHashSet;

use crate::landmarks::core_node_map::CoreNodeIdMap;
use crate::landmarks::dijkstra;
use crate::landmarks::edge_filter::{BlockedEdges, EdgeFilter, InCore, Sequence};
use crate::landmarks::error::{LandmarkError, LandmarkResult};
use crate::landmarks::graph::{CoreGraph, LandmarkSuggestion, Weighting};
use crate::landmarks::id_types::SubnetworkId;
use crate::landmarks::shortcut_weighting::ShortcutUnrollingWeighting;
use crate::landmarks::subnetwork_table::SubnetworkTable;

pub enum LandmarkSelection {
    Landmarks(Vec<u32>),
    /// Component had fewer than `minimum_nodes` reachable from `start_node`;
    /// every node in `component_nodes` was tagged `UNCLEAR`.
    Skipped,
}

/// Picks `k` geographically spread landmark node ids for one subnetwork.
/// Selection is driven by the shortcut-unrolling (hop-count) weighting,
/// never the real weighting -- that distinction is what keeps landmarks
/// spread out rather than clustered around the cheapest edges.
#[allow(clippy::too_many_arguments)]
pub fn select<G, W, F>(
    graph: &G,
    real_weighting: &W,
    user_filter: &F,
    blocked: &FxHashSet<u32>,
    core_level: i32,
    component_nodes: &[u32],
    start_node: u32,
    k: u16,
    minimum_nodes: usize,
    suggestion: Option<&dyn LandmarkSuggestion>,
    subnetwork_table: &mut SubnetworkTable,
    core_map: &CoreNodeIdMap,
    cancel: Option<&AtomicBool>,
) -> LandmarkResult<LandmarkSelection>
where
    G: CoreGraph,
    W: Weighting<G>,
    F: EdgeFilter<G>,
{
    if let Some(sugg) = suggestion {
        let (lat, lon) = graph.lat_lon(start_node);
        if sugg.contains(lat, lon) {
            let ids = sugg.node_ids();
            if ids.len() < k as usize {
                return Err(LandmarkError::InsufficientSuggestions {
                    got: ids.len(),
                    need: k as usize,
                });
            }
            return Ok(LandmarkSelection::Landmarks(ids[..k as usize].to_vec()));
        }
    }

    let in_core = InCore::new(core_level, true, true);
    let blocked_filter = BlockedEdges::new(blocked);
    let filter = Sequence::new(vec![&in_core, &blocked_filter, user_filter]);
    let weighting = ShortcutUnrollingWeighting::new(graph, real_weighting);

    let first = dijkstra::run(graph, &weighting, &filter, &[(start_node, 0.0)], false, cancel)?;
    if first.reached_count() < minimum_nodes {
        for &node in component_nodes {
            if let Some(idx) = core_map.to_core(node) {
                subnetwork_table.set(idx, SubnetworkId::UNCLEAR);
            }
        }
        return Ok(LandmarkSelection::Skipped);
    }

    let mut landmarks = vec![first
        .last_settled()
        .expect("a non-empty reached set always has a last settled node")];

    for _ in 1..k {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(LandmarkError::Cancelled);
            }
        }
        let sources: Vec<(u32, f64)> = landmarks.iter().map(|&n| (n, 0.0)).collect();
        let outcome = dijkstra::run(graph, &weighting, &filter, &sources, false, cancel)?;
        let next = outcome
            .last_settled()
            .expect("multi-source dijkstra always settles at least its seeds");
        landmarks.push(next);
    }

    Ok(LandmarkSelection::Landmarks(landmarks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::test_support::{ListGraph, RealWeighting};

    struct NoFilter;
    impl<G: CoreGraph> EdgeFilter<G> for NoFilter {
        fn accept(&self, _graph: &G, _edge: &G::Edge) -> bool {
            true
        }
    }

    #[test]
    fn single_core_node_selects_itself_for_every_slot() {
        let graph = ListGraph::with_levels(vec![CoreNodeIdMap::core_level(1)], vec![]);
        let core_map = CoreNodeIdMap::build(&graph);
        let mut table = SubnetworkTable::new(core_map.core_node_count());
        let weighting = RealWeighting;
        let blocked = FxHashSet::default();
        let no_filter = NoFilter;
        let result = select(
            &graph,
            &weighting,
            &no_filter,
            &blocked,
            CoreNodeIdMap::core_level(1),
            &[0],
            0,
            4,
            1,
            None,
            &mut table,
            &core_map,
            None,
        )
        .unwrap();
        match result {
            LandmarkSelection::Landmarks(ids) => assert_eq!(ids, vec![0, 0, 0, 0]),
            LandmarkSelection::Skipped => panic!("expected landmarks"),
        }
    }

    #[test]
    fn below_threshold_component_is_tagged_unclear() {
        let core_level = CoreNodeIdMap::core_level(3);
        let mut graph = ListGraph::with_levels(vec![core_level; 3], vec![]);
        graph.add_edge(0, 1, 1.0, true, true);
        // node 2 is isolated: from node 0 only {0,1} reachable.
        let core_map = CoreNodeIdMap::build(&graph);
        let mut table = SubnetworkTable::new(core_map.core_node_count());
        let weighting = RealWeighting;
        let blocked = FxHashSet::default();
        let no_filter = NoFilter;
        let result = select(
            &graph,
            &weighting,
            &no_filter,
            &blocked,
            core_level,
            &[0, 1, 2],
            0,
            2,
            3,
            None,
            &mut table,
            &core_map,
            None,
        )
        .unwrap();
        assert!(matches!(result, LandmarkSelection::Skipped));
        for node in 0..3u32 {
            let idx = core_map.to_core(node).unwrap();
            assert!(table.get(idx).is_unclear());
        }
    }
}
