/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::sync::atomic::AtomicBool;

use fxhash::FxHashSet;
use tracing::warn;

use crate::landmarks::core_node_map::CoreNodeIdMap;
use crate::landmarks::dijkstra;
use crate::landmarks::edge_filter::{BlockedEdges, EdgeFilter, InCore, Sequence};
use crate::landmarks::error::LandmarkResult;
use crate::landmarks::graph::{CoreGraph, Weighting};
use crate::landmarks::id_types::SubnetworkId;
use crate::landmarks::subnetwork_table::SubnetworkTable;
use crate::landmarks::weight_codec::WeightCodec;
use crate::landmarks::weight_table::WeightTable;

/// Saturation above this fraction of a pass's visited nodes triggers a
/// "pick a larger factor" warning.
const SATURATION_WARNING_RATIO: f64 = 0.10;

#[derive(Debug, Default)]
pub struct PassStats {
    pub visited: usize,
    pub saturated: usize,
}

#[derive(Debug)]
pub struct FillOutcome {
    pub forward: PassStats,
    pub reverse: PassStats,
    /// `false` when a node reached while tagging the first landmark already
    /// carried a different subnetwork id: the caller must abandon this
    /// subnetwork rather than corrupt a neighbouring one.
    pub ok: bool,
}

fn warn_if_saturated(stats: &PassStats, landmark_idx: u32, direction: &str) {
    if stats.visited == 0 {
        return;
    }
    if stats.saturated as f64 / stats.visited as f64 > SATURATION_WARNING_RATIO {
        warn!(
            landmark_idx,
            direction,
            saturated = stats.saturated,
            visited = stats.visited,
            "more than 10% of weights saturated for this landmark; consider a larger factor"
        );
    }
}

/// Runs the forward and reverse Dijkstra passes for one landmark and writes
/// every reached core node's weight into `table`. When
/// `tag_subnetwork` is set (the first landmark of a subnetwork), the forward
/// pass also stamps `subnetwork_table` and detects component overlap.
#[allow(clippy::too_many_arguments)]
pub fn fill_landmark<G, W, F>(
    graph: &G,
    weighting: &W,
    user_filter: &F,
    blocked: &FxHashSet<u32>,
    core_level: i32,
    core_map: &CoreNodeIdMap,
    codec: &WeightCodec,
    table: &mut WeightTable,
    subnetwork_table: &mut SubnetworkTable,
    subnetwork_id: SubnetworkId,
    landmark_node: u32,
    landmark_idx: u32,
    tag_subnetwork: bool,
    cancel: Option<&AtomicBool>,
) -> LandmarkResult<FillOutcome>
where
    G: CoreGraph,
    W: Weighting<G>,
    F: EdgeFilter<G>,
{
    let blocked_filter = BlockedEdges::new(blocked);

    let forward_in_core = InCore::new(core_level, false, true);
    let forward_filter = Sequence::new(vec![&forward_in_core, &blocked_filter, user_filter]);
    let forward_search = dijkstra::run(
        graph,
        weighting,
        &forward_filter,
        &[(landmark_node, 0.0)],
        false,
        cancel,
    )?;

    let mut forward = PassStats::default();
    for (&node, &dist) in forward_search.dist.iter() {
        let Some(core_idx) = core_map.to_core(node) else {
            continue;
        };
        if tag_subnetwork {
            let existing = subnetwork_table.get(core_idx);
            if !existing.is_unset() && !existing.is_unclear() && existing != subnetwork_id {
                return Ok(FillOutcome {
                    forward,
                    reverse: PassStats::default(),
                    ok: false,
                });
            }
            subnetwork_table.set(core_idx, subnetwork_id);
        }
        let (short, saturated) = codec.encode(dist)?;
        table.set_short(table.cell_offset(core_idx.value() as u32, landmark_idx, 0), short);
        forward.visited += 1;
        if saturated {
            forward.saturated += 1;
        }
    }
    warn_if_saturated(&forward, landmark_idx, "forward");

    let reverse_in_core = InCore::new(core_level, true, false);
    let reverse_filter = Sequence::new(vec![&reverse_in_core, &blocked_filter, user_filter]);
    let reverse_search = dijkstra::run(
        graph,
        weighting,
        &reverse_filter,
        &[(landmark_node, 0.0)],
        true,
        cancel,
    )?;

    let mut reverse = PassStats::default();
    for (&node, &dist) in reverse_search.dist.iter() {
        let Some(core_idx) = core_map.to_core(node) else {
            continue;
        };
        let (short, saturated) = codec.encode(dist)?;
        table.set_short(table.cell_offset(core_idx.value() as u32, landmark_idx, 2), short);
        reverse.visited += 1;
        if saturated {
            reverse.saturated += 1;
        }
    }
    warn_if_saturated(&reverse, landmark_idx, "reverse");

    Ok(FillOutcome {
        forward,
        reverse,
        ok: true,
    })
}
