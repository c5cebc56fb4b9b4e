/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use fxhash::FxHashSet;
use tracing::info;

use crate::landmarks::active_landmarks::{init_active_landmarks, ActiveLandmarks, LandmarkWeights};
use crate::landmarks::border_edges::detect_border_edges;
use crate::landmarks::config::LandmarkConfig;
use crate::landmarks::core_node_map::CoreNodeIdMap;
use crate::landmarks::edge_filter::{BlockedEdges, EdgeFilter, InCore, Sequence};
use crate::landmarks::error::{LandmarkError, LandmarkResult};
use crate::landmarks::graph::{CoreGraph, LandmarkSuggestion, SpatialRuleLookup, Weighting};
use crate::landmarks::id_types::{CoreNodeIndex, SubnetworkId};
use crate::landmarks::landmark_selector::{self, LandmarkSelection};
use crate::landmarks::subnetwork_table::SubnetworkTable;
use crate::landmarks::tarjan;
use crate::landmarks::weight_codec::WeightCodec;
use crate::landmarks::weight_filler;
use crate::landmarks::weight_table::WeightTable;

/// Telemetry returned from a build, falling out of the bookkeeping landmark
/// selection and weight filling already have to do -- useful for tests and
/// callers without scraping logs.
#[derive(Debug, Clone)]
pub struct BuildStats {
    /// Number of entries in `landmark_ids`, including the index-0 placeholder.
    pub subnetwork_count: u32,
    /// Core-node count of each subnetwork, aligned with `landmark_ids`;
    /// index 0 is the unused placeholder and is always 0.
    pub subnetwork_sizes: Vec<usize>,
    /// Fraction of written weights that saturated to `SHORT_MAX` across the
    /// whole build.
    pub saturation_ratio: f64,
}

struct Inner {
    table: WeightTable,
    subnetwork_table: SubnetworkTable,
    #[allow(dead_code)]
    codec: WeightCodec,
    landmark_ids: Vec<Vec<u32>>,
}

impl LandmarkWeights for Inner {
    fn landmark_count(&self, subnetwork: SubnetworkId) -> usize {
        self.landmark_ids
            .get(subnetwork.as_list_index())
            .map_or(0, |ids| ids.len())
    }

    fn from_weight(&self, _subnetwork: SubnetworkId, landmark_idx: usize, node: CoreNodeIndex) -> u16 {
        self.table.get_short(self.table.cell_offset(node.value() as u32, landmark_idx as u32, 0))
    }

    fn to_weight(&self, _subnetwork: SubnetworkId, landmark_idx: usize, node: CoreNodeIndex) -> u16 {
        self.table.get_short(self.table.cell_offset(node.value() as u32, landmark_idx as u32, 2))
    }
}

/// Owns the persisted weight table, subnetwork table and landmark-id mapping
/// for one `(weighting, filter)` pair across its create/load/query/close
/// lifecycle. A fresh `LandmarkStorage` is uninitialized; calling
/// `create_landmarks` or `load_existing` a second time is the programming
/// error this module names `AlreadyInitialized`.
pub struct LandmarkStorage {
    inner: Option<Inner>,
}

impl Default for LandmarkStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkStorage {
    pub fn new() -> Self {
        Self { inner: None }
    }

    pub fn subnetwork_path_for(weight_table_path: &Path) -> PathBuf {
        let mut name = weight_table_path.as_os_str().to_owned();
        name.push(".subnetwork");
        PathBuf::from(name)
    }

    /// Runs the full build pipeline: border
    /// edges, Tarjan components, per-component landmark selection and
    /// weight filling, then finalises the header and flushes.
    #[allow(clippy::too_many_arguments)]
    pub fn create_landmarks<G, W, F>(
        &mut self,
        weight_table_path: &Path,
        graph: &G,
        weighting: &W,
        user_filter: &F,
        core_map: &CoreNodeIdMap,
        config: &LandmarkConfig,
        bbox_diagonal_meters: f64,
        suggestion: Option<&dyn LandmarkSuggestion>,
        rule_lookup: Option<&dyn SpatialRuleLookup>,
        cancel: Option<&AtomicBool>,
    ) -> LandmarkResult<BuildStats>
    where
        G: CoreGraph,
        W: Weighting<G>,
        F: EdgeFilter<G>,
    {
        if self.inner.is_some() {
            return Err(LandmarkError::AlreadyInitialized);
        }

        let core_node_count = core_map.core_node_count();
        let core_level = CoreNodeIdMap::core_level(graph.node_count());
        let k = config.landmark_count();

        let border = detect_border_edges(graph, rule_lookup);
        let blocked: FxHashSet<u32> = border.iter().collect();

        let tarjan_in_core = InCore::new(core_level, false, true);
        let blocked_filter = BlockedEdges::new(&blocked);
        let tarjan_filter = Sequence::new(vec![&tarjan_in_core, &blocked_filter, user_filter]);
        let components = tarjan::strongly_connected_components(graph, &tarjan_filter, core_map.core_ids());

        let minimum_nodes = config.minimum_nodes(core_node_count);

        let codec = match config.max_weight() {
            Some(mw) => WeightCodec::from_max_weight(mw)?,
            None => WeightCodec::from_bbox_diagonal(bbox_diagonal_meters, |m| weighting.min_weight(m))?,
        };

        let mut table = WeightTable::create(weight_table_path, core_node_count as u32, k as u32)?;
        table.set_factor_header(codec.header_factor());
        let mut subnetwork_table = SubnetworkTable::new(core_node_count);

        let mut landmark_ids: Vec<Vec<u32>> = vec![vec![0u32; k as usize]];
        let mut subnetwork_sizes = vec![0usize];
        let mut total_visited = 0usize;
        let mut total_saturated = 0usize;

        for component in components {
            if component.len() < minimum_nodes {
                for &node in &component {
                    if let Some(idx) = core_map.to_core(node) {
                        subnetwork_table.set(idx, SubnetworkId::UNCLEAR);
                    }
                }
                continue;
            }

            let next_id = landmark_ids.len();
            let subnetwork_id = SubnetworkId::from_component_index(next_id)
                .ok_or(LandmarkError::TooManySubnetworks(next_id))?;

            let start_node = component[0];
            let selection = landmark_selector::select(
                graph,
                weighting,
                user_filter,
                &blocked,
                core_level,
                &component,
                start_node,
                k,
                minimum_nodes,
                suggestion,
                &mut subnetwork_table,
                core_map,
                cancel,
            )?;
            let landmarks = match selection {
                LandmarkSelection::Skipped => continue,
                LandmarkSelection::Landmarks(ids) => ids,
            };

            let mut abandoned = false;
            for (lm_idx, &landmark_node) in landmarks.iter().enumerate() {
                let outcome = weight_filler::fill_landmark(
                    graph,
                    weighting,
                    user_filter,
                    &blocked,
                    core_level,
                    core_map,
                    &codec,
                    &mut table,
                    &mut subnetwork_table,
                    subnetwork_id,
                    landmark_node,
                    lm_idx as u32,
                    lm_idx == 0,
                    cancel,
                )?;
                total_visited += outcome.forward.visited + outcome.reverse.visited;
                total_saturated += outcome.forward.saturated + outcome.reverse.saturated;
                if !outcome.ok {
                    abandoned = true;
                    break;
                }
            }
            if abandoned {
                info!(subnetwork_id = next_id, "abandoning subnetwork: overlapping component under this edge filter");
                continue;
            }

            info!(subnetwork_id = next_id, size = component.len(), "landmarks selected for subnetwork");
            landmark_ids.push(landmarks);
            subnetwork_sizes.push(component.len());
        }

        let s = landmark_ids.len() as u32;
        table.set_subnetwork_count(s)?;
        for (s_idx, ids) in landmark_ids.iter().enumerate() {
            for (lm_idx, &node_id) in ids.iter().enumerate() {
                table.set_int(table.mapping_entry_offset(s_idx as u32, lm_idx as u32), node_id as i32);
            }
        }
        table.flush()?;

        let subnetwork_path = Self::subnetwork_path_for(weight_table_path);
        std::fs::write(
            &subnetwork_path,
            subnetwork_table.raw().iter().map(|&b| b as u8).collect::<Vec<u8>>(),
        )?;

        let saturation_ratio = if total_visited > 0 {
            total_saturated as f64 / total_visited as f64
        } else {
            0.0
        };
        let stats = BuildStats {
            subnetwork_count: s,
            subnetwork_sizes,
            saturation_ratio,
        };
        info!(subnetworks = s, saturation_ratio, "landmark build complete");

        self.inner = Some(Inner {
            table,
            subnetwork_table,
            codec,
            landmark_ids,
        });
        Ok(stats)
    }

    /// Reopens a previously built table, checking
    /// persisted `coreNodeCount` against `current_core_node_count` and
    /// reconstructing `landmark_ids` from the mapping region.
    pub fn load_existing(&mut self, weight_table_path: &Path, current_core_node_count: u32) -> LandmarkResult<()> {
        if self.inner.is_some() {
            return Err(LandmarkError::AlreadyInitialized);
        }
        let table = WeightTable::load(weight_table_path, current_core_node_count)?;
        let codec = WeightCodec::from_header_factor(table.header_factor())?;
        let s = table.header_s() as usize;
        let k = table.header_k() as usize;
        let mut landmark_ids = vec![vec![0u32; k]; s];
        for (s_idx, row) in landmark_ids.iter_mut().enumerate() {
            for (lm_idx, slot) in row.iter_mut().enumerate() {
                *slot = table.get_int(table.mapping_entry_offset(s_idx as u32, lm_idx as u32)) as u32;
            }
        }

        let subnetwork_path = Self::subnetwork_path_for(weight_table_path);
        let raw = std::fs::read(&subnetwork_path)?;
        let subnetwork_table = SubnetworkTable::from_raw(raw.into_iter().map(|b| b as i8).collect());

        self.inner = Some(Inner {
            table,
            subnetwork_table,
            codec,
            landmark_ids,
        });
        Ok(())
    }

    fn inner(&self) -> &Inner {
        self.inner.as_ref().expect("query before create_landmarks/load_existing")
    }

    fn inner_mut(&mut self) -> &mut Inner {
        self.inner.as_mut().expect("query before create_landmarks/load_existing")
    }

    pub fn subnetwork_table(&self) -> &SubnetworkTable {
        &self.inner().subnetwork_table
    }

    pub fn landmark_ids(&self, subnetwork: SubnetworkId) -> &[u32] {
        &self.inner().landmark_ids[subnetwork.as_list_index()]
    }

    /// Read-only with respect to the persisted tables; writes only into
    /// `scratch`.
    pub fn init_active_landmarks(
        &self,
        from: CoreNodeIndex,
        to: CoreNodeIndex,
        reverse: bool,
        scratch: &mut ActiveLandmarks,
    ) -> LandmarkResult<bool> {
        init_active_landmarks(self.inner(), self.subnetwork_table(), from, to, reverse, scratch)
    }

    pub fn flush(&mut self) -> LandmarkResult<()> {
        self.inner_mut().table.flush()
    }

    /// Idempotent: closing twice, or closing without ever having built or
    /// loaded, is a no-op.
    pub fn close(&mut self) -> LandmarkResult<()> {
        if let Some(inner) = self.inner.as_mut() {
            inner.table.close()?;
        }
        Ok(())
    }
}
