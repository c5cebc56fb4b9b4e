/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

extern crate thiserror;

pub mod landmarks;

pub use landmarks::active_landmarks::{init_active_landmarks, ActiveLandmarks, LandmarkWeights};
pub use landmarks::border_edges::detect_border_edges;
pub use landmarks::config::LandmarkConfig;
pub use landmarks::core_node_map::CoreNodeIdMap;
pub use landmarks::dijkstra::DijkstraOutcome;
pub use landmarks::eccentricity_store::EccentricityStore;
pub use landmarks::edge_filter::{BlockedEdges, BothDirections, EdgeFilter, InCore, Sequence};
pub use landmarks::error::{LandmarkError, LandmarkResult};
pub use landmarks::graph::{CoreEdge, CoreGraph, LandmarkSuggestion, SpatialRuleLookup, Weighting};
pub use landmarks::id_types::{CoreNodeIndex, LandmarkIndex, SubnetworkId};
pub use landmarks::landmark_selector::LandmarkSelection;
pub use landmarks::landmark_storage::{BuildStats, LandmarkStorage};
pub use landmarks::shortcut_weighting::ShortcutUnrollingWeighting;
pub use landmarks::subnetwork_table::SubnetworkTable;
pub use landmarks::tarjan::strongly_connected_components;
pub use landmarks::weight_codec::{WeightCodec, SHORT_INFINITY, SHORT_MAX};
pub use landmarks::weight_filler::{fill_landmark, FillOutcome, PassStats};
pub use landmarks::weight_table::WeightTable;
