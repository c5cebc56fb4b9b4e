/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::landmarks::error::{LandmarkError, LandmarkResult};
use crate::landmarks::id_types::{CoreNodeIndex, SubnetworkId};
use crate::landmarks::subnetwork_table::SubnetworkTable;
use crate::landmarks::weight_codec::{SHORT_INFINITY, SHORT_MAX};

/// Reads one stored short as a query-time weight, coercing the "unreached"
/// sentinel to `SHORT_MAX` rather than leaking it to callers.
fn coerced_weight(raw: u16) -> i32 {
    if raw == SHORT_INFINITY {
        SHORT_MAX as i32
    } else {
        raw as i32
    }
}

/// Per-(landmark, node) weight access the active-landmark picker needs;
/// implemented by whatever owns the persisted weight table and
/// `CoreNodeIdMap`.
pub trait LandmarkWeights {
    /// Number of landmarks available for `subnetwork`.
    fn landmark_count(&self, subnetwork: SubnetworkId) -> usize;
    fn from_weight(&self, subnetwork: SubnetworkId, landmark_idx: usize, node: CoreNodeIndex) -> u16;
    fn to_weight(&self, subnetwork: SubnetworkId, landmark_idx: usize, node: CoreNodeIndex) -> u16;
}

/// Scratch arrays owned by the caller, reused across calls so that a
/// previous pick can be compared against a new one.
pub struct ActiveLandmarks {
    pub active_idx: Vec<i32>,
    pub active_froms: Vec<i32>,
    pub active_tos: Vec<i32>,
}

impl ActiveLandmarks {
    pub fn new(active_count: usize) -> Self {
        Self {
            active_idx: vec![-1; active_count],
            active_froms: vec![0; active_count],
            active_tos: vec![0; active_count],
        }
    }

    fn already_initialized(&self) -> bool {
        self.active_idx.first().is_some_and(|&v| v >= 0)
    }
}

/// Picks up to `activeIdx.len()` landmarks maximising the triangle-inequality
/// gap between `from` and `to`. Returns `Ok(false)` when either
/// endpoint's subnetwork is `UNSET`/`UNCLEAR` -- the caller is expected to
/// fall back to a straight-line bound rather than treat this as an error.
pub fn init_active_landmarks<W: LandmarkWeights>(
    weights: &W,
    subnetwork_table: &SubnetworkTable,
    from: CoreNodeIndex,
    to: CoreNodeIndex,
    reverse: bool,
    scratch: &mut ActiveLandmarks,
) -> LandmarkResult<bool> {
    let from_subnetwork = subnetwork_table.get(from);
    let to_subnetwork = subnetwork_table.get(to);

    if from_subnetwork.is_unset() || from_subnetwork.is_unclear() || to_subnetwork.is_unset() || to_subnetwork.is_unclear() {
        return Ok(false);
    }
    if from_subnetwork != to_subnetwork {
        return Err(LandmarkError::DisconnectedSubnetworks {
            from: from_subnetwork.raw(),
            to: to_subnetwork.raw(),
        });
    }
    let subnetwork = from_subnetwork;

    let landmark_count = weights.landmark_count(subnetwork);
    let active_count = scratch.active_idx.len();

    let mut scored: Vec<(usize, f64)> = Vec::with_capacity(landmark_count);
    for lm in 0..landmark_count {
        // Both terms of `to_score` are read via `to_weight`, never
        // `from_weight`, even though the delta is framed against `from`.
        // Kept intentionally asymmetric with `from_score` rather than
        // "corrected" to match `from_weight`.
        let from_score =
            coerced_weight(weights.from_weight(subnetwork, lm, to)) - coerced_weight(weights.from_weight(subnetwork, lm, from));
        let to_score =
            coerced_weight(weights.to_weight(subnetwork, lm, from)) - coerced_weight(weights.to_weight(subnetwork, lm, to));
        let mut score = from_score.max(to_score) as f64;
        if reverse {
            score = -score;
        }
        scored.push((lm, score));
    }
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).expect("landmark scores are never NaN"));

    let previously_active: Vec<usize> = scratch
        .active_idx
        .iter()
        .filter(|&&idx| idx >= 0)
        .map(|&idx| idx as usize)
        .collect();

    let mut picked: Vec<usize> = Vec::with_capacity(active_count);
    if scratch.already_initialized() {
        // Preserve at most two previously active landmarks among the new
        // top picks; the remaining slots fill greedily from the ranking.
        // When `active_count` is 0 this reuse step is a no-op and every
        // slot below is filled purely from `scored`.
        const MAX_REUSED: usize = 2;
        for &idx in previously_active.iter().take(MAX_REUSED) {
            if idx < landmark_count && !picked.contains(&idx) {
                picked.push(idx);
            }
            if picked.len() >= active_count {
                break;
            }
        }
    }
    for (lm, _) in scored {
        if picked.len() >= active_count {
            break;
        }
        if !picked.contains(&lm) {
            picked.push(lm);
        }
    }

    for (slot, &lm) in picked.iter().enumerate() {
        scratch.active_idx[slot] = lm as i32;
        scratch.active_froms[slot] = coerced_weight(weights.from_weight(subnetwork, lm, to));
        scratch.active_tos[slot] = coerced_weight(weights.to_weight(subnetwork, lm, to));
    }
    for slot in picked.len()..active_count {
        scratch.active_idx[slot] = -1;
        scratch.active_froms[slot] = 0;
        scratch.active_tos[slot] = 0;
    }

    Ok(true)
}
