/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::landmarks::error::{LandmarkError, LandmarkResult};

/// Build- and query-time parameters collected in one place (`K`,
/// `minimumNodes`, `A`, `maxWeight`). Validated eagerly at construction so a
/// misconfiguration fails before any precomputation runs.
#[derive(Debug, Clone)]
pub struct LandmarkConfig {
    landmark_count: u16,
    minimum_nodes: Option<usize>,
    active_landmark_count: usize,
    max_weight: Option<f64>,
}

impl LandmarkConfig {
    pub fn new(landmark_count: u16, active_landmark_count: usize) -> LandmarkResult<Self> {
        if landmark_count == 0 {
            return Err(LandmarkError::new("landmark_count must be at least 1"));
        }
        if active_landmark_count == 0 || active_landmark_count > landmark_count as usize {
            return Err(LandmarkError::new(
                "active_landmark_count must be in 1..=landmark_count",
            ));
        }
        Ok(Self {
            landmark_count,
            minimum_nodes: None,
            active_landmark_count,
            max_weight: None,
        })
    }

    pub fn with_minimum_nodes(mut self, minimum_nodes: usize) -> Self {
        self.minimum_nodes = Some(minimum_nodes);
        self
    }

    pub fn with_max_weight(mut self, max_weight: f64) -> LandmarkResult<Self> {
        if !(max_weight.is_finite() && max_weight > 0.0) {
            return Err(LandmarkError::new("max_weight must be finite and positive"));
        }
        self.max_weight = Some(max_weight);
        Ok(self)
    }

    pub fn landmark_count(&self) -> u16 {
        self.landmark_count
    }

    pub fn active_landmark_count(&self) -> usize {
        self.active_landmark_count
    }

    pub fn max_weight(&self) -> Option<f64> {
        self.max_weight
    }

    /// `min(core_nodes/2, 10_000)`, unless overridden.
    pub fn minimum_nodes(&self, core_node_count: usize) -> usize {
        self.minimum_nodes.unwrap_or_else(|| (core_node_count / 2).min(10_000))
    }
}
