/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};

use fxhash::FxHashMap;
use ordered_float::NotNan;
use priority_queue::PriorityQueue;

use crate::landmarks::edge_filter::EdgeFilter;
use crate::landmarks::error::{LandmarkError, LandmarkResult};
use crate::landmarks::graph::{CoreEdge, CoreGraph, Weighting};

/// Result of one (possibly multi-source) Dijkstra run: distances reached
/// and the settling order, which the landmark selector needs to find "the
/// last settled node".
pub struct DijkstraOutcome {
    pub dist: FxHashMap<u32, f64>,
    pub settle_order: Vec<u32>,
}

impl DijkstraOutcome {
    pub fn reached_count(&self) -> usize {
        self.settle_order.len()
    }

    pub fn last_settled(&self) -> Option<u32> {
        self.settle_order.last().copied()
    }
}

type Priority = (Reverse<NotNan<f64>>, Reverse<u32>);

fn priority(dist: f64, node: u32) -> Priority {
    (Reverse(NotNan::new(dist).expect("distance must not be NaN")), Reverse(node))
}

/// Single- or multi-source Dijkstra over `graph`, expanding only edges
/// accepted by `filter` and costed by `weighting`. Shared by landmark
/// selection (hop-count weighting) and the landmark weight filler (real
/// weighting), so it's factored out here once rather than duplicated; this
/// uses a real binary heap rather than an O(n) frontier scan.
///
/// Ties on equal distance settle in ascending node-id order ("lexical node
/// id" tie-break).
pub fn run<G, W, F>(
    graph: &G,
    weighting: &W,
    filter: &F,
    sources: &[(u32, f64)],
    reverse: bool,
    cancel: Option<&AtomicBool>,
) -> LandmarkResult<DijkstraOutcome>
where
    G: CoreGraph,
    W: Weighting<G>,
    F: EdgeFilter<G>,
{
    let mut dist: FxHashMap<u32, f64> = FxHashMap::default();
    let mut settle_order = Vec::new();
    let mut pq: PriorityQueue<u32, Priority> = PriorityQueue::new();

    for &(node, d0) in sources {
        dist.insert(node, d0);
        pq.push_increase(node, priority(d0, node));
    }

    while let Some((node, _)) = pq.pop() {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(LandmarkError::Cancelled);
            }
        }
        let d = dist[&node];
        settle_order.push(node);

        for edge in graph.edges_from(node) {
            if !filter.accept(graph, &edge) {
                continue;
            }
            let w = weighting.calc_weight(&edge, reverse, u32::MAX);
            if !w.is_finite() {
                continue;
            }
            let alt = d + w;
            let adj = edge.adj_node();
            let improved = match dist.get(&adj) {
                None => true,
                Some(&cur) => alt < cur,
            };
            if improved {
                dist.insert(adj, alt);
                pq.push_increase(adj, priority(alt, adj));
            }
        }
    }

    Ok(DijkstraOutcome { dist, settle_order })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::edge_filter::InCore;
    use crate::landmarks::test_support::{ListGraph, RealWeighting};

    #[test]
    fn settles_in_nondecreasing_distance_order() {
        let mut graph = ListGraph::with_levels(vec![0, 0, 0, 0], vec![]);
        graph.add_edge(0, 1, 1.0, true, true);
        graph.add_edge(1, 2, 1.0, true, true);
        graph.add_edge(0, 3, 5.0, true, true);
        let weighting = RealWeighting;
        let filter = InCore::new(0, true, true);
        let outcome = run(&graph, &weighting, &filter, &[(0, 0.0)], false, None).unwrap();
        assert_eq!(outcome.dist[&0], 0.0);
        assert_eq!(outcome.dist[&1], 1.0);
        assert_eq!(outcome.dist[&2], 2.0);
        assert_eq!(outcome.dist[&3], 5.0);
        assert_eq!(outcome.last_settled(), Some(3));
    }

    #[test]
    fn tie_breaks_on_smallest_node_id() {
        let mut graph = ListGraph::with_levels(vec![0, 0, 0], vec![]);
        graph.add_edge(0, 2, 1.0, true, true);
        graph.add_edge(0, 1, 1.0, true, true);
        let weighting = RealWeighting;
        let filter = InCore::new(0, true, true);
        let outcome = run(&graph, &weighting, &filter, &[(0, 0.0)], false, None).unwrap();
        assert_eq!(outcome.settle_order, vec![0, 1, 2]);
    }

    #[test]
    fn respects_cancellation() {
        let mut graph = ListGraph::with_levels(vec![0, 0], vec![]);
        graph.add_edge(0, 1, 1.0, true, true);
        let weighting = RealWeighting;
        let filter = InCore::new(0, true, true);
        let cancelled = AtomicBool::new(true);
        let result = run(&graph, &weighting, &filter, &[(0, 0.0)], false, Some(&cancelled));
        assert!(matches!(result, Err(LandmarkError::Cancelled)));
    }
}
