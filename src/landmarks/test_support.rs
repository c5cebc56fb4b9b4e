/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! In-memory fixtures for exercising the `CoreGraph`/`Weighting` traits in
//! unit tests: a minimal graph built purely to drive generic algorithm
//! traits in tests.
#![cfg(test)]

use crate::landmarks::graph::{CoreEdge, CoreGraph, Weighting};

#[derive(Clone, Copy, Debug)]
#[allow(dead_code)]
pub struct ListEdge {
    id: u32,
    base: u32,
    adj: u32,
    weight: f64,
    shortcut: Option<(Option<u32>, Option<u32>)>,
    fwd: bool,
    bwd: bool,
}

impl ListEdge {
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl CoreEdge for ListEdge {
    fn edge_id(&self) -> u32 {
        self.id
    }
    fn base_node(&self) -> u32 {
        self.base
    }
    fn adj_node(&self) -> u32 {
        self.adj
    }
    fn is_shortcut(&self) -> bool {
        self.shortcut.is_some()
    }
    fn skipped_edges(&self) -> (Option<u32>, Option<u32>) {
        self.shortcut.unwrap_or((None, None))
    }
    fn access_forward(&self) -> bool {
        self.fwd
    }
    fn access_backward(&self) -> bool {
        self.bwd
    }
}

/// A raw edge record, stored once and viewed from either endpoint.
struct Record {
    id: u32,
    a: u32,
    b: u32,
    weight: f64,
    shortcut: Option<(Option<u32>, Option<u32>)>,
    fwd: bool,
    bwd: bool,
}

pub struct ListGraph {
    levels: Vec<i32>,
    records: Vec<Record>,
    adjacency: Vec<Vec<usize>>, // node -> record indices incident to it
}

impl ListGraph {
    pub fn new(node_count: usize, core_level: i32, edges: Vec<(u32, u32, f64)>) -> Self {
        Self::with_levels(vec![core_level; node_count], edges)
    }

    pub fn with_levels(levels: Vec<i32>, edges: Vec<(u32, u32, f64)>) -> Self {
        let mut g = Self {
            adjacency: vec![Vec::new(); levels.len()],
            levels,
            records: Vec::new(),
        };
        for (a, b, w) in edges {
            g.add_edge(a, b, w, true, true);
        }
        g
    }

    pub fn add_edge(&mut self, a: u32, b: u32, weight: f64, fwd: bool, bwd: bool) -> u32 {
        let id = self.records.len() as u32;
        let idx = self.records.len();
        self.records.push(Record {
            id,
            a,
            b,
            weight,
            shortcut: None,
            fwd,
            bwd,
        });
        self.adjacency[a as usize].push(idx);
        self.adjacency[b as usize].push(idx);
        id
    }

    /// Adds a shortcut edge whose weight is the sum of its two skipped
    /// edges, as a Contraction Hierarchies shortcut would report.
    pub fn add_shortcut(
        &mut self,
        a: u32,
        b: u32,
        weight: f64,
        skipped1: Option<u32>,
        skipped2: Option<u32>,
    ) -> u32 {
        let id = self.records.len() as u32;
        let idx = self.records.len();
        self.records.push(Record {
            id,
            a,
            b,
            weight,
            shortcut: Some((skipped1, skipped2)),
            fwd: true,
            bwd: true,
        });
        self.adjacency[a as usize].push(idx);
        self.adjacency[b as usize].push(idx);
        id
    }

    fn view_from(&self, idx: usize, base: u32) -> ListEdge {
        let r = &self.records[idx];
        // access flags are stored relative to the canonical a->b direction;
        // viewed from `b`, forward/backward swap meaning.
        let (adj, fwd, bwd) = if r.a == base {
            (r.b, r.fwd, r.bwd)
        } else {
            (r.a, r.bwd, r.fwd)
        };
        ListEdge {
            id: r.id,
            base,
            adj,
            weight: r.weight,
            shortcut: r.shortcut,
            fwd,
            bwd,
        }
    }
}

impl CoreGraph for ListGraph {
    type Edge = ListEdge;
    type EdgeIter<'a> = std::vec::IntoIter<ListEdge>;

    fn node_count(&self) -> usize {
        self.levels.len()
    }

    fn core_node_count(&self) -> i32 {
        let core_level = crate::landmarks::core_node_map::CoreNodeIdMap::core_level(self.node_count());
        self.levels.iter().filter(|&&l| l >= core_level).count() as i32
    }

    fn get_level(&self, node: u32) -> i32 {
        self.levels[node as usize]
    }

    fn lat_lon(&self, node: u32) -> (f64, f64) {
        (node as f64, node as f64)
    }

    fn edges_from(&self, node: u32) -> Self::EdgeIter<'_> {
        let edges: Vec<ListEdge> = self.adjacency[node as usize]
            .iter()
            .map(|&idx| self.view_from(idx, node))
            .collect();
        edges.into_iter()
    }

    fn edge_state(&self, edge_id: u32, adj_node: u32) -> Self::Edge {
        self.view_from(edge_id as usize, adj_node)
    }
}

/// Weighting that returns the edge's real-valued weight unchanged.
pub struct RealWeighting;

impl Weighting<ListGraph> for RealWeighting {
    fn calc_weight(&self, edge: &ListEdge, _reverse: bool, _prev_edge_id: u32) -> f64 {
        edge.weight()
    }
    fn min_weight(&self, meters: f64) -> f64 {
        meters / 30.0
    }
    fn name(&self) -> &str {
        "test"
    }
}
