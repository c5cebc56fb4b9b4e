/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use fxhash::FxHashSet;

use crate::landmarks::graph::{CoreEdge, CoreGraph};

/// Composable edge predicate. Takes the graph alongside the edge
/// because `InCore` needs to resolve endpoint levels, which `CoreEdge`
/// itself does not carry.
pub trait EdgeFilter<G: CoreGraph> {
    fn accept(&self, graph: &G, edge: &G::Edge) -> bool;
}

/// True iff both endpoints are core nodes and the requested direction is
/// permitted. Edges leaving the core (an "exit ramp") pass through
/// unconditionally: a landmark search must be able to step off the core to
/// reach a core-adjacent node and back, or border detection would wrongly
/// treat every boundary as a dead end.
pub struct InCore {
    pub core_level: i32,
    pub fwd: bool,
    pub bwd: bool,
}

impl InCore {
    pub fn new(core_level: i32, fwd: bool, bwd: bool) -> Self {
        Self { core_level, fwd, bwd }
    }
}

impl<G: CoreGraph> EdgeFilter<G> for InCore {
    fn accept(&self, graph: &G, edge: &G::Edge) -> bool {
        let base_is_core = graph.get_level(edge.base_node()) >= self.core_level;
        let adj_is_core = graph.get_level(edge.adj_node()) >= self.core_level;
        if !(base_is_core && adj_is_core) {
            return true;
        }
        if self.fwd && !edge.access_forward() {
            return false;
        }
        if self.bwd && !edge.access_backward() {
            return false;
        }
        true
    }
}

/// Rejects edges whose id is in the blocked set.
pub struct BlockedEdges<'a> {
    pub blocked: &'a FxHashSet<u32>,
}

impl<'a> BlockedEdges<'a> {
    pub fn new(blocked: &'a FxHashSet<u32>) -> Self {
        Self { blocked }
    }
}

impl<'a, G: CoreGraph> EdgeFilter<G> for BlockedEdges<'a> {
    fn accept(&self, _graph: &G, edge: &G::Edge) -> bool {
        !self.blocked.contains(&edge.edge_id())
    }
}

/// Accepts only edges traversable in both directions.
pub struct BothDirections;

impl<G: CoreGraph> EdgeFilter<G> for BothDirections {
    fn accept(&self, _graph: &G, edge: &G::Edge) -> bool {
        edge.access_forward() && edge.access_backward()
    }
}

/// AND-composition of a list of filters.
pub struct Sequence<'a, G: CoreGraph> {
    filters: Vec<&'a dyn EdgeFilter<G>>,
}

impl<'a, G: CoreGraph> Sequence<'a, G> {
    pub fn new(filters: Vec<&'a dyn EdgeFilter<G>>) -> Self {
        Self { filters }
    }
}

impl<'a, G: CoreGraph> EdgeFilter<G> for Sequence<'a, G> {
    fn accept(&self, graph: &G, edge: &G::Edge) -> bool {
        self.filters.iter().all(|f| f.accept(graph, edge))
    }
}
