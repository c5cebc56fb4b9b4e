/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::landmarks::graph::{CoreEdge, CoreGraph, Weighting};

/// Wraps a base weighting so that landmark *selection* (never weight
/// filling) is driven by hop count rather than travel time: a
/// plain edge counts as one hop, a shortcut is expanded to the number of
/// real edges it replaces. Selecting landmarks by hop count gives better
/// geographical spread than by travel time, because slow/long edges
/// (ferries) would otherwise dominate selection.
pub struct ShortcutUnrollingWeighting<'a, G: CoreGraph, W: Weighting<G>> {
    graph: &'a G,
    inner: &'a W,
}

impl<'a, G: CoreGraph, W: Weighting<G>> ShortcutUnrollingWeighting<'a, G, W> {
    pub fn new(graph: &'a G, inner: &'a W) -> Self {
        Self { graph, inner }
    }
}

impl<'a, G: CoreGraph, W: Weighting<G>> Weighting<G> for ShortcutUnrollingWeighting<'a, G, W> {
    fn calc_weight(&self, edge: &G::Edge, reverse: bool, prev_edge_id: u32) -> f64 {
        let raw = self.inner.calc_weight(edge, reverse, prev_edge_id);
        if raw >= f64::MAX {
            return f64::INFINITY;
        }
        if !edge.is_shortcut() {
            return 1.0;
        }
        unroll_shortcut(self.graph, edge, reverse) as f64
    }

    fn min_weight(&self, meters: f64) -> f64 {
        self.inner.min_weight(meters)
    }

    fn name(&self) -> &str {
        "shortcut-unrolling"
    }
}

/// Counts the real edges underlying a shortcut by an explicit work stack
/// (not a plain recursion) so that a pathologically deep contraction order
/// cannot blow the call stack; shortcuts form a DAG by construction of
/// Contraction Hierarchies, so this always terminates.
///
/// `skipped1` is resolved from the `from` endpoint first; if
/// absent, `skipped2` is resolved from `from` instead; whichever skipped id
/// remains is resolved from `to`. The `reverse` flag alternates at each
/// recursive step so the correct endpoint is used when a skipped edge is
/// itself a shortcut.
fn unroll_shortcut<G: CoreGraph>(graph: &G, edge: &G::Edge, reverse: bool) -> u32 {
    let mut stack: Vec<(G::Edge, bool)> = vec![(edge.clone(), reverse)];
    let mut counter = 0u32;
    while let Some((e, rev)) = stack.pop() {
        if !e.is_shortcut() {
            counter += 1;
            continue;
        }
        let (skipped1, skipped2) = e.skipped_edges();
        let from = if rev { e.adj_node() } else { e.base_node() };
        let to = if rev { e.base_node() } else { e.adj_node() };
        let (from_id, to_id) = match skipped1 {
            Some(id) => (id, skipped2),
            None => (
                skipped2.expect("shortcut must carry at least one skipped-edge reference"),
                None,
            ),
        };
        stack.push((graph.edge_state(from_id, from), !rev));
        if let Some(to_id) = to_id {
            stack.push((graph.edge_state(to_id, to), !rev));
        }
    }
    counter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::test_support::{ListGraph, RealWeighting};

    #[test]
    fn plain_edge_counts_as_one_hop() {
        let mut graph = ListGraph::with_levels(vec![0, 0], vec![]);
        graph.add_edge(0, 1, 7.0, true, true);
        let inner = RealWeighting;
        let weighting = ShortcutUnrollingWeighting::new(&graph, &inner);
        let edge = graph.edges_from(0).next().unwrap();
        assert_eq!(weighting.calc_weight(&edge, false, u32::MAX), 1.0);
    }

    #[test]
    fn shortcut_of_three_real_edges_counts_three() {
        // Real path: 0 -1 (e0) - 2 (e1) - 3 (e2). Shortcut A covers 0->2 via e0,e1;
        // shortcut B covers 0->3 via A, e2.
        let mut graph = ListGraph::with_levels(vec![0, 0, 0, 0], vec![]);
        let e0 = graph.add_edge(0, 1, 1.0, true, true);
        let e1 = graph.add_edge(1, 2, 1.0, true, true);
        let e2 = graph.add_edge(2, 3, 1.0, true, true);
        let shortcut_a = graph.add_shortcut(0, 2, 2.0, Some(e0), Some(e1));
        let _shortcut_b = graph.add_shortcut(0, 3, 3.0, Some(shortcut_a), Some(e2));

        let inner = RealWeighting;
        let weighting = ShortcutUnrollingWeighting::new(&graph, &inner);
        let edge = graph.edge_state(_shortcut_b, 0);
        assert_eq!(weighting.calc_weight(&edge, false, u32::MAX), 3.0);
    }
}
