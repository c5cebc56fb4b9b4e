/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use roaring::RoaringBitmap;

use crate::landmarks::graph::{CoreEdge, CoreGraph, SpatialRuleLookup};

/// Scans every edge of `graph` and collects the ids of edges whose
/// endpoints fall under different spatial rule regions. Returns
/// an empty set when no lookup is configured, since border detection is an
/// optional refinement on top of plain Tarjan filtering.
pub fn detect_border_edges<G: CoreGraph>(
    graph: &G,
    lookup: Option<&dyn SpatialRuleLookup>,
) -> RoaringBitmap {
    let mut borders = RoaringBitmap::new();
    let Some(lookup) = lookup else {
        return borders;
    };
    if lookup.size() == 0 {
        return borders;
    }

    for node in 0..graph.node_count() as u32 {
        for edge in graph.edges_from(node) {
            // every edge is visited twice (once from each endpoint); only
            // emit it once, when seen from its lower-numbered endpoint.
            if edge.base_node() > edge.adj_node() {
                continue;
            }
            let (base_lat, base_lon) = graph.lat_lon(edge.base_node());
            let (adj_lat, adj_lon) = graph.lat_lon(edge.adj_node());
            let base_rule = lookup.lookup_rule(base_lat, base_lon);
            let adj_rule = lookup.lookup_rule(adj_lat, adj_lon);
            if base_rule != adj_rule {
                borders.insert(edge.edge_id());
            }
        }
    }
    borders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::test_support::ListGraph;

    struct TwoRules;
    impl SpatialRuleLookup for TwoRules {
        fn lookup_rule(&self, lat: f64, _lon: f64) -> u32 {
            if lat < 2.0 {
                0
            } else {
                1
            }
        }
        fn size(&self) -> i32 {
            2
        }
    }

    #[test]
    fn no_lookup_yields_empty_set() {
        let mut graph = ListGraph::with_levels(vec![0, 0], vec![]);
        graph.add_edge(0, 1, 1.0, true, true);
        assert!(detect_border_edges(&graph, None).is_empty());
    }

    #[test]
    fn finds_edges_crossing_rule_boundary() {
        // lat_lon(node) == (node, node) in ListGraph, so node ids 0,1 are
        // rule 0 and node ids 2,3 are rule 1.
        let mut graph = ListGraph::with_levels(vec![0, 0, 0, 0], vec![]);
        let e_inside = graph.add_edge(0, 1, 1.0, true, true);
        let e_border = graph.add_edge(1, 2, 1.0, true, true);
        let _ = graph.add_edge(2, 3, 1.0, true, true);

        let borders = detect_border_edges(&graph, Some(&TwoRules));
        assert!(borders.contains(e_border));
        assert!(!borders.contains(e_inside));
    }
}
