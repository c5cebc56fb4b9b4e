/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use fxhash::{FxHashMap, FxHashSet};

use crate::landmarks::edge_filter::EdgeFilter;
use crate::landmarks::graph::{CoreEdge, CoreGraph};

struct Frame {
    node: u32,
    neighbors: std::vec::IntoIter<u32>,
}

fn successors<G, F>(graph: &G, filter: &F, node: u32) -> Vec<u32>
where
    G: CoreGraph,
    F: EdgeFilter<G>,
{
    graph
        .edges_from(node)
        .filter(|e| filter.accept(graph, e))
        .map(|e| e.adj_node())
        .collect()
}

/// Iterative Tarjan's algorithm over `nodes`, obeying `filter`.
/// An explicit frame stack replaces the usual recursive `strongconnect` so
/// that a long chain of core nodes cannot overflow the call stack.
///
/// Run once per build with the filter
/// `InCore(fwd=false, bwd=true) ∧ blocked ∧ user_filter`; thresholding
/// components against `minimum_nodes` is the caller's job (see
/// `landmark_storage`), since that step also needs to write `UNCLEAR` into
/// the subnetwork table.
pub fn strongly_connected_components<G, F>(
    graph: &G,
    filter: &F,
    nodes: impl IntoIterator<Item = u32>,
) -> Vec<Vec<u32>>
where
    G: CoreGraph,
    F: EdgeFilter<G>,
{
    let mut index_counter: u32 = 0;
    let mut indices: FxHashMap<u32, u32> = FxHashMap::default();
    let mut lowlink: FxHashMap<u32, u32> = FxHashMap::default();
    let mut on_stack: FxHashSet<u32> = FxHashSet::default();
    let mut scc_stack: Vec<u32> = Vec::new();
    let mut components: Vec<Vec<u32>> = Vec::new();

    for start in nodes {
        if indices.contains_key(&start) {
            continue;
        }

        indices.insert(start, index_counter);
        lowlink.insert(start, index_counter);
        index_counter += 1;
        scc_stack.push(start);
        on_stack.insert(start);

        let mut work: Vec<Frame> = vec![Frame {
            node: start,
            neighbors: successors(graph, filter, start).into_iter(),
        }];

        while let Some(frame) = work.last_mut() {
            let node = frame.node;
            if let Some(next) = frame.neighbors.next() {
                if !indices.contains_key(&next) {
                    indices.insert(next, index_counter);
                    lowlink.insert(next, index_counter);
                    index_counter += 1;
                    scc_stack.push(next);
                    on_stack.insert(next);
                    work.push(Frame {
                        node: next,
                        neighbors: successors(graph, filter, next).into_iter(),
                    });
                } else if on_stack.contains(&next) {
                    let next_idx = indices[&next];
                    let updated = lowlink[&node].min(next_idx);
                    lowlink.insert(node, updated);
                }
            } else {
                work.pop();
                if let Some(parent_frame) = work.last() {
                    let parent = parent_frame.node;
                    let updated = lowlink[&parent].min(lowlink[&node]);
                    lowlink.insert(parent, updated);
                }
                if lowlink[&node] == indices[&node] {
                    let mut component = Vec::new();
                    loop {
                        let w = scc_stack.pop().expect("scc stack must contain `node`");
                        on_stack.remove(&w);
                        component.push(w);
                        if w == node {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::edge_filter::BothDirections;
    use crate::landmarks::test_support::ListGraph;

    #[test]
    fn finds_two_disconnected_components() {
        let mut graph = ListGraph::with_levels(vec![0; 5], vec![]);
        graph.add_edge(0, 1, 1.0, true, true);
        graph.add_edge(1, 2, 1.0, true, true);
        graph.add_edge(3, 4, 1.0, true, true);
        let filter = BothDirections;
        let mut components = strongly_connected_components(&graph, &filter, 0..5u32);
        for c in &mut components {
            c.sort();
        }
        components.sort();
        assert_eq!(components, vec![vec![0, 1, 2], vec![3, 4]]);
    }

    #[test]
    fn directionality_splits_a_one_way_ring() {
        // 0 -> 1 -> 2 -> 0 all one-way forward only: one SCC.
        // If instead only 0->1 and 1->2 exist (no closing edge), each node
        // is its own SCC.
        let mut graph = ListGraph::with_levels(vec![0, 0, 0], vec![]);
        graph.add_edge(0, 1, 1.0, true, false);
        graph.add_edge(1, 2, 1.0, true, false);
        let filter = crate::landmarks::edge_filter::InCore::new(0, true, false);
        let mut components = strongly_connected_components(&graph, &filter, 0..3u32);
        for c in &mut components {
            c.sort();
        }
        components.sort();
        assert_eq!(components, vec![vec![0], vec![1], vec![2]]);
    }
}
