//! Minimal in-memory `CoreGraph`/`Weighting` fixture for integration tests,
//! independent of the crate's own `#[cfg(test)]`-only fixture since
//! integration tests link against the compiled library, not its test cfg.

use core_landmarks::{CoreEdge, CoreGraph, CoreNodeIdMap, Weighting};

#[derive(Clone, Copy, Debug)]
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
    adjacency: Vec<Vec<usize>>,
    lat_lon: Vec<(f64, f64)>,
}

impl ListGraph {
    pub fn with_levels(levels: Vec<i32>, edges: Vec<(u32, u32, f64)>) -> Self {
        let lat_lon = (0..levels.len()).map(|n| (n as f64, n as f64)).collect();
        let mut g = Self {
            adjacency: vec![Vec::new(); levels.len()],
            levels,
            records: Vec::new(),
            lat_lon,
        };
        for (a, b, w) in edges {
            g.add_edge(a, b, w, true, true);
        }
        g
    }

    pub fn set_lat_lon(&mut self, node: u32, lat: f64, lon: f64) {
        self.lat_lon[node as usize] = (lat, lon);
    }

    pub fn add_edge(&mut self, a: u32, b: u32, weight: f64, fwd: bool, bwd: bool) -> u32 {
        let id = self.records.len() as u32;
        let idx = self.records.len();
        self.records.push(Record { id, a, b, weight, shortcut: None, fwd, bwd });
        self.adjacency[a as usize].push(idx);
        self.adjacency[b as usize].push(idx);
        id
    }

    fn view_from(&self, idx: usize, base: u32) -> ListEdge {
        let r = &self.records[idx];
        let (adj, fwd, bwd) = if r.a == base { (r.b, r.fwd, r.bwd) } else { (r.a, r.bwd, r.fwd) };
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
        let core_level = CoreNodeIdMap::core_level(self.node_count());
        self.levels.iter().filter(|&&l| l >= core_level).count() as i32
    }

    fn get_level(&self, node: u32) -> i32 {
        self.levels[node as usize]
    }

    fn lat_lon(&self, node: u32) -> (f64, f64) {
        self.lat_lon[node as usize]
    }

    fn edges_from(&self, node: u32) -> Self::EdgeIter<'_> {
        let edges: Vec<ListEdge> = self.adjacency[node as usize].iter().map(|&idx| self.view_from(idx, node)).collect();
        edges.into_iter()
    }

    fn edge_state(&self, edge_id: u32, adj_node: u32) -> Self::Edge {
        self.view_from(edge_id as usize, adj_node)
    }
}

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

pub struct NoFilter;
impl<G: CoreGraph> core_landmarks::EdgeFilter<G> for NoFilter {
    fn accept(&self, _graph: &G, _edge: &G::Edge) -> bool {
        true
    }
}
