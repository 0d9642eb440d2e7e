use crate::graph::debt_graph::DebtGraph;
use crate::graph::error::GraphError;
use std::collections::{BTreeMap, HashMap};

/// Disjoint-set forest over the vertices `0..n`.
///
/// `find` compresses paths iteratively and `union` attaches the smaller
/// tree under the larger one. Vertices outside `0..n` are rejected with
/// [`GraphError::InvalidVertex`].
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    pub fn new(vertices: usize) -> Self {
        Self {
            parent: (0..vertices).collect(),
            size: vec![1; vertices],
        }
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if vertex >= self.parent.len() {
            return Err(GraphError::InvalidVertex {
                vertex,
                vertex_count: self.parent.len(),
            });
        }
        Ok(())
    }

    /// Representative of the set containing `vertex`.
    pub fn find(&mut self, vertex: usize) -> Result<usize, GraphError> {
        self.check_vertex(vertex)?;
        Ok(self.root(vertex))
    }

    fn root(&mut self, vertex: usize) -> usize {
        let mut root = vertex;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = vertex;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`.
    pub fn union(&mut self, a: usize, b: usize) -> Result<(), GraphError> {
        let mut a = self.find(a)?;
        let mut b = self.find(b)?;
        if a == b {
            return Ok(());
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
        Ok(())
    }

    /// Size of the set containing `vertex`.
    pub fn set_size(&mut self, vertex: usize) -> Result<usize, GraphError> {
        let root = self.find(vertex)?;
        Ok(self.size[root])
    }
}

/// Split a graph into its connected components.
///
/// Each component is returned as its own graph with the original vertex
/// count and indices, so components can be merged back without remapping.
/// Components are ordered by their smallest vertex; isolated vertices
/// belong to no component.
pub fn split_graph(graph: &DebtGraph) -> Result<Vec<DebtGraph>, GraphError> {
    // the forest only covers vertices that carry edges
    let slots: HashMap<usize, usize> = graph
        .active_vertices()
        .enumerate()
        .map(|(slot, vertex)| (vertex, slot))
        .collect();
    let edges = graph.edges();

    let mut uf = UnionFind::new(slots.len());
    for edge in &edges {
        uf.union(slots[&edge.from], slots[&edge.to])?;
    }

    // root -> component; ordered by first appearance of the root's vertices
    let mut order: Vec<usize> = Vec::new();
    let mut components: BTreeMap<usize, DebtGraph> = BTreeMap::new();
    for edge in edges {
        let root = uf.find(slots[&edge.from])?;
        let component = components.entry(root).or_insert_with(|| {
            order.push(root);
            DebtGraph::new(graph.vertex_count())
        });
        component.add_edge(edge.from, edge.to, edge.weight)?;
    }

    Ok(order
        .into_iter()
        .filter_map(|root| components.remove(&root))
        .collect())
}
