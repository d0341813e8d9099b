// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::geo::{project_to_x, project_to_y};
use crate::{Vertex, Way};
use std::collections::btree_map::{BTreeMap, Entry};

/// Represents a road network as a set of [Vertices](Vertex) connected by
/// named [Ways](Way).
///
/// Adjacency between vertices is derived state: [Graph::add_way] extends it
/// from every accepted way, in both directions, and only ever with ids of
/// existing vertices. The graph is meant to be loaded once and queried
/// afterwards; it takes no locks, so concurrent queries are fine as long as
/// nothing mutates it at the same time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    vertices: BTreeMap<i64, (Vertex, Vec<i64>)>,
    ways: BTreeMap<i64, Way>,
    way_of_edge: BTreeMap<(i64, i64), i64>,
}

impl Graph {
    /// Returns the number of vertices in the graph.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns an iterator over all [Vertices](Vertex) in the graph,
    /// in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values().map(|(vertex, _)| vertex)
    }

    /// Retrieves a [Vertex] with the provided id.
    pub fn get_vertex(&self, id: i64) -> Option<&Vertex> {
        self.vertices.get(&id).map(|(vertex, _)| vertex)
    }

    /// Creates or updates a [Vertex] with `vertex.id`.
    ///
    /// The adjacency derived from previously accepted ways is preserved.
    pub fn set_vertex(&mut self, vertex: Vertex) {
        match self.vertices.entry(vertex.id) {
            Entry::Vacant(e) => {
                e.insert((vertex, Vec::default()));
            }
            Entry::Occupied(mut e) => {
                debug_assert_eq!(e.get().0.id, vertex.id);
                e.get_mut().0 = vertex;
            }
        }
    }

    /// Accepts a [Way], connecting the vertices along it.
    ///
    /// Every pair of consecutive vertices on the way becomes adjacent, in
    /// both directions. Ids that don't resolve to a vertex of this graph are
    /// dropped from the way; the way itself is stored with the ids that
    /// remain. Returns false, discarding the way, when its `valid` flag is
    /// unset or when fewer than two of its vertices are known, as such a way
    /// connects nothing.
    pub fn add_way(&mut self, way: Way) -> bool {
        if !way.valid {
            log::debug!("discarding invalid way {}", way.id);
            return false;
        }

        let vertex_ids: Vec<i64> = way
            .vertex_ids
            .iter()
            .copied()
            .filter(|id| self.vertices.contains_key(id))
            .collect();
        if vertex_ids.len() < 2 {
            log::debug!("discarding way {}: fewer than 2 of its vertices exist", way.id);
            return false;
        }

        for pair in vertex_ids.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a == b {
                continue;
            }
            self.add_adjacent(a, b);
            self.add_adjacent(b, a);
            self.way_of_edge.insert((a.min(b), a.max(b)), way.id);
        }

        let way = Way { vertex_ids, ..way };
        self.ways.insert(way.id, way);
        true
    }

    /// Gets the ids of all [Vertices](Vertex) adjacent to a vertex with
    /// a given id.
    pub fn adjacent(&self, id: i64) -> &[i64] {
        self.vertices
            .get(&id)
            .map(|(_, adjacent)| adjacent.as_slice())
            .unwrap_or_default()
    }

    /// Retrieves a [Way] with the provided id, as stored by [Graph::add_way].
    pub fn get_way(&self, id: i64) -> Option<&Way> {
        self.ways.get(&id)
    }

    /// Returns an iterator over all accepted [Ways](Way), in ascending
    /// id order.
    pub fn ways(&self) -> impl Iterator<Item = &Way> {
        self.ways.values()
    }

    /// Gets the [Way] connecting two adjacent vertices, in either direction.
    /// When multiple accepted ways connect the same pair, the most recently
    /// accepted one wins.
    pub fn way_between(&self, a: i64, b: i64) -> Option<&Way> {
        let id = self.way_of_edge.get(&(a.min(b), a.max(b)))?;
        self.ways.get(id)
    }

    /// Finds the closest [Vertex] to the given position, comparing euclidean
    /// distances between projected planar coordinates. Ties are broken
    /// towards the lowest id, consistently with [KdTree::nearest](crate::KdTree::nearest).
    ///
    /// This function requires computing the distance to every [Vertex] in
    /// the graph, and is not suitable for large graphs; build a
    /// [KdTree](crate::KdTree) for those instead.
    pub fn find_nearest_vertex(&self, lon: f64, lat: f64) -> Option<&Vertex> {
        let x = project_to_x(lon, lat);
        let y = project_to_y(lon, lat);
        self.vertices
            .values()
            .map(|(vertex, _)| {
                let dx = project_to_x(vertex.lon, vertex.lat) - x;
                let dy = project_to_y(vertex.lon, vertex.lat) - y;
                (dx * dx + dy * dy, vertex)
            })
            .min_by(|(a_dist, a), (b_dist, b)| {
                a_dist.total_cmp(b_dist).then_with(|| a.id.cmp(&b.id))
            })
            .map(|(_, vertex)| vertex)
    }

    fn add_adjacent(&mut self, from: i64, to: i64) {
        if let Some((_, adjacent)) = self.vertices.get_mut(&from) {
            if !adjacent.contains(&to) {
                adjacent.push(to);
            }
        }
    }
}
