// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Route and map-view computation over a road-network graph.
//!
//! The graph is a set of [Vertices](Vertex) connected by named [Ways](Way).
//! A [KdTree] built over the vertex set snaps raw click coordinates to the
//! closest vertex, [shortest_path] runs A* between two such snapped
//! endpoints, and [route_directions] summarizes the resulting route as
//! turn-by-turn instructions. Independently of the graph, [get_map_raster]
//! selects the grid of pre-rendered map tiles covering a requested viewport
//! at the coarsest sufficient zoom depth.
//!
//! Parsing raw map data is out of scope: an external loader is expected to
//! deliver vertices and ways through [Graph::set_vertex] and [Graph::add_way].
//!
//! # Example
//!
//! ```
//! let mut g = navix::Graph::default();
//! g.set_vertex(navix::Vertex::new(1, 37.8750, -122.2600));
//! g.set_vertex(navix::Vertex::new(2, 37.8755, -122.2595));
//!
//! let mut way = navix::Way::new(10);
//! way.name = Some("Hearst Avenue".to_string());
//! way.vertex_ids = vec![1, 2];
//! way.valid = true;
//! assert!(g.add_way(way));
//!
//! let index = navix::KdTree::from_vertices(g.iter());
//! let route = navix::shortest_path(&g, &index, -122.2601, 37.8749, -122.2594, 37.8756)
//!     .expect("failed to find route");
//! assert_eq!(route, vec![1, 2]);
//!
//! let directions = navix::route_directions(&g, &route).expect("failed to describe route");
//! assert_eq!(directions.len(), 1);
//! println!("{}", directions[0]);
//! ```

mod geo;
mod graph;
mod kd;
mod raster;
mod router;

pub use geo::{bearing, bearing_change, earth_distance, project_to_x, project_to_y};
pub use geo::{ROOT_LRLAT, ROOT_LRLON, ROOT_ULLAT, ROOT_ULLON};
pub use graph::Graph;
pub use kd::KdTree;
pub use raster::{get_map_raster, RasterRequest, RasterResult, MAX_DEPTH, TILE_SIZE};
pub use router::{
    route_directions, shortest_path, Maneuver, NavigationDirection, RouteError, UNKNOWN_ROAD,
};

/// Represents a single point of the road network, an element of the [Graph].
///
/// Vertices are addressed by their id; connections between them are derived
/// by the [Graph] from accepted [Ways](Way) and kept per vertex (see
/// [Graph::adjacent]), as id back-references rather than pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
}

impl Vertex {
    /// Creates an unnamed Vertex at the given position.
    pub fn new(id: i64, lat: f64, lon: f64) -> Self {
        Self {
            id,
            lat,
            lon,
            name: None,
        }
    }
}

/// Represents a named road or path: an ordered polyline over [Vertices](Vertex).
///
/// Ways are built up incrementally by an external loader and only become
/// usable once fully constructed, which the loader marks by setting `valid`.
/// [Graph::add_way] discards ways whose `valid` flag is unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Way {
    pub id: i64,
    pub name: Option<String>,
    pub valid: bool,
    pub max_speed: Option<String>,
    pub vertex_ids: Vec<i64>,
}

impl Way {
    /// Creates an empty, not-yet-valid Way with the given id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}
