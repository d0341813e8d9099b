// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions which may occur during [shortest_path](crate::shortest_path),
/// [route_directions](crate::route_directions) or [KdTree::nearest](crate::KdTree::nearest).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Nearest-vertex lookup was attempted on a [KdTree](crate::KdTree)
    /// indexing no vertices.
    #[error("spatial index contains no vertices")]
    EmptyIndex,

    /// A vertex id does not exist in the graph, e.g. when the spatial index
    /// was built over a different vertex set, or a route references a vertex
    /// that was never loaded.
    #[error("unknown vertex: {0}")]
    UnknownVertex(i64),

    /// A direction string does not follow the canonical
    /// `"<action> on <way> and continue for <distance> miles."` format.
    #[error("malformed direction: {0:?}")]
    MalformedDirection(String),
}
