// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::geo::{project_to_x, project_to_y};
use crate::{RouteError, Vertex};

/// KdTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up nearest-neighbor search for large datasets. Practice shows
/// that [crate::Graph::find_nearest_vertex] takes significantly more time than
/// [crate::shortest_path] when snapping endpoints for multiple routes. A k-d tree
/// can help with that, trading memory usage for CPU time.
///
/// The tree is built over projected planar coordinates and assumes euclidean
/// geometry; queries must project through the same [project_to_x](crate::project_to_x) /
/// [project_to_y](crate::project_to_y) pair used by the build.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    root: Option<Box<KdTreeNode>>,
}

#[derive(Debug, Clone)]
struct KdTreeNode {
    x: f64,
    y: f64,
    id: i64,
    left: Option<Box<KdTreeNode>>,
    right: Option<Box<KdTreeNode>>,
}

/// A [Vertex] reduced to its projected planar position, the unit of
/// tree construction.
#[derive(Debug, Clone, Copy)]
struct ProjectedVertex {
    x: f64,
    y: f64,
    id: i64,
}

impl KdTree {
    /// Builds a k-d tree over the projected positions of an iterable of
    /// [Vertices](Vertex), e.g. straight from [crate::Graph::iter].
    pub fn from_vertices<'a, I: IntoIterator<Item = &'a Vertex>>(vertices: I) -> Self {
        let mut nodes = vertices
            .into_iter()
            .map(|vertex| ProjectedVertex {
                x: project_to_x(vertex.lon, vertex.lat),
                y: project_to_y(vertex.lon, vertex.lat),
                id: vertex.id,
            })
            .collect::<Vec<_>>();
        Self {
            root: box_option(Self::build_impl(nodes.as_mut_slice(), false)),
        }
    }

    /// Returns true if the tree indexes no vertices.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Finds the id of the indexed [Vertex] closest to the given projected
    /// position, in euclidean terms.
    ///
    /// Equally distant vertices tie-break towards the lowest id, making the
    /// answer independent of the order the tree was built from.
    pub fn nearest(&self, x: f64, y: f64) -> Result<i64, RouteError> {
        match self.root {
            Some(ref root) => Ok(root.find_nearest_impl(x, y, false).0),
            None => Err(RouteError::EmptyIndex),
        }
    }

    fn build_impl(nodes: &mut [ProjectedVertex], y_divides: bool) -> Option<KdTreeNode> {
        match nodes.len() {
            0 => None,
            1 => Some(KdTreeNode {
                x: nodes[0].x,
                y: nodes[0].y,
                id: nodes[0].id,
                left: None,
                right: None,
            }),
            _ => {
                // Median by sorted position; the sort is stable, so repeated
                // coordinates partition deterministically.
                if y_divides {
                    nodes.sort_by(|a, b| a.y.total_cmp(&b.y));
                } else {
                    nodes.sort_by(|a, b| a.x.total_cmp(&b.x));
                }
                let median = nodes.len() / 2;
                let pivot = nodes[median];
                let (left, right_and_pivot) = nodes.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(KdTreeNode {
                    x: pivot.x,
                    y: pivot.y,
                    id: pivot.id,
                    left: box_option(Self::build_impl(left, !y_divides)),
                    right: box_option(Self::build_impl(right, !y_divides)),
                })
            }
        }
    }
}

impl KdTreeNode {
    fn find_nearest_impl(&self, x: f64, y: f64, y_divides: bool) -> (i64, f64) {
        // Start by assuming that this node is the closest
        let mut best_id = self.id;
        let mut best_dist = distance_sq(x, y, self.x, self.y);

        // Select which branch to recurse into first
        let first_left = if y_divides { y < self.y } else { x < self.x };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(ref branch) = first {
            let (alt_id, alt_dist) = branch.find_nearest_impl(x, y, !y_divides);
            if alt_dist < best_dist || (alt_dist == best_dist && alt_id < best_id) {
                best_id = alt_id;
                best_dist = alt_dist;
            }
        }

        // (Optionally) recurse into the second branch
        if let Some(ref branch) = second {
            // A winning node is possible in the second branch if and only if
            // the splitting axis is no further away than the current best
            // candidate. Equally far still counts: the branch may hold an
            // equally distant node with a lower id.
            let dist_to_axis_sq = if y_divides {
                (y - self.y) * (y - self.y)
            } else {
                (x - self.x) * (x - self.x)
            };

            if dist_to_axis_sq <= best_dist {
                let (alt_id, alt_dist) = branch.find_nearest_impl(x, y, !y_divides);
                if alt_dist < best_dist || (alt_dist == best_dist && alt_id < best_id) {
                    best_id = alt_id;
                    best_dist = alt_dist;
                }
            }
        }

        return (best_id, best_dist);
    }
}

#[inline]
fn distance_sq(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    dx * dx + dy * dy
}

#[inline]
fn box_option<T>(o: Option<T>) -> Option<Box<T>> {
    o.map(|thing| Box::new(thing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{ROOT_LRLAT, ROOT_LRLON, ROOT_ULLAT, ROOT_ULLON};
    use crate::Graph;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    /// Offsets an id + lat/lon offset grid into the map region.
    fn grid_vertices(offsets: &[(i64, f64, f64)]) -> Vec<Vertex> {
        offsets
            .iter()
            .map(|&(id, lat, lon)| Vertex::new(id, 37.83 + lat, -122.30 + lon))
            .collect()
    }

    fn nearest_to(tree: &KdTree, lat: f64, lon: f64) -> i64 {
        tree.nearest(project_to_x(lon, lat), project_to_y(lon, lat))
            .expect("nearest on a non-empty tree must not fail")
    }

    #[test]
    fn kd_tree() {
        let vertices = grid_vertices(&[
            (1, 0.01, 0.01),
            (2, 0.01, 0.05),
            (3, 0.03, 0.09),
            (4, 0.04, 0.03),
            (5, 0.04, 0.07),
            (6, 0.07, 0.03),
            (7, 0.07, 0.01),
            (8, 0.08, 0.05),
            (9, 0.08, 0.09),
        ]);
        let tree = KdTree::from_vertices(&vertices);

        assert_eq!(nearest_to(&tree, 37.83 + 0.02, -122.30 + 0.02), 1);
        assert_eq!(nearest_to(&tree, 37.83 + 0.05, -122.30 + 0.03), 4);
        assert_eq!(nearest_to(&tree, 37.83 + 0.05, -122.30 + 0.08), 5);
        assert_eq!(nearest_to(&tree, 37.83 + 0.09, -122.30 + 0.06), 8);
    }

    #[test]
    fn empty_tree_fails_explicitly() {
        let tree = KdTree::from_vertices([]);
        assert!(tree.is_empty());
        assert_eq!(tree.nearest(0.0, 0.0), Err(RouteError::EmptyIndex));
    }

    #[test]
    fn single_vertex_always_wins() {
        let vertices = vec![Vertex::new(42, 37.8600, -122.2500)];
        let tree = KdTree::from_vertices(&vertices);
        assert_eq!(nearest_to(&tree, 37.8921, -122.2997), 42);
        assert_eq!(nearest_to(&tree, 37.8320, -122.2120), 42);
    }

    #[test]
    fn repeated_coordinates_resolve_to_the_lowest_id() {
        let vertices = grid_vertices(&[
            (7, 0.02, 0.02),
            (3, 0.02, 0.02),
            (5, 0.02, 0.02),
            (9, 0.06, 0.06),
        ]);
        let tree = KdTree::from_vertices(&vertices);
        assert_eq!(nearest_to(&tree, 37.83 + 0.02, -122.30 + 0.02), 3);
        assert_eq!(nearest_to(&tree, 37.83 + 0.03, -122.30 + 0.01), 3);
    }

    fn random_vertices(rng: &mut SmallRng, count: usize) -> Vec<Vertex> {
        let mut vertices = (0..count as i64)
            .map(|id| {
                Vertex::new(
                    id,
                    rng.gen_range(ROOT_LRLAT..ROOT_ULLAT),
                    rng.gen_range(ROOT_ULLON..ROOT_LRLON),
                )
            })
            .collect::<Vec<_>>();
        // Force a duplicate-coordinate collision
        if count >= 2 {
            let duplicated = Vertex {
                id: count as i64,
                ..vertices[0].clone()
            };
            vertices.push(duplicated);
        }
        vertices
    }

    #[test]
    fn nearest_matches_brute_force() {
        let mut rng = SmallRng::seed_from_u64(0x6B64);
        for count in [1_usize, 2, 3, 10, 117] {
            let vertices = random_vertices(&mut rng, count);
            let tree = KdTree::from_vertices(&vertices);

            let mut g = Graph::default();
            for vertex in &vertices {
                g.set_vertex(vertex.clone());
            }

            for _ in 0..50 {
                let lat = rng.gen_range(ROOT_LRLAT..ROOT_ULLAT);
                let lon = rng.gen_range(ROOT_ULLON..ROOT_LRLON);
                let expected = g.find_nearest_vertex(lon, lat).unwrap().id;
                assert_eq!(nearest_to(&tree, lat, lon), expected);
            }

            // Queries sitting exactly on an indexed position
            for vertex in &vertices {
                let expected = g.find_nearest_vertex(vertex.lon, vertex.lat).unwrap().id;
                assert_eq!(nearest_to(&tree, vertex.lat, vertex.lon), expected);
            }
        }
    }

    #[test]
    fn build_order_does_not_change_answers() {
        let mut rng = SmallRng::seed_from_u64(0xF00D);
        let mut vertices = random_vertices(&mut rng, 60);
        let tree = KdTree::from_vertices(&vertices);

        for _ in 0..10 {
            vertices.shuffle(&mut rng);
            let permuted = KdTree::from_vertices(&vertices);
            for _ in 0..30 {
                let lat = rng.gen_range(ROOT_LRLAT..ROOT_ULLAT);
                let lon = rng.gen_range(ROOT_ULLON..ROOT_LRLON);
                assert_eq!(nearest_to(&permuted, lat, lon), nearest_to(&tree, lat, lon));
            }
        }
    }
}
