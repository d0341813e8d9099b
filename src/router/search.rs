// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap, HashSet};

use super::RouteError;
use crate::geo::{earth_distance, project_to_x, project_to_y};
use crate::{Graph, KdTree};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    cost: f64,
    score: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.score.eq(&other.score)
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for QueueItem {}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.score.total_cmp(&self.score)
    }
}

fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&id) = came_from.get(&last) {
        path.push(id);
        last = id;
    }

    path.reverse();
    return path;
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between the graph vertices closest to the two
/// given positions.
///
/// Both endpoints are snapped through the provided [KdTree], which must have
/// been built over this graph's vertices; the returned route starts and ends
/// on the snapped vertices. Edge costs and the heuristic both use
/// [earth_distance](crate::earth_distance), keeping the heuristic admissible
/// and the found route optimal.
///
/// Returns an empty vector if no route connects the two endpoints. This is
/// distinct from both positions snapping to one and the same vertex, which
/// yields a single-element route.
pub fn shortest_path(
    g: &Graph,
    index: &KdTree,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
) -> Result<Vec<i64>, RouteError> {
    let from_id = index.nearest(
        project_to_x(start_lon, start_lat),
        project_to_y(start_lon, start_lat),
    )?;
    let to_id = index.nearest(
        project_to_x(dest_lon, dest_lat),
        project_to_y(dest_lon, dest_lat),
    )?;

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut best: HashMap<i64, f64> = HashMap::default();
    let mut settled: HashSet<i64> = HashSet::default();

    let to_vertex = g.get_vertex(to_id).ok_or(RouteError::UnknownVertex(to_id))?;

    {
        let from_vertex = g
            .get_vertex(from_id)
            .ok_or(RouteError::UnknownVertex(from_id))?;

        let initial_distance =
            earth_distance(from_vertex.lat, from_vertex.lon, to_vertex.lat, to_vertex.lon);

        queue.push(QueueItem {
            at: from_id,
            cost: 0.0,
            score: initial_distance,
        });
        best.insert(from_id, 0.0);
    }

    while let Some(item) = queue.pop() {
        if item.at == to_id {
            return Ok(reconstruct_path(&came_from, to_id));
        }

        // A vertex may sit in the queue multiple times with different
        // scores; only its first, cheapest pop may expand it.
        if !settled.insert(item.at) {
            continue;
        }

        let vertex = match g.get_vertex(item.at) {
            Some(vertex) => vertex,
            None => continue,
        };

        for &neighbor_id in g.adjacent(item.at) {
            if settled.contains(&neighbor_id) {
                continue;
            }

            // Check if the referred vertex exists
            if let Some(neighbor) = g.get_vertex(neighbor_id) {
                // Check if this is the cheapest way to the neighbor
                let neighbor_cost = item.cost
                    + earth_distance(vertex.lat, vertex.lon, neighbor.lat, neighbor.lon);
                if neighbor_cost >= best.get(&neighbor_id).copied().unwrap_or(f64::INFINITY) {
                    continue;
                }

                // Push the new item into the queue
                came_from.insert(neighbor_id, item.at);
                best.insert(neighbor_id, neighbor_cost);
                queue.push(QueueItem {
                    at: neighbor_id,
                    cost: neighbor_cost,
                    score: neighbor_cost
                        + earth_distance(neighbor.lat, neighbor.lon, to_vertex.lat, to_vertex.lon),
                });
            }
        }
    }

    return Ok(vec![]);
}
