// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use super::RouteError;
use crate::geo::{bearing, bearing_change, earth_distance};
use crate::Graph;

/// Substitute name for [Ways](crate::Way) without one, used in
/// [NavigationDirection::way].
pub const UNKNOWN_ROAD: &str = "unknown road";

/// The turn category of a [NavigationDirection], classified from the change
/// of heading between two consecutive route segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Right,
    Left,
    SharpLeft,
    SharpRight,
}

impl Maneuver {
    /// Every maneuver, in label lookup order.
    pub const ALL: [Maneuver; 8] = [
        Maneuver::Start,
        Maneuver::Straight,
        Maneuver::SlightLeft,
        Maneuver::SlightRight,
        Maneuver::Right,
        Maneuver::Left,
        Maneuver::SharpLeft,
        Maneuver::SharpRight,
    ];

    /// Returns the canonical human-readable label of this maneuver.
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Straight => "Go straight",
            Self::SlightLeft => "Slight left",
            Self::SlightRight => "Slight right",
            Self::Right => "Turn right",
            Self::Left => "Turn left",
            Self::SharpLeft => "Sharp left",
            Self::SharpRight => "Sharp right",
        }
    }

    /// Returns the maneuver carrying the given canonical label, if any.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.label() == label)
    }

    /// Classifies a signed change of heading, in degrees, into a turn
    /// category: up to 15° counts as going straight, up to 30° as a slight
    /// turn, up to 100° as a turn and anything beyond as a sharp turn.
    /// Negative changes turn left, positive right.
    pub fn from_bearing_change(delta: f64) -> Self {
        let magnitude = delta.abs();
        if magnitude < 15.0 {
            Self::Straight
        } else if magnitude < 30.0 {
            if delta < 0.0 {
                Self::SlightLeft
            } else {
                Self::SlightRight
            }
        } else if magnitude < 100.0 {
            if delta < 0.0 {
                Self::Left
            } else {
                Self::Right
            }
        } else if delta < 0.0 {
            Self::SharpLeft
        } else {
            Self::SharpRight
        }
    }
}

/// A single turn-by-turn instruction: perform [NavigationDirection::maneuver],
/// then follow [NavigationDirection::way] for [NavigationDirection::distance]
/// miles.
///
/// The canonical text form,
/// `"<action> on <way> and continue for <distance> miles."` with the
/// distance printed to 3 decimal places, is produced by [fmt::Display] and
/// inverted by [FromStr]; parsing rejects anything else with
/// [RouteError::MalformedDirection].
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationDirection {
    pub maneuver: Maneuver,
    pub way: String,
    pub distance: f64,
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} and continue for {:.3} miles.",
            self.maneuver.label(),
            self.way,
            self.distance
        )
    }
}

impl FromStr for NavigationDirection {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RouteError::MalformedDirection(s.to_string());

        let body = s.strip_suffix(" miles.").ok_or_else(malformed)?;

        // The way name is free-form and may itself contain the separator,
        // so the distance is anchored on the separator's last occurrence.
        let (body, distance) = body
            .rsplit_once(" and continue for ")
            .ok_or_else(malformed)?;
        if distance.is_empty() || !distance.bytes().all(|c| c.is_ascii_digit() || c == b'.') {
            return Err(malformed());
        }
        let distance: f64 = distance.parse().map_err(|_| malformed())?;

        // No label is a prefix of another, so at most one can match.
        let (maneuver, way) = Maneuver::ALL
            .iter()
            .find_map(|&m| {
                body.strip_prefix(m.label())
                    .and_then(|rest| rest.strip_prefix(" on "))
                    .map(|way| (m, way))
            })
            .ok_or_else(malformed)?;

        Ok(Self {
            maneuver,
            way: way.to_string(),
            distance,
        })
    }
}

/// Summarizes a route, as returned by [shortest_path](super::shortest_path),
/// into an ordered list of turn-by-turn instructions.
///
/// Consecutive route segments are grouped by way name, [UNKNOWN_ROAD]
/// standing in for unnamed ways; every change of name emits an instruction
/// whose maneuver classifies the change of heading at the transition. The
/// first instruction is always a [Maneuver::Start]. Routes with fewer than
/// two vertices have nothing to traverse and produce an empty list.
pub fn route_directions(
    g: &Graph,
    route: &[i64],
) -> Result<Vec<NavigationDirection>, RouteError> {
    let mut directions = Vec::default();
    if route.len() < 2 {
        return Ok(directions);
    }

    let first = g
        .get_vertex(route[0])
        .ok_or(RouteError::UnknownVertex(route[0]))?;
    let second = g
        .get_vertex(route[1])
        .ok_or(RouteError::UnknownVertex(route[1]))?;

    let mut current = NavigationDirection {
        maneuver: Maneuver::Start,
        way: way_name(g, route[0], route[1]),
        distance: 0.0,
    };
    let mut last_heading = bearing(first.lat, first.lon, second.lat, second.lon);

    for pair in route.windows(2) {
        let from = g
            .get_vertex(pair[0])
            .ok_or(RouteError::UnknownVertex(pair[0]))?;
        let to = g
            .get_vertex(pair[1])
            .ok_or(RouteError::UnknownVertex(pair[1]))?;
        let heading = bearing(from.lat, from.lon, to.lat, to.lon);
        let name = way_name(g, pair[0], pair[1]);

        if name != current.way {
            let maneuver = Maneuver::from_bearing_change(bearing_change(last_heading, heading));
            directions.push(std::mem::replace(
                &mut current,
                NavigationDirection {
                    maneuver,
                    way: name,
                    distance: 0.0,
                },
            ));
        }

        current.distance += earth_distance(from.lat, from.lon, to.lat, to.lon);
        last_heading = heading;
    }

    directions.push(current);
    Ok(directions)
}

fn way_name(g: &Graph, a: i64, b: i64) -> String {
    g.way_between(a, b)
        .and_then(|way| way.name.clone())
        .unwrap_or_else(|| UNKNOWN_ROAD.to_string())
}
