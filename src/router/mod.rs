// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod directions;
mod error;
mod search;

pub use directions::{route_directions, Maneuver, NavigationDirection, UNKNOWN_ROAD};
pub use error::RouteError;
pub use search::shortest_path;
