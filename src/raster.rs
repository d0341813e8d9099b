// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::geo::{ROOT_LRLAT, ROOT_LRLON, ROOT_ULLAT, ROOT_ULLON};

/// Deepest zoom level at which map tiles are rendered.
pub const MAX_DEPTH: u32 = 7;

/// Width and height of a single rendered map tile, in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// A viewport to cover with map tiles: the requested bounding box
/// (upper-left and lower-right corners) and its on-screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterRequest {
    pub ullon: f64,
    pub ullat: f64,
    pub lrlon: f64,
    pub lrlat: f64,
    pub w: f64,
    pub h: f64,
}

/// The tile grid covering a [RasterRequest], as selected by [get_map_raster].
///
/// `grid` holds tile file names row by row, top-to-bottom and left-to-right
/// within a row, so that concatenating the tiles reconstructs the image.
/// The `ullon`/`ullat`/`lrlon`/`lrlat` corners describe the geographic box
/// actually covered by the grid, snapped outward to whole-tile boundaries.
/// When `success` is unset the request was unresolvable, the other fields
/// are meaningless and nothing should be rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterResult {
    pub ullon: f64,
    pub ullat: f64,
    pub lrlon: f64,
    pub lrlat: f64,
    pub grid: Vec<Vec<String>>,
    pub depth: u32,
    pub success: bool,
}

impl RasterResult {
    fn failed() -> Self {
        return Self::default();
    }
}

/// Selects the grid of map tiles covering the requested viewport.
///
/// The zoom depth is the coarsest one, capped at [MAX_DEPTH], whose
/// longitudinal distance per pixel does not exceed the requested one, so the
/// tiles never look blurrier than the viewport demands. At depth `d` the
/// mapped region splits into `2^d` tiles per axis; the result contains every
/// tile overlapping the request box, together with the geographic box those
/// tiles cover.
///
/// Requests with a non-positive viewport, an inverted bounding box or a
/// bounding box that lies entirely outside the mapped region are
/// unresolvable and produce a [failed](RasterResult::success) result.
pub fn get_map_raster(request: &RasterRequest) -> RasterResult {
    if request.w <= 0.0
        || request.h <= 0.0
        || request.ullon >= request.lrlon
        || request.ullat <= request.lrlat
    {
        log::debug!("unresolvable raster request (degenerate box): {:?}", request);
        return RasterResult::failed();
    }
    if request.ullon >= ROOT_LRLON
        || request.lrlon <= ROOT_ULLON
        || request.ullat <= ROOT_LRLAT
        || request.lrlat >= ROOT_ULLAT
    {
        log::debug!("unresolvable raster request (outside the region): {:?}", request);
        return RasterResult::failed();
    }

    let depth = depth_for((request.lrlon - request.ullon) / request.w);
    let tiles = 1_u32 << depth;
    let lon_span = (ROOT_LRLON - ROOT_ULLON) / tiles as f64;
    let lat_span = (ROOT_ULLAT - ROOT_LRLAT) / tiles as f64;

    // Whole tiles between each region edge and the matching request edge.
    // Left and top count directly into grid indices; right and bottom count
    // from the opposite corner and bound the grid from the far side.
    let left = tiles_before(request.ullon - ROOT_ULLON, lon_span);
    let right = tiles_before(ROOT_LRLON - request.lrlon, lon_span);
    let top = tiles_before(ROOT_ULLAT - request.ullat, lat_span);
    let bottom = tiles_before(request.lrlat - ROOT_LRLAT, lat_span);

    let grid = (top..tiles - bottom)
        .map(|y| {
            (left..tiles - right)
                .map(|x| format!("d{}_x{}_y{}.png", depth, x, y))
                .collect()
        })
        .collect();

    return RasterResult {
        ullon: ROOT_ULLON + left as f64 * lon_span,
        ullat: ROOT_ULLAT - top as f64 * lat_span,
        lrlon: ROOT_LRLON - right as f64 * lon_span,
        lrlat: ROOT_LRLAT + bottom as f64 * lat_span,
        grid,
        depth,
        success: true,
    };
}

/// Finds the coarsest depth whose longitudinal distance per pixel is no
/// larger than the requested one, capped at [MAX_DEPTH].
fn depth_for(requested_lon_dpp: f64) -> u32 {
    let mut depth = 0;
    let mut lon_dpp = (ROOT_LRLON - ROOT_ULLON) / TILE_SIZE;
    while depth < MAX_DEPTH && lon_dpp > requested_lon_dpp {
        depth += 1;
        lon_dpp *= 0.5;
    }
    return depth;
}

/// Counts the whole tile spans fitting between a region edge and a request
/// edge `offset` away, clamping at zero when the request reaches past the
/// region. The counting loop overshoots by exactly one tile, as it stops
/// only once the running boundary has crossed `offset`.
fn tiles_before(offset: f64, span: f64) -> u32 {
    let mut count: u32 = 0;
    while count as f64 * span <= offset {
        count += 1;
    }
    return count.saturating_sub(1);
}
