use std::error::Error;

use clap::Parser;
use navix;

#[derive(Debug, thiserror::Error)]
#[error("cannot raster {0:?}")]
struct RasterError(navix::RasterRequest);

#[derive(Parser)]
struct Cli {
    /// Longitude of the upper-left corner of the viewport
    ullon: f64,

    /// Latitude of the upper-left corner of the viewport
    ullat: f64,

    /// Longitude of the lower-right corner of the viewport
    lrlon: f64,

    /// Latitude of the lower-right corner of the viewport
    lrlat: f64,

    /// Width of the viewport, in pixels
    width: f64,

    /// Height of the viewport, in pixels
    height: f64,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let request = navix::RasterRequest {
        ullon: cli.ullon,
        ullat: cli.ullat,
        lrlon: cli.lrlon,
        lrlat: cli.lrlat,
        w: cli.width,
        h: cli.height,
    };

    let result = navix::get_map_raster(&request);
    if !result.success {
        return Err(Box::new(RasterError(request)));
    }

    log::info!(
        "selected {} tiles at depth {}",
        result.grid.iter().map(Vec::len).sum::<usize>(),
        result.depth
    );

    println!("{{");
    println!("  \"render_grid\": [");

    let mut rows = result.grid.iter().peekable();
    while let Some(row) = rows.next() {
        let row_suffix = if rows.peek().is_some() { "," } else { "" };
        let mut tiles = row.iter().peekable();
        print!("    [");
        while let Some(tile) = tiles.next() {
            let suffix = if tiles.peek().is_some() { ", " } else { "" };
            print!("\"{}\"{}", tile, suffix);
        }
        println!("]{}", row_suffix);
    }

    println!("  ],");
    println!("  \"raster_ul_lon\": {},", result.ullon);
    println!("  \"raster_ul_lat\": {},", result.ullat);
    println!("  \"raster_lr_lon\": {},", result.lrlon);
    println!("  \"raster_lr_lat\": {},", result.lrlat);
    println!("  \"depth\": {},", result.depth);
    println!("  \"query_success\": true");
    println!("}}");

    Ok(())
}
