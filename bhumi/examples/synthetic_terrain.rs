//! Synthetic terrain example using the TraversabilityMap API.
//!
//! Builds an elevation map with a ramp, a ditch and a wall, runs one update
//! cycle and checks a few footprint paths across it.
//!
//! Usage:
//!   cargo run --example synthetic_terrain
//!   cargo run --example synthetic_terrain -- --config configs/traversability.yaml --yaw 0.8

use std::path::Path;

use clap::Parser;

use bhumi::grid::layers::{
    ELEVATION, LOWER_BOUND, ROBOT_SLOPE, ROUGHNESS, SLOPE, STEP, TRAVERSABILITY,
    TRAVERSABILITY_ROT, TRAVERSABILITY_X, UPPER_BOUND,
};
use bhumi::terrain::{ColorImage, PinholeCamera, RigidTransform};
use bhumi::{
    CameraFrame, FootprintPath, GridCoord, GridMap, Pose2D, TraversabilityConfig,
    TraversabilityMap, TraversabilityResult, WorldPoint,
};

/// Synthetic terrain example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "configs/traversability.yaml")]
    config: String,

    /// Grid resolution (meters)
    #[arg(short, long, default_value_t = 0.05)]
    resolution: f32,

    /// Yaw used for the rotated footprint layer (radians)
    #[arg(long, default_value_t = std::f32::consts::FRAC_PI_4)]
    yaw: f32,
}

/// 8 m x 5 m terrain: ramp up to x = 2 m, ditch at x = 3.5 m, wall at x = 6 m.
fn build_terrain(resolution: f32, frame_id: &str) -> GridMap {
    let width = (8.0 / resolution).round() as usize;
    let height = (5.0 / resolution).round() as usize;
    let mut map = GridMap::new(width, height, resolution, WorldPoint::ZERO).with_frame(frame_id);
    for layer in [ELEVATION, UPPER_BOUND, LOWER_BOUND, TRAVERSABILITY] {
        map.add_layer(layer);
    }
    for layer in [SLOPE, STEP, ROUGHNESS, ROBOT_SLOPE] {
        map.add_layer_with(layer, 1.0);
    }

    for cell in map.cells().collect::<Vec<_>>() {
        let p = map.position_of(cell);
        let (elevation, traversability, slope, step) = match p.x {
            x if x < 2.0 => (0.05 * x, 0.9 - 0.1 * x, 1.0, 1.0),
            x if (3.4..3.6).contains(&x) && p.y > 1.0 => (-0.4, 0.2, 1.0, 0.0),
            x if (6.0..6.3).contains(&x) && p.y < 4.0 => (0.8, 0.0, 0.0, 1.0),
            _ => (0.1, 0.8, 1.0, 1.0),
        };
        map.set(ELEVATION, cell, elevation);
        map.set(UPPER_BOUND, cell, elevation + 0.02);
        map.set(LOWER_BOUND, cell, elevation - 0.02);
        map.set(TRAVERSABILITY, cell, traversability);
        map.set(SLOPE, cell, slope);
        map.set(STEP, cell, step);
    }
    map
}

fn report(name: &str, result: &TraversabilityResult) {
    println!(
        "  {:<28} safe: {:<5} score: {:.3} area: {:.3} m² footprints: {} blocked: {}",
        name,
        result.is_safe,
        result.traversability,
        result.area,
        result.footprint_polygons.len(),
        result.untraversable_polygon.len()
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    // Load configuration
    let config_path = Path::new(&args.config);
    let config = if config_path.exists() {
        TraversabilityConfig::load(config_path)?
    } else {
        println!(
            "Config not found at {}, using defaults",
            config_path.display()
        );
        TraversabilityConfig::default()
    };

    let map = TraversabilityMap::new(config);
    let terrain = build_terrain(args.resolution, map.map_frame_id());
    println!(
        "Terrain: {}x{} cells at {:.2} m",
        terrain.width(),
        terrain.height(),
        terrain.resolution()
    );

    map.set_robot_position(WorldPoint::new(2.5, 2.5));
    map.set_elevation_map(terrain, 0.0)?;
    map.compute_traversability()?;

    let terrain = map.terrain_map();
    println!(
        "Terrain window: {:.2} x {:.2} m around ({:.2}, {:.2})",
        terrain.length().x,
        terrain.length().y,
        terrain.center().x,
        terrain.center().y
    );

    // Straight runs along y = 0.5 (clear of the ditch) and y = 2.5 (across it)
    let row = |y: f32, x_end: f32| -> Vec<Pose2D> {
        (0..)
            .map(|i| 0.5 + i as f32 * 0.5)
            .take_while(|&x| x <= x_end)
            .map(|x| Pose2D::new(x, y, 0.0))
            .collect()
    };

    println!("\nPath checks:");
    let paths = [
        ("circle, ramp only", FootprintPath::circular(row(2.5, 3.0), 0.25)),
        ("circle, across ditch", FootprintPath::circular(row(2.5, 5.0), 0.25)),
        (
            "circle, into wall",
            FootprintPath::circular(row(0.5, 7.0), 0.25).with_untraversable_polygon(true),
        ),
        (
            "single pose",
            FootprintPath::circular(vec![Pose2D::new(1.0, 1.0, 0.0)], 0.25),
        ),
    ];
    for (name, path) in &paths {
        report(name, &map.check_footprint_path(path)?);
    }

    let outline = map.config().footprint.polygon.clone();
    if outline.is_empty() {
        println!("No footprint polygon configured, skipping polygonal checks");
    } else {
        let polygonal = [
            ("polygon, ramp only", FootprintPath::polygonal(row(2.5, 3.0), outline.clone())),
            (
                "polygon, conservative",
                FootprintPath::polygonal(row(0.5, 5.5), outline.clone()).with_conservative(true),
            ),
        ];
        for (name, path) in &polygonal {
            report(name, &map.check_footprint_path(path)?);
        }

        map.compute_footprint_layers(args.yaw)?;
        let current = map.traversability_map();
        let blocked = |layer: &str| {
            current
                .layer(layer)
                .map(|values| values.iter().filter(|&&v| v == 0.0).count())
                .unwrap_or(0)
        };
        println!(
            "\nFootprint layers: {} cells blocked unrotated, {} at yaw {:.2}",
            blocked(TRAVERSABILITY_X),
            blocked(TRAVERSABILITY_ROT),
            args.yaw
        );
    }

    // Uniform floor-coloured camera image above the robot
    let frame = CameraFrame {
        camera: PinholeCamera {
            fx: 300.0,
            fy: 300.0,
            cx: 320.0,
            cy: 240.0,
            width: 640,
            height: 480,
        },
        world_to_camera: RigidTransform::looking_down([2.5, 2.5, 2.0]),
        image: ColorImage::filled(640, 480, [155, 155, 155]),
    };
    let classified = map.classify_terrain(&frame);
    let cell = GridCoord::new(0, 0);
    println!(
        "Terrain colouring: {} cells classified, corner value {:.2}",
        classified,
        map.terrain_map()
            .get(bhumi::grid::layers::TERRAIN_TRAVERSABILITY, cell)
    );

    Ok(())
}
