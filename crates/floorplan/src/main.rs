//! Floor plan generator
//!
//! Command-line harness: builds a layout configuration from arguments or a
//! JSON file, generates the layout and prints it as ASCII art or JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use strum::IntoEnumIterator;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fp_core::{CorridorShape, Layout, LayoutConfig, LayoutRng, Rect, ShapeSet};

/// Generate building floor plans
#[derive(Parser, Debug)]
#[command(name = "floorplan")]
#[command(author, version, about = "Generate a building floor plan", long_about = None)]
struct Args {
    /// Container width in cells
    #[arg(short = 'W', long = "width", value_parser = clap::value_parser!(i32).range(1..))]
    width: Option<i32>,

    /// Container height in cells
    #[arg(short = 'H', long = "height", value_parser = clap::value_parser!(i32).range(1..))]
    height: Option<i32>,

    /// Seed (random if omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Minimum room width, walls included
    #[arg(long = "min-room-width")]
    min_room_width: Option<i32>,

    /// Minimum room height, walls included
    #[arg(long = "min-room-height")]
    min_room_height: Option<i32>,

    /// Carve corridors, picking from these shapes (e.g. straight, cross, t-junction, h)
    #[arg(short = 'c', long = "corridor", num_args = 1..)]
    corridor: Vec<CorridorShape>,

    /// Corridor half-width around its center line
    #[arg(short = 'e', long = "expansion")]
    expansion: Option<i32>,

    /// Lay out a single room covering the container
    #[arg(long = "single-room")]
    single_room: bool,

    /// Fraction of the area to prune away (0.0 to 1.0)
    #[arg(short = 'p', long = "prune")]
    prune: Option<f32>,

    /// Number of doors to the outside
    #[arg(long = "entrances")]
    entrances: Option<u32>,

    /// Don't place doors
    #[arg(long = "no-doors")]
    no_doors: bool,

    /// Load the configuration from a JSON file; other options override it
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Print the whole layout as JSON
    #[arg(long = "json")]
    json: bool,

    /// List corridor shapes and exit
    #[arg(long = "list-shapes")]
    list_shapes: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn layout_config(&self) -> Result<LayoutConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => LayoutConfig::default(),
        };

        if self.width.is_some() || self.height.is_some() {
            let c = config.container;
            config.container = Rect::from_size(
                c.min_x,
                c.min_z,
                self.width.unwrap_or(c.width()),
                self.height.unwrap_or(c.height()),
            );
        }
        if let Some(w) = self.min_room_width {
            config.min_room_width = w;
        }
        if let Some(h) = self.min_room_height {
            config.min_room_height = h;
        }
        if !self.corridor.is_empty() || self.expansion.is_some() {
            let mut corridor = config.corridor.unwrap_or_default();
            if !self.corridor.is_empty() {
                corridor.allowed_shapes = self.corridor.iter().copied().collect::<ShapeSet>();
            }
            if let Some(e) = self.expansion {
                corridor.expansion = e;
            }
            config.corridor = Some(corridor);
        }
        if let Some(p) = self.prune {
            config.area_prune_percent = p;
            config.allow_room_removal = p > 0.0;
        }
        if let Some(n) = self.entrances {
            config.entrance_count = n;
        }
        config.single_room |= self.single_room;
        config.generate_doors &= !self.no_doors;
        config.seed = match self.seed {
            Some(seed) => seed,
            None if self.config.is_some() => config.seed,
            None => LayoutRng::from_entropy().seed(),
        };

        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("fp_core=debug,floorplan=debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_summary(layout: &Layout) {
    let shape = layout
        .corridor_shape
        .map_or_else(|| "none".to_string(), |s| s.to_string());
    println!(
        "seed {}  corridor {}  rooms {}  doors {}  entrances {}  area {}",
        layout.seed,
        shape,
        layout.rooms.len(),
        layout.doors.len(),
        layout.entrances().count(),
        layout.total_area()
    );
    for room in &layout.rooms {
        let tag = room
            .required_tag
            .as_ref()
            .map_or_else(String::new, |t| format!(" [{t}]"));
        let merged = if room.merged_with.is_empty() {
            String::new()
        } else {
            format!(" open to {:?}", room.merged_with)
        };
        println!(
            "  room {:>2}: {} rect(s), area {:>4}, {} door(s){}{}",
            room.id,
            room.rects.len(),
            room.area(),
            room.doors.len(),
            tag,
            merged
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list_shapes {
        for shape in CorridorShape::iter() {
            println!("{shape}");
        }
        return Ok(());
    }

    let config = args.layout_config()?;
    tracing::debug!(?config, "layout configuration");
    let layout = fp_core::generate(&config).context("invalid layout configuration")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print!("{}", layout.grid);
        print_summary(&layout);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_defaults() {
        let args = Args::parse_from([
            "floorplan",
            "-W",
            "30",
            "-H",
            "20",
            "--seed",
            "7",
            "-c",
            "cross",
            "straight",
            "-e",
            "2",
            "--prune",
            "0.2",
            "--no-doors",
        ]);
        let config = args.layout_config().unwrap();

        assert_eq!(config.container, Rect::new(0, 0, 29, 19));
        assert_eq!(config.seed, 7);
        let corridor = config.corridor.unwrap();
        assert_eq!(corridor.expansion, 2);
        assert_eq!(corridor.allowed_shapes, ShapeSet::CROSS | ShapeSet::STRAIGHT);
        assert!(config.allow_room_removal);
        assert!(!config.generate_doors);
    }

    #[test]
    fn test_rejects_empty_container() {
        for flag in ["-W", "-H"] {
            assert!(Args::try_parse_from(["floorplan", flag, "0"]).is_err());
            assert!(Args::try_parse_from(["floorplan", flag, "-3"]).is_err());
        }
        let args = Args::try_parse_from(["floorplan", "-W", "1", "-H", "1", "--seed", "2"]).unwrap();
        let config = args.layout_config().unwrap();
        assert_eq!(config.container, Rect::new(0, 0, 0, 0));
        assert!(fp_core::generate(&config).is_ok());
    }

    #[test]
    fn test_defaults_without_corridor() {
        let args = Args::parse_from(["floorplan", "--seed", "1"]);
        let config = args.layout_config().unwrap();
        assert_eq!(config.corridor, None);
        assert_eq!(
            config,
            LayoutConfig {
                seed: 1,
                ..LayoutConfig::default()
            }
        );
    }
}
