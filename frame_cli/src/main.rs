//! # Storey CLI
//!
//! Builds a structural model from a JSON building description, or from a
//! demo building sized by flags, and prints a summary. With `--json` the
//! model itself is written to stdout.
//!
//! ```text
//! frame_cli --input building.json
//! frame_cli --bays-x 3 --bays-y 2 --floors 10 --core TUBE_CENTER_OPENING
//! RUST_LOG=debug frame_cli --frame-only --json > model.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use frame_core::config::{BuildInput, BuildOptions, BuildingDescription};
use frame_core::core_wall::{CoreWallConfig, CoreWallGeometry};
use frame_core::director::{BuildReport, ModelDirector};
use frame_core::errors::ModelResult;

#[derive(Debug, Parser)]
#[command(name = "frame_cli", version, about = "Build a solver-ready structural model")]
struct Args {
    /// JSON file with `building` and `options`; overrides the sizing flags
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[arg(long, default_value_t = 2)]
    bays_x: usize,

    #[arg(long, default_value_t = 2)]
    bays_y: usize,

    /// Bay width in both directions (m)
    #[arg(long, default_value_t = 6.0)]
    bay_width: f64,

    #[arg(long, default_value_t = 2)]
    floors: usize,

    /// Story height (m)
    #[arg(long, default_value_t = 3.5)]
    story_height: f64,

    /// Core wall layout, e.g. I_SECTION or TUBE_SIDE_OPENING
    #[arg(long)]
    core: Option<CoreWallConfig>,

    /// Core plan size in both directions (m)
    #[arg(long, default_value_t = 4.0)]
    core_size: f64,

    /// Clear width of the core opening (m)
    #[arg(long, default_value_t = 1.0)]
    core_opening: f64,

    /// Wind base shear along X (kN)
    #[arg(long, default_value_t = 0.0)]
    wind_x: f64,

    /// Wind base shear along Y (kN)
    #[arg(long, default_value_t = 0.0)]
    wind_y: f64,

    /// Columns and beams only
    #[arg(long)]
    frame_only: bool,

    /// Print the model as JSON instead of the summary
    #[arg(long)]
    json: bool,
}

impl Args {
    fn build_input(&self) -> ModelResult<BuildInput> {
        if let Some(path) = &self.input {
            return BuildInput::from_path(path);
        }
        let mut building = BuildingDescription::default();
        let geometry = &mut building.geometry;
        geometry.bays_x = self.bays_x;
        geometry.bays_y = self.bays_y;
        geometry.bay_width_x = self.bay_width;
        geometry.bay_width_y = self.bay_width;
        geometry.floors = self.floors;
        geometry.story_height = self.story_height;
        building.lateral.core_wall = self
            .core
            .map(|config| CoreWallGeometry::new(config, self.core_size, self.core_size, self.core_opening));
        building.lateral.wind.base_shear_x = self.wind_x;
        building.lateral.wind.base_shear_y = self.wind_y;

        let options = if self.frame_only { BuildOptions::frame_only() } else { BuildOptions::default() };
        Ok(BuildInput::new(building, options))
    }
}

fn print_report(report: &BuildReport) {
    println!("Storey - structural model");
    println!("=========================");
    println!("{}", report.model.summary());
    if let Some(core) = &report.core_layout {
        println!(
            "Core:           {} at ({:.2}, {:.2}), {:.2} x {:.2} m",
            core.config, core.origin.x, core.origin.y, core.length_x, core.length_y
        );
    }
    let (fx, fy) = &report.story_forces;
    for (floor, (x, y)) in fx.iter().zip(fy).enumerate() {
        println!("  Floor {:>3} wind: Fx = {x:>9.2} kN  Fy = {y:>9.2} kN", floor + 1);
    }
    if report.validation.is_clean() {
        println!("Validation:     clean");
    } else {
        println!("Validation:     {} warning(s)", report.validation.len());
        for warning in &report.validation.warnings {
            println!("  [{}] {warning}", warning.code());
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = args
        .build_input()
        .and_then(|input| ModelDirector::new(input).build());

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.error_code());
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report.model) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize model: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&report);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_build_input() {
        let args = Args::parse_from(["frame_cli", "--bays-x", "3", "--floors", "4", "--core", "two-c-facing"]);
        let input = args.build_input().unwrap();
        assert_eq!(input.building.geometry.bays_x, 3);
        assert_eq!(input.building.geometry.floors, 4);
        let core = input.building.lateral.core_wall.unwrap();
        assert_eq!(core.config, CoreWallConfig::TwoCFacing);
    }

    #[test]
    fn test_unknown_core_rejected() {
        assert!(Args::try_parse_from(["frame_cli", "--core", "hexagon"]).is_err());
    }

    #[test]
    fn test_frame_only_builds() {
        let args = Args::parse_from(["frame_cli", "--frame-only"]);
        let report = ModelDirector::new(args.build_input().unwrap()).build().unwrap();
        assert_eq!(report.model.diaphragms.len(), 2);
    }
}
