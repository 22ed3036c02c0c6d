use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Any of `log`'s level filter names, case insensitive.
fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| {
        format!("unknown level `{s}`, expected off, error, warn, info, debug or trace")
    })
}

#[derive(Debug, Parser)]
#[command(name = "prisme")]
#[command(about = "Watch light rays find their way through a prism")]
pub struct Args {
    /// Settings file, created on exit if missing
    #[arg(long, default_value = "prisme.json")]
    pub settings: PathBuf,

    /// Refractive index of the prism
    #[arg(long)]
    pub prism_index: Option<f64>,

    /// Refractive index of the sample against the prism's top face
    #[arg(long)]
    pub sample_index: Option<f64>,

    /// Number of rays in the fan
    #[arg(long)]
    pub rays: Option<u32>,

    /// Angle between neighbouring rays, in degrees
    #[arg(long)]
    pub fan_angle: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub light_x: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub light_y: Option<f64>,

    /// Most verbose log level shown, `RUST_LOG` still applies per module
    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub debug_level: LevelFilter,

    /// Print the trace as JSON and exit instead of opening a window
    #[arg(long)]
    pub dump: bool,

    /// Don't write the settings back on exit
    #[arg(long)]
    pub no_save: bool,
}
