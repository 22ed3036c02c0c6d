use clap::Parser;
use log::LevelFilter;
use prisme::{OpticalParameters, Point, SimulationState, Tracer};
use prisme_glium::{SimulationParams, SimulationWindow};
use std::error::Error;

mod cli;

use cli::Args;

/// Each canvas pixel takes this many logical pixels on screen.
const WINDOW_SCALE: f64 = 2.;

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// `state` with the command line's overrides applied.
fn apply_overrides(state: SimulationState, args: &Args) -> Result<SimulationState, Box<dyn Error>> {
    let params = &state.params;

    let params = OpticalParameters::new(
        args.prism_index.unwrap_or(params.prism_index()),
        args.sample_index.unwrap_or(params.sample_index()),
        args.rays.unwrap_or(params.ray_count()),
        args.fan_angle.unwrap_or(params.fan_angle_degrees()),
    )?;

    let light = Point::new(
        args.light_x.unwrap_or(state.light.x),
        args.light_y.unwrap_or(state.light.y),
    );

    Ok(SimulationState::new(params, light))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    init_logger(args.debug_level);

    let state = apply_overrides(prisme_json::load_settings(&args.settings)?, &args)?;
    let tracer = Tracer::default();

    if args.dump {
        let json = prisme_json::serialize_trace(&tracer, &state);
        println!("{}", prisme_json::serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let settings = args.settings;
    let save = !args.no_save;

    SimulationWindow::for_viewport(tracer.viewport(), WINDOW_SCALE)?.run(
        tracer,
        state,
        SimulationParams::default(),
        move |state| {
            if save {
                if let Err(e) = prisme_json::save_settings(&settings, state) {
                    log::error!("couldn't save settings: {e}");
                }
            }
        },
    )?;

    Ok(())
}
