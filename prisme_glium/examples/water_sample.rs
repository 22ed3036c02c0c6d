use prisme_glium::prisme::{OpticalParameters, Point, SimulationState, Tracer};
use prisme_glium::{SimulationParams, SimulationWindow};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tracer = Tracer::default();
    let state = SimulationState::new(
        OpticalParameters::new(1.5046, 1.333, 60, 2.)?,
        Point::new(40., 140.),
    );

    SimulationWindow::for_viewport(tracer.viewport(), 2.)?.run(
        tracer,
        state,
        SimulationParams::default(),
        |state| println!("final light position: {}", state.light),
    )?;

    Ok(())
}
