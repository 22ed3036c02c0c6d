use core::time::Duration;
use num_traits::AsPrimitive;

use gl::{backend::glutin::DisplayCreationError, glutin};

use glutin::{dpi, event_loop, window};
use prisme::*;
use nalgebra::Point2;

mod app;
mod frame;
mod input;
mod schedule;
mod session;

use app::SimulationApp;

pub use frame::*;
pub use glium as gl;
pub use input::*;
pub use prisme;
pub use schedule::*;
pub use session::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Vertex2D {
    pub position: [f32; 2],
}

gl::implement_vertex!(Vertex2D, position);

impl<S: AsPrimitive<f32> + nalgebra::Scalar> From<Point2<S>> for Vertex2D {
    fn from(p: Point2<S>) -> Self {
        Self {
            position: [p.x.as_(), p.y.as_()],
        }
    }
}

impl<S: AsPrimitive<f32> + nalgebra::Scalar> From<&Point2<S>> for Vertex2D {
    fn from(p: &Point2<S>) -> Self {
        Self {
            position: [p.x.as_(), p.y.as_()],
        }
    }
}

/// Errors that can happen while drawing a frame.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to compile the shader program: {0}")]
    Program(#[from] gl::ProgramCreationError),

    #[error("failed to upload vertices: {0}")]
    Buffer(#[from] gl::vertex::BufferCreationError),

    #[error("draw call failed: {0}")]
    Draw(#[from] gl::DrawError),

    #[error("failed to present the frame: {0}")]
    Swap(#[from] gl::SwapBuffersError),
}

/// A set of global parameters for the visualizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub palette: Palette,
    /// How long light drags are debounced before retracing.
    pub redraw_delay: Duration,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            redraw_delay: RedrawScheduler::DEFAULT_DELAY,
        }
    }
}

/// A handle for the window used to visualize simulations.
pub struct SimulationWindow {
    events_loop: glutin::event_loop::EventLoop<()>,
    display: gl::Display,
}

impl SimulationWindow {
    #[inline]
    /// Create a new window to visualize simulations in from a `winit`
    /// [`WindowBuilder`](window::WindowBuilder) and a [`glutin::ContextBuilder`].
    pub fn new<T: glutin::ContextCurrentState>(
        wb: window::WindowBuilder,
        cb: glutin::ContextBuilder<T>,
    ) -> Result<Self, DisplayCreationError> {
        let events_loop = event_loop::EventLoop::default();
        gl::Display::new(wb, cb, &events_loop).map(|display| Self {
            events_loop,
            display,
        })
    }

    /// A window showing `viewport`, blown up `scale` times.
    pub fn for_viewport(viewport: &Viewport, scale: f64) -> Result<Self, DisplayCreationError> {
        Self::new(
            window::WindowBuilder::new()
                .with_inner_size(dpi::LogicalSize::new(
                    viewport.width * scale,
                    viewport.height * scale,
                ))
                .with_title("Prisme"),
            glutin::ContextBuilder::new()
                .with_vsync(true)
                .with_multisampling(1 << 3),
        )
    }

    /// Open the window and run the simulation until it is closed.
    ///
    /// `on_exit` receives the final state right before the process exits.
    /// Only returns if the renderer couldn't be set up.
    pub fn run(
        self,
        tracer: Tracer,
        state: SimulationState,
        params: SimulationParams,
        on_exit: impl FnMut(&SimulationState) + 'static,
    ) -> Result<(), RenderError> {
        let Self {
            events_loop,
            display,
        } = self;

        let app = SimulationApp::new(display, tracer, state, params, Box::new(on_exit))?;

        app.run(events_loop)
    }
}
