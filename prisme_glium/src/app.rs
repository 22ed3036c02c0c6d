use super::*;

use std::time::Instant;

use glutin::event::{ElementState, Event, KeyboardInput, MouseButton, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};

pub(crate) struct SimulationApp {
    display: gl::Display,
    renderer: Renderer,
    tracer: Tracer,
    palette: Palette,
    frame: FrameBuilder,
    session: Session,
}

impl SimulationApp {
    pub(crate) fn new(
        display: gl::Display,
        tracer: Tracer,
        state: SimulationState,
        params: SimulationParams,
        on_exit: ExitCallback,
    ) -> Result<Self, RenderError> {
        let renderer = Renderer::new(&display)?;
        let session = Session::new(state, RedrawScheduler::new(params.redraw_delay), on_exit);

        let mut app = Self {
            display,
            renderer,
            tracer,
            palette: params.palette,
            frame: FrameBuilder::default(),
            session,
        };

        app.retrace();
        Ok(app)
    }

    /// Trace the current state and queue the result for display.
    fn retrace(&mut self) {
        let scene = Scene::from_state(&self.tracer, self.session.state(), self.palette);
        self.frame = FrameBuilder::from_scene(&scene);
        self.display.gl_window().window().request_redraw();
    }

    fn follow(&mut self, retrace: Retrace) {
        if retrace == Retrace::Now {
            self.retrace();
        }
    }

    fn cursor_moved(&mut self, position: dpi::PhysicalPosition<f64>) {
        let size = self.display.gl_window().window().inner_size();
        let cursor = cursor_to_canvas(position, size, self.tracer.viewport());

        let retrace = self.session.cursor_moved(cursor, Instant::now());
        self.follow(retrace);
    }

    /// Returns `false` if the window should close.
    fn key_pressed(&mut self, input: KeyboardInput) -> bool {
        if input.state != ElementState::Pressed {
            return true;
        }

        match input.virtual_keycode.and_then(key_action) {
            Some(KeyAction::Close) => return false,
            Some(KeyAction::Adjust(adjustment)) => {
                let retrace = self.session.adjust(adjustment);
                self.follow(retrace);
            }
            None => {}
        }

        true
    }

    fn draw(&self) {
        if let Err(e) = self
            .renderer
            .render(&self.display, &self.frame, self.tracer.viewport())
        {
            log::error!("failed to draw frame: {e}");
        }
    }

    fn exit(&mut self, control_flow: &mut ControlFlow) {
        self.session.close();
        *control_flow = ControlFlow::Exit;
    }

    pub(crate) fn run(mut self, events_loop: EventLoop<()>) -> ! {
        events_loop.run(move |ev, _, control_flow| match ev {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => self.exit(control_flow),

                WindowEvent::Resized(physical_size) => {
                    self.display.gl_window().resize(physical_size);
                    self.display.gl_window().window().request_redraw();
                }

                WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position),

                WindowEvent::MouseInput {
                    button: MouseButton::Left,
                    state,
                    ..
                } => match state {
                    ElementState::Pressed => {
                        self.session.pressed();
                    }
                    ElementState::Released => {
                        let retrace = self.session.released();
                        self.follow(retrace);
                    }
                },

                WindowEvent::KeyboardInput { input, .. } => {
                    if !self.key_pressed(input) {
                        self.exit(control_flow);
                    }
                }

                _ => {}
            },

            Event::RedrawRequested(_) => self.draw(),

            Event::MainEventsCleared => {
                if *control_flow == ControlFlow::Exit {
                    return;
                }

                let retrace = self.session.poll(Instant::now());
                self.follow(retrace);

                *control_flow = match self.session.deadline() {
                    Some(deadline) => ControlFlow::WaitUntil(deadline),
                    None => ControlFlow::Wait,
                };
            }

            _ => {}
        })
    }
}
