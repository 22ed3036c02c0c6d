use super::*;

use core::f64::consts::TAU;
use gl::index::{NoIndices, PrimitiveType};

/// Number of rim vertices used to approximate circles.
const CIRCLE_SEGMENTS: usize = 24;

const VERTEX_SHADER_SRC: &str = r"
    #version 140

    in vec2 position;
    uniform vec2 viewport;

    void main() {
        vec2 clip = position / viewport * 2.0 - 1.0;
        gl_Position = vec4(clip.x, -clip.y, 0.0, 1.0);
    }
";

const FRAGMENT_SHADER_SRC: &str = r"
    #version 140

    uniform vec4 color_vec;

    out vec4 color;

    void main() {
        color = color_vec;
    }
";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    LineLoop,
    Lines,
    TriangleFan,
}

impl From<Primitive> for PrimitiveType {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::LineLoop => Self::LineLoop,
            Primitive::Lines => Self::LinesList,
            Primitive::TriangleFan => Self::TriangleFan,
        }
    }
}

/// Vertices sharing one primitive type and one color, drawn in a single call.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub primitive: Primitive,
    pub color: Color,
    pub vertices: Vec<Vertex2D>,
}

/// A [`Canvas`] that records draw calls as vertex [`Batch`]es, ready to be uploaded.
///
/// Consecutive segments of the same color are merged into one batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameBuilder {
    background: Color,
    batches: Vec<Batch>,
}

impl FrameBuilder {
    #[inline]
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }

    #[inline]
    #[must_use]
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Build the frame for `scene`.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let mut frame = Self::default();
        scene.render(&mut frame);
        frame
    }
}

impl Canvas for FrameBuilder {
    fn clear(&mut self, color: Color) {
        self.background = color;
        self.batches.clear();
    }

    fn stroke_polygon(&mut self, vertices: &[Point], color: Color) {
        self.batches.push(Batch {
            primitive: Primitive::LineLoop,
            color,
            vertices: vertices.iter().map(Vertex2D::from).collect(),
        });
    }

    fn fill_circle(&mut self, center: &Point, radius: f64, color: Color) {
        let rim = (0..=CIRCLE_SEGMENTS).map(|i| {
            let (sin, cos) = (i as f64 * TAU / CIRCLE_SEGMENTS as f64).sin_cos();
            Vertex2D::from(center + nalgebra::Vector2::new(cos, sin) * radius)
        });

        self.batches.push(Batch {
            primitive: Primitive::TriangleFan,
            color,
            vertices: core::iter::once(Vertex2D::from(center)).chain(rim).collect(),
        });
    }

    fn stroke_segment(&mut self, from: &Point, to: &Point, color: Color) {
        match self.batches.last_mut() {
            Some(batch) if batch.primitive == Primitive::Lines && batch.color == color => {
                batch.vertices.extend([Vertex2D::from(from), Vertex2D::from(to)]);
            }
            _ => self.batches.push(Batch {
                primitive: Primitive::Lines,
                color,
                vertices: vec![from.into(), to.into()],
            }),
        }
    }
}

/// Uploads [`FrameBuilder`]s and draws them.
pub(crate) struct Renderer {
    program: gl::Program,
}

impl Renderer {
    pub(crate) fn new(display: &gl::Display) -> Result<Self, RenderError> {
        let program =
            gl::Program::from_source(display, VERTEX_SHADER_SRC, FRAGMENT_SHADER_SRC, None)?;

        Ok(Self { program })
    }

    pub(crate) fn render(
        &self,
        display: &gl::Display,
        frame: &FrameBuilder,
        viewport: &Viewport,
    ) -> Result<(), RenderError> {
        use gl::Surface;

        let mut target = display.draw();

        let [r, g, b, a] = frame.background();
        target.clear_color(r, g, b, a);

        let drawn = self.draw_batches(display, &mut target, frame, viewport);

        // a frame must be finished even if drawing failed
        target.finish()?;
        drawn
    }

    fn draw_batches(
        &self,
        display: &gl::Display,
        target: &mut gl::Frame,
        frame: &FrameBuilder,
        viewport: &Viewport,
    ) -> Result<(), RenderError> {
        use gl::Surface;

        let params = gl::DrawParameters {
            blend: gl::Blend::alpha_blending(),
            ..Default::default()
        };

        let viewport = [viewport.width as f32, viewport.height as f32];

        for batch in frame.batches() {
            let vertices = gl::VertexBuffer::new(display, &batch.vertices)?;

            target.draw(
                &vertices,
                NoIndices(batch.primitive.into()),
                &self.program,
                &gl::uniform! {
                    viewport: viewport,
                    color_vec: batch.color,
                },
                &params,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [1., 0., 0., 1.];
    const BLUE: Color = [0., 0., 1., 1.];

    #[test]
    fn segments_of_one_color_share_a_batch() {
        let mut frame = FrameBuilder::default();
        let (a, b, c) = (Point::new(0., 0.), Point::new(1., 0.), Point::new(1., 1.));

        frame.stroke_segment(&a, &b, RED);
        frame.stroke_segment(&b, &c, RED);
        frame.stroke_segment(&c, &a, BLUE);
        frame.stroke_segment(&a, &c, RED);

        let batches = frame.batches();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].vertices.len(), 4);
        assert_eq!(batches[1].color, BLUE);
        assert_eq!(batches[2].vertices, [Vertex2D::from(a), Vertex2D::from(c)]);
    }

    #[test]
    fn circle_is_a_closed_fan() {
        let mut frame = FrameBuilder::default();
        frame.fill_circle(&Point::new(10., 20.), 5., RED);

        let fan = &frame.batches()[0];
        assert_eq!(fan.primitive, Primitive::TriangleFan);
        assert_eq!(fan.vertices.len(), CIRCLE_SEGMENTS + 2);
        assert_eq!(fan.vertices[0].position, [10., 20.]);
        assert_eq!(fan.vertices[1].position, [15., 20.]);

        let last = fan.vertices.last().unwrap().position;
        assert!((last[0] - 15.).abs() < 1e-4 && (last[1] - 20.).abs() < 1e-4);
    }

    #[test]
    fn scene_frame() {
        let scene = Scene::from_state(
            &Tracer::default(),
            &SimulationState::default(),
            Palette::default(),
        );

        let mut frame = FrameBuilder::from_scene(&scene);
        assert_eq!(frame.background(), scene.palette.background);

        let batches = frame.batches();
        assert_eq!(batches[0].primitive, Primitive::LineLoop);
        assert_eq!(batches[0].vertices.len(), 3);
        assert_eq!(batches[1].primitive, Primitive::TriangleFan);
        assert!(batches[2..].iter().all(|b| b.primitive == Primitive::Lines));

        let segment_vertices: usize = batches[2..].iter().map(|b| b.vertices.len()).sum();
        let segments: usize = scene.rays.iter().map(|r| r.points().len() - 1).sum();
        assert_eq!(segment_vertices, 2 * segments);

        // redrawing starts over
        let before = frame.clone();
        scene.render(&mut frame);
        assert_eq!(frame, before);
    }
}
