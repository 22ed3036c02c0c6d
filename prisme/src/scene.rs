use super::*;

/// An RGBA color, each component in `[0, 1]`.
pub type Color = [f32; 4];

/// A surface scenes can be drawn onto. Coordinates are canvas pixels, y pointing down.
pub trait Canvas {
    /// Drop everything drawn so far and fill the surface with `color`.
    fn clear(&mut self, color: Color);

    /// Outline of the closed polygon with the given vertices.
    fn stroke_polygon(&mut self, vertices: &[Point], color: Color);

    fn fill_circle(&mut self, center: &Point, radius: f64, color: Color);

    fn stroke_segment(&mut self, from: &Point, to: &Point, color: Color);
}

/// The colors a [`Scene`] is drawn with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub prism: Color,
    pub light: Color,
    /// Segments of totally reflected rays.
    pub bright_ray: Color,
    pub dim_ray: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [0.01, 0.01, 0.05, 1.],
            prism: [0.15, 0.5, 0.5, 1.],
            light: [1., 0.85, 0.2, 1.],
            bright_ray: [1., 0.95, 0.6, 1.],
            dim_ray: [0.7, 0.7, 0.7, 0.35],
        }
    }
}

/// Something that knows how to draw itself onto a [`Canvas`].
#[impl_trait_for_tuples::impl_for_tuples(8)]
pub trait Drawable {
    fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette);
}

impl Drawable for Prism {
    fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        canvas.stroke_polygon(self.vertices(), palette.prism);
    }
}

impl Drawable for RayPath {
    /// The segment leading to the front face is always dim, it is drawn before
    /// the ray's TIR status is known.
    fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        let inner_color = if self.is_tir() {
            palette.bright_ray
        } else {
            palette.dim_ray
        };

        for (i, (from, to)) in self.segments().enumerate() {
            let color = if i == 0 { palette.dim_ray } else { inner_color };
            canvas.stroke_segment(from, to, color);
        }
    }
}

/// The light source's on-screen marker, also used as its drag handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightHandle {
    pub center: Point,
    pub radius: f64,
}

impl LightHandle {
    pub const DEFAULT_RADIUS: f64 = 6.;
    /// Extra pixels around the marker that still grab it.
    pub const GRAB_SLOP: f64 = 2.;

    #[inline]
    #[must_use]
    pub const fn new(center: Point) -> Self {
        Self {
            center,
            radius: Self::DEFAULT_RADIUS,
        }
    }

    /// Whether a press at `p` grabs this handle.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        let reach = self.radius + Self::GRAB_SLOP;
        (p - self.center).norm_squared() <= reach * reach
    }
}

impl Drawable for LightHandle {
    fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        canvas.fill_circle(&self.center, self.radius, palette.light);
    }
}

impl<T: Drawable> Drawable for [T] {
    fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        for d in self {
            d.draw(canvas, palette);
        }
    }
}

impl<const N: usize, T: Drawable> Drawable for [T; N] {
    fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        self.as_slice().draw(canvas, palette);
    }
}

impl<T: Drawable> Drawable for Vec<T> {
    fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        self.as_slice().draw(canvas, palette);
    }
}

impl<T: Drawable + ?Sized> Drawable for &T {
    fn draw(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        (*self).draw(canvas, palette);
    }
}

/// Everything on screen for one state of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub prism: Prism,
    pub light: LightHandle,
    pub rays: Vec<RayPath>,
    pub palette: Palette,
}

impl Scene {
    /// Trace `state` and gather the result into a scene.
    #[must_use]
    pub fn from_state(tracer: &Tracer, state: &SimulationState, palette: Palette) -> Self {
        Self {
            prism: tracer.prism().clone(),
            light: LightHandle::new(state.light),
            rays: tracer.trace(state).into_paths(),
            palette,
        }
    }

    /// Redraw the whole scene from scratch: background, prism, light, then rays.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(self.palette.background);
        (&self.prism, &self.light, &self.rays).draw(canvas, &self.palette);
    }
}
