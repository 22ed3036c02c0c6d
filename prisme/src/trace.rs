use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use arrayvec::ArrayVec;
use nalgebra::ComplexField;

use super::*;

/// Size of the drawable area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(500., 300.)
    }
}

/// The successive points a ray goes through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Source,
    /// On the front face.
    Incidence,
    /// On the top face.
    Reflection,
    /// On the back face.
    Refraction,
    /// On the right edge of the viewport.
    Exit,
}

impl Stage {
    /// The face a point of this stage must lie on, if any.
    #[inline]
    #[must_use]
    pub const fn face(self) -> Option<Face> {
        match self {
            Self::Incidence => Some(Face::Front),
            Self::Reflection => Some(Face::Top),
            Self::Refraction => Some(Face::Back),
            Self::Source | Self::Exit => None,
        }
    }
}

/// Angles recorded along a ray, in radians. Stages the ray never reached are `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageAngles {
    /// Angle between the incoming ray and the front face's normal.
    pub attack: f64,
    /// Angle of the refracted ray inside the prism.
    pub refraction: f64,
    /// Incidence angle on the top face, compared against the critical angle.
    pub reflection: Option<f64>,
    /// Angle between the reflected ray and the back face's normal.
    pub exit_attack: Option<f64>,
    pub exit_refraction: Option<f64>,
}

/// The polyline followed by one ray of the fan, truncated at the stage where it was dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct RayPath {
    index: i32,
    points: ArrayVec<Point, 5>,
    angles: StageAngles,
    tir: Option<bool>,
}

impl RayPath {
    /// Position of this ray in the fan, `0` being the central ray.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> i32 {
        self.index
    }

    /// The light source, then one point per reached stage.
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    #[must_use]
    pub const fn angles(&self) -> &StageAngles {
        &self.angles
    }

    /// Whether the ray was totally reflected by the top face.
    ///
    /// `None` if the ray never reached it.
    #[inline]
    #[must_use]
    pub const fn tir(&self) -> Option<bool> {
        self.tir
    }

    #[inline]
    #[must_use]
    pub fn is_tir(&self) -> bool {
        self.tir == Some(true)
    }

    /// The last stage this ray reached.
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self.points.len() {
            0 | 1 => Stage::Source,
            2 => Stage::Incidence,
            3 => Stage::Reflection,
            4 => Stage::Refraction,
            _ => Stage::Exit,
        }
    }

    #[inline]
    #[must_use]
    pub fn point(&self, stage: Stage) -> Option<&Point> {
        self.points.get(stage as usize)
    }

    /// Iterate over the `(from, to)` pairs of consecutive points.
    pub fn segments(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        self.points.iter().zip(self.points.iter().skip(1))
    }
}

/// The result of tracing a whole fan.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    paths: Vec<RayPath>,
    critical_angle: f64,
}

impl Trace {
    /// Every ray that hit the front face, in fan order.
    #[inline]
    #[must_use]
    pub fn paths(&self) -> &[RayPath] {
        &self.paths
    }

    #[inline]
    #[must_use]
    pub fn into_paths(self) -> Vec<RayPath> {
        self.paths
    }

    #[inline]
    #[must_use]
    pub const fn critical_angle(&self) -> f64 {
        self.critical_angle
    }

    /// The rays that made it to the back face.
    pub fn through_prism(&self) -> impl Iterator<Item = &RayPath> + '_ {
        self.paths
            .iter()
            .filter(|path| path.stage() >= Stage::Refraction)
    }

    /// The TIR flags of [`Self::through_prism`], index for index.
    pub fn tir_flags(&self) -> Vec<bool> {
        self.through_prism().filter_map(RayPath::tir).collect()
    }
}

/// Per-trace values shared by every ray of the fan.
struct Fan {
    light: Point,
    /// From the light to its orthogonal projection on the front face.
    central_dir: Vector2<f64>,
    /// Slope angle of the central (normal) ray.
    normal_angle: f64,
    fan_angle_degrees: f64,
    prism_index: f64,
    critical_angle: f64,
}

/// Traces fans of rays through a fixed [`Prism`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Tracer {
    prism: Prism,
    viewport: Viewport,
}

impl Tracer {
    #[inline]
    #[must_use]
    pub const fn new(prism: Prism, viewport: Viewport) -> Self {
        Self { prism, viewport }
    }

    #[inline]
    #[must_use]
    pub const fn prism(&self) -> &Prism {
        &self.prism
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Trace every ray of the fan described by `state`.
    ///
    /// Rays missing the front face are left out, the others are truncated at the
    /// first face they miss.
    #[must_use]
    pub fn trace(&self, state: &SimulationState) -> Trace {
        let params = &state.params;
        let front = self.prism.face(Face::Front);

        let normal = front.perpendicular_through(&state.light);
        let foot = front.intersect(&normal);

        let fan = Fan {
            light: state.light,
            central_dir: foot - state.light,
            normal_angle: ComplexField::atan(normal.slope),
            fan_angle_degrees: params.fan_angle_degrees(),
            prism_index: params.prism_index(),
            critical_angle: params.critical_angle(),
        };

        let paths: Vec<_> = params
            .fan_indices()
            .filter_map(|i| self.trace_ray(&fan, i))
            .collect();

        log::debug!(
            "traced {} of {} rays: {} through the prism, {} totally reflected",
            paths.len(),
            params.ray_count(),
            paths.iter().filter(|p| p.stage() >= Stage::Refraction).count(),
            paths.iter().filter(|p| p.is_tir()).count(),
        );

        Trace {
            paths,
            critical_angle: fan.critical_angle,
        }
    }

    fn trace_ray(&self, fan: &Fan, index: i32) -> Option<RayPath> {
        let prism = &self.prism;
        let light = fan.light;

        // incidence on the front face
        let angle = (f64::from(index) * fan.fan_angle_degrees).to_radians();
        let dir = rotate(&fan.central_dir, angle);
        let ray = Line::through(&light, &(light + dir));
        let incidence = prism.face(Face::Front).intersect(&ray);

        if !prism.contains_on(Face::Front, &incidence) {
            log::trace!("ray {index} misses the front face");
            return None;
        }

        let attack = ray.normal_angle_between(prism.face(Face::Front));
        // the angle itself, not its sine
        let refraction = ComplexField::asin(attack * AIR_INDEX / fan.prism_index);

        let mut path = RayPath {
            index,
            points: ArrayVec::from_iter([light, incidence]),
            angles: StageAngles {
                attack,
                refraction,
                ..StageAngles::default()
            },
            tir: None,
        };

        // front face -> top face
        let inner_slope = ComplexField::tan(fan.normal_angle - refraction);
        let inner = Line::from_slope_and_point(&incidence, inner_slope);
        let reflection = prism.face(Face::Top).intersect(&inner);

        if !prism.contains_on(Face::Top, &reflection) {
            log::trace!("ray {index} misses the top face");
            return Some(path);
        }

        let reflection_angle = prism.face(Face::Top).normal_angle_between(&inner);
        path.points.push(reflection);
        path.angles.reflection = Some(reflection_angle);
        path.tir = Some(reflection_angle > fan.critical_angle);

        // top face -> back face
        let leg_slope = ComplexField::tan(FRAC_PI_2 - reflection_angle);
        let leg = Line::from_slope_and_point(&reflection, leg_slope);
        let refraction_pt = prism.face(Face::Back).intersect(&leg);

        if !prism.contains_on(Face::Back, &refraction_pt) {
            log::trace!("ray {index} misses the back face");
            return Some(path);
        }

        let exit_attack = leg.normal_angle_between(prism.face(Face::Back));
        let exit_refraction = ComplexField::asin(exit_attack * fan.prism_index / AIR_INDEX);
        path.points.push(refraction_pt);
        path.angles.exit_attack = Some(exit_attack);
        path.angles.exit_refraction = Some(exit_refraction);

        // back face -> right edge, the back face's normal is at π/4
        let exit_slope = ComplexField::tan(FRAC_PI_4 + exit_refraction);
        let exit_leg = Line::from_slope_and_point(&refraction_pt, exit_slope);
        let exit = Point::new(self.viewport.width, exit_leg.at(self.viewport.width));

        if exit.y.is_finite() {
            path.points.push(exit);
        } else {
            log::trace!("ray {index} can't leave the back face");
        }

        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn golden_state() -> SimulationState {
        SimulationState::new(
            OpticalParameters::new(1.5046, 1.3, 80, 3.).unwrap(),
            Point::new(60., 124.),
        )
    }

    fn count_at(trace: &Trace, stage: Stage) -> usize {
        trace.paths().iter().filter(|p| p.stage() == stage).count()
    }

    #[test]
    fn golden_fan() {
        let trace = Tracer::default().trace(&golden_state());

        assert_eq!(trace.paths().len(), 31);
        assert_eq!(count_at(&trace, Stage::Exit), 16);
        assert_eq!(count_at(&trace, Stage::Refraction), 0);
        assert_eq!(count_at(&trace, Stage::Reflection), 3);
        assert_eq!(count_at(&trace, Stage::Incidence), 12);
        assert_eq!(trace.paths().iter().filter(|p| p.is_tir()).count(), 6);

        let tir: Vec<_> = trace
            .paths()
            .iter()
            .filter(|p| p.is_tir())
            .map(RayPath::index)
            .collect();
        assert_eq!(tir, [8, 9, 10, 11, 12, 13]);

        let first = trace.paths().first().unwrap();
        assert_eq!(first.index(), -40);
        assert_eq!(first.stage(), Stage::Incidence);
    }

    #[test]
    fn golden_central_ray() {
        let trace = Tracer::default().trace(&golden_state());
        let central = trace.paths().iter().find(|p| p.index() == 0).unwrap();

        let expected = [
            Point::new(60., 124.),
            Point::new(117., 67.),
            Point::new(134., 50.),
            Point::new(267., 183.),
            Point::new(500., 416.),
        ];

        assert_eq!(central.points().len(), expected.len());
        for (p, e) in central.points().iter().zip(&expected) {
            assert_relative_eq!(p, e, epsilon = 1e-9);
        }

        let angles = central.angles();
        assert_eq!(angles.attack, 0.);
        assert_eq!(angles.refraction, 0.);
        assert_relative_eq!(angles.reflection.unwrap(), FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(angles.exit_attack.unwrap(), 0., epsilon = 1e-12);
        assert_eq!(central.tir(), Some(false));
    }

    #[test]
    fn tracing_is_deterministic() {
        let tracer = Tracer::default();
        let state = golden_state();

        let a = tracer.trace(&state);
        let b = tracer.trace(&state);

        assert_eq!(a, b);
        for (p, q) in a.paths().iter().zip(b.paths()) {
            for (u, v) in p.points().iter().zip(q.points()) {
                assert_eq!(u.x.to_bits(), v.x.to_bits());
                assert_eq!(u.y.to_bits(), v.y.to_bits());
            }
        }
    }

    #[test]
    fn stage_points_lie_on_their_faces() {
        let tracer = Tracer::default();

        for light in [[60., 124.], [20., 200.], [90., 90.], [5., 60.]] {
            for fan in [1., 3., 7.5, 45.] {
                let state = SimulationState::new(
                    OpticalParameters::new(1.5046, 1.3, 100, fan).unwrap(),
                    Point::from(light),
                );

                for path in tracer.trace(&state).paths() {
                    assert!(path.points().len() >= 2);
                    assert_eq!(path.point(Stage::Source), Some(&state.light));

                    for (i, p) in path.points().iter().enumerate() {
                        let stage = [
                            Stage::Source,
                            Stage::Incidence,
                            Stage::Reflection,
                            Stage::Refraction,
                            Stage::Exit,
                        ][i];

                        assert!(p.x.is_finite() && p.y.is_finite());

                        if let Some(face) = stage.face() {
                            assert!(
                                tracer.prism().contains_on(face, p),
                                "ray {} leaked a point off the {face:?} face: {p}",
                                path.index()
                            );
                        }
                    }

                    if path.stage() == Stage::Exit {
                        assert_eq!(path.points()[4].x, tracer.viewport().width);
                    }
                }
            }
        }
    }

    #[test]
    fn tir_flags_follow_their_paths() {
        let tracer = Tracer::default();
        let top = tracer.prism().face(Face::Top);

        for sample in [1., 1.2, 1.3, 1.45] {
            let state = SimulationState::new(
                OpticalParameters::new(1.5046, sample, 80, 3.).unwrap(),
                Point::new(60., 124.),
            );
            let trace = tracer.trace(&state);

            // rays dropped before the back face must not shift the flags
            assert_eq!(trace.tir_flags().len(), trace.through_prism().count());

            for (path, flag) in trace.through_prism().zip(trace.tir_flags()) {
                assert_eq!(path.tir(), Some(flag));
            }

            for path in trace.paths() {
                match path.points() {
                    [_, incidence, reflection, ..] => {
                        let inner = Line::through(incidence, reflection);
                        let angle = top.normal_angle_between(&inner);
                        assert_relative_eq!(angle, path.angles().reflection.unwrap(), epsilon = 1e-9);
                        assert_eq!(
                            path.tir(),
                            Some(angle > trace.critical_angle()),
                            "ray {} carries a foreign flag",
                            path.index()
                        );
                    }
                    _ => assert_eq!(path.tir(), None),
                }
            }
        }
    }

    #[test]
    fn higher_sample_index_means_fewer_tir_rays() {
        let tracer = Tracer::default();
        let tir_count = |sample| {
            let state = SimulationState::new(
                OpticalParameters::new(1.5046, sample, 80, 3.).unwrap(),
                Point::new(60., 124.),
            );
            tracer
                .trace(&state)
                .paths()
                .iter()
                .filter(|p| p.is_tir())
                .count()
        };

        assert!(tir_count(1.) >= tir_count(1.3));
        assert!(tir_count(1.3) >= tir_count(1.5));
    }

    #[test]
    fn light_far_from_the_prism_yields_nothing() {
        // the perpendicular foot lands far beyond the front face, and a narrow fan
        // never sweeps back over it
        let state = SimulationState::new(
            OpticalParameters::new(1.5046, 1.3, 5, 1.).unwrap(),
            Point::new(-400., -600.),
        );
        let trace = Tracer::default().trace(&state);

        assert!(trace.paths().is_empty());
        assert!(trace.tir_flags().is_empty());
    }
}
