use super::*;

/// One of the three edges of a [`Prism`], named by its role relative to the incoming light.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// Left hypotenuse, from the top-left vertex to the bottom one. Faces the light.
    Front,
    /// The horizontal edge, where the sample sits.
    Top,
    /// Right hypotenuse, from the bottom vertex to the top-right one.
    Back,
}

impl Face {
    pub const ALL: [Self; 3] = [Self::Front, Self::Top, Self::Back];
}

/// A right isosceles triangle with a horizontal top edge and its right angle pointing down
/// (in y-down canvas space).
#[derive(Clone, Debug, PartialEq)]
pub struct Prism {
    /// top-left, top-right, bottom
    vertices: [Point; 3],
    /// front, top, back
    faces: [Line; 3],
}

impl Prism {
    pub const DEFAULT_TOP_LEFT: [f64; 2] = [100., 50.];
    pub const DEFAULT_SIDE: f64 = 300.;

    /// Build a prism whose top edge starts at `top_left` and is `side` pixels long.
    ///
    /// # Panics
    ///
    /// if `side` isn't strictly positive and finite
    #[must_use]
    pub fn new(top_left: impl Into<Point>, side: f64) -> Self {
        assert!(
            side.is_finite() && side > 0.,
            "prism side must be positive, got {side}"
        );

        let top_left = top_left.into();
        let top_right = top_left + Vector2::new(side, 0.);
        let bottom = top_left + Vector2::new(side / 2., side / 2.);

        Self {
            vertices: [top_left, top_right, bottom],
            faces: [
                Line::through(&top_left, &bottom),
                Line::through(&top_left, &top_right),
                Line::through(&bottom, &top_right),
            ],
        }
    }

    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> &[Point; 3] {
        &self.vertices
    }

    #[inline]
    #[must_use]
    pub const fn top_left(&self) -> &Point {
        &self.vertices[0]
    }

    #[inline]
    #[must_use]
    pub const fn top_right(&self) -> &Point {
        &self.vertices[1]
    }

    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> &Point {
        &self.vertices[2]
    }

    #[inline]
    #[must_use]
    pub const fn face(&self, face: Face) -> &Line {
        &self.faces[face as usize]
    }

    /// The two vertices bounding `face`.
    #[inline]
    #[must_use]
    pub const fn segment(&self, face: Face) -> (&Point, &Point) {
        match face {
            Face::Front => (self.top_left(), self.bottom()),
            Face::Top => (self.top_left(), self.top_right()),
            Face::Back => (self.bottom(), self.top_right()),
        }
    }

    /// Whether `p` falls inside the bounds of `face`'s segment.
    ///
    /// See [`is_within_segment`] for the caveats.
    #[inline]
    #[must_use]
    pub fn contains_on(&self, face: Face, p: &Point) -> bool {
        let (a, b) = self.segment(face);
        is_within_segment(p, a, b)
    }
}

impl Default for Prism {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOP_LEFT, Self::DEFAULT_SIDE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let prism = Prism::default();

        assert_eq!(
            prism.vertices(),
            &[
                Point::new(100., 50.),
                Point::new(400., 50.),
                Point::new(250., 200.)
            ]
        );

        assert_eq!(prism.face(Face::Front), &Line::new(1., -50.));
        assert_eq!(prism.face(Face::Top), &Line::new(0., 50.));
        assert_eq!(prism.face(Face::Back), &Line::new(-1., 450.));
    }

    #[test]
    fn faces_are_never_vertical_or_parallel() {
        let prism = Prism::new([12.5, 7.], 123.);

        for face in Face::ALL {
            assert!(prism.face(face).slope.is_finite());
        }

        assert_ne!(prism.face(Face::Front).slope, prism.face(Face::Back).slope);
        // the front face is the one used for perpendiculars: it must not be horizontal
        assert_ne!(prism.face(Face::Front).slope, 0.);
    }

    #[test]
    fn vertices_lie_on_their_faces() {
        let prism = Prism::default();

        for face in Face::ALL {
            let (a, b) = prism.segment(face);
            let line = prism.face(face);
            assert_eq!(line.at(a.x), a.y);
            assert_eq!(line.at(b.x), b.y);
            assert!(prism.contains_on(face, a) && prism.contains_on(face, b));
        }
    }

    #[test]
    #[should_panic]
    fn rejects_degenerate_side() {
        let _ = Prism::new([0., 0.], 0.);
    }
}
