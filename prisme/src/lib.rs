//! Geometry and ray tracing for a light fan crossing a right isosceles prism.
//!
//! Light enters through the front face, reflects (totally or not) on the top face,
//! where the sample sits, and leaves through the back face. Everything lives in 2D canvas
//! space, y pointing down.

#![no_std]

extern crate alloc;
use alloc::vec::Vec;

pub use nalgebra;
use nalgebra::Vector2;

mod line;
mod params;
mod prism;
mod scene;
mod state;
mod trace;

pub use line::*;
pub use params::*;
pub use prism::*;
pub use scene::*;
pub use state::*;
pub use trace::*;

/// A position in canvas space.
pub type Point = nalgebra::Point2<f64>;
