use core::ops::RangeInclusive;

use nalgebra::ComplexField;
use thiserror::Error;

/// Refractive index of the medium around the prism.
pub const AIR_INDEX: f64 = 1.;

/// Errors produced when validating [`OpticalParameters`].
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ParamsError {
    #[error("refractive indices must be finite numbers")]
    NonFiniteIndex,

    #[error("sample index must be at least {air}, got {0}", air = AIR_INDEX)]
    SampleBelowAir(f64),

    #[error("prism index ({prism}) must be greater than the sample index ({sample})")]
    PrismNotDenser { prism: f64, sample: f64 },

    #[error("ray count must be within {start}..={end}, got {0}", start = OpticalParameters::RAY_COUNT.start(), end = OpticalParameters::RAY_COUNT.end())]
    RayCount(u32),

    #[error("fan angle must be within {start}..={end} degrees, got {0}", start = OpticalParameters::FAN_ANGLE.start(), end = OpticalParameters::FAN_ANGLE.end())]
    FanAngle(f64),
}

/// The four user-tunable inputs of a trace.
///
/// Always valid: the only way to get one is through [`Self::new`] (or [`Default`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpticalParameters {
    prism_index: f64,
    sample_index: f64,
    ray_count: u32,
    fan_angle_degrees: f64,
}

impl OpticalParameters {
    pub const RAY_COUNT: RangeInclusive<u32> = 5..=100;
    pub const FAN_ANGLE: RangeInclusive<f64> = 1.0..=45.0;

    pub fn new(
        prism_index: f64,
        sample_index: f64,
        ray_count: u32,
        fan_angle_degrees: f64,
    ) -> Result<Self, ParamsError> {
        if !(prism_index.is_finite() && sample_index.is_finite()) {
            return Err(ParamsError::NonFiniteIndex);
        }

        if sample_index < AIR_INDEX {
            return Err(ParamsError::SampleBelowAir(sample_index));
        }

        if prism_index <= sample_index {
            return Err(ParamsError::PrismNotDenser {
                prism: prism_index,
                sample: sample_index,
            });
        }

        if !Self::RAY_COUNT.contains(&ray_count) {
            return Err(ParamsError::RayCount(ray_count));
        }

        // NaN fails `contains`
        if !Self::FAN_ANGLE.contains(&fan_angle_degrees) {
            return Err(ParamsError::FanAngle(fan_angle_degrees));
        }

        Ok(Self {
            prism_index,
            sample_index,
            ray_count,
            fan_angle_degrees,
        })
    }

    #[inline]
    #[must_use]
    pub const fn prism_index(&self) -> f64 {
        self.prism_index
    }

    #[inline]
    #[must_use]
    pub const fn sample_index(&self) -> f64 {
        self.sample_index
    }

    #[inline]
    #[must_use]
    pub const fn ray_count(&self) -> u32 {
        self.ray_count
    }

    #[inline]
    #[must_use]
    pub const fn fan_angle_degrees(&self) -> f64 {
        self.fan_angle_degrees
    }

    /// Angular spacing between two adjacent rays, in radians.
    #[inline]
    #[must_use]
    pub fn fan_angle(&self) -> f64 {
        self.fan_angle_degrees.to_radians()
    }

    /// `asin(sample_index / prism_index)`: incidence angles on the top face beyond this one
    /// are totally reflected.
    ///
    /// Always in `(0, π/2)`, because `1 <= sample_index < prism_index`.
    #[inline]
    #[must_use]
    pub fn critical_angle(&self) -> f64 {
        ComplexField::asin(self.sample_index / self.prism_index)
    }

    /// The ray indices of the fan, centered on 0: `-floor(n/2)..ceil(n/2)`.
    #[inline]
    #[must_use]
    pub fn fan_indices(&self) -> core::ops::Range<i32> {
        let n = self.ray_count as i32;
        -(n / 2)..n - n / 2
    }
}

impl Default for OpticalParameters {
    fn default() -> Self {
        Self {
            prism_index: 1.5046,
            sample_index: 1.3,
            ray_count: 80,
            fan_angle_degrees: 3.,
        }
    }
}
