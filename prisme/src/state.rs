use super::*;

use nalgebra::ComplexField;

/// One step of a user-driven parameter change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Adjustment {
    MoreRays,
    FewerRays,
    WiderFan,
    NarrowerFan,
    RaiseSampleIndex,
    LowerSampleIndex,
    RaisePrismIndex,
    LowerPrismIndex,
}

impl Adjustment {
    pub const RAY_STEP: u32 = 1;
    pub const FAN_STEP: f64 = 1.;
    pub const INDEX_STEP: f64 = 0.01;
    /// Stepped indices are rounded to multiples of `1 / INDEX_GRID`.
    const INDEX_GRID: f64 = 1e6;

    /// `params` with this adjustment applied, if the result is still valid.
    pub fn apply_to(self, params: &OpticalParameters) -> Result<OpticalParameters, ParamsError> {
        let mut prism = params.prism_index();
        let mut sample = params.sample_index();
        let mut rays = params.ray_count();
        let mut fan = params.fan_angle_degrees();

        match self {
            Self::MoreRays => rays = rays.saturating_add(Self::RAY_STEP),
            Self::FewerRays => rays = rays.saturating_sub(Self::RAY_STEP),
            Self::WiderFan => fan += Self::FAN_STEP,
            Self::NarrowerFan => fan -= Self::FAN_STEP,
            Self::RaiseSampleIndex => sample += Self::INDEX_STEP,
            Self::LowerSampleIndex => sample -= Self::INDEX_STEP,
            Self::RaisePrismIndex => prism += Self::INDEX_STEP,
            Self::LowerPrismIndex => prism -= Self::INDEX_STEP,
        }

        let snap = |index: f64| ComplexField::round(index * Self::INDEX_GRID) / Self::INDEX_GRID;

        OpticalParameters::new(snap(prism), snap(sample), rays, fan)
    }
}

/// Everything that survives between two traces: the parameters and the light's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    pub params: OpticalParameters,
    pub light: Point,
}

impl SimulationState {
    pub const DEFAULT_LIGHT: [f64; 2] = [60., 124.];

    #[inline]
    #[must_use]
    pub const fn new(params: OpticalParameters, light: Point) -> Self {
        Self { params, light }
    }

    #[inline]
    pub fn move_light(&mut self, to: impl Into<Point>) {
        self.light = to.into();
    }

    /// Apply `adjustment` to the parameters. They are left untouched if the result is invalid.
    pub fn apply(&mut self, adjustment: Adjustment) -> Result<(), ParamsError> {
        self.params = adjustment.apply_to(&self.params)?;
        Ok(())
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(OpticalParameters::default(), Self::DEFAULT_LIGHT.into())
    }
}
