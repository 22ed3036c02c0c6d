use prisme::*;
use std::{error::Error, fs::File, io, path::Path};

pub use serde_json;

/// This is essentially `try_into` then `try_map` but the latter is nightly-only
pub fn json_array_to_float_array<const D: usize>(
    json_array: &[serde_json::Value],
) -> Option<[f64; D]> {
    let array: &[serde_json::Value; D] = json_array.try_into().ok()?;

    let mut coords = [0.; D];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value.as_f64()?;
    }
    Some(coords)
}

pub trait JsonSer {
    /// Serialize `self` into a JSON value.
    fn to_json(&self) -> serde_json::Value;
}

pub trait JsonDes {
    /// Deserialize from a JSON value.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> serde_json::Value {
        (*self).to_json()
    }
}

impl JsonSer for Point {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!([self.x, self.y])
    }
}

impl JsonDes for Point {
    /// A point is an array of two numbers: `[x, y]`
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let coords = json.as_array().ok_or("a point must be an array")?;
        json_array_to_float_array(coords)
            .map(Point::from)
            .ok_or_else(|| "a point must contain exactly two numbers".into())
    }
}

/// Reads an optional number at `key`, failing only if it is present with the wrong type.
fn get_f64(json: &serde_json::Value, key: &str) -> Result<Option<f64>, Box<dyn Error>> {
    json.get(key)
        .map(|v| v.as_f64().ok_or_else(|| format!(r#""{key}" must be a number"#).into()))
        .transpose()
}

impl JsonSer for OpticalParameters {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "prism_index": self.prism_index(),
            "sample_index": self.sample_index(),
            "ray_count": self.ray_count(),
            "fan_angle": self.fan_angle_degrees(),
        })
    }
}

impl JsonDes for OpticalParameters {
    /// Deserialize parameters from a flat JSON object:
    ///
    /// ```json
    /// {
    ///     "prism_index": 1.5046,
    ///     "sample_index": 1.3,
    ///     "ray_count": 80,
    ///     "fan_angle": 3.0 // degrees
    /// }
    /// ```
    ///
    /// Missing keys take their default value. The resulting set must be valid.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        if !json.is_object() {
            return Err("optical parameters must be a JSON object".into());
        }

        let default = Self::default();

        let ray_count = json
            .get("ray_count")
            .map(|v| {
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or(r#""ray_count" must be a positive integer"#)
            })
            .transpose()?
            .unwrap_or(default.ray_count());

        Ok(Self::new(
            get_f64(json, "prism_index")?.unwrap_or(default.prism_index()),
            get_f64(json, "sample_index")?.unwrap_or(default.sample_index()),
            ray_count,
            get_f64(json, "fan_angle")?.unwrap_or(default.fan_angle_degrees()),
        )?)
    }
}

impl JsonSer for SimulationState {
    /// The parameters' object, extended with `"light_x"` and `"light_y"`
    fn to_json(&self) -> serde_json::Value {
        let mut json = self.params.to_json();
        json["light_x"] = self.light.x.into();
        json["light_y"] = self.light.y.into();
        json
    }
}

impl JsonDes for SimulationState {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let [default_x, default_y] = Self::DEFAULT_LIGHT;

        let light = Point::new(
            get_f64(json, "light_x")?.unwrap_or(default_x),
            get_f64(json, "light_y")?.unwrap_or(default_y),
        );

        Ok(Self::new(OpticalParameters::from_json(json)?, light))
    }
}

impl JsonSer for RayPath {
    fn to_json(&self) -> serde_json::Value {
        let angles = self.angles();

        serde_json::json!({
            "index": self.index(),
            "points": self.points().to_json(),
            "tir": self.tir(),
            "angles": {
                "attack": angles.attack,
                "refraction": angles.refraction,
                "reflection": angles.reflection,
                "exit_attack": angles.exit_attack,
                "exit_refraction": angles.exit_refraction,
            },
        })
    }
}

impl JsonSer for Trace {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "critical_angle": self.critical_angle(),
            "rays": self.paths().to_json(),
        })
    }
}

/// Everything needed to reproduce a trace: the prism, viewport and state it was traced with,
/// and its result.
pub fn serialize_trace(tracer: &Tracer, state: &SimulationState) -> serde_json::Value {
    let viewport = tracer.viewport();

    serde_json::json!({
        "settings": state.to_json(),
        "prism": tracer.prism().vertices().as_slice().to_json(),
        "viewport": [viewport.width, viewport.height],
        "trace": tracer.trace(state).to_json(),
    })
}

/// Load a simulation state from a settings file.
///
/// A missing file isn't an error: the default state is returned instead.
pub fn load_settings(path: impl AsRef<Path>) -> Result<SimulationState, Box<dyn Error>> {
    let path = path.as_ref();

    match File::open(path) {
        Ok(file) => {
            let json: serde_json::Value = serde_json::from_reader(io::BufReader::new(file))?;
            let state = SimulationState::from_json(&json)
                .map_err(|e| format!("invalid settings in {}: {e}", path.display()))?;
            log::info!("loaded settings from {}", path.display());
            Ok(state)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("no settings at {}, using defaults", path.display());
            Ok(SimulationState::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn save_settings(
    path: impl AsRef<Path>,
    state: &SimulationState,
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    serde_json::to_writer_pretty(io::BufWriter::new(File::create(path)?), &state.to_json())?;
    log::info!("saved settings to {}", path.display());
    Ok(())
}
