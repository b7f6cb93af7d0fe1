//! Climate gating for deposit attempts.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Temperature and rainfall at a location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Rainfall in `[0, 1]`.
    pub rainfall: f32,
}

impl Climate {
    pub fn new(temperature: f32, rainfall: f32) -> Self {
        Self {
            temperature,
            rainfall,
        }
    }
}

/// Source of climate values for world positions.
pub trait ClimateSampler {
    fn climate_at(&self, x: i32, z: i32) -> Climate;
}

/// The same climate everywhere.
impl ClimateSampler for Climate {
    fn climate_at(&self, _x: i32, _z: i32) -> Climate {
        *self
    }
}

impl<F> ClimateSampler for F
where
    F: Fn(i32, i32) -> Climate,
{
    fn climate_at(&self, x: i32, z: i32) -> Climate {
        self(x, z)
    }
}

/// Range filter over temperature, rainfall and normalized elevation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateConditions {
    pub min_temp: f32,
    pub max_temp: f32,
    pub min_rain: f32,
    pub max_rain: f32,
    /// Highest allowed elevation, as `(y - sea_level) / (world_height - sea_level)`.
    pub max_y: f32,
}

impl Default for ClimateConditions {
    fn default() -> Self {
        Self {
            min_temp: -50.0,
            max_temp: 50.0,
            min_rain: 0.0,
            max_rain: 1.0,
            max_y: 1.0,
        }
    }
}

impl ClimateConditions {
    pub fn with_temperature(mut self, min: f32, max: f32) -> Self {
        self.min_temp = min;
        self.max_temp = max;
        self
    }

    pub fn with_rainfall(mut self, min: f32, max: f32) -> Self {
        self.min_rain = min;
        self.max_rain = max;
        self
    }

    pub fn with_max_y(mut self, max_y: f32) -> Self {
        self.max_y = max_y;
        self
    }

    /// Whether a location passes all five bounds.
    pub fn matches(&self, climate: Climate, normalized_y: f32) -> bool {
        climate.temperature >= self.min_temp
            && climate.temperature <= self.max_temp
            && climate.rainfall >= self.min_rain
            && climate.rainfall <= self.max_rain
            && normalized_y <= self.max_y
    }
}

/// Normalizes a block height against sea level, `0` at sea level and `1` at the world top.
pub fn normalized_elevation(y: i32, sea_level: i32, world_height: i32) -> f32 {
    let span = (world_height - sea_level).max(1);
    (y - sea_level) as f32 / span as f32
}
