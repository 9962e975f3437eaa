use std::fmt;

use serde::{Deserialize, Serialize};

/// One day's weather observation, as stored in the backing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Chance of precipitation, percent.
    pub precipitation: f64,
    /// Degrees Celsius.
    pub heat_index: f64,
    /// km/h.
    pub wind_speed: f64,
}

impl Observation {
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Date => None,
            Field::Temperature => Some(self.temperature),
            Field::Humidity => Some(self.humidity),
            Field::Precipitation => Some(self.precipitation),
            Field::HeatIndex => Some(self.heat_index),
            Field::WindSpeed => Some(self.wind_speed),
        }
    }

    /// Assign a measurement. `Field::Date` is not part of the record and is ignored.
    pub fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::Date => {}
            Field::Temperature => self.temperature = value,
            Field::Humidity => self.humidity = value,
            Field::Precipitation => self.precipitation = value,
            Field::HeatIndex => self.heat_index = value,
            Field::WindSpeed => self.wind_speed = value,
        }
    }
}

/// The values collected by one iteration of the prompt loop, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Temperature,
    Humidity,
    Precipitation,
    HeatIndex,
    WindSpeed,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Temperature => "temperature (°C)",
            Field::Humidity => "Rel. Humidity (%)",
            Field::Precipitation => "precipitation (%)",
            Field::HeatIndex => "heat index (°C)",
            Field::WindSpeed => "wind speed (km/hr)",
        }
    }

    /// Short name used in range-check messages.
    pub fn short_name(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Temperature => "temperature",
            Field::Humidity => "RH (%)",
            Field::Precipitation => "precipitation (%)",
            Field::HeatIndex => "heat index",
            Field::WindSpeed => "wind speed",
        }
    }

    /// The measurement asked for after this one, if any.
    pub fn next(&self) -> Option<Field> {
        match self {
            Field::Date => Some(Field::Temperature),
            Field::Temperature => Some(Field::Humidity),
            Field::Humidity => Some(Field::Precipitation),
            Field::Precipitation => Some(Field::HeatIndex),
            Field::HeatIndex => Some(Field::WindSpeed),
            Field::WindSpeed => None,
        }
    }

    pub const fn measurements() -> &'static [Field] {
        &[
            Field::Temperature,
            Field::Humidity,
            Field::Precipitation,
            Field::HeatIndex,
            Field::WindSpeed,
        ]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
