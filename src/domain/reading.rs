// Reading domain model
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// One measured quantity of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Temperature,
    Humidity,
    Pressure,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Humidity, Channel::Pressure];

    pub fn unit(self) -> &'static str {
        match self {
            Channel::Temperature => "C",
            Channel::Humidity => "%",
            Channel::Pressure => "mmHg",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Pressure => "pressure",
        };
        f.write_str(name)
    }
}

/// Raw output of a sample source, before it is stamped by the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl Sample {
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
        }
    }
}

/// A sample accepted into the window. `sequence_index` is the plot x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub sequence_index: u64,
    pub taken_at: DateTime<Local>,
}

impl Reading {
    pub fn new(sample: Sample, sequence_index: u64, taken_at: DateTime<Local>) -> Self {
        Self {
            temperature: sample.temperature,
            humidity: sample.humidity,
            pressure: sample.pressure,
            sequence_index,
            taken_at,
        }
    }

    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Pressure => self.pressure,
        }
    }

    #[cfg(test)]
    pub fn sample(&self) -> Sample {
        Sample::new(self.temperature, self.humidity, self.pressure)
    }
}
