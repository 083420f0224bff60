// Sample source - Simulated or live measurements
use crate::application::transport::Transport;
use crate::domain::error::PanelError;
use crate::domain::reading::Sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

pub const SIM_TEMPERATURE: Range<f64> = 20.0..30.0;
pub const SIM_HUMIDITY: Range<f64> = 70.0..80.0;
pub const SIM_PRESSURE: Range<f64> = 750.0..770.0;

pub struct SampleSource {
    simulated: bool,
    rng: StdRng,
    transport: Box<dyn Transport>,
}

impl SampleSource {
    pub fn new(simulated: bool, seed: Option<u64>, transport: Box<dyn Transport>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            simulated,
            rng,
            transport,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Takes effect on the next `measure`.
    pub fn set_mode(&mut self, simulated: bool) {
        if self.simulated != simulated {
            tracing::info!(simulated, "Sample source mode switched");
        }
        self.simulated = simulated;
    }

    pub fn measure(&mut self) -> Result<Sample, PanelError> {
        if self.simulated {
            return Ok(Sample::new(
                self.rng.random_range(SIM_TEMPERATURE),
                self.rng.random_range(SIM_HUMIDITY),
                self.rng.random_range(SIM_PRESSURE),
            ));
        }

        self.transport.get_reading().ok_or(PanelError::EmptyReading)
    }
}
