// Panel controller - Owns the window, the bands and the alarm log, and runs one cycle at a time
use crate::application::alarm_evaluator::evaluate;
use crate::application::sample_source::SampleSource;
use crate::application::transport::Transport;
use crate::domain::dashboard::{BandStatus, ChannelSeries, PanelSnapshot};
use crate::domain::error::PanelError;
use crate::domain::reading::{Channel, Reading};
use crate::domain::telemetry::{HorizontalLine, TelemetryWindow};
use crate::domain::threshold::{AlarmChannel, AlarmEvent, BandState, Bounds, ThresholdBand};
use crate::infrastructure::config::{BandConfig, PanelConfig};
use chrono::Local;
use std::collections::VecDeque;

/// Result of a cycle that produced a reading.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub reading: Reading,
    pub raised: Vec<AlarmEvent>,
}

pub struct PanelController {
    source: SampleSource,
    window: TelemetryWindow,
    bands: [ThresholdBand; 2],
    // Oldest first; presented reversed.
    alarms: VecDeque<AlarmEvent>,
    alarm_log_capacity: usize,
}

impl PanelController {
    pub fn new(
        source: SampleSource,
        window: TelemetryWindow,
        bands: [ThresholdBand; 2],
        alarm_log_capacity: usize,
    ) -> Self {
        Self {
            source,
            window,
            bands,
            alarms: VecDeque::new(),
            alarm_log_capacity: alarm_log_capacity.max(1),
        }
    }

    pub fn from_config(config: &PanelConfig, transport: Box<dyn Transport>) -> Result<Self, PanelError> {
        let panel = &config.panel;
        let source = SampleSource::new(panel.simulation, panel.seed, transport);
        let window = TelemetryWindow::new(panel.clear_resets_sequence);
        let bands = [
            configured_band(AlarmChannel::Temperature, &config.thresholds.temperature)?,
            configured_band(AlarmChannel::Humidity, &config.thresholds.humidity)?,
        ];

        Ok(Self::new(source, window, bands, panel.alarm_log_capacity))
    }

    /// measure -> append -> evaluate. `None` when the source had nothing;
    /// the window and the sequence counter are then untouched.
    pub fn process_cycle(&mut self) -> Option<CycleOutcome> {
        let sample = match self.source.measure() {
            Ok(sample) => sample,
            Err(e) => {
                tracing::debug!("Skipping cycle: {}", e);
                return None;
            }
        };

        let reading = self.window.append(sample, Local::now());
        let raised = evaluate(&reading, &self.bands);

        for event in &raised {
            tracing::warn!(
                channel = %event.channel,
                kind = ?event.kind,
                value = event.value,
                bound = event.bound,
                "Threshold alarm"
            );
            self.record_alarm(*event);
        }

        tracing::debug!(
            index = reading.sequence_index,
            buffered = self.window.len(),
            "Cycle complete"
        );
        Some(CycleOutcome { reading, raised })
    }

    fn record_alarm(&mut self, event: AlarmEvent) {
        if self.alarms.len() == self.alarm_log_capacity {
            self.alarms.pop_front();
        }
        self.alarms.push_back(event);
    }

    /// Empties the window and the alarm log. Bands keep their state.
    pub fn clear(&mut self) {
        self.window.clear();
        self.alarms.clear();
        tracing::info!(next_index = self.window.next_index(), "Window cleared");
    }

    pub fn set_simulation(&mut self, simulated: bool) {
        self.source.set_mode(simulated);
    }

    pub fn is_simulated(&self) -> bool {
        self.source.is_simulated()
    }

    #[cfg(test)]
    pub fn window(&self) -> &TelemetryWindow {
        &self.window
    }

    pub fn band(&self, channel: AlarmChannel) -> &ThresholdBand {
        &self.bands[band_slot(channel)]
    }

    fn band_mut(&mut self, channel: AlarmChannel) -> &mut ThresholdBand {
        &mut self.bands[band_slot(channel)]
    }

    pub fn enable_band(&mut self, channel: AlarmChannel) {
        self.band_mut(channel).enable();
    }

    pub fn disable_band(&mut self, channel: AlarmChannel) {
        self.band_mut(channel).disable();
        tracing::info!(%channel, "Threshold band disabled");
    }

    pub fn set_bounds(&mut self, channel: AlarmChannel, lower: i32, upper: i32) -> Result<(), PanelError> {
        self.band_mut(channel).set_bounds(lower, upper)
    }

    pub fn arm_band(&mut self, channel: AlarmChannel) -> Result<Bounds, PanelError> {
        let result = self.band_mut(channel).arm();
        match &result {
            Ok(bounds) => tracing::info!(%channel, lower = bounds.lower, upper = bounds.upper, "Threshold band armed"),
            Err(e) => tracing::debug!("Band activation refused: {}", e),
        }
        result
    }

    /// Arms every band that is not disabled. Each channel succeeds or fails
    /// on its own.
    pub fn arm_all(&mut self) -> Vec<(AlarmChannel, Result<Bounds, PanelError>)> {
        let pending: Vec<AlarmChannel> = AlarmChannel::ALL
            .into_iter()
            .filter(|channel| self.band(*channel).state() != BandState::Disabled)
            .collect();

        pending
            .into_iter()
            .map(|channel| (channel, self.arm_band(channel)))
            .collect()
    }

    /// Alarm log, newest first.
    pub fn alarm_log(&self) -> impl Iterator<Item = &AlarmEvent> {
        self.alarms.iter().rev()
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        let series = Channel::ALL
            .into_iter()
            .map(|channel| self.channel_series(channel))
            .collect();

        PanelSnapshot {
            simulated: self.source.is_simulated(),
            latest: self.window.latest().copied(),
            series,
            bands: self
                .bands
                .iter()
                .map(|band| BandStatus {
                    channel: band.channel,
                    state: band.state(),
                })
                .collect(),
            alarms: self.alarm_log().copied().collect(),
        }
    }

    fn channel_series(&self, channel: Channel) -> ChannelSeries {
        // Empty window: no stats and no overlays
        let stats = self.window.stats(channel).ok();
        let mean_line = stats.and_then(|s| HorizontalLine::across(&self.window, s.mean).ok());
        let threshold = self
            .bands
            .iter()
            .find(|band| band.channel.channel() == channel)
            .and_then(|band| band.lines(&self.window));

        ChannelSeries {
            channel,
            unit: channel.unit(),
            points: self.window.series(channel),
            stats,
            mean_line,
            threshold,
        }
    }
}

fn band_slot(channel: AlarmChannel) -> usize {
    match channel {
        AlarmChannel::Temperature => 0,
        AlarmChannel::Humidity => 1,
    }
}

fn configured_band(channel: AlarmChannel, config: &BandConfig) -> Result<ThresholdBand, PanelError> {
    let mut band = ThresholdBand::new(channel, config.lower, config.upper)?;
    if config.enabled {
        band.enable();
        if let Err(e) = band.arm() {
            tracing::warn!("Configured band left unarmed: {}", e);
        }
    }
    Ok(band)
}
