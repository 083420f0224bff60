// Telemetry window - rolling buffer of recent readings and its statistics
use crate::domain::error::PanelError;
use crate::domain::reading::{Channel, Reading, Sample};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::VecDeque;

pub const WINDOW_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: u64,
    pub y: f64,
}

impl PlotPoint {
    pub fn new(x: u64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Flat overlay spanning the window's x range (mean line, threshold lines).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalLine {
    pub x_start: u64,
    pub x_end: u64,
    pub y: f64,
}

impl HorizontalLine {
    pub fn across(window: &TelemetryWindow, y: f64) -> Result<Self, PanelError> {
        Ok(Self {
            x_start: window.min_index()?,
            x_end: window.max_index()?,
            y,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub channel: Channel,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Fixed-capacity FIFO of readings.
///
/// Every accepted sample gets the next value of a global sequence counter.
/// Eviction never touches the counter; `clear` resets it only when the
/// window was built with `reset_sequence_on_clear`.
#[derive(Debug, Clone)]
pub struct TelemetryWindow {
    readings: VecDeque<Reading>,
    capacity: usize,
    next_index: u64,
    reset_sequence_on_clear: bool,
}

impl TelemetryWindow {
    pub fn new(reset_sequence_on_clear: bool) -> Self {
        Self::with_capacity(WINDOW_CAPACITY, reset_sequence_on_clear)
    }

    pub fn with_capacity(capacity: usize, reset_sequence_on_clear: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
            next_index: 0,
            reset_sequence_on_clear,
        }
    }

    pub fn append(&mut self, sample: Sample, taken_at: DateTime<Local>) -> Reading {
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }

        let reading = Reading::new(sample, self.next_index, taken_at);
        self.next_index += 1;
        self.readings.push_back(reading);
        reading
    }

    pub fn clear(&mut self) {
        self.readings.clear();
        if self.reset_sequence_on_clear {
            self.next_index = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Sequence index the next appended reading will receive.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Reading at `position` in the window, 0 being the oldest.
    #[cfg(test)]
    pub fn get(&self, position: usize) -> Option<&Reading> {
        self.readings.get(position)
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    pub fn mean(&self, channel: Channel) -> Result<f64, PanelError> {
        if self.is_empty() {
            return Err(PanelError::EmptyWindow);
        }
        let sum: f64 = self.iter().map(|r| r.value(channel)).sum();
        Ok(sum / self.readings.len() as f64)
    }

    pub fn min_index(&self) -> Result<u64, PanelError> {
        self.iter()
            .map(|r| r.sequence_index)
            .min()
            .ok_or(PanelError::EmptyWindow)
    }

    pub fn max_index(&self) -> Result<u64, PanelError> {
        self.iter()
            .map(|r| r.sequence_index)
            .max()
            .ok_or(PanelError::EmptyWindow)
    }

    pub fn stats(&self, channel: Channel) -> Result<ChannelStats, PanelError> {
        let mean = self.mean(channel)?;
        let (min, max) = self.iter().map(|r| r.value(channel)).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );

        Ok(ChannelStats {
            channel,
            count: self.readings.len(),
            min,
            max,
            mean,
        })
    }

    /// Plot points for one channel, oldest first.
    pub fn series(&self, channel: Channel) -> Vec<PlotPoint> {
        self.iter()
            .map(|r| PlotPoint::new(r.sequence_index, r.value(channel)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temperature: f64) -> Sample {
        Sample::new(temperature, 75.0, 760.0)
    }

    fn filled(n: usize) -> TelemetryWindow {
        let mut window = TelemetryWindow::new(false);
        for i in 0..n {
            window.append(sample(i as f64), Local::now());
        }
        window
    }

    #[test]
    fn test_length_is_bounded_by_capacity() {
        for n in [0, 1, 49, 50, 51, 120] {
            let window = filled(n);
            assert_eq!(window.len(), n.min(WINDOW_CAPACITY));

            // The most recent readings survive, in append order
            let expected: Vec<f64> = (n.saturating_sub(WINDOW_CAPACITY)..n).map(|i| i as f64).collect();
            let kept: Vec<f64> = window.iter().map(|r| r.temperature).collect();
            assert_eq!(kept, expected);
        }
    }

    #[test]
    fn test_sequence_index_increments_through_eviction() {
        let mut window = TelemetryWindow::new(false);
        let indices: Vec<u64> = (0..75)
            .map(|i| window.append(sample(i as f64), Local::now()).sequence_index)
            .collect();

        for pair in indices.windows(2) {
            assert_eq!(pair[1], pair[0] + 1);
        }
        assert_eq!(window.min_index().unwrap(), 25);
        assert_eq!(window.max_index().unwrap(), 74);
    }

    #[test]
    fn test_fifty_first_append_evicts_oldest() {
        let window = filled(51);
        assert_eq!(window.len(), 50);
        assert_eq!(window.get(0).unwrap().sequence_index, 1);
        assert!(window.iter().all(|r| r.sequence_index != 0));
        assert_eq!(window.latest().unwrap().sequence_index, 50);
    }

    #[test]
    fn test_clear_keeps_sequence_counter_by_default() {
        let mut window = filled(5);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.append(sample(1.0), Local::now()).sequence_index, 5);
    }

    #[test]
    fn test_clear_can_reset_sequence_counter() {
        let mut window = TelemetryWindow::new(true);
        for i in 0..5 {
            window.append(sample(i as f64), Local::now());
        }
        window.clear();
        assert_eq!(window.append(sample(1.0), Local::now()).sequence_index, 0);
    }

    #[test]
    fn test_statistics_on_empty_window() {
        let window = TelemetryWindow::new(false);
        assert_eq!(window.mean(Channel::Temperature), Err(PanelError::EmptyWindow));
        assert_eq!(window.min_index(), Err(PanelError::EmptyWindow));
        assert_eq!(window.max_index(), Err(PanelError::EmptyWindow));
        assert_eq!(window.stats(Channel::Humidity), Err(PanelError::EmptyWindow));
        assert!(window.series(Channel::Pressure).is_empty());
    }

    #[test]
    fn test_mean_matches_stored_values() {
        let mut window = TelemetryWindow::new(false);
        for t in [22.0, 35.0, 18.0, 25.0] {
            window.append(sample(t), Local::now());
        }
        assert_eq!(window.mean(Channel::Temperature).unwrap(), 25.0);

        let stats = window.stats(Channel::Temperature).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 18.0);
        assert_eq!(stats.max, 35.0);
    }

    #[test]
    fn test_mean_survives_clear_and_replay() {
        let mut window = filled(10);
        let before = window.mean(Channel::Temperature).unwrap();
        let prior: Vec<Sample> = window.iter().map(Reading::sample).collect();

        window.append(sample(99.0), Local::now());
        assert_ne!(window.mean(Channel::Temperature).unwrap(), before);

        window.clear();
        for s in prior {
            window.append(s, Local::now());
        }
        assert_eq!(window.mean(Channel::Temperature).unwrap(), before);
    }

    #[test]
    fn test_series_and_horizontal_line_use_sequence_indices() {
        let window = filled(52);
        let series = window.series(Channel::Temperature);
        assert_eq!(series.first(), Some(&PlotPoint::new(2, 2.0)));
        assert_eq!(series.last(), Some(&PlotPoint::new(51, 51.0)));

        let line = HorizontalLine::across(&window, 30.0).unwrap();
        assert_eq!((line.x_start, line.x_end, line.y), (2, 51, 30.0));
        assert!(HorizontalLine::across(&TelemetryWindow::new(false), 1.0).is_err());
    }
}
