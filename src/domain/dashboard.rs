// Panel snapshot - everything the presentation layer renders after a cycle
use super::reading::{Channel, Reading};
use super::telemetry::{ChannelStats, HorizontalLine, PlotPoint};
use super::threshold::{AlarmEvent, AlarmChannel, BandState, ThresholdLines};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSeries {
    pub channel: Channel,
    pub unit: &'static str,
    pub points: Vec<PlotPoint>,
    pub stats: Option<ChannelStats>,
    pub mean_line: Option<HorizontalLine>,
    pub threshold: Option<ThresholdLines>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandStatus {
    pub channel: AlarmChannel,
    #[serde(flatten)]
    pub state: BandState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub simulated: bool,
    pub latest: Option<Reading>,
    pub series: Vec<ChannelSeries>,
    pub bands: Vec<BandStatus>,
    /// Newest first.
    pub alarms: Vec<AlarmEvent>,
}

impl PanelSnapshot {
    pub fn series(&self, channel: Channel) -> Option<&ChannelSeries> {
        self.series.iter().find(|s| s.channel == channel)
    }
}
