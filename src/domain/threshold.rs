// Threshold (VVA) bands and the alarms they raise
use crate::domain::error::PanelError;
use crate::domain::reading::Channel;
use crate::domain::telemetry::{HorizontalLine, TelemetryWindow};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Channels that carry a threshold band. Pressure has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmChannel {
    Temperature,
    Humidity,
}

impl AlarmChannel {
    pub const ALL: [AlarmChannel; 2] = [AlarmChannel::Temperature, AlarmChannel::Humidity];

    pub fn channel(self) -> Channel {
        match self {
            AlarmChannel::Temperature => Channel::Temperature,
            AlarmChannel::Humidity => Channel::Humidity,
        }
    }

    /// Inclusive range accepted for either bound.
    pub fn bound_limits(self) -> (i32, i32) {
        match self {
            AlarmChannel::Temperature => (-273, i32::MAX),
            AlarmChannel::Humidity => (0, 100),
        }
    }

    pub fn check_bound(self, value: i32) -> Result<i32, PanelError> {
        let (min, max) = self.bound_limits();
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(PanelError::BoundOutOfRange {
                channel: self,
                value,
                min,
                max,
            })
        }
    }
}

impl fmt::Display for AlarmChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.channel(), f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub lower: i32,
    pub upper: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BandState {
    Disabled,
    Configuring,
    Armed { bounds: Bounds },
}

/// Per-channel alarm band.
///
/// `draft` holds what the user is editing; evaluation only ever sees the
/// bounds captured by a successful `arm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdBand {
    pub channel: AlarmChannel,
    draft: Bounds,
    state: BandState,
}

impl ThresholdBand {
    pub fn new(channel: AlarmChannel, lower: i32, upper: i32) -> Result<Self, PanelError> {
        Ok(Self {
            channel,
            draft: Bounds {
                lower: channel.check_bound(lower)?,
                upper: channel.check_bound(upper)?,
            },
            state: BandState::Disabled,
        })
    }

    pub fn state(&self) -> BandState {
        self.state
    }

    pub fn draft(&self) -> Bounds {
        self.draft
    }

    /// Bounds under evaluation, if armed.
    pub fn armed_bounds(&self) -> Option<Bounds> {
        match self.state {
            BandState::Armed { bounds } => Some(bounds),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.armed_bounds().is_some()
    }

    pub fn enable(&mut self) {
        if self.state == BandState::Disabled {
            self.state = BandState::Configuring;
        }
    }

    pub fn disable(&mut self) {
        self.state = BandState::Disabled;
    }

    pub fn set_bounds(&mut self, lower: i32, upper: i32) -> Result<(), PanelError> {
        if self.state == BandState::Disabled {
            return Err(PanelError::BandDisabled(self.channel));
        }
        let lower = self.channel.check_bound(lower)?;
        let upper = self.channel.check_bound(upper)?;
        self.draft = Bounds { lower, upper };
        Ok(())
    }

    /// Validates the draft and starts evaluating it. A rejected draft leaves
    /// the band exactly as it was.
    pub fn arm(&mut self) -> Result<Bounds, PanelError> {
        if self.state == BandState::Disabled {
            return Err(PanelError::BandDisabled(self.channel));
        }
        let Bounds { lower, upper } = self.draft;
        if lower > upper {
            return Err(PanelError::InvalidBand {
                channel: self.channel,
                lower,
                upper,
            });
        }
        self.state = BandState::Armed { bounds: self.draft };
        Ok(self.draft)
    }

    /// Lower and upper overlay lines across the window; `None` unless armed
    /// and the window holds data.
    pub fn lines(&self, window: &TelemetryWindow) -> Option<ThresholdLines> {
        let bounds = self.armed_bounds()?;
        Some(ThresholdLines {
            lower: HorizontalLine::across(window, f64::from(bounds.lower)).ok()?,
            upper: HorizontalLine::across(window, f64::from(bounds.upper)).ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdLines {
    pub lower: HorizontalLine,
    pub upper: HorizontalLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    AboveUpper,
    BelowLower,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlarmEvent {
    pub channel: AlarmChannel,
    pub kind: AlarmKind,
    pub value: f64,
    pub bound: i32,
    pub timestamp: DateTime<Local>,
}

impl fmt::Display for AlarmEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.kind {
            AlarmKind::AboveUpper => "higher than top",
            AlarmKind::BelowLower => "lower than bottom",
        };
        write!(
            f,
            "{} {} {:.2} is {} of VVA ({})",
            self.timestamp.format("%H:%M:%S"),
            self.channel,
            self.value,
            side,
            self.bound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::alarm_evaluator::evaluate;
    use crate::domain::reading::{Reading, Sample};

    #[test]
    fn test_band_activation_protocol() {
        let mut band = ThresholdBand::new(AlarmChannel::Temperature, 20, 30).unwrap();
        assert_eq!(band.state(), BandState::Disabled);
        assert_eq!(band.arm(), Err(PanelError::BandDisabled(AlarmChannel::Temperature)));

        band.enable();
        assert_eq!(band.state(), BandState::Configuring);
        assert!(!band.is_enabled());

        let bounds = band.arm().unwrap();
        assert_eq!(bounds, Bounds { lower: 20, upper: 30 });
        assert!(band.is_enabled());

        band.disable();
        assert_eq!(band.state(), BandState::Disabled);
        assert_eq!(band.armed_bounds(), None);
    }

    #[test]
    fn test_disable_while_configuring() {
        let mut band = ThresholdBand::new(AlarmChannel::Temperature, 20, 30).unwrap();
        band.enable();
        band.set_bounds(22, 28).unwrap();
        assert_eq!(band.state(), BandState::Configuring);

        band.disable();
        assert_eq!(band.state(), BandState::Disabled);
        assert_eq!(band.arm(), Err(PanelError::BandDisabled(AlarmChannel::Temperature)));
        assert_eq!(band.armed_bounds(), None);

        let hot = Reading::new(Sample::new(99.0, 75.0, 760.0), 0, Local::now());
        assert!(evaluate(&hot, &[band]).is_empty());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut band = ThresholdBand::new(AlarmChannel::Temperature, 30, 20).unwrap();
        band.enable();
        assert_eq!(
            band.arm(),
            Err(PanelError::InvalidBand {
                channel: AlarmChannel::Temperature,
                lower: 30,
                upper: 20,
            })
        );
        assert_eq!(band.state(), BandState::Configuring);

        band.set_bounds(20, 30).unwrap();
        assert!(band.arm().is_ok());
    }

    #[test]
    fn test_rejected_rearm_keeps_armed_bounds() {
        let mut band = ThresholdBand::new(AlarmChannel::Humidity, 50, 90).unwrap();
        band.enable();
        band.arm().unwrap();

        band.set_bounds(95, 60).unwrap();
        assert!(band.arm().is_err());
        assert_eq!(band.armed_bounds(), Some(Bounds { lower: 50, upper: 90 }));
        assert_eq!(band.draft(), Bounds { lower: 95, upper: 60 });
    }

    #[test]
    fn test_bound_ranges_per_channel() {
        assert!(ThresholdBand::new(AlarmChannel::Humidity, 0, 100).is_ok());
        assert!(matches!(
            ThresholdBand::new(AlarmChannel::Humidity, -1, 50),
            Err(PanelError::BoundOutOfRange { value: -1, .. })
        ));
        assert!(ThresholdBand::new(AlarmChannel::Humidity, 10, 101).is_err());
        assert!(ThresholdBand::new(AlarmChannel::Temperature, -273, 500).is_ok());
        assert!(ThresholdBand::new(AlarmChannel::Temperature, -274, 0).is_err());
    }

    #[test]
    fn test_disabled_band_is_not_editable() {
        let mut band = ThresholdBand::new(AlarmChannel::Humidity, 50, 90).unwrap();
        assert_eq!(
            band.set_bounds(40, 60),
            Err(PanelError::BandDisabled(AlarmChannel::Humidity))
        );
        assert_eq!(band.draft(), Bounds { lower: 50, upper: 90 });
    }

    #[test]
    fn test_lines_follow_armed_state() {
        let mut window = TelemetryWindow::new(false);
        let mut band = ThresholdBand::new(AlarmChannel::Temperature, 20, 30).unwrap();
        band.enable();
        band.arm().unwrap();
        assert_eq!(band.lines(&window), None);

        for _ in 0..3 {
            window.append(Sample::new(25.0, 75.0, 760.0), Local::now());
        }
        let lines = band.lines(&window).unwrap();
        assert_eq!((lines.lower.x_start, lines.lower.x_end, lines.lower.y), (0, 2, 20.0));
        assert_eq!(lines.upper.y, 30.0);

        band.disable();
        assert_eq!(band.lines(&window), None);
    }
}
