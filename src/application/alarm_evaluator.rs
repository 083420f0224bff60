// Alarm evaluator - Checks a reading against the armed threshold bands
use crate::domain::reading::Reading;
use crate::domain::threshold::{AlarmEvent, AlarmKind, ThresholdBand};

/// Events raised by `reading` against `bands`.
///
/// Pure: no memory of earlier alarms, so a value that stays out of band
/// raises a fresh event every cycle. Bands that are not armed are skipped.
pub fn evaluate(reading: &Reading, bands: &[ThresholdBand]) -> Vec<AlarmEvent> {
    let mut events = Vec::new();

    for band in bands {
        let Some(bounds) = band.armed_bounds() else {
            continue;
        };
        let value = reading.value(band.channel.channel());
        let event = |kind, bound| AlarmEvent {
            channel: band.channel,
            kind,
            value,
            bound,
            timestamp: reading.taken_at,
        };

        if value > f64::from(bounds.upper) {
            events.push(event(AlarmKind::AboveUpper, bounds.upper));
        }
        if value < f64::from(bounds.lower) {
            events.push(event(AlarmKind::BelowLower, bounds.lower));
        }
    }

    events
}
