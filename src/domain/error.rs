// Panel error taxonomy
use crate::domain::threshold::AlarmChannel;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PanelError {
    /// The transport produced nothing this cycle; the cycle is skipped.
    #[error("transport yielded no reading")]
    EmptyReading,

    #[error("statistics requested on an empty window")]
    EmptyWindow,

    #[error("{channel} band rejected: lower bound {lower} is above upper bound {upper}")]
    InvalidBand {
        channel: AlarmChannel,
        lower: i32,
        upper: i32,
    },

    #[error("{channel} bound {value} outside [{min}, {max}]")]
    BoundOutOfRange {
        channel: AlarmChannel,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("{0} band is disabled")]
    BandDisabled(AlarmChannel),
}
