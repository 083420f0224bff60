// Transport trait for live sensor access
use crate::domain::reading::Sample;

pub trait Transport: Send {
    /// Fetch one sample from the sensor. `None` on any transport failure.
    fn get_reading(&mut self) -> Option<Sample>;
}
