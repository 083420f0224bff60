// Application layer - Sampling, alarm evaluation and the cycle that ties them together
pub mod alarm_evaluator;
pub mod cycle_stream;
pub mod panel_controller;
pub mod sample_source;
pub mod transport;
