// Application state for the console front end
use crate::application::cycle_stream::SharedPanel;
use crate::infrastructure::config::{OutputFormat, PanelConfig};
use std::time::Duration;

pub struct AppState {
    pub panel: SharedPanel,
    pub update_interval_ms: u64,
    pub auto_update: bool,
    pub output: OutputFormat,
}

impl AppState {
    pub fn new(panel: SharedPanel, config: &PanelConfig) -> Self {
        Self {
            panel,
            update_interval_ms: config.panel.update_interval_ms,
            auto_update: config.panel.auto_update,
            output: config.panel.output,
        }
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}
