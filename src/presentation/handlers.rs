// Console command handlers
use crate::application::cycle_stream::run_cycle;
use crate::domain::dashboard::PanelSnapshot;
use crate::infrastructure::config::check_interval;
use crate::presentation::app_state::AppState;
use crate::presentation::commands::{Command, HELP};

#[derive(Debug)]
pub enum Reply {
    Snapshot(PanelSnapshot),
    Message(String),
    Silent,
    Quit,
}

/// Applies one command. Manual-only controls are refused while auto update
/// runs, the same controls the desktop panel greys out.
pub async fn handle(state: &mut AppState, command: Command) -> Reply {
    if state.auto_update && manual_only(command) {
        return Reply::Message("unavailable while auto update is on".to_string());
    }

    match command {
        Command::Get => match run_cycle(&state.panel).await {
            Some(snapshot) => Reply::Snapshot(snapshot),
            None => Reply::Silent,
        },
        Command::Clear => {
            let mut panel = state.panel.lock().await;
            panel.clear();
            Reply::Snapshot(panel.snapshot())
        }
        Command::Auto(on) => {
            state.auto_update = on;
            Reply::Message(format!(
                "auto update {}",
                if on { "on" } else { "off" }
            ))
        }
        Command::Interval(ms) => match check_interval(ms) {
            Ok(ms) => {
                state.update_interval_ms = ms;
                Reply::Message(format!("update interval {} ms", ms))
            }
            Err(e) => Reply::Message(e.to_string()),
        },
        Command::Simulation(on) => {
            let mut panel = state.panel.lock().await;
            panel.set_simulation(on);
            Reply::Message(format!(
                "simulation {}",
                if panel.is_simulated() { "on" } else { "off" }
            ))
        }
        Command::Band { channel, enabled } => {
            let mut panel = state.panel.lock().await;
            if enabled {
                panel.enable_band(channel);
                let draft = panel.band(channel).draft();
                Reply::Message(format!(
                    "{} VVA editable, bounds [{}, {}]",
                    channel, draft.lower, draft.upper
                ))
            } else {
                panel.disable_band(channel);
                Reply::Message(format!("{} VVA off", channel))
            }
        }
        Command::Bounds {
            channel,
            lower,
            upper,
        } => match state.panel.lock().await.set_bounds(channel, lower, upper) {
            Ok(()) => Reply::Silent,
            Err(e) => Reply::Message(e.to_string()),
        },
        Command::Arm => {
            // Rejected bands stay as they were without comment
            let armed: Vec<String> = state
                .panel
                .lock()
                .await
                .arm_all()
                .into_iter()
                .filter_map(|(channel, result)| {
                    result
                        .ok()
                        .map(|b| format!("{} [{}, {}]", channel, b.lower, b.upper))
                })
                .collect();

            if armed.is_empty() {
                Reply::Silent
            } else {
                Reply::Message(format!("armed: {}", armed.join(", ")))
            }
        }
        Command::Show => Reply::Snapshot(state.panel.lock().await.snapshot()),
        Command::Help => Reply::Message(HELP.to_string()),
        Command::Quit => Reply::Quit,
    }
}

fn manual_only(command: Command) -> bool {
    matches!(
        command,
        Command::Get | Command::Clear | Command::Interval(_) | Command::Simulation(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cycle_stream::shared;
    use crate::application::panel_controller::PanelController;
    use crate::application::sample_source::tests::ScriptedTransport;
    use crate::domain::reading::Channel;
    use crate::domain::threshold::AlarmChannel;
    use crate::infrastructure::config::PanelConfig;

    fn state() -> AppState {
        let mut config = PanelConfig::default();
        config.panel.seed = Some(11);
        let panel = PanelController::from_config(&config, ScriptedTransport::boxed(vec![])).unwrap();
        AppState::new(shared(panel), &config)
    }

    #[tokio::test]
    async fn test_get_then_clear() {
        let mut state = state();
        for _ in 0..3 {
            assert!(matches!(handle(&mut state, Command::Get).await, Reply::Snapshot(_)));
        }
        assert_eq!(state.panel.lock().await.window().len(), 3);

        let Reply::Snapshot(cleared) = handle(&mut state, Command::Clear).await else {
            panic!("clear should return a snapshot");
        };
        assert!(cleared.latest.is_none());
        assert!(cleared.series(Channel::Temperature).unwrap().points.is_empty());
    }

    #[tokio::test]
    async fn test_manual_controls_locked_during_auto_update() {
        let mut state = state();
        handle(&mut state, Command::Auto(true)).await;

        assert!(matches!(handle(&mut state, Command::Get).await, Reply::Message(_)));
        assert!(matches!(handle(&mut state, Command::Simulation(false)).await, Reply::Message(_)));
        assert!(state.panel.lock().await.is_simulated());
        assert!(state.panel.lock().await.window().is_empty());

        handle(&mut state, Command::Auto(false)).await;
        assert!(matches!(handle(&mut state, Command::Get).await, Reply::Snapshot(_)));
    }

    #[tokio::test]
    async fn test_interval_validated() {
        let mut state = state();
        handle(&mut state, Command::Interval(20_000)).await;
        assert_eq!(state.update_interval_ms, 500);
        handle(&mut state, Command::Interval(0)).await;
        assert_eq!(state.update_interval_ms, 0);
    }

    #[tokio::test]
    async fn test_band_workflow() {
        let mut state = state();
        let channel = AlarmChannel::Temperature;

        let refused = handle(&mut state, Command::Bounds { channel, lower: 0, upper: 10 }).await;
        assert!(matches!(refused, Reply::Message(_)));

        handle(&mut state, Command::Band { channel, enabled: true }).await;
        handle(&mut state, Command::Bounds { channel, lower: 30, upper: 20 }).await;
        assert!(matches!(handle(&mut state, Command::Arm).await, Reply::Silent));
        assert!(!state.panel.lock().await.band(channel).is_enabled());

        handle(&mut state, Command::Bounds { channel, lower: 20, upper: 30 }).await;
        assert!(matches!(handle(&mut state, Command::Arm).await, Reply::Message(_)));
        assert!(state.panel.lock().await.band(channel).is_enabled());

        handle(&mut state, Command::Band { channel, enabled: false }).await;
        assert!(!state.panel.lock().await.band(channel).is_enabled());
    }
}
