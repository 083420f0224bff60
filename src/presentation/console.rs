// Console front end - reads commands from stdin and renders snapshots to stdout
use crate::application::cycle_stream::auto_update;
use crate::domain::dashboard::{ChannelSeries, PanelSnapshot};
use crate::domain::reading::Channel;
use crate::domain::threshold::BandState;
use crate::infrastructure::config::OutputFormat;
use crate::presentation::app_state::AppState;
use crate::presentation::commands::{Command, CommandError};
use crate::presentation::handlers::{handle, Reply};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const ALARMS_SHOWN: usize = 5;

pub async fn run(state: AppState) -> anyhow::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    drive(state, input, &mut std::io::stdout(), tokio::signal::ctrl_c()).await
}

/// Console loop over any line source. `interrupt` ends it at any point,
/// including while a command is still waiting on the panel.
async fn drive<R, F>(mut state: AppState, input: R, out: &mut impl Write, interrupt: F) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Future,
{
    let mut lines = input.lines();
    let mut stdin_open = true;
    let mut updates = start_updates(&state);
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            Some(snapshot) = next_update(&mut updates) => {
                render(&snapshot, state.output, out)?;
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    // Without a console only auto update can drive the panel
                    stdin_open = false;
                    if updates.is_none() {
                        break;
                    }
                    continue;
                };

                match line.parse::<Command>() {
                    Ok(command) => {
                        let reply = tokio::select! {
                            reply = handle(&mut state, command) => reply,
                            _ = &mut interrupt => {
                                tracing::info!("Interrupted");
                                break;
                            }
                        };
                        match reply {
                            Reply::Snapshot(snapshot) => render(&snapshot, state.output, out)?,
                            Reply::Message(message) => writeln!(out, "{}", message)?,
                            Reply::Silent => {}
                            Reply::Quit => break,
                        }
                    }
                    Err(CommandError::Empty) => {}
                    Err(e) => writeln!(out, "{}", e)?,
                }

                if state.auto_update != updates.is_some() {
                    updates = start_updates(&state);
                }
            }
            _ = &mut interrupt => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}

fn start_updates(state: &AppState) -> Option<BoxStream<'static, PanelSnapshot>> {
    if !state.auto_update {
        return None;
    }
    Some(auto_update(state.panel.clone(), state.update_interval()).boxed())
}

async fn next_update(updates: &mut Option<BoxStream<'static, PanelSnapshot>>) -> Option<PanelSnapshot> {
    match updates {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

pub fn render(snapshot: &PanelSnapshot, format: OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(snapshot)?)?,
        OutputFormat::Text => render_text(snapshot, out)?,
    }
    out.flush()?;
    Ok(())
}

fn render_text(snapshot: &PanelSnapshot, out: &mut impl Write) -> std::io::Result<()> {
    let mode = if snapshot.simulated { "imitation" } else { "live" };
    match &snapshot.latest {
        Some(latest) => writeln!(
            out,
            "[{}] #{} ({})",
            latest.taken_at.format("%Y-%m-%d %H:%M:%S%.3f"),
            latest.sequence_index,
            mode
        )?,
        None => writeln!(out, "[no data] ({})", mode)?,
    }

    for series in Channel::ALL.into_iter().filter_map(|channel| snapshot.series(channel)) {
        writeln!(out, "  {}", series_line(series))?;
    }

    for band in &snapshot.bands {
        if let BandState::Configuring = band.state {
            writeln!(out, "  {} VVA not set", band.channel)?;
        }
    }

    for alarm in snapshot.alarms.iter().take(ALARMS_SHOWN) {
        writeln!(out, "  ! {}", alarm)?;
    }
    if snapshot.alarms.len() > ALARMS_SHOWN {
        writeln!(out, "  ! ... {} older", snapshot.alarms.len() - ALARMS_SHOWN)?;
    }
    Ok(())
}

fn series_line(series: &ChannelSeries) -> String {
    let name = series.channel.to_string();
    let Some(latest) = series.points.last() else {
        return format!("{:<12} N/A", name);
    };

    let mut line = format!("{:<12} {:>8.2} {:<5}", name, latest.y, series.unit);
    if let Some(stats) = &series.stats {
        line.push_str(&format!(
            " mean {:.2}  min {:.2}  max {:.2}",
            stats.mean, stats.min, stats.max
        ));
    }
    if let Some(threshold) = &series.threshold {
        line.push_str(&format!("  vva [{}, {}]", threshold.lower.y, threshold.upper.y));
    }
    line
}
