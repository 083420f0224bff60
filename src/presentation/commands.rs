// Console commands
use crate::domain::threshold::AlarmChannel;
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  get                          take one reading
  clear                        clear the plot window and alarm log
  auto on|off                  toggle periodic updates
  interval <ms>                update interval, 0-10000
  sim on|off                   simulated or live sensor
  vva temp|humi on|off         enable or disable a threshold band
  bounds temp|humi <lo> <hi>   edit a band's bounds
  set                          arm every enabled band
  show                         print the current panel
  help                         this text
  quit                         exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Get,
    Clear,
    Auto(bool),
    Interval(u64),
    Simulation(bool),
    Band { channel: AlarmChannel, enabled: bool },
    Bounds { channel: AlarmChannel, lower: i32, upper: i32 },
    Arm,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a whole number")]
    BadNumber(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        let command = match (verb.to_ascii_lowercase().as_str(), args) {
            ("get", []) => Command::Get,
            ("clear", []) => Command::Clear,
            ("auto", [flag]) => Command::Auto(switch(flag).ok_or(CommandError::Usage("auto on|off"))?),
            ("interval", [ms]) => Command::Interval(number(ms)?),
            ("sim", [flag]) => Command::Simulation(switch(flag).ok_or(CommandError::Usage("sim on|off"))?),
            ("vva", [channel, flag]) => {
                let usage = CommandError::Usage("vva temp|humi on|off");
                Command::Band {
                    channel: alarm_channel(channel).ok_or(usage.clone())?,
                    enabled: switch(flag).ok_or(usage)?,
                }
            }
            ("bounds", [channel, lower, upper]) => Command::Bounds {
                channel: alarm_channel(channel).ok_or(CommandError::Usage("bounds temp|humi <lower> <upper>"))?,
                lower: number(lower)?,
                upper: number(upper)?,
            },
            ("set", []) => Command::Arm,
            ("show", []) => Command::Show,
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            (other, _) if is_known(other) => return Err(CommandError::Usage(usage_for(other))),
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn switch(word: &str) -> Option<bool> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn alarm_channel(word: &str) -> Option<AlarmChannel> {
    match word.to_ascii_lowercase().as_str() {
        "temp" | "temperature" => Some(AlarmChannel::Temperature),
        "humi" | "humidity" => Some(AlarmChannel::Humidity),
        _ => None,
    }
}

fn number<T: FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse().map_err(|_| CommandError::BadNumber(word.to_string()))
}

fn is_known(verb: &str) -> bool {
    matches!(
        verb,
        "get" | "clear" | "auto" | "interval" | "sim" | "vva" | "bounds" | "set" | "show" | "quit" | "exit"
    )
}

fn usage_for(verb: &str) -> &'static str {
    match verb {
        "auto" => "auto on|off",
        "interval" => "interval <ms>",
        "sim" => "sim on|off",
        "vva" => "vva temp|humi on|off",
        "bounds" => "bounds temp|humi <lower> <upper>",
        _ => "a bare command, see 'help'",
    }
}
