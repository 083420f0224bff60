// Line-oriented serial transport
use crate::application::transport::Transport;
use crate::domain::reading::Sample;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// Reads `temperature humidity pressure` lines (comma or whitespace
/// separated) from a character device. The device is opened lazily and
/// reopened after any failure.
pub struct SerialTransport {
    port: PathBuf,
    reader: Option<BufReader<File>>,
}

impl SerialTransport {
    pub fn new(port: impl Into<PathBuf>) -> Self {
        Self {
            port: port.into(),
            reader: None,
        }
    }

    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let reader = match self.reader.take() {
            Some(reader) => reader,
            None => BufReader::new(File::open(&self.port)?),
        };
        let reader = self.reader.insert(reader);

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl Transport for SerialTransport {
    fn get_reading(&mut self) -> Option<Sample> {
        let line = match self.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::warn!("Sensor port {} reached end of stream", self.port.display());
                self.reader = None;
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read sensor port {}: {}", self.port.display(), e);
                self.reader = None;
                return None;
            }
        };

        let sample = parse_sample(&line);
        if sample.is_none() {
            tracing::warn!("Discarding malformed sensor line: {:?}", line.trim_end());
        }
        sample
    }
}

pub fn parse_sample(line: &str) -> Option<Sample> {
    let values: Vec<f64> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<_, _>>()
        .ok()?;

    match values.as_slice() {
        [t, h, p] if values.iter().all(|v| v.is_finite()) => Some(Sample::new(*t, *h, *p)),
        _ => None,
    }
}
