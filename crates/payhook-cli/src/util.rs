use anyhow::{Context as _, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{invalid_input, not_found};

const STDIN_MARKER: &str = "-";

/// Where a JSON record is read from: a file path or `-` for stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    Path(PathBuf),
}

impl InputSource {
    pub fn is_stdin(&self) -> bool {
        matches!(self, InputSource::Stdin)
    }
}

impl FromStr for InputSource {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("input path cannot be empty".to_string());
        }
        if trimmed == STDIN_MARKER {
            return Ok(InputSource::Stdin);
        }
        Ok(InputSource::Path(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

pub fn read_json(source: &InputSource) -> Result<Value> {
    let contents = match source {
        InputSource::Stdin => {
            let mut buf = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut buf)
                .with_context(|| "read stdin")?;
            buf
        }
        InputSource::Path(path) => {
            if !path.exists() {
                return Err(not_found(format!("input file {}", path.display())));
            }
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
    };

    if contents.trim().is_empty() {
        return Err(invalid_input(format!("{source} is empty")));
    }
    serde_json::from_str(&contents)
        .map_err(|err| invalid_input(format!("{source} is not valid JSON: {err}")))
}
