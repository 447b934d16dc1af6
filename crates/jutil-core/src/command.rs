//! Command dispatch: one request, applied once, to a document already in memory.
//!
//! [`execute`] never touches the filesystem. It reports what happened as an
//! [`Outcome`] and leaves printing and saving to the caller.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::coerce::CoercionType;
use crate::edit;
use crate::error::{Error, Result};
use crate::file::WriteMode;
use crate::json::{JsonOpts, render, to_json_string};
use crate::path::{Path, parse_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    Get,
    Set,
    Add,
    Replace,
    Delete,
    #[default]
    Echo,
    Pretty,
    Validate,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Set,
        Command::Add,
        Command::Replace,
        Command::Delete,
        Command::Get,
        Command::Validate,
        Command::Echo,
        Command::Pretty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Get => "get",
            Command::Set => "set",
            Command::Add => "add",
            Command::Replace => "replace",
            Command::Delete => "delete",
            Command::Echo => "echo",
            Command::Pretty => "pretty",
            Command::Validate => "validate",
        }
    }

    pub fn requires_path(self) -> bool {
        matches!(
            self,
            Command::Get | Command::Set | Command::Add | Command::Replace | Command::Delete
        )
    }

    pub fn requires_value(self) -> bool {
        matches!(self, Command::Set | Command::Add | Command::Replace)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Command::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::Usage(format!("unknown command: {s}")))
    }
}

/// Output and write settings, fixed for the whole run.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub json: JsonOpts,
    pub write_mode: WriteMode,
    pub quiet: bool,
    pub dry_run: bool,
}

/// A validated request: the path is parsed and the value is present whenever
/// the command needs them.
#[derive(Debug, Clone)]
pub struct Request {
    pub command: Command,
    pub file: PathBuf,
    pub path: Option<Path>,
    pub value: Option<String>,
    pub value_type: Option<CoercionType>,
}

impl Request {
    pub fn new(
        command: Command,
        file: impl Into<PathBuf>,
        path: Option<&str>,
        value: Option<String>,
        value_type: Option<CoercionType>,
    ) -> Result<Self> {
        let path = match (command.requires_path(), path) {
            (true, None) => {
                return Err(Error::Usage(format!("{command} requires a PATH argument")));
            }
            (true, Some(raw)) => Some(parse_path(raw)?),
            (false, _) => None,
        };
        if command.requires_value() && value.is_none() {
            return Err(Error::Usage(format!("{command} requires a VALUE argument")));
        }
        Ok(Self {
            command,
            file: file.into(),
            path,
            value,
            value_type,
        })
    }

    fn target(&self) -> Result<&Path> {
        self.path.as_ref().ok_or(Error::EmptyPath)
    }

    fn raw_value(&self) -> Result<&str> {
        self.value
            .as_deref()
            .ok_or_else(|| Error::Usage(format!("{} requires a VALUE argument", self.command)))
    }
}

/// What a command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Informational line, suppressed by `--quiet`.
    pub message: Option<String>,
    /// JSON text for stdout, always printed.
    pub payload: Option<String>,
    /// Rendered document to write back to the source file.
    pub save: Option<String>,
}

impl Outcome {
    fn message(msg: String) -> Self {
        Self {
            message: Some(msg),
            ..Self::default()
        }
    }

    fn payload(payload: String) -> Self {
        Self {
            payload: Some(payload),
            ..Self::default()
        }
    }
}

/// Apply `req` to `doc`. On error `doc` may be partially modified (intermediate
/// objects) but nothing has been written.
pub fn execute(doc: &mut Value, req: &Request, opts: &Options) -> Result<Outcome> {
    debug!(command = %req.command, file = %req.file.display(), "executing");
    let message = match req.command {
        Command::Validate => {
            return Ok(Outcome::message(format!(
                "File is valid JSON: {}",
                req.file.display()
            )));
        }
        Command::Echo => return Ok(Outcome::payload(render(doc, &opts.json))),
        Command::Pretty => return Ok(finish(doc, opts, None)),
        Command::Get => {
            let value = edit::lookup(doc, req.target()?)?;
            return Ok(Outcome::payload(render(value, &opts.json)));
        }
        Command::Delete => {
            let path = req.target()?;
            edit::remove_key(doc, path)?;
            format!("Key deleted: {path} ({})", path.key())
        }
        Command::Set | Command::Add | Command::Replace => {
            let path = req.target()?;
            let raw = req.raw_value()?;
            let (action, value) = match req.command {
                Command::Set => ("Value set", edit::set_key(doc, path, raw, req.value_type)?),
                Command::Add => ("Key added", edit::add_key(doc, path, raw, req.value_type)?),
                _ => (
                    "Value replaced",
                    edit::replace_key(doc, path, raw, req.value_type)?,
                ),
            };
            format!("{action}: {path}: {}", to_json_string(&value, &JsonOpts::compact()))
        }
    };
    Ok(finish(doc, opts, Some(message)))
}

// Render the final document: printed on a dry run, otherwise handed back for saving.
fn finish(doc: &Value, opts: &Options, message: Option<String>) -> Outcome {
    let rendered = render(doc, &opts.json);
    if opts.dry_run {
        Outcome {
            message,
            payload: Some(rendered),
            save: None,
        }
    } else {
        Outcome {
            message,
            payload: None,
            save: Some(rendered),
        }
    }
}
