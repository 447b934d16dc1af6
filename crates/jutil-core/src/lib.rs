//! jutil-core: path expressions, tree navigation, value coercion and command
//! dispatch for editing one JSON file in place.
//!
//! This crate focuses on a small, well-factored surface:
//! - Path parser with `\.` / `\/` escapes (`path`)
//! - Navigator and key-level edits over `serde_json::Value` (`edit`)
//! - Raw string to typed value coercion (`coerce`)
//! - Command dispatch producing messages, payloads and write-backs (`command`)
//! - Document load/save with optional atomic rename (`file`) and rendering (`json`)
//!
pub mod coerce;
pub mod command;
pub mod edit;
pub mod error;
pub mod file;
pub mod json;
pub mod path;

pub use coerce::{CoercionType, coerce, convert, resolve_type};
pub use command::{Command, Options, Outcome, Request, execute};
pub use edit::{NavMode, add_key, lookup, navigate, remove_key, replace_key, set_key};
pub use error::{Error, Result};
pub use file::{WriteMode, load_document, parse_document, save_document};
pub use json::{JsonOpts, render, to_json_string};
pub use path::{Path, parse_path};
