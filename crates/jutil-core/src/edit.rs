// Tree navigation and key-level edits over serde_json::Value.
// Highlights:
// - `navigate` walks a `Path` prefix and hands back the container holding the key.
// - `NavMode::CreateMissing` builds empty objects for absent prefix segments,
//   `NavMode::Strict` reports them as `PathNotFound`; `NavMode::for_command` picks one.
// - Inspect: `lookup`. Modify: `set_key`, `add_key`, `replace_key`, `remove_key`.
// Only object keys are addressed; arrays are leaves like any other non-object.
use serde_json::{Map, Value};
use tracing::debug;

use crate::coerce::{CoercionType, coerce};
use crate::command::Command;
use crate::error::{Error, Result};
use crate::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    Strict,
    CreateMissing,
}

impl NavMode {
    /// Set and Add build missing intermediate objects; everything else walks strictly.
    pub fn for_command(cmd: Command) -> Self {
        match cmd {
            Command::Set | Command::Add => NavMode::CreateMissing,
            _ => NavMode::Strict,
        }
    }
}

fn not_an_object(path: &Path, segment: &str) -> Error {
    Error::NotAnObject {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}

fn key_not_found(path: &Path) -> Error {
    Error::KeyNotFound {
        path: path.to_string(),
        key: path.key().to_string(),
    }
}

/// Walk the prefix of `path` and return the object that holds (or will hold) its key.
pub fn navigate<'a>(root: &'a mut Value, path: &Path, mode: NavMode) -> Result<&'a mut Map<String, Value>> {
    let mut target = root;
    for part in path.prefix() {
        let obj = target.as_object_mut().ok_or_else(|| not_an_object(path, part))?;
        if !obj.contains_key(part.as_str()) {
            match mode {
                NavMode::CreateMissing => {
                    debug!(segment = %part, "creating intermediate object");
                    obj.insert(part.clone(), Value::Object(Map::new()));
                }
                NavMode::Strict => {
                    return Err(Error::PathNotFound {
                        path: path.to_string(),
                        segment: part.clone(),
                    });
                }
            }
        }
        target = match obj.get_mut(part.as_str()) {
            Some(next @ Value::Object(_)) => next,
            _ => return Err(not_an_object(path, part)),
        };
    }
    target.as_object_mut().ok_or_else(|| not_an_object(path, path.key()))
}

/// Read-only counterpart of `navigate` in strict mode, resolving the key itself.
pub fn lookup<'a>(root: &'a Value, path: &Path) -> Result<&'a Value> {
    let mut target = root;
    for part in path.prefix() {
        let obj = target.as_object().ok_or_else(|| not_an_object(path, part))?;
        target = match obj.get(part.as_str()) {
            Some(next @ Value::Object(_)) => next,
            Some(_) => return Err(not_an_object(path, part)),
            None => {
                return Err(Error::PathNotFound {
                    path: path.to_string(),
                    segment: part.clone(),
                });
            }
        };
    }
    let obj = target.as_object().ok_or_else(|| not_an_object(path, path.key()))?;
    obj.get(path.key()).ok_or_else(|| key_not_found(path))
}

/// Upsert: coerce against whatever is already at the key, then store.
pub fn set_key(root: &mut Value, path: &Path, raw: &str, declared: Option<CoercionType>) -> Result<Value> {
    let obj = navigate(root, path, NavMode::for_command(Command::Set))?;
    let value = coerce(raw, declared, obj.get(path.key()))?;
    obj.insert(path.key().to_string(), value.clone());
    Ok(value)
}

/// Insert only when the key is absent.
pub fn add_key(root: &mut Value, path: &Path, raw: &str, declared: Option<CoercionType>) -> Result<Value> {
    let obj = navigate(root, path, NavMode::for_command(Command::Add))?;
    if obj.contains_key(path.key()) {
        return Err(Error::KeyAlreadyExists {
            path: path.to_string(),
            key: path.key().to_string(),
        });
    }
    let value = coerce(raw, declared, None)?;
    obj.insert(path.key().to_string(), value.clone());
    Ok(value)
}

/// Update only when the key is present, keeping its type unless `declared` says otherwise.
pub fn replace_key(root: &mut Value, path: &Path, raw: &str, declared: Option<CoercionType>) -> Result<Value> {
    let obj = navigate(root, path, NavMode::for_command(Command::Replace))?;
    let slot = obj.get_mut(path.key()).ok_or_else(|| key_not_found(path))?;
    let value = coerce(raw, declared, Some(&*slot))?;
    *slot = value.clone();
    Ok(value)
}

/// Remove the key, returning the old value. The key must exist.
pub fn remove_key(root: &mut Value, path: &Path) -> Result<Value> {
    let obj = navigate(root, path, NavMode::for_command(Command::Delete))?;
    // shift_remove keeps the order of the remaining keys
    obj.shift_remove(path.key()).ok_or_else(|| key_not_found(path))
}
