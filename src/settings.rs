use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Nested settings mapping. BTreeMap keeps iteration and serialization
/// deterministic, which the merge and fingerprint code rely on.
pub type SettingsTree = BTreeMap<String, SettingsValue>;

/// A node in a settings tree: a scalar, an array (one atomic unit), or a
/// nested object. Serializes untagged so profiles and settings files stay
/// plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<SettingsValue>),
    Object(SettingsTree),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

impl SettingsValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SettingsValue::Bool(_) => ValueKind::Boolean,
            SettingsValue::Int(_) | SettingsValue::Float(_) => ValueKind::Number,
            SettingsValue::String(_) => ValueKind::String,
            SettingsValue::Array(_) => ValueKind::Array,
            SettingsValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, SettingsValue::Object(_))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PathError {
    #[error("empty settings path")]
    Empty,
    #[error("field \"{0}\" is not an object")]
    NotAnObject(String),
}

/// Structural deep merge: object-over-object recurses, everything else
/// replaces the base value wholesale. Scalars and arrays are never
/// concatenated or element-merged.
pub fn deep_merge(base: &mut SettingsTree, overlay: &SettingsTree) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(key), overlay_value) {
            (Some(SettingsValue::Object(base_child)), SettingsValue::Object(overlay_child)) => {
                deep_merge(base_child, overlay_child);
            }
            (_, value) => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Resolve a dotted path to the value it addresses, if any. Arrays are
/// atomic units: a path never descends into array elements.
pub fn get_path<'t>(tree: &'t SettingsTree, path: &str) -> Option<&'t SettingsValue> {
    let mut segments = path.split('.');
    let mut current = tree.get(segments.next()?)?;
    for segment in segments {
        match current {
            SettingsValue::Object(child) => current = child.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Write a value at a dotted path, creating intermediate objects as needed.
/// Refuses to traverse through a non-object value.
pub fn set_path(tree: &mut SettingsTree, path: &str, value: SettingsValue) -> Result<(), PathError> {
    let mut segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(PathError::Empty);
    }
    let leaf = segments.pop().ok_or(PathError::Empty)?;

    let mut current = tree;
    let mut walked = Vec::new();
    for segment in segments {
        walked.push(segment);
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| SettingsValue::Object(SettingsTree::new()));
        match entry {
            SettingsValue::Object(child) => current = child,
            _ => return Err(PathError::NotAnObject(walked.join("."))),
        }
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

/// Dotted paths of every leaf (scalar or array) in the tree, in order.
pub fn leaf_paths(tree: &SettingsTree) -> Vec<String> {
    let mut out = Vec::new();
    collect_leaf_paths("", tree, &mut out);
    out
}

fn collect_leaf_paths(prefix: &str, tree: &SettingsTree, out: &mut Vec<String>) {
    for (key, value) in tree {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            SettingsValue::Object(child) => collect_leaf_paths(&path, child, out),
            _ => out.push(path),
        }
    }
}

/// The application's baseline settings. Every field the control CLI can
/// address exists in this tree; profiles and user settings overlay it.
pub fn builtin_defaults() -> SettingsTree {
    let defaults = serde_json::json!({
        "application": {
            "adminAccess": false,
            "autoStart": false,
            "telemetry": { "enabled": true }
        },
        "containerEngine": {
            "name": "moby",
            "allowedImages": { "enabled": false, "patterns": [] }
        },
        "kubernetes": {
            "enabled": true,
            "version": "1.27.4",
            "port": 6443,
            "options": { "traefik": true, "flannel": true }
        },
        "virtualMachine": {
            "memoryInGB": 4,
            "numberCPUs": 2
        }
    });
    serde_json::from_value(defaults).expect("built-in defaults are a valid settings tree")
}
