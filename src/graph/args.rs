//! Typed navigation arguments.
//!
//! Destinations declare the arguments they accept (`Argument`), optionally with
//! a default. When an entry is created the defaults are laid down first and the
//! supplied values on top, then every declared argument that ended up present
//! is checked against its type.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};
use crate::graph::DestinationId;

/// A single argument value.
///
/// Untagged so TOML graph files and JSON snapshots carry plain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ArgValue {
    pub fn arg_type(&self) -> ArgType {
        match self {
            ArgValue::Bool(_) => ArgType::Bool,
            ArgValue::Int(_) => ArgType::Int,
            ArgValue::Float(_) => ArgType::Float,
            ArgValue::Str(_) => ArgType::Str,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Float(x) => write!(f, "{x}"),
            ArgValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<f64> for ArgValue {
    fn from(x: f64) -> Self {
        ArgValue::Float(x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    Bool,
    Int,
    Float,
    #[serde(alias = "string")]
    Str,
}

impl ArgType {
    pub fn name(self) -> &'static str {
        match self {
            ArgType::Bool => "bool",
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::Str => "string",
        }
    }

    /// Parses a raw string (e.g. a deep-link path segment) into this type.
    pub fn parse(self, raw: &str) -> Option<ArgValue> {
        match self {
            ArgType::Bool => raw.parse().ok().map(ArgValue::Bool),
            ArgType::Int => raw.parse().ok().map(ArgValue::Int),
            ArgType::Float => raw.parse().ok().map(ArgValue::Float),
            ArgType::Str => Some(ArgValue::Str(raw.to_string())),
        }
    }

    fn accepts(self, value: &ArgValue) -> bool {
        // Ints widen to floats; nothing else converts.
        value.arg_type() == self || (self == ArgType::Float && value.arg_type() == ArgType::Int)
    }
}

/// A declared argument on a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub ty: ArgType,
    #[serde(default)]
    pub default: Option<ArgValue>,
}

impl Argument {
    pub fn new(ty: ArgType) -> Self {
        Self { ty, default: None }
    }

    pub fn with_default(ty: ArgType, default: impl Into<ArgValue>) -> Self {
        Self {
            ty,
            default: Some(default.into()),
        }
    }
}

/// Materialized argument mapping, ordered by name so logs and snapshots are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
        self.0.iter()
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Args) {
        for (k, v) in other.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }
}

impl FromIterator<(String, ArgValue)> for Args {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Args(iter.into_iter().collect())
    }
}

/// Lays `supplied` over the declared defaults and verifies the declared types.
pub fn with_defaults(
    destination: &DestinationId,
    declared: &BTreeMap<String, Argument>,
    supplied: &Args,
) -> NavResult<Args> {
    let mut merged: Args = declared
        .iter()
        .filter_map(|(name, arg)| arg.default.clone().map(|d| (name.clone(), d)))
        .collect();
    merged.merge(supplied);

    for (name, arg) in declared {
        if let Some(value) = merged.get(name)
            && !arg.ty.accepts(value)
        {
            return Err(NavError::InvalidArgument {
                destination: destination.clone(),
                name: name.clone(),
                expected: arg.ty.name(),
            });
        }
    }
    Ok(merged)
}
