//! Command declarations: the data a capability provider registers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The JSON type a parameter must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// A JSON string.
    String,
    /// A JSON integer (no fractional part).
    Integer,
    /// Any JSON number.
    Float,
    /// A JSON boolean.
    Boolean,
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
}

impl ParamType {
    /// Whether `value` satisfies this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
        }
    }
}

/// One named, typed, optionally-required parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Expected JSON type.
    pub param_type: ParamType,
    /// Whether the parameter must be present.
    pub required: bool,
    /// Human-readable description for the help surface.
    pub description: String,
}

impl ParamSpec {
    /// A required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            description: description.into(),
        }
    }

    /// An optional parameter.
    #[must_use]
    pub fn optional(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            description: description.into(),
        }
    }
}

/// A command declaration: stable name, flags, and parameter schema.
///
/// Built once by a provider at registration; immutable thereafter.
///
/// # Example
///
/// ```
/// use warden_dispatch::{CommandSpec, ParamSpec, ParamType};
///
/// let spec = CommandSpec::new("mouse.click", "Click at coordinates")
///     .mutating()
///     .input_injecting()
///     .param(ParamSpec::required("x", ParamType::Integer, "X coordinate"))
///     .param(ParamSpec::required("y", ParamType::Integer, "Y coordinate"));
/// assert_eq!(spec.category(), "mouse");
/// assert!(spec.mutating);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Dot-separated `category.action[_qualifier]`, stable across versions.
    pub name: String,
    /// Human-readable description for the help surface.
    pub description: String,
    /// Whether the command changes system state (vs. a read-only query).
    pub mutating: bool,
    /// Whether the command executes shell commands and is subject to the
    /// command policy and audit logging.
    pub shell_like: bool,
    /// Whether the command injects pointer/keyboard input and is subject to
    /// the safe-zone restriction.
    pub input_injecting: bool,
    /// Ordered parameter schema.
    pub params: Vec<ParamSpec>,
}

impl CommandSpec {
    /// Create a read-only command with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            mutating: false,
            shell_like: false,
            input_injecting: false,
            params: Vec::new(),
        }
    }

    /// Mark the command as mutating.
    #[must_use]
    pub fn mutating(mut self) -> Self {
        self.mutating = true;
        self
    }

    /// Mark the command as shell-like (policy-checked and audited).
    #[must_use]
    pub fn shell_like(mut self) -> Self {
        self.shell_like = true;
        self
    }

    /// Mark the command as input-injecting (safe-zone restricted).
    #[must_use]
    pub fn input_injecting(mut self) -> Self {
        self.input_injecting = true;
        self
    }

    /// Append a parameter to the schema.
    #[must_use]
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// The category part of the name (before the first dot).
    #[must_use]
    pub fn category(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }

    /// The action part of the name (after the first dot).
    #[must_use]
    pub fn action(&self) -> &str {
        self.name.split_once('.').map_or("", |(_, action)| action)
    }
}

/// Bind `params` against `spec`, producing the validated argument map.
///
/// `Value::Null` is accepted as "no parameters". Returns a human-readable
/// diagnostic on the first missing required parameter, type mismatch,
/// undeclared parameter, or non-object input.
pub(crate) fn bind_params(
    spec: &CommandSpec,
    params: &Value,
) -> Result<serde_json::Map<String, Value>, String> {
    let supplied = match params {
        Value::Null => serde_json::Map::new(),
        Value::Object(map) => map.clone(),
        other => {
            return Err(format!(
                "parameters must be a JSON object, got {}",
                json_type_name(other)
            ));
        },
    };

    for param in &spec.params {
        match supplied.get(&param.name) {
            None | Some(Value::Null) if param.required => {
                return Err(format!("missing required parameter '{}'", param.name));
            },
            Some(value) if !value.is_null() && !param.param_type.accepts(value) => {
                return Err(format!(
                    "parameter '{}' must be a {}, got {}",
                    param.name,
                    param.param_type,
                    json_type_name(value)
                ));
            },
            _ => {},
        }
    }

    for name in supplied.keys() {
        if !spec.params.iter().any(|p| p.name == *name) {
            return Err(format!("unknown parameter '{name}'"));
        }
    }

    Ok(supplied)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
