use std::{collections::BTreeMap, convert::Infallible, fmt, str::FromStr};

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

/// A raw engine option value, forwarded to the engine as is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum EngineOption {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FromStr for EngineOption {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(value) = s.parse::<bool>() {
            return Ok(EngineOption::Bool(value));
        }
        if let Ok(value) = s.parse::<i64>() {
            return Ok(EngineOption::Integer(value));
        }
        if let Ok(value) = s.parse::<f64>() {
            return Ok(EngineOption::Float(value));
        }
        Ok(EngineOption::Text(s.to_owned()))
    }
}

impl fmt::Display for EngineOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineOption::Bool(value) => write!(f, "{value}"),
            EngineOption::Integer(value) => write!(f, "{value}"),
            EngineOption::Float(value) => write!(f, "{value}"),
            EngineOption::Text(value) => f.write_str(value),
        }
    }
}

/// Per-solve settings. Nothing here is interpreted by the formulation; every
/// adapter maps what its engine understands and warns about the rest.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineParams {
    pub time_limit: Option<SignedDuration>,
    pub verbose: bool,
    pub options: BTreeMap<String, EngineOption>,
}

impl EngineParams {
    pub fn with_time_limit(mut self, time_limit: SignedDuration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: EngineOption) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}
