use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The MIP engines an adapter exists for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Pure Rust branch and bound, always linked.
    MicroLp,
    /// HiGHS, linked with the `highs` feature.
    Highs,
    /// COIN-OR CBC, linked with the `cbc` feature.
    Cbc,
}

#[derive(Debug, Error)]
#[error("unknown engine name `{0}`")]
pub struct ParseEngineError(String);

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::MicroLp, Engine::Highs, Engine::Cbc];

    pub fn name(&self) -> &'static str {
        match self {
            Engine::MicroLp => "microlp",
            Engine::Highs => "highs",
            Engine::Cbc => "cbc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Engine::MicroLp => "microlp",
            Engine::Highs => "HiGHS",
            Engine::Cbc => "CBC",
        }
    }

    /// Whether the engine was compiled into this build.
    pub fn is_linked(&self) -> bool {
        match self {
            Engine::MicroLp => true,
            Engine::Highs => cfg!(feature = "highs"),
            Engine::Cbc => cfg!(feature = "cbc"),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = ParseEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "microlp" => Ok(Engine::MicroLp),
            "highs" => Ok(Engine::Highs),
            "cbc" => Ok(Engine::Cbc),
            _ => Err(ParseEngineError(s.to_owned())),
        }
    }
}
