use std::fmt;

use serde::{Deserialize, Serialize};

/// Engine-independent outcome of a solve.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    #[serde(rename = "Time Limit")]
    TimeLimit,
    Interrupted,
    Suboptimal,
    Abnormal,
    #[serde(rename = "Not Solved")]
    NotSolved,
    Unknown,
}

impl SolverStatus {
    /// Whether the engine produced an assignment worth reporting.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible | Self::Suboptimal)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Feasible => "Feasible",
            Self::Infeasible => "Infeasible",
            Self::Unbounded => "Unbounded",
            Self::TimeLimit => "Time Limit",
            Self::Interrupted => "Interrupted",
            Self::Suboptimal => "Suboptimal",
            Self::Abnormal => "Abnormal",
            Self::NotSolved => "Not Solved",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
