use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

define_index_newtype!(TerminalIdx, Terminal);

#[derive(Serialize, Debug, Clone)]
pub struct Terminal {
    pub(crate) external_id: String,
    pub(crate) max_buses: Option<u32>,
}

impl Terminal {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Upper bound on buses whose routes originate here. `None` when the
    /// document gives no capacity for the terminal.
    pub fn max_buses(&self) -> Option<u32> {
        self.max_buses
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TerminalCapacity {
    pub terminal_id: String,
    pub max_buses: u32,
}
