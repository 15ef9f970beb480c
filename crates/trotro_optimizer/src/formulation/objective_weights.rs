use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Weights of the two objective terms: fare revenue is rewarded, passenger
/// travel time is penalized.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectiveWeights {
    pub revenue: f64,
    pub time: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        ObjectiveWeights {
            revenue: 1.0,
            time: 0.1,
        }
    }
}
