use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 16;

/// Field order of the flat classifier input. Part of the external contract.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "external_call_count",
    "delegatecall_count",
    "send_transfer_count",
    "state_writes_before_call",
    "state_writes_after_call",
    "public_function_count",
    "external_function_count",
    "private_function_count",
    "has_access_control_modifier",
    "has_reentrancy_guard",
    "uses_tx_origin",
    "has_selfdestruct",
    "unchecked_call_count",
    "max_call_depth",
    "has_cycle_with_external_call",
    "external_calls_in_cycles",
];

/// Fixed-order numeric encoding of a compilation unit's static properties.
///
/// The default value is the all-zero vector of a unit with no functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector {
    // External calls
    pub external_call_count: u64,
    pub delegatecall_count: u64,
    pub send_transfer_count: u64,

    // Checks-effects-interactions
    pub state_writes_before_call: u64,
    pub state_writes_after_call: u64,

    // Visibility; internal functions are not counted
    pub public_function_count: u64,
    pub external_function_count: u64,
    pub private_function_count: u64,

    // Security modifiers
    pub has_access_control_modifier: bool,
    pub has_reentrancy_guard: bool,

    // Dangerous constructs
    pub uses_tx_origin: bool,
    pub has_selfdestruct: bool,
    pub unchecked_call_count: u64,

    // Call graph
    pub max_call_depth: u64,
    pub has_cycle_with_external_call: bool,
    pub external_calls_in_cycles: u64,
}

impl FeatureVector {
    /// Flat form in `FEATURE_NAMES` order; booleans encode as 0/1.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        [
            self.external_call_count as f64,
            self.delegatecall_count as f64,
            self.send_transfer_count as f64,
            self.state_writes_before_call as f64,
            self.state_writes_after_call as f64,
            self.public_function_count as f64,
            self.external_function_count as f64,
            self.private_function_count as f64,
            flag(self.has_access_control_modifier),
            flag(self.has_reentrancy_guard),
            flag(self.uses_tx_origin),
            flag(self.has_selfdestruct),
            self.unchecked_call_count as f64,
            self.max_call_depth as f64,
            flag(self.has_cycle_with_external_call),
            self.external_calls_in_cycles as f64,
        ]
    }

    /// `(name, value)` pairs in field order.
    pub fn entries(&self) -> [(&'static str, f64); FEATURE_COUNT] {
        let values = self.to_array();
        std::array::from_fn(|i| (FEATURE_NAMES[i], values[i]))
    }

    /// Value of a named feature.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.to_array()[i])
    }
}
