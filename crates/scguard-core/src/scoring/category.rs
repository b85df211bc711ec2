use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of vulnerability classes scored by the classifier.
///
/// Declaration order is the canonical order used for every iteration,
/// so sums and listings are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnerabilityCategory {
    Reentrancy,
    UncheckedExternalCall,
    AccessControl,
    DangerousConstruct,
}

impl VulnerabilityCategory {
    pub const ALL: [Self; 4] = [
        Self::Reentrancy,
        Self::UncheckedExternalCall,
        Self::AccessControl,
        Self::DangerousConstruct,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reentrancy => "reentrancy",
            Self::UncheckedExternalCall => "unchecked_external_call",
            Self::AccessControl => "access_control",
            Self::DangerousConstruct => "dangerous_construct",
        }
    }
}

impl fmt::Display for VulnerabilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_name() {
        for category in VulnerabilityCategory::ALL {
            let wire = serde_json::to_string(&category).unwrap();
            assert_eq!(wire.trim_matches('"'), category.to_string());
        }
    }

    #[test]
    fn canonical_order_is_declaration_order() {
        let mut shuffled = vec![
            VulnerabilityCategory::DangerousConstruct,
            VulnerabilityCategory::Reentrancy,
            VulnerabilityCategory::AccessControl,
            VulnerabilityCategory::UncheckedExternalCall,
        ];
        shuffled.sort();
        assert_eq!(shuffled, VulnerabilityCategory::ALL.to_vec());
    }

    #[test]
    fn unknown_category_fails_to_deserialize() {
        let result: Result<VulnerabilityCategory, _> = serde_json::from_str("\"overflow\"");
        assert!(result.is_err());
    }
}
