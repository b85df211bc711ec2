//! Static remediation advice, one fixed list per vulnerability category.

use crate::scoring::category::VulnerabilityCategory;

/// Returned when nothing was detected.
pub const GENERIC_RECOMMENDATION: &str =
    "No specific recommendations. Continue monitoring for new vulnerabilities.";

pub const MAX_RECOMMENDATIONS: usize = 5;

pub fn remediation(category: VulnerabilityCategory) -> &'static [&'static str] {
    match category {
        VulnerabilityCategory::Reentrancy => &[
            "Implement checks-effects-interactions pattern (update state before external calls)",
            "Add ReentrancyGuard modifier from OpenZeppelin",
            "Use transfer() instead of call() for ETH transfers",
            "Review all functions with external calls",
        ],
        VulnerabilityCategory::UncheckedExternalCall => &[
            "Check return values of call(), send(), delegatecall()",
            "Use require() to handle failures explicitly",
            "Consider using OpenZeppelin's Address.sendValue()",
            "Add event logging for all external calls",
        ],
        VulnerabilityCategory::AccessControl => &[
            "Add onlyOwner or role-based access control modifiers",
            "Never use tx.origin for authentication (use msg.sender)",
            "Implement OpenZeppelin's Ownable or AccessControl",
            "Review constructor naming (should match contract name)",
        ],
        VulnerabilityCategory::DangerousConstruct => &[
            "Replace tx.origin with msg.sender for authentication",
            "Remove selfdestruct() or add strict access controls",
            "Document why dangerous construct is necessary",
            "Consider alternative architectures",
        ],
    }
}

/// Concatenated advice for `detected`, first occurrence kept, capped.
pub fn recommendations_for(detected: &[VulnerabilityCategory]) -> Vec<String> {
    if detected.is_empty() {
        return vec![GENERIC_RECOMMENDATION.to_string()];
    }

    let lines = detected.iter().flat_map(|c| remediation(*c).iter().copied());
    crate::util::deterministic::dedup_first_seen(lines)
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}
