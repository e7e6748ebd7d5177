//! Validator behavior policies.

use serde::{Deserialize, Serialize};

/// How a validator decides its vote on a receipt.
///
/// The coordinator only ever calls [`decide`](Policy::decide), so new
/// adversarial policies are added here without touching the voting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// Actually audits: votes "invalid" on a trapdoor, "valid" otherwise.
    Honest,

    /// Rubber-stamps everything as valid without looking. This is exactly
    /// the behavior the trapdoor mechanism exists to catch.
    Lazy,

    /// Rejects everything, genuine or not.
    Malicious,
}

impl Policy {
    /// The validity judgment this policy casts for a receipt with the
    /// given trapdoor flag.
    pub fn decide(&self, is_trapdoor: bool) -> bool {
        match self {
            Policy::Honest => !is_trapdoor,
            Policy::Lazy => true,
            Policy::Malicious => false,
        }
    }

    /// Returns the policy name.
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Honest => "honest",
            Policy::Lazy => "lazy",
            Policy::Malicious => "malicious",
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
