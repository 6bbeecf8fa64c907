use thiserror::Error;

/// Errors raised while turning cluster objects into report rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    /// A CPU or memory quantity string that does not parse
    #[error("malformed quantity '{quantity}': {reason}")]
    MalformedQuantity { quantity: String, reason: String },

    /// A workload object missing the structure the reports depend on
    #[error("malformed {kind} '{name}': {reason}")]
    MalformedWorkload {
        kind: String,
        name: String,
        reason: String,
    },
}

impl InspectError {
    pub fn quantity(quantity: &str, reason: impl Into<String>) -> Self {
        Self::MalformedQuantity {
            quantity: quantity.to_string(),
            reason: reason.into(),
        }
    }

    pub fn workload(kind: impl Into<String>, name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedWorkload {
            kind: kind.into(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InspectError>;
