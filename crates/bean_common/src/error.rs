//! Knowledge base errors
//!
//! Lookups of unknown ids are the only runtime failure; callers usually
//! recover them as an absent result.

/// Errors returned by knowledge base lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KbError {
    #[error("Pest not found: {0}")]
    PestNotFound(String),

    #[error("Control not found: {0}")]
    ControlNotFound(String),

    /// Only raised by strict diagnosis; the default path ignores unknown symptoms
    #[error("Unknown symptom: {0}")]
    UnknownSymptom(String),
}

impl KbError {
    /// True for lookups of ids the catalog does not know
    pub fn is_not_found(&self) -> bool {
        matches!(self, KbError::PestNotFound(_) | KbError::ControlNotFound(_))
    }
}
