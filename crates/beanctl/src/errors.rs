//! Error codes and exit status for beanctl

use bean_common::KbError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code for invalid arguments (empty or unknown symptom selection)
pub const EXIT_USAGE: i32 = 64;

/// Exit code when a pest or control id is unknown
pub const EXIT_NOT_FOUND: i32 = 66;

/// A problem with what the user asked for, as opposed to a failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Please select at least one symptom")]
    NoSymptoms,

    #[error("Unknown symptom '{0}'. Run `beanctl symptoms` to list valid symptoms")]
    UnknownSymptom(String),

    #[error("Unknown control type '{0}'. Valid types: Chemical, Biological, Botanical, Cultural")]
    UnknownControlType(String),
}

/// Map an error chain to the process exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<UsageError>().is_some() {
        return EXIT_USAGE;
    }
    match err.downcast_ref::<KbError>() {
        Some(KbError::UnknownSymptom(_)) => EXIT_USAGE,
        Some(e) if e.is_not_found() => EXIT_NOT_FOUND,
        _ => EXIT_GENERAL_ERROR,
    }
}
