//! Structured exit codes.

/// Exit codes for the phototriage application.
///
/// - 0: Success (completed normally, including a declined cache prompt)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found (completed normally, nothing to review)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the run completed and produced output.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: the scan completed but found nothing to review.
    NoDuplicates = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "PT000",
            Self::GeneralError => "PT001",
            Self::NoDuplicates => "PT002",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NoDuplicates.as_i32(), 2);
    }

    #[test]
    fn test_code_prefixes_are_distinct() {
        assert_ne!(
            ExitCode::Success.code_prefix(),
            ExitCode::GeneralError.code_prefix()
        );
    }
}
