//! CLI-specific type definitions.

/// Exit codes for the CLI application.
///
/// - 0: success, including a source that was already registered
/// - 1: provisioning or status failure
/// - 2: invalid command-line usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,

    /// A remote step failed; the classified reason was printed to stderr
    Failure,

    /// Arguments were rejected before any AWS call
    Usage,
}

impl ExitCode {
    /// Convert to the integer exit code for process::exit()
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Usage => 2,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(exit_code: ExitCode) -> Self {
        exit_code.code()
    }
}
