use thiserror::Error;

pub type Result<T> = std::result::Result<T, SweepError>;

/// Every failure a sweep can run into.
///
/// The variant decides what happens to the run:
/// * [`SweepError::Configuration`] aborts before any scan is attempted.
/// * [`SweepError::ExternalProcess`] is logged and the run moves on.
/// * [`SweepError::Parse`] stops the whole run on the first bad result.
/// * [`SweepError::Write`] is logged and the run moves on.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{program} failed for '{target}': {reason}")]
    ExternalProcess {
        program: String,
        target: String,
        reason: String,
    },

    #[error("malformed scan output: {0}")]
    Parse(String),

    #[error("failed to write report: {0}")]
    Write(String),
}

impl SweepError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    pub fn write<S: Into<String>>(message: S) -> Self {
        Self::Write(message.into())
    }

    /// Whether the error terminates the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Parse(_))
    }

    /// Process exit status for a run that ended with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Parse(_) => 3,
            Self::ExternalProcess { .. } | Self::Write(_) => 1,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
