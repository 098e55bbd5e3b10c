//! Raise-or-exit policy applied once at the top of a `get_config` call.
//!
//! The resolver and loader only ever return `Result<T, ConfigError>`.
//! [`ErrorMode::settle`] then decides whether a failure is handed back to
//! the caller or reported through the logging sink before the process
//! exits with a non-zero status.

use crate::error::ConfigError;

/// Status used when terminating after a reported failure.
pub const EXIT_FAILURE: i32 = 1;

/// How failures leave a `get_config` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Return the error to the caller.
    Raise,
    /// Log the error and terminate the process.
    #[default]
    Exit,
}

impl ErrorMode {
    /// `strict` callers want errors raised rather than the process killed.
    pub fn from_strict(strict: bool) -> Self {
        if strict { ErrorMode::Raise } else { ErrorMode::Exit }
    }

    /// Apply the mode to a finished call.
    ///
    /// In [`ErrorMode::Exit`] this never returns on failure, except for
    /// errors that are always raised (a malformed `tsconfig.json`).
    pub fn settle<T>(self, result: Result<T, ConfigError>) -> Result<T, ConfigError> {
        match result {
            Err(err) if self.terminates(&err) => {
                report(&err);
                std::process::exit(EXIT_FAILURE)
            }
            other => other,
        }
    }

    /// Whether `err` would terminate the process under this mode.
    pub fn terminates(self, err: &ConfigError) -> bool {
        self == ErrorMode::Exit && !err.always_raised()
    }
}

/// Write a failure to the logging sink.
pub fn report(err: &ConfigError) {
    match err.detail() {
        Some(detail) => tracing::error!(kind = %err.kind(), %detail, "{}", err.log_line()),
        None => tracing::error!(kind = %err.kind(), "{}", err.log_line()),
    }
}
