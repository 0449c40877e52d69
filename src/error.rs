//! Top-level error type and process exit codes.

use crate::config::ConfigError;
use crate::grid::GridError;
use crate::normalize::NormalizeError;
use crate::output::OutputError;

/// Exit code for failures before the chart file is written.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the chart could not be persisted.
pub const EXIT_PERSIST_FAILURE: i32 = 2;

/// Any failure of a conversion run.
///
/// Every variant aborts the run. `main` prints the message to stderr and
/// exits with [`AppError::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Output(_) => EXIT_PERSIST_FAILURE,
            _ => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_persist_failure_has_distinct_exit_code() {
        let err = AppError::from(OutputError::Write {
            path: PathBuf::from("out.xml"),
            source: std::io::Error::other("disk full"),
        });
        assert_eq!(err.exit_code(), EXIT_PERSIST_FAILURE);
        assert!(err.to_string().contains("out.xml"));
    }

    #[test]
    fn test_other_failures_exit_with_one() {
        let err = AppError::from(GridError::UnsupportedColorModel(image::ColorType::Rgb8));
        assert_eq!(err.exit_code(), EXIT_FAILURE);

        let err = AppError::from(NormalizeError::ConverterNotFound("convert".to_string()));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }
}
