use crate::config::ConfigError;
use crate::forms::FormError;
use crate::reports::{ArchiveError, ReportError};
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Everything that can stop a command of the roster shell.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Store(StoreError),
    Report(ReportError),
    Archive(ArchiveError),
    Form(FormError),
    NotFound { entity: &'static str, id: i64 },
}

impl AppError {
    /// Exit status for the process; input problems are distinguished from
    /// environment failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Form(_)
            | AppError::NotFound { .. }
            | AppError::Store(StoreError::UniquenessViolation { .. })
            | AppError::Store(StoreError::InvalidInput(_)) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
            AppError::Archive(err) => write!(f, "archive error: {}", err),
            AppError::Form(err) => write!(f, "invalid input: {}", err),
            AppError::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Archive(err) => Some(err),
            AppError::Form(err) => Some(err),
            AppError::NotFound { .. } => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<ArchiveError> for AppError {
    fn from(value: ArchiveError) -> Self {
        Self::Archive(value)
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_problems_exit_with_two() {
        let duplicate = AppError::from(StoreError::UniquenessViolation {
            entity: "professor",
            field: "cpf",
        });
        assert_eq!(duplicate.exit_code(), 2);
        assert_eq!(
            duplicate.to_string(),
            "store error: professor with this cpf already exists"
        );

        let missing = AppError::NotFound {
            entity: "vacancy",
            id: 4,
        };
        assert_eq!(missing.exit_code(), 2);
        assert_eq!(missing.to_string(), "vacancy 4 not found");

        let config = AppError::from(ConfigError::EmptyPath {
            name: "APP_DB_PATH",
        });
        assert_eq!(config.exit_code(), 1);
    }
}
