use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Maps Diesel errors onto the application error taxonomy.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => Self::convert_database_error(kind, info.as_ref(), operation),
            DieselError::NotFound => AppError::not_found("resource", "id", "unknown"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let constraint = info.constraint_name();

        let converted = match kind {
            DatabaseErrorKind::UniqueViolation => ConstraintParser::parse_unique_violation(message, constraint)
                .map(|(entity, field, value)| AppError::Duplicate { entity, field, value }),
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(message, constraint).map(|(entity, field, value)| {
                    AppError::validation(&field, format!("Invalid reference from {entity} to '{value}'"))
                })
            }
            DatabaseErrorKind::CheckViolation => ConstraintParser::parse_check_violation(message, constraint)
                .map(|(entity, field)| AppError::validation(&field, format!("Check constraint failed for {entity}"))),
            DatabaseErrorKind::NotNullViolation => ConstraintParser::parse_not_null_violation(message)
                .map(|(entity, field)| AppError::validation(&field, format!("Field is required for {entity}"))),
            _ => None,
        };

        converted.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{kind:?}: {message}")),
        })
    }
}
