use std::fmt;

/// Error kinds reported by record repositories
#[derive(Debug, Clone)]
pub enum DatabaseErrorKind {
    /// Record not found
    NotFound {
        entity: String,
        id: String,
    },
    /// Unique constraint violation (e.g., duplicate id or order number)
    UniqueConstraintViolation {
        column: String,
        value: String,
    },
    /// Record failed schema checks before being written
    InvalidRecord {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct DatabaseError {
    pub kind: DatabaseErrorKind,
    pub context: Option<String>,
}

impl DatabaseError {
    pub fn new(kind: DatabaseErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(DatabaseErrorKind::NotFound {
            entity: entity.into(),
            id: id.into(),
        })
    }

    pub fn duplicate(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(DatabaseErrorKind::UniqueConstraintViolation {
            column: column.into(),
            value: value.into(),
        })
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self.kind,
            DatabaseErrorKind::UniqueConstraintViolation { .. }
        )
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match &self.kind {
            DatabaseErrorKind::NotFound { entity, id } => {
                format!("{} with ID '{}' not found", entity, id)
            }
            DatabaseErrorKind::UniqueConstraintViolation { column, value } => {
                format!("A record with {} '{}' already exists", column, value)
            }
            DatabaseErrorKind::InvalidRecord { message } => {
                format!("Invalid record: {}", message)
            }
        };

        if let Some(context) = &self.context {
            write!(f, "{} ({})", message, context)
        } else {
            write!(f, "{}", message)
        }
    }
}

impl std::error::Error for DatabaseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_context() {
        let err = DatabaseError::not_found("Order", "42").with_context("complete checkout");
        assert_eq!(err.to_string(), "Order with ID '42' not found (complete checkout)");
        assert!(matches!(err.kind, DatabaseErrorKind::NotFound { .. }));
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_duplicate_display() {
        let err = DatabaseError::duplicate("order_number", "VO00000042");
        assert_eq!(
            err.to_string(),
            "A record with order_number 'VO00000042' already exists"
        );
        assert!(err.is_constraint_violation());
    }
}
