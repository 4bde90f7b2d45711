//! Error types for building and running statements.
//!
//! Every failure carries an [`ErrorCode`] for programmatic handling plus an
//! [`ErrorContext`] describing where it happened.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: P{category}{number}
//! - 1xxx: Builder errors (invalid field, condition, select, data)
//! - 3xxx: Connection errors
//! - 4xxx: Transaction errors
//! - 5xxx: Execution errors
//! - 6xxx: Data errors (serialization)
//! - 7xxx: Configuration errors
//! - 9xxx: Internal errors
//!
//! ```rust
//! use tabula_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::missing_primary_key("pets");
//! assert_eq!(err.code, ErrorCode::MissingPrimaryKey);
//! assert_eq!(err.code.code(), "P1007");
//! assert!(err.to_string().contains("pets"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Builder errors (1xxx)
    /// Empty or blank select expression (P1001).
    InvalidField = 1001,
    /// Operand does not fit the operator (P1002).
    InvalidCondition = 1002,
    /// Operator symbol is not recognized (P1003).
    UnknownOperator = 1003,
    /// Builder expression produced neither a field nor a condition (P1004).
    InvalidExpression = 1004,
    /// Select list is empty (P1005).
    InvalidSelect = 1005,
    /// Data property has no mapped field (P1006).
    UnmappedProperty = 1006,
    /// Table has no primary key (P1007).
    MissingPrimaryKey = 1007,
    /// Primary key names a property that is not mapped (P1008).
    PrimaryKeyNotMapped = 1008,
    /// Update has nothing to set (P1009).
    EmptyUpdate = 1009,
    /// Data could not be turned into a record (P1010).
    InvalidData = 1010,

    // Connection errors (3xxx)
    /// Database connection failed (P3001).
    ConnectionFailed = 3001,

    // Transaction errors (4xxx)
    /// Transaction failed (P4001).
    TransactionFailed = 4001,

    // Execution errors (5xxx)
    /// General database error (P5005).
    DatabaseError = 5005,

    // Data errors (6xxx)
    /// Serialization error (P6002).
    SerializationError = 6002,
    /// Deserialization error (P6003).
    DeserializationError = 6003,

    // Configuration errors (7xxx)
    /// Invalid configuration (P7001).
    InvalidConfiguration = 7001,
    /// Invalid connection string (P7003).
    InvalidConnectionString = 7003,

    // Internal errors (9xxx)
    /// Internal error (P9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "P1001").
    pub fn code(&self) -> String {
        format!("P{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidField => "Invalid field",
            Self::InvalidCondition => "Invalid condition",
            Self::UnknownOperator => "Unknown operator",
            Self::InvalidExpression => "Invalid builder expression",
            Self::InvalidSelect => "Invalid select",
            Self::UnmappedProperty => "Unmapped property",
            Self::MissingPrimaryKey => "Missing primary key",
            Self::PrimaryKeyNotMapped => "Primary key not mapped",
            Self::EmptyUpdate => "Nothing to update",
            Self::InvalidData => "Invalid data",
            Self::ConnectionFailed => "Database connection failed",
            Self::TransactionFailed => "Transaction failed",
            Self::DatabaseError => "Database error",
            Self::SerializationError => "Serialization error",
            Self::DeserializationError => "Deserialization error",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::InvalidConnectionString => "Invalid connection string",
            Self::Internal => "Internal error",
        }
    }

    /// Whether the code belongs to statement construction rather than execution.
    pub fn is_builder_error(&self) -> bool {
        (*self as u16) < 2000
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The table involved.
    pub table: Option<String>,
    /// The field or property involved.
    pub field: Option<String>,
    /// The SQL statement (if available).
    pub sql: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
}

/// Errors that can occur while building or running statements.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(suggestion.into());
        self
    }

    /// Set the table.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.context.table = Some(table.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Set the SQL statement.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.context.sql = Some(sql.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// A field was declared with an empty or blank select expression.
    pub fn invalid_field(property: impl Into<String>) -> Self {
        let property = property.into();
        Self::new(
            ErrorCode::InvalidField,
            format!("Field '{}' has an empty select expression", property),
        )
        .with_field(&property)
    }

    /// The operand does not match what the operator expects.
    pub fn invalid_condition(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ErrorCode::InvalidCondition,
            format!("Invalid condition on {}: {}", field, message.into()),
        )
        .with_field(&field)
    }

    /// An operator symbol outside the supported set.
    pub fn unknown_operator(symbol: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnknownOperator,
            format!("Unknown operator '{}'", symbol.into()),
        )
        .with_suggestion(
            "Use one of =, !=, >, >=, <, <=, LIKE, IN, NOT IN, BETWEEN, NOT BETWEEN, IS",
        )
    }

    /// A builder closure returned neither a field nor a condition.
    pub fn invalid_expression() -> Self {
        Self::new(
            ErrorCode::InvalidExpression,
            "Expression returned neither a field nor a condition",
        )
    }

    /// The select list is empty.
    pub fn invalid_select(table: impl Into<String>) -> Self {
        let table = table.into();
        Self::new(
            ErrorCode::InvalidSelect,
            format!("Select on {} returned no fields", table),
        )
        .with_table(&table)
        .with_suggestion("Call clear_select() to select every mapped field")
    }

    /// A data property does not map to a table field.
    pub fn unmapped_property(table: impl Into<String>, property: impl Into<String>) -> Self {
        let table = table.into();
        let property = property.into();
        Self::new(
            ErrorCode::UnmappedProperty,
            format!("Property '{}' is not mapped on {}", property, table),
        )
        .with_table(&table)
        .with_field(&property)
        .with_suggestion("Exclude the property or enable ignore_extra_properties")
    }

    /// The table declares no primary key.
    pub fn missing_primary_key(table: impl Into<String>) -> Self {
        let table = table.into();
        Self::new(
            ErrorCode::MissingPrimaryKey,
            format!("Table {} has no primary key", table),
        )
        .with_table(&table)
    }

    /// A declared primary key is not a mapped field.
    pub fn primary_key_not_mapped(table: impl Into<String>, property: impl Into<String>) -> Self {
        let table = table.into();
        let property = property.into();
        Self::new(
            ErrorCode::PrimaryKeyNotMapped,
            format!("Primary key '{}' is not a mapped field of {}", property, table),
        )
        .with_table(&table)
        .with_field(&property)
    }

    /// An update without assignments.
    pub fn empty_update(table: impl Into<String>) -> Self {
        let table = table.into();
        Self::new(
            ErrorCode::EmptyUpdate,
            format!("Update on {} has no fields to set", table),
        )
        .with_table(&table)
    }

    /// Data could not be converted into a record.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidData, message.into())
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConnectionFailed,
            format!("Connection error: {}", message.into()),
        )
        .with_suggestion("Check that the database server is running")
        .with_suggestion("Verify the connection URL is correct")
    }

    /// Create a transaction error.
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::TransactionFailed,
            format!("Transaction error: {}", message.into()),
        )
    }

    /// Create a general database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message.into())
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message.into())
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DeserializationError,
            format!("Failed to deserialize result: {}", message.into()),
        )
        .with_suggestion("Check that the DTO matches the selected columns")
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::Internal,
            format!("Internal error: {}", message.into()),
        )
    }

    // ============== Error Checks ==============

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        self.code == ErrorCode::ConnectionFailed
    }

    /// Check if this error was raised while building a statement.
    pub fn is_builder_error(&self) -> bool {
        self.code.is_builder_error()
    }

    /// Display the error with its context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = format!("Error [{}]: {}\n", self.code.code(), self.message);

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref table) = self.context.table {
            output.push_str(&format!("  → Table: {}\n", table));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }
        if let Some(ref sql) = self.context.sql {
            output.push_str(&format!("  → SQL: {}\n", sql));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::serialization(err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::InvalidField.code(), "P1001");
        assert_eq!(ErrorCode::ConnectionFailed.code(), "P3001");
        assert_eq!(ErrorCode::Internal.to_string(), "P9001");
    }

    #[test]
    fn test_builder_errors() {
        assert!(QueryError::invalid_expression().is_builder_error());
        assert!(QueryError::empty_update("pets").is_builder_error());
        assert!(!QueryError::connection("refused").is_builder_error());
    }

    #[test]
    fn test_unmapped_property_context() {
        let err = QueryError::unmapped_property("pets", "color");
        assert_eq!(err.code, ErrorCode::UnmappedProperty);
        assert_eq!(err.context.table.as_deref(), Some("pets"));
        assert_eq!(err.context.field.as_deref(), Some("color"));
        assert!(!err.context.suggestions.is_empty());
    }

    #[test]
    fn test_display() {
        let err = QueryError::unknown_operator("<>");
        assert_eq!(err.to_string(), "[P1003] Unknown operator '<>'");
    }

    #[test]
    fn test_display_full() {
        let err = QueryError::database("table missing")
            .with_context("Running select")
            .with_sql("SELECT 1;");

        let output = err.display_full();
        assert!(output.contains("P5005"));
        assert!(output.contains("Running select"));
        assert!(output.contains("SELECT 1;"));
    }
}
