//! Table mapping metadata.
//!
//! A [`Table`] knows its SQL name, its primary key properties and the
//! registry of mapped fields. Implementations are usually generated with
//! the [`table!`](crate::table!) macro.

use crate::error::{QueryError, QueryResult};
use crate::field::{Field, FieldSet};

/// A mapped table.
pub trait Table: Send + Sync + 'static {
    /// SQL table name.
    const TABLE_NAME: &'static str;

    /// Property names forming the primary key.
    const PRIMARY_KEY: &'static [&'static str];

    /// Mapped fields by property name.
    fn fields(&self) -> &FieldSet;

    /// Look up a mapped field by property name.
    fn field(&self, property: &str) -> Option<&Field> {
        self.fields().get(property)
    }

    /// Primary key `(property, field)` pairs.
    fn primary_key_fields(&self) -> QueryResult<Vec<(&'static str, &Field)>> {
        if Self::PRIMARY_KEY.is_empty() {
            return Err(QueryError::missing_primary_key(Self::TABLE_NAME));
        }

        Self::PRIMARY_KEY
            .iter()
            .map(|&property| {
                self.field(property)
                    .map(|field| (property, field))
                    .ok_or_else(|| QueryError::primary_key_not_mapped(Self::TABLE_NAME, property))
            })
            .collect()
    }
}

/// Check a hand-written mapping: every primary key must be a mapped field.
///
/// Tables generated by [`table!`](crate::table!) are checked at compile time.
pub fn validate_table<T: Table>(table: &T) -> QueryResult<()> {
    for property in T::PRIMARY_KEY {
        if !table.fields().contains(property) {
            return Err(QueryError::primary_key_not_mapped(T::TABLE_NAME, *property));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::field::FieldKind;

    struct Broken {
        fields: FieldSet,
    }

    impl Table for Broken {
        const TABLE_NAME: &'static str = "broken";
        const PRIMARY_KEY: &'static [&'static str] = &["uuid"];

        fn fields(&self) -> &FieldSet {
            &self.fields
        }
    }

    struct Keyless {
        fields: FieldSet,
    }

    impl Table for Keyless {
        const TABLE_NAME: &'static str = "logs";
        const PRIMARY_KEY: &'static [&'static str] = &[];

        fn fields(&self) -> &FieldSet {
            &self.fields
        }
    }

    fn with_id() -> FieldSet {
        let mut fields = FieldSet::new();
        fields.insert("id", Field::mapped("id", "id", FieldKind::Number).unwrap());
        fields
    }

    #[test]
    fn test_unmapped_primary_key() {
        let table = Broken { fields: with_id() };
        let err = validate_table(&table).unwrap_err();
        assert_eq!(err.code, ErrorCode::PrimaryKeyNotMapped);
        assert_eq!(
            table.primary_key_fields().unwrap_err().code,
            ErrorCode::PrimaryKeyNotMapped
        );
    }

    #[test]
    fn test_missing_primary_key() {
        let table = Keyless { fields: with_id() };
        assert!(validate_table(&table).is_ok());
        assert_eq!(
            table.primary_key_fields().unwrap_err().code,
            ErrorCode::MissingPrimaryKey
        );
    }
}
