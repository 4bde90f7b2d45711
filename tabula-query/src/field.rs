//! Mapped columns and their typed predicate helpers.
//!
//! Every predicate is pure: it builds a new [`Condition`] and leaves the
//! field untouched. Typed fields dereference to [`Field`], so the base
//! predicates (`equals`, `in_`, `is_null`, ...) are available on all of them.
//!
//! ```rust
//! use tabula_query::field::{Field, FieldKind, NumberField, TypedField};
//!
//! let id = NumberField::from_field(Field::mapped("id", "id", FieldKind::Number).unwrap());
//! assert_eq!(id.gt(5).to_string(), "`id` > 5");
//! assert_eq!(id.in_([1, 2]).to_string(), "`id` IN (1, 2)");
//! ```

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::ops::Deref;

use crate::condition::{Condition, Op};
use crate::error::{QueryError, QueryResult};
use crate::sql::quote_identifier;
use crate::types::OrderByField;
use crate::value::{IntoDateTime, Operand, SqlValue};

/// Column type tag, used when preparing insert/update values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// No particular type.
    #[default]
    Any,
    /// Text column.
    String,
    /// Numeric column.
    Number,
    /// Boolean column.
    Boolean,
    /// Date/time column.
    Date,
}

/// Check if an expression is empty or whitespace only.
pub const fn is_blank(expr: &str) -> bool {
    let bytes = expr.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_whitespace() {
            return false;
        }
        i += 1;
    }
    true
}

/// A mapped column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    select_expr: String,
    alias: Option<String>,
    kind: FieldKind,
}

impl Field {
    /// Create an unmapped field from a column expression.
    pub fn new(select_expr: impl Into<String>) -> QueryResult<Self> {
        let select_expr = select_expr.into();
        if is_blank(&select_expr) {
            return Err(QueryError::invalid_field(select_expr));
        }
        Ok(Self {
            select_expr,
            alias: None,
            kind: FieldKind::Any,
        })
    }

    /// Create a field for a table property.
    ///
    /// The property becomes the alias when it differs from the expression.
    pub fn mapped(
        property: impl Into<String>,
        select_expr: impl Into<String>,
        kind: FieldKind,
    ) -> QueryResult<Self> {
        let property = property.into();
        let select_expr = select_expr.into();
        if is_blank(&select_expr) {
            return Err(QueryError::invalid_field(property));
        }

        let alias = (property != select_expr).then_some(property);
        Ok(Self {
            select_expr,
            alias,
            kind,
        })
    }

    /// Mapped field whose expression was already checked by `table!`.
    #[doc(hidden)]
    pub fn declared(property: &str, select_expr: &str, kind: FieldKind) -> Self {
        Self {
            select_expr: select_expr.to_string(),
            alias: (property != select_expr).then(|| property.to_string()),
            kind,
        }
    }

    /// Raw column expression.
    pub fn select_expr(&self) -> &str {
        &self.select_expr
    }

    /// Output alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Column type tag.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Quoted column expression.
    pub fn column(&self) -> String {
        quote_identifier(&self.select_expr)
    }

    /// Projection entry: the column plus `AS` alias when aliased.
    pub fn select_sql(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {}", self.column(), quote_identifier(alias)),
            None => self.column(),
        }
    }

    fn condition(&self, op: Op, operand: Operand) -> Condition {
        Condition::from_parts(self.select_expr.as_str(), op, operand)
    }

    /// `column = value`
    pub fn equals(&self, value: impl Into<SqlValue>) -> Condition {
        self.condition(Op::Eq, Operand::Scalar(value.into()))
    }

    /// `column != value`
    pub fn not_equal(&self, value: impl Into<SqlValue>) -> Condition {
        self.condition(Op::NotEq, Operand::Scalar(value.into()))
    }

    /// `column IN (values)`
    pub fn in_<I, V>(&self, values: I) -> Condition
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.condition(Op::In, Operand::set(values))
    }

    /// `column NOT IN (values)`
    pub fn not_in<I, V>(&self, values: I) -> Condition
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.condition(Op::NotIn, Operand::set(values))
    }

    /// `column IS NULL`
    pub fn is_null(&self) -> Condition {
        self.condition(Op::Is, Operand::Scalar(SqlValue::Null))
    }

    /// Ascending order entry.
    pub fn asc(&self) -> OrderByField {
        OrderByField::asc(self.select_expr.as_str())
    }

    /// Descending order entry.
    pub fn desc(&self) -> OrderByField {
        OrderByField::desc(self.select_expr.as_str())
    }
}

impl AsRef<Field> for Field {
    fn as_ref(&self) -> &Field {
        self
    }
}

/// Common interface of the typed field wrappers.
pub trait TypedField: AsRef<Field> {
    /// Type tag stored in the wrapped field.
    const KIND: FieldKind;

    /// Wrap a field.
    fn from_field(field: Field) -> Self;

    /// The wrapped field.
    fn as_field(&self) -> &Field {
        self.as_ref()
    }
}

macro_rules! typed_field {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(Field);

        impl TypedField for $name {
            const KIND: FieldKind = $kind;

            fn from_field(field: Field) -> Self {
                Self(Field { kind: $kind, ..field })
            }
        }

        impl Deref for $name {
            type Target = Field;

            fn deref(&self) -> &Field {
                &self.0
            }
        }

        impl AsRef<Field> for $name {
            fn as_ref(&self) -> &Field {
                &self.0
            }
        }

        impl From<$name> for Field {
            fn from(field: $name) -> Field {
                field.0
            }
        }
    };
}

typed_field!(
    /// Text column.
    StringField,
    FieldKind::String
);
typed_field!(
    /// Numeric column.
    NumberField,
    FieldKind::Number
);
typed_field!(
    /// Boolean column.
    BooleanField,
    FieldKind::Boolean
);
typed_field!(
    /// Date/time column.
    DateField,
    FieldKind::Date
);

impl StringField {
    /// `column LIKE pattern`
    pub fn like(&self, pattern: impl Into<String>) -> Condition {
        self.condition(Op::Like, Operand::Scalar(SqlValue::String(pattern.into())))
    }

    /// Matches `NULL` and the empty string.
    pub fn is_null_or_empty(&self) -> Condition {
        Condition::from_parts(
            format!("ISNULL(NULLIF({}, ''))", self.column()),
            Op::Eq,
            Operand::Scalar(SqlValue::Int(1)),
        )
    }
}

impl NumberField {
    /// `column BETWEEN low AND high`
    pub fn between(&self, low: impl Into<SqlValue>, high: impl Into<SqlValue>) -> Condition {
        self.condition(Op::Between, Operand::range(low, high))
    }

    /// `column NOT BETWEEN low AND high`
    pub fn not_between(&self, low: impl Into<SqlValue>, high: impl Into<SqlValue>) -> Condition {
        self.condition(Op::NotBetween, Operand::range(low, high))
    }

    /// `column > value`
    pub fn gt(&self, value: impl Into<SqlValue>) -> Condition {
        self.condition(Op::Gt, Operand::Scalar(value.into()))
    }

    /// `column >= value`
    pub fn gte(&self, value: impl Into<SqlValue>) -> Condition {
        self.condition(Op::Gte, Operand::Scalar(value.into()))
    }

    /// `column < value`
    pub fn lt(&self, value: impl Into<SqlValue>) -> Condition {
        self.condition(Op::Lt, Operand::Scalar(value.into()))
    }

    /// `column <= value`
    pub fn lte(&self, value: impl Into<SqlValue>) -> Condition {
        self.condition(Op::Lte, Operand::Scalar(value.into()))
    }
}

impl BooleanField {
    /// `column = true`
    pub fn is_true(&self) -> Condition {
        self.condition(Op::Eq, Operand::Scalar(SqlValue::Bool(true)))
    }

    /// `column = false`
    pub fn is_false(&self) -> Condition {
        self.condition(Op::Eq, Operand::Scalar(SqlValue::Bool(false)))
    }
}

impl DateField {
    fn date_condition(&self, op: Op, value: impl IntoDateTime) -> Condition {
        let value: NaiveDateTime = value.into_date_time();
        self.condition(op, Operand::Scalar(SqlValue::DateTime(value)))
    }

    /// `column < date`
    pub fn before(&self, date: impl IntoDateTime) -> Condition {
        self.date_condition(Op::Lt, date)
    }

    /// `column > date`
    pub fn after(&self, date: impl IntoDateTime) -> Condition {
        self.date_condition(Op::Gt, date)
    }

    /// `column <= date`
    pub fn from(&self, date: impl IntoDateTime) -> Condition {
        self.date_condition(Op::Lte, date)
    }

    /// `column >= date`
    pub fn until(&self, date: impl IntoDateTime) -> Condition {
        self.date_condition(Op::Gte, date)
    }
}

/// Property name to field registry of a table, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: IndexMap<String, Field>,
}

impl FieldSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field under a property name.
    pub fn insert(&mut self, property: impl Into<String>, field: impl Into<Field>) {
        self.fields.insert(property.into(), field.into());
    }

    /// Look up by property name.
    pub fn get(&self, property: &str) -> Option<&Field> {
        self.fields.get(property)
    }

    /// Check if a property is mapped.
    pub fn contains(&self, property: &str) -> bool {
        self.fields.contains_key(property)
    }

    /// Iterate `(property, field)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All fields ordered by select expression.
    pub fn sorted(&self) -> Vec<&Field> {
        let mut fields: Vec<_> = self.fields.values().collect();
        fields.sort_by(|a, b| a.select_expr.cmp(&b.select_expr));
        fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn typed<F: TypedField>(property: &str, expr: &str) -> F {
        F::from_field(Field::mapped(property, expr, F::KIND).unwrap())
    }

    #[test]
    fn test_blank_expression() {
        assert!(is_blank("  \t"));
        assert!(!is_blank(" id "));
        assert_eq!(
            Field::new(" ").unwrap_err().code,
            crate::error::ErrorCode::InvalidField
        );
    }

    #[test]
    fn test_mapped_alias() {
        let owner: NumberField = typed("owner_id", "clientId");
        assert_eq!(owner.alias(), Some("owner_id"));
        assert_eq!(owner.select_sql(), "`clientId` AS `owner_id`");

        let id: NumberField = typed("id", "id");
        assert_eq!(id.alias(), None);
        assert_eq!(id.kind(), FieldKind::Number);
    }

    #[test]
    fn test_string_predicates() {
        let breed: StringField = typed("breed", "breed");
        assert_eq!(breed.like("sia%").to_string(), "`breed` LIKE 'sia%'");
        assert_eq!(
            breed.is_null_or_empty().to_string(),
            "ISNULL(NULLIF(`breed`, '')) = 1"
        );
        assert_eq!(breed.is_null().to_string(), "`breed` IS NULL");
    }

    #[test]
    fn test_number_predicates() {
        let age: NumberField = typed("age", "age");
        assert_eq!(age.between(1, 3).to_string(), "`age` BETWEEN 1 AND 3");
        assert_eq!(age.not_between(1, 3).to_string(), "`age` NOT BETWEEN 1 AND 3");
        assert_eq!(age.lte(2.5).to_string(), "`age` <= 2.5");
        assert_eq!(age.not_in([4, 5]).to_string(), "`age` NOT IN (4, 5)");
    }

    #[test]
    fn test_boolean_predicates() {
        let vaccinated: BooleanField = typed("vaccinated", "vaccinated");
        assert_eq!(vaccinated.is_true().to_string(), "`vaccinated` = true");
        assert_eq!(vaccinated.is_false().to_string(), "`vaccinated` = false");
    }

    #[test]
    fn test_date_predicates() {
        let birthday: DateField = typed("birthday", "birthday");
        let date = NaiveDate::from_ymd_opt(2016, 2, 1)
            .unwrap()
            .and_hms_opt(2, 0, 0)
            .unwrap();

        assert_eq!(
            birthday.before(date).to_string(),
            "`birthday` < '2016-02-01 02:00:00'"
        );
        assert_eq!(
            birthday.after(date).to_string(),
            "`birthday` > '2016-02-01 02:00:00'"
        );
        assert_eq!(
            birthday.from(date.date()).to_string(),
            "`birthday` <= '2016-02-01 00:00:00'"
        );
        let zoned = Utc.with_ymd_and_hms(2016, 2, 1, 2, 0, 0).unwrap();
        assert_eq!(
            birthday.until(zoned).to_string(),
            "`birthday` >= '2016-02-01 02:00:00'"
        );
    }

    #[test]
    fn test_order_entries() {
        let id: NumberField = typed("id", "id");
        assert_eq!(id.desc().to_sql(), "`id` DESC");
    }

    #[test]
    fn test_field_set_sorted() {
        let mut set = FieldSet::new();
        set.insert("species", typed::<StringField>("species", "species"));
        set.insert("birthday", typed::<DateField>("birthday", "birthday"));
        set.insert("id", typed::<NumberField>("id", "id"));

        let exprs: Vec<_> = set.sorted().iter().map(|f| f.select_expr()).collect();
        assert_eq!(exprs, vec!["birthday", "id", "species"]);
        assert!(set.contains("species"));
    }
}
