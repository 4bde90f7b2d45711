//! Values carried by conditions and by insert/update data.
//!
//! [`SqlValue`] is a single scalar. [`Operand`] is what sits on the right-hand
//! side of a condition: a scalar, a `BETWEEN` range or an `IN` set.
//! [`Record`] is the ordered property/value map consumed by inserts and updates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::error::{QueryError, QueryResult};

/// Format used for date-time literals.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A scalar SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL `NULL`.
    Null,
    /// Boolean, rendered as `true` / `false`.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Unsigned integer above `i64::MAX`.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Text.
    String(String),
    /// Date and time without timezone.
    DateTime(NaiveDateTime),
}

impl SqlValue {
    /// Check if this is `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert a JSON scalar. Arrays and objects are rejected.
    pub fn from_json(value: JsonValue) -> QueryResult<Self> {
        match value {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(b) => Ok(Self::Bool(b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::UInt(u))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(QueryError::invalid_data(format!(
                        "number {} does not fit a SQL value",
                        n
                    )))
                }
            }
            JsonValue::String(s) => Ok(Self::String(s)),
            other => Err(QueryError::invalid_data(format!(
                "expected a scalar value, found {}",
                other
            ))),
        }
    }

    /// Convert back to JSON. Date-times become their literal string.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::from(*i),
            Self::UInt(u) => JsonValue::from(*u),
            Self::Float(f) => JsonValue::from(*f),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::DateTime(dt) => JsonValue::String(dt.format(DATE_TIME_FORMAT).to_string()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::sql::escape_literal(self))
    }
}

impl<'de> Deserialize<'de> for SqlValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        SqlValue::from_json(json).map_err(serde::de::Error::custom)
    }
}

impl Serialize for SqlValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Conversion into the date-time stored by date predicates.
///
/// Zoned values keep their local wall-clock time.
pub trait IntoDateTime {
    /// Convert into a naive date-time.
    fn into_date_time(self) -> NaiveDateTime;
}

impl IntoDateTime for NaiveDateTime {
    fn into_date_time(self) -> NaiveDateTime {
        self
    }
}

impl IntoDateTime for NaiveDate {
    fn into_date_time(self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

impl<Tz: TimeZone> IntoDateTime for DateTime<Tz> {
    fn into_date_time(self) -> NaiveDateTime {
        self.naive_local()
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single value.
    Scalar(SqlValue),
    /// Lower and upper bound for `BETWEEN`.
    Range(SqlValue, SqlValue),
    /// Members for `IN`.
    Set(Vec<SqlValue>),
}

impl Operand {
    /// Build a range operand.
    pub fn range(low: impl Into<SqlValue>, high: impl Into<SqlValue>) -> Self {
        Self::Range(low.into(), high.into())
    }

    /// Build a set operand.
    pub fn set<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Self::Set(values.into_iter().map(Into::into).collect())
    }

    /// Convert from JSON: arrays become sets, everything else a scalar.
    pub fn from_json(value: JsonValue) -> QueryResult<Self> {
        match value {
            JsonValue::Array(items) => Ok(Self::Set(
                items
                    .into_iter()
                    .map(SqlValue::from_json)
                    .collect::<QueryResult<_>>()?,
            )),
            other => SqlValue::from_json(other).map(Self::Scalar),
        }
    }
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Operand::from_json(json).map_err(serde::de::Error::custom)
    }
}

impl From<SqlValue> for Operand {
    fn from(value: SqlValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<SqlValue>> for Operand {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::Set(values)
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => |$v:ident| $conv:expr),+ $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl From<Option<$ty>> for SqlValue {
                fn from(value: Option<$ty>) -> Self {
                    value.map_or(SqlValue::Null, SqlValue::from)
                }
            }

            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Scalar(value.into())
                }
            }

            impl From<Option<$ty>> for Operand {
                fn from(value: Option<$ty>) -> Self {
                    Operand::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for Operand {
                fn from(values: Vec<$ty>) -> Self {
                    Operand::set(values)
                }
            }

            impl From<&[$ty]> for Operand {
                fn from(values: &[$ty]) -> Self {
                    Operand::set(values.iter().cloned())
                }
            }

            impl<const N: usize> From<[$ty; N]> for Operand {
                fn from(values: [$ty; N]) -> Self {
                    Operand::set(values)
                }
            }

            impl From<($ty, $ty)> for Operand {
                fn from((low, high): ($ty, $ty)) -> Self {
                    Operand::range(low, high)
                }
            }
        )+
    };
}

impl_scalar! {
    bool => |v| SqlValue::Bool(v),
    i8 => |v| SqlValue::Int(v.into()),
    i16 => |v| SqlValue::Int(v.into()),
    i32 => |v| SqlValue::Int(v.into()),
    i64 => |v| SqlValue::Int(v),
    u8 => |v| SqlValue::Int(v.into()),
    u16 => |v| SqlValue::Int(v.into()),
    u32 => |v| SqlValue::Int(v.into()),
    u64 => |v| i64::try_from(v).map_or(SqlValue::UInt(v), SqlValue::Int),
    usize => |v| SqlValue::from(v as u64),
    f32 => |v| SqlValue::Float(v.into()),
    f64 => |v| SqlValue::Float(v),
    &str => |v| SqlValue::String(v.to_string()),
    String => |v| SqlValue::String(v),
    NaiveDateTime => |v| SqlValue::DateTime(v),
    NaiveDate => |v| SqlValue::DateTime(v.into_date_time()),
}

impl From<()> for SqlValue {
    fn from(_: ()) -> Self {
        SqlValue::Null
    }
}

/// Ordered property/value data for inserts and updates.
///
/// Keys are property names of the target table, not column expressions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, SqlValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, keeping its first insertion position.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.insert(property.into(), value.into());
        self
    }

    /// Build a record from any serializable struct or map.
    ///
    /// Field order of the source is preserved.
    pub fn from_serialize<S: Serialize + ?Sized>(data: &S) -> QueryResult<Self> {
        match serde_json::to_value(data)? {
            JsonValue::Object(map) => {
                let values = map
                    .into_iter()
                    .map(|(key, value)| {
                        SqlValue::from_json(value)
                            .map(|v| (key.clone(), v))
                            .map_err(|e| e.with_field(key))
                    })
                    .collect::<QueryResult<_>>()?;
                Ok(Self { values })
            }
            other => Err(QueryError::invalid_data(format!(
                "expected an object, found {}",
                other
            ))),
        }
    }

    /// Get a property value.
    pub fn get(&self, property: &str) -> Option<&SqlValue> {
        self.values.get(property)
    }

    /// Iterate properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Build a [`Record`] from `property => value` pairs.
///
/// ```rust
/// use tabula_query::record;
///
/// let data = record! { "species" => "cat", "id" => 7 };
/// assert_eq!(data.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::value::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::value::Record::new()$(.set($key, $value))+
    };
}
