//! Row conversion from MySQL to JSON objects.
//!
//! Statements run over the text protocol, so most values arrive as bytes and
//! are interpreted through the column type.

use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Row, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{MysqlError, MysqlResult};

/// Convert a row into a JSON object keyed by column name.
///
/// Column order is kept, so a `SELECT` with aliases yields objects shaped like
/// the target DTO.
pub fn row_to_json(mut row: Row) -> MysqlResult<JsonValue> {
    let columns = row.columns();
    let mut map = Map::with_capacity(columns.len());

    for (i, column) in columns.iter().enumerate() {
        let name = column.name_str().into_owned();
        let value: Value = row.take(i).unwrap_or(Value::NULL);
        let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);

        let json = value_to_json(value, column.column_type(), unsigned)
            .map_err(|e| MysqlError::row_conversion(format!("column '{}': {}", name, e)))?;
        map.insert(name, json);
    }

    Ok(JsonValue::Object(map))
}

/// Convert a single value given the type of the column it came from.
pub fn value_to_json(
    value: Value,
    column_type: ColumnType,
    unsigned: bool,
) -> Result<JsonValue, String> {
    match value {
        Value::NULL => Ok(JsonValue::Null),
        Value::Int(i) => Ok(JsonValue::Number(i.into())),
        Value::UInt(u) => Ok(JsonValue::Number(u.into())),
        Value::Float(f) => Ok(float_to_json(f64::from(f))),
        Value::Double(d) => Ok(float_to_json(d)),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            if is_date_only(column_type) {
                Ok(JsonValue::String(format!(
                    "{:04}-{:02}-{:02}",
                    year, month, day
                )))
            } else {
                let mut text = format!(
                    "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                );
                if micros > 0 {
                    text.push_str(&format!(".{:06}", micros));
                }
                Ok(JsonValue::String(text))
            }
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if negative { "-" } else { "" };
            let mut text = format!(
                "{}{:02}:{:02}:{:02}",
                sign,
                days * 24 + u32::from(hours),
                minutes,
                seconds
            );
            if micros > 0 {
                text.push_str(&format!(".{:06}", micros));
            }
            Ok(JsonValue::String(text))
        }
        Value::Bytes(bytes) => text_to_json(bytes, column_type, unsigned),
    }
}

fn text_to_json(bytes: Vec<u8>, column_type: ColumnType, unsigned: bool) -> Result<JsonValue, String> {
    use ColumnType::*;

    if column_type == MYSQL_TYPE_JSON {
        return serde_json::from_slice(&bytes).map_err(|e| format!("invalid JSON: {}", e));
    }

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => return Ok(JsonValue::String(String::from_utf8_lossy(e.as_bytes()).into_owned())),
    };

    match column_type {
        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_INT24 | MYSQL_TYPE_LONG
        | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => {
            if unsigned {
                text.parse::<u64>()
                    .map(|u| JsonValue::Number(u.into()))
                    .map_err(|_| format!("invalid unsigned integer '{}'", text))
            } else {
                text.parse::<i64>()
                    .map(|i| JsonValue::Number(i.into()))
                    .map_err(|_| format!("invalid integer '{}'", text))
            }
        }
        MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE | MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => text
            .parse::<f64>()
            .map(float_to_json)
            .map_err(|_| format!("invalid number '{}'", text)),
        MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2 | MYSQL_TYPE_TIMESTAMP
        | MYSQL_TYPE_TIMESTAMP2 => Ok(JsonValue::String(text.replacen(' ', "T", 1))),
        _ => Ok(JsonValue::String(text)),
    }
}

fn is_date_only(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE
    )
}

fn float_to_json(value: f64) -> JsonValue {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}
