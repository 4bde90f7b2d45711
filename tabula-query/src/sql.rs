//! SQL text generation for MySQL.
//!
//! Statements are rendered as complete SQL strings. Values are inlined as
//! escaped literals, the same way the `mysql` text protocol client escapes them.

use crate::condition::{Condition, ConditionGroup, Op, Predicate};
use crate::value::{DATE_TIME_FORMAT, Operand, SqlValue};

/// Check if an expression is a plain (optionally dotted) identifier.
pub fn is_identifier(expr: &str) -> bool {
    !expr.is_empty()
        && expr.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}

/// Backtick-quote an identifier, escaping embedded backticks.
pub fn escape_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a name segment by segment, whatever it contains.
///
/// `pets.id` becomes `` `pets`.`id` ``. Used for names that come from callers.
pub fn quote_name(name: &str) -> String {
    name.split('.')
        .map(escape_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

/// Quote a declared column expression.
///
/// Plain identifiers are quoted like [`quote_name`]. Anything else, such as
/// `COUNT(*)`, is emitted verbatim.
pub fn quote_identifier(expr: &str) -> String {
    if is_identifier(expr) {
        quote_name(expr)
    } else {
        expr.to_string()
    }
}

/// Escape a string literal, including the surrounding quotes.
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for c in value.chars() {
        match c {
            '\0' => escaped.push_str("\\0"),
            '\u{8}' => escaped.push_str("\\b"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{1a}' => escaped.push_str("\\Z"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\\' => escaped.push_str("\\\\"),
            other => escaped.push(other),
        }
    }
    escaped.push('\'');
    escaped
}

/// Render a value as a SQL literal.
pub fn escape_literal(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bool(b) => b.to_string(),
        SqlValue::Int(i) => i.to_string(),
        SqlValue::UInt(u) => u.to_string(),
        SqlValue::Float(f) if f.is_finite() => f.to_string(),
        SqlValue::Float(_) => "NULL".to_string(),
        SqlValue::String(s) => escape_string(s),
        SqlValue::DateTime(dt) => escape_string(&dt.format(DATE_TIME_FORMAT).to_string()),
    }
}

fn join_literals(values: &[SqlValue]) -> String {
    values
        .iter()
        .map(escape_literal)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a single condition through its operator template.
pub fn render_condition(condition: &Condition) -> String {
    let column = if condition.is_expression() {
        condition.field().to_string()
    } else {
        quote_name(condition.field())
    };
    let op = condition.op();

    match (op, condition.operand()) {
        (Op::Between | Op::NotBetween, Operand::Range(low, high)) => format!(
            "{} {} {} AND {}",
            column,
            op.as_sql(),
            escape_literal(low),
            escape_literal(high)
        ),
        (Op::In, Operand::Set(values)) if values.is_empty() => "1 = 0".to_string(),
        (Op::NotIn, Operand::Set(values)) if values.is_empty() => "1 = 1".to_string(),
        (_, Operand::Set(values)) => {
            format!("{} {} ({})", column, op.as_sql(), join_literals(values))
        }
        (_, Operand::Scalar(value)) => {
            format!("{} {} {}", column, op.as_sql(), escape_literal(value))
        }
        (_, Operand::Range(low, high)) => format!(
            "{} {} {} AND {}",
            column,
            op.as_sql(),
            escape_literal(low),
            escape_literal(high)
        ),
    }
}

/// Render a predicate. Groups are parenthesized.
pub fn render_predicate(predicate: &Predicate) -> String {
    match predicate {
        Predicate::Condition(condition) => render_condition(condition),
        Predicate::Group(group) => format!("({})", render_group_body(group)),
    }
}

/// Render the children of a group joined by its operator, without parentheses.
pub fn render_group_body(group: &ConditionGroup) -> String {
    let separator = format!(" {} ", group.operator().as_sql());
    group
        .conditions()
        .iter()
        .map(render_predicate)
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Render a root group as a `WHERE` clause, or `None` when it is empty.
pub fn render_where(root: &ConditionGroup) -> Option<String> {
    if root.is_empty() {
        None
    } else {
        Some(format!("WHERE {}", render_group_body(root)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Logic;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("species"), "`species`");
        assert_eq!(quote_identifier("pets.id"), "`pets`.`id`");
        assert_eq!(quote_identifier("COUNT(*)"), "COUNT(*)");
        assert_eq!(
            quote_identifier("ISNULL(NULLIF(`breed`, ''))"),
            "ISNULL(NULLIF(`breed`, ''))"
        );
    }

    #[test]
    fn test_quote_name_never_passes_through() {
        assert_eq!(quote_name("species"), "`species`");
        assert_eq!(quote_name("pets.id"), "`pets`.`id`");
        assert_eq!(quote_name("1 = 1 OR `id`"), "`1 = 1 OR ``id```");
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("O'Brien"), "'O\\'Brien'");
        assert_eq!(escape_string("a\\b"), "'a\\\\b'");
        assert_eq!(escape_string("line\nbreak"), "'line\\nbreak'");
        assert_eq!(escape_string("say \"hi\""), "'say \\\"hi\\\"'");
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal(&SqlValue::Null), "NULL");
        assert_eq!(escape_literal(&SqlValue::Bool(true)), "true");
        assert_eq!(escape_literal(&SqlValue::Int(-4)), "-4");
        assert_eq!(escape_literal(&SqlValue::UInt(u64::MAX)), "18446744073709551615");
        assert_eq!(escape_literal(&SqlValue::Float(2.5)), "2.5");
    }

    #[test]
    fn test_operator_templates() {
        let between = Condition::new("age", Op::Between, (1, 5)).unwrap();
        assert_eq!(render_condition(&between), "`age` BETWEEN 1 AND 5");

        let within = Condition::new("id", Op::NotIn, [1, 2]).unwrap();
        assert_eq!(render_condition(&within), "`id` NOT IN (1, 2)");

        let like = Condition::new("breed", Op::Like, "sia%").unwrap();
        assert_eq!(render_condition(&like), "`breed` LIKE 'sia%'");

        let is_null = Condition::new("breed", Op::Is, SqlValue::Null).unwrap();
        assert_eq!(render_condition(&is_null), "`breed` IS NULL");
    }

    #[test]
    fn test_caller_names_are_quoted() {
        let hostile = Condition::new("species = species OR id", Op::Eq, 0).unwrap();
        assert_eq!(render_condition(&hostile), "`species = species OR id` = 0");

        let declared = Condition::expression("COUNT(*)", Op::Gt, 2).unwrap();
        assert_eq!(render_condition(&declared), "COUNT(*) > 2");
    }

    #[test]
    fn test_empty_sets() {
        let none = Condition::new("id", Op::In, Vec::<i64>::new()).unwrap();
        assert_eq!(render_condition(&none), "1 = 0");

        let all = Condition::new("id", Op::NotIn, Vec::<i64>::new()).unwrap();
        assert_eq!(render_condition(&all), "1 = 1");
    }

    #[test]
    fn test_nested_groups() {
        let a = Condition::new("a", Op::Eq, 1).unwrap();
        let b = Condition::new("b", Op::Eq, 2).unwrap();
        let c = Condition::new("c", Op::Eq, 3).unwrap();

        let root = ConditionGroup::default()
            .and(ConditionGroup::new(vec![a.into(), b.into()], Logic::Or))
            .and(c);

        assert_eq!(
            render_where(&root).unwrap(),
            "WHERE (`a` = 1 OR `b` = 2) AND `c` = 3"
        );
        assert_eq!(render_where(&ConditionGroup::default()), None);
    }
}
