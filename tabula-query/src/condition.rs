//! Boolean expression tree: conditions and condition groups.
//!
//! A [`Condition`] is a leaf `(field, operator, operand)`. A [`ConditionGroup`]
//! joins children with a single [`Logic`] operator. Composition never mutates
//! in place: `and` / `or` consume the receiver and return the combined value.
//!
//! ```rust
//! use tabula_query::condition::{Condition, Logic, Op};
//!
//! let male = Condition::new("gender", Op::Eq, "male").unwrap();
//! let cat = Condition::new("species", Op::Eq, "cat").unwrap();
//!
//! let group = male.and(cat);
//! assert_eq!(group.operator(), Logic::And);
//! assert_eq!(group.len(), 2);
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::error::{QueryError, QueryResult};
use crate::value::{Operand, SqlValue};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `LIKE`
    Like,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `BETWEEN`
    Between,
    /// `NOT BETWEEN`
    NotBetween,
    /// `IS`
    Is,
}

impl Op {
    /// Get the SQL symbol for this operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::Is => "IS",
        }
    }

    /// Operator used when the caller gives none: `IN` for sets,
    /// `BETWEEN` for ranges, `=` otherwise.
    pub fn default_for(operand: &Operand) -> Self {
        match operand {
            Operand::Set(_) => Self::In,
            Operand::Range(..) => Self::Between,
            Operand::Scalar(_) => Self::Eq,
        }
    }
}

impl FromStr for Op {
    type Err = QueryError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol {
            "=" => Ok(Self::Eq),
            "!=" => Ok(Self::NotEq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Gte),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Lte),
            "LIKE" => Ok(Self::Like),
            "IN" => Ok(Self::In),
            "NOT IN" => Ok(Self::NotIn),
            "BETWEEN" => Ok(Self::Between),
            "NOT BETWEEN" => Ok(Self::NotBetween),
            "IS" => Ok(Self::Is),
            other => Err(QueryError::unknown_operator(other)),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Logical operator joining the children of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Logic {
    /// All children must hold.
    #[default]
    And,
    /// Any child may hold.
    Or,
}

impl Logic {
    /// Get the SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A leaf predicate. Immutable once built.
///
/// The left-hand side is either a column name, which is always quoted, or a
/// column expression declared on a table field, which is rendered verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    expression: bool,
    op: Op,
    operand: Operand,
}

impl Condition {
    /// Build a condition on a column name, checking that the operand fits the operator.
    ///
    /// The name is backtick-quoted per dot segment whatever it contains.
    /// A two-element set given to `BETWEEN` is accepted as a range.
    pub fn new(field: impl Into<String>, op: Op, operand: impl Into<Operand>) -> QueryResult<Self> {
        let field = field.into();
        let operand = check_operand(&field, op, operand.into())?;
        Ok(Self {
            field,
            expression: false,
            op,
            operand,
        })
    }

    /// Build a condition on a declared column expression such as `COUNT(*)`.
    ///
    /// Plain identifiers are still quoted. Never pass caller input here.
    pub fn expression(
        expr: impl Into<String>,
        op: Op,
        operand: impl Into<Operand>,
    ) -> QueryResult<Self> {
        let expr = expr.into();
        let operand = check_operand(&expr, op, operand.into())?;
        Ok(Self::from_parts(expr, op, operand))
    }

    /// Build an expression condition whose operand shape is already known to be valid.
    pub(crate) fn from_parts(expr: impl Into<String>, op: Op, operand: Operand) -> Self {
        let field = expr.into();
        Self {
            expression: !crate::sql::is_identifier(&field),
            field,
            op,
            operand,
        }
    }

    /// Column name or expression, unquoted.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Check if the left-hand side is rendered verbatim.
    pub fn is_expression(&self) -> bool {
        self.expression
    }

    /// Operator.
    pub fn op(&self) -> Op {
        self.op
    }

    /// Right-hand side.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// `self AND other`.
    pub fn and(self, other: impl Into<Predicate>) -> ConditionGroup {
        ConditionGroup::new(vec![self.into(), other.into()], Logic::And)
    }

    /// `self OR other`.
    pub fn or(self, other: impl Into<Predicate>) -> ConditionGroup {
        ConditionGroup::new(vec![self.into(), other.into()], Logic::Or)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::sql::render_condition(self))
    }
}

fn check_operand(field: &str, op: Op, operand: Operand) -> QueryResult<Operand> {
    match (op, operand) {
        (Op::Between | Op::NotBetween, Operand::Set(values)) => {
            let [low, high]: [SqlValue; 2] = values.try_into().map_err(|values: Vec<_>| {
                QueryError::invalid_condition(
                    field,
                    format!("{} needs 2 bounds, got {}", op, values.len()),
                )
            })?;
            Ok(Operand::Range(low, high))
        }
        (Op::Between | Op::NotBetween, range @ Operand::Range(..)) => Ok(range),
        (Op::Between | Op::NotBetween, Operand::Scalar(_)) => Err(QueryError::invalid_condition(
            field,
            format!("{} needs a range", op),
        )),
        (Op::In | Op::NotIn, set @ Operand::Set(_)) => Ok(set),
        (Op::In | Op::NotIn, _) => Err(QueryError::invalid_condition(
            field,
            format!("{} needs a list of values", op),
        )),
        (Op::Is, scalar @ Operand::Scalar(SqlValue::Null | SqlValue::Bool(_))) => Ok(scalar),
        (Op::Is, _) => Err(QueryError::invalid_condition(
            field,
            "IS only accepts NULL or a boolean",
        )),
        (_, scalar @ Operand::Scalar(_)) => Ok(scalar),
        (_, _) => Err(QueryError::invalid_condition(
            field,
            format!("{} needs a single value", op),
        )),
    }
}

/// Ordered children joined by one logical operator.
///
/// The default value is an empty `AND` group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionGroup {
    conditions: Vec<Predicate>,
    operator: Logic,
}

impl ConditionGroup {
    /// Create a group.
    pub fn new(conditions: Vec<Predicate>, operator: Logic) -> Self {
        Self {
            conditions,
            operator,
        }
    }

    /// Children in rendering order.
    pub fn conditions(&self) -> &[Predicate] {
        &self.conditions
    }

    /// Joining operator.
    pub fn operator(&self) -> Logic {
        self.operator
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Check if the group has no children.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// AND another predicate into this group.
    pub fn and(self, other: impl Into<Predicate>) -> Self {
        self.combine(other.into(), Logic::And)
    }

    /// OR another predicate into this group.
    pub fn or(self, other: impl Into<Predicate>) -> Self {
        self.combine(other.into(), Logic::Or)
    }

    // Same operator appends. A different one nests the current group
    // behind the new predicate: `[other, self]`.
    fn combine(mut self, other: Predicate, operator: Logic) -> Self {
        if self.operator == operator {
            self.conditions.push(other);
            self
        } else {
            Self::new(vec![other, Predicate::Group(self)], operator)
        }
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", crate::sql::render_group_body(self))
    }
}

/// Either a leaf condition or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Leaf.
    Condition(Condition),
    /// Nested group.
    Group(ConditionGroup),
}

impl Predicate {
    /// AND another predicate.
    pub fn and(self, other: impl Into<Predicate>) -> ConditionGroup {
        match self {
            Self::Condition(c) => c.and(other),
            Self::Group(g) => g.and(other),
        }
    }

    /// OR another predicate.
    pub fn or(self, other: impl Into<Predicate>) -> ConditionGroup {
        match self {
            Self::Condition(c) => c.or(other),
            Self::Group(g) => g.or(other),
        }
    }

    /// Check if this is a group without children.
    pub fn is_empty_group(&self) -> bool {
        matches!(self, Self::Group(g) if g.is_empty())
    }
}

impl From<Condition> for Predicate {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl From<ConditionGroup> for Predicate {
    fn from(group: ConditionGroup) -> Self {
        Self::Group(group)
    }
}

/// Condition-map literal: `{ field: { operatorSymbol: operand } }`.
///
/// Keys keep their insertion order.
///
/// ```rust
/// use serde_json::json;
/// use tabula_query::condition::ConditionMap;
///
/// let map = ConditionMap::from_json(json!({
///     "gender": { "=": "male" },
///     "species": { "!=": "cat" }
/// })).unwrap();
/// assert_eq!(map.to_conditions().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ConditionMap {
    entries: IndexMap<String, IndexMap<String, Operand>>,
}

impl ConditionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an `operator => operand` entry under a field.
    pub fn add(
        mut self,
        field: impl Into<String>,
        op_symbol: impl Into<String>,
        operand: impl Into<Operand>,
    ) -> Self {
        self.entries
            .entry(field.into())
            .or_default()
            .insert(op_symbol.into(), operand.into());
        self
    }

    /// Parse the literal from JSON.
    pub fn from_json(value: JsonValue) -> QueryResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| QueryError::invalid_data(format!("invalid condition map: {}", e)))
    }

    /// Check if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(IndexMap::is_empty)
    }

    /// One condition per (field, operator) pair, in key order.
    pub fn to_conditions(&self) -> QueryResult<Vec<Condition>> {
        let mut conditions = Vec::new();
        for (field, ops) in &self.entries {
            for (symbol, operand) in ops {
                let op = symbol.parse::<Op>().map_err(|e| e.with_field(field))?;
                conditions.push(Condition::new(field.as_str(), op, operand.clone())?);
            }
        }
        Ok(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cond(field: &str, value: i64) -> Condition {
        Condition::new(field, Op::Eq, value).unwrap()
    }

    #[test]
    fn test_op_parse() {
        assert_eq!("NOT BETWEEN".parse::<Op>().unwrap(), Op::NotBetween);
        assert_eq!("!=".parse::<Op>().unwrap(), Op::NotEq);
        let err = "<>".parse::<Op>().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownOperator);
    }

    #[test]
    fn test_operand_arity() {
        let err = Condition::new("id", Op::In, 3).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCondition);

        let err = Condition::new("id", Op::Between, [1, 2, 3]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCondition);

        let err = Condition::new("id", Op::Eq, [1, 2]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCondition);

        let err = Condition::new("deleted", Op::Is, "yes").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCondition);
    }

    #[test]
    fn test_between_accepts_pair() {
        let c = Condition::new("age", Op::Between, [1, 9]).unwrap();
        assert_eq!(c.operand(), &Operand::Range(SqlValue::Int(1), SqlValue::Int(9)));
    }

    #[test]
    fn test_condition_and_or() {
        let group = cond("a", 1).or(cond("b", 2));
        assert_eq!(group.operator(), Logic::Or);
        assert_eq!(group.conditions()[0], cond("a", 1).into());
    }

    #[test]
    fn test_group_matching_operator_flattens() {
        let group = cond("a", 1).and(cond("b", 2)).and(cond("c", 3));
        assert_eq!(group.len(), 3);
        assert_eq!(group.conditions()[2], cond("c", 3).into());
    }

    #[test]
    fn test_group_other_operator_nests() {
        let and_group = cond("a", 1).and(cond("b", 2));
        let group = and_group.clone().or(cond("c", 3));

        assert_eq!(group.operator(), Logic::Or);
        assert_eq!(
            group.conditions(),
            &[cond("c", 3).into(), Predicate::Group(and_group)]
        );
    }

    #[test]
    fn test_condition_map_order() {
        let map = ConditionMap::from_json(json!({
            "species": { "!=": "cat", "IN": ["dog", "bird"] },
            "age": { "BETWEEN": [1, 4] }
        }))
        .unwrap();

        let conditions = map.to_conditions().unwrap();
        let rendered: Vec<_> = conditions.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "`species` != 'cat'",
                "`species` IN ('dog', 'bird')",
                "`age` BETWEEN 1 AND 4",
            ]
        );
    }

    #[test]
    fn test_condition_map_keys_are_quoted() {
        let map = ConditionMap::from_json(json!({ "1 = 1 OR `id`": { "=": 1 } })).unwrap();
        let conditions = map.to_conditions().unwrap();

        assert!(!conditions[0].is_expression());
        assert_eq!(conditions[0].to_string(), "`1 = 1 OR ``id``` = 1");
    }

    #[test]
    fn test_declared_expression_matches_named_column() {
        let named = Condition::new("species", Op::Eq, "cat").unwrap();
        let declared = Condition::expression("species", Op::Eq, "cat").unwrap();
        assert_eq!(named, declared);

        let err = Condition::expression("COUNT(*)", Op::In, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCondition);
    }

    #[test]
    fn test_condition_map_unknown_operator() {
        let map = ConditionMap::new().add("gender", "==", "male");
        let err = map.to_conditions().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownOperator);
        assert_eq!(err.context.field.as_deref(), Some("gender"));
    }
}
