//! Criteria: a table plus a root condition group, fed by `where*` calls.
//!
//! Every entry point funnels its input through [`Criterion::normalize`],
//! which turns field names, field selections, condition maps, prebuilt
//! predicates and lists of those into a flat list of [`Predicate`]s.
//!
//! ```rust
//! use tabula_query::prelude::*;
//!
//! table! {
//!     pub struct PetsTable => "pets", primary_key(id) {
//!         pub id: NumberField = "id",
//!         pub gender: StringField = "gender",
//!     }
//! }
//!
//! let criteria = Criteria::new(PetsTable::new())
//!     .where_fn(|t| t.gender.equals("female"))?
//!     .where_name("id", [1, 2])?;
//!
//! assert_eq!(
//!     criteria.build_where().unwrap(),
//!     "WHERE `gender` = 'female' AND `id` IN (1, 2)"
//! );
//! # Ok::<(), tabula_query::QueryError>(())
//! ```

use std::mem;

use crate::condition::{Condition, ConditionGroup, ConditionMap, Logic, Op, Predicate};
use crate::error::{QueryError, QueryResult};
use crate::field::{BooleanField, DateField, Field, NumberField, StringField};
use crate::sql;
use crate::table::Table;
use crate::value::{Operand, SqlValue};

/// What a table closure handed back.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A field, to be compared with the accompanying operand.
    Field(Field),
    /// A finished condition.
    Condition(Condition),
    /// A finished group.
    Group(ConditionGroup),
    /// Nothing usable.
    Empty,
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<&Field> for Selection {
    fn from(field: &Field) -> Self {
        Self::Field(field.clone())
    }
}

impl From<Condition> for Selection {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl From<ConditionGroup> for Selection {
    fn from(group: ConditionGroup) -> Self {
        Self::Group(group)
    }
}

impl From<Predicate> for Selection {
    fn from(predicate: Predicate) -> Self {
        match predicate {
            Predicate::Condition(c) => Self::Condition(c),
            Predicate::Group(g) => Self::Group(g),
        }
    }
}

impl<S: Into<Selection>> From<Option<S>> for Selection {
    fn from(selection: Option<S>) -> Self {
        selection.map_or(Self::Empty, Into::into)
    }
}

impl From<()> for Selection {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

/// One `where*` input before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Bare column name with an optional operator.
    Named {
        /// Column name, always quoted.
        field: String,
        /// Operator, defaulted from the operand shape when absent.
        op: Option<Op>,
        /// Right-hand side.
        operand: Operand,
    },
    /// Result of a table closure.
    Selected {
        /// What the closure returned.
        selection: Selection,
        /// Operator applied when the selection is a field.
        op: Option<Op>,
        /// Operand applied when the selection is a field, `NULL` when absent.
        operand: Option<Operand>,
    },
    /// Condition-map literal.
    Map(ConditionMap),
    /// Prebuilt condition or group.
    Predicate(Predicate),
    /// Several inputs, each contributing one predicate.
    List(Vec<Criterion>),
}

impl Criterion {
    /// `name = operand` (or `IN` / `BETWEEN` by operand shape).
    pub fn name(field: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Self::Named {
            field: field.into(),
            op: None,
            operand: operand.into(),
        }
    }

    /// `name op operand`.
    pub fn name_op(field: impl Into<String>, op: Op, operand: impl Into<Operand>) -> Self {
        Self::Named {
            field: field.into(),
            op: Some(op),
            operand: operand.into(),
        }
    }

    /// Compare a mapped field with an operand.
    pub fn field(field: impl AsRef<Field>, op: Option<Op>, operand: impl Into<Operand>) -> Self {
        Self::Selected {
            selection: Selection::Field(field.as_ref().clone()),
            op,
            operand: Some(operand.into()),
        }
    }

    /// Turn the input into predicates.
    ///
    /// List elements that expand to several conditions are wrapped in an
    /// `AND` group; elements that expand to nothing are dropped.
    pub fn normalize(self) -> QueryResult<Vec<Predicate>> {
        match self {
            Self::Named { field, op, operand } => {
                let op = op.unwrap_or_else(|| Op::default_for(&operand));
                Ok(vec![Condition::new(field, op, operand)?.into()])
            }
            Self::Selected {
                selection,
                op,
                operand,
            } => match selection {
                Selection::Field(field) => {
                    let operand = operand.unwrap_or(Operand::Scalar(SqlValue::Null));
                    let op = op.unwrap_or_else(|| Op::default_for(&operand));
                    Ok(vec![Condition::expression(field.select_expr(), op, operand)?.into()])
                }
                Selection::Condition(condition) => Ok(vec![condition.into()]),
                Selection::Group(group) if group.is_empty() => Ok(Vec::new()),
                Selection::Group(group) => Ok(vec![group.into()]),
                Selection::Empty => Err(QueryError::invalid_expression()),
            },
            Self::Map(map) => Ok(map
                .to_conditions()?
                .into_iter()
                .map(Predicate::from)
                .collect()),
            Self::Predicate(predicate) if predicate.is_empty_group() => Ok(Vec::new()),
            Self::Predicate(predicate) => Ok(vec![predicate]),
            Self::List(items) => {
                let mut predicates = Vec::with_capacity(items.len());
                for item in items {
                    let mut expanded = item.normalize()?;
                    match expanded.len() {
                        0 => {}
                        1 => predicates.append(&mut expanded),
                        _ => predicates.push(ConditionGroup::new(expanded, Logic::And).into()),
                    }
                }
                Ok(predicates)
            }
        }
    }
}

impl From<Condition> for Criterion {
    fn from(condition: Condition) -> Self {
        Self::Predicate(condition.into())
    }
}

impl From<ConditionGroup> for Criterion {
    fn from(group: ConditionGroup) -> Self {
        Self::Predicate(group.into())
    }
}

impl From<Predicate> for Criterion {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<ConditionMap> for Criterion {
    fn from(map: ConditionMap) -> Self {
        Self::Map(map)
    }
}

impl From<Selection> for Criterion {
    fn from(selection: Selection) -> Self {
        Self::Selected {
            selection,
            op: None,
            operand: None,
        }
    }
}

impl From<Field> for Criterion {
    fn from(field: Field) -> Self {
        Selection::Field(field).into()
    }
}

impl<S: Into<Selection>> From<Option<S>> for Criterion {
    fn from(selection: Option<S>) -> Self {
        Selection::from(selection).into()
    }
}

impl From<()> for Criterion {
    fn from(_: ()) -> Self {
        Selection::Empty.into()
    }
}

macro_rules! typed_selection {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Selection {
                fn from(field: $ty) -> Self {
                    Self::Field(field.into())
                }
            }

            impl From<$ty> for Criterion {
                fn from(field: $ty) -> Self {
                    Selection::Field(field.into()).into()
                }
            }
        )+
    };
}

typed_selection!(StringField, NumberField, BooleanField, DateField);

impl<C: Into<Criterion>> From<Vec<C>> for Criterion {
    fn from(items: Vec<C>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<C: Into<Criterion>, const N: usize> From<[C; N]> for Criterion {
    fn from(items: [C; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// A table and the root of its condition tree.
///
/// The root is an `AND` group and starts empty.
#[derive(Debug, Clone)]
pub struct Criteria<T: Table> {
    table: T,
    conditions: ConditionGroup,
}

impl<T: Table> Criteria<T> {
    /// Create empty criteria for a table.
    pub fn new(table: T) -> Self {
        Self {
            table,
            conditions: ConditionGroup::default(),
        }
    }

    /// The mapped table.
    pub fn table(&self) -> &T {
        &self.table
    }

    /// The root group.
    pub fn conditions(&self) -> &ConditionGroup {
        &self.conditions
    }

    /// Check if no condition was added.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// AND predicates into the root.
    ///
    /// With `group` set they are always wrapped in a group of that operator.
    /// Without it, a single predicate is added as is and several are wrapped
    /// in an `AND` group.
    fn push(&mut self, mut predicates: Vec<Predicate>, group: Option<Logic>) {
        let predicate = match (predicates.len(), group) {
            (0, _) => return,
            (1, None) => predicates.remove(0),
            (_, logic) => ConditionGroup::new(predicates, logic.unwrap_or(Logic::And)).into(),
        };

        let root = mem::take(&mut self.conditions);
        self.conditions = root.and(predicate);
    }

    /// Render the `WHERE` clause, `None` when there are no conditions.
    pub fn to_where_sql(&self) -> Option<String> {
        sql::render_where(&self.conditions)
    }
}

/// Shared `where*` surface of criteria and of the statements that filter.
///
/// All methods consume the builder and hand it back, so calls chain with `?`.
pub trait Whereable<T: Table>: Sized {
    /// The criteria being built.
    fn criteria(&self) -> &Criteria<T>;

    /// Mutable access to the criteria being built.
    fn criteria_mut(&mut self) -> &mut Criteria<T>;

    /// AND any criterion into the root.
    fn where_(mut self, criterion: impl Into<Criterion>) -> QueryResult<Self> {
        let predicates = criterion.into().normalize()?;
        self.criteria_mut().push(predicates, None);
        Ok(self)
    }

    /// AND whatever the closure builds from the table.
    fn where_fn<F, C>(self, build: F) -> QueryResult<Self>
    where
        F: FnOnce(&T) -> C,
        C: Into<Criterion>,
    {
        let criterion = build(self.criteria().table()).into();
        self.where_(criterion)
    }

    /// AND `field = value`, or `IN` / `BETWEEN` by operand shape.
    fn where_field<F, Fld>(self, select: F, value: impl Into<Operand>) -> QueryResult<Self>
    where
        F: FnOnce(&T) -> &Fld,
        Fld: AsRef<Field> + ?Sized,
    {
        let criterion = Criterion::field(select(self.criteria().table()).as_ref(), None, value);
        self.where_(criterion)
    }

    /// AND `field op value`.
    fn where_field_op<F, Fld>(self, select: F, op: Op, value: impl Into<Operand>) -> QueryResult<Self>
    where
        F: FnOnce(&T) -> &Fld,
        Fld: AsRef<Field> + ?Sized,
    {
        let criterion = Criterion::field(select(self.criteria().table()).as_ref(), Some(op), value);
        self.where_(criterion)
    }

    /// AND `name = value` for a bare column name.
    fn where_name(self, name: impl Into<String>, value: impl Into<Operand>) -> QueryResult<Self> {
        self.where_(Criterion::name(name, value))
    }

    /// AND `name op value` for a bare column name.
    fn where_name_op(
        self,
        name: impl Into<String>,
        op: Op,
        value: impl Into<Operand>,
    ) -> QueryResult<Self> {
        self.where_(Criterion::name_op(name, op, value))
    }

    /// AND one group holding every resulting predicate, joined by `AND`.
    fn where_all(mut self, criterion: impl Into<Criterion>) -> QueryResult<Self> {
        let predicates = criterion.into().normalize()?;
        self.criteria_mut().push(predicates, Some(Logic::And));
        Ok(self)
    }

    /// AND one group holding every resulting predicate, joined by `OR`.
    fn where_any(mut self, criterion: impl Into<Criterion>) -> QueryResult<Self> {
        let predicates = criterion.into().normalize()?;
        self.criteria_mut().push(predicates, Some(Logic::Or));
        Ok(self)
    }

    /// [`where_all`](Self::where_all) over a list built from the table, order kept.
    fn where_all_fn<F, I>(self, build: F) -> QueryResult<Self>
    where
        F: FnOnce(&T) -> I,
        I: IntoIterator,
        I::Item: Into<Criterion>,
    {
        let items = build(self.criteria().table()).into_iter().map(Into::into).collect();
        self.where_all(Criterion::List(items))
    }

    /// [`where_any`](Self::where_any) over a list built from the table, order kept.
    fn where_any_fn<F, I>(self, build: F) -> QueryResult<Self>
    where
        F: FnOnce(&T) -> I,
        I: IntoIterator,
        I::Item: Into<Criterion>,
    {
        let items = build(self.criteria().table()).into_iter().map(Into::into).collect();
        self.where_any(Criterion::List(items))
    }

    /// Variadic form of [`where_all`](Self::where_all).
    ///
    /// The first argument is moved behind the rest: `[a, b, c]` groups as
    /// `(b AND c AND a)`.
    fn where_all_args<F>(self, build: F) -> QueryResult<Self>
    where
        F: FnOnce(&T) -> Vec<Criterion>,
    {
        let args = variadic(build(self.criteria().table()));
        self.where_all(Criterion::List(args))
    }

    /// Variadic form of [`where_any`](Self::where_any), reordered like
    /// [`where_all_args`](Self::where_all_args).
    fn where_any_args<F>(self, build: F) -> QueryResult<Self>
    where
        F: FnOnce(&T) -> Vec<Criterion>,
    {
        let args = variadic(build(self.criteria().table()));
        self.where_any(Criterion::List(args))
    }

    /// Render the `WHERE` clause.
    fn build_where(&self) -> Option<String> {
        self.criteria().to_where_sql()
    }
}

fn variadic(mut args: Vec<Criterion>) -> Vec<Criterion> {
    if args.len() > 1 {
        args.rotate_left(1);
    }
    args
}

impl<T: Table> Whereable<T> for Criteria<T> {
    fn criteria(&self) -> &Criteria<T> {
        self
    }

    fn criteria_mut(&mut self) -> &mut Criteria<T> {
        self
    }
}
