//! Declarative macros for table mappings and variadic where clauses.
//!
//! # Examples
//!
//! ```rust
//! use tabula_query::prelude::*;
//!
//! table! {
//!     /// The `pets` table.
//!     pub struct PetsTable => "pets", primary_key(id) {
//!         pub id: NumberField = "id",
//!         pub species: StringField = "species",
//!     }
//! }
//!
//! let query = where_any!(
//!     Query::new(PetsTable::new()),
//!     |t| t.species.equals("cat"), t.species.equals("dog")
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     query.to_string(),
//!     "SELECT `id`, `species` FROM `pets` WHERE (`species` = 'dog' OR `species` = 'cat');"
//! );
//! ```

/// Declare a table mapping.
///
/// Generates the struct, an infallible `new()`, `Default` and the
/// [`Table`](crate::table::Table) impl. Select expressions must be non-blank
/// and every primary key must name a declared property; both are checked at
/// compile time.
///
/// Properties whose name differs from the column expression are selected
/// with an alias, so rows come back keyed by property name.
#[macro_export]
macro_rules! table {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $table:literal, primary_key($($pk:ident),* $(,)?) {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $prop:ident : $ty:ty = $expr:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $prop: $ty,
            )*
            __fields: $crate::field::FieldSet,
        }

        const _: () = {
            $( assert!(!$crate::field::is_blank($expr)); )*

            #[allow(dead_code)]
            fn primary_key_is_declared(table: &$name) {
                let _ = table;
                $( let _ = &table.$pk; )*
            }
        };

        impl $name {
            /// Build the table mapping.
            pub fn new() -> Self {
                $(
                    let $prop = <$ty as $crate::field::TypedField>::from_field(
                        $crate::field::Field::declared(
                            stringify!($prop),
                            $expr,
                            <$ty as $crate::field::TypedField>::KIND,
                        ),
                    );
                )*

                let mut __fields = $crate::field::FieldSet::new();
                $(
                    __fields.insert(
                        stringify!($prop),
                        $crate::field::TypedField::as_field(&$prop).clone(),
                    );
                )*

                Self {
                    $( $prop, )*
                    __fields,
                }
            }
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::table::Table for $name {
            const TABLE_NAME: &'static str = $table;
            const PRIMARY_KEY: &'static [&'static str] = &[$(stringify!($pk)),*];

            fn fields(&self) -> &$crate::field::FieldSet {
                &self.__fields
            }
        }
    };
}

/// AND several criteria together as one group.
///
/// `where_all!(builder, |t| a, b, c)` calls
/// [`Whereable::where_all_args`](crate::criteria::Whereable::where_all_args),
/// which moves the first argument behind the others.
#[macro_export]
macro_rules! where_all {
    ($builder:expr, |$t:ident| $($item:expr),+ $(,)?) => {
        $crate::criteria::Whereable::where_all_args($builder, |$t| {
            ::std::vec![$($crate::criteria::Criterion::from($item)),+]
        })
    };
}

/// OR several criteria together as one group.
///
/// Argument order follows [`where_all!`].
#[macro_export]
macro_rules! where_any {
    ($builder:expr, |$t:ident| $($item:expr),+ $(,)?) => {
        $crate::criteria::Whereable::where_any_args($builder, |$t| {
            ::std::vec![$($crate::criteria::Criterion::from($item)),+]
        })
    };
}
