//! Integration tests for criteria built through the facade crate.

mod common;

use common::{ClientsTable, PetsTable, SalesTable, feb_first_2016};
use pretty_assertions::assert_eq;
use serde_json::json;
use tabula::prelude::*;
use tabula::query::{ErrorCode, validate_table};

#[test]
fn test_tables_validate() {
    validate_table(&PetsTable::new()).unwrap();
    validate_table(&ClientsTable::new()).unwrap();
    validate_table(&SalesTable::new()).unwrap();
}

#[test]
fn test_table_metadata() {
    let sales = SalesTable::new();
    assert_eq!(SalesTable::TABLE_NAME, "sales");
    assert_eq!(SalesTable::PRIMARY_KEY, &["pet_id", "client_id"]);

    let keys: Vec<_> = sales
        .primary_key_fields()
        .unwrap()
        .into_iter()
        .map(|(property, field)| (property, field.select_expr().to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("pet_id", "petId".to_string()),
            ("client_id", "clientId".to_string()),
        ]
    );
}

#[test]
fn test_typed_field_operators() {
    let pets = PetsTable::new();
    let cases = vec![
        (pets.species.equals("cat"), "`species` = 'cat'"),
        (pets.species.not_equal("cat"), "`species` != 'cat'"),
        (pets.species.like("si%"), "`species` LIKE 'si%'"),
        (pets.id.in_([1, 2]), "`id` IN (1, 2)"),
        (pets.id.not_in([3]), "`id` NOT IN (3)"),
        (pets.id.in_(Vec::<i64>::new()), "1 = 0"),
        (pets.id.not_in(Vec::<i64>::new()), "1 = 1"),
        (pets.id.gt(1), "`id` > 1"),
        (pets.id.gte(1), "`id` >= 1"),
        (pets.id.lt(1), "`id` < 1"),
        (pets.id.lte(1), "`id` <= 1"),
        (pets.id.not_between(1, 9), "`id` NOT BETWEEN 1 AND 9"),
        (pets.breed.is_null(), "`breed` IS NULL"),
        (pets.birthday.after(feb_first_2016()), "`birthday` > '2016-02-01 02:00:00'"),
        (pets.birthday.from(feb_first_2016()), "`birthday` <= '2016-02-01 02:00:00'"),
        (pets.birthday.until(feb_first_2016()), "`birthday` >= '2016-02-01 02:00:00'"),
    ];

    for (condition, expected) in cases {
        assert_eq!(condition.to_string(), expected);
    }
}

#[test]
fn test_groups_flatten_on_matching_operator() {
    let pets = PetsTable::new();
    let group = pets
        .species
        .equals("cat")
        .or(pets.species.equals("dog"))
        .or(pets.species.equals("bird"));
    assert_eq!(
        group.to_string(),
        "(`species` = 'cat' OR `species` = 'dog' OR `species` = 'bird')"
    );

    let mixed = group.and(pets.gender.equals("male"));
    assert_eq!(
        mixed.to_string(),
        "(`gender` = 'male' AND (`species` = 'cat' OR `species` = 'dog' OR `species` = 'bird'))"
    );
}

#[test]
fn test_condition_map_from_json() {
    let map = ConditionMap::from_json(json!({
        "gender": { "=": "male" },
        "id": { "IN": [1, 2, 3] },
        "birthday": { "BETWEEN": ["2016-01-01", "2016-12-31"] }
    }))
    .unwrap();

    let criteria = Criteria::new(PetsTable::new()).where_all(map).unwrap();
    assert_eq!(
        criteria.to_where_sql().unwrap(),
        "WHERE (`gender` = 'male' AND `id` IN (1, 2, 3) \
         AND `birthday` BETWEEN '2016-01-01' AND '2016-12-31')"
    );
}

#[test]
fn test_condition_map_unknown_operator() {
    let map = ConditionMap::new().add("gender", "==", "male");
    let err = Criteria::new(PetsTable::new()).where_(map).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownOperator);
}

#[test]
fn test_where_accumulates_with_and() {
    let criteria = Criteria::new(PetsTable::new())
        .where_fn(|t| t.gender.equals("female"))
        .unwrap()
        .where_name_op("breed", Op::NotEq, "beagle")
        .unwrap()
        .where_any_fn(|t| [t.species.equals("cat"), t.species.equals("dog")])
        .unwrap();

    assert_eq!(
        criteria.to_where_sql().unwrap(),
        "WHERE `gender` = 'female' AND `breed` != 'beagle' \
         AND (`species` = 'cat' OR `species` = 'dog')"
    );
}

#[test]
fn test_where_field_operand_shapes() {
    let criteria = Criteria::new(SalesTable::new())
        .where_field(|t| &t.total, (10, 20))
        .unwrap()
        .where_field(|t| &t.client_id, vec![4, 5])
        .unwrap()
        .where_field(|t| &t.pet_id, 9)
        .unwrap();

    assert_eq!(
        criteria.to_where_sql().unwrap(),
        "WHERE `total` BETWEEN 10 AND 20 AND `clientId` IN (4, 5) AND `petId` = 9"
    );
}
