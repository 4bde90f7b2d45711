//! Benchmarks for criteria normalization and statement rendering.

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tabula_query::{
    ConditionMap, Delete, Insert, NumberField, Query, Statement, StringField, DateField,
    Whereable, record, table, where_all, where_any,
};

table! {
    pub struct PetsTable => "pets", primary_key(id) {
        pub id: NumberField = "id",
        pub species: StringField = "species",
        pub breed: StringField = "breed",
        pub birthday: DateField = "birthday",
        pub gender: StringField = "gender",
    }
}

// ============================================================================
// Condition Building Benchmarks
// ============================================================================

fn bench_conditions(c: &mut Criterion) {
    let mut group = c.benchmark_group("conditions");
    let pets = PetsTable::new();

    group.bench_function("typed_equals", |b| {
        b.iter(|| black_box(pets.species.equals("cat")))
    });

    group.bench_function("typed_in", |b| {
        b.iter(|| black_box(pets.id.in_([2, 4, 6, 8])))
    });

    group.bench_function("condition_map", |b| {
        b.iter(|| {
            let map = ConditionMap::new()
                .add("gender", "=", "male")
                .add("species", "!=", "cat");
            black_box(map.to_conditions())
        })
    });

    group.finish();
}

// ============================================================================
// Statement Rendering Benchmarks
// ============================================================================

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let birthday = NaiveDate::from_ymd_opt(2016, 2, 1)
        .and_then(|d| d.and_hms_opt(2, 0, 0))
        .unwrap_or_default();

    group.bench_function("all_fields", |b| {
        let query = Query::new(PetsTable::new());
        b.iter(|| black_box(query.to_sql()))
    });

    group.bench_function("nested_where", |b| {
        b.iter(|| {
            let query = where_all!(
                Query::new(PetsTable::new()),
                |t| t.gender.equals("male"), t.birthday.before(birthday)
            )
            .and_then(|q| q.where_field(|t| &t.id, [2, 4, 6, 8]))
            .and_then(|q| where_any!(q, |t| t.species.equals("cat"), t.species.equals("dog")));
            black_box(query.and_then(|q| q.to_sql()))
        })
    });

    for size in [10usize, 100, 1000] {
        let ids: Vec<i64> = (0..size as i64).collect();
        group.bench_with_input(BenchmarkId::new("in_list", size), &ids, |b, ids| {
            let query = Query::new(PetsTable::new()).where_name("id", ids.clone());
            b.iter(|| black_box(query.as_ref().map(|q| q.to_sql())))
        });
    }

    group.finish();
}

fn bench_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("writes");

    group.bench_function("insert", |b| {
        b.iter(|| {
            let insert = Insert::new(
                PetsTable::new(),
                record! { "species" => "cat", "breed" => "siamese", "gender" => "male" },
            );
            black_box(insert.to_sql())
        })
    });

    group.bench_function("delete", |b| {
        let delete = Delete::new(PetsTable::new()).where_fn(|t| t.id.equals(123));
        b.iter(|| black_box(delete.as_ref().map(|d| d.to_sql())))
    });

    group.finish();
}

criterion_group!(benches, bench_conditions, bench_select, bench_writes);
criterion_main!(benches);
