//! Tables shared by the integration tests.

#![allow(dead_code)]

use tabula::query::{DateField, NumberField, StringField};

tabula::table! {
    /// Pets, keyed by `id`.
    pub struct PetsTable => "pets", primary_key(id) {
        pub id: NumberField = "id",
        pub species: StringField = "species",
        pub breed: StringField = "breed",
        pub birthday: DateField = "birthday",
        pub gender: StringField = "gender",
    }
}

tabula::table! {
    /// Clients, keyed by `id`.
    pub struct ClientsTable => "clients", primary_key(id) {
        pub id: NumberField = "id",
        pub name: StringField = "name",
    }
}

tabula::table! {
    /// Sales keyed by pet and client, with camel-case columns.
    pub struct SalesTable => "sales", primary_key(pet_id, client_id) {
        pub pet_id: NumberField = "petId",
        pub client_id: NumberField = "clientId",
        pub total: NumberField = "total",
        pub created_at: DateField = "createdAt",
    }
}

/// `2016-02-01 02:00:00`.
pub fn feb_first_2016() -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2016, 2, 1)
        .and_then(|d| d.and_hms_opt(2, 0, 0))
        .expect("valid date")
}
