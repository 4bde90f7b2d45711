//! Tables shared by the unit tests.

use crate::field::{DateField, NumberField, StringField};

crate::table! {
    /// Pets, keyed by `id`.
    pub struct PetsTable => "pets", primary_key(id) {
        pub id: NumberField = "id",
        pub species: StringField = "species",
        pub breed: StringField = "breed",
        pub birthday: DateField = "birthday",
        pub gender: StringField = "gender",
    }
}

crate::table! {
    /// Sales with a composite key and renamed columns.
    pub struct SalesTable => "sales", primary_key(pet_id, owner_id) {
        pub pet_id: NumberField = "petId",
        pub owner_id: NumberField = "clientId",
        pub total: NumberField = "total",
        pub created_at: DateField = "createdAt",
    }
}

crate::table! {
    /// A table without primary key.
    pub struct LogsTable => "logs", primary_key() {
        pub message: StringField = "message",
    }
}
