use sieve_core::{AttributeMeta, ColumnSpec, ModelMeta, Row, TableRef, Value};

pub fn users() -> TableRef {
    TableRef::new("users")
}

/// `User` model: auto increment `id` primary key and `firstName` stored as `first_name`.
pub fn user_model() -> ModelMeta {
    ModelMeta::new("User")
        .attribute(AttributeMeta::new("id").primary_key().auto_increment())
        .attribute(AttributeMeta::new("firstName").field("first_name"))
        .attribute(AttributeMeta::new("email"))
}

pub fn user_row(first_name: &str, email: &str) -> Row {
    Row::new()
        .with("id", Value::Null)
        .with("firstName", first_name)
        .with("email", email)
}

pub fn user_columns() -> ColumnSpec {
    ColumnSpec::new()
        .column("id", "INTEGER PRIMARY KEY")
        .column("first_name", "VARCHAR(255) NOT NULL")
        .column("email", "VARCHAR(255)")
}

/// Value smuggling a statement terminator.
pub const INJECTION: &str = "');DROP TABLE users;--";
