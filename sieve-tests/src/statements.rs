use crate::{user_columns, user_model, user_row, users};
use sieve_core::{
    Op, QueryGenerator, QueryOptions, Row, UpdateOptions, Value, Where,
};

pub fn statements(generator: &dyn QueryGenerator) {
    let table = users();
    let model = user_model();

    // Deterministic
    let options = QueryOptions {
        where_clause: Some(Where::eq("email", "a@b.c")),
        limit: Some(3),
        ..Default::default()
    };
    let first = generator
        .select_query(&table, &options, Some(&model))
        .expect("Could not build the select query");
    let second = generator
        .select_query(&table, &options, Some(&model))
        .expect("Could not build the select query");
    assert_eq!(first, second);
    assert!(first.ends_with(';'));

    // Empty predicates render no WHERE
    let query = generator
        .select_query(
            &table,
            &QueryOptions {
                where_clause: Some(Where::and([Where::or([]), Where::and([])])),
                ..Default::default()
            },
            None,
        )
        .expect("Could not build the select query");
    assert!(!query.contains("WHERE"), "Unexpected WHERE in `{query}`");

    // Zero offset is never rendered
    let plain = generator
        .select_query(&table, &Default::default(), None)
        .expect("Could not build the select query");
    let zero_offset = generator
        .select_query(
            &table,
            &QueryOptions {
                offset: Some(0),
                ..Default::default()
            },
            None,
        )
        .expect("Could not build the select query");
    assert_eq!(plain, zero_offset);

    // Sub query wraps the main select
    let query = generator
        .select_query(
            &table,
            &QueryOptions {
                sub_query: true,
                where_clause: Some(Where::eq("id", 1)),
                ..Default::default()
            },
            None,
        )
        .expect("Could not build the select query");
    assert!(query.contains(" FROM (SELECT "), "Not a sub query: `{query}`");

    // Invalid input is rejected before any SQL is produced
    let between = generator.select_query(
        &table,
        &QueryOptions {
            where_clause: Some(Where::op("id", Op::Between, vec![Value::from(1)])),
            ..Default::default()
        },
        None,
    );
    assert!(between.is_err());
    assert!(
        generator
            .update_query(&table, &Row::new(), &Where::default(), &UpdateOptions::default(), None)
            .is_err()
    );
    assert!(
        generator
            .bulk_insert_query(&table, &[], &Default::default(), None)
            .is_err()
    );

    // Every definition reaches the create table statement
    let query = generator
        .create_table_query(&table, &user_columns(), &Default::default())
        .expect("Could not build the create table query");
    assert!(query.contains("first_name"));
    assert!(query.contains("PRIMARY KEY"));

    // Bulk insert fills the gaps
    let query = generator
        .bulk_insert_query(
            &table,
            &[
                user_row("Ada", "ada@example.com"),
                Row::new().with("email", "bob@example.com"),
            ],
            &Default::default(),
            Some(&model),
        )
        .expect("Could not build the bulk insert query");
    assert!(query.contains("first_name"));
    assert!(query.contains("NULL"));
}
