use crate::{user_model, user_row, users};
use sieve_core::{
    Condition, InsertOptions, Op, Operand, QueryGenerator, Row, SqlExpr, UpdateOptions, Value,
    Where,
};

pub fn binds(generator: &dyn QueryGenerator) {
    let table = users();
    let model = user_model();

    // Insert binds in first appearance order
    let query = generator
        .insert_query(
            &table,
            &user_row("Ada", "ada@example.com"),
            Some(&model),
            &InsertOptions::default(),
        )
        .expect("Could not build the insert query");
    let values: Vec<_> = query.bind.values().cloned().collect();
    assert_eq!(
        values,
        [Value::from("Ada"), Value::from("ada@example.com")],
        "Unexpected bind parameters of `{}`",
        query.query
    );
    assert!(!query.query.contains("Ada"));

    // Omitted nulls are neither listed nor bound
    let query = generator
        .insert_query(
            &table,
            &Row::new().with("email", Value::Null).with("firstName", "Bob"),
            Some(&model),
            &InsertOptions {
                omit_null: true,
                ..Default::default()
            },
        )
        .expect("Could not build the insert query");
    assert_eq!(query.bind.len(), 1);
    assert!(!query.query.contains("email"));

    // SET values come before the WHERE ones
    let query = generator
        .update_query(
            &table,
            &Row::new().with("firstName", "Carl").with("email", "c@d.e"),
            &Where::and([Where::eq("id", 7), Where::eq("email", "old@d.e")]),
            &UpdateOptions::default(),
            Some(&model),
        )
        .expect("Could not build the update query");
    let values: Vec<_> = query.bind.values().cloned().collect();
    assert_eq!(
        values,
        [
            Value::from("Carl"),
            Value::from("c@d.e"),
            Value::from(7),
            Value::from("old@d.e")
        ]
    );
    assert_eq!(
        query.bind.names().collect::<Vec<_>>(),
        ["sequelize_1", "sequelize_2", "sequelize_3", "sequelize_4"]
    );

    // An expression compared more than once binds its literals every time it is written
    let query = generator
        .update_query(
            &table,
            &Row::new().with("firstName", "Dora"),
            &Where::Expression {
                lhs: SqlExpr::function("LENGTH", [Operand::from("x")]),
                condition: Condition::Operators(vec![(Op::Gt, 1.into()), (Op::Lt, 5.into())]),
            },
            &UpdateOptions::default(),
            Some(&model),
        )
        .expect("Could not build the update query");
    assert_eq!(
        query.query.matches("sequelize_").count(),
        query.bind.len(),
        "Placeholders and bind parameters disagree in `{}`",
        query.query
    );
    let values: Vec<_> = query.bind.values().cloned().collect();
    assert_eq!(
        values,
        [
            Value::from("Dora"),
            Value::from("x"),
            Value::from(1),
            Value::from("x"),
            Value::from(5)
        ]
    );
}
