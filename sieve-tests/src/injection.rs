use crate::{INJECTION, users};
use sieve_core::{QueryGenerator, QueryOptions, Row, Value, Where};

pub fn injection(generator: &dyn QueryGenerator) {
    let table = users();

    // Bound values never reach the statement text
    let query = generator
        .insert_query(
            &table,
            &Row::new().with("email", INJECTION),
            None,
            &Default::default(),
        )
        .expect("Could not build the insert query");
    assert!(!query.query.contains("DROP"), "Leaked value: `{}`", query.query);
    assert_eq!(query.bind.values().next(), Some(&Value::from(INJECTION)));

    // Inlined values keep the statement terminator inside the literal
    let query = generator
        .select_query(
            &table,
            &QueryOptions {
                where_clause: Some(Where::eq("email", INJECTION)),
                ..Default::default()
            },
            None,
        )
        .expect("Could not build the select query");
    assert_eq!(
        query.matches(';').count(),
        INJECTION.matches(';').count() + 1,
        "Unexpected statement terminator in `{query}`"
    );
    assert!(
        query.ends_with("--';"),
        "The literal does not enclose the value in `{query}`"
    );
}
