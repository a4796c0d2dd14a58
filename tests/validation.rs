#[cfg(test)]
mod tests {
    use sieve::{
        AttributeDefinition, DataType, Dialect, InsertOptions, ModelDefinition, Record, Returning,
        ValidationError, ValidationErrorKind, Value,
    };
    use sieve_tests::{init_logs, user_model, users};
    use std::sync::Arc;

    fn user_definition() -> ModelDefinition {
        ModelDefinition::new("User")
            .attribute(
                AttributeDefinition::new("id", DataType::Integer)
                    .not_null()
                    .auto_increment(),
            )
            .attribute(
                AttributeDefinition::new("firstName", DataType::String(Some(255)))
                    .not_null()
                    .builtin("notEmpty", true)
                    .unwrap(),
            )
            .attribute(
                AttributeDefinition::new("email", DataType::String(Some(255)))
                    .builtin("isEmail", true)
                    .unwrap(),
            )
    }

    #[tokio::test]
    async fn validate_then_insert() {
        init_logs();
        let definition = Arc::new(user_definition());
        let record = Arc::new(Record::new(
            definition.clone(),
            sieve_tests::user_row("Ada", "ada@example.com"),
        ));
        let record = record.validate(Default::default()).await.unwrap();

        let generator = Dialect::Postgres.query_generator(Default::default());
        let query = generator
            .insert_query(
                &users(),
                &record.values,
                Some(&user_model()),
                &InsertOptions {
                    returning: Returning::All,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(query.query.ends_with(" RETURNING *;"));
        assert_eq!(
            query.bind.values().cloned().collect::<Vec<_>>(),
            [Value::from("Ada"), Value::from("ada@example.com")]
        );
    }

    #[tokio::test]
    async fn invalid_record_is_not_written() {
        let definition = Arc::new(user_definition());
        let record = Arc::new(Record::new(
            definition,
            sieve_tests::user_row("", "not-an-email"),
        ));
        let error = record
            .validate(Default::default())
            .await
            .unwrap_err()
            .downcast::<ValidationError>()
            .unwrap();
        assert_eq!(error.errors.len(), 2);
        assert!(
            error
                .errors
                .iter()
                .all(|v| v.kind() == ValidationErrorKind::ValidationError)
        );
        assert_eq!(
            error.get("firstName")[0].message(),
            "Validation notEmpty on firstName failed"
        );
        assert_eq!(
            error.get("email")[0].message(),
            "Validation isEmail on email failed"
        );
    }
}
