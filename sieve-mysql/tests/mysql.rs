#[cfg(test)]
mod tests {
    use sieve_core::{
        BindStyle, ColumnSpec, CreateTableOptions, DeleteOptions, GeneratorOptions, IndexHint,
        IndexHintKind, InsertOptions, Op, QueryGenerator, QueryOptions, Returning, Row, TableRef,
        UniqueKey, UpdateOptions, Value, Where, WriteContext,
    };
    use sieve_mysql::MySqlQueryGenerator;
    use sieve_tests::{execute_tests, init_logs, silent_logs, user_model, users};
    use time::macros::datetime;

    fn literal(value: impl Into<Value>) -> String {
        let mut out = String::new();
        MySqlQueryGenerator::default().write_value(
            &mut WriteContext::default(),
            &mut out,
            &value.into(),
        );
        out
    }

    #[test]
    fn mysql() {
        init_logs();
        execute_tests(&MySqlQueryGenerator::default());
    }

    #[test]
    fn literals() {
        init_logs();
        assert_eq!(literal("a'b\"c\\d\ne\0"), r#"'a\'b\"c\\d\ne\0'"#);
        assert_eq!(literal(vec![0u8, 1, 255]), "X'0001FF'");
        assert_eq!(literal(true), "true");
        assert_eq!(literal(f64::INFINITY), "1.0e+10000");
        assert_eq!(literal(f64::NEG_INFINITY), "-1.0e+10000");
        silent_logs! {
            assert_eq!(literal(f64::NAN), "NULL");
        }
        assert_eq!(
            literal(datetime!(2024-01-02 03:04:05.678 +02:00)),
            "'2024-01-02 01:04:05.678'"
        );
        assert_eq!(literal(vec![Value::from(1), Value::from("a")]), "1, 'a'");
    }

    #[test]
    fn select() {
        init_logs();
        let generator = MySqlQueryGenerator::default();
        let table = users();
        let select = |options: QueryOptions| generator.select_query(&table, &options, None);
        assert_eq!(
            select(QueryOptions {
                where_clause: Some(Where::op("name", Op::Regexp, "^a")),
                index_hints: vec![IndexHint {
                    kind: IndexHintKind::Use,
                    values: vec!["idx_name".into()],
                }],
                limit: Some(10),
                offset: Some(5),
                ..Default::default()
            })
            .unwrap(),
            "SELECT * FROM `users` USE INDEX (`idx_name`) WHERE `users`.`name` REGEXP '^a' LIMIT 5, 10;"
        );
        assert_eq!(
            select(QueryOptions {
                offset: Some(5),
                ..Default::default()
            })
            .unwrap(),
            "SELECT * FROM `users` LIMIT 5, 18446744073709551615;"
        );
        assert_eq!(
            select(QueryOptions {
                limit: Some(0),
                ..Default::default()
            })
            .unwrap(),
            "SELECT * FROM `users` LIMIT 0;"
        );
        for op in [Op::ILike, Op::IRegexp, Op::Contains] {
            let error = select(QueryOptions {
                where_clause: Some(Where::op("name", op, "a")),
                ..Default::default()
            })
            .unwrap_err();
            assert!(format!("{error:#}").contains("does not support the operator"));
        }
    }

    #[test]
    fn create_table() {
        init_logs();
        let query = MySqlQueryGenerator::default()
            .create_table_query(
                &TableRef::new("items"),
                &ColumnSpec::from([
                    ("id", "INTEGER PRIMARY KEY AUTO_INCREMENT"),
                    ("owner", "INTEGER REFERENCES `users` (`id`)"),
                    ("state", "ENUM('a', 'b') COMMENT 'State'"),
                ]),
                &CreateTableOptions {
                    unique_keys: vec![UniqueKey::new(["owner", "state"])],
                    comment: Some("Items".into()),
                    charset: Some("utf8mb4".into()),
                    collate: Some("utf8mb4_bin".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            query,
            concat!(
                "CREATE TABLE IF NOT EXISTS `items` (`id` INTEGER AUTO_INCREMENT, `owner` INTEGER,",
                " `state` ENUM('a', 'b') COMMENT 'State', PRIMARY KEY (`id`),",
                " UNIQUE `items_owner_state_unique` (`owner`, `state`),",
                " FOREIGN KEY (`owner`) REFERENCES `users` (`id`))",
                " ENGINE=InnoDB COMMENT 'Items' DEFAULT CHARSET=utf8mb4 COLLATE utf8mb4_bin;",
            )
        );
        assert_eq!(
            MySqlQueryGenerator::default()
                .drop_table_query(&users(), true)
                .unwrap(),
            "DROP TABLE IF EXISTS `users`;"
        );
    }

    #[test]
    fn insert() {
        init_logs();
        let generator = MySqlQueryGenerator::default();
        let model = user_model();
        let row = Row::from([("id", Value::Null), ("firstName", Value::from("Ada"))]);
        let query = generator
            .insert_query(
                &users(),
                &row,
                Some(&model),
                &InsertOptions {
                    ignore_duplicates: true,
                    returning: Returning::All,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            query.query,
            "INSERT IGNORE INTO `users` (`id`, `first_name`) VALUES (DEFAULT, $sequelize_1);"
        );
        let query = generator
            .insert_query(
                &users(),
                &row,
                Some(&model),
                &InsertOptions {
                    ignore_duplicates: true,
                    update_on_duplicate: vec!["firstName".into()],
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            query.query,
            "INSERT INTO `users` (`id`, `first_name`) VALUES (DEFAULT, $sequelize_1) ON DUPLICATE KEY UPDATE `first_name` = VALUES(`first_name`);"
        );
        let query = generator
            .insert_query(&users(), &Row::new(), None, &Default::default())
            .unwrap();
        assert_eq!(query.query, "INSERT INTO `users` VALUES ();");
    }

    #[test]
    fn limited_statements() {
        init_logs();
        let generator = MySqlQueryGenerator::new(GeneratorOptions {
            bind_style: BindStyle::Positional,
            ..Default::default()
        });
        let query = generator
            .update_query(
                &users(),
                &Row::from([("name", "bar")]),
                &Where::eq("id", 7),
                &UpdateOptions {
                    limit: Some(1),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(query.query, "UPDATE `users` SET `name` = ? WHERE `id` = ? LIMIT 1;");
        assert_eq!(query.bind.names().collect::<Vec<_>>(), ["1", "2"]);
        assert_eq!(
            generator
                .delete_query(
                    &users(),
                    &Where::eq("id", 1),
                    &DeleteOptions { limit: Some(2) }
                )
                .unwrap(),
            "DELETE FROM `users` WHERE `id` = 1 LIMIT 2;"
        );
    }

    #[test]
    fn foreign_keys() {
        init_logs();
        let generator = MySqlQueryGenerator::default();
        let query = generator
            .get_foreign_keys_query(&TableRef::new("users").with_schema("shop"))
            .unwrap();
        assert!(query.contains("FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE"));
        assert!(query.ends_with(
            "WHERE TABLE_NAME = 'users' AND TABLE_SCHEMA = 'shop' AND REFERENCED_TABLE_NAME IS NOT NULL;"
        ));
        let query = generator
            .get_foreign_key_query(&users(), "owner_id")
            .unwrap();
        assert!(query.contains(
            "(REFERENCED_TABLE_NAME = 'users' AND REFERENCED_COLUMN_NAME = 'owner_id')"
        ));
    }
}
