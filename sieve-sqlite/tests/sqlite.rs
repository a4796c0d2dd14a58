#[cfg(test)]
mod tests {
    use sieve_core::{
        ColumnSpec, InsertOptions, Op, QueryGenerator, QueryOptions, Returning, Row, TableRef,
        UpdateOptions, Value, Where, WriteContext,
    };
    use sieve_sqlite::SqliteQueryGenerator;
    use sieve_tests::{execute_tests, init_logs, silent_logs, user_model, users};

    fn literal(value: impl Into<Value>) -> String {
        let mut out = String::new();
        SqliteQueryGenerator::default().write_value(
            &mut WriteContext::default(),
            &mut out,
            &value.into(),
        );
        out
    }

    #[test]
    fn sqlite() {
        init_logs();
        execute_tests(&SqliteQueryGenerator::default());
    }

    #[test]
    fn literals() {
        init_logs();
        assert_eq!(literal(true), "1");
        assert_eq!(literal(false), "0");
        assert_eq!(literal(vec![0u8, 1, 255]), "X'0001FF'");
        assert_eq!(literal("it's"), "'it''s'");
        assert_eq!(literal(f64::NEG_INFINITY), "-1.0e+10000");
        silent_logs! {
            assert_eq!(literal(f64::NAN), "NULL");
        }
    }

    #[test]
    fn select() {
        init_logs();
        let generator = SqliteQueryGenerator::default();
        let select = |options: QueryOptions| generator.select_query(&users(), &options, None);
        assert_eq!(
            select(QueryOptions {
                offset: Some(5),
                ..Default::default()
            })
            .unwrap(),
            "SELECT * FROM `users` LIMIT -1 OFFSET 5;"
        );
        assert_eq!(
            select(QueryOptions {
                where_clause: Some(Where::eq("active", true)),
                limit: Some(10),
                offset: Some(5),
                ..Default::default()
            })
            .unwrap(),
            "SELECT * FROM `users` WHERE `users`.`active` = 1 LIMIT 10 OFFSET 5;"
        );
        for op in [Op::ILike, Op::Regexp, Op::Overlap] {
            assert!(
                select(QueryOptions {
                    where_clause: Some(Where::op("name", op, "a")),
                    ..Default::default()
                })
                .is_err()
            );
        }
    }

    #[test]
    fn create_table() {
        init_logs();
        let generator = SqliteQueryGenerator::default();
        assert_eq!(
            generator
                .create_table_query(
                    &TableRef::new("items"),
                    &ColumnSpec::from([
                        ("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                        ("state", "ENUM('a', 'b') NOT NULL COMMENT 'Current state'"),
                        ("owner", "INTEGER REFERENCES `users` (`id`)"),
                    ]),
                    &Default::default(),
                )
                .unwrap(),
            concat!(
                "CREATE TABLE IF NOT EXISTS `items` (`id` INTEGER PRIMARY KEY AUTOINCREMENT,",
                " `state` TEXT NOT NULL, `owner` INTEGER REFERENCES `users` (`id`));",
            )
        );
        assert_eq!(
            generator
                .create_table_query(
                    &TableRef::new("pairs"),
                    &ColumnSpec::from([("a", "INTEGER PRIMARY KEY"), ("b", "INTEGER PRIMARY KEY")]),
                    &Default::default(),
                )
                .unwrap(),
            "CREATE TABLE IF NOT EXISTS `pairs` (`a` INTEGER, `b` INTEGER, PRIMARY KEY (`a`, `b`));"
        );
        assert_eq!(
            generator.drop_table_query(&users(), true).unwrap(),
            "DROP TABLE IF EXISTS `users`;"
        );
    }

    #[test]
    fn insert() {
        init_logs();
        let generator = SqliteQueryGenerator::default();
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
            "INSERT OR IGNORE INTO `users` (`id`, `first_name`) VALUES (NULL, $sequelize_1) RETURNING *;"
        );
        let query = generator
            .insert_query(
                &users(),
                &row,
                Some(&model),
                &InsertOptions {
                    update_on_duplicate: vec!["firstName".into()],
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            query.query,
            "INSERT INTO `users` (`id`, `first_name`) VALUES (NULL, $sequelize_1) ON CONFLICT (`id`) DO UPDATE SET `first_name` = EXCLUDED.`first_name`;"
        );
    }

    #[test]
    fn update_limit() {
        init_logs();
        let query = SqliteQueryGenerator::default()
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
        assert_eq!(
            query.query,
            "UPDATE `users` SET `name` = $sequelize_1 WHERE rowid IN (SELECT rowid FROM `users` WHERE `id` = $sequelize_2 LIMIT 1);"
        );
    }

    #[test]
    fn foreign_keys() {
        init_logs();
        let generator = SqliteQueryGenerator::default();
        assert_eq!(
            generator.get_foreign_keys_query(&users()).unwrap(),
            "PRAGMA foreign_key_list(`users`);"
        );
        assert_eq!(
            generator.get_foreign_key_query(&users(), "owner_id").unwrap(),
            "SELECT * FROM pragma_foreign_key_list('users') WHERE `from` = 'owner_id';"
        );
    }
}
