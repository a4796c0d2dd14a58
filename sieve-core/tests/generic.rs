#[cfg(test)]
mod tests {
    use sieve_core::{
        Attribute, AttributeMeta, BindStyle, BulkInsertOptions, ColumnSpec, Condition,
        CreateTableOptions, DeleteOptions, GeneratorOptions, GenericQueryGenerator, Group,
        GroupItem, InsertOptions, ModelMeta, Op, Operand, Order, OrderItem, QueryGenerator,
        QueryOptions, Returning, Row, SqlExpr, TableRef, Trigger, TriggerEvent, TriggerTiming,
        UniqueKey, UpdateOptions, Value, Where, WriteContext,
    };
    use time::macros::{date, datetime};

    fn generator() -> GenericQueryGenerator {
        GenericQueryGenerator::default()
    }

    fn select(options: QueryOptions) -> String {
        generator()
            .select_query(&TableRef::new("users"), &options, None)
            .expect("Could not build the select query")
    }

    fn user_model() -> ModelMeta {
        ModelMeta::new("User")
            .attribute(AttributeMeta::new("id").primary_key().auto_increment())
            .attribute(AttributeMeta::new("firstName").field("first_name"))
    }

    #[test]
    fn create_table_minimal() {
        let query = generator()
            .create_table_query(
                &TableRef::new("myTable"),
                &ColumnSpec::from([("title", "VARCHAR(255)")]),
                &Default::default(),
            )
            .unwrap();
        assert_eq!(
            query,
            r#"CREATE TABLE IF NOT EXISTS "myTable" ("title" VARCHAR(255));"#
        );
    }

    #[test]
    fn create_table_constraints() {
        let query = generator()
            .create_table_query(
                &TableRef::new("people"),
                &ColumnSpec::from([
                    ("id", "INTEGER PRIMARY KEY"),
                    (
                        "owner",
                        r#"INTEGER REFERENCES "users" ("id") ON DELETE CASCADE"#,
                    ),
                    ("name", "VARCHAR(255) COMMENT Display name"),
                ]),
                &CreateTableOptions {
                    unique_keys: vec![UniqueKey::new(["name", "owner"])],
                    comment: Some("People".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            query,
            concat!(
                r#"CREATE TABLE IF NOT EXISTS "people" ("id" INTEGER, "#,
                r#""owner" INTEGER REFERENCES "users" ("id") ON DELETE CASCADE, "#,
                r#""name" VARCHAR(255), PRIMARY KEY ("id"), UNIQUE ("name", "owner"));"#,
                r#" COMMENT ON COLUMN "people"."name" IS 'Display name';"#,
                r#" COMMENT ON TABLE "people" IS 'People';"#,
            )
        );
    }

    #[test]
    fn create_table_malformed_enum() {
        let result = generator().create_table_query(
            &TableRef::new("t"),
            &ColumnSpec::from([("state", "ENUM(open, closed)")]),
            &Default::default(),
        );
        let error = result.expect_err("Malformed enum must be rejected");
        assert!(format!("{error:#}").contains("state"));
    }

    #[test]
    fn drop_table() {
        let table = TableRef::new("users").with_schema("app");
        assert_eq!(
            generator().drop_table_query(&table, true).unwrap(),
            r#"DROP TABLE IF EXISTS "app"."users" CASCADE;"#
        );
        assert_eq!(
            generator().drop_table_query(&table, false).unwrap(),
            r#"DROP TABLE IF EXISTS "app"."users";"#
        );
    }

    #[test]
    fn select_limit_and_offset() {
        assert_eq!(select(Default::default()), r#"SELECT * FROM "users";"#);
        assert_eq!(
            select(QueryOptions {
                limit: Some(0),
                ..Default::default()
            }),
            r#"SELECT * FROM "users" LIMIT 0;"#
        );
        assert_eq!(
            select(QueryOptions {
                offset: Some(0),
                ..Default::default()
            }),
            r#"SELECT * FROM "users";"#
        );
        assert_eq!(
            select(QueryOptions {
                limit: Some(10),
                offset: Some(5),
                ..Default::default()
            }),
            r#"SELECT * FROM "users" LIMIT 10 OFFSET 5;"#
        );
    }

    #[test]
    fn select_where_null_and_lists() {
        let query = select(QueryOptions {
            where_clause: Some(Where::and([
                Where::eq("name", "foo"),
                Where::eq("deleted_at", Value::Null),
                Where::op("id", Op::In, Vec::<Value>::new()),
                Where::op("kind", Op::Ne, Value::Null),
            ])),
            ..Default::default()
        });
        assert_eq!(
            query,
            concat!(
                r#"SELECT * FROM "users" WHERE "users"."name" = 'foo' AND "users"."deleted_at" IS NULL"#,
                r#" AND "users"."id" IN (NULL) AND "users"."kind" IS NOT NULL;"#,
            )
        );
    }

    #[test]
    fn select_where_dropped_when_empty() {
        let query = select(QueryOptions {
            where_clause: Some(Where::and([
                Where::op("id", Op::NotIn, Vec::<Value>::new()),
                Where::or([]),
            ])),
            ..Default::default()
        });
        assert_eq!(query, r#"SELECT * FROM "users";"#);

        let query = select(QueryOptions {
            where_clause: Some(Where::raw("   ")),
            having: Some(Where::and([Where::raw(""), Where::raw(" \n ")])),
            ..Default::default()
        });
        assert_eq!(query, r#"SELECT * FROM "users";"#);

        let query = select(QueryOptions {
            where_clause: Some(Where::and([Where::raw("  "), Where::eq("a", 1)])),
            ..Default::default()
        });
        assert_eq!(query, r#"SELECT * FROM "users" WHERE "users"."a" = 1;"#);
    }

    #[test]
    fn select_where_nesting() {
        let query = select(QueryOptions {
            table_as: Some("u".into()),
            where_clause: Some(Where::or([
                Where::and([Where::eq("a", 1), Where::eq("b", 2)]),
                Where::eq("c", vec![Value::from(1), Value::from(2)]),
                Where::not(Where::eq("d", true)),
            ])),
            ..Default::default()
        });
        assert_eq!(
            query,
            concat!(
                r#"SELECT * FROM "users" AS "u" WHERE ("u"."a" = 1 AND "u"."b" = 2)"#,
                r#" OR "u"."c" IN (1, 2) OR NOT ("u"."d" = true);"#,
            )
        );
    }

    #[test]
    fn select_where_operators() {
        let query = select(QueryOptions {
            where_clause: Some(Where::and([
                Where::Attribute {
                    column: "age".into(),
                    condition: Condition::Operators(vec![(Op::Gte, 18.into()), (Op::Lt, 65.into())]),
                },
                Where::op("name", Op::StartsWith, "jo"),
                Where::op("bio", Op::Substring, "50%"),
                Where::op("score", Op::Between, vec![Value::from(1), Value::from(5)]),
                Where::op("tags", Op::Contains, vec![Value::from("a")]),
                Where::Expression {
                    lhs: SqlExpr::function("lower", [Operand::from(SqlExpr::column("email"))]),
                    condition: Condition::Equals("x@y.z".into()),
                },
            ])),
            ..Default::default()
        });
        assert_eq!(
            query,
            concat!(
                r#"SELECT * FROM "users" WHERE ("users"."age" >= 18 AND "users"."age" < 65)"#,
                r#" AND "users"."name" LIKE 'jo%' AND "users"."bio" LIKE '%50%%'"#,
                r#" AND "users"."score" BETWEEN 1 AND 5 AND "users"."tags" @> ARRAY['a']"#,
                r#" AND lower("users"."email") = 'x@y.z';"#,
            )
        );
    }

    #[test]
    fn select_between_needs_two_values() {
        let result = generator().select_query(
            &TableRef::new("users"),
            &QueryOptions {
                where_clause: Some(Where::op("age", Op::Between, 5)),
                ..Default::default()
            },
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn select_order() {
        let query = select(QueryOptions {
            order: Some(Order::List(vec![
                OrderItem::Path(vec!["name".into(), "DESC".into()]),
                OrderItem::Path(vec!["profile".into(), "age".into()]),
                OrderItem::Path(vec!["created".into(), "desc".into()]),
                OrderItem::Column("id".into()),
                OrderItem::Expression(SqlExpr::literal("RANDOM()"), Some("ASC NULLS LAST".into())),
            ])),
            ..Default::default()
        });
        assert_eq!(
            query,
            concat!(
                r#"SELECT * FROM "users" ORDER BY "name" DESC, "profile"."age","#,
                r#" "created"."desc", "id", RANDOM() ASC NULLS LAST;"#,
            )
        );
        let result = generator().select_query(
            &TableRef::new("users"),
            &QueryOptions {
                order: Some(Order::List(vec![OrderItem::Expression(
                    SqlExpr::column("id"),
                    Some("DESC; DROP TABLE users".into()),
                )])),
                ..Default::default()
            },
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn select_sub_query() {
        let query = select(QueryOptions {
            sub_query: true,
            table_as: Some("u".into()),
            where_clause: Some(Where::eq("a", 1)),
            order: Some(Order::Identifier("id".into())),
            limit: Some(5),
            ..Default::default()
        });
        assert_eq!(
            query,
            r#"SELECT "u".* FROM (SELECT * FROM "users" AS "u" WHERE "u"."a" = 1) AS "u" ORDER BY "id" LIMIT 5;"#
        );
    }

    #[test]
    fn select_group_having() {
        let query = generator()
            .select_query(
                &TableRef::new("items"),
                &QueryOptions {
                    attributes: vec![
                        Attribute::Column("kind".into()),
                        Attribute::Expression(
                            SqlExpr::function("COUNT", [Operand::from(SqlExpr::literal("*"))]),
                            "total".into(),
                        ),
                    ],
                    group: Some(Group::List(vec![GroupItem::Column("kind".into())])),
                    having: Some(Where::raw("COUNT(*) > 1")),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(
            query,
            r#"SELECT "kind", COUNT(*) AS "total" FROM "items" GROUP BY "kind" HAVING COUNT(*) > 1;"#
        );
    }

    #[test]
    fn identifiers_quoting() {
        let unquoted = GenericQueryGenerator::new(GeneratorOptions {
            quote_identifiers: false,
            ..Default::default()
        });
        let options = QueryOptions {
            where_clause: Some(Where::eq("name", "x")),
            ..Default::default()
        };
        assert_eq!(
            unquoted
                .select_query(&TableRef::new("users").with_schema("app"), &options, None)
                .unwrap(),
            "SELECT * FROM app.users WHERE app.users.name = 'x';"
        );
        assert_eq!(
            generator()
                .select_query(&TableRef::new("users").with_schema("app"), &options, None)
                .unwrap(),
            r#"SELECT * FROM "app"."users" WHERE "app"."users"."name" = 'x';"#
        );
        assert_eq!(
            generator()
                .select_query(&TableRef::new(r#"we"ird"#), &Default::default(), None)
                .unwrap(),
            r#"SELECT * FROM "we""ird";"#
        );
    }

    #[test]
    fn insert_omit_null() {
        let query = generator()
            .insert_query(
                &TableRef::new("myTable"),
                &Row::from([("name", Value::from("foo")), ("n", Value::Null)]),
                None,
                &InsertOptions {
                    omit_null: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            query.query,
            r#"INSERT INTO "myTable" ("name") VALUES ($sequelize_1);"#
        );
        assert_eq!(query.bind.len(), 1);
        assert_eq!(query.bind.get("sequelize_1"), Some(&Value::from("foo")));
    }

    #[test]
    fn insert_binds_in_order() {
        let payload: Vec<u8> = vec![0, 1, b'\'', 255];
        let query = generator()
            .insert_query(
                &TableRef::new("files"),
                &Row::from([
                    ("name", Value::from("a.bin")),
                    ("data", Value::from(payload.clone())),
                    ("size", Value::from(4)),
                    ("note", Value::Null),
                ]),
                None,
                &Default::default(),
            )
            .unwrap();
        assert_eq!(
            query.query,
            r#"INSERT INTO "files" ("name", "data", "size", "note") VALUES ($sequelize_1, $sequelize_2, $sequelize_3, $sequelize_4);"#
        );
        let names: Vec<_> = query.bind.names().collect();
        assert_eq!(names, ["sequelize_1", "sequelize_2", "sequelize_3", "sequelize_4"]);
        let values: Vec<_> = query.bind.values().cloned().collect();
        assert_eq!(
            values,
            [
                Value::from("a.bin"),
                Value::Blob(payload.into_boxed_slice()),
                Value::Int(4),
                Value::Null
            ]
        );
    }

    #[test]
    fn insert_with_model() {
        let model = user_model();
        let table = TableRef::new("users");
        let row = Row::from([("id", Value::Null), ("firstName", Value::from("Ada"))]);
        let query = generator()
            .insert_query(
                &table,
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
            r#"INSERT INTO "users" ("id", "first_name") VALUES (DEFAULT, $sequelize_1) ON CONFLICT DO NOTHING RETURNING *;"#
        );
        assert_eq!(query.bind.len(), 1);

        let query = generator()
            .insert_query(
                &table,
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
            r#"INSERT INTO "users" ("id", "first_name") VALUES (DEFAULT, $sequelize_1) ON CONFLICT ("id") DO UPDATE SET "first_name" = EXCLUDED."first_name";"#
        );

        let result = generator().insert_query(
            &table,
            &row,
            None,
            &InsertOptions {
                update_on_duplicate: vec!["firstName".into()],
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn insert_empty_row() {
        let query = generator()
            .insert_query(&TableRef::new("users"), &Row::new(), None, &Default::default())
            .unwrap();
        assert_eq!(query.query, r#"INSERT INTO "users" DEFAULT VALUES;"#);
        assert!(query.bind.is_empty());
    }

    #[test]
    fn bulk_insert_fills_gaps() {
        let rows = [
            Row::from([("a", Value::from(1)), ("b", Value::from("x"))]),
            Row::from([("a", Value::from(2))]),
            Row::from([("b", Value::Null), ("c", Value::from(true))]),
        ];
        let query = generator()
            .bulk_insert_query(&TableRef::new("t"), &rows, &BulkInsertOptions::default(), None)
            .unwrap();
        assert_eq!(
            query,
            r#"INSERT INTO "t" ("a", "b", "c") VALUES (1, 'x', NULL), (2, NULL, NULL), (NULL, NULL, true);"#
        );
        assert!(
            generator()
                .bulk_insert_query(&TableRef::new("t"), &[], &Default::default(), None)
                .is_err()
        );
    }

    #[test]
    fn update_binds_set_then_where() {
        let query = generator()
            .update_query(
                &TableRef::new("users"),
                &Row::from([("name", Value::from("bar")), ("age", Value::Null)]),
                &Where::eq("id", 7),
                &UpdateOptions {
                    omit_null: true,
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(
            query.query,
            r#"UPDATE "users" SET "name" = $sequelize_1 WHERE "id" = $sequelize_2;"#
        );
        let values: Vec<_> = query.bind.values().cloned().collect();
        assert_eq!(values, [Value::from("bar"), Value::from(7)]);
    }

    #[test]
    fn update_limit_and_empty_where() {
        let table = TableRef::new("users");
        let values = Row::from([("name", Value::from("bar"))]);
        let query = generator()
            .update_query(
                &table,
                &values,
                &Where::eq("id", 7),
                &UpdateOptions {
                    limit: Some(1),
                    returning: Returning::Columns(vec!["id".into()]),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        assert_eq!(
            query.query,
            r#"UPDATE "users" SET "name" = $sequelize_1 WHERE ctid IN (SELECT ctid FROM "users" WHERE "id" = $sequelize_2 LIMIT 1) RETURNING "id";"#
        );
        let query = generator()
            .update_query(&table, &values, &Where::default(), &Default::default(), None)
            .unwrap();
        assert_eq!(query.query, r#"UPDATE "users" SET "name" = $sequelize_1;"#);
        assert!(
            generator()
                .update_query(&table, &Row::new(), &Where::default(), &Default::default(), None)
                .is_err()
        );
    }

    #[test]
    fn bind_styles() {
        let positional = GenericQueryGenerator::new(GeneratorOptions {
            bind_style: BindStyle::Positional,
            ..Default::default()
        });
        let query = positional
            .update_query(
                &TableRef::new("users"),
                &Row::from([("name", Value::from("bar"))]),
                &Where::eq("id", 7),
                &Default::default(),
                None,
            )
            .unwrap();
        assert_eq!(query.query, r#"UPDATE "users" SET "name" = $1 WHERE "id" = $2;"#);
        assert_eq!(query.bind.names().collect::<Vec<_>>(), ["1", "2"]);

        let inline = GenericQueryGenerator::new(GeneratorOptions {
            bind_style: BindStyle::Inline,
            ..Default::default()
        });
        let query = inline
            .insert_query(
                &TableRef::new("users"),
                &Row::from([("name", Value::from("O'Hara"))]),
                None,
                &Default::default(),
            )
            .unwrap();
        assert_eq!(query.query, r#"INSERT INTO "users" ("name") VALUES ('O''Hara');"#);
        assert!(query.bind.is_empty());
    }

    #[test]
    fn injection_is_escaped_or_bound() {
        let evil = "');DROP TABLE x;";
        let query = select(QueryOptions {
            where_clause: Some(Where::eq("name", evil)),
            ..Default::default()
        });
        assert_eq!(
            query,
            r#"SELECT * FROM "users" WHERE "users"."name" = ''');DROP TABLE x;';"#
        );
        let bound = generator()
            .insert_query(
                &TableRef::new("users"),
                &Row::from([("name", evil)]),
                None,
                &Default::default(),
            )
            .unwrap();
        assert!(!bound.query.contains("DROP"));
        assert_eq!(bound.bind.get("sequelize_1"), Some(&Value::from(evil)));
    }

    #[test]
    fn delete() {
        let query = generator()
            .delete_query(
                &TableRef::new("users"),
                &Where::eq("id", 1),
                &DeleteOptions::default(),
            )
            .unwrap();
        assert_eq!(query, r#"DELETE FROM "users" WHERE "id" = 1;"#);
    }

    #[test]
    fn foreign_keys() {
        let query = generator()
            .get_foreign_key_query(&TableRef::new("users"), "o'x")
            .unwrap();
        assert!(query.contains("tc.constraint_type = 'FOREIGN KEY' AND tc.table_name = 'users'"));
        assert!(query.ends_with("AND kcu.column_name = 'o''x';"));
        let query = generator()
            .get_foreign_keys_query(&TableRef::new("users").with_schema("app"))
            .unwrap();
        assert!(query.ends_with("tc.table_name = 'users' AND tc.table_schema = 'app';"));
    }

    #[test]
    fn triggers_unsupported() {
        let trigger = Trigger {
            name: "audit".into(),
            timing: TriggerTiming::After,
            events: vec![TriggerEvent::Insert],
            function: "log_change".into(),
            params: vec![],
            modifiers: vec![],
        };
        let error = generator()
            .create_trigger_query(&TableRef::new("users"), &trigger)
            .unwrap_err();
        assert!(format!("{error:#}").contains("does not support triggers"));
        assert!(generator().drop_trigger_query(&TableRef::new("users"), "audit").is_err());
    }

    #[test]
    fn literals() {
        let generator = generator();
        let write = |value: Value| {
            let mut out = String::new();
            generator.write_value(&mut WriteContext::default(), &mut out, &value);
            out
        };
        assert_eq!(write(Value::Float(f64::NAN)), "'NaN'");
        assert_eq!(write(Value::Float(f64::NEG_INFINITY)), "'-Infinity'");
        assert_eq!(write(Value::Float(1.5)), "1.5");
        assert_eq!(write(Value::Boolean(false)), "false");
        assert_eq!(write(Value::from(vec![0u8, 1, 255])), r"E'\\x0001ff'");
        assert_eq!(write(Value::Date(date!(2024 - 01 - 02))), "'2024-01-02'");
        assert_eq!(
            write(Value::Timestamp(datetime!(2024-01-02 03:04:05.678))),
            "'2024-01-02 03:04:05.678'"
        );
        assert_eq!(
            write(Value::TimestampWithTimezone(datetime!(2024-01-02 03:04:05.678 +02:00))),
            "'2024-01-02 01:04:05.678 +00:00'"
        );
        assert_eq!(
            write(Value::List(vec![Value::from(1), Value::Null])),
            "ARRAY[1, NULL]"
        );
    }
}
