use sieve_core::{
    BindStyle, ColumnDefinition, CreateTableOptions, Error, GeneratorOptions, IndexHint, ModelMeta, Op,
    QueryGenerator, QueryOptions, Result, Returning, TableRef, UniqueKey, Value, Where,
    WriteContext, separated_by,
};
use std::fmt::Write;

#[derive(Default, Debug, Clone)]
pub struct MySqlQueryGenerator {
    pub options: GeneratorOptions,
}

impl MySqlQueryGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl QueryGenerator for MySqlQueryGenerator {
    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn write_value_string(&self, _context: &mut WriteContext, out: &mut String, value: &str) {
        out.push('\'');
        for c in value.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\x08' => out.push_str("\\b"),
                '\t' => out.push_str("\\t"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\x1a' => out.push_str("\\Z"),
                '"' | '\'' | '\\' => {
                    out.push('\\');
                    out.push(c);
                }
                _ => out.push(c),
            }
        }
        out.push('\'');
    }

    fn write_value_blob(&self, _context: &mut WriteContext, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        out.push_str(&hex::encode_upper(value));
        out.push('\'');
    }

    fn write_value_infinity(&self, _context: &mut WriteContext, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("1.0e+10000");
    }

    fn write_value_nan(&self, context: &mut WriteContext, out: &mut String) {
        log::warn!("MySQL has no NaN, it will be stored as NULL");
        self.write_value_none(context, out);
    }

    fn timestamp_offset_suffix(&self) -> bool {
        false
    }

    fn write_value_list(&self, context: &mut WriteContext, out: &mut String, value: &[Value]) {
        separated_by(
            out,
            value,
            |out, v| self.write_value(context, out, v),
            ", ",
        );
    }

    fn write_bind_placeholder(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        style: BindStyle,
        index: usize,
    ) {
        match style {
            BindStyle::Named => {
                let _ = write!(out, "$sequelize_{index}");
            }
            _ => out.push('?'),
        }
    }

    fn operator(&self, op: Op) -> Result<&'static str> {
        match op {
            Op::Regexp => Ok("REGEXP"),
            Op::NotRegexp => Ok("NOT REGEXP"),
            _ if op.is_case_insensitive_like() || op.is_regexp() || op.is_array() => Err(
                Error::msg(format!("MySQL does not support the operator {op:?}")),
            ),
            _ => Ok(op.sql()),
        }
    }

    fn write_index_hints(&self, context: &mut WriteContext, out: &mut String, value: &[IndexHint]) {
        for hint in value.iter().filter(|v| !v.values.is_empty()) {
            let _ = write!(out, " {} INDEX (", hint.kind.sql());
            separated_by(
                out,
                &hint.values,
                |out, v| self.write_identifier_quoted(context, out, v),
                ", ",
            );
            out.push(')');
        }
    }

    fn write_limit_offset(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        options: &QueryOptions,
        _model: Option<&ModelMeta>,
    ) -> Result<()> {
        match (options.limit, options.offset.filter(|v| *v > 0)) {
            (Some(limit), Some(offset)) => {
                let _ = write!(out, " LIMIT {offset}, {limit}");
            }
            (Some(limit), None) => {
                let _ = write!(out, " LIMIT {limit}");
            }
            (None, Some(offset)) => {
                let _ = write!(out, " LIMIT {offset}, {}", u64::MAX);
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn write_limited_where(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        _table: &TableRef,
        value: &Where,
        limit: Option<u64>,
    ) -> Result<()> {
        self.write_where_clause(context, out, " WHERE ", Some(value))?;
        if let Some(limit) = limit {
            let _ = write!(out, " LIMIT {limit}");
        }
        Ok(())
    }

    fn inline_references(&self) -> bool {
        false
    }

    fn write_column_comment_inline(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        comment: &str,
    ) {
        out.push_str(" COMMENT ");
        self.write_value_string(context, out, comment);
    }

    fn write_create_table_unique(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        value: &UniqueKey,
    ) {
        out.push_str("UNIQUE ");
        self.write_identifier_quoted(context, out, &value.name_for(&table.name));
        out.push_str(" (");
        separated_by(
            out,
            &value.fields,
            |out, v| self.write_identifier_quoted(context, out, v),
            ", ",
        );
        out.push(')');
    }

    fn write_create_table_suffix(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        options: &CreateTableOptions,
    ) {
        out.push_str(" ENGINE=");
        out.push_str(options.engine.as_deref().unwrap_or("InnoDB"));
        if let Some(comment) = &options.comment {
            out.push_str(" COMMENT ");
            self.write_value_string(context, out, comment);
        }
        if let Some(charset) = &options.charset {
            out.push_str(" DEFAULT CHARSET=");
            out.push_str(charset);
        }
        if let Some(collate) = &options.collate {
            out.push_str(" COLLATE ");
            out.push_str(collate);
        }
    }

    fn write_create_table_comments(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _table: &TableRef,
        _definitions: &[(&str, ColumnDefinition)],
        _options: &CreateTableOptions,
    ) {
    }

    fn write_drop_table(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        _cascade: bool,
    ) -> Result<()> {
        out.push_str("DROP TABLE IF EXISTS ");
        self.write_table_ref(context, out, table);
        Ok(())
    }

    fn write_insert_into(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        ignore_duplicates: bool,
    ) -> Result<()> {
        out.push_str(if ignore_duplicates {
            "INSERT IGNORE INTO "
        } else {
            "INSERT INTO "
        });
        self.write_table_ref(context, out, table);
        Ok(())
    }

    fn write_insert_default_values(&self, _context: &mut WriteContext, out: &mut String) {
        out.push_str(" VALUES ()");
    }

    fn write_returning(&self, _context: &mut WriteContext, _out: &mut String, value: &Returning) {
        if !value.is_none() {
            log::debug!("MySQL does not support RETURNING, the clause is skipped");
        }
    }

    fn write_insert_conflict(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        _ignore_duplicates: bool,
        update: &[String],
        _keys: &[String],
        model: Option<&ModelMeta>,
    ) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        out.push_str(" ON DUPLICATE KEY UPDATE ");
        separated_by(
            out,
            update,
            |out, v| {
                let column = model.map_or(v.as_str(), |m| m.column(v));
                self.write_identifier_quoted(context, out, column);
                out.push_str(" = VALUES(");
                self.write_identifier_quoted(context, out, column);
                out.push(')');
            },
            ", ",
        );
        Ok(())
    }

    fn write_foreign_keys(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        column: Option<&str>,
    ) -> Result<()> {
        out.push_str(concat!(
            "SELECT CONSTRAINT_NAME AS constraint_name, CONSTRAINT_SCHEMA AS constraint_schema, ",
            "TABLE_NAME AS table_name, TABLE_SCHEMA AS table_schema, COLUMN_NAME AS column_name, ",
            "REFERENCED_TABLE_SCHEMA AS referenced_table_schema, ",
            "REFERENCED_TABLE_NAME AS referenced_table_name, ",
            "REFERENCED_COLUMN_NAME AS referenced_column_name ",
            "FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE WHERE ",
        ));
        let write_schema = |out: &mut String, context: &mut WriteContext, prefix: &str| {
            if !table.schema.is_empty() {
                let _ = write!(out, " AND {prefix}TABLE_SCHEMA = ");
                self.write_value_string(context, out, &table.schema);
            }
        };
        match column {
            Some(column) => {
                out.push_str("(REFERENCED_TABLE_NAME = ");
                self.write_value_string(context, out, &table.name);
                write_schema(out, context, "REFERENCED_");
                out.push_str(" AND REFERENCED_COLUMN_NAME = ");
                self.write_value_string(context, out, column);
                out.push_str(") OR (TABLE_NAME = ");
                self.write_value_string(context, out, &table.name);
                write_schema(out, context, "");
                out.push_str(" AND COLUMN_NAME = ");
                self.write_value_string(context, out, column);
                out.push_str(" AND REFERENCED_TABLE_NAME IS NOT NULL)");
            }
            None => {
                out.push_str("TABLE_NAME = ");
                self.write_value_string(context, out, &table.name);
                write_schema(out, context, "");
                out.push_str(" AND REFERENCED_TABLE_NAME IS NOT NULL");
            }
        }
        Ok(())
    }
}
