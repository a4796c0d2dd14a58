use sieve_core::{
    ColumnDefinition, CreateTableOptions, Error, GeneratorOptions, ModelMeta, Op, QueryGenerator,
    QueryOptions, Result, TableRef, Value, WriteContext, find_keyword, separated_by,
};
use std::fmt::Write;

#[derive(Default, Debug, Clone)]
pub struct SqliteQueryGenerator {
    pub options: GeneratorOptions,
}

impl SqliteQueryGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl QueryGenerator for SqliteQueryGenerator {
    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn write_value_bool(&self, _context: &mut WriteContext, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
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
        log::warn!("Sqlite has no NaN, it will be stored as NULL");
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

    fn operator(&self, op: Op) -> Result<&'static str> {
        if op.is_case_insensitive_like() || op.is_regexp() || op.is_array() {
            return Err(Error::msg(format!(
                "Sqlite does not support the operator {op:?}"
            )));
        }
        Ok(op.sql())
    }

    fn write_limit_offset(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        options: &QueryOptions,
        _model: Option<&ModelMeta>,
    ) -> Result<()> {
        let offset = options.offset.filter(|v| *v > 0);
        match options.limit {
            Some(limit) => {
                let _ = write!(out, " LIMIT {limit}");
            }
            None if offset.is_some() => out.push_str(" LIMIT -1"),
            None => {}
        }
        if let Some(offset) = offset {
            let _ = write!(out, " OFFSET {offset}");
        }
        Ok(())
    }

    fn row_identifier(&self) -> &'static str {
        "rowid"
    }

    fn inline_primary_key(&self, columns: usize) -> bool {
        columns == 1
    }

    fn write_create_table_column(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        name: &str,
        definition: &ColumnDefinition,
        inline_primary_key: bool,
    ) -> Result<()> {
        self.write_identifier_quoted(context, out, name);
        if let Some(values) = &definition.enum_values {
            out.push(' ');
            self.write_column_enum(context, out, table, name, values);
        }
        let mut ty = definition.ty.clone();
        if inline_primary_key && definition.primary_key {
            // AUTOINCREMENT is only accepted right after PRIMARY KEY
            match find_keyword(&ty, "AUTOINCREMENT") {
                Some(i) => ty.insert_str(i, "PRIMARY KEY "),
                None if ty.is_empty() => ty.push_str("PRIMARY KEY"),
                None => ty.push_str(" PRIMARY KEY"),
            }
        }
        if !ty.is_empty() {
            out.push(' ');
            out.push_str(&ty);
        }
        if let Some(references) = &definition.references {
            out.push(' ');
            out.push_str(references);
        }
        Ok(())
    }

    fn write_column_enum(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        _table: &TableRef,
        _column: &str,
        _values: &[String],
    ) {
        out.push_str("TEXT");
    }

    fn write_create_table_comments(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        table: &TableRef,
        definitions: &[(&str, ColumnDefinition)],
        options: &CreateTableOptions,
    ) {
        let comments = definitions
            .iter()
            .filter(|(_, v)| v.comment.is_some())
            .count()
            + options.comment.is_some() as usize;
        if comments > 0 {
            log::debug!(
                "Sqlite does not support comments, dropping {comments} of them from `{}`",
                table.full_name()
            );
        }
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

    fn auto_increment_placeholder(&self) -> Option<&'static str> {
        Some("NULL")
    }

    fn write_insert_into(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        ignore_duplicates: bool,
    ) -> Result<()> {
        out.push_str(if ignore_duplicates {
            "INSERT OR IGNORE INTO "
        } else {
            "INSERT INTO "
        });
        self.write_table_ref(context, out, table);
        Ok(())
    }

    fn write_insert_conflict(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        _ignore_duplicates: bool,
        update: &[String],
        keys: &[String],
        model: Option<&ModelMeta>,
    ) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        self.write_insert_update_fragment(context, out, update, keys, model)
    }

    fn write_foreign_keys(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        column: Option<&str>,
    ) -> Result<()> {
        match column {
            Some(column) => {
                out.push_str("SELECT * FROM pragma_foreign_key_list(");
                self.write_value_string(context, out, &table.name);
                out.push_str(") WHERE ");
                self.write_identifier_quoted(context, out, "from");
                out.push_str(" = ");
                self.write_value_string(context, out, column);
            }
            None => {
                out.push_str("PRAGMA foreign_key_list(");
                self.write_table_ref(context, out, table);
                out.push(')');
            }
        }
        Ok(())
    }
}
