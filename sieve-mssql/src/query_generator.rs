use sieve_core::{
    BindStyle, ColumnDefinition, CreateTableOptions, Error, GeneratorOptions, ModelMeta, Op,
    QueryGenerator, QueryOptions, Result, Returning, TableRef, UniqueKey, Value, Where,
    WriteContext, separated_by, write_escaped,
};
use std::fmt::Write;

#[derive(Default, Debug, Clone)]
pub struct MssqlQueryGenerator {
    pub options: GeneratorOptions,
}

impl MssqlQueryGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// `N'[schema].[table]'`, the form `OBJECT_ID` expects.
    fn write_object_name(&self, context: &mut WriteContext, out: &mut String, table: &TableRef) {
        let mut name = String::with_capacity(table.name.len() + 4);
        self.write_table_ref(context, &mut name, table);
        self.write_value_string(context, out, &name);
    }

    fn write_extended_property(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        column: Option<&str>,
        comment: &str,
    ) {
        out.push_str(" EXEC sp_addextendedproperty @name = N'MS_Description', @value = ");
        self.write_value_string(context, out, comment);
        out.push_str(", @level0type = N'Schema', @level0name = ");
        self.write_value_string(
            context,
            out,
            if table.schema.is_empty() {
                "dbo"
            } else {
                &table.schema
            },
        );
        out.push_str(", @level1type = N'Table', @level1name = ");
        self.write_value_string(context, out, &table.name);
        if let Some(column) = column {
            out.push_str(", @level2type = N'Column', @level2name = ");
            self.write_value_string(context, out, column);
        }
        out.push(';');
    }
}

impl QueryGenerator for MssqlQueryGenerator {
    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn name(&self) -> &'static str {
        "mssql"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn write_value_bool(&self, _context: &mut WriteContext, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    fn write_value_string(&self, _context: &mut WriteContext, out: &mut String, value: &str) {
        out.push_str("N'");
        write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, _context: &mut WriteContext, out: &mut String, value: &[u8]) {
        out.push_str("0x");
        out.push_str(&hex::encode_upper(value));
    }

    fn write_value_infinity(&self, context: &mut WriteContext, out: &mut String, negative: bool) {
        log::warn!(
            "SQL Server has no {}infinity, it will be stored as NULL",
            if negative { "negative " } else { "" }
        );
        self.write_value_none(context, out);
    }

    fn write_value_nan(&self, context: &mut WriteContext, out: &mut String) {
        log::warn!("SQL Server has no NaN, it will be stored as NULL");
        self.write_value_none(context, out);
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
        let _ = match style {
            BindStyle::Named => write!(out, "$sequelize_{index}"),
            _ => write!(out, "@p{index}"),
        };
    }

    fn operator(&self, op: Op) -> Result<&'static str> {
        if op.is_case_insensitive_like() || op.is_regexp() || op.is_array() {
            return Err(Error::msg(format!(
                "SQL Server does not support the operator {op:?}"
            )));
        }
        Ok(op.sql())
    }

    /// `FETCH NEXT 0 ROWS` is rejected, a zero limit becomes `TOP(0)` instead.
    fn write_select_modifiers(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        options: &QueryOptions,
    ) {
        if options.limit == Some(0) {
            out.push_str("TOP(0) ");
        }
    }

    fn write_limit_offset(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        options: &QueryOptions,
        model: Option<&ModelMeta>,
    ) -> Result<()> {
        let offset = options.offset.filter(|v| *v > 0);
        // TOP cannot be combined with OFFSET, no rows are returned anyway
        if options.limit == Some(0) || (options.limit.is_none() && offset.is_none()) {
            return Ok(());
        }
        // OFFSET is only valid after ORDER BY
        if options.order.as_ref().is_none_or(|v| v.is_empty()) {
            out.push_str(" ORDER BY ");
            let primary_keys: Vec<&str> = model
                .map(|m| m.primary_keys().collect())
                .unwrap_or_default();
            if primary_keys.is_empty() {
                out.push_str("(SELECT NULL)");
            } else {
                separated_by(
                    out,
                    primary_keys,
                    |out, v| self.write_identifier_quoted(context, out, v),
                    ", ",
                );
            }
        }
        let _ = write!(out, " OFFSET {} ROWS", offset.unwrap_or(0));
        if let Some(limit) = options.limit {
            let _ = write!(out, " FETCH NEXT {limit} ROWS ONLY");
        }
        Ok(())
    }

    fn write_limited_where(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        _table: &TableRef,
        value: &Where,
        _limit: Option<u64>,
    ) -> Result<()> {
        self.write_where_clause(context, out, " WHERE ", Some(value))
    }

    fn write_create_table_head(&self, context: &mut WriteContext, out: &mut String, table: &TableRef) {
        out.push_str("IF OBJECT_ID(");
        self.write_object_name(context, out, table);
        out.push_str(", 'U') IS NULL CREATE TABLE ");
        self.write_table_ref(context, out, table);
    }

    fn inline_references(&self) -> bool {
        false
    }

    fn write_column_enum(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        _table: &TableRef,
        column: &str,
        values: &[String],
    ) {
        out.push_str("NVARCHAR(255) CHECK (");
        self.write_identifier_quoted(context, out, column);
        out.push_str(" IN (");
        separated_by(
            out,
            values,
            |out, v| self.write_value_string(context, out, v),
            ", ",
        );
        out.push_str("))");
    }

    fn write_create_table_unique(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        value: &UniqueKey,
    ) {
        out.push_str("CONSTRAINT ");
        self.write_identifier_quoted(context, out, &value.name_for(&table.name));
        out.push_str(" UNIQUE (");
        separated_by(
            out,
            &value.fields,
            |out, v| self.write_identifier_quoted(context, out, v),
            ", ",
        );
        out.push(')');
    }

    fn write_create_table_comments(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        definitions: &[(&str, ColumnDefinition)],
        options: &CreateTableOptions,
    ) {
        for (name, definition) in definitions {
            if let Some(comment) = &definition.comment {
                self.write_extended_property(context, out, table, Some(name), comment);
            }
        }
        if let Some(comment) = &options.comment {
            self.write_extended_property(context, out, table, None, comment);
        }
    }

    fn write_drop_table(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        _cascade: bool,
    ) -> Result<()> {
        out.push_str("IF OBJECT_ID(");
        self.write_object_name(context, out, table);
        out.push_str(", 'U') IS NOT NULL DROP TABLE ");
        self.write_table_ref(context, out, table);
        Ok(())
    }

    fn auto_increment_placeholder(&self) -> Option<&'static str> {
        None
    }

    fn write_identity_insert(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        enable: bool,
    ) {
        out.push_str("SET IDENTITY_INSERT ");
        self.write_table_ref(context, out, table);
        out.push_str(if enable { " ON; " } else { " OFF;" });
    }

    fn write_output(&self, context: &mut WriteContext, out: &mut String, value: &Returning) {
        match value {
            Returning::None => {}
            Returning::Columns(columns) if !columns.is_empty() => {
                out.push_str(" OUTPUT ");
                separated_by(
                    out,
                    columns,
                    |out, v| {
                        out.push_str("INSERTED.");
                        self.write_identifier_quoted(context, out, v);
                    },
                    ", ",
                );
            }
            _ => out.push_str(" OUTPUT INSERTED.*"),
        }
    }

    fn write_returning(&self, _context: &mut WriteContext, _out: &mut String, _value: &Returning) {}

    fn write_insert_conflict(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        ignore_duplicates: bool,
        update: &[String],
        _keys: &[String],
        _model: Option<&ModelMeta>,
    ) -> Result<()> {
        if ignore_duplicates {
            return Err(Error::msg("SQL Server does not support ignoring duplicates"));
        }
        if !update.is_empty() {
            return Err(Error::msg("SQL Server does not support updating on duplicate"));
        }
        Ok(())
    }

    fn update_skips_auto_increment(&self) -> bool {
        true
    }

    fn write_update_table(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        limit: Option<u64>,
    ) -> Result<()> {
        out.push_str("UPDATE ");
        if let Some(limit) = limit {
            let _ = write!(out, "TOP({limit}) ");
        }
        self.write_table_ref(context, out, table);
        Ok(())
    }

    fn write_delete_from(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        limit: Option<u64>,
    ) -> Result<()> {
        out.push_str("DELETE ");
        if let Some(limit) = limit {
            let _ = write!(out, "TOP({limit}) ");
        }
        out.push_str("FROM ");
        self.write_table_ref(context, out, table);
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
            "SELECT OBJ.NAME AS constraint_name, SCHEMA_NAME(TB.SCHEMA_ID) AS table_schema, ",
            "TB.NAME AS table_name, COL.NAME AS column_name, ",
            "SCHEMA_NAME(RTB.SCHEMA_ID) AS referenced_table_schema, ",
            "RTB.NAME AS referenced_table_name, RCOL.NAME AS referenced_column_name ",
            "FROM sys.foreign_key_columns FKC ",
            "INNER JOIN sys.foreign_keys OBJ ON OBJ.OBJECT_ID = FKC.CONSTRAINT_OBJECT_ID ",
            "INNER JOIN sys.tables TB ON TB.OBJECT_ID = FKC.PARENT_OBJECT_ID ",
            "INNER JOIN sys.columns COL ON COL.COLUMN_ID = FKC.PARENT_COLUMN_ID AND COL.OBJECT_ID = TB.OBJECT_ID ",
            "INNER JOIN sys.tables RTB ON RTB.OBJECT_ID = FKC.REFERENCED_OBJECT_ID ",
            "INNER JOIN sys.columns RCOL ON RCOL.COLUMN_ID = FKC.REFERENCED_COLUMN_ID AND RCOL.OBJECT_ID = RTB.OBJECT_ID ",
            "WHERE TB.NAME = ",
        ));
        self.write_value_string(context, out, &table.name);
        if !table.schema.is_empty() {
            out.push_str(" AND SCHEMA_NAME(TB.SCHEMA_ID) = ");
            self.write_value_string(context, out, &table.schema);
        }
        if let Some(column) = column {
            out.push_str(" AND COL.NAME = ");
            self.write_value_string(context, out, column);
        }
        Ok(())
    }
}
