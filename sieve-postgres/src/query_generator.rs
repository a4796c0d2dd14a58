use sieve_core::{
    ColumnDefinition, Error, FunctionParam, GeneratorOptions, QueryGenerator, Result, TableRef,
    Trigger, TriggerEvent, TriggerTiming, WriteContext, separated_by, try_separated_by,
};

#[derive(Default, Debug, Clone)]
pub struct PostgresQueryGenerator {
    pub options: GeneratorOptions,
}

impl PostgresQueryGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Named type backing the enum `column` of `table`.
    pub fn enum_type(table: &TableRef, column: &str) -> TableRef {
        TableRef::new(format!("enum_{}_{}", table.name, column)).with_schema(table.schema.clone())
    }

    fn write_function_param(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        param: &FunctionParam,
    ) -> Result<()> {
        let Some(ty) = param.ty.as_deref().filter(|v| !v.is_empty()) else {
            return Err(Error::msg(format!(
                "Function parameter {} is missing its type",
                param.name.as_deref().unwrap_or("<unnamed>")
            )));
        };
        if let Some(direction) = &param.direction {
            out.push_str(direction);
            out.push(' ');
        }
        if let Some(name) = &param.name {
            self.write_identifier_quoted(context, out, name);
            out.push(' ');
        }
        out.push_str(ty);
        Ok(())
    }
}

impl QueryGenerator for PostgresQueryGenerator {
    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn name(&self) -> &'static str {
        "postgres"
    }

    fn write_create_table_prelude(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        definitions: &[(&str, ColumnDefinition)],
    ) {
        for (name, definition) in definitions {
            let Some(values) = &definition.enum_values else {
                continue;
            };
            let enum_type = Self::enum_type(table, name);
            log::debug!(
                "Column `{}`.`{name}` gets the enum type `{}`",
                table.full_name(),
                enum_type.full_name()
            );
            out.push_str("CREATE TYPE ");
            self.write_table_ref(context, out, &enum_type);
            out.push_str(" AS ENUM(");
            separated_by(
                out,
                values,
                |out, v| self.write_value_string(context, out, v),
                ", ",
            );
            out.push_str("); ");
        }
    }

    fn write_column_enum(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        column: &str,
        _values: &[String],
    ) {
        self.write_table_ref(context, out, &Self::enum_type(table, column));
    }

    fn write_create_trigger(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        trigger: &Trigger,
    ) -> Result<()> {
        if trigger.events.is_empty() {
            return Err(Error::msg("A trigger requires at least one event"));
        }
        out.push_str("CREATE ");
        if trigger.timing == TriggerTiming::AfterConstraint {
            out.push_str("CONSTRAINT ");
        }
        out.push_str("TRIGGER ");
        self.write_identifier_quoted(context, out, &trigger.name);
        out.push_str(match trigger.timing {
            TriggerTiming::Before => " BEFORE ",
            TriggerTiming::After | TriggerTiming::AfterConstraint => " AFTER ",
            TriggerTiming::InsteadOf => " INSTEAD OF ",
        });
        separated_by(
            out,
            &trigger.events,
            |out, v| match v {
                TriggerEvent::Insert => out.push_str("INSERT"),
                TriggerEvent::Update(columns) => {
                    out.push_str("UPDATE");
                    if !columns.is_empty() {
                        out.push_str(" OF ");
                        out.push_str(&columns.join(", "));
                    }
                }
                TriggerEvent::Delete => out.push_str("DELETE"),
                TriggerEvent::Truncate => out.push_str("TRUNCATE"),
            },
            " OR ",
        );
        out.push_str(" ON ");
        self.write_table_ref(context, out, table);
        for modifier in trigger.modifiers.iter().filter(|v| !v.is_empty()) {
            out.push(' ');
            out.push_str(modifier);
        }
        out.push_str(" EXECUTE PROCEDURE ");
        out.push_str(&trigger.function);
        out.push('(');
        try_separated_by(
            out,
            &trigger.params,
            |out, v| self.write_function_param(context, out, v),
            ", ",
        )?;
        out.push_str(");");
        Ok(())
    }

    fn write_drop_trigger(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        name: &str,
    ) -> Result<()> {
        out.push_str("DROP TRIGGER ");
        self.write_identifier_quoted(context, out, name);
        out.push_str(" ON ");
        self.write_table_ref(context, out, table);
        out.push_str(" RESTRICT;");
        Ok(())
    }

    fn write_rename_trigger(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        old_name: &str,
        new_name: &str,
    ) -> Result<()> {
        out.push_str("ALTER TRIGGER ");
        self.write_identifier_quoted(context, out, old_name);
        out.push_str(" ON ");
        self.write_table_ref(context, out, table);
        out.push_str(" RENAME TO ");
        self.write_identifier_quoted(context, out, new_name);
        out.push(';');
        Ok(())
    }
}
