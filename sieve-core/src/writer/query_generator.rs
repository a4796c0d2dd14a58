use crate::{
    Attribute, BindStyle, BoundQuery, BulkInsertOptions, ColumnDefinition, ColumnSpec, Condition,
    Context, CreateTableOptions, DeleteOptions, Error, Group, GroupItem, IndexHint,
    InsertOptions, ModelMeta, Op, Operand, Order, OrderItem, QueryOptions, Result, Returning, Row,
    SqlExpr, TableRef, Trigger, UniqueKey, UpdateOptions, Value, Where, WriteContext,
    is_order_direction, possibly_parenthesized, separated_by, truncate_long, try_separated_by,
    write_escaped,
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

macro_rules! write_float {
    ($this:ident, $context:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($context, $out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($context, $out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Settings read by every generator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub quote_identifiers: bool,
    pub bind_style: BindStyle,
    /// Offset aware timestamps are shifted to this offset before rendering.
    pub timezone: UtcOffset,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            quote_identifiers: true,
            bind_style: BindStyle::Named,
            timezone: UtcOffset::UTC,
        }
    }
}

/// Left-hand side of a condition, written anew by every comparison so each copy binds its own values.
#[derive(Debug, Clone, Copy)]
pub enum ConditionTarget<'a> {
    Column(&'a str),
    Expression(&'a SqlExpr),
}

/// Dialect printer turning operation descriptions into SQL text.
///
/// Every method has a default following the PostgreSQL conventions, dialects override the
/// ones they render differently. The statement entry points (`*_query`) build into a private
/// buffer and hand it out only when the whole statement was written.
pub trait QueryGenerator: Send + Sync {
    fn options(&self) -> &GeneratorOptions;

    /// Dialect name, used in messages.
    fn name(&self) -> &'static str;

    /// Opening and closing identifier quote.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Quote a single identifier, doubling the closing quote when it appears inside.
    fn write_identifier_quoted(&self, _context: &mut WriteContext, out: &mut String, value: &str) {
        if !self.options().quote_identifiers || value == "*" {
            out.push_str(value);
            return;
        }
        let (open, close) = self.identifier_quotes();
        out.push(open);
        write_escaped(out, value, close, &String::from_iter([close, close]));
        out.push(close);
    }

    /// Dot separated identifier, every part quoted on its own.
    fn write_identifier(&self, context: &mut WriteContext, out: &mut String, value: &str) {
        separated_by(
            out,
            value.split('.'),
            |out, v| self.write_identifier_quoted(context, out, v),
            ".",
        );
    }

    /// Render a table reference, `schema.table` when a schema is present.
    fn write_table_ref(&self, context: &mut WriteContext, out: &mut String, value: &TableRef) {
        if !value.schema.is_empty() {
            self.write_identifier_quoted(context, out, &value.schema);
            out.push('.');
        }
        self.write_identifier_quoted(context, out, &value.name);
    }

    /// Column reference, prefixed with the context qualifier unless already qualified.
    fn write_column(&self, context: &mut WriteContext, out: &mut String, column: &str) {
        if !column.contains('.') {
            if let Some(qualifier) = context.qualifier.clone() {
                self.write_identifier(context, out, &qualifier);
                out.push('.');
            }
        }
        self.write_identifier(context, out, column);
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, context: &mut WriteContext, out: &mut String, value: &Value) {
        match value {
            Value::Null => self.write_value_none(context, out),
            Value::Boolean(v) => self.write_value_bool(context, out, *v),
            Value::Int(v) => write_integer!(out, *v),
            Value::UInt(v) => write_integer!(out, *v),
            Value::Float(v) => write_float!(self, context, out, *v),
            Value::Decimal(v) => drop(write!(out, "{v}")),
            Value::Varchar(v) => self.write_value_string(context, out, v),
            Value::Blob(v) => self.write_value_blob(context, out, v),
            Value::Date(v) => self.write_value_date(context, out, v, false),
            Value::Time(v) => self.write_value_time(context, out, v, false),
            Value::Timestamp(v) => self.write_value_timestamp(context, out, v),
            Value::TimestampWithTimezone(v) => self.write_value_timestamptz(context, out, v),
            Value::Uuid(v) => self.write_value_string(context, out, &v.to_string()),
            Value::List(v) => self.write_value_list(context, out, v),
        }
    }

    fn write_value_none(&self, _context: &mut WriteContext, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, _context: &mut WriteContext, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_infinity(&self, context: &mut WriteContext, out: &mut String, negative: bool) {
        self.write_value_string(context, out, ["Infinity", "-Infinity"][negative as usize]);
    }

    fn write_value_nan(&self, context: &mut WriteContext, out: &mut String) {
        self.write_value_string(context, out, "NaN");
    }

    /// Render a string literal in single quotes, doubling the inner ones.
    fn write_value_string(&self, _context: &mut WriteContext, out: &mut String, value: &str) {
        out.push('\'');
        write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, _context: &mut WriteContext, out: &mut String, value: &[u8]) {
        out.push_str("E'\\\\x");
        out.push_str(&hex::encode(value));
        out.push('\'');
    }

    /// Render a DATE literal (optionally as part of a TIMESTAMP).
    fn write_value_date(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        value: &Date,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:04}-{:02}-{:02}{b}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// Render a TIME literal with millisecond precision (optionally as part of a TIMESTAMP).
    fn write_value_time(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        value: &Time,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:02}:{:02}:{:02}.{:03}{b}",
            value.hour(),
            value.minute(),
            value.second(),
            value.millisecond()
        );
    }

    /// Render a timestamp without zone as it is.
    fn write_value_timestamp(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        out.push('\'');
        self.write_value_date(context, out, &value.date(), true);
        out.push(' ');
        self.write_value_time(context, out, &value.time(), true);
        out.push('\'');
    }

    /// Whether offset aware timestamps carry their ` +HH:MM` suffix.
    fn timestamp_offset_suffix(&self) -> bool {
        true
    }

    /// Render an offset aware timestamp shifted to the configured timezone.
    fn write_value_timestamptz(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        value: &OffsetDateTime,
    ) {
        let value = value.to_offset(self.options().timezone);
        out.push('\'');
        self.write_value_date(context, out, &value.date(), true);
        out.push(' ');
        self.write_value_time(context, out, &value.time(), true);
        if self.timestamp_offset_suffix() {
            let offset = value.offset();
            let (hours, minutes, _) = offset.as_hms();
            let _ = write!(
                out,
                " {}{:02}:{:02}",
                if offset.is_negative() { '-' } else { '+' },
                hours.unsigned_abs(),
                minutes.unsigned_abs()
            );
        }
        out.push('\'');
    }

    fn write_value_list(&self, context: &mut WriteContext, out: &mut String, value: &[Value]) {
        out.push_str("ARRAY[");
        separated_by(
            out,
            value,
            |out, v| self.write_value(context, out, v),
            ", ",
        );
        out.push(']');
    }

    /// Placeholder of the `index`-th bound value.
    fn write_bind_placeholder(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        style: BindStyle,
        index: usize,
    ) {
        match style {
            BindStyle::Named => out.push_str("$sequelize_"),
            _ => out.push('$'),
        }
        write_integer!(out, index);
    }

    /// Bind `value` when the context collects parameters, escape it in place otherwise.
    fn write_bind_or_value(&self, context: &mut WriteContext, out: &mut String, value: &Value) {
        match context.bind.as_mut() {
            Some(bind) => {
                let style = bind.style();
                let index = bind.push(value.clone());
                self.write_bind_placeholder(context, out, style, index);
            }
            None => self.write_value(context, out, value),
        }
    }

    fn write_operand(&self, context: &mut WriteContext, out: &mut String, value: &Operand) {
        match value {
            Operand::Value(v) => self.write_bind_or_value(context, out, v),
            Operand::Expression(v) => self.write_sql_expr(context, out, v),
        }
    }

    fn write_sql_expr(&self, context: &mut WriteContext, out: &mut String, value: &SqlExpr) {
        match value {
            SqlExpr::Literal(v) => out.push_str(v),
            SqlExpr::Column(v) => self.write_column(context, out, v),
            SqlExpr::Function { name, args } => {
                out.push_str(name);
                out.push('(');
                separated_by(
                    out,
                    args,
                    |out, v| self.write_operand(context, out, v),
                    ", ",
                );
                out.push(')');
            }
            SqlExpr::Cast(operand, ty) => {
                out.push_str("CAST(");
                self.write_operand(context, out, operand);
                out.push_str(" AS ");
                out.push_str(ty);
                out.push(')');
            }
        }
    }

    /// SQL spelling of `op`, errors when the dialect lacks it.
    fn operator(&self, op: Op) -> Result<&'static str> {
        Ok(op.sql())
    }

    /// Render a predicate tree, nothing when the tree is empty.
    fn write_where(&self, context: &mut WriteContext, out: &mut String, value: &Where) -> Result<()> {
        match value {
            Where::And(items) | Where::Or(items) => {
                let separator = if matches!(value, Where::And(..)) {
                    " AND "
                } else {
                    " OR "
                };
                let rendered = items.iter().filter(|v| !v.is_empty()).count();
                try_separated_by(
                    out,
                    items,
                    |out, v| {
                        let nested = match v {
                            Where::And(inner) | Where::Or(inner) => {
                                inner.iter().filter(|v| !v.is_empty()).count() > 1
                            }
                            _ => false,
                        };
                        let mut result = Ok(());
                        possibly_parenthesized!(
                            out,
                            rendered > 1 && nested,
                            result = self.write_where(context, out, v)
                        );
                        result
                    },
                    separator,
                )
            }
            Where::Not(inner) => {
                if inner.is_empty() {
                    return Ok(());
                }
                out.push_str("NOT (");
                self.write_where(context, out, inner)?;
                out.push(')');
                Ok(())
            }
            Where::Attribute { column, condition } => {
                self.write_condition(context, out, ConditionTarget::Column(column), condition)
            }
            Where::Expression { lhs, condition } => {
                self.write_condition(context, out, ConditionTarget::Expression(lhs), condition)
            }
            Where::Raw(SqlExpr::Literal(v)) if v.trim().is_empty() => Ok(()),
            Where::Raw(v) => {
                self.write_sql_expr(context, out, v);
                Ok(())
            }
        }
    }

    fn write_condition_target(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        target: ConditionTarget,
    ) {
        match target {
            ConditionTarget::Column(column) => self.write_column(context, out, column),
            ConditionTarget::Expression(expr) => self.write_sql_expr(context, out, expr),
        }
    }

    /// Render `condition` applied to `lhs`.
    fn write_condition(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        lhs: ConditionTarget,
        condition: &Condition,
    ) -> Result<()> {
        match condition {
            Condition::Equals(operand) => self.write_comparison(context, out, lhs, Op::Eq, operand),
            Condition::Operators(ops) => {
                let rendered = ops
                    .iter()
                    .filter(|(op, v)| {
                        !(*op == Op::NotIn
                            && matches!(v, Operand::Value(Value::List(v)) if v.is_empty()))
                    })
                    .count();
                let mut result = Ok(());
                possibly_parenthesized!(
                    out,
                    rendered > 1,
                    result = try_separated_by(
                        out,
                        ops,
                        |out, (op, v)| self.write_comparison(context, out, lhs, *op, v),
                        " AND ",
                    )
                );
                result
            }
        }
    }

    /// Render a single `lhs <op> operand` comparison.
    fn write_comparison(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        lhs: ConditionTarget,
        op: Op,
        operand: &Operand,
    ) -> Result<()> {
        let value = operand.as_value();
        match (op, value) {
            (Op::Eq | Op::Is, Some(Value::Null)) => {
                self.write_condition_target(context, out, lhs);
                out.push_str(" IS NULL");
                return Ok(());
            }
            (Op::Ne | Op::IsNot, Some(Value::Null)) => {
                self.write_condition_target(context, out, lhs);
                out.push_str(" IS NOT NULL");
                return Ok(());
            }
            (Op::Eq, Some(Value::List(..))) => {
                return self.write_comparison(context, out, lhs, Op::In, operand);
            }
            (Op::Ne, Some(Value::List(..))) => {
                return self.write_comparison(context, out, lhs, Op::NotIn, operand);
            }
            _ => {}
        }
        let sql = self.operator(op)?;
        match op {
            Op::In | Op::NotIn => {
                let items = match value {
                    Some(Value::List(v)) => v.as_slice(),
                    Some(v) => std::slice::from_ref(v),
                    None => {
                        self.write_condition_target(context, out, lhs);
                        let _ = write!(out, " {sql} (");
                        self.write_operand(context, out, operand);
                        out.push(')');
                        return Ok(());
                    }
                };
                if items.is_empty() {
                    if op == Op::In {
                        self.write_condition_target(context, out, lhs);
                        out.push_str(" IN (NULL)");
                    }
                    return Ok(());
                }
                self.write_condition_target(context, out, lhs);
                let _ = write!(out, " {sql} (");
                separated_by(
                    out,
                    items,
                    |out, v| self.write_bind_or_value(context, out, v),
                    ", ",
                );
                out.push(')');
            }
            Op::Between | Op::NotBetween => {
                let Some([low, high]) = value.and_then(Value::as_list) else {
                    return Err(Error::msg(format!("{sql} expects a list of exactly two values")));
                };
                self.write_condition_target(context, out, lhs);
                let _ = write!(out, " {sql} ");
                self.write_bind_or_value(context, out, low);
                out.push_str(" AND ");
                self.write_bind_or_value(context, out, high);
            }
            Op::StartsWith | Op::EndsWith | Op::Substring => {
                let Some(value) = value else {
                    return Err(Error::msg(format!("{op:?} expects a value, not an expression")));
                };
                let text = match value {
                    Value::Varchar(v) => v.clone(),
                    v => v.to_string(),
                };
                let pattern = match op {
                    Op::StartsWith => format!("{text}%"),
                    Op::EndsWith => format!("%{text}"),
                    _ => format!("%{text}%"),
                };
                self.write_condition_target(context, out, lhs);
                let _ = write!(out, " {sql} ");
                self.write_bind_or_value(context, out, &Value::Varchar(pattern));
            }
            Op::Is | Op::IsNot => {
                let Some(value @ Value::Boolean(..)) = value else {
                    return Err(Error::msg(format!(
                        "{sql} only accepts null or a boolean, found {operand:?}"
                    )));
                };
                self.write_condition_target(context, out, lhs);
                let _ = write!(out, " {sql} ");
                self.write_value(context, out, value);
            }
            _ => {
                self.write_condition_target(context, out, lhs);
                let _ = write!(out, " {sql} ");
                self.write_operand(context, out, operand);
            }
        }
        Ok(())
    }

    /// Writes `keyword` followed by the predicate, nothing when the predicate renders empty.
    fn write_where_clause(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        keyword: &str,
        value: Option<&Where>,
    ) -> Result<()> {
        let Some(value) = value else {
            return Ok(());
        };
        let position = out.len();
        out.push_str(keyword);
        let len = out.len();
        self.write_where(context, out, value)?;
        if out.len() == len {
            out.truncate(position);
        }
        Ok(())
    }

    /// Projection list, `*` when empty.
    fn write_attributes(&self, context: &mut WriteContext, out: &mut String, value: &[Attribute]) {
        if value.is_empty() {
            out.push('*');
            return;
        }
        separated_by(
            out,
            value,
            |out, v| match v {
                Attribute::Column(column) => self.write_identifier(context, out, column),
                Attribute::Aliased(column, alias) => {
                    self.write_identifier(context, out, column);
                    out.push_str(" AS ");
                    self.write_identifier_quoted(context, out, alias);
                }
                Attribute::Expression(expr, alias) => {
                    self.write_sql_expr(context, out, expr);
                    out.push_str(" AS ");
                    self.write_identifier_quoted(context, out, alias);
                }
            },
            ", ",
        );
    }

    fn write_order(&self, context: &mut WriteContext, out: &mut String, value: &Order) -> Result<()> {
        match value {
            Order::Identifier(v) => self.write_identifier_quoted(context, out, v),
            Order::List(items) => try_separated_by(
                out,
                items,
                |out, v| self.write_order_item(context, out, v),
                ", ",
            )?,
            Order::Literal(v) => self.write_sql_expr(context, out, v),
        }
        Ok(())
    }

    fn write_order_item(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        value: &OrderItem,
    ) -> Result<()> {
        match value {
            OrderItem::Column(v) => self.write_identifier(context, out, v),
            OrderItem::Path(path) => {
                let (segments, direction) = match path.split_last() {
                    Some((last, rest)) if !rest.is_empty() && is_order_direction(last) => {
                        (rest, Some(last))
                    }
                    _ => (path.as_slice(), None),
                };
                separated_by(
                    out,
                    segments,
                    |out, v| self.write_identifier_quoted(context, out, v),
                    ".",
                );
                if let Some(direction) = direction {
                    out.push(' ');
                    out.push_str(direction);
                }
            }
            OrderItem::Expression(expr, direction) => {
                self.write_sql_expr(context, out, expr);
                if let Some(direction) = direction {
                    if !is_order_direction(direction) {
                        return Err(Error::msg(format!(
                            "`{direction}` is not a valid sort direction"
                        )));
                    }
                    out.push(' ');
                    out.push_str(direction);
                }
            }
        }
        Ok(())
    }

    fn write_group(&self, context: &mut WriteContext, out: &mut String, value: &Group) {
        match value {
            Group::Identifier(v) => self.write_identifier_quoted(context, out, v),
            Group::List(items) => separated_by(
                out,
                items,
                |out, v| match v {
                    GroupItem::Column(column) => self.write_identifier(context, out, column),
                    GroupItem::Expression(expr) => self.write_sql_expr(context, out, expr),
                },
                ", ",
            ),
        }
    }

    /// Index hints following the table of a select, skipped where unsupported.
    fn write_index_hints(&self, _context: &mut WriteContext, _out: &mut String, value: &[IndexHint]) {
        if !value.is_empty() {
            log::debug!(
                "{} does not support index hints, skipping {} of them",
                self.name(),
                value.len()
            );
        }
    }

    /// Written right after `SELECT`, before the projection list.
    fn write_select_modifiers(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _options: &QueryOptions,
    ) {
    }

    /// `LIMIT n OFFSET m`, a zero offset is omitted.
    fn write_limit_offset(
        &self,
        _context: &mut WriteContext,
        out: &mut String,
        options: &QueryOptions,
        _model: Option<&ModelMeta>,
    ) -> Result<()> {
        if let Some(limit) = options.limit {
            out.push_str(" LIMIT ");
            write_integer!(out, limit);
        }
        if let Some(offset) = options.offset.filter(|v| *v > 0) {
            out.push_str(" OFFSET ");
            write_integer!(out, offset);
        }
        Ok(())
    }

    /// Column used to address single rows when a statement carries a limit.
    fn row_identifier(&self) -> &'static str {
        "ctid"
    }

    /// WHERE clause of update and delete, the limit restricts the affected rows.
    fn write_limited_where(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        value: &Where,
        limit: Option<u64>,
    ) -> Result<()> {
        let Some(limit) = limit else {
            return self.write_where_clause(context, out, " WHERE ", Some(value));
        };
        let id = self.row_identifier();
        let _ = write!(out, " WHERE {id} IN (SELECT {id} FROM ");
        self.write_table_ref(context, out, table);
        self.write_where_clause(context, out, " WHERE ", Some(value))?;
        out.push_str(" LIMIT ");
        write_integer!(out, limit);
        out.push(')');
        Ok(())
    }

    /// Statements preceding CREATE TABLE.
    fn write_create_table_prelude(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _table: &TableRef,
        _definitions: &[(&str, ColumnDefinition)],
    ) {
    }

    fn write_create_table_head(&self, context: &mut WriteContext, out: &mut String, table: &TableRef) {
        out.push_str("CREATE TABLE IF NOT EXISTS ");
        self.write_table_ref(context, out, table);
    }

    /// Whether the primary key sits next to its column rather than after all of them.
    fn inline_primary_key(&self, _columns: usize) -> bool {
        false
    }

    /// Whether `REFERENCES` sits next to its column rather than in a `FOREIGN KEY` constraint.
    fn inline_references(&self) -> bool {
        true
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
        if !definition.ty.is_empty() {
            out.push(' ');
            out.push_str(&definition.ty);
        }
        if inline_primary_key && definition.primary_key {
            out.push_str(" PRIMARY KEY");
        }
        if self.inline_references() {
            if let Some(references) = &definition.references {
                out.push(' ');
                out.push_str(references);
            }
        }
        if let Some(comment) = &definition.comment {
            self.write_column_comment_inline(context, out, comment);
        }
        Ok(())
    }

    /// Type of an enum column.
    fn write_column_enum(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        _table: &TableRef,
        _column: &str,
        values: &[String],
    ) {
        out.push_str("ENUM(");
        separated_by(
            out,
            values,
            |out, v| self.write_value_string(context, out, v),
            ", ",
        );
        out.push(')');
    }

    fn write_column_comment_inline(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _comment: &str,
    ) {
    }

    fn write_create_table_unique(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        _table: &TableRef,
        value: &UniqueKey,
    ) {
        if let Some(name) = &value.name {
            out.push_str("CONSTRAINT ");
            self.write_identifier_quoted(context, out, name);
            out.push(' ');
        }
        out.push_str("UNIQUE (");
        separated_by(
            out,
            &value.fields,
            |out, v| self.write_identifier_quoted(context, out, v),
            ", ",
        );
        out.push(')');
    }

    /// Table options following the column list.
    fn write_create_table_suffix(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _options: &CreateTableOptions,
    ) {
    }

    /// Emit COMMENT ON statements for the table and the columns carrying comments.
    fn write_create_table_comments(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        definitions: &[(&str, ColumnDefinition)],
        options: &CreateTableOptions,
    ) {
        for (name, definition) in definitions {
            let Some(comment) = &definition.comment else {
                continue;
            };
            out.push_str(" COMMENT ON COLUMN ");
            self.write_table_ref(context, out, table);
            out.push('.');
            self.write_identifier_quoted(context, out, name);
            out.push_str(" IS ");
            self.write_value_string(context, out, comment);
            out.push(';');
        }
        if let Some(comment) = &options.comment {
            out.push_str(" COMMENT ON TABLE ");
            self.write_table_ref(context, out, table);
            out.push_str(" IS ");
            self.write_value_string(context, out, comment);
            out.push(';');
        }
    }

    /// Emit CREATE TABLE with columns, constraints & comments.
    fn write_create_table(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        columns: &ColumnSpec,
        options: &CreateTableOptions,
    ) -> Result<()> {
        let definitions = columns.definitions()?;
        self.write_create_table_prelude(context, out, table, &definitions);
        self.write_create_table_head(context, out, table);
        out.push_str(" (");
        let primary_key: Vec<&str> = definitions
            .iter()
            .filter(|(_, v)| v.primary_key)
            .map(|(name, _)| *name)
            .collect();
        let inline_primary_key = self.inline_primary_key(primary_key.len());
        try_separated_by(
            out,
            &definitions,
            |out, (name, definition)| {
                self.write_create_table_column(
                    context,
                    out,
                    table,
                    name,
                    definition,
                    inline_primary_key,
                )
            },
            ", ",
        )?;
        if !primary_key.is_empty() && !inline_primary_key {
            out.push_str(", PRIMARY KEY (");
            separated_by(
                out,
                &primary_key,
                |out, v| self.write_identifier_quoted(context, out, v),
                ", ",
            );
            out.push(')');
        }
        for unique in options.unique_keys.iter().filter(|v| !v.fields.is_empty()) {
            out.push_str(", ");
            self.write_create_table_unique(context, out, table, unique);
        }
        if !self.inline_references() {
            for (name, definition) in &definitions {
                if let Some(references) = &definition.references {
                    out.push_str(", FOREIGN KEY (");
                    self.write_identifier_quoted(context, out, name);
                    out.push_str(") ");
                    out.push_str(references);
                }
            }
        }
        out.push(')');
        self.write_create_table_suffix(context, out, options);
        out.push(';');
        self.write_create_table_comments(context, out, table, &definitions, options);
        Ok(())
    }

    fn create_table_query(
        &self,
        table: &TableRef,
        columns: &ColumnSpec,
        options: &CreateTableOptions,
    ) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(128 + columns.len() * 48);
        self.write_create_table(&mut context, &mut out, table, columns, options)
            .with_context(|| {
                format!(
                    "While building the create table query for `{}`",
                    table.full_name()
                )
            })?;
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    fn write_drop_table(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        cascade: bool,
    ) -> Result<()> {
        out.push_str("DROP TABLE IF EXISTS ");
        self.write_table_ref(context, out, table);
        if cascade {
            out.push_str(" CASCADE");
        }
        Ok(())
    }

    fn drop_table_query(&self, table: &TableRef, cascade: bool) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(32 + table.name.len());
        self.write_drop_table(&mut context, &mut out, table, cascade)
            .with_context(|| {
                format!("While building the drop table query for `{}`", table.full_name())
            })?;
        out.push(';');
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    /// Select list, source, filters and grouping, everything a sub query wraps.
    fn write_select_body(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        alias: Option<&str>,
        options: &QueryOptions,
    ) -> Result<()> {
        out.push_str("SELECT ");
        self.write_select_modifiers(context, out, options);
        self.write_attributes(context, out, &options.attributes);
        out.push_str(" FROM ");
        self.write_table_ref(context, out, table);
        if let Some(alias) = alias {
            out.push_str(" AS ");
            self.write_identifier_quoted(context, out, alias);
        }
        self.write_index_hints(context, out, &options.index_hints);
        context.qualifier = Some(alias.map_or_else(|| table.full_name(), str::to_owned));
        let result = self.write_where_clause(
            context,
            out,
            " WHERE ",
            options.where_clause.as_ref(),
        );
        context.qualifier = None;
        result?;
        if let Some(group) = options.group.as_ref().filter(|v| !v.is_empty()) {
            out.push_str(" GROUP BY ");
            self.write_group(context, out, group);
        }
        self.write_where_clause(context, out, " HAVING ", options.having.as_ref())
    }

    /// Emit SELECT statement (projection, FROM, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT).
    fn write_select(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        options: &QueryOptions,
        model: Option<&ModelMeta>,
    ) -> Result<()> {
        let alias = options
            .table_as
            .clone()
            .filter(|v| !v.is_empty())
            .or_else(|| (!table.alias.is_empty()).then(|| table.alias.to_string()));
        if options.sub_query {
            let outer = alias.clone().unwrap_or_else(|| table.name.to_string());
            out.push_str("SELECT ");
            self.write_identifier_quoted(context, out, &outer);
            out.push_str(".* FROM (");
            self.write_select_body(context, out, table, alias.as_deref(), options)?;
            out.push_str(") AS ");
            self.write_identifier_quoted(context, out, &outer);
        } else {
            self.write_select_body(context, out, table, alias.as_deref(), options)?;
        }
        if let Some(order) = options.order.as_ref().filter(|v| !v.is_empty()) {
            out.push_str(" ORDER BY ");
            self.write_order(context, out, order)?;
        }
        self.write_limit_offset(context, out, options, model)
    }

    fn select_query(
        &self,
        table: &TableRef,
        options: &QueryOptions,
        model: Option<&ModelMeta>,
    ) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(128 + options.attributes.len() * 32);
        self.write_select(&mut context, &mut out, table, options, model)
            .with_context(|| format!("While building the select query for `{}`", table.full_name()))?;
        out.push(';');
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    /// Value written for an auto increment column holding null, `None` drops the column.
    fn auto_increment_placeholder(&self) -> Option<&'static str> {
        Some("DEFAULT")
    }

    /// Statement enabling or disabling explicit values for identity columns.
    fn write_identity_insert(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _table: &TableRef,
        _enable: bool,
    ) {
    }

    fn write_insert_into(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        _ignore_duplicates: bool,
    ) -> Result<()> {
        out.push_str("INSERT INTO ");
        self.write_table_ref(context, out, table);
        Ok(())
    }

    /// Values clause of an insert without columns.
    fn write_insert_default_values(&self, _context: &mut WriteContext, out: &mut String) {
        out.push_str(" DEFAULT VALUES");
    }

    /// Clause placed before the values, for dialects returning rows through an output clause.
    fn write_output(&self, _context: &mut WriteContext, _out: &mut String, _value: &Returning) {}

    fn write_returning(&self, context: &mut WriteContext, out: &mut String, value: &Returning) {
        match value {
            Returning::None => {}
            Returning::All => out.push_str(" RETURNING *"),
            Returning::Columns(columns) => {
                out.push_str(" RETURNING ");
                if columns.is_empty() {
                    out.push('*');
                }
                separated_by(
                    out,
                    columns,
                    |out, v| self.write_identifier_quoted(context, out, v),
                    ", ",
                );
            }
        }
    }

    /// Handling of rows clashing with existing ones.
    fn write_insert_conflict(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        ignore_duplicates: bool,
        update: &[String],
        keys: &[String],
        model: Option<&ModelMeta>,
    ) -> Result<()> {
        if !update.is_empty() {
            self.write_insert_update_fragment(context, out, update, keys, model)
        } else {
            if ignore_duplicates {
                out.push_str(" ON CONFLICT DO NOTHING");
            }
            Ok(())
        }
    }

    /// Emit ON CONFLICT DO UPDATE fragment for upsert.
    fn write_insert_update_fragment(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        update: &[String],
        keys: &[String],
        model: Option<&ModelMeta>,
    ) -> Result<()> {
        let keys = conflict_keys(keys, model);
        if keys.is_empty() {
            return Err(Error::msg(
                "Updating on duplicate requires conflict keys or a model with a primary key",
            ));
        }
        out.push_str(" ON CONFLICT (");
        separated_by(
            out,
            &keys,
            |out, v| self.write_identifier_quoted(context, out, v),
            ", ",
        );
        out.push_str(") DO UPDATE SET ");
        separated_by(
            out,
            update,
            |out, v| {
                let column = model.map_or(v.as_str(), |m| m.column(v));
                self.write_identifier_quoted(context, out, column);
                out.push_str(" = EXCLUDED.");
                self.write_identifier_quoted(context, out, column);
            },
            ", ",
        );
        Ok(())
    }

    /// Emit a single row INSERT, values go through [`QueryGenerator::write_bind_or_value`].
    fn write_insert(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        values: &Row,
        model: Option<&ModelMeta>,
        options: &InsertOptions,
    ) -> Result<()> {
        let placeholder = self.auto_increment_placeholder();
        let mut columns: Vec<(&str, Option<&Value>)> = Vec::with_capacity(values.len());
        for (name, value) in values.iter() {
            if options.omit_null && value.is_null() {
                continue;
            }
            if value.is_null() && model.is_some_and(|m| m.is_auto_increment(name)) {
                if placeholder.is_some() {
                    columns.push((name, None));
                }
                continue;
            }
            columns.push((name, Some(value)));
        }
        let identity = model.is_some_and(|m| {
            values
                .iter()
                .any(|(name, value)| !value.is_null() && m.is_auto_increment(name))
        });
        if identity {
            self.write_identity_insert(context, out, table, true);
        }
        let ignore = options.ignore_duplicates && options.update_on_duplicate.is_empty();
        self.write_insert_into(context, out, table, ignore)?;
        if columns.is_empty() {
            self.write_output(context, out, &options.returning);
            self.write_insert_default_values(context, out);
        } else {
            out.push_str(" (");
            separated_by(
                out,
                &columns,
                |out, (name, _)| {
                    self.write_identifier_quoted(context, out, model.map_or(*name, |m| m.column(name)))
                },
                ", ",
            );
            out.push(')');
            self.write_output(context, out, &options.returning);
            out.push_str(" VALUES (");
            separated_by(
                out,
                &columns,
                |out, (_, value)| match value {
                    Some(value) => self.write_bind_or_value(context, out, value),
                    None => out.push_str(placeholder.unwrap_or("DEFAULT")),
                },
                ", ",
            );
            out.push(')');
        }
        self.write_insert_conflict(
            context,
            out,
            options.ignore_duplicates,
            &options.update_on_duplicate,
            &options.upsert_keys,
            model,
        )?;
        self.write_returning(context, out, &options.returning);
        out.push(';');
        if identity {
            out.push(' ');
            self.write_identity_insert(context, out, table, false);
        }
        Ok(())
    }

    fn insert_query(
        &self,
        table: &TableRef,
        values: &Row,
        model: Option<&ModelMeta>,
        options: &InsertOptions,
    ) -> Result<BoundQuery> {
        let style = self.options().bind_style;
        let mut context = WriteContext::binding(style);
        let mut out = String::with_capacity(128 + values.len() * 32);
        self.write_insert(&mut context, &mut out, table, values, model, options)
            .with_context(|| format!("While building the insert query for `{}`", table.full_name()))?;
        log::debug!("{}", truncate_long!(out));
        Ok(BoundQuery {
            query: out,
            bind: context.into_bind(style),
        })
    }

    /// Emit a multi row INSERT, literals are inlined and missing values become `NULL`.
    fn write_bulk_insert(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        rows: &[Row],
        options: &BulkInsertOptions,
        model: Option<&ModelMeta>,
    ) -> Result<()> {
        if rows.is_empty() {
            return Err(Error::msg("Bulk insert requires at least one row"));
        }
        let placeholder = self.auto_increment_placeholder();
        let mut columns: Vec<&str> = Vec::new();
        for row in rows {
            for name in row.columns() {
                if !columns.contains(&name) {
                    columns.push(name);
                }
            }
        }
        let auto_increment = |name: &str| model.is_some_and(|m| m.is_auto_increment(name));
        if placeholder.is_none() {
            let has_value = |row: &Row, name: &str| row.get(name).is_some_and(|v| !v.is_null());
            columns.retain(|name| {
                !auto_increment(*name) || rows.iter().any(|row| has_value(row, name))
            });
            // Without a placeholder the rows missing an explicit identity would insert NULL
            if let Some(name) = columns.iter().find(|name| {
                auto_increment(**name) && rows.iter().any(|row| !has_value(row, name))
            }) {
                return Err(Error::msg(format!(
                    "Either every row or none must set the auto increment column `{name}`"
                )));
            }
        }
        let identity = rows.iter().any(|row| {
            row.iter()
                .any(|(name, value)| !value.is_null() && auto_increment(name))
        });
        if identity {
            self.write_identity_insert(context, out, table, true);
        }
        let ignore = options.ignore_duplicates && options.update_on_duplicate.is_empty();
        self.write_insert_into(context, out, table, ignore)?;
        out.push_str(" (");
        separated_by(
            out,
            &columns,
            |out, name| {
                self.write_identifier_quoted(context, out, model.map_or(*name, |m| m.column(name)))
            },
            ", ",
        );
        out.push(')');
        self.write_output(context, out, &options.returning);
        out.push_str(" VALUES ");
        separated_by(
            out,
            rows,
            |out, row| {
                out.push('(');
                separated_by(
                    out,
                    &columns,
                    |out, name| match (row.get(name), placeholder) {
                        (Some(value), _) if !value.is_null() => {
                            self.write_value(context, out, value)
                        }
                        (_, Some(placeholder)) if auto_increment(*name) => {
                            out.push_str(placeholder)
                        }
                        _ => self.write_value_none(context, out),
                    },
                    ", ",
                );
                out.push(')');
            },
            ", ",
        );
        self.write_insert_conflict(
            context,
            out,
            options.ignore_duplicates,
            &options.update_on_duplicate,
            &options.upsert_keys,
            model,
        )?;
        self.write_returning(context, out, &options.returning);
        out.push(';');
        if identity {
            out.push(' ');
            self.write_identity_insert(context, out, table, false);
        }
        Ok(())
    }

    fn bulk_insert_query(
        &self,
        table: &TableRef,
        rows: &[Row],
        options: &BulkInsertOptions,
        model: Option<&ModelMeta>,
    ) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(128 + rows.len() * 64);
        self.write_bulk_insert(&mut context, &mut out, table, rows, options, model)
            .with_context(|| {
                format!("While building the bulk insert query for `{}`", table.full_name())
            })?;
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    /// Whether updates leave auto increment columns alone.
    fn update_skips_auto_increment(&self) -> bool {
        false
    }

    fn write_update_table(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        _limit: Option<u64>,
    ) -> Result<()> {
        out.push_str("UPDATE ");
        self.write_table_ref(context, out, table);
        Ok(())
    }

    /// Emit UPDATE, SET values are bound before the WHERE ones.
    fn write_update(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        values: &Row,
        where_clause: &Where,
        options: &UpdateOptions,
        model: Option<&ModelMeta>,
    ) -> Result<()> {
        let skip_auto_increment = self.update_skips_auto_increment();
        let columns: Vec<(&str, &Value)> = values
            .iter()
            .filter(|(_, v)| !(options.omit_null && v.is_null()))
            .filter(|(k, _)| {
                !(skip_auto_increment && model.is_some_and(|m| m.is_auto_increment(k)))
            })
            .collect();
        if columns.is_empty() {
            return Err(Error::msg("There are no values to update"));
        }
        self.write_update_table(context, out, table, options.limit)?;
        out.push_str(" SET ");
        separated_by(
            out,
            &columns,
            |out, (name, value)| {
                let column = model.map_or(*name, |m| m.column(name));
                self.write_identifier_quoted(context, out, column);
                out.push_str(" = ");
                self.write_bind_or_value(context, out, value);
            },
            ", ",
        );
        self.write_output(context, out, &options.returning);
        self.write_limited_where(context, out, table, where_clause, options.limit)?;
        self.write_returning(context, out, &options.returning);
        out.push(';');
        Ok(())
    }

    fn update_query(
        &self,
        table: &TableRef,
        values: &Row,
        where_clause: &Where,
        options: &UpdateOptions,
        model: Option<&ModelMeta>,
    ) -> Result<BoundQuery> {
        let style = self.options().bind_style;
        let mut context = WriteContext::binding(style);
        let mut out = String::with_capacity(128 + values.len() * 32);
        self.write_update(&mut context, &mut out, table, values, where_clause, options, model)
            .with_context(|| format!("While building the update query for `{}`", table.full_name()))?;
        log::debug!("{}", truncate_long!(out));
        Ok(BoundQuery {
            query: out,
            bind: context.into_bind(style),
        })
    }

    fn write_delete_from(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        _limit: Option<u64>,
    ) -> Result<()> {
        out.push_str("DELETE FROM ");
        self.write_table_ref(context, out, table);
        Ok(())
    }

    /// Emit DELETE statement with WHERE clause.
    fn write_delete(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        where_clause: &Where,
        options: &DeleteOptions,
    ) -> Result<()> {
        self.write_delete_from(context, out, table, options.limit)?;
        self.write_limited_where(context, out, table, where_clause, options.limit)
    }

    fn delete_query(
        &self,
        table: &TableRef,
        where_clause: &Where,
        options: &DeleteOptions,
    ) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(128);
        self.write_delete(&mut context, &mut out, table, where_clause, options)
            .with_context(|| format!("While building the delete query for `{}`", table.full_name()))?;
        out.push(';');
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    /// Catalog query listing the foreign keys of `table`, restricted to `column` when given.
    fn write_foreign_keys(
        &self,
        context: &mut WriteContext,
        out: &mut String,
        table: &TableRef,
        column: Option<&str>,
    ) -> Result<()> {
        out.push_str(concat!(
            "SELECT tc.constraint_name AS constraint_name, tc.table_schema AS table_schema, ",
            "tc.table_name AS table_name, kcu.column_name AS column_name, ",
            "ccu.table_schema AS referenced_table_schema, ccu.table_name AS referenced_table_name, ",
            "ccu.column_name AS referenced_column_name ",
            "FROM information_schema.table_constraints AS tc ",
            "JOIN information_schema.key_column_usage AS kcu ",
            "ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema ",
            "JOIN information_schema.constraint_column_usage AS ccu ",
            "ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema ",
            "WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_name = ",
        ));
        self.write_value_string(context, out, &table.name);
        if !table.schema.is_empty() {
            out.push_str(" AND tc.table_schema = ");
            self.write_value_string(context, out, &table.schema);
        }
        if let Some(column) = column {
            out.push_str(" AND kcu.column_name = ");
            self.write_value_string(context, out, column);
        }
        Ok(())
    }

    fn get_foreign_key_query(&self, table: &TableRef, column: &str) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(512);
        self.write_foreign_keys(&mut context, &mut out, table, Some(column))
            .with_context(|| {
                format!(
                    "While building the foreign key query for `{}`.`{column}`",
                    table.full_name()
                )
            })?;
        out.push(';');
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    fn get_foreign_keys_query(&self, table: &TableRef) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(512);
        self.write_foreign_keys(&mut context, &mut out, table, None)
            .with_context(|| {
                format!("While building the foreign keys query for `{}`", table.full_name())
            })?;
        out.push(';');
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    fn write_create_trigger(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _table: &TableRef,
        _trigger: &Trigger,
    ) -> Result<()> {
        Err(Error::msg(format!("{} does not support triggers", self.name())))
    }

    fn write_drop_trigger(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _table: &TableRef,
        _name: &str,
    ) -> Result<()> {
        Err(Error::msg(format!("{} does not support triggers", self.name())))
    }

    fn write_rename_trigger(
        &self,
        _context: &mut WriteContext,
        _out: &mut String,
        _table: &TableRef,
        _old_name: &str,
        _new_name: &str,
    ) -> Result<()> {
        Err(Error::msg(format!("{} does not support triggers", self.name())))
    }

    fn create_trigger_query(&self, table: &TableRef, trigger: &Trigger) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(128);
        self.write_create_trigger(&mut context, &mut out, table, trigger)
            .with_context(|| format!("While building the trigger `{}`", trigger.name))?;
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    fn drop_trigger_query(&self, table: &TableRef, name: &str) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(64);
        self.write_drop_trigger(&mut context, &mut out, table, name)
            .with_context(|| format!("While dropping the trigger `{name}`"))?;
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }

    fn rename_trigger_query(
        &self,
        table: &TableRef,
        old_name: &str,
        new_name: &str,
    ) -> Result<String> {
        let mut context = WriteContext::new();
        let mut out = String::with_capacity(64);
        self.write_rename_trigger(&mut context, &mut out, table, old_name, new_name)
            .with_context(|| format!("While renaming the trigger `{old_name}`"))?;
        log::debug!("{}", truncate_long!(out));
        Ok(out)
    }
}

/// Conflict target of an upsert: the explicit keys, the model primary key otherwise.
pub fn conflict_keys(keys: &[String], model: Option<&ModelMeta>) -> Vec<String> {
    if !keys.is_empty() {
        return keys
            .iter()
            .map(|v| model.map_or(v.as_str(), |m| m.column(v)).to_string())
            .collect();
    }
    model
        .map(|m| m.primary_keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Fallback generator following the PostgreSQL conventions.
#[derive(Default, Debug, Clone)]
pub struct GenericQueryGenerator {
    pub options: GeneratorOptions,
}

impl GenericQueryGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl QueryGenerator for GenericQueryGenerator {
    fn options(&self) -> &GeneratorOptions {
        &self.options
    }
    fn name(&self) -> &'static str {
        "generic"
    }
}
