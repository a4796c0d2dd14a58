use crate::Value;

/// SQL fragment emitted verbatim, never escaped.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
    /// Raw text, written as is.
    Literal(String),
    /// Column reference, quoted like any other identifier.
    Column(String),
    Function { name: String, args: Vec<Operand> },
    Cast(Box<Operand>, String),
}

impl SqlExpr {
    pub fn literal(value: impl Into<String>) -> Self {
        SqlExpr::Literal(value.into())
    }
    pub fn column(name: impl Into<String>) -> Self {
        SqlExpr::Column(name.into())
    }
    pub fn function(name: impl Into<String>, args: impl IntoIterator<Item = Operand>) -> Self {
        SqlExpr::Function {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }
    pub fn cast(operand: impl Into<Operand>, ty: impl Into<String>) -> Self {
        SqlExpr::Cast(Box::new(operand.into()), ty.into())
    }
}

/// Right hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Always bound or escaped.
    Value(Value),
    Expression(SqlExpr),
}

impl Operand {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Operand::Value(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_operand_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Operand {
                fn from(value: $source) -> Self {
                    Operand::Value(value.into())
                }
            }
        )+
    };
}
impl_operand_from!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    &str,
    String,
    rust_decimal::Decimal,
    Vec<u8>,
    Vec<Value>,
    time::Date,
    time::Time,
    time::PrimitiveDateTime,
    time::OffsetDateTime,
    uuid::Uuid,
);

impl From<SqlExpr> for Operand {
    fn from(value: SqlExpr) -> Self {
        Operand::Expression(value)
    }
}
