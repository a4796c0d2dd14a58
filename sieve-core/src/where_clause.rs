use crate::{Operand, SqlExpr, Value};

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Is,
    IsNot,
    In,
    NotIn,
    Like,
    NotLike,
    ILike,
    NotILike,
    StartsWith,
    EndsWith,
    Substring,
    Between,
    NotBetween,
    Regexp,
    NotRegexp,
    IRegexp,
    NotIRegexp,
    /// Array contains, `@>`.
    Contains,
    /// Array is contained by, `<@`.
    Contained,
    /// Arrays overlap, `&&`.
    Overlap,
}

impl Op {
    /// Default spelling, dialects override the ones they render differently.
    pub fn sql(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Is => "IS",
            Op::IsNot => "IS NOT",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Like | Op::StartsWith | Op::EndsWith | Op::Substring => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::ILike => "ILIKE",
            Op::NotILike => "NOT ILIKE",
            Op::Between => "BETWEEN",
            Op::NotBetween => "NOT BETWEEN",
            Op::Regexp => "~",
            Op::NotRegexp => "!~",
            Op::IRegexp => "~*",
            Op::NotIRegexp => "!~*",
            Op::Contains => "@>",
            Op::Contained => "<@",
            Op::Overlap => "&&",
        }
    }
    pub fn is_case_insensitive_like(&self) -> bool {
        matches!(self, Op::ILike | Op::NotILike)
    }
    pub fn is_regexp(&self) -> bool {
        matches!(
            self,
            Op::Regexp | Op::NotRegexp | Op::IRegexp | Op::NotIRegexp
        )
    }
    pub fn is_array(&self) -> bool {
        matches!(self, Op::Contains | Op::Contained | Op::Overlap)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Plain equality, `IS NULL` for null and `IN` for lists.
    Equals(Operand),
    /// Every pair is rendered and joined with `AND`.
    Operators(Vec<(Op, Operand)>),
}

/// Predicate tree of WHERE and HAVING clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    And(Vec<Where>),
    Or(Vec<Where>),
    Not(Box<Where>),
    Attribute { column: String, condition: Condition },
    Expression { lhs: SqlExpr, condition: Condition },
    Raw(SqlExpr),
}

impl Where {
    pub fn eq(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Where::Attribute {
            column: column.into(),
            condition: Condition::Equals(value.into()),
        }
    }
    pub fn op(column: impl Into<String>, op: Op, value: impl Into<Operand>) -> Self {
        Where::Attribute {
            column: column.into(),
            condition: Condition::Operators(vec![(op, value.into())]),
        }
    }
    pub fn and(items: impl IntoIterator<Item = Where>) -> Self {
        Where::And(items.into_iter().collect())
    }
    pub fn or(items: impl IntoIterator<Item = Where>) -> Self {
        Where::Or(items.into_iter().collect())
    }
    pub fn not(item: Where) -> Self {
        Where::Not(Box::new(item))
    }
    pub fn raw(sql: impl Into<String>) -> Self {
        Where::Raw(SqlExpr::Literal(sql.into()))
    }
    /// True when the tree renders no SQL at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Where::And(v) | Where::Or(v) => v.iter().all(Where::is_empty),
            Where::Not(v) => v.is_empty(),
            Where::Attribute { condition, .. } | Where::Expression { condition, .. } => {
                condition.is_empty()
            }
            Where::Raw(SqlExpr::Literal(v)) => v.trim().is_empty(),
            Where::Raw(..) => false,
        }
    }
}

impl Condition {
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::Equals(..) => false,
            Condition::Operators(ops) => ops.iter().all(|(op, operand)| {
                *op == Op::NotIn
                    && matches!(operand, Operand::Value(Value::List(v)) if v.is_empty())
            }),
        }
    }
}

impl Default for Where {
    fn default() -> Self {
        Where::And(Vec::new())
    }
}
