use crate::{SqlExpr, Where};

/// One entry of the projection list.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Column(String),
    Aliased(String, String),
    Expression(SqlExpr, String),
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::Column(value.into())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Attribute::Column(value)
    }
}

/// Sort direction tokens, matched exactly.
pub const ORDER_DIRECTIONS: [&str; 8] = [
    "ASC",
    "DESC",
    "ASC NULLS LAST",
    "DESC NULLS LAST",
    "ASC NULLS FIRST",
    "DESC NULLS FIRST",
    "NULLS FIRST",
    "NULLS LAST",
];

pub fn is_order_direction(value: &str) -> bool {
    ORDER_DIRECTIONS.contains(&value)
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderItem {
    Column(String),
    /// Path segments, the last one is a direction when it matches [`ORDER_DIRECTIONS`].
    Path(Vec<String>),
    Expression(SqlExpr, Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    /// Single identifier, quoted as a whole.
    Identifier(String),
    List(Vec<OrderItem>),
    Literal(SqlExpr),
}

impl Order {
    pub fn is_empty(&self) -> bool {
        match self {
            Order::Identifier(v) => v.is_empty(),
            Order::List(v) => v.is_empty(),
            Order::Literal(..) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupItem {
    Column(String),
    Expression(SqlExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Group {
    Identifier(String),
    List(Vec<GroupItem>),
}

impl Group {
    pub fn is_empty(&self) -> bool {
        match self {
            Group::Identifier(v) => v.is_empty(),
            Group::List(v) => v.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexHintKind {
    Use,
    Force,
    Ignore,
}

impl IndexHintKind {
    pub fn sql(&self) -> &'static str {
        match self {
            IndexHintKind::Use => "USE",
            IndexHintKind::Force => "FORCE",
            IndexHintKind::Ignore => "IGNORE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexHint {
    pub kind: IndexHintKind,
    pub values: Vec<String>,
}

/// Options of a select statement.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Empty means `*`.
    pub attributes: Vec<Attribute>,
    pub where_clause: Option<Where>,
    pub order: Option<Order>,
    pub group: Option<Group>,
    pub having: Option<Where>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub sub_query: bool,
    pub table_as: Option<String>,
    pub index_hints: Vec<IndexHint>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub enum Returning {
    #[default]
    None,
    All,
    Columns(Vec<String>),
}

impl Returning {
    pub fn is_none(&self) -> bool {
        matches!(self, Returning::None)
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct InsertOptions {
    pub ignore_duplicates: bool,
    pub returning: Returning,
    pub omit_null: bool,
    /// Columns overwritten when the row already exists.
    pub update_on_duplicate: Vec<String>,
    /// Conflict target, defaults to the model primary key.
    pub upsert_keys: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct BulkInsertOptions {
    pub ignore_duplicates: bool,
    pub returning: Returning,
    pub update_on_duplicate: Vec<String>,
    pub upsert_keys: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct UpdateOptions {
    pub returning: Returning,
    pub omit_null: bool,
    pub limit: Option<u64>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct DeleteOptions {
    pub limit: Option<u64>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct UniqueKey {
    /// Generated as `<table>_<fields>_unique` when missing.
    pub name: Option<String>,
    pub fields: Vec<String>,
}

impl UniqueKey {
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn name_for(&self, table: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}_{}_unique", table, self.fields.join("_")),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct CreateTableOptions {
    pub unique_keys: Vec<UniqueKey>,
    pub comment: Option<String>,
    /// MySQL storage engine, `InnoDB` when missing.
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collate: Option<String>,
}

/// Attribute as seen by the generator.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct AttributeMeta {
    pub name: String,
    /// Column name, defaults to the attribute name when empty.
    pub field: String,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl AttributeMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
    pub fn column(&self) -> &str {
        if self.field.is_empty() {
            &self.name
        } else {
            &self.field
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ModelMeta {
    pub name: String,
    pub attributes: Vec<AttributeMeta>,
}

impl ModelMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }
    pub fn attribute(mut self, attribute: AttributeMeta) -> Self {
        self.attributes.push(attribute);
        self
    }
    /// Attribute matching either the attribute name or the column name.
    pub fn find(&self, name: &str) -> Option<&AttributeMeta> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .or_else(|| self.attributes.iter().find(|a| a.column() == name))
    }
    /// Column name `name` maps to, `name` itself when unknown.
    pub fn column<'s>(&'s self, name: &'s str) -> &'s str {
        self.find(name).map_or(name, AttributeMeta::column)
    }
    pub fn is_auto_increment(&self, name: &str) -> bool {
        self.find(name).is_some_and(|a| a.auto_increment)
    }
    pub fn primary_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|a| a.primary_key)
            .map(AttributeMeta::column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
    /// `CREATE CONSTRAINT TRIGGER ... AFTER`.
    AfterConstraint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerEvent {
    Insert,
    /// Columns restrict the trigger to `UPDATE OF ...`.
    Update(Vec<String>),
    Delete,
    Truncate,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct FunctionParam {
    /// `IN`, `OUT`, `INOUT` or `VARIADIC`.
    pub direction: Option<String>,
    pub name: Option<String>,
    pub ty: Option<String>,
}

impl FunctionParam {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: Some(ty.into()),
            ..Default::default()
        }
    }
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub name: String,
    pub timing: TriggerTiming,
    pub events: Vec<TriggerEvent>,
    pub function: String,
    pub params: Vec<FunctionParam>,
    /// Trailing modifiers written before `EXECUTE PROCEDURE`, like `FOR EACH ROW`.
    pub modifiers: Vec<String>,
}
