use std::borrow::Cow;

/// Table addressed by a statement.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: Cow<'static, str>,
    pub schema: Cow<'static, str>,
    pub alias: Cow<'static, str>,
}

impl TableRef {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    pub fn with_schema(mut self, schema: impl Into<Cow<'static, str>>) -> Self {
        self.schema = schema.into();
        self
    }
    pub fn with_alias(mut self, alias: impl Into<Cow<'static, str>>) -> Self {
        self.alias = alias.into();
        self
    }
    /// Schema qualified name, `schema.table` or just `table`.
    pub fn full_name(&self) -> String {
        let mut result = String::new();
        if !self.schema.is_empty() {
            result.push_str(&self.schema);
            result.push('.');
        }
        result.push_str(&self.name);
        result
    }
}

impl From<&'static str> for TableRef {
    fn from(value: &'static str) -> Self {
        TableRef::new(value)
    }
}

impl From<String> for TableRef {
    fn from(value: String) -> Self {
        TableRef::new(value)
    }
}

impl<S: Into<Cow<'static, str>>, N: Into<Cow<'static, str>>> From<(S, N)> for TableRef {
    fn from((schema, name): (S, N)) -> Self {
        TableRef::new(name).with_schema(schema)
    }
}
