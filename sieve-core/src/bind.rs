use crate::Value;

/// How literal values reach the database.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStyle {
    /// `$sequelize_1`, `$sequelize_2`, ...
    #[default]
    Named,
    /// Dialect specific positional markers (`$1`, `?`, `@p1`).
    Positional,
    /// No placeholders, literals are escaped in place.
    Inline,
}

/// Ordered placeholder name to value mapping, in first use order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct BindParameters {
    style: BindStyle,
    entries: Vec<(String, Value)>,
}

impl BindParameters {
    pub fn new(style: BindStyle) -> Self {
        Self {
            style,
            entries: Vec::new(),
        }
    }
    pub fn style(&self) -> BindStyle {
        self.style
    }
    /// Appends `value` and returns its 1-based index.
    pub fn push(&mut self, value: Value) -> usize {
        let index = self.entries.len() + 1;
        let name = match self.style {
            BindStyle::Named => format!("sequelize_{index}"),
            _ => index.to_string(),
        };
        self.entries.push((name, value));
        index
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| if k == name { Some(v) } else { None })
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for BindParameters {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Statement text together with the values its placeholders refer to.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct BoundQuery {
    pub query: String,
    pub bind: BindParameters,
}
