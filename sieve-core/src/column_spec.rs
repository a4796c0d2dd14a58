use crate::{Error, Result, consume_while, find_keyword};
use anyhow::Context;

/// Ordered column name to raw DDL fragment mapping.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    entries: Vec<(String, String)>,
}

impl ColumnSpec {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn column(mut self, name: impl Into<String>, definition: impl Into<String>) -> Self {
        self.entries.push((name.into(), definition.into()));
        self
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + Clone {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
    /// Every column parsed, in declaration order.
    pub fn definitions(&self) -> Result<Vec<(&str, ColumnDefinition)>> {
        self.entries
            .iter()
            .map(|(name, raw)| {
                ColumnDefinition::parse(raw)
                    .with_context(|| format!("While parsing the definition of column `{name}`"))
                    .map(|v| (name.as_str(), v))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnSpec {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for ColumnSpec {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

/// Raw column definition split into the parts dialects render in different places.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Whatever is left once the other parts are extracted. Follows the enum values when
    /// `enum_values` is present.
    pub ty: String,
    pub primary_key: bool,
    pub comment: Option<String>,
    /// Starts with `REFERENCES`.
    pub references: Option<String>,
    pub enum_values: Option<Vec<String>>,
}

impl ColumnDefinition {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut rest = raw.trim().to_string();
        let mut result = ColumnDefinition::default();
        if let Some(i) = find_keyword(&rest, "COMMENT") {
            let text = rest[i + "COMMENT".len()..].trim();
            result.comment = Some(unquote(text));
            rest.truncate(i);
        }
        if let Some(i) = find_keyword(&rest, "REFERENCES") {
            result.references = Some(rest[i..].trim().to_string());
            rest.truncate(i);
        }
        while let Some(i) = find_keyword(&rest, "PRIMARY KEY") {
            result.primary_key = true;
            rest.replace_range(i..i + "PRIMARY KEY".len(), "");
        }
        let mut input = rest.trim();
        if input.get(..5).is_some_and(|v| v.eq_ignore_ascii_case("ENUM(")) {
            input = &input[5..];
            let mut values = Vec::new();
            loop {
                consume_while(&mut input, |c| c.is_whitespace() || *c == ',');
                if let Some(tail) = input.strip_prefix(')') {
                    input = tail;
                    break;
                }
                let Some(tail) = input.strip_prefix('\'') else {
                    return Err(Error::msg(format!(
                        "Expected a quoted enum value, found `{input}` in `{raw}`"
                    )));
                };
                input = tail;
                let mut value = String::new();
                loop {
                    value.push_str(consume_while(&mut input, |c| *c != '\''));
                    if input.starts_with("''") {
                        value.push('\'');
                        input = &input[2..];
                    } else if let Some(tail) = input.strip_prefix('\'') {
                        input = tail;
                        break;
                    } else {
                        return Err(Error::msg(format!("Unterminated enum value in `{raw}`")));
                    }
                }
                values.push(value);
            }
            result.enum_values = Some(values);
        }
        result.ty = input.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(result)
    }
}

fn unquote(text: &str) -> String {
    match text
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
    {
        Some(inner) => inner.replace("''", "'"),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_type() {
        let def = ColumnDefinition::parse("VARCHAR(255)").unwrap();
        assert_eq!(def.ty, "VARCHAR(255)");
        assert!(!def.primary_key);
        assert_eq!(def.comment, None);
        assert_eq!(def.references, None);
        assert_eq!(def.enum_values, None);
    }

    #[test]
    fn primary_key_anywhere() {
        let def = ColumnDefinition::parse("INTEGER PRIMARY KEY AUTOINCREMENT").unwrap();
        assert!(def.primary_key);
        assert_eq!(def.ty, "INTEGER AUTOINCREMENT");
    }

    #[test]
    fn comment_then_references() {
        let def = ColumnDefinition::parse(
            r#"INTEGER REFERENCES "users" ("id") ON DELETE CASCADE COMMENT Owner of the row"#,
        )
        .unwrap();
        assert_eq!(def.ty, "INTEGER");
        assert_eq!(
            def.references.as_deref(),
            Some(r#"REFERENCES "users" ("id") ON DELETE CASCADE"#)
        );
        assert_eq!(def.comment.as_deref(), Some("Owner of the row"));
    }

    #[test]
    fn quoted_comment() {
        let def = ColumnDefinition::parse("VARCHAR(255) COMMENT 'It''s here'").unwrap();
        assert_eq!(def.comment.as_deref(), Some("It's here"));
        assert_eq!(def.ty, "VARCHAR(255)");
    }

    #[test]
    fn enum_values() {
        let def = ColumnDefinition::parse("ENUM('a', 'b''c',  'd') NOT NULL").unwrap();
        assert_eq!(
            def.enum_values,
            Some(vec!["a".to_string(), "b'c".to_string(), "d".to_string()])
        );
        assert_eq!(def.ty, "NOT NULL");
    }

    #[test]
    fn malformed_enum() {
        assert!(ColumnDefinition::parse("ENUM(a, b)").is_err());
        assert!(ColumnDefinition::parse("ENUM('a").is_err());
    }

    #[test]
    fn spec_order() {
        let spec = ColumnSpec::from([("id", "INTEGER"), ("name", "TEXT"), ("age", "INTEGER")]);
        let names: Vec<_> = spec.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["id", "name", "age"]);
    }
}
