use crate::Dialect;
use sieve_core::{BindStyle, Context, Error, GeneratorOptions, QueryGenerator, Result};
use time::{UtcOffset, macros::format_description};
use url::Url;

/// Dialect and generator options, usually read from a connection url.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub dialect: Dialect,
    pub options: GeneratorOptions,
}

impl Config {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            options: Default::default(),
        }
    }

    /// Reads `<dialect>://...?quoteIdentifiers=false&bindStyle=positional&timezone=%2B02:00`.
    ///
    /// The scheme selects the dialect, the recognized query parameters override the defaults and
    /// the rest of the url is left to the connection layer.
    pub fn from_url(url: &str) -> Result<Self> {
        let context = || format!("While reading the configuration from `{url}`");
        let parsed = Url::parse(url).with_context(context)?;
        let dialect = parsed.scheme().parse::<Dialect>().with_context(context)?;
        let mut options = GeneratorOptions::default();
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "quoteIdentifiers" => {
                    options.quote_identifiers = parse_bool(&value).with_context(context)?
                }
                "bindStyle" => options.bind_style = parse_bind_style(&value).with_context(context)?,
                "timezone" => options.timezone = parse_offset(&value).with_context(context)?,
                _ => log::debug!("Ignoring the parameter `{key}` of `{url}`"),
            }
        }
        log::debug!("Using {dialect} with {options:?}");
        Ok(Self { dialect, options })
    }

    pub fn query_generator(&self) -> Box<dyn QueryGenerator> {
        self.dialect.query_generator(self.options)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::msg(format!("Expected a boolean, found `{value}`"))),
    }
}

fn parse_bind_style(value: &str) -> Result<BindStyle> {
    match value {
        "named" => Ok(BindStyle::Named),
        "positional" => Ok(BindStyle::Positional),
        "inline" => Ok(BindStyle::Inline),
        _ => Err(Error::msg(format!(
            "Unknown bind style `{value}`, expected named, positional or inline"
        ))),
    }
}

fn parse_offset(value: &str) -> Result<UtcOffset> {
    if matches!(value, "Z" | "z" | "UTC") {
        return Ok(UtcOffset::UTC);
    }
    // An unescaped `+` decodes to a space in query strings
    let value = match value.strip_prefix(' ') {
        Some(rest) => format!("+{rest}"),
        None => value.to_string(),
    };
    UtcOffset::parse(
        &value,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(|e| Error::new(e).context(format!("Invalid timezone `{value}`")))
}
