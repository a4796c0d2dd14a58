use crate::{Record, ValidatorArg, parse_date};
use regex::Regex;
use sieve_core::{Error, Result, Value};
use std::{
    fmt::{self, Display, Formatter},
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
    sync::{Arc, LazyLock},
};
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

/// Configuration given to a built-in validator: `true`, a single value or a list of arguments.
pub type ValidatorArgs = Value;

macro_rules! builtin_kinds {
    ($($variant:ident => $name:literal $(| $alias:literal)*,)+) => {
        /// Built-in validator catalog.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BuiltinKind {
            $($variant,)+
        }

        impl BuiltinKind {
            /// Canonical camelCase name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl FromStr for BuiltinKind {
            type Err = Error;
            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($name $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(Error::msg(format!("Invalid validator function: {s}"))),
                }
            }
        }
    };
}

builtin_kinds! {
    Is => "is",
    Not => "not",
    IsEmail => "isEmail",
    IsUrl => "isUrl" | "isURL",
    IsIp => "isIP",
    IsIpv4 => "isIPv4",
    IsIpv6 => "isIPv6",
    IsAlpha => "isAlpha",
    IsAlphanumeric => "isAlphanumeric",
    IsNumeric => "isNumeric",
    IsInt => "isInt",
    IsFloat => "isFloat",
    IsDecimal => "isDecimal",
    IsHexadecimal => "isHexadecimal",
    IsLowercase => "isLowercase",
    IsUppercase => "isUppercase",
    NotEmpty => "notEmpty",
    Equals => "equals",
    Contains => "contains",
    NotContains => "notContains",
    IsIn => "isIn",
    NotIn => "notIn",
    Len => "len",
    Min => "min",
    Max => "max",
    IsUuid => "isUUID",
    IsDate => "isDate",
    IsAfter => "isAfter",
    IsBefore => "isBefore",
    IsCreditCard => "isCreditCard",
    IsMobilePhone => "isMobilePhone",
    IsNull => "isNull",
    NotNull => "notNull",
    IsImmutable => "isImmutable",
}

impl Display for BuiltinKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@",
        r"[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    ))
    .expect("email pattern")
});
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]*\.)?[0-9]+$").expect("numeric pattern"));
static INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(?:0|[1-9][0-9]*)$").expect("int pattern"));
static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?[0-9]*(?:\.[0-9]*)?(?:[eE][-+]?[0-9]+)?$").expect("float pattern")
});
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]*(?:\.[0-9]+)?$").expect("decimal pattern"));
static HEXADECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(?:0x|0h)?[0-9a-f]+$").expect("hexadecimal pattern"));
static MOBILE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{6,14}$").expect("mobile phone pattern"));

/// Built-in validator declared on an attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinValidator {
    pub kind: BuiltinKind,
    pub args: ValidatorArgs,
    /// Replaces the default failure message.
    pub msg: Option<String>,
}

impl BuiltinValidator {
    pub fn new(name: &str, args: impl Into<ValidatorArgs>) -> Result<Self> {
        Ok(Self {
            kind: name.parse()?,
            args: args.into(),
            msg: None,
        })
    }
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    /// Arguments the check receives after the declared configuration is normalized.
    pub fn extract_args(&self, field: &str, record: &Arc<Record>) -> Vec<ValidatorArg> {
        use BuiltinKind::*;
        match (&self.args, self.kind) {
            (Value::List(args), _) => args.iter().cloned().map(ValidatorArg::Value).collect(),
            // `true` or a message only configuration mean default options
            (Value::Boolean(true) | Value::Null, IsEmail | IsUrl) => Vec::new(),
            (args, IsImmutable) => vec![
                ValidatorArg::Value(args.clone()),
                ValidatorArg::Value(field.into()),
                ValidatorArg::Record(record.clone()),
            ],
            (Value::Varchar(..), IsAlpha | IsAlphanumeric | IsMobilePhone) => {
                vec![ValidatorArg::Value(self.args.clone())]
            }
            (_, IsAlpha | IsAlphanumeric | IsMobilePhone | IsIp) => Vec::new(),
            (args, _) => vec![ValidatorArg::Value(args.clone())],
        }
    }
}

fn arg(args: &[ValidatorArg], index: usize) -> Option<&Value> {
    args.get(index).and_then(ValidatorArg::as_value)
}

fn arg_f64(args: &[ValidatorArg], index: usize) -> Result<Option<f64>> {
    match arg(args, index) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| Error::msg(format!("Expected a numeric argument, found `{v}`"))),
    }
}

fn arg_string(args: &[ValidatorArg], index: usize) -> Option<String> {
    arg(args, index).map(ToString::to_string)
}

fn parse_f64(value: &str) -> Option<f64> {
    fast_float::parse::<f64, _>(value.trim()).ok()
}

fn compile(pattern: &Value, flags: Option<&Value>) -> Result<Regex> {
    let Some(pattern) = pattern.as_str() else {
        return Err(Error::msg(format!(
            "Expected a regular expression, found `{pattern}`"
        )));
    };
    let mut prefix = String::new();
    for flag in flags.and_then(Value::as_str).unwrap_or_default().chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => prefix.push(flag),
            // global matching has no meaning for a full value test
            'g' => {}
            _ => return Err(Error::msg(format!("Unsupported regular expression flag `{flag}`"))),
        }
    }
    let pattern = if prefix.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{prefix}){pattern}")
    };
    Ok(Regex::new(&pattern)?)
}

fn options(args: &[ValidatorArg]) -> Vec<String> {
    match arg(args, 0) {
        Some(Value::List(values)) => values.iter().map(ToString::to_string).collect(),
        _ => args
            .iter()
            .filter_map(ValidatorArg::as_value)
            .map(ToString::to_string)
            .collect(),
    }
}

fn is_url(value: &str) -> bool {
    let parsed = match Url::parse(value) {
        Ok(v) => v,
        Err(url::ParseError::RelativeUrlWithoutBase) => match Url::parse(&format!("http://{value}")) {
            Ok(v) => v,
            Err(..) => return false,
        },
        Err(..) => return false,
    };
    matches!(parsed.scheme(), "http" | "https" | "ftp")
        && parsed.host_str().is_some_and(|v| v.contains('.') || v == "localhost")
}

fn luhn(value: &str) -> bool {
    let digits = value
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<Vec<_>>();
    if !(13..=19).contains(&digits.len()) || !digits.iter().all(char::is_ascii_digit) {
        return false;
    }
    let sum = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, c)| {
            let d = c.to_digit(10).unwrap_or_default();
            if i % 2 == 1 {
                let d = d * 2;
                if d > 9 { d - 9 } else { d }
            } else {
                d
            }
        })
        .sum::<u32>();
    sum % 10 == 0
}

fn date_arg(args: &[ValidatorArg]) -> Result<OffsetDateTime> {
    match arg(args, 0) {
        None | Some(Value::Null) | Some(Value::Boolean(true)) => Ok(OffsetDateTime::now_utc()),
        Some(Value::TimestampWithTimezone(v)) => Ok(*v),
        Some(Value::Timestamp(v)) => Ok(v.assume_utc()),
        Some(Value::Date(v)) => Ok(v.midnight().assume_utc()),
        Some(v) => parse_date(&v.to_string())
            .ok_or_else(|| Error::msg(format!("Invalid date argument `{v}`"))),
    }
}

impl BuiltinKind {
    /// Runs the check over the textual form of the value.
    pub fn check(&self, value: &str, args: &[ValidatorArg]) -> Result<bool> {
        use BuiltinKind::*;
        Ok(match self {
            Is | Not => {
                let Some(pattern) = arg(args, 0) else {
                    return Err(Error::msg(format!("Validator {self} requires a pattern")));
                };
                let matched = compile(pattern, arg(args, 1))?.is_match(value);
                matched == (*self == Is)
            }
            IsEmail => EMAIL.is_match(value),
            IsUrl => is_url(value),
            IsIp => match arg(args, 0).and_then(Value::as_i64) {
                Some(4) => value.parse::<Ipv4Addr>().is_ok(),
                Some(6) => value.parse::<Ipv6Addr>().is_ok(),
                _ => value.parse::<IpAddr>().is_ok(),
            },
            IsIpv4 => value.parse::<Ipv4Addr>().is_ok(),
            IsIpv6 => value.parse::<Ipv6Addr>().is_ok(),
            IsAlpha => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
            IsAlphanumeric => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()),
            IsNumeric => NUMERIC.is_match(value),
            IsInt => INT.is_match(value),
            IsFloat => {
                !matches!(value, "" | "." | "+" | "-")
                    && FLOAT.is_match(value)
                    && parse_f64(value).is_some()
            }
            IsDecimal => !matches!(value, "" | "+" | "-") && DECIMAL.is_match(value),
            IsHexadecimal => HEXADECIMAL.is_match(value),
            IsLowercase => value == value.to_lowercase(),
            IsUppercase => value == value.to_uppercase(),
            NotEmpty => !value.trim().is_empty(),
            Equals => arg_string(args, 0).is_some_and(|v| v == value),
            Contains => arg_string(args, 0).is_some_and(|v| value.contains(&v)),
            NotContains => !arg_string(args, 0).is_some_and(|v| value.contains(&v)),
            IsIn => options(args).iter().any(|v| v == value),
            NotIn => !options(args).iter().any(|v| v == value),
            Len => {
                let len = value.chars().count() as f64;
                let min = arg_f64(args, 0)?.unwrap_or(0.0);
                let max = arg_f64(args, 1)?;
                len >= min && max.is_none_or(|max| len <= max)
            }
            // Values that are not numbers pass, the type check reports them
            Min => match (parse_f64(value), arg_f64(args, 0)?) {
                (Some(v), Some(min)) => v >= min,
                _ => true,
            },
            Max => match (parse_f64(value), arg_f64(args, 0)?) {
                (Some(v), Some(max)) => v <= max,
                _ => true,
            },
            IsUuid => match Uuid::try_parse(value) {
                Ok(uuid) => match arg(args, 0) {
                    None | Some(Value::Null | Value::Boolean(true)) => true,
                    Some(Value::Varchar(v)) if v == "all" => true,
                    Some(version) => version
                        .as_i64()
                        .is_some_and(|v| uuid.get_version_num() as i64 == v),
                },
                Err(..) => false,
            },
            IsDate => parse_date(value).is_some(),
            IsAfter => {
                let bound = date_arg(args)?;
                parse_date(value).is_some_and(|v| v > bound)
            }
            IsBefore => {
                let bound = date_arg(args)?;
                parse_date(value).is_some_and(|v| v < bound)
            }
            IsCreditCard => luhn(value),
            IsMobilePhone => {
                let digits = value
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
                    .collect::<String>();
                MOBILE_PHONE.is_match(&digits)
            }
            IsNull => value.is_empty(),
            NotNull => true,
            IsImmutable => {
                let field = arg_string(args, 1).unwrap_or_default();
                match args.get(2) {
                    Some(ValidatorArg::Record(record)) => {
                        record.is_new_record
                            || record.values.get(&field) == record.previous.get(&field)
                    }
                    _ => return Err(Error::msg("Validator isImmutable requires the record")),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(args: &[Value]) -> Vec<ValidatorArg> {
        args.iter().cloned().map(ValidatorArg::Value).collect()
    }

    #[test]
    fn names() {
        assert_eq!("isURL".parse::<BuiltinKind>().unwrap(), BuiltinKind::IsUrl);
        assert_eq!("isUrl".parse::<BuiltinKind>().unwrap(), BuiltinKind::IsUrl);
        assert_eq!(BuiltinKind::IsUuid.name(), "isUUID");
        let error = "isAwesome".parse::<BuiltinKind>().unwrap_err();
        assert_eq!(error.to_string(), "Invalid validator function: isAwesome");
    }

    #[test]
    fn formats() {
        use BuiltinKind::*;
        assert!(IsEmail.check("ada@example.com", &[]).unwrap());
        assert!(!IsEmail.check("ada@example", &[]).unwrap());
        assert!(IsUrl.check("https://example.com/a?b=c", &[]).unwrap());
        assert!(IsUrl.check("example.com", &[]).unwrap());
        assert!(!IsUrl.check("not a url", &[]).unwrap());
        assert!(IsIp.check("::1", &[]).unwrap());
        assert!(!IsIp.check("::1", &values(&[4.into()])).unwrap());
        assert!(IsInt.check("-12", &[]).unwrap());
        assert!(!IsInt.check("012", &[]).unwrap());
        assert!(IsFloat.check("1.5e3", &[]).unwrap());
        assert!(!IsFloat.check(".", &[]).unwrap());
        assert!(IsDecimal.check("-0.25", &[]).unwrap());
        assert!(IsHexadecimal.check("0xFF", &[]).unwrap());
        assert!(IsCreditCard.check("4111 1111 1111 1111", &[]).unwrap());
        assert!(!IsCreditCard.check("4111 1111 1111 1112", &[]).unwrap());
        assert!(IsUuid.check("a8098c1a-f86e-11da-bd1a-00112444be1e", &values(&[1.into()])).unwrap());
        assert!(!IsUuid.check("a8098c1a-f86e-11da-bd1a-00112444be1e", &values(&[4.into()])).unwrap());
        assert!(IsMobilePhone.check("+39 333 1234567", &[]).unwrap());
    }

    #[test]
    fn arguments() {
        use BuiltinKind::*;
        assert!(Len.check("abc", &values(&[2.into(), 5.into()])).unwrap());
        assert!(!Len.check("abcdef", &values(&[2.into(), 5.into()])).unwrap());
        assert!(Min.check("10", &values(&[3.into()])).unwrap());
        assert!(!Max.check("10", &values(&[3.into()])).unwrap());
        assert!(Min.check("abc", &values(&[3.into()])).unwrap());
        assert!(IsIn.check("b", &values(&[vec![Value::from("a"), "b".into()].into()])).unwrap());
        assert!(NotIn.check("c", &values(&["a".into(), "b".into()])).unwrap());
        assert!(Is.check("ABC", &values(&["^[a-z]+$".into(), "i".into()])).unwrap());
        assert!(!Not.check("abc", &values(&["^[a-z]+$".into()])).unwrap());
        assert!(Is.check("abc", &values(&["(".into()])).is_err());
        assert!(IsAfter.check("2024-05-02", &values(&["2024-05-01".into()])).unwrap());
        assert!(!IsBefore.check("2024-05-02", &values(&["2024-05-01".into()])).unwrap());
        assert!(Contains.check("hello", &values(&["ell".into()])).unwrap());
        assert!(!NotContains.check("hello", &values(&["ell".into()])).unwrap());
        assert!(!NotEmpty.check(" \t\n", &[]).unwrap());
    }
}
